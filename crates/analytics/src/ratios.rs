//! Pure statistics over per-period return series.
//!
//! Every function returns `None` when the quantity is undefined (too few
//! samples, zero deviation) rather than dividing by zero.

use rust_decimal::{Decimal, MathematicalOps};

pub fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let sum: Decimal = values.iter().sum();
    Some(sum / Decimal::from(values.len()))
}

/// Sample standard deviation (n - 1 denominator). Needs at least two values.
pub fn sample_std_dev(values: &[Decimal]) -> Option<Decimal> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let variance = values.iter().map(|v| (*v - mean) * (*v - mean)).sum::<Decimal>() / Decimal::from(values.len() - 1);
    variance.sqrt()
}

/// (mean(returns) - risk_free_rate) / stddev(returns)
pub fn sharpe_ratio(returns: &[Decimal], risk_free_rate: Decimal) -> Option<Decimal> {
    let std_dev = sample_std_dev(returns)?;
    if std_dev.is_zero() {
        return None;
    }
    Some((mean(returns)? - risk_free_rate) / std_dev)
}

/// (mean(returns) - risk_free_rate) / stddev(strictly negative returns)
pub fn sortino_ratio(returns: &[Decimal], risk_free_rate: Decimal) -> Option<Decimal> {
    let downside: Vec<Decimal> = returns.iter().copied().filter(|r| r.is_sign_negative() && !r.is_zero()).collect();
    let std_dev = sample_std_dev(&downside)?;
    if std_dev.is_zero() {
        return None;
    }
    Some((mean(returns)? - risk_free_rate) / std_dev)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn sample_std_dev_uses_n_minus_one() {
        // mean 5, squared deviations sum to 32, / 7 -> variance 4.571428...
        let values = [dec!(2), dec!(4), dec!(4), dec!(4), dec!(5), dec!(5), dec!(7), dec!(9)];
        let sd = sample_std_dev(&values).unwrap();
        assert!((sd - dec!(2.1380899353)).abs() < dec!(0.0000000001));
        assert_eq!(sample_std_dev(&[dec!(1)]), None);
    }

    #[test]
    fn sharpe_is_undefined_without_variance() {
        assert_eq!(sharpe_ratio(&[dec!(0.01), dec!(0.01), dec!(0.01)], Decimal::ZERO), None);
        assert_eq!(sharpe_ratio(&[], Decimal::ZERO), None);
    }

    #[test]
    fn sharpe_matches_hand_computation() {
        // mean 0.02, sample sd 0.01
        let returns = [dec!(0.01), dec!(0.02), dec!(0.03)];
        assert_eq!(sharpe_ratio(&returns, dec!(0.01)), Some(dec!(1)));
    }

    #[test]
    fn sortino_only_uses_negative_returns_for_deviation() {
        // mean -0.005, downside = [-0.01, -0.03], sd = 0.0141421356...
        let returns = [dec!(0.02), dec!(-0.01), dec!(0.0), dec!(-0.03)];
        let sortino = sortino_ratio(&returns, Decimal::ZERO).unwrap();
        assert!((sortino - dec!(-0.3535533906)).abs() < dec!(0.0000000001));

        // A single losing period leaves the downside deviation undefined.
        assert_eq!(sortino_ratio(&[dec!(0.02), dec!(-0.01)], Decimal::ZERO), None);
    }
}
