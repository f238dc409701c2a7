use backtester::Backtester;
use chrono::{DateTime, Duration, TimeZone, Utc};
use configuration::Config;
use core_types::{DataEvent, round_money};
use feed::{HistoricFeed, merge_streams};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2017, 12, 10, 15, 0, 0).unwrap() + Duration::minutes(minutes)
}

fn two_symbol_feed(eth: &[Decimal], btc: &[Decimal]) -> HistoricFeed {
    let stream = |symbol: &str, prices: &[Decimal]| -> Vec<DataEvent> {
        prices
            .iter()
            .enumerate()
            .map(|(i, p)| DataEvent::new(at(i as i64), symbol, *p))
            .collect()
    };
    let merged = merge_streams(vec![stream("USDT-ETH", eth), stream("USDT-BTC", btc)]);
    HistoricFeed::new(merged).unwrap()
}

fn config_with_seed(seed: u64) -> Config {
    let mut config = Config::default();
    config.strategy.seed = seed;
    config.strategy.buy_probability = 0.4;
    config.strategy.sell_probability = 0.3;
    config
}

#[test]
fn full_run_is_consistent_with_portfolio_and_statistics() {
    let eth: Vec<Decimal> = (0..120).map(|i| dec!(450) + Decimal::from(i % 11) - Decimal::from(i % 5)).collect();
    let btc: Vec<Decimal> = (0..120).map(|i| dec!(15000) - Decimal::from(i % 13)).collect();
    let mut backtester = Backtester::from_config(&config_with_seed(7), two_symbol_feed(&eth, &btc)).unwrap();

    let summary = backtester.run().unwrap();

    assert_eq!(summary.observations, 240);
    assert_eq!(backtester.statistics().equity_curve().len(), 240);
    assert_eq!(summary.fills, backtester.portfolio().transactions().len());
    assert_eq!(summary.fills, backtester.statistics().transactions().len());
    assert_eq!(summary.signals, summary.orders + summary.rejected_signals.len());
    assert!(summary.failed_orders.is_empty());

    let holdings: Decimal = backtester.portfolio().positions().values().map(|p| p.market_value).sum();
    assert_eq!(backtester.portfolio().value(), round_money(backtester.portfolio().cash() + holdings));
    assert_eq!(summary.report.final_equity, backtester.portfolio().value());
    assert!(summary.report.max_drawdown <= Decimal::ZERO);
}

#[test]
fn reset_and_rerun_reproduces_the_run() {
    let eth = [dec!(450), dec!(455), dec!(440), dec!(470), dec!(430), dec!(460), dec!(480), dec!(475)];
    let btc = [dec!(15000), dec!(15100), dec!(14900), dec!(15300), dec!(15200), dec!(15500), dec!(15400), dec!(15600)];
    let mut backtester = Backtester::from_config(&config_with_seed(3), two_symbol_feed(&eth, &btc)).unwrap();

    let first = backtester.run().unwrap();
    let first_curve = backtester.statistics().equity_curve().to_vec();

    backtester.reset();
    let second = backtester.run().unwrap();

    assert_eq!(backtester.statistics().equity_curve(), first_curve.as_slice());
    assert_eq!(second, first);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn equal_seeds_give_equal_runs(
        seed in any::<u64>(),
        prices in prop::collection::vec(10_000i64..50_000, 2..80),
    ) {
        let eth: Vec<Decimal> = prices.iter().map(|p| Decimal::new(*p, 2)).collect();
        let btc: Vec<Decimal> = prices.iter().rev().map(|p| Decimal::new(*p, 1)).collect();

        let mut a = Backtester::from_config(&config_with_seed(seed), two_symbol_feed(&eth, &btc)).unwrap();
        let mut b = Backtester::from_config(&config_with_seed(seed), two_symbol_feed(&eth, &btc)).unwrap();
        let (summary_a, summary_b) = (a.run().unwrap(), b.run().unwrap());

        prop_assert_eq!(a.statistics().equity_curve().len(), prices.len() * 2);
        prop_assert_eq!(a.statistics().equity_curve(), b.statistics().equity_curve());
        prop_assert_eq!(summary_a, summary_b);
    }
}
