use analytics::PerformanceReport;
use backtester::RunSummary;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use optimizer::SweepResult;
use rust_decimal::Decimal;

fn ratio(value: Option<Decimal>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| v.to_string())
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

/// Renders the summary of a single run as a two-column metric table.
pub fn run_table(summary: &RunSummary) -> Table {
    let report: &PerformanceReport = &summary.report;
    let mut table = new_table(vec!["Metric", "Value"]);

    let rows: Vec<(&str, String)> = vec![
        ("Observations", summary.observations.to_string()),
        ("Signals", summary.signals.to_string()),
        ("Orders", summary.orders.to_string()),
        ("Fills (buy / sell)", format!("{} ({} / {})", report.total_fills, report.buy_fills, report.sell_fills)),
        ("Rejected signals", summary.rejected_signals.len().to_string()),
        ("Failed orders", summary.failed_orders.len().to_string()),
        ("Initial equity", report.initial_equity.to_string()),
        ("Final equity", report.final_equity.to_string()),
        ("Net profit", report.total_net_profit.to_string()),
        ("Total return", ratio(report.total_return)),
        ("Total costs", report.total_costs.to_string()),
        ("Max drawdown", report.max_drawdown.to_string()),
        (
            "Max drawdown at",
            report.max_drawdown_time.map_or_else(|| "n/a".to_string(), |t| t.to_rfc3339()),
        ),
        ("Max drawdown duration", format!("{:?}", report.max_drawdown_duration)),
        ("Sharpe ratio", ratio(report.sharpe_ratio)),
        ("Sortino ratio", ratio(report.sortino_ratio)),
        ("Calmar ratio", ratio(report.calmar_ratio)),
    ];
    for (metric, value) in rows {
        table.add_row(vec![Cell::new(metric), Cell::new(value)]);
    }
    table
}

/// Renders one row per parameter set, in parameter-set order.
pub fn sweep_table(results: &[SweepResult]) -> Table {
    let mut table = new_table(vec![
        "#", "Commission", "Fraction", "Seed", "Final equity", "Return", "Max DD", "Sharpe", "Fills", "Status",
    ]);

    for result in results {
        let p = &result.parameters;
        let mut row = vec![
            Cell::new(p.index),
            Cell::new(p.commission_rate),
            Cell::new(p.order_fraction),
            Cell::new(p.seed),
        ];
        match &result.outcome {
            Ok(summary) => {
                let report = &summary.report;
                row.extend([
                    Cell::new(report.final_equity),
                    Cell::new(ratio(report.total_return)),
                    Cell::new(report.max_drawdown),
                    Cell::new(ratio(report.sharpe_ratio)),
                    Cell::new(summary.fills),
                    Cell::new("ok"),
                ]);
            }
            Err(e) => {
                row.extend(["", "", "", "", ""].map(Cell::new));
                row.push(Cell::new(e));
            }
        }
        table.add_row(row);
    }
    table
}
