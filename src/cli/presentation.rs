//! Batch summary presentation.

use crate::batch::{BatchSummary, JobOutcome};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, Table};
use owo_colors::OwoColorize;

/// Render the per-job outcome table plus a totals line.
pub fn format_batch_summary(summary: &BatchSummary, color: bool) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Job", "Result", "Detail"]);
    for (i, report) in summary.reports.iter().enumerate() {
        let (result, detail, tint) = match &report.outcome {
            JobOutcome::Saved(path) => ("saved", path.display().to_string(), Color::Green),
            JobOutcome::NoData => ("no data", "-".to_string(), Color::Yellow),
            JobOutcome::Failed(msg) => ("failed", msg.clone(), Color::Red),
        };
        let mut result_cell = Cell::new(result);
        if color {
            result_cell = result_cell.fg(tint);
        }
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&report.label),
            result_cell,
            Cell::new(detail),
        ]);
    }

    let totals = format!(
        "Saved: {}  No data: {}  Failed: {}",
        summary.saved(),
        summary.no_data(),
        summary.failed()
    );
    let totals = if !color {
        totals
    } else if summary.failed() > 0 {
        totals.red().bold().to_string()
    } else {
        totals.green().bold().to_string()
    };
    format!("{}\n{}", table, totals)
}
