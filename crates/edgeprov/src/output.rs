//! Terminal output for batch progress and summaries.
//!
//! One line per CSV row, colored by outcome, plus aggregate summary
//! lines. All of it is suppressed by `--quiet`; errors still reach
//! stderr through the miette reporter in `main`.

use std::io::IsTerminal;

use owo_colors::OwoColorize;

use edgeprov_core::{ApprovalOutcome, RowOutcome, RowStatus, RunReport};

fn colored() -> bool {
    std::io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err()
}

fn label(text: &str, paint: fn(&str) -> String) -> String {
    if colored() { paint(text) } else { text.to_owned() }
}

fn green(s: &str) -> String {
    s.green().to_string()
}

fn yellow(s: &str) -> String {
    s.yellow().to_string()
}

fn red(s: &str) -> String {
    s.red().to_string()
}

/// Print one row's outcome.
pub fn print_row(outcome: &RowOutcome) {
    let host = outcome.hostname.as_deref().unwrap_or("-");
    match &outcome.status {
        RowStatus::Written => {
            println!("  {} {host}", label("written ", green));
        }
        RowStatus::Uploaded => {
            println!("  {} {host}", label("uploaded", green));
        }
        RowStatus::SkippedNoHostname => {
            println!(
                "  {} row {} has no hostname",
                label("skipped ", yellow),
                outcome.row
            );
        }
        RowStatus::SkippedMissingField { field } => {
            println!(
                "  {} row {} is missing field '{field}'",
                label("skipped ", yellow),
                outcome.row
            );
        }
        RowStatus::Rejected { message } => {
            println!("  {} {host}: {message}", label("rejected", red));
        }
        RowStatus::Failed { message } => {
            println!("  {} {host}: {message}", label("failed  ", red));
        }
    }
}

/// Print the batch summary line.
pub fn print_batch_summary(report: &RunReport) {
    println!(
        "{} written, {} skipped, {} failed ({} rows)",
        report.written(),
        report.skipped(),
        report.failed(),
        report.outcomes.len()
    );
}

/// Print one reconciliation approval result.
pub fn print_approval(outcome: &ApprovalOutcome) {
    match &outcome.error {
        None => println!(
            "  {} {}",
            label("approved", green),
            outcome.matched.hostname
        ),
        Some(e) => println!(
            "  {} {}: {e}",
            label("failed  ", red),
            outcome.matched.hostname
        ),
    }
}
