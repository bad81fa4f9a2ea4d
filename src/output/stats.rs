//! Statistics reporting.

use console::style;

use crate::ledger::DownloadRecord;
use crate::sync::RunStats;

/// Print statistics for one sync run.
pub fn print_run_stats(stats: &RunStats) {
    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style("Sync Statistics:").bold());
    println!("  New books:   {}", stats.new_items);
    println!("  Attempted:   {}", stats.total_attempted());
    println!("  Downloaded:  {}", style(stats.downloaded).green());
    println!("  Skipped:     {}", style(stats.skipped).yellow());
    if stats.failed > 0 {
        println!("  Failed:      {}", style(stats.failed).red());
        for isbn in &stats.failed_isbns {
            println!("    - {}", isbn);
        }
    }
    println!("{}", style("═".repeat(50)).dim());
}

/// Print every ledger record.
pub fn print_ledger(records: &[DownloadRecord]) {
    println!();
    println!(
        "{}",
        style(format!("{} downloaded books:", records.len())).bold()
    );
    for record in records {
        println!(
            "  {} {} -> {} ({})",
            style(record.isbn()).dim(),
            style(&record.item.title).bold(),
            record.path.display(),
            record.downloaded_at.format("%Y-%m-%d %H:%M")
        );
    }
}
