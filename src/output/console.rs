//! Console output utilities.

use console::style;

use crate::catalog::CatalogItem;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     audiobook-sync                                    ║
║     Keep a local copy of your audiobook library       ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print configuration summary.
pub fn print_config_summary(username: &str, download_dir: &str, ledger: &str) {
    println!();
    println!("{}", style("Configuration:").bold());
    println!("  Account:   {}", username);
    println!("  Directory: {}", download_dir);
    println!("  Ledger:    {}", ledger);
    println!();
}

/// Print one book as a list line.
pub fn print_book(item: &CatalogItem) {
    let authors = item.author_line().unwrap_or_else(|| "unknown author".to_string());
    let series = match (&item.series, &item.series_num) {
        (Some(series), Some(num)) => format!(" [{} #{}]", series, num),
        (Some(series), None) => format!(" [{}]", series),
        _ => String::new(),
    };

    println!(
        "  {} {} by {}{}",
        style(&item.isbn).dim(),
        style(&item.title).bold(),
        authors,
        series
    );
}
