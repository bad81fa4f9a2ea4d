//! audiobook-sync - CLI entry point.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use audiobook_sync::{
    api::LibraryApi,
    cli::Args,
    config::{parse_isbn, validate_config, Config},
    error::{exit_codes, Error, Result},
    ledger::{JsonLedger, Ledger},
    output::{
        print_banner, print_book, print_config_summary, print_error, print_info,
        print_ledger, print_run_stats, print_success, print_warning,
    },
    prompt::TerminalPrompt,
    sync::{sync_library, SyncEngine, SyncOptions},
    transfer::HttpTransfer,
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => ExitCode::from(code as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            if e.is_setup_error() {
                print_info("Run again from a terminal to enter the missing values, or pass them as flags.");
            }
            let code = match e {
                Error::Config(_)
                | Error::ConfigValidation { .. }
                | Error::TomlParse(_)
                | Error::MissingCredentials
                | Error::MissingDownloadDirectory => exit_codes::CONFIG_ERROR,
                Error::Authentication(_)
                | Error::Api(_)
                | Error::RateLimited(_)
                | Error::NotAuthenticated
                | Error::MetadataResolutionFailed { .. } => exit_codes::API_ERROR,
                Error::DownloadFailed(_) | Error::Transfer(_) | Error::Archive(_) => {
                    exit_codes::DOWNLOAD_ERROR
                }
                _ => exit_codes::UNEXPECTED_ERROR,
            };
            ExitCode::from(code as u8)
        }
    }
}

async fn run() -> Result<i32> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    if !args.quiet {
        print_banner();
    }

    // Load configuration
    let config_path = args.config_path();
    let mut config = Config::load_or_default(&config_path)?;

    // Merge CLI arguments into config
    args.merge_into_config(&mut config);

    // Validate configuration
    validate_config(&config)?;

    if args.logout {
        config.session.logout();
        config.save(&config_path)?;
        print_success("Logged out");
        return Ok(exit_codes::SUCCESS);
    }

    let ledger = Arc::new(JsonLedger::open(config.ledger_path()).await?);

    if args.list {
        print_ledger(&ledger.records().await?);
        return Ok(exit_codes::SUCCESS);
    }

    let only_isbns = args
        .isbns
        .iter()
        .map(|isbn| parse_isbn(isbn))
        .collect::<Result<Vec<_>>>()?;

    // Wire the engine
    let api = LibraryApi::new(&config.options.api_base_url)?;
    let prompt = if args.no_input {
        TerminalPrompt::non_interactive()
    } else {
        TerminalPrompt::new()
    };
    let engine = SyncEngine::new(
        Arc::new(api.clone()),
        ledger.clone(),
        Arc::new(HttpTransfer::new(api, !args.quiet)),
        Arc::new(prompt),
    );

    // Persist the session as soon as it is usable
    engine.initialize_session(&mut config.session).await?;
    config.save(&config_path)?;

    if !args.quiet {
        print_config_summary(
            config.session.username.as_deref().unwrap_or("(token only)"),
            &config
                .session
                .download_directory()
                .map(|d| d.display().to_string())
                .unwrap_or_default(),
            &ledger.path().display().to_string(),
        );
    }

    let options = SyncOptions {
        overwrite: config.options.overwrite,
        keep_archives: config.options.keep_archives,
        dry_run: args.dry_run,
        only_isbns,
        download_delay: Duration::from_millis(config.options.download_delay_ms),
    };

    let result = sync_library(&engine, &mut config.session, &options).await;

    // A failed catalog listing logs the session out; keep that on disk
    if let Err(e) = config.save(&config_path) {
        print_warning(&format!("Failed to save configuration: {}", e));
    }

    let (stats, items) = result?;

    if stats.catalog_incomplete {
        print_warning("The library listing was interrupted. Run again to log in and continue.");
    }

    if stats.session_expired {
        print_warning("The session expired during the run. Run again to log in and continue.");
    }

    if args.dry_run {
        print_info(&format!("{} books would be downloaded:", items.len()));
        for item in &items {
            print_book(item);
        }
        return Ok(exit_codes::SUCCESS);
    }

    if items.is_empty() && !stats.catalog_incomplete {
        print_success("Library is up to date");
        return Ok(exit_codes::SUCCESS);
    }

    print_run_stats(&stats);

    if stats.has_failures() {
        print_error(&format!("{} book(s) failed", stats.failed));
        return Ok(exit_codes::SOME_BOOKS_FAILED);
    }

    Ok(exit_codes::SUCCESS)
}
