//! Speedtest Notifier - Main CLI Application
//!
//! Posts a speed test result picture, with a generated summary caption,
//! to the Telegram chat configured in pref.ini.

use clap::Parser;
use speedtest_notifier::{
    app::App,
    cli::Cli,
    error::{AppError, ErrorReporter, Result},
    PKG_NAME, VERSION,
};
use std::process;

#[tokio::main]
async fn main() {
    // Set up better panic handling
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(99);
    }));

    let cli = Cli::parse();
    let reporter = ErrorReporter::new(cli.use_colors(), cli.verbose || cli.debug);

    if let Err(e) = run_application(cli).await {
        reporter.report_error(&e);
        print_error_suggestions(&e);
        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run_application(cli: Cli) -> Result<()> {
    if cli.debug {
        println!("{} v{} ({})", PKG_NAME, VERSION, env!("TARGET_TRIPLE"));
        println!("Debug mode enabled");
        println!();
    }

    App::new(cli)?.run().await?;
    Ok(())
}

/// Print helpful suggestions for common errors
fn print_error_suggestions(error: &AppError) {
    match error {
        AppError::Config(_) => {
            eprintln!();
            eprintln!("Configuration help:");
            eprintln!("  - Run with --print-example-config to see the expected [telegram] section");
            eprintln!("  - TELEGRAM_ENABLE and TELEGRAM_SEND_CAPTION accept true/false, 1/0, yes/no, on/off");
        }
        AppError::Network(_) | AppError::Timeout(_) => {
            eprintln!();
            eprintln!("Network troubleshooting:");
            eprintln!("  - Check that api.telegram.org is reachable from this machine");
            eprintln!("  - Verify proxy and firewall settings");
        }
        AppError::Api(_) => {
            eprintln!();
            eprintln!("Telegram API help:");
            eprintln!("  - \"Unauthorized\" means the bot token is wrong or revoked");
            eprintln!("  - \"chat not found\" means the bot was never added to the chat");
            eprintln!("  - Channel ids look like @channel_name or -100XXXXXXXXXX");
        }
        AppError::Io(_) => {
            eprintln!();
            eprintln!("File help:");
            eprintln!("  - Check that the --photo and --results paths exist and are readable");
        }
        _ => {}
    }
}
