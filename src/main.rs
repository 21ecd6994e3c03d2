//! Toolsense CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use toolsense::cli::{Cli, CommandDispatcher};
use toolsense::config::load_settings;
use toolsense::ui::{OutputMode, TerminalUI, UserInterface};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `--quiet` lowers it to WARN
/// 3. `RUST_LOG` environment variable (if set)
/// 4. Default is INFO
fn init_tracing(debug: bool, quiet: bool) {
    let filter = if debug {
        EnvFilter::new("toolsense=debug")
    } else if quiet {
        EnvFilter::new("toolsense=warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("toolsense=info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match load_settings(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            init_tracing(cli.debug, cli.quiet);
            let mut ui = TerminalUI::new(OutputMode::Normal, cli.no_color);
            ui.error(&format!("Error: {}", e));
            return ExitCode::from(2);
        }
    };

    let verbose = cli.verbose || settings.verbose;
    let quiet = cli.quiet || settings.quiet;
    init_tracing(cli.debug, quiet);
    tracing::debug!("Toolsense starting with args: {:?}", cli);

    let mut ui = TerminalUI::new(OutputMode::from_flags(verbose, quiet), cli.no_color);
    let mut dispatcher = CommandDispatcher::new(settings);

    match dispatcher.dispatch(&cli, &mut ui) {
        Ok(result) => ExitCode::from(result.exit_code.clamp(0, 255) as u8),
        Err(e) => {
            ui.error(&format!("Error: {}", e));
            ExitCode::from(if e.is_fatal() { 3 } else { 1 })
        }
    }
}
