//! screenc CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use screenc::ScreenError;
use screenc_cli::{Args, error_adapter::to_reportables};

/// Parses `--log-level`, falling back to `warn` for unknown names.
fn log_level(name: &str) -> LevelFilter {
    LevelFilter::from_str(name).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {name}. Using 'warn' instead.");
        LevelFilter::Warn
    })
}

fn report(err: &ScreenError) {
    let reporter = miette::GraphicalReportHandler::new();
    for reportable in to_reportables(err) {
        let mut rendered = String::new();
        if reporter.render_report(&mut rendered, &reportable).is_err() {
            rendered = reportable.to_string();
        }
        error!("{rendered}");
    }
}

fn main() {
    miette::set_panic_hook();

    let args = Args::parse();
    let level = log_level(&args.log_level);
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(level)
        .init();

    info!(input = args.input, log_level:? = level; "Starting screenc");
    debug!(args:?; "Parsed arguments");

    if let Err(err) = screenc_cli::run(&args) {
        report(&err);
        process::exit(1);
    }

    info!("Completed successfully");
}
