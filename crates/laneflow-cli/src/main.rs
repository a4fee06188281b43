//! Laneflow CLI entry point.

use std::process;

use clap::Parser;
use log::{debug, error};

use laneflow_cli::{Args, CliError, error_adapter::to_reportables};

fn main() {
    // Install miette's pretty panic hook before anything can fail
    miette::set_panic_hook();

    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(args.log_level)
        .init();

    debug!(args:?; "Parsed arguments");

    if let Err(err) = laneflow_cli::run(&args) {
        report(&err);
        process::exit(1);
    }
}

/// Renders every diagnostic carried by the error as its own miette report.
fn report(err: &CliError) {
    let handler = miette::GraphicalReportHandler::new();
    let mut rendered = String::new();

    for reportable in to_reportables(err) {
        rendered.clear();
        if handler.render_report(&mut rendered, &reportable).is_ok() {
            error!("{rendered}");
        }
    }
}
