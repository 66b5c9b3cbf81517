//! pcf-core: resolve and validate the configuration of a periodic-box
//! pair counting run.
//!
//! The configuration is merged from the command line and a TOML file,
//! checked, and optionally printed as a report or a JSON snapshot.

use clap::Parser;
use pcf_config::LineAnswers;
use pcf_core::cli::Cli;
use pcf_core::logging::{event_names, generate_run_id, init_logging, LogConfig, Stage};
use pcf_core::run::execute;

fn main() {
    let cli = Cli::parse();

    let log_config = LogConfig::from_env(cli.global.log_level, cli.global.log_format);
    init_logging(&log_config);

    let run_id = generate_run_id();
    let span = tracing::info_span!("run", run_id = %run_id, stage = %Stage::Init);
    let _guard = span.enter();
    tracing::debug!(target: event_names::RUN_STARTED, version = env!("CARGO_PKG_VERSION"), "starting");

    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    let exit_code = execute(
        &cli,
        &mut LineAnswers::terminal(),
        &mut stdout.lock(),
        &mut stderr.lock(),
    );

    tracing::debug!(target: event_names::RUN_FINISHED, exit_code = %exit_code, "finished");
    std::process::exit(exit_code.as_i32());
}
