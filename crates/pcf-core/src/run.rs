//! One configuration run: load, resolve, report.

use std::io::Write;

use pcf_config::source::{self, LoadOutcome};
use pcf_config::{
    AnswerSource, ConfigError, ConfigReporter, ConfigSnapshot, ConfigValidator, FsProbe,
    ResolvedConfig,
};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::cli::Cli;
use crate::exit_codes::ExitCode;
use crate::logging::{event_names, Stage};

/// Errors ending a run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to serialize the configuration snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl RunError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            RunError::Config(e) => ExitCode::from(e),
            RunError::Snapshot(_) => ExitCode::InternalError,
            RunError::Output(_) => ExitCode::FileError,
        }
    }
}

/// Load the configuration file named on the command line and resolve the
/// merged parameters.
pub fn resolve(cli: &Cli, answers: &mut dyn AnswerSource) -> Result<ResolvedConfig, RunError> {
    let mut store = cli.params.to_store();
    let path = cli.params.config_path();

    {
        let span = tracing::info_span!("load", stage = %Stage::Load);
        let _guard = span.enter();
        match source::load_into(&mut store, &path)? {
            LoadOutcome::Missing { path } => {
                warn!(target: event_names::CONFIG_MISSING, path = %path.display(), "using command-line options only");
            }
            LoadOutcome::Loaded {
                path,
                applied,
                unknown_keys,
            } => {
                info!(
                    target: event_names::CONFIG_LOADED,
                    path = %path.display(),
                    applied,
                    unknown = unknown_keys.len(),
                    "configuration file loaded"
                );
            }
        }
    }

    let span = tracing::info_span!("resolve", stage = %Stage::Resolve);
    let _guard = span.enter();
    let config = ConfigValidator::new(&FsProbe, answers).resolve(&store)?;
    info!(
        target: event_names::CONFIG_RESOLVED,
        catalogs = config.catalog_count,
        computed = config.pairs_to_compute().count(),
        read_back = config.pairs_to_read().count(),
        estimators = config.estimators.len(),
        "configuration resolved"
    );
    Ok(config)
}

/// Write the report and, if requested, the snapshot to `out`.
pub fn emit(cli: &Cli, config: &ResolvedConfig, out: &mut dyn Write) -> Result<(), RunError> {
    let span = tracing::info_span!("report", stage = %Stage::Report);
    let _guard = span.enter();

    if config.verbose {
        write!(out, "{}", ConfigReporter::new(config))?;
    }
    if cli.global.emit_json {
        let snapshot = ConfigSnapshot::capture(config)?;
        debug!(hash = %snapshot.short_id(), "snapshot captured");
        writeln!(out, "{}", snapshot.to_json()?)?;
    }
    out.flush()?;
    Ok(())
}

/// Run the full pipeline and map the outcome to an exit code.
///
/// Errors are printed to `err` in addition to being logged.
pub fn execute(
    cli: &Cli,
    answers: &mut dyn AnswerSource,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> ExitCode {
    if cli.global.template {
        return match out.write_all(pcf_config::template::config_template().as_bytes()) {
            Ok(()) => ExitCode::Clean,
            Err(e) => report_failure(&RunError::Output(e), err),
        };
    }

    let result = resolve(cli, answers).and_then(|config| emit(cli, &config, out));
    match result {
        Ok(()) => ExitCode::Clean,
        Err(e) => report_failure(&e, err),
    }
}

fn report_failure(e: &RunError, err: &mut dyn Write) -> ExitCode {
    let code = e.exit_code();
    error!(target: event_names::CONFIG_ERROR, exit_code = code.as_i32(), "{}", e);
    let _ = writeln!(err, "error: {}", e);
    code
}
