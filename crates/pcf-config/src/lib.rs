//! Configuration resolution for periodic-box pair counting.
//!
//! This crate provides:
//! - A priority parameter store fed by the command line and a TOML file
//! - Resolution of raw parameters into a validated [`ResolvedConfig`]
//! - Output file conflict handling, including interactive confirmation
//! - A human-readable report and hashed snapshots of the result

pub mod confirm;
pub mod error;
pub mod keys;
pub mod output;
pub mod params;
pub mod reconcile;
pub mod report;
pub mod resolved;
pub mod snapshot;
pub mod source;
pub mod store;
pub mod template;
pub mod validator;

pub use confirm::{AnswerSource, ConfirmState, LineAnswers, ScriptedAnswers};
pub use error::{ConfigError, ConfigResult, ErrorCategory};
pub use keys::{ParamKey, ParamType};
pub use output::{FsProbe, OutputConflictResolver, OutputDecision, PathProbe};
pub use params::{BinningScheme, DataStructure, OutputFormat, OverwritePolicy, PairSpec};
pub use report::ConfigReporter;
pub use resolved::ResolvedConfig;
pub use snapshot::ConfigSnapshot;
pub use store::{ParamStore, ParamValue, ParameterStore, Priority};
pub use validator::{resolve_config, ConfigValidator};

/// Schema version of the resolved configuration record.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
