//! Command-line front end for periodic-box pair counting configuration.
//!
//! This crate provides:
//! - The command-line surface mapping flags onto parameter keys
//! - The load/resolve/report pipeline driving `pcf-config`
//! - Structured logging and stable exit codes

pub mod cli;
pub mod exit_codes;
pub mod logging;
pub mod run;

pub use cli::Cli;
pub use exit_codes::ExitCode;
