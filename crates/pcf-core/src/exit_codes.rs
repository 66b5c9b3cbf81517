//! Exit codes for the pcf-core CLI.
//!
//! Exit codes communicate the outcome without requiring output parsing.
//!
//! Exit code ranges:
//! - 0: Success (configuration resolved, or template printed)
//! - 2: Argument errors reported by the argument parser
//! - 10-19: User/environment errors (recoverable by user action)
//! - 20-29: Internal errors

use pcf_config::{ConfigError, ErrorCategory};

/// Exit codes for pcf-core operations.
///
/// These codes are a stable contract for automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Configuration resolved successfully
    Clean = 0,

    /// Invalid command-line arguments
    ArgsError = 2,

    // ========================================================================
    // User / Environment Errors (10-19)
    // ========================================================================
    /// Missing, malformed or inconsistent parameter
    ConfigError = 10,

    /// Output file cannot be used
    FileError = 11,

    /// Configuration file cannot be read or parsed
    SourceError = 12,

    // ========================================================================
    // Internal Errors (20-29)
    // ========================================================================
    /// Internal error, including failed allocations
    InternalError = 20,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == ExitCode::Clean
    }

    /// Check if this exit code is a user/environment error (codes 10-19).
    pub fn is_user_error(self) -> bool {
        (10..20).contains(&self.as_i32())
    }

    pub fn is_internal_error(self) -> bool {
        self.as_i32() >= 20
    }

    /// Check if this exit code indicates any error.
    pub fn is_error(self) -> bool {
        self != ExitCode::Clean
    }

    /// Get the code name as a string constant (for JSON output).
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::FileError => "ERR_FILE",
            ExitCode::SourceError => "ERR_SOURCE",
            ExitCode::InternalError => "ERR_INTERNAL",
        }
    }
}

impl From<ErrorCategory> for ExitCode {
    fn from(category: ErrorCategory) -> Self {
        match category {
            ErrorCategory::Config => ExitCode::ConfigError,
            ErrorCategory::File => ExitCode::FileError,
            ErrorCategory::Source => ExitCode::SourceError,
            ErrorCategory::Memory => ExitCode::InternalError,
        }
    }
}

impl From<&ConfigError> for ExitCode {
    fn from(err: &ConfigError) -> Self {
        err.category().into()
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcf_config::ParamKey;
    use std::path::PathBuf;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Clean.as_i32(), 0);
        assert_eq!(ExitCode::ArgsError.as_i32(), 2);
        assert_eq!(ExitCode::ConfigError.as_i32(), 10);
        assert_eq!(ExitCode::FileError.as_i32(), 11);
        assert_eq!(ExitCode::SourceError.as_i32(), 12);
        assert_eq!(ExitCode::InternalError.as_i32(), 20);
    }

    #[test]
    fn test_classification() {
        assert!(ExitCode::Clean.is_success());
        assert!(!ExitCode::Clean.is_error());
        assert!(ExitCode::FileError.is_user_error());
        assert!(ExitCode::InternalError.is_internal_error());
        assert!(!ExitCode::ArgsError.is_user_error());
        assert!(ExitCode::ArgsError.is_error());
    }

    #[test]
    fn test_from_config_error() {
        let missing = ConfigError::MissingParameter {
            key: ParamKey::BoxSize,
        };
        assert_eq!(ExitCode::from(&missing), ExitCode::ConfigError);

        let overwrite = ConfigError::WouldOverwrite {
            key: ParamKey::CfOutputFile,
            path: PathBuf::from("cf.dat"),
        };
        assert_eq!(ExitCode::from(&overwrite), ExitCode::FileError);

        let alloc = ConfigError::AllocationFailure {
            key: ParamKey::PairCount,
        };
        assert_eq!(ExitCode::from(&alloc), ExitCode::InternalError);

        let parse = ConfigError::Parse {
            path: PathBuf::from("pcf_box.toml"),
            message: "bad".to_string(),
        };
        assert_eq!(ExitCode::from(&parse), ExitCode::SourceError);
    }

    #[test]
    fn test_display() {
        assert_eq!(ExitCode::FileError.to_string(), "ERR_FILE (11)");
    }
}
