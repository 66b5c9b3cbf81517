//! Configuration resolution errors.
//!
//! Every failure aborts the whole resolution. Errors carry the offending key
//! name and, where relevant, the offending value so they can be shown to the
//! user as-is.

use std::path::PathBuf;
use thiserror::Error;

use crate::keys::ParamKey;

/// Result type for configuration resolution.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Parameter values that are missing, malformed or inconsistent.
    Config,
    /// Output files that cannot be written or read back.
    File,
    /// Failed reservation for a resolved array.
    Memory,
    /// Errors reading or parsing the configuration file itself.
    Source,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::File => write!(f, "file"),
            ErrorCategory::Memory => write!(f, "memory"),
            ErrorCategory::Source => write!(f, "source"),
        }
    }
}

/// Errors raised while resolving the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    // Parameter errors (10-19)
    #[error("`{key}' is not set")]
    MissingParameter { key: ParamKey },

    #[error("too few elements of `{key}': expected {expected}, got {actual}")]
    LengthTooShort {
        key: ParamKey,
        expected: usize,
        actual: usize,
    },

    #[error("invalid `{key}': {value}")]
    InvalidEnumValue { key: ParamKey, value: i64 },

    #[error("duplicate `{key}': {label}")]
    DuplicateLabel { key: ParamKey, label: char },

    #[error("duplicate `{key}': {pair}")]
    DuplicatePairSpec { key: ParamKey, pair: String },

    #[error("catalog label not found for `{key}': {pair}")]
    UnknownLabelReference { key: ParamKey, pair: String },

    #[error("`{key}' must be between 0 and {max}, got {value}")]
    MultipoleOutOfRange { key: ParamKey, value: i64, max: u32 },

    #[error("invalid `{key}' ({value}): {reason}")]
    InvalidValue {
        key: ParamKey,
        value: String,
        reason: String,
    },

    // Output file errors (20-29)
    #[error("the output file `{key}' is not set")]
    MissingPath { key: ParamKey },

    #[error("cannot access the directory of `{key}': {path}")]
    DirectoryUnreachable { key: ParamKey, path: PathBuf },

    #[error("abort to avoid overwriting `{key}': {path}")]
    WouldOverwrite { key: ParamKey, path: PathBuf },

    #[error("cannot write to `{key}': {path}")]
    NotWritable { key: ParamKey, path: PathBuf },

    #[error("cannot read `{key}': {path}")]
    NotReadable { key: ParamKey, path: PathBuf },

    #[error("too many failed inputs for `{key}': {path}")]
    TooManyInvalidAnswers { key: ParamKey, path: PathBuf },

    // Memory errors (30)
    #[error("failed to allocate memory for `{key}'")]
    AllocationFailure { key: ParamKey },

    // Source errors (40-49)
    #[error("cannot read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse configuration file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

impl ConfigError {
    /// Stable error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ConfigError::MissingParameter { .. } => 10,
            ConfigError::LengthTooShort { .. } => 11,
            ConfigError::InvalidEnumValue { .. } => 12,
            ConfigError::DuplicateLabel { .. } => 13,
            ConfigError::DuplicatePairSpec { .. } => 14,
            ConfigError::UnknownLabelReference { .. } => 15,
            ConfigError::MultipoleOutOfRange { .. } => 16,
            ConfigError::InvalidValue { .. } => 17,
            ConfigError::MissingPath { .. } => 20,
            ConfigError::DirectoryUnreachable { .. } => 21,
            ConfigError::WouldOverwrite { .. } => 22,
            ConfigError::NotWritable { .. } => 23,
            ConfigError::NotReadable { .. } => 24,
            ConfigError::TooManyInvalidAnswers { .. } => 25,
            ConfigError::AllocationFailure { .. } => 30,
            ConfigError::Io { .. } => 40,
            ConfigError::Parse { .. } => 41,
        }
    }

    /// Category used to pick a process exit status.
    pub fn category(&self) -> ErrorCategory {
        match self.code() {
            10..=19 => ErrorCategory::Config,
            20..=29 => ErrorCategory::File,
            30..=39 => ErrorCategory::Memory,
            _ => ErrorCategory::Source,
        }
    }

    /// The parameter key this error concerns, if any.
    pub fn key(&self) -> Option<ParamKey> {
        match self {
            ConfigError::MissingParameter { key }
            | ConfigError::LengthTooShort { key, .. }
            | ConfigError::InvalidEnumValue { key, .. }
            | ConfigError::DuplicateLabel { key, .. }
            | ConfigError::DuplicatePairSpec { key, .. }
            | ConfigError::UnknownLabelReference { key, .. }
            | ConfigError::MultipoleOutOfRange { key, .. }
            | ConfigError::InvalidValue { key, .. }
            | ConfigError::MissingPath { key }
            | ConfigError::DirectoryUnreachable { key, .. }
            | ConfigError::WouldOverwrite { key, .. }
            | ConfigError::NotWritable { key, .. }
            | ConfigError::NotReadable { key, .. }
            | ConfigError::TooManyInvalidAnswers { key, .. }
            | ConfigError::AllocationFailure { key } => Some(*key),
            ConfigError::Io { .. } | ConfigError::Parse { .. } => None,
        }
    }

    pub(crate) fn invalid(key: ParamKey, value: impl ToString, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_grouped_by_category() {
        let missing = ConfigError::MissingParameter {
            key: ParamKey::BoxSize,
        };
        assert_eq!(missing.code(), 10);
        assert_eq!(missing.category(), ErrorCategory::Config);

        let overwrite = ConfigError::WouldOverwrite {
            key: ParamKey::CfOutputFile,
            path: PathBuf::from("out.dat"),
        };
        assert_eq!(overwrite.code(), 22);
        assert_eq!(overwrite.category(), ErrorCategory::File);

        let alloc = ConfigError::AllocationFailure {
            key: ParamKey::CatalogLabel,
        };
        assert_eq!(alloc.category(), ErrorCategory::Memory);

        let parse = ConfigError::Parse {
            path: PathBuf::from("pcf_box.toml"),
            message: "expected `=`".to_string(),
        };
        assert_eq!(parse.category(), ErrorCategory::Source);
        assert!(parse.key().is_none());
    }

    #[test]
    fn test_error_messages_name_the_key() {
        let err = ConfigError::DuplicatePairSpec {
            key: ParamKey::PairCount,
            pair: "AB".to_string(),
        };
        assert_eq!(err.to_string(), "duplicate `PAIR_COUNT': AB");
        assert_eq!(err.key(), Some(ParamKey::PairCount));

        let err = ConfigError::MultipoleOutOfRange {
            key: ParamKey::Multipole,
            value: 8,
            max: 6,
        };
        assert_eq!(err.to_string(), "`MULTIPOLE' must be between 0 and 6, got 8");
    }
}
