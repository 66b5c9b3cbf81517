//! TOML configuration file source.
//!
//! The file is a flat table of `KEY = value` entries using the key names of
//! [`ParamKey`]. Values are converted to the shape the key expects: a scalar
//! given for an array key becomes a one-element array, and character arrays
//! take one-character strings.
//!
//! ```toml
//! CATALOG_LABEL = ["D", "R"]
//! BOX_SIZE = 1000.0
//! PAIR_COUNT = ["DD", "DR", "RR"]
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};
use crate::keys::{ParamKey, ParamType};
use crate::store::{ParamStore, ParamValue, Priority};

/// Known entries and unknown key names of a parsed file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFile {
    pub values: Vec<(ParamKey, ParamValue)>,
    pub unknown_keys: Vec<String>,
}

/// What happened when loading a configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The file does not exist or cannot be accessed.
    Missing { path: PathBuf },
    /// The file was parsed and `applied` values made it into the store.
    Loaded {
        path: PathBuf,
        applied: usize,
        unknown_keys: Vec<String>,
    },
}

/// Parse configuration text. `path` is only used in error messages.
pub fn parse_str(text: &str, path: &Path) -> ConfigResult<ParsedFile> {
    let table: toml::Table = toml::from_str(text).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })?;

    let mut parsed = ParsedFile::default();
    for (name, value) in &table {
        match ParamKey::from_name(name) {
            Some(ParamKey::ConfigFile) => {
                tracing::warn!(key = %name, "`{}' is ignored in configuration files", name);
            }
            Some(key) => parsed.values.push((key, convert(key, value)?)),
            None => {
                tracing::warn!(key = %name, path = %path.display(), "unknown configuration key `{}'", name);
                parsed.unknown_keys.push(name.clone());
            }
        }
    }
    Ok(parsed)
}

/// Merge the file at `path` into `store` at file priority.
///
/// A file that is absent or not accessible only produces a warning, since
/// command-line options alone may be sufficient.
pub fn load_into(store: &mut ParamStore, path: &Path) -> ConfigResult<LoadOutcome> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::PermissionDenied) => {
            tracing::warn!(path = %path.display(), "cannot access the configuration file: `{}'", path.display());
            return Ok(LoadOutcome::Missing {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let parsed = parse_str(&text, path)?;
    let mut applied = 0;
    for (key, value) in parsed.values {
        if store.set(key, value, Priority::File) {
            applied += 1;
        } else {
            tracing::debug!(key = %key, "command-line value takes precedence");
        }
    }
    tracing::debug!(path = %path.display(), applied, "configuration file loaded");

    Ok(LoadOutcome::Loaded {
        path: path.to_path_buf(),
        applied,
        unknown_keys: parsed.unknown_keys,
    })
}

/// Convert a TOML value to the shape `key` expects.
fn convert(key: ParamKey, value: &toml::Value) -> ConfigResult<ParamValue> {
    let ty = key.param_type();
    let mismatch = || ConfigError::invalid(key, describe(value), format!("expected {}", ty));

    if ty.is_array() {
        let items: &[toml::Value] = match value {
            toml::Value::Array(items) => items.as_slice(),
            scalar => std::slice::from_ref(scalar),
        };
        return match ty {
            ParamType::CharArray => items
                .iter()
                .map(|v| as_char(v).ok_or_else(mismatch))
                .collect::<ConfigResult<_>>()
                .map(ParamValue::CharArray),
            ParamType::IntArray => items
                .iter()
                .map(|v| v.as_integer().ok_or_else(mismatch))
                .collect::<ConfigResult<_>>()
                .map(ParamValue::IntArray),
            ParamType::RealArray => items
                .iter()
                .map(|v| as_real(v).ok_or_else(mismatch))
                .collect::<ConfigResult<_>>()
                .map(ParamValue::RealArray),
            _ => items
                .iter()
                .map(|v| v.as_str().map(str::to_string).ok_or_else(mismatch))
                .collect::<ConfigResult<_>>()
                .map(ParamValue::StrArray),
        };
    }

    match (ty, value) {
        (ParamType::Bool, toml::Value::Boolean(b)) => Ok(ParamValue::Bool(*b)),
        (ParamType::Int, toml::Value::Integer(i)) => Ok(ParamValue::Int(*i)),
        (ParamType::Real, v) => as_real(v).map(ParamValue::Real).ok_or_else(mismatch),
        (ParamType::Str, toml::Value::String(s)) => Ok(ParamValue::Str(s.clone())),
        _ => Err(mismatch()),
    }
}

fn as_char(value: &toml::Value) -> Option<char> {
    let s = value.as_str()?;
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn as_real(value: &toml::Value) -> Option<f64> {
    match value {
        toml::Value::Float(f) => Some(*f),
        toml::Value::Integer(i) => Some(*i as f64),
        _ => None,
    }
}

fn describe(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => format!("{:?}", s),
        other => other.to_string(),
    }
}
