//! Raw parameter values and the store they are read from.
//!
//! The resolver only sees the [`ParameterStore`] trait. [`ParamStore`] is the
//! concrete store filled from the command line and the configuration file,
//! keeping for each key the value with the highest priority.

use std::collections::BTreeMap;

use crate::error::{ConfigError, ConfigResult};
use crate::keys::{ParamKey, ParamType};

/// A raw value as supplied by the user.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Real(f64),
    Str(String),
    CharArray(Vec<char>),
    IntArray(Vec<i64>),
    RealArray(Vec<f64>),
    StrArray(Vec<String>),
}

impl ParamValue {
    /// Number of elements (1 for scalars).
    pub fn len(&self) -> usize {
        match self {
            ParamValue::Bool(_)
            | ParamValue::Int(_)
            | ParamValue::Real(_)
            | ParamValue::Str(_) => 1,
            ParamValue::CharArray(v) => v.len(),
            ParamValue::IntArray(v) => v.len(),
            ParamValue::RealArray(v) => v.len(),
            ParamValue::StrArray(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Type of this value.
    pub fn param_type(&self) -> ParamType {
        match self {
            ParamValue::Bool(_) => ParamType::Bool,
            ParamValue::Int(_) => ParamType::Int,
            ParamValue::Real(_) => ParamType::Real,
            ParamValue::Str(_) => ParamType::Str,
            ParamValue::CharArray(_) => ParamType::CharArray,
            ParamValue::IntArray(_) => ParamType::IntArray,
            ParamValue::RealArray(_) => ParamType::RealArray,
            ParamValue::StrArray(_) => ParamType::StrArray,
        }
    }
}

/// Read access to user-supplied parameters.
pub trait ParameterStore {
    /// The value stored under `key`, if the user set it.
    fn value(&self, key: ParamKey) -> Option<&ParamValue>;

    /// Whether the user explicitly set `key`.
    fn is_set(&self, key: ParamKey) -> bool {
        self.value(key).is_some()
    }

    /// Element count of the value under `key` (0 when unset).
    fn size(&self, key: ParamKey) -> usize {
        self.value(key).map_or(0, ParamValue::len)
    }

    fn bool_value(&self, key: ParamKey) -> ConfigResult<Option<bool>> {
        match self.value(key) {
            None => Ok(None),
            Some(ParamValue::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(type_mismatch(key, other)),
        }
    }

    fn int_value(&self, key: ParamKey) -> ConfigResult<Option<i64>> {
        match self.value(key) {
            None => Ok(None),
            Some(ParamValue::Int(i)) => Ok(Some(*i)),
            Some(other) => Err(type_mismatch(key, other)),
        }
    }

    fn str_value(&self, key: ParamKey) -> ConfigResult<Option<&str>> {
        match self.value(key) {
            None => Ok(None),
            Some(ParamValue::Str(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(type_mismatch(key, other)),
        }
    }

    fn chars(&self, key: ParamKey) -> ConfigResult<&[char]> {
        match self.value(key) {
            None => Ok(&[]),
            Some(ParamValue::CharArray(v)) => Ok(v),
            Some(other) => Err(type_mismatch(key, other)),
        }
    }

    fn ints(&self, key: ParamKey) -> ConfigResult<&[i64]> {
        match self.value(key) {
            None => Ok(&[]),
            Some(ParamValue::IntArray(v)) => Ok(v),
            Some(other) => Err(type_mismatch(key, other)),
        }
    }

    fn reals(&self, key: ParamKey) -> ConfigResult<&[f64]> {
        match self.value(key) {
            None => Ok(&[]),
            Some(ParamValue::RealArray(v)) => Ok(v),
            Some(other) => Err(type_mismatch(key, other)),
        }
    }

    fn strs(&self, key: ParamKey) -> ConfigResult<&[String]> {
        match self.value(key) {
            None => Ok(&[]),
            Some(ParamValue::StrArray(v)) => Ok(v),
            Some(other) => Err(type_mismatch(key, other)),
        }
    }
}

fn type_mismatch(key: ParamKey, value: &ParamValue) -> ConfigError {
    ConfigError::invalid(
        key,
        value.param_type(),
        format!("expected {}", key.param_type()),
    )
}

/// Where a value came from. Higher priorities win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    File = 1,
    CommandLine = 5,
}

#[derive(Debug, Clone)]
struct Entry {
    value: ParamValue,
    priority: Priority,
}

/// Parameter store merging several sources by priority.
#[derive(Debug, Clone, Default)]
pub struct ParamStore {
    entries: BTreeMap<ParamKey, Entry>,
}

impl ParamStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key` unless a higher-priority value is present.
    ///
    /// Returns whether the value was stored.
    pub fn set(&mut self, key: ParamKey, value: ParamValue, priority: Priority) -> bool {
        match self.entries.get(&key) {
            Some(existing) if existing.priority > priority => false,
            _ => {
                self.entries.insert(key, Entry { value, priority });
                true
            }
        }
    }

    /// Builder-style variant of [`ParamStore::set`] at command-line priority.
    pub fn with(mut self, key: ParamKey, value: ParamValue) -> Self {
        self.set(key, value, Priority::CommandLine);
        self
    }

    /// Priority of the value stored under `key`.
    pub fn priority(&self, key: ParamKey) -> Option<Priority> {
        self.entries.get(&key).map(|e| e.priority)
    }

    /// Keys that currently hold a value.
    pub fn keys(&self) -> impl Iterator<Item = ParamKey> + '_ {
        self.entries.keys().copied()
    }
}

impl ParameterStore for ParamStore {
    fn value(&self, key: ParamKey) -> Option<&ParamValue> {
        self.entries.get(&key).map(|e| &e.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_overrides_file() {
        let mut store = ParamStore::new();
        assert!(store.set(ParamKey::Overwrite, ParamValue::Int(0), Priority::File));
        assert!(store.set(ParamKey::Overwrite, ParamValue::Int(2), Priority::CommandLine));
        assert!(!store.set(ParamKey::Overwrite, ParamValue::Int(1), Priority::File));
        assert_eq!(store.int_value(ParamKey::Overwrite).unwrap(), Some(2));
        assert_eq!(store.priority(ParamKey::Overwrite), Some(Priority::CommandLine));
    }

    #[test]
    fn test_size_and_is_set() {
        let store = ParamStore::new()
            .with(ParamKey::BoxSize, ParamValue::RealArray(vec![1.0, 2.0, 3.0]))
            .with(ParamKey::CatalogLabel, ParamValue::CharArray(vec![]));
        assert_eq!(store.size(ParamKey::BoxSize), 3);
        assert!(store.is_set(ParamKey::CatalogLabel));
        assert_eq!(store.size(ParamKey::CatalogLabel), 0);
        assert!(!store.is_set(ParamKey::PairCount));
        assert_eq!(store.size(ParamKey::PairCount), 0);
    }

    #[test]
    fn test_type_mismatch_is_invalid_value() {
        let store = ParamStore::new().with(ParamKey::Verbose, ParamValue::Int(1));
        let err = store.bool_value(ParamKey::Verbose).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: ParamKey::Verbose,
                ..
            }
        ));
    }

    #[test]
    fn test_unset_arrays_are_empty() {
        let store = ParamStore::new();
        assert!(store.strs(ParamKey::PairCount).unwrap().is_empty());
        assert!(store.reals(ParamKey::BoxSize).unwrap().is_empty());
        assert_eq!(store.int_value(ParamKey::DataStruct).unwrap(), None);
    }
}
