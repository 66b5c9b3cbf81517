//! Existence and length checks shared by every array-valued parameter.
//!
//! Short arrays are fatal. Long arrays are accepted: the trailing elements are
//! reported and only the first `expected` elements are used.

use std::fmt::Display;

use crate::error::{ConfigError, ConfigResult};
use crate::keys::ParamKey;

/// Fail with `MissingParameter` when a required array is unset or empty.
pub fn require_array<T>(key: ParamKey, values: &[T]) -> ConfigResult<&[T]> {
    if values.is_empty() {
        return Err(ConfigError::MissingParameter { key });
    }
    Ok(values)
}

/// Reconcile an observed array against its expected length.
///
/// Returns the first `expected` elements.
pub fn reconcile<T: Display>(key: ParamKey, values: &[T], expected: usize) -> ConfigResult<&[T]> {
    if values.len() < expected {
        return Err(ConfigError::LengthTooShort {
            key,
            expected,
            actual: values.len(),
        });
    }
    let (kept, ignored) = values.split_at(expected);
    if !ignored.is_empty() {
        tracing::warn!(
            key = %key,
            expected,
            ignored = %join(ignored),
            "omitting the following `{}'", key
        );
    }
    Ok(kept)
}

fn join<T: Display>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_length_is_silent_success() {
        let values = ["a.dat", "b.dat"];
        let kept = reconcile(ParamKey::PairCountFile, &values, 2).unwrap();
        assert_eq!(kept, &values);
    }

    #[test]
    fn test_long_array_is_truncated() {
        let values = [1.0, 2.0, 3.0, 4.0];
        let kept = reconcile(ParamKey::BoxSize, &values, 3).unwrap();
        assert_eq!(kept, &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_short_array_is_fatal() {
        let values = ["a.dat"];
        let err = reconcile(ParamKey::CfOutputFile, &values, 2).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::LengthTooShort {
                key: ParamKey::CfOutputFile,
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_require_array() {
        let empty: [String; 0] = [];
        assert!(matches!(
            require_array(ParamKey::PairCount, &empty),
            Err(ConfigError::MissingParameter {
                key: ParamKey::PairCount
            })
        ));
        assert_eq!(require_array(ParamKey::PairCount, &["AB"]).unwrap().len(), 1);
    }

    #[test]
    fn test_join() {
        assert_eq!(join(&['C', 'D']), "C D");
    }
}
