//! Parameter keys and their expected value types.
//!
//! Key names are the stable identifiers used in configuration files and
//! error messages.

use serde::{Deserialize, Serialize};

/// Expected shape of the value stored under a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    Bool,
    Int,
    Real,
    Str,
    CharArray,
    IntArray,
    RealArray,
    StrArray,
}

impl ParamType {
    /// Whether values of this type are arrays.
    pub fn is_array(self) -> bool {
        matches!(
            self,
            ParamType::CharArray | ParamType::IntArray | ParamType::RealArray | ParamType::StrArray
        )
    }
}

impl std::fmt::Display for ParamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamType::Bool => write!(f, "boolean"),
            ParamType::Int => write!(f, "integer"),
            ParamType::Real => write!(f, "double"),
            ParamType::Str => write!(f, "string"),
            ParamType::CharArray => write!(f, "character array"),
            ParamType::IntArray => write!(f, "integer array"),
            ParamType::RealArray => write!(f, "double array"),
            ParamType::StrArray => write!(f, "string array"),
        }
    }
}

/// Every parameter understood by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParamKey {
    ConfigFile,
    Catalog,
    CatalogLabel,
    Weight,
    BoxSize,
    DataStruct,
    BinningScheme,
    PairCount,
    PairCountFile,
    CfEstimator,
    CfOutputFile,
    Multipole,
    MultipoleFile,
    ProjectedCf,
    ProjectedFile,
    OutputFormat,
    Overwrite,
    Verbose,
}

impl ParamKey {
    /// All keys, in the order they appear in templates and reports.
    pub const ALL: &'static [ParamKey] = &[
        ParamKey::ConfigFile,
        ParamKey::Catalog,
        ParamKey::CatalogLabel,
        ParamKey::Weight,
        ParamKey::BoxSize,
        ParamKey::DataStruct,
        ParamKey::BinningScheme,
        ParamKey::PairCount,
        ParamKey::PairCountFile,
        ParamKey::CfEstimator,
        ParamKey::CfOutputFile,
        ParamKey::Multipole,
        ParamKey::MultipoleFile,
        ParamKey::ProjectedCf,
        ParamKey::ProjectedFile,
        ParamKey::OutputFormat,
        ParamKey::Overwrite,
        ParamKey::Verbose,
    ];

    /// Configuration-file name of the key.
    pub fn name(self) -> &'static str {
        match self {
            ParamKey::ConfigFile => "CONFIG_FILE",
            ParamKey::Catalog => "CATALOG",
            ParamKey::CatalogLabel => "CATALOG_LABEL",
            ParamKey::Weight => "WEIGHT",
            ParamKey::BoxSize => "BOX_SIZE",
            ParamKey::DataStruct => "DATA_STRUCT",
            ParamKey::BinningScheme => "BINNING_SCHEME",
            ParamKey::PairCount => "PAIR_COUNT",
            ParamKey::PairCountFile => "PAIR_COUNT_FILE",
            ParamKey::CfEstimator => "CF_ESTIMATOR",
            ParamKey::CfOutputFile => "CF_OUTPUT_FILE",
            ParamKey::Multipole => "MULTIPOLE",
            ParamKey::MultipoleFile => "MULTIPOLE_FILE",
            ParamKey::ProjectedCf => "PROJECTED_CF",
            ParamKey::ProjectedFile => "PROJECTED_FILE",
            ParamKey::OutputFormat => "OUTPUT_FORMAT",
            ParamKey::Overwrite => "OVERWRITE",
            ParamKey::Verbose => "VERBOSE",
        }
    }

    /// Look up a key by its configuration-file name.
    pub fn from_name(name: &str) -> Option<ParamKey> {
        ParamKey::ALL.iter().copied().find(|k| k.name() == name)
    }

    /// Expected value type.
    pub fn param_type(self) -> ParamType {
        match self {
            ParamKey::ConfigFile => ParamType::Str,
            ParamKey::CatalogLabel => ParamType::CharArray,
            ParamKey::BoxSize => ParamType::RealArray,
            ParamKey::Multipole => ParamType::IntArray,
            ParamKey::DataStruct
            | ParamKey::BinningScheme
            | ParamKey::OutputFormat
            | ParamKey::Overwrite => ParamType::Int,
            ParamKey::ProjectedCf | ParamKey::Verbose => ParamType::Bool,
            ParamKey::Catalog
            | ParamKey::Weight
            | ParamKey::PairCount
            | ParamKey::PairCountFile
            | ParamKey::CfEstimator
            | ParamKey::CfOutputFile
            | ParamKey::MultipoleFile
            | ParamKey::ProjectedFile => ParamType::StrArray,
        }
    }
}

impl std::fmt::Display for ParamKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_roundtrip() {
        for key in ParamKey::ALL {
            assert_eq!(ParamKey::from_name(key.name()), Some(*key));
        }
        assert_eq!(ParamKey::from_name("catalog_label"), None);
    }

    #[test]
    fn test_param_types() {
        assert_eq!(ParamKey::CatalogLabel.param_type(), ParamType::CharArray);
        assert_eq!(ParamKey::BoxSize.param_type(), ParamType::RealArray);
        assert_eq!(ParamKey::Overwrite.param_type(), ParamType::Int);
        assert!(ParamKey::PairCountFile.param_type().is_array());
        assert!(!ParamKey::Verbose.param_type().is_array());
    }

    #[test]
    fn test_key_serializes_as_config_name() {
        let json = serde_json::to_string(&ParamKey::PairCountFile).unwrap();
        assert_eq!(json, "\"PAIR_COUNT_FILE\"");
    }
}
