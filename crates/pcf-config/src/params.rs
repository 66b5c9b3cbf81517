//! Enumerated parameters, pair identifiers and static defaults.
//!
//! Integer codes are stable: they are what users write in configuration
//! files and what stored configurations contain.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::keys::ParamKey;

/// Highest multipole order that can be evaluated.
pub const MAX_ELL: u32 = 6;

/// Configuration file used when `CONFIG_FILE` is unset.
pub const DEFAULT_CONF_FILE: &str = "pcf_box.toml";

pub const DEFAULT_STRUCT: DataStructure = DataStructure::KdTree;
pub const DEFAULT_BINNING: BinningScheme = BinningScheme::Isotropic;
pub const DEFAULT_OUTPUT_FORMAT: OutputFormat = OutputFormat::Binary;
pub const DEFAULT_OVERWRITE: OverwritePolicy = OverwritePolicy::NONE;
pub const DEFAULT_PROJECTED_CF: bool = false;
pub const DEFAULT_VERBOSE: bool = true;

/// Tree used for pair counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataStructure {
    KdTree = 0,
    BallTree = 1,
}

impl DataStructure {
    pub fn from_code(code: i64) -> ConfigResult<Self> {
        match code {
            0 => Ok(DataStructure::KdTree),
            1 => Ok(DataStructure::BallTree),
            _ => Err(ConfigError::InvalidEnumValue {
                key: ParamKey::DataStruct,
                value: code,
            }),
        }
    }

    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn describe(self) -> &'static str {
        match self {
            DataStructure::KdTree => "k-d tree",
            DataStructure::BallTree => "ball tree",
        }
    }
}

/// Geometric binning of pair separations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinningScheme {
    /// Isotropic separation bins.
    Isotropic = 0,
    /// (s, mu) bins, required by multipoles.
    SMu = 1,
    /// (s_perp, pi) bins, required by projected correlation functions.
    SPerpPi = 2,
}

impl BinningScheme {
    pub fn from_code(code: i64) -> ConfigResult<Self> {
        match code {
            0 => Ok(BinningScheme::Isotropic),
            1 => Ok(BinningScheme::SMu),
            2 => Ok(BinningScheme::SPerpPi),
            _ => Err(ConfigError::InvalidEnumValue {
                key: ParamKey::BinningScheme,
                value: code,
            }),
        }
    }

    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn describe(self) -> &'static str {
        match self {
            BinningScheme::Isotropic => "s",
            BinningScheme::SMu => "s & mu",
            BinningScheme::SPerpPi => "s_perp & pi",
        }
    }
}

/// Format of pair count output files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Binary = 0,
    Ascii = 1,
}

impl OutputFormat {
    pub fn from_code(code: i64) -> ConfigResult<Self> {
        match code {
            0 => Ok(OutputFormat::Binary),
            1 => Ok(OutputFormat::Ascii),
            _ => Err(ConfigError::InvalidEnumValue {
                key: ParamKey::OutputFormat,
                value: code,
            }),
        }
    }

    pub fn code(self) -> i64 {
        self as i64
    }

    pub fn describe(self) -> &'static str {
        match self {
            OutputFormat::Binary => "binary",
            OutputFormat::Ascii => "ASCII",
        }
    }
}

/// Overwrite policy for existing output files.
///
/// `0` rejects every existing file, `1` overwrites derived outputs only and
/// reads existing pair counts back, `2` or more overwrites everything, and a
/// negative value asks the user with `|value|` attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverwritePolicy(pub i32);

impl OverwritePolicy {
    pub const NONE: OverwritePolicy = OverwritePolicy(0);
    pub const DERIVED_ONLY: OverwritePolicy = OverwritePolicy(1);
    pub const ALL: OverwritePolicy = OverwritePolicy(2);

    pub fn from_code(code: i64) -> ConfigResult<Self> {
        i32::try_from(code)
            .map(OverwritePolicy)
            .map_err(|_| ConfigError::InvalidEnumValue {
                key: ParamKey::Overwrite,
                value: code,
            })
    }

    /// Whether the user must be asked before touching an existing file.
    pub fn is_ask(self) -> bool {
        self.0 < 0
    }

    /// Number of answers allowed in ask mode.
    pub fn retry_budget(self) -> u32 {
        self.0.unsigned_abs()
    }
}

impl std::fmt::Display for OverwritePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A two-letter pair identifier such as `DD` or `DR`.
///
/// Identifiers are compared positionally: `AB` and `BA` are distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PairSpec {
    pub first: char,
    pub second: char,
}

impl PairSpec {
    /// Parse an identifier made of exactly two uppercase letters.
    pub fn parse(s: &str) -> Option<PairSpec> {
        let mut chars = s.chars();
        let (first, second) = (chars.next()?, chars.next()?);
        if chars.next().is_some() || !first.is_ascii_uppercase() || !second.is_ascii_uppercase() {
            return None;
        }
        Some(PairSpec { first, second })
    }

    /// Auto pairs count a catalog against itself.
    pub fn is_auto(self) -> bool {
        self.first == self.second
    }

    /// Whether both letters are among `labels`.
    pub fn references(self, labels: &[char]) -> bool {
        labels.contains(&self.first) && labels.contains(&self.second)
    }
}

impl std::fmt::Display for PairSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.first, self.second)
    }
}

impl TryFrom<String> for PairSpec {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        PairSpec::parse(&s).ok_or_else(|| format!("invalid pair identifier: {}", s))
    }
}

impl From<PairSpec> for String {
    fn from(pair: PairSpec) -> Self {
        pair.to_string()
    }
}
