//! The fully resolved configuration record.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::params::{BinningScheme, DataStructure, OutputFormat, OverwritePolicy, PairSpec};

/// Configuration after defaulting and validation.
///
/// Constructed once by the validator and read-only afterwards. All parallel
/// arrays have the length of the array they are parallel to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedConfig {
    /// Configuration file the values were merged from.
    pub config_file: PathBuf,

    /// Number of input catalogs.
    pub catalog_count: usize,

    /// Input catalog files, when given.
    #[serde(default)]
    pub catalogs: Option<Vec<String>>,

    /// One distinct uppercase label per catalog.
    pub labels: Vec<char>,

    /// Weight expressions, when given.
    #[serde(default)]
    pub weights: Option<Vec<String>>,

    /// Whether each catalog carries weights. Always true for now.
    pub has_weight: Vec<bool>,

    /// Side lengths of the periodic box.
    pub box_size: [f64; 3],

    pub data_struct: DataStructure,
    pub binning: BinningScheme,

    /// Pairs to be counted or read.
    pub pairs: Vec<PairSpec>,

    /// Pair count files, parallel to `pairs`.
    #[serde(default)]
    pub pair_files: Option<Vec<PathBuf>>,

    /// Whether each pair is computed (true) or read from its file (false).
    pub compute_pair: Vec<bool>,

    /// Correlation function estimator expressions.
    pub estimators: Vec<String>,

    /// Correlation function output files, parallel to `estimators`.
    #[serde(default)]
    pub cf_files: Option<Vec<PathBuf>>,

    /// Sorted, duplicate-free Legendre multipole orders.
    pub multipoles: Vec<u32>,

    /// Multipole output files, parallel to `estimators`.
    #[serde(default)]
    pub multipole_files: Option<Vec<PathBuf>>,

    /// Whether projected correlation functions are evaluated.
    pub projected: bool,

    /// Projected correlation function files, parallel to `estimators`.
    #[serde(default)]
    pub projected_files: Option<Vec<PathBuf>>,

    pub output_format: OutputFormat,
    pub overwrite: OverwritePolicy,
    pub verbose: bool,
}

impl ResolvedConfig {
    /// Whether any output file is configured.
    pub fn has_outputs(&self) -> bool {
        self.pair_files.is_some()
            || self.cf_files.is_some()
            || self.multipole_files.is_some()
            || self.projected_files.is_some()
    }

    /// Pairs whose counts must be evaluated.
    pub fn pairs_to_compute(&self) -> impl Iterator<Item = PairSpec> + '_ {
        self.pairs
            .iter()
            .zip(&self.compute_pair)
            .filter(|(_, compute)| **compute)
            .map(|(pair, _)| *pair)
    }

    /// Pairs whose counts are read from existing files.
    pub fn pairs_to_read(&self) -> impl Iterator<Item = PairSpec> + '_ {
        self.pairs
            .iter()
            .zip(&self.compute_pair)
            .filter(|(_, compute)| !**compute)
            .map(|(pair, _)| *pair)
    }
}
