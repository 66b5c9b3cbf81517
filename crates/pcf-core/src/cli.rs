//! Command-line surface.
//!
//! Every parameter key has a short and a long flag. Array values are
//! comma-separated and repeated flags append. Values given here take
//! precedence over the configuration file.

use std::path::PathBuf;

use clap::{Args, Parser};
use pcf_config::{ParamKey, ParamStore, ParamValue, Priority};

use crate::logging::{LogFormat, LogLevel};

/// Periodic-box pair counting: configuration resolution and validation
#[derive(Parser, Debug)]
#[command(name = "pcf-core")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub params: ParamArgs,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options that are not configuration parameters.
#[derive(Args, Debug, Default)]
pub struct GlobalOpts {
    /// Print a commented configuration template and exit
    #[arg(short = 't', long)]
    pub template: bool,

    /// Print the resolved configuration snapshot as JSON
    #[arg(long)]
    pub emit_json: bool,

    /// Log level
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Log format on stderr
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub log_format: Option<LogFormat>,
}

/// Configuration parameters accepted on the command line.
#[derive(Args, Debug, Default)]
pub struct ParamArgs {
    /// Configuration file
    #[arg(short = 'c', long = "conf", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Input catalogs
    #[arg(short = 'i', long = "input", value_name = "FILE", value_delimiter = ',')]
    pub catalog: Option<Vec<String>>,

    /// Single-character labels of the catalogs
    #[arg(short = 'l', long = "label", value_name = "CHAR", value_delimiter = ',')]
    pub label: Option<Vec<char>>,

    /// Weight columns of the catalogs
    #[arg(short = 'w', long = "weight", value_name = "EXPR", value_delimiter = ',')]
    pub weight: Option<Vec<String>>,

    /// Side length(s) of the periodic box (one, or one per axis)
    #[arg(
        short = 'b',
        long = "box",
        value_name = "SIZE",
        value_delimiter = ',',
        allow_negative_numbers = true
    )]
    pub box_size: Option<Vec<f64>>,

    /// Data structure for pair counting (0: k-d tree, 1: ball tree)
    #[arg(short = 'S', long = "data-struct", value_name = "INT", allow_negative_numbers = true)]
    pub data_struct: Option<i64>,

    /// Binning scheme (0: s, 1: (s,mu), 2: (s_perp,pi))
    #[arg(short = 'B', long = "bin", value_name = "INT", allow_negative_numbers = true)]
    pub binning: Option<i64>,

    /// Pairs to be counted, e.g. DD,DR,RR
    #[arg(short = 'p', long = "pair", value_name = "PAIR", value_delimiter = ',')]
    pub pair: Option<Vec<String>>,

    /// Output files for pair counts
    #[arg(short = 'P', long = "pair-output", value_name = "FILE", value_delimiter = ',')]
    pub pair_output: Option<Vec<String>>,

    /// Correlation function estimators, e.g. (DD-2*DR+RR)/RR
    #[arg(short = 'e', long = "cf", value_name = "EXPR", value_delimiter = ',')]
    pub cf: Option<Vec<String>>,

    /// Output files for correlation functions
    #[arg(short = 'E', long = "cf-output", value_name = "FILE", value_delimiter = ',')]
    pub cf_output: Option<Vec<String>>,

    /// Legendre multipole orders
    #[arg(
        short = 'm',
        long = "multipole",
        value_name = "ELL",
        value_delimiter = ',',
        allow_negative_numbers = true
    )]
    pub multipole: Option<Vec<i64>>,

    /// Output files for multipoles
    #[arg(short = 'M', long = "mp-output", value_name = "FILE", value_delimiter = ',')]
    pub mp_output: Option<Vec<String>>,

    /// Compute the projected correlation function
    #[arg(
        short = 'u',
        long = "wp",
        value_name = "BOOL",
        num_args = 0..=1,
        default_missing_value = "T",
        value_parser = parse_flag
    )]
    pub wp: Option<bool>,

    /// Output files for projected correlation functions
    #[arg(short = 'U', long = "wp-output", value_name = "FILE", value_delimiter = ',')]
    pub wp_output: Option<Vec<String>>,

    /// Output format (0: binary, 1: ASCII)
    #[arg(short = 'F', long = "out-format", value_name = "INT", allow_negative_numbers = true)]
    pub out_format: Option<i64>,

    /// Overwrite policy (0: none, 1: derived only, 2: all, negative: ask)
    #[arg(short = 'O', long = "overwrite", value_name = "INT", allow_negative_numbers = true)]
    pub overwrite: Option<i64>,

    /// Print the resolved configuration
    #[arg(
        short = 'v',
        long = "verbose",
        value_name = "BOOL",
        num_args = 0..=1,
        default_missing_value = "T",
        value_parser = parse_flag
    )]
    pub verbose: Option<bool>,
}

impl ParamArgs {
    /// Values given on the command line, keyed by parameter.
    pub fn values(&self) -> Vec<(ParamKey, ParamValue)> {
        let mut out = Vec::new();
        let strs = |v: &Option<Vec<String>>| v.clone().map(ParamValue::StrArray);

        let mut push = |key: ParamKey, value: Option<ParamValue>| {
            if let Some(value) = value {
                out.push((key, value));
            }
        };

        push(
            ParamKey::ConfigFile,
            self.config_file
                .as_ref()
                .map(|p| ParamValue::Str(p.to_string_lossy().into_owned())),
        );
        push(ParamKey::Catalog, strs(&self.catalog));
        push(
            ParamKey::CatalogLabel,
            self.label.clone().map(ParamValue::CharArray),
        );
        push(ParamKey::Weight, strs(&self.weight));
        push(
            ParamKey::BoxSize,
            self.box_size.clone().map(ParamValue::RealArray),
        );
        push(ParamKey::DataStruct, self.data_struct.map(ParamValue::Int));
        push(ParamKey::BinningScheme, self.binning.map(ParamValue::Int));
        push(ParamKey::PairCount, strs(&self.pair));
        push(ParamKey::PairCountFile, strs(&self.pair_output));
        push(ParamKey::CfEstimator, strs(&self.cf));
        push(ParamKey::CfOutputFile, strs(&self.cf_output));
        push(
            ParamKey::Multipole,
            self.multipole.clone().map(ParamValue::IntArray),
        );
        push(ParamKey::MultipoleFile, strs(&self.mp_output));
        push(ParamKey::ProjectedCf, self.wp.map(ParamValue::Bool));
        push(ParamKey::ProjectedFile, strs(&self.wp_output));
        push(ParamKey::OutputFormat, self.out_format.map(ParamValue::Int));
        push(ParamKey::Overwrite, self.overwrite.map(ParamValue::Int));
        push(ParamKey::Verbose, self.verbose.map(ParamValue::Bool));

        out
    }

    /// A store holding the command-line values at command-line priority.
    pub fn to_store(&self) -> ParamStore {
        let mut store = ParamStore::new();
        for (key, value) in self.values() {
            store.set(key, value, Priority::CommandLine);
        }
        store
    }

    /// Configuration file to read: `--conf` or the default name.
    pub fn config_path(&self) -> PathBuf {
        self.config_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(pcf_config::params::DEFAULT_CONF_FILE))
    }
}

/// Parse a boolean flag value.
///
/// Accepts 1/0, T/F, true/false, yes/no and on/off, case-insensitively.
pub fn parse_flag(s: &str) -> Result<bool, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "t" | "true" | "y" | "yes" | "on" => Ok(true),
        "0" | "f" | "false" | "n" | "no" | "off" => Ok(false),
        _ => Err(format!("expected a boolean, got `{}'", s)),
    }
}
