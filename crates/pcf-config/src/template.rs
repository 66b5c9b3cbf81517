//! Commented configuration file template.

use std::fmt::Write;

use crate::keys::ParamKey;
use crate::params::{DEFAULT_CONF_FILE, MAX_ELL};

/// Description, allowed values and default of a key, as shown in the template.
fn key_doc(key: ParamKey) -> (&'static str, Option<String>) {
    match key {
        ParamKey::ConfigFile => (
            "Configuration file. Only meaningful on the command line.",
            Some(DEFAULT_CONF_FILE.to_string()),
        ),
        ParamKey::Catalog => ("Input catalog files.", None),
        ParamKey::CatalogLabel => (
            "Distinct uppercase label per catalog, referenced by pair identifiers.",
            Some("A, B, C, ... in catalog order".to_string()),
        ),
        ParamKey::Weight => ("Weight expression per catalog.", None),
        ParamKey::BoxSize => (
            "Side lengths of the periodic box: one value for a cube, or three.",
            None,
        ),
        ParamKey::DataStruct => ("Tree structure: 0 (k-d tree), 1 (ball tree).", Some("0".into())),
        ParamKey::BinningScheme => (
            "Binning: 0 (s), 1 (s & mu), 2 (s_perp & pi).",
            Some("0".into()),
        ),
        ParamKey::PairCount => (
            "Pairs to count, each two catalog labels, e.g. \"DD\". AB and BA differ.",
            None,
        ),
        ParamKey::PairCountFile => (
            "Pair count files, one per pair. Existing files may be read back.",
            None,
        ),
        ParamKey::CfEstimator => ("Correlation function estimators, e.g. \"DD/RR-1\".", None),
        ParamKey::CfOutputFile => ("Correlation function files, one per estimator.", None),
        ParamKey::Multipole => (
            "Legendre multipole orders, requires BINNING_SCHEME = 1.",
            None,
        ),
        ParamKey::MultipoleFile => ("Multipole files, one per estimator.", None),
        ParamKey::ProjectedCf => (
            "Evaluate projected correlation functions, requires BINNING_SCHEME = 2.",
            Some("false".into()),
        ),
        ParamKey::ProjectedFile => ("Projected correlation function files, one per estimator.", None),
        ParamKey::OutputFormat => ("Pair count file format: 0 (binary), 1 (ASCII).", Some("0".into())),
        ParamKey::Overwrite => (
            "Existing files: 0 abort, 1 overwrite derived results only, 2 overwrite all, \
             negative to ask up to |OVERWRITE| times.",
            Some("0".into()),
        ),
        ParamKey::Verbose => ("Print the resolved configuration.", Some("true".into())),
    }
}

/// A TOML template listing every file-settable key, commented out.
pub fn config_template() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Pair counting configuration.");
    let _ = writeln!(out, "# Command-line options take precedence over this file.");

    for key in ParamKey::ALL.iter().copied() {
        if key == ParamKey::ConfigFile {
            continue;
        }
        let (doc, default) = key_doc(key);
        let _ = writeln!(out);
        let _ = writeln!(out, "# {}", doc);
        let _ = writeln!(out, "# Type: {}.", key.param_type());
        if key == ParamKey::Multipole {
            let _ = writeln!(out, "# Allowed values: 0 to {}.", MAX_ELL);
        }
        match default {
            Some(default) => {
                let _ = writeln!(out, "# Default: {}.", default);
            }
            None => {
                let _ = writeln!(out, "# No default.");
            }
        }
        let _ = writeln!(out, "#{} = {}", key.name(), example(key));
    }
    out
}

fn example(key: ParamKey) -> &'static str {
    match key {
        ParamKey::Catalog => "[\"data.txt\", \"rand.txt\"]",
        ParamKey::CatalogLabel => "[\"D\", \"R\"]",
        ParamKey::Weight => "[\"1\", \"1\"]",
        ParamKey::BoxSize => "1000.0",
        ParamKey::PairCount => "[\"DD\", \"DR\", \"RR\"]",
        ParamKey::PairCountFile => "[\"DD.dat\", \"DR.dat\", \"RR.dat\"]",
        ParamKey::CfEstimator => "[\"(DD - 2*DR + RR) / RR\"]",
        ParamKey::CfOutputFile => "[\"cf.dat\"]",
        ParamKey::Multipole => "[0, 2, 4]",
        ParamKey::MultipoleFile => "[\"mp.dat\"]",
        ParamKey::ProjectedFile => "[\"wp.dat\"]",
        ParamKey::ProjectedCf => "false",
        ParamKey::Verbose => "true",
        ParamKey::ConfigFile => "\"pcf_box.toml\"",
        ParamKey::DataStruct
        | ParamKey::BinningScheme
        | ParamKey::OutputFormat
        | ParamKey::Overwrite => "0",
    }
}
