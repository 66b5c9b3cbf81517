//! Human-readable rendering of a resolved configuration.

use std::fmt;

use crate::keys::ParamKey;
use crate::params::BinningScheme;
use crate::resolved::ResolvedConfig;

/// Width of the key column.
const KEY_WIDTH: usize = 15;

/// Renders a [`ResolvedConfig`] as aligned `KEY = value` lines.
///
/// Multi-valued file parameters print one value per line, with continuation
/// lines aligned under the first value.
pub struct ConfigReporter<'a> {
    config: &'a ResolvedConfig,
}

impl<'a> ConfigReporter<'a> {
    pub fn new(config: &'a ResolvedConfig) -> Self {
        ConfigReporter { config }
    }
}

fn line(f: &mut fmt::Formatter<'_>, key: ParamKey, value: impl fmt::Display) -> fmt::Result {
    writeln!(f, "  {:<width$} = {}", key.name(), value, width = KEY_WIDTH)
}

fn lines<T: fmt::Display>(f: &mut fmt::Formatter<'_>, key: ParamKey, values: &[T]) -> fmt::Result {
    for (i, value) in values.iter().enumerate() {
        if i == 0 {
            line(f, key, value)?;
        } else {
            writeln!(f, "  {:<width$}   {}", "", value, width = KEY_WIDTH)?;
        }
    }
    Ok(())
}

fn joined<T: fmt::Display>(values: &[T], sep: &str) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(sep)
}

impl fmt::Display for ConfigReporter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.config;

        line(f, ParamKey::ConfigFile, c.config_file.display())?;
        if let Some(catalogs) = &c.catalogs {
            lines(f, ParamKey::Catalog, catalogs)?;
        }
        let labels: Vec<String> = c.labels.iter().map(|l| format!("'{}'", l)).collect();
        line(f, ParamKey::CatalogLabel, labels.join(" , "))?;
        if let Some(weights) = &c.weights {
            lines(f, ParamKey::Weight, weights)?;
        }
        line(f, ParamKey::BoxSize, joined(&c.box_size[..], " , "))?;

        line(
            f,
            ParamKey::DataStruct,
            format_args!("{} ({})", c.data_struct.code(), c.data_struct.describe()),
        )?;
        line(
            f,
            ParamKey::BinningScheme,
            format_args!("{} ({})", c.binning.code(), c.binning.describe()),
        )?;
        line(f, ParamKey::PairCount, joined(&c.pairs, " , "))?;

        if let Some(files) = &c.pair_files {
            let tagged: Vec<String> = files
                .iter()
                .zip(&c.compute_pair)
                .map(|(path, compute)| {
                    format!("<{}> {}", if *compute { 'W' } else { 'R' }, path.display())
                })
                .collect();
            lines(f, ParamKey::PairCountFile, &tagged)?;
        }

        if !c.estimators.is_empty() {
            lines(f, ParamKey::CfEstimator, &c.estimators)?;
            if let Some(files) = &c.cf_files {
                lines(f, ParamKey::CfOutputFile, &displayed(files))?;
            }

            if c.binning == BinningScheme::SMu && !c.multipoles.is_empty() {
                line(f, ParamKey::Multipole, joined(&c.multipoles, " , "))?;
                if let Some(files) = &c.multipole_files {
                    lines(f, ParamKey::MultipoleFile, &displayed(files))?;
                }
            }

            if c.binning == BinningScheme::SPerpPi {
                line(f, ParamKey::ProjectedCf, if c.projected { 'T' } else { 'F' })?;
                if let Some(files) = &c.projected_files {
                    lines(f, ParamKey::ProjectedFile, &displayed(files))?;
                }
            }
        }

        if c.has_outputs() {
            line(
                f,
                ParamKey::OutputFormat,
                format_args!("{} ({})", c.output_format.code(), c.output_format.describe()),
            )?;
            line(f, ParamKey::Overwrite, c.overwrite)?;
        }
        Ok(())
    }
}

fn displayed(paths: &[std::path::PathBuf]) -> Vec<String> {
    paths.iter().map(|p| p.display().to_string()).collect()
}
