//! Resolution of raw parameters into a [`ResolvedConfig`].
//!
//! Parameter groups are resolved in dependency order: catalogs and labels,
//! box size, enumerations, pair identifiers and their files, estimators and
//! their files, then the multipole or projected block selected by the binning
//! scheme. The first failing check aborts the whole resolution.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::confirm::AnswerSource;
use crate::error::{ConfigError, ConfigResult};
use crate::keys::ParamKey;
use crate::output::{Disposition, FsProbe, OutputConflictResolver, PathProbe};
use crate::params::{
    BinningScheme, DataStructure, OutputFormat, OverwritePolicy, PairSpec, DEFAULT_BINNING,
    DEFAULT_CONF_FILE, DEFAULT_OUTPUT_FORMAT, DEFAULT_OVERWRITE, DEFAULT_PROJECTED_CF,
    DEFAULT_STRUCT, DEFAULT_VERBOSE, MAX_ELL,
};
use crate::reconcile::{reconcile, require_array};
use crate::resolved::ResolvedConfig;
use crate::store::ParameterStore;

/// Number of labels that can be generated automatically (`A` to `Z`).
const MAX_AUTO_LABELS: usize = 26;

/// Resolve `store` against the real file system.
pub fn resolve_config(
    store: &dyn ParameterStore,
    answers: &mut dyn AnswerSource,
) -> ConfigResult<ResolvedConfig> {
    ConfigValidator::new(&FsProbe, answers).resolve(store)
}

/// Catalog-level values resolved together.
struct Catalogs {
    count: usize,
    labels: Vec<char>,
    catalogs: Option<Vec<String>>,
    weights: Option<Vec<String>>,
}

/// Resolves parameter groups, deciding output dispositions on the way.
pub struct ConfigValidator<'a> {
    outputs: OutputConflictResolver<'a>,
}

impl<'a> ConfigValidator<'a> {
    pub fn new(probe: &'a dyn PathProbe, answers: &'a mut dyn AnswerSource) -> Self {
        ConfigValidator {
            outputs: OutputConflictResolver::new(probe, answers),
        }
    }

    /// Build the resolved configuration, or report the first error.
    pub fn resolve(&mut self, store: &dyn ParameterStore) -> ConfigResult<ResolvedConfig> {
        let config_file = PathBuf::from(
            store
                .str_value(ParamKey::ConfigFile)?
                .unwrap_or(DEFAULT_CONF_FILE),
        );

        let cats = resolve_catalogs(store)?;
        let mut has_weight = alloc_vec(ParamKey::Weight, cats.count)?;
        has_weight.resize(cats.count, true);

        let box_size = resolve_box_size(store)?;

        let overwrite = OverwritePolicy::from_code(
            store
                .int_value(ParamKey::Overwrite)?
                .unwrap_or(i64::from(DEFAULT_OVERWRITE.0)),
        )?;
        let data_struct = match store.int_value(ParamKey::DataStruct)? {
            Some(code) => DataStructure::from_code(code)?,
            None => DEFAULT_STRUCT,
        };
        let binning = match store.int_value(ParamKey::BinningScheme)? {
            Some(code) => BinningScheme::from_code(code)?,
            None => DEFAULT_BINNING,
        };

        let pairs = resolve_pairs(store)?;
        let (pair_files, compute_pair) =
            self.resolve_pair_files(store, &pairs, &cats.labels, overwrite)?;

        let estimators = resolve_estimators(store)?;
        let mut cf_files = None;
        let mut multipoles = Vec::new();
        let mut multipole_files = None;
        let mut projected = DEFAULT_PROJECTED_CF;
        let mut projected_files = None;

        if !estimators.is_empty() {
            let ncf = estimators.len();
            cf_files = self.resolve_derived_files(store, ParamKey::CfOutputFile, ncf, overwrite)?;

            match binning {
                BinningScheme::SMu => {
                    let orders = store.ints(ParamKey::Multipole)?;
                    if !orders.is_empty() {
                        multipoles = normalize_multipoles(orders)?;
                        multipole_files = self.resolve_derived_files(
                            store,
                            ParamKey::MultipoleFile,
                            ncf,
                            overwrite,
                        )?;
                    }
                }
                BinningScheme::SPerpPi => {
                    projected = store
                        .bool_value(ParamKey::ProjectedCf)?
                        .unwrap_or(DEFAULT_PROJECTED_CF);
                    if projected {
                        projected_files = self.resolve_derived_files(
                            store,
                            ParamKey::ProjectedFile,
                            ncf,
                            overwrite,
                        )?;
                    }
                }
                BinningScheme::Isotropic => {}
            }
        }

        let output_format = match store.int_value(ParamKey::OutputFormat)? {
            Some(code) => OutputFormat::from_code(code)?,
            None => DEFAULT_OUTPUT_FORMAT,
        };
        let verbose = store
            .bool_value(ParamKey::Verbose)?
            .unwrap_or(DEFAULT_VERBOSE);

        tracing::debug!(
            catalogs = cats.count,
            pairs = pairs.len(),
            estimators = estimators.len(),
            multipoles = multipoles.len(),
            "configuration resolved"
        );

        Ok(ResolvedConfig {
            config_file,
            catalog_count: cats.count,
            catalogs: cats.catalogs,
            labels: cats.labels,
            weights: cats.weights,
            has_weight,
            box_size,
            data_struct,
            binning,
            pairs,
            pair_files,
            compute_pair,
            estimators,
            cf_files,
            multipoles,
            multipole_files,
            projected,
            projected_files,
            output_format,
            overwrite,
            verbose,
        })
    }

    /// Pair count files decide, per pair, whether counts are computed or read.
    ///
    /// Each pair is finished before the next one is looked at, so a pair with
    /// an undeclared label aborts before later files are probed or prompted
    /// for.
    fn resolve_pair_files(
        &mut self,
        store: &dyn ParameterStore,
        pairs: &[PairSpec],
        labels: &[char],
        overwrite: OverwritePolicy,
    ) -> ConfigResult<(Option<Vec<PathBuf>>, Vec<bool>)> {
        let mut compute = alloc_vec(ParamKey::PairCount, pairs.len())?;

        if !store.is_set(ParamKey::PairCountFile) {
            for pair in pairs {
                check_pair_labels(*pair, labels)?;
                compute.push(true);
            }
            return Ok((None, compute));
        }

        let key = ParamKey::PairCountFile;
        let all = require_array(key, store.strs(key)?)?;
        let kept = reconcile(key, all, pairs.len())?;
        let mut paths = alloc_vec(key, pairs.len())?;
        for (pair, path) in pairs.iter().zip(kept) {
            let disposition = self
                .outputs
                .resolve(key, path, overwrite, OverwritePolicy::ALL)
                .into_result(key, path)?;
            let computed = disposition == Disposition::Write;
            if computed {
                check_pair_labels(*pair, labels)?;
            }
            paths.push(PathBuf::from(path));
            compute.push(computed);
        }
        Ok((Some(paths), compute))
    }

    /// Files derived from estimators are overwritten from policy 1 on.
    fn resolve_derived_files(
        &mut self,
        store: &dyn ParameterStore,
        key: ParamKey,
        expected: usize,
        overwrite: OverwritePolicy,
    ) -> ConfigResult<Option<Vec<PathBuf>>> {
        if !store.is_set(key) {
            return Ok(None);
        }
        let paths = self.resolve_output_files(
            store,
            key,
            expected,
            overwrite,
            OverwritePolicy::DERIVED_ONLY,
        )?;
        Ok(Some(paths))
    }

    fn resolve_output_files(
        &mut self,
        store: &dyn ParameterStore,
        key: ParamKey,
        expected: usize,
        overwrite: OverwritePolicy,
        force: OverwritePolicy,
    ) -> ConfigResult<Vec<PathBuf>> {
        let all = require_array(key, store.strs(key)?)?;
        let kept = reconcile(key, all, expected)?;

        let mut paths = alloc_vec(key, expected)?;
        for path in kept {
            self.outputs
                .resolve(key, path, overwrite, force)
                .into_result(key, path)?;
            paths.push(PathBuf::from(path));
        }
        Ok(paths)
    }
}

/// A computed pair needs both of its labels declared.
fn check_pair_labels(pair: PairSpec, labels: &[char]) -> ConfigResult<()> {
    if pair.references(labels) {
        Ok(())
    } else {
        Err(ConfigError::UnknownLabelReference {
            key: ParamKey::PairCount,
            pair: pair.to_string(),
        })
    }
}

/// Catalog count, labels and the per-catalog arrays parallel to them.
fn resolve_catalogs(store: &dyn ParameterStore) -> ConfigResult<Catalogs> {
    let given = store.chars(ParamKey::CatalogLabel)?;
    let catalogs = store.strs(ParamKey::Catalog)?;
    let weights = store.strs(ParamKey::Weight)?;

    let (count, labels) = if !given.is_empty() {
        check_labels(given)?;
        (given.len(), given.to_vec())
    } else {
        let count = if !catalogs.is_empty() {
            catalogs.len()
        } else if !weights.is_empty() {
            weights.len()
        } else {
            return Err(ConfigError::MissingParameter {
                key: ParamKey::Catalog,
            });
        };
        (count, default_labels(count)?)
    };

    let parallel = |key: ParamKey, values: &[String]| -> ConfigResult<Option<Vec<String>>> {
        if store.is_set(key) {
            Ok(Some(reconcile(key, values, count)?.to_vec()))
        } else {
            Ok(None)
        }
    };

    let catalogs = parallel(ParamKey::Catalog, catalogs)?;
    let weights = parallel(ParamKey::Weight, weights)?;

    tracing::debug!(count, labels = %labels.iter().collect::<String>(), "catalogs resolved");
    Ok(Catalogs {
        count,
        labels,
        catalogs,
        weights,
    })
}

/// Labels `A`, `B`, ... in index order.
fn default_labels(count: usize) -> ConfigResult<Vec<char>> {
    if count > MAX_AUTO_LABELS {
        return Err(ConfigError::invalid(
            ParamKey::CatalogLabel,
            count,
            format!("cannot label more than {} catalogs automatically", MAX_AUTO_LABELS),
        ));
    }
    let mut labels = alloc_vec(ParamKey::CatalogLabel, count)?;
    labels.extend((b'A'..).take(count).map(char::from));
    Ok(labels)
}

/// Labels must be distinct uppercase letters.
fn check_labels(labels: &[char]) -> ConfigResult<()> {
    let mut seen = HashSet::with_capacity(labels.len());
    for &label in labels {
        if !label.is_ascii_uppercase() {
            return Err(ConfigError::invalid(
                ParamKey::CatalogLabel,
                label,
                "labels must be uppercase letters",
            ));
        }
        if !seen.insert(label) {
            return Err(ConfigError::DuplicateLabel {
                key: ParamKey::CatalogLabel,
                label,
            });
        }
    }
    Ok(())
}

/// One value describes a cubic box; otherwise three side lengths are needed.
fn resolve_box_size(store: &dyn ParameterStore) -> ConfigResult<[f64; 3]> {
    let given = require_array(ParamKey::BoxSize, store.reals(ParamKey::BoxSize)?)?;
    let sides = match given {
        [side] => [*side; 3],
        _ => {
            let kept = reconcile(ParamKey::BoxSize, given, 3)?;
            [kept[0], kept[1], kept[2]]
        }
    };
    if let Some(bad) = sides.iter().find(|s| !s.is_finite() || **s <= 0.0) {
        return Err(ConfigError::invalid(
            ParamKey::BoxSize,
            bad,
            "must be finite and positive",
        ));
    }
    Ok(sides)
}

/// Pair identifiers must be well formed and distinct.
fn resolve_pairs(store: &dyn ParameterStore) -> ConfigResult<Vec<PairSpec>> {
    let given = require_array(ParamKey::PairCount, store.strs(ParamKey::PairCount)?)?;
    let mut pairs = alloc_vec(ParamKey::PairCount, given.len())?;
    for s in given {
        let pair = PairSpec::parse(s).ok_or_else(|| {
            ConfigError::invalid(ParamKey::PairCount, s, "must be two uppercase catalog labels")
        })?;
        pairs.push(pair);
    }

    let mut seen = HashSet::with_capacity(pairs.len());
    for pair in &pairs {
        if !seen.insert(*pair) {
            return Err(ConfigError::DuplicatePairSpec {
                key: ParamKey::PairCount,
                pair: pair.to_string(),
            });
        }
    }
    Ok(pairs)
}

fn resolve_estimators(store: &dyn ParameterStore) -> ConfigResult<Vec<String>> {
    let given = store.strs(ParamKey::CfEstimator)?;
    if given.iter().any(|e| e.is_empty()) {
        return Err(ConfigError::invalid(
            ParamKey::CfEstimator,
            "\"\"",
            "unexpected empty estimator",
        ));
    }
    Ok(given.to_vec())
}

/// Sort, drop duplicates and check the range `[0, MAX_ELL]`.
pub fn normalize_multipoles(orders: &[i64]) -> ConfigResult<Vec<u32>> {
    let mut sorted = orders.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let out_of_range = match (sorted.first(), sorted.last()) {
        (Some(&min), _) if min < 0 => Some(min),
        (_, Some(&max)) if max > i64::from(MAX_ELL) => Some(max),
        _ => None,
    };
    if let Some(value) = out_of_range {
        return Err(ConfigError::MultipoleOutOfRange {
            key: ParamKey::Multipole,
            value,
            max: MAX_ELL,
        });
    }
    // Every value is in [0, MAX_ELL] here.
    Ok(sorted.into_iter().map(|ell| ell as u32).collect())
}

/// Empty vector with room for `n` elements, failing gracefully.
fn alloc_vec<T>(key: ParamKey, n: usize) -> ConfigResult<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(n)
        .map_err(|_| ConfigError::AllocationFailure { key })?;
    Ok(v)
}
