//! Disposition of declared output files.
//!
//! For every output path the resolver decides whether the file will be
//! written, read back as an existing result, or rejected. The decision depends
//! only on whether the path exists, the overwrite policy and the force
//! threshold of the file kind, except in ask mode where the user is prompted.

use std::path::{Path, PathBuf};

use crate::confirm::{confirm, AnswerSource, ConfirmState};
use crate::error::ConfigError;
use crate::keys::ParamKey;
use crate::params::OverwritePolicy;

/// Outcome for one output path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputDecision {
    /// The file will be (over)written.
    WillWrite,
    /// The file exists and will be read instead of recomputed.
    WillRead,
    /// The path cannot be used.
    Rejected(RejectReason),
}

/// Why an output path was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    MissingPath,
    DirectoryUnreachable,
    WouldOverwrite,
    NotWritable,
    NotReadable,
    TooManyInvalidAnswers,
}

impl RejectReason {
    /// Error for this rejection, naming the key and path.
    pub fn into_error(self, key: ParamKey, path: &str) -> ConfigError {
        let path = PathBuf::from(path);
        match self {
            RejectReason::MissingPath => ConfigError::MissingPath { key },
            RejectReason::DirectoryUnreachable => ConfigError::DirectoryUnreachable { key, path },
            RejectReason::WouldOverwrite => ConfigError::WouldOverwrite { key, path },
            RejectReason::NotWritable => ConfigError::NotWritable { key, path },
            RejectReason::NotReadable => ConfigError::NotReadable { key, path },
            RejectReason::TooManyInvalidAnswers => {
                ConfigError::TooManyInvalidAnswers { key, path }
            }
        }
    }
}

/// Whether an accepted output will be written or read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Write,
    Read,
}

impl OutputDecision {
    /// Convert to a result, turning rejections into errors.
    pub fn into_result(self, key: ParamKey, path: &str) -> Result<Disposition, ConfigError> {
        match self {
            OutputDecision::WillWrite => Ok(Disposition::Write),
            OutputDecision::WillRead => Ok(Disposition::Read),
            OutputDecision::Rejected(reason) => Err(reason.into_error(key, path)),
        }
    }
}

/// File system queries needed to decide a disposition.
pub trait PathProbe {
    fn exists(&self, path: &Path) -> bool;
    /// Whether the directory can be entered.
    fn dir_accessible(&self, dir: &Path) -> bool;
    fn writable(&self, path: &Path) -> bool;
    fn readable(&self, path: &Path) -> bool;
}

/// Probe backed by the real file system permissions of the current user.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsProbe;

#[cfg(unix)]
fn access(path: &Path, mode: libc::c_int) -> bool {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: c_path is a valid NUL-terminated string for the duration of the call.
    unsafe { libc::access(c_path.as_ptr(), mode) == 0 }
}

#[cfg(unix)]
impl PathProbe for FsProbe {
    fn exists(&self, path: &Path) -> bool {
        access(path, libc::F_OK)
    }

    fn dir_accessible(&self, dir: &Path) -> bool {
        access(dir, libc::X_OK)
    }

    fn writable(&self, path: &Path) -> bool {
        access(path, libc::W_OK)
    }

    fn readable(&self, path: &Path) -> bool {
        access(path, libc::R_OK)
    }
}

#[cfg(not(unix))]
impl PathProbe for FsProbe {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn dir_accessible(&self, dir: &Path) -> bool {
        dir.is_dir()
    }

    fn writable(&self, path: &Path) -> bool {
        std::fs::metadata(path)
            .map(|m| !m.permissions().readonly())
            .unwrap_or(false)
    }

    fn readable(&self, path: &Path) -> bool {
        std::fs::File::open(path).is_ok()
    }
}

/// Decides output dispositions, prompting through `answers` in ask mode.
pub struct OutputConflictResolver<'a> {
    probe: &'a dyn PathProbe,
    answers: &'a mut dyn AnswerSource,
}

impl<'a> OutputConflictResolver<'a> {
    pub fn new(probe: &'a dyn PathProbe, answers: &'a mut dyn AnswerSource) -> Self {
        OutputConflictResolver { probe, answers }
    }

    /// Decide the disposition of `path` declared under `key`.
    ///
    /// `force` is the lowest policy that overwrites this kind of file;
    /// policies strictly between [`OverwritePolicy::NONE`] and `force` read
    /// the existing file back.
    pub fn resolve(
        &mut self,
        key: ParamKey,
        path: &str,
        policy: OverwritePolicy,
        force: OverwritePolicy,
    ) -> OutputDecision {
        if path.is_empty() {
            return OutputDecision::Rejected(RejectReason::MissingPath);
        }
        let fpath = Path::new(path);

        if !self.probe.exists(fpath) {
            return match fpath.parent() {
                Some(dir) if !dir.as_os_str().is_empty() && !self.probe.dir_accessible(dir) => {
                    OutputDecision::Rejected(RejectReason::DirectoryUnreachable)
                }
                _ => OutputDecision::WillWrite,
            };
        }

        let mut policy = policy;
        if policy.is_ask() {
            tracing::warn!(key = %key, path, "the output file `{}' exists", key);
            policy = match confirm(policy.retry_budget(), &mut *self.answers) {
                ConfirmState::Accepted => force,
                ConfirmState::Declined => OverwritePolicy::NONE,
                ConfirmState::Exhausted | ConfirmState::Prompting { .. } => {
                    return OutputDecision::Rejected(RejectReason::TooManyInvalidAnswers);
                }
            };
        }

        if policy <= OverwritePolicy::NONE {
            OutputDecision::Rejected(RejectReason::WouldOverwrite)
        } else if policy >= force {
            if !self.probe.writable(fpath) {
                return OutputDecision::Rejected(RejectReason::NotWritable);
            }
            tracing::warn!(key = %key, path, "`{}' will be overwritten", key);
            OutputDecision::WillWrite
        } else if self.probe.readable(fpath) {
            tracing::info!(key = %key, path, "`{}' will be read from the existing file", key);
            OutputDecision::WillRead
        } else {
            OutputDecision::Rejected(RejectReason::NotReadable)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::ScriptedAnswers;
    use std::collections::HashSet;

    /// In-memory probe: existing files and their permissions.
    #[derive(Default)]
    struct FakeProbe {
        files: HashSet<PathBuf>,
        unreadable: HashSet<PathBuf>,
        unwritable: HashSet<PathBuf>,
        closed_dirs: HashSet<PathBuf>,
    }

    impl FakeProbe {
        fn with_file(mut self, path: &str) -> Self {
            self.files.insert(PathBuf::from(path));
            self
        }
    }

    impl PathProbe for FakeProbe {
        fn exists(&self, path: &Path) -> bool {
            self.files.contains(path)
        }
        fn dir_accessible(&self, dir: &Path) -> bool {
            !self.closed_dirs.contains(dir)
        }
        fn writable(&self, path: &Path) -> bool {
            !self.unwritable.contains(path)
        }
        fn readable(&self, path: &Path) -> bool {
            !self.unreadable.contains(path)
        }
    }

    fn decide(probe: &FakeProbe, path: &str, policy: i32, force: OverwritePolicy) -> OutputDecision {
        let mut answers = ScriptedAnswers::none();
        OutputConflictResolver::new(probe, &mut answers).resolve(
            ParamKey::PairCountFile,
            path,
            OverwritePolicy(policy),
            force,
        )
    }

    #[test]
    fn test_empty_path_is_missing() {
        let probe = FakeProbe::default();
        assert_eq!(
            decide(&probe, "", 2, OverwritePolicy::ALL),
            OutputDecision::Rejected(RejectReason::MissingPath)
        );
    }

    #[test]
    fn test_new_file_is_written() {
        let probe = FakeProbe::default();
        assert_eq!(decide(&probe, "out/pc.dat", 0, OverwritePolicy::ALL), OutputDecision::WillWrite);
        assert_eq!(decide(&probe, "pc.dat", 0, OverwritePolicy::ALL), OutputDecision::WillWrite);
    }

    #[test]
    fn test_new_file_in_closed_directory() {
        let mut probe = FakeProbe::default();
        probe.closed_dirs.insert(PathBuf::from("locked"));
        assert_eq!(
            decide(&probe, "locked/pc.dat", 2, OverwritePolicy::ALL),
            OutputDecision::Rejected(RejectReason::DirectoryUnreachable)
        );
    }

    #[test]
    fn test_existing_file_policy_bands() {
        let probe = FakeProbe::default().with_file("pc.dat");
        assert_eq!(
            decide(&probe, "pc.dat", 0, OverwritePolicy::ALL),
            OutputDecision::Rejected(RejectReason::WouldOverwrite)
        );
        assert_eq!(decide(&probe, "pc.dat", 1, OverwritePolicy::ALL), OutputDecision::WillRead);
        assert_eq!(decide(&probe, "pc.dat", 2, OverwritePolicy::ALL), OutputDecision::WillWrite);
        assert_eq!(decide(&probe, "pc.dat", 7, OverwritePolicy::ALL), OutputDecision::WillWrite);
        // Derived outputs are overwritten from policy 1 on.
        assert_eq!(
            decide(&probe, "pc.dat", 1, OverwritePolicy::DERIVED_ONLY),
            OutputDecision::WillWrite
        );
    }

    #[test]
    fn test_existing_file_permissions() {
        let mut probe = FakeProbe::default().with_file("pc.dat");
        probe.unwritable.insert(PathBuf::from("pc.dat"));
        probe.unreadable.insert(PathBuf::from("pc.dat"));
        assert_eq!(
            decide(&probe, "pc.dat", 2, OverwritePolicy::ALL),
            OutputDecision::Rejected(RejectReason::NotWritable)
        );
        assert_eq!(
            decide(&probe, "pc.dat", 1, OverwritePolicy::ALL),
            OutputDecision::Rejected(RejectReason::NotReadable)
        );
    }

    #[test]
    fn test_reject_all_never_prompts() {
        let probe = FakeProbe::default().with_file("cf.dat");
        let mut answers = ScriptedAnswers::new([Some('y')]);
        let decision = OutputConflictResolver::new(&probe, &mut answers).resolve(
            ParamKey::CfOutputFile,
            "cf.dat",
            OverwritePolicy::NONE,
            OverwritePolicy::DERIVED_ONLY,
        );
        assert_eq!(decision, OutputDecision::Rejected(RejectReason::WouldOverwrite));
        assert_eq!(answers.asked(), 0);
    }

    #[test]
    fn test_ask_mode_outcomes() {
        let probe = FakeProbe::default().with_file("pc.dat");

        let mut yes = ScriptedAnswers::new([Some('y')]);
        let decision = OutputConflictResolver::new(&probe, &mut yes).resolve(
            ParamKey::PairCountFile,
            "pc.dat",
            OverwritePolicy(-2),
            OverwritePolicy::ALL,
        );
        assert_eq!(decision, OutputDecision::WillWrite);

        let mut no = ScriptedAnswers::new([Some('n')]);
        let decision = OutputConflictResolver::new(&probe, &mut no).resolve(
            ParamKey::PairCountFile,
            "pc.dat",
            OverwritePolicy(-2),
            OverwritePolicy::ALL,
        );
        assert_eq!(decision, OutputDecision::Rejected(RejectReason::WouldOverwrite));

        let mut junk = ScriptedAnswers::new([Some('a'), Some('b'), Some('c')]);
        let decision = OutputConflictResolver::new(&probe, &mut junk).resolve(
            ParamKey::PairCountFile,
            "pc.dat",
            OverwritePolicy(-3),
            OverwritePolicy::ALL,
        );
        assert_eq!(
            decision,
            OutputDecision::Rejected(RejectReason::TooManyInvalidAnswers)
        );
        assert_eq!(junk.asked(), 3);
    }

    #[test]
    fn test_ask_mode_skipped_for_new_files() {
        let probe = FakeProbe::default();
        let mut answers = ScriptedAnswers::none();
        let decision = OutputConflictResolver::new(&probe, &mut answers).resolve(
            ParamKey::CfOutputFile,
            "cf.dat",
            OverwritePolicy(-1),
            OverwritePolicy::DERIVED_ONLY,
        );
        assert_eq!(decision, OutputDecision::WillWrite);
        assert_eq!(answers.asked(), 0);
    }

    #[test]
    fn test_into_result() {
        assert_eq!(
            OutputDecision::WillRead
                .into_result(ParamKey::PairCountFile, "pc.dat")
                .unwrap(),
            Disposition::Read
        );
        let err = OutputDecision::Rejected(RejectReason::NotWritable)
            .into_result(ParamKey::CfOutputFile, "cf.dat")
            .unwrap_err();
        assert!(matches!(err, ConfigError::NotWritable { key: ParamKey::CfOutputFile, .. }));
    }

    #[test]
    fn test_fs_probe_on_real_files() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("pc.dat");
        std::fs::write(&existing, b"0").unwrap();
        let probe = FsProbe;
        assert!(probe.exists(&existing));
        assert!(probe.readable(&existing));
        assert!(!probe.exists(&dir.path().join("missing.dat")));
        assert!(probe.dir_accessible(dir.path()));
    }
}
