pub mod npm;
pub mod types;
pub mod yarn;

pub use types::{PackageIdentity, PackageSet};

use crate::{DepdiceError, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const NPM_LOCKFILE: &str = "package-lock.json";
pub const YARN_LOCKFILE: &str = "yarn.lock";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockfileKind {
    Npm,
    Yarn,
}

impl LockfileKind {
    pub fn file_name(self) -> &'static str {
        match self {
            LockfileKind::Npm => NPM_LOCKFILE,
            LockfileKind::Yarn => YARN_LOCKFILE,
        }
    }
}

#[derive(Debug)]
pub struct Lockfile {
    pub kind: LockfileKind,
    pub path: PathBuf,
    pub packages: PackageSet,
}

impl Lockfile {
    /// Finds the lockfile in `root`, preferring `package-lock.json` over
    /// `yarn.lock`, and extracts its packages.
    pub fn discover(root: &Path) -> Result<Self> {
        let kind = detect(root).ok_or_else(|| DepdiceError::MissingLockfile {
            root: root.to_path_buf(),
        })?;

        Self::read(kind, &root.join(kind.file_name()))
    }

    pub fn read(kind: LockfileKind, path: &Path) -> Result<Self> {
        let data =
            fs::read_to_string(path).map_err(|source| DepdiceError::UnreadableLockfile {
                path: path.to_path_buf(),
                source,
            })?;

        let packages = parse(kind, path, &data)?;
        debug!(
            "extracted {} packages from {}",
            packages.len(),
            path.display()
        );

        Ok(Lockfile {
            kind,
            path: path.to_path_buf(),
            packages,
        })
    }
}

pub fn detect(root: &Path) -> Option<LockfileKind> {
    [LockfileKind::Npm, LockfileKind::Yarn]
        .into_iter()
        .find(|kind| root.join(kind.file_name()).is_file())
}

fn parse(kind: LockfileKind, path: &Path, data: &str) -> Result<PackageSet> {
    match kind {
        LockfileKind::Npm => {
            let value: Value =
                serde_json::from_str(data).map_err(|source| DepdiceError::ParseJson {
                    path: path.to_path_buf(),
                    source,
                })?;
            Ok(npm::extract_nested(&value))
        }
        LockfileKind::Yarn => {
            let lock = if yarn::is_berry(data) {
                debug!("{} uses the berry format", path.display());
                yarn::parse_berry(data).map_err(|source| DepdiceError::ParseYaml {
                    path: path.to_path_buf(),
                    source,
                })?
            } else {
                yarn::parse_classic(data)
            };
            Ok(yarn::extract_flat(&lock))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_lockfile_is_reported() {
        let dir = TempDir::new().unwrap();

        let err = Lockfile::discover(dir.path()).unwrap_err();
        assert!(matches!(err, DepdiceError::MissingLockfile { .. }));
    }

    #[test]
    fn prefers_npm_lockfile() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(NPM_LOCKFILE),
            r#"{"dependencies":{"a":{"version":"1.0.0"}}}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join(YARN_LOCKFILE),
            "b@^2.0.0:\n  version \"2.0.0\"\n",
        )
        .unwrap();

        let lock = Lockfile::discover(dir.path()).unwrap();
        assert_eq!(lock.kind, LockfileKind::Npm);
        assert!(lock.packages.contains(&PackageIdentity::new("a", "1.0.0")));
        assert_eq!(lock.packages.len(), 1);
    }

    #[test]
    fn falls_back_to_yarn_lockfile() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(YARN_LOCKFILE),
            "left-pad@^1.3.0:\n  version \"1.3.0\"\n",
        )
        .unwrap();

        let lock = Lockfile::discover(dir.path()).unwrap();
        assert_eq!(lock.kind, LockfileKind::Yarn);
        assert_eq!(
            lock.packages.iter().map(ToString::to_string).collect::<Vec<_>>(),
            ["left-pad@1.3.0"]
        );
    }

    #[test]
    fn unreadable_lockfile_says_no_usable_lockfile() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(YARN_LOCKFILE);

        let err = Lockfile::read(LockfileKind::Yarn, &path).unwrap_err();
        assert!(matches!(err, DepdiceError::UnreadableLockfile { .. }));
        assert!(err.to_string().contains("no usable lockfile"));
    }

    #[test]
    fn invalid_npm_lockfile_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(NPM_LOCKFILE), "{ not json").unwrap();

        let err = Lockfile::discover(dir.path()).unwrap_err();
        assert!(matches!(err, DepdiceError::ParseJson { .. }));
    }
}
