use crate::lockfile::{Lockfile, PackageIdentity};
use crate::manager::{MetadataSource, PackageDetails, PackageManager};
use crate::{DepdiceError, Result, select};
use rand::Rng;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug)]
pub struct Pick {
    pub package: PackageIdentity,
    pub pool_size: usize,
    pub lockfile: PathBuf,
    pub manager: PackageManager,
    pub details: Option<PackageDetails>,
    pub usage: Usage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Usage {
    Explained(String),
    Unavailable(String),
}

/// Picks one package from `lockfile`, failing when it lists none.
pub fn choose<R: Rng>(lockfile: &Lockfile, rng: &mut R) -> Result<PackageIdentity> {
    select::select(&lockfile.packages, rng)
        .cloned()
        .ok_or_else(|| DepdiceError::EmptyDependencySet {
            path: lockfile.path.clone(),
        })
}

/// Reads the project's lockfile, picks a package and gathers what the
/// package manager knows about it.
///
/// `connect` is only called once a lockfile has been found and a package
/// chosen, so fatal lockfile problems never reach the package manager.
/// Metadata and usage lookups run concurrently; their failures degrade to
/// `None` / [`Usage::Unavailable`] instead of aborting.
pub async fn pick<S, F, R>(root: &Path, connect: F, rng: &mut R) -> Result<Pick>
where
    S: MetadataSource,
    F: FnOnce(PackageManager) -> S,
    R: Rng,
{
    let lockfile = Lockfile::discover(root)?;
    let package = choose(&lockfile, rng)?;
    let manager = PackageManager::from(lockfile.kind);
    debug!(
        "picked {} from {} packages in {}",
        package,
        lockfile.packages.len(),
        lockfile.path.display()
    );

    let source = connect(manager);
    let (details, usage) = tokio::join!(source.describe(&package), source.usage(&package));

    let details = match details {
        Ok(details) => Some(details),
        Err(err) => {
            warn!("{}", err);
            None
        }
    };

    let usage = match usage {
        Ok(text) => Usage::Explained(text),
        Err(err) => {
            warn!("{}", err);
            Usage::Unavailable(usage_unavailable(manager, &err))
        }
    };

    Ok(Pick {
        package,
        pool_size: lockfile.packages.len(),
        lockfile: lockfile.path,
        manager,
        details,
        usage,
    })
}

/// npm gets a fixed apology; yarn failures carry the error itself.
fn usage_unavailable(manager: PackageManager, err: &DepdiceError) -> String {
    match manager {
        PackageManager::Npm => "Could not get usage information from NPM.".to_string(),
        PackageManager::Yarn => format!("Could not get usage information from yarn: {}", err),
    }
}
