use crate::lockfile::{PackageIdentity, PackageSet};
use rand::Rng;

/// Picks one package uniformly at random. Returns `None` for an empty set.
pub fn select<'a, R: Rng>(
    packages: &'a PackageSet,
    rng: &mut R,
) -> Option<&'a PackageIdentity> {
    if packages.is_empty() {
        return None;
    }

    let index = rng.random_range(0..packages.len());
    packages.iter().nth(index)
}
