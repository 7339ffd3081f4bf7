pub mod config;
pub mod console;
pub mod error;
pub mod lockfile;
pub mod manager;
pub mod operations;
pub mod present;
pub mod select;

pub use config::DepdiceConfig;
pub use error::DepdiceError;
pub use lockfile::{Lockfile, LockfileKind, PackageIdentity, PackageSet};
pub use manager::{MetadataSource, PackageManager};

pub type Result<T> = std::result::Result<T, DepdiceError>;
