use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DepdiceError {
    #[error("Failed to parse JSON in {path:?}: {source}")]
    ParseJson { path: PathBuf, source: serde_json::Error },

    #[error("Failed to parse YAML in {path:?}: {source}")]
    ParseYaml { path: PathBuf, source: serde_yaml::Error },

    #[error("Could not find package-lock.json or yarn.lock in {root:?}.")]
    MissingLockfile { root: PathBuf },

    #[error("Found {path:?} but could not read it, so no usable lockfile was found: {source}")]
    UnreadableLockfile { path: PathBuf, source: std::io::Error },

    #[error("{path:?} does not list any installed packages.")]
    EmptyDependencySet { path: PathBuf },

    #[error("Failed to run `{command}`: {source}")]
    CommandSpawn {
        command: String,
        source: std::io::Error,
    },

    #[error("`{command}` exited with code {code}: {stderr}")]
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("`{command}` did not finish within {seconds}s")]
    CommandTimeout { command: String, seconds: u64 },

    #[error("No metadata found for {package}: {reason}")]
    MetadataNotFound { package: String, reason: String },

    #[error("Could not understand usage output for {package}: {reason}")]
    UsageOutput { package: String, reason: String },
}
