//! A bunch of wrap errors.

/// A wrap `Result` contains custom errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors of a running node, wrapping the ring and transport errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("Ring error: {0}")]
    Ring(#[from] ringlet_core::error::Error),
    #[error("Transport error: {0}")]
    Transport(#[from] ringlet_transport::error::Error),
    #[error("Open file error: {0}")]
    OpenFileError(String),
    #[error("Create file error: {0}")]
    CreateFileError(String),
    #[error("Cannot find home directory")]
    HomeDirError,
    #[error("Cannot find parent directory")]
    ParentDirError,
    #[error("Path is not valid unicode: {0}")]
    InvalidPath(String),
    #[error("Yaml error: {0}")]
    SerdeYaml(#[from] serde_yaml::Error),
    #[error("Invalid logging level: {0}")]
    InvalidLoggingLevel(String),
    #[error("None of the bootstrap peers could be joined")]
    BootstrapFailed,
}
