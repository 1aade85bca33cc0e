use std::path::PathBuf;

use thiserror::Error;

/// Failure while locating or preparing the jq binary.
///
/// Resolution happens once per process, so this type is `Clone` to let every
/// later caller see the same failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("Unsupported platform or architecture: {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("Could not determine the install directory: {0}")]
    InstallDir(String),

    #[error("jq executable not found: {}", .0.display())]
    BinaryMissing(PathBuf),

    #[error("Could not make {} executable: {message}", .path.display())]
    Permission { path: PathBuf, message: String },
}

#[derive(Debug, Error)]
pub enum JqError {
    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error("jq executable not found: {}", .0.display())]
    BinaryNotFound(PathBuf),

    #[error("Query cannot be empty or whitespace")]
    EmptyFilter,

    #[error("Either JSON input must be provided or null input must be enabled")]
    MissingInput,

    #[error("{kind} file not found: {}", .path.display())]
    FileNotFound { kind: BindingFile, path: PathBuf },

    #[error("Failed to write query file {}: {source}", .path.display())]
    QueryFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to spawn jq: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Query was cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which file-backed binding a missing path belonged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingFile {
    Slurp,
    Raw,
}

impl std::fmt::Display for BindingFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BindingFile::Slurp => f.write_str("Slurp"),
            BindingFile::Raw => f.write_str("Raw"),
        }
    }
}
