// Configuration type definitions

use std::path::PathBuf;

use serde::Deserialize;

/// Where to find the jq binary
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BinaryConfig {
    /// Explicit jq binary; skips platform lookup entirely
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Replaces `<install dir>/lib` as the bundled binary directory
    #[serde(default)]
    pub lib_dir: Option<PathBuf>,
    /// Fall back to `jq` on PATH when the bundled binary is missing
    #[serde(default)]
    pub search_path: bool,
}

/// Where cached query files and fallback copies go
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl CacheConfig {
    /// Configured directory, or the platform temp dir
    pub fn dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub binary: BinaryConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}
