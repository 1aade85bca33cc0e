//! Platform detection and bundled binary lookup
//!
//! jq ships as one prebuilt executable per OS/architecture pair under
//! `<install dir>/lib/`. This module picks the right one for the host.

pub mod permissions;

use std::path::{Path, PathBuf};

use crate::config::BinaryConfig;
use crate::error::SetupError;

/// Directory, relative to the install dir, holding the bundled binaries
pub const LIB_DIR: &str = "lib";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Linux,
    Windows,
    MacOs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    X64,
    X86,
    Arm64,
}

/// Host OS and architecture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub os: Os,
    pub arch: Arch,
}

impl Platform {
    /// Detect the platform this process runs on
    ///
    /// # Errors
    /// * `SetupError::UnsupportedPlatform` - OS or architecture has no jq build
    pub fn current() -> Result<Self, SetupError> {
        Self::from_consts(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Map `std::env::consts` style names to a platform
    pub fn from_consts(os: &str, arch: &str) -> Result<Self, SetupError> {
        let unsupported = || SetupError::UnsupportedPlatform {
            os: os.to_string(),
            arch: arch.to_string(),
        };

        let os_kind = match os {
            "linux" => Os::Linux,
            "windows" => Os::Windows,
            "macos" => Os::MacOs,
            _ => return Err(unsupported()),
        };

        let arch_kind = match arch {
            "x86_64" => Arch::X64,
            "x86" => Arch::X86,
            "aarch64" => Arch::Arm64,
            _ => return Err(unsupported()),
        };

        let platform = Platform {
            os: os_kind,
            arch: arch_kind,
        };

        // Reject pairs without a build up front
        platform.binary_name().ok_or_else(unsupported)?;
        Ok(platform)
    }

    /// File name of the bundled jq build for this platform
    pub fn binary_name(&self) -> Option<&'static str> {
        match (self.os, self.arch) {
            (Os::Linux, Arch::X64) => Some("jq-linux-amd64"),
            (Os::Linux, Arch::Arm64) => Some("jq-linux-arm64"),
            (Os::Linux, Arch::X86) => Some("jq-linux-i386"),
            (Os::Windows, Arch::X64) => Some("jq-windows-amd64.exe"),
            (Os::Windows, Arch::X86) => Some("jq-windows-i386.exe"),
            (Os::MacOs, Arch::X64) => Some("jq-macos-amd64"),
            (Os::MacOs, Arch::Arm64) => Some("jq-macos-arm64"),
            (Os::Windows, Arch::Arm64) | (Os::MacOs, Arch::X86) => None,
        }
    }

    /// Full path of the bundled binary inside `lib_dir`
    pub fn binary_path(&self, lib_dir: &Path) -> Result<PathBuf, SetupError> {
        let name = self
            .binary_name()
            .ok_or_else(|| SetupError::UnsupportedPlatform {
                os: format!("{:?}", self.os),
                arch: format!("{:?}", self.arch),
            })?;
        Ok(lib_dir.join(name))
    }
}

/// `lib/` next to the running executable
pub fn default_lib_dir() -> Result<PathBuf, SetupError> {
    let exe = std::env::current_exe().map_err(|e| SetupError::InstallDir(e.to_string()))?;
    let dir = exe
        .parent()
        .ok_or_else(|| SetupError::InstallDir(format!("{} has no parent", exe.display())))?;
    Ok(dir.join(LIB_DIR))
}

/// Find the jq binary to use for this process
///
/// An explicit `path` in the config wins. Otherwise the bundled build for
/// the host platform is used, or `jq` from PATH when it is missing and
/// `search_path` is enabled. The result is made executable, copying it into
/// `fallback_dir` if the install location is read-only.
pub fn resolve_binary(config: &BinaryConfig, fallback_dir: &Path) -> Result<PathBuf, SetupError> {
    let path = match &config.path {
        Some(path) => path.clone(),
        None => bundled_binary(config)?,
    };

    if !path.is_file() {
        return Err(SetupError::BinaryMissing(path));
    }

    let resolved = permissions::ensure_executable(&path, fallback_dir)?;
    log::info!("Using jq at {}", resolved.display());
    Ok(resolved)
}

fn bundled_binary(config: &BinaryConfig) -> Result<PathBuf, SetupError> {
    let platform = Platform::current()?;
    let lib_dir = match &config.lib_dir {
        Some(dir) => dir.clone(),
        None => default_lib_dir()?,
    };

    let path = platform.binary_path(&lib_dir)?;
    if path.is_file() || !config.search_path {
        return Ok(path);
    }

    log::warn!(
        "Bundled jq missing at {}, searching PATH",
        path.display()
    );
    which::which("jq").map_err(|_| SetupError::BinaryMissing(path))
}
