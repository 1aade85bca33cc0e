//! Execute permission for the bundled binary
//!
//! Archives and package managers do not always preserve the execute bit.
//! When the install location is read-only the binary is copied into the
//! temp directory and made executable there instead.

use std::io;
use std::path::{Path, PathBuf};

use crate::error::SetupError;

/// File name of the fallback copy inside the temp directory
pub const FALLBACK_NAME: &str = "jq";

/// Make sure `binary` can be executed, returning the path to use from now on
///
/// Returns `binary` unchanged on Windows or when it is already executable.
/// If the permission cannot be changed because of an access restriction the
/// binary is copied into `fallback_dir` and that copy is returned.
///
/// # Errors
/// * `SetupError::Permission` - neither the bundled binary nor the copy could
///   be made executable
pub fn ensure_executable(binary: &Path, fallback_dir: &Path) -> Result<PathBuf, SetupError> {
    if !cfg!(unix) {
        return Ok(binary.to_path_buf());
    }

    ensure_executable_with(binary, fallback_dir, set_executable)
}

fn ensure_executable_with<F>(
    binary: &Path,
    fallback_dir: &Path,
    set_mode: F,
) -> Result<PathBuf, SetupError>
where
    F: FnOnce(&Path) -> io::Result<()>,
{
    match set_mode(binary) {
        Ok(()) => Ok(binary.to_path_buf()),
        Err(e) if is_access_error(&e) => {
            log::warn!(
                "Cannot set execute permission on {}: {}; copying to {}",
                binary.display(),
                e,
                fallback_dir.display()
            );
            copy_to_fallback(binary, fallback_dir)
        }
        Err(e) => Err(permission_error(binary, &e)),
    }
}

/// Copy `binary` into `fallback_dir` and make the copy executable
pub fn copy_to_fallback(binary: &Path, fallback_dir: &Path) -> Result<PathBuf, SetupError> {
    std::fs::create_dir_all(fallback_dir).map_err(|e| permission_error(fallback_dir, &e))?;
    let target = fallback_dir.join(FALLBACK_NAME);
    // An earlier copy may be read-only
    if target.exists() {
        std::fs::remove_file(&target).map_err(|e| permission_error(&target, &e))?;
    }
    std::fs::copy(binary, &target).map_err(|e| permission_error(&target, &e))?;
    set_executable(&target).map_err(|e| permission_error(&target, &e))?;
    log::info!("Using jq copy at {}", target.display());
    Ok(target)
}

#[cfg(unix)]
pub fn is_executable(path: &Path) -> io::Result<bool> {
    use std::os::unix::fs::PermissionsExt;

    let mode = std::fs::metadata(path)?.permissions().mode();
    Ok(mode & 0o100 != 0)
}

#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> io::Result<bool> {
    std::fs::metadata(path).map(|_| true)
}

#[cfg(unix)]
fn set_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    if is_executable(path)? {
        return Ok(());
    }

    let mut permissions = std::fs::metadata(path)?.permissions();
    permissions.set_mode(permissions.mode() | 0o111);
    std::fs::set_permissions(path, permissions)
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}

fn is_access_error(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::PermissionDenied | io::ErrorKind::ReadOnlyFilesystem
    )
}

fn permission_error(path: &Path, e: &io::Error) -> SetupError {
    SetupError::Permission {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}
