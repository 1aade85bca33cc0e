//! Cached query files
//!
//! Multiline filters are passed to jq with `-f <file>` instead of as an
//! argument. Files are named by the SHA-256 of their normalized text, so the
//! same filter always maps to the same file and is written only once.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;

use crate::error::JqError;

#[cfg(windows)]
pub const NEWLINE: &str = "\r\n";
#[cfg(not(windows))]
pub const NEWLINE: &str = "\n";

const QUERY_FILE_EXT: &str = "jq";

/// Guards the exists-then-write sequence within this process
static QUERY_FILE_LOCK: Mutex<()> = Mutex::new(());

/// Unify `\r\n`, `\r` and `\n` to the host newline, then trim
pub fn normalize(filter: &str) -> String {
    let mut out = String::with_capacity(filter.len());
    let mut chars = filter.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str(NEWLINE);
            }
            '\n' => out.push_str(NEWLINE),
            _ => out.push(c),
        }
    }

    out.trim().to_string()
}

/// Whether a normalized filter has to go through a query file
pub fn is_multiline(normalized: &str) -> bool {
    normalized.contains(NEWLINE)
}

/// Lowercase hex SHA-256 of the filter text
pub fn hash(normalized: &str) -> String {
    hex::encode(Sha256::digest(normalized.as_bytes()))
}

/// Where the query file for `normalized` lives inside `dir`
pub fn query_file_path(dir: &Path, normalized: &str) -> PathBuf {
    dir.join(format!("{}.{}", hash(normalized), QUERY_FILE_EXT))
}

/// Return the query file for `normalized`, writing it first if absent
///
/// Content goes to a temporary sibling which is then moved into place
/// without overwriting, so no reader ever sees a partial file.
pub fn ensure_query_file(dir: &Path, normalized: &str) -> Result<PathBuf, JqError> {
    let path = query_file_path(dir, normalized);
    if path.exists() {
        return Ok(path);
    }

    let _guard = QUERY_FILE_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    if path.exists() {
        return Ok(path);
    }

    write_new(dir, &path, normalized).map_err(|source| JqError::QueryFile {
        path: path.clone(),
        source,
    })?;

    log::debug!("Wrote query file {}", path.display());
    Ok(path)
}

fn write_new(dir: &Path, path: &Path, contents: &str) -> io::Result<()> {
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.flush()?;

    match tmp.persist_noclobber(path) {
        Ok(_) => Ok(()),
        // Another process got there first with identical content
        Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(e.error),
    }
}

#[cfg(test)]
#[path = "query_file_tests.rs"]
mod query_file_tests;
