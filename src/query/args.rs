//! Command-line construction
//!
//! Turns `JqParams` into the exact token list passed to jq. Order matters:
//! flags, indent, the four binding groups, then the filter (or `-f <file>`)
//! last.

use std::path::{Path, PathBuf};

use super::query_file;
use crate::error::{BindingFile, JqError};
use crate::params::{Bindings, JqParams, OutputFlags};

/// Build the jq argument list for `params`
///
/// Multiline filters are written to a query file in `cache_dir` and passed
/// with `-f`.
///
/// # Errors
/// * `JqError::FileNotFound` - a slurp or raw file does not exist
/// * `JqError::QueryFile` - the query file could not be written
pub fn build_args(params: &JqParams, cache_dir: &Path) -> Result<Vec<String>, JqError> {
    let mut args = flag_args(&params.flags);

    push_bindings(&mut args, "--arg", &params.args);
    push_bindings(&mut args, "--argjson", &params.args_json);
    push_file_bindings(&mut args, "--slurpfile", &params.slurp_files, BindingFile::Slurp)?;
    push_file_bindings(&mut args, "--rawfile", &params.raw_files, BindingFile::Raw)?;

    let normalized = query_file::normalize(&params.filter);
    if query_file::is_multiline(&normalized) {
        let path = query_file::ensure_query_file(cache_dir, &normalized)?;
        args.push("-f".to_string());
        args.push(path.to_string_lossy().into_owned());
    } else {
        args.push(normalized);
    }

    Ok(args)
}

/// Format flags followed by `--indent <n>`
pub fn flag_args(flags: &OutputFlags) -> Vec<String> {
    let switches = [
        (flags.raw_output, "-r"),
        (flags.compact_output, "-c"),
        (flags.monochrome_output, "-M"),
        (flags.color_output, "-C"),
        (flags.slurp, "-s"),
        (flags.null_input, "-n"),
        (flags.exit_status, "-e"),
        (flags.ascii_output, "-a"),
        (flags.sort_keys, "-S"),
        (flags.join_output, "-j"),
        (flags.tab, "--tab"),
    ];

    let mut args: Vec<String> = switches
        .iter()
        .filter(|(on, _)| *on)
        .map(|(_, flag)| flag.to_string())
        .collect();

    if let Some(width) = flags.indent {
        args.push("--indent".to_string());
        args.push(width.to_string());
    }

    args
}

fn push_bindings(args: &mut Vec<String>, flag: &str, bindings: &Bindings<String>) {
    for (name, value) in bindings.iter() {
        args.push(flag.to_string());
        args.push(name.to_string());
        args.push(value.clone());
    }
}

fn push_file_bindings(
    args: &mut Vec<String>,
    flag: &str,
    bindings: &Bindings<PathBuf>,
    kind: BindingFile,
) -> Result<(), JqError> {
    for (name, path) in bindings.iter() {
        if !path.is_file() {
            return Err(JqError::FileNotFound {
                kind,
                path: path.clone(),
            });
        }

        args.push(flag.to_string());
        args.push(name.to_string());
        args.push(path.to_string_lossy().into_owned());
    }
    Ok(())
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod args_tests;
