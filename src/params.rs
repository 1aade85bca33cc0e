//! Query Parameters
//!
//! Everything needed to describe one jq invocation: the filter, the input,
//! output toggles and variable bindings.

use std::path::{Path, PathBuf};

use crate::error::JqError;

/// Insertion-ordered name -> value map for `--arg` style bindings.
///
/// Rebinding an existing name replaces its value but keeps its position, so
/// the emitted argument order only depends on first insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings<V> {
    entries: Vec<(String, V)>,
}

impl<V> Bindings<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: V) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl<N: Into<String>, V> FromIterator<(N, V)> for Bindings<V> {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut bindings = Bindings::new();
        for (name, value) in iter {
            bindings.insert(name, value);
        }
        bindings
    }
}

/// Output-formatting toggles, one per jq flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputFlags {
    pub raw_output: bool,
    pub compact_output: bool,
    pub monochrome_output: bool,
    pub color_output: bool,
    pub slurp: bool,
    pub null_input: bool,
    pub exit_status: bool,
    pub ascii_output: bool,
    pub sort_keys: bool,
    pub join_output: bool,
    pub tab: bool,
    pub indent: Option<u32>,
}

impl Default for OutputFlags {
    fn default() -> Self {
        // Raw output is on unless explicitly disabled
        Self {
            raw_output: true,
            compact_output: false,
            monochrome_output: false,
            color_output: false,
            slurp: false,
            null_input: false,
            exit_status: false,
            ascii_output: false,
            sort_keys: false,
            join_output: false,
            tab: false,
            indent: None,
        }
    }
}

/// Parameters for one jq execution
///
/// Built with chained setters:
///
/// ```
/// use jqwrap::JqParams;
///
/// let params = JqParams::new(".items[] | select(.id == $id)")
///     .unwrap()
///     .json(r#"{"items": [{"id": 1}]}"#)
///     .compact_output(true)
///     .arg_json("id", "1");
/// assert_eq!(params.filter(), ".items[] | select(.id == $id)");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct JqParams {
    pub(crate) filter: String,
    pub(crate) json: Option<String>,
    pub(crate) flags: OutputFlags,
    pub(crate) args: Bindings<String>,
    pub(crate) args_json: Bindings<String>,
    pub(crate) slurp_files: Bindings<PathBuf>,
    pub(crate) raw_files: Bindings<PathBuf>,
}

impl JqParams {
    /// Create parameters for `filter`
    ///
    /// # Errors
    /// * `JqError::EmptyFilter` - when the filter is empty or whitespace only
    pub fn new(filter: impl Into<String>) -> Result<Self, JqError> {
        let filter = filter.into();
        if filter.trim().is_empty() {
            return Err(JqError::EmptyFilter);
        }

        Ok(Self {
            filter,
            json: None,
            flags: OutputFlags::default(),
            args: Bindings::new(),
            args_json: Bindings::new(),
            slurp_files: Bindings::new(),
            raw_files: Bindings::new(),
        })
    }

    /// Create parameters with JSON input already set
    pub fn with_json(json: impl Into<String>, filter: impl Into<String>) -> Result<Self, JqError> {
        Ok(Self::new(filter)?.json(json))
    }

    pub fn json(mut self, json: impl Into<String>) -> Self {
        self.json = Some(json.into());
        self
    }

    pub fn raw_output(mut self, on: bool) -> Self {
        self.flags.raw_output = on;
        self
    }

    pub fn compact_output(mut self, on: bool) -> Self {
        self.flags.compact_output = on;
        self
    }

    pub fn monochrome_output(mut self, on: bool) -> Self {
        self.flags.monochrome_output = on;
        self
    }

    pub fn color_output(mut self, on: bool) -> Self {
        self.flags.color_output = on;
        self
    }

    pub fn slurp(mut self, on: bool) -> Self {
        self.flags.slurp = on;
        self
    }

    pub fn null_input(mut self, on: bool) -> Self {
        self.flags.null_input = on;
        self
    }

    pub fn exit_status(mut self, on: bool) -> Self {
        self.flags.exit_status = on;
        self
    }

    pub fn ascii_output(mut self, on: bool) -> Self {
        self.flags.ascii_output = on;
        self
    }

    pub fn sort_keys(mut self, on: bool) -> Self {
        self.flags.sort_keys = on;
        self
    }

    pub fn join_output(mut self, on: bool) -> Self {
        self.flags.join_output = on;
        self
    }

    pub fn tab(mut self, on: bool) -> Self {
        self.flags.tab = on;
        self
    }

    pub fn indent(mut self, width: u32) -> Self {
        self.flags.indent = Some(width);
        self
    }

    /// Bind `$name` to a string value (`--arg`)
    pub fn arg(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.args.insert(name, value.into());
        self
    }

    /// Bind `$name` to a JSON literal given as text (`--argjson`)
    pub fn arg_json(mut self, name: impl Into<String>, json: impl Into<String>) -> Self {
        self.args_json.insert(name, json.into());
        self
    }

    /// Bind `$name` to an already-built JSON value (`--argjson`)
    pub fn arg_value(mut self, name: impl Into<String>, value: &serde_json::Value) -> Self {
        self.args_json.insert(name, value.to_string());
        self
    }

    /// Bind `$name` to the array of JSON values in `path` (`--slurpfile`)
    pub fn slurp_file(mut self, name: impl Into<String>, path: impl AsRef<Path>) -> Self {
        self.slurp_files.insert(name, path.as_ref().to_path_buf());
        self
    }

    /// Bind `$name` to the raw contents of `path` (`--rawfile`)
    pub fn raw_file(mut self, name: impl Into<String>, path: impl AsRef<Path>) -> Self {
        self.raw_files.insert(name, path.as_ref().to_path_buf());
        self
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn json_input(&self) -> Option<&str> {
        self.json.as_deref()
    }

    pub fn flags(&self) -> &OutputFlags {
        &self.flags
    }

    pub fn args(&self) -> &Bindings<String> {
        &self.args
    }

    pub fn args_json(&self) -> &Bindings<String> {
        &self.args_json
    }

    pub fn slurp_files(&self) -> &Bindings<PathBuf> {
        &self.slurp_files
    }

    pub fn raw_files(&self) -> &Bindings<PathBuf> {
        &self.raw_files
    }

    /// Fails when there is nothing for jq to read
    pub(crate) fn check_input(&self) -> Result<(), JqError> {
        if self.json.is_none() && !self.flags.null_input {
            return Err(JqError::MissingInput);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "params_tests.rs"]
mod params_tests;
