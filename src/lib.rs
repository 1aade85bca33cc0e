//! jqwrap library - run a bundled jq binary from Rust
//!
//! The binary for the host platform is resolved once per process. Each call
//! builds jq's command line from [`JqParams`], pipes the JSON input in and
//! hands back a [`JqResult`] with the exit code and both output streams.
//!
//! ```no_run
//! let name = jqwrap::execute(r#"{"name": "John"}"#, ".name")?;
//! assert_eq!(name, "John");
//! # Ok::<(), jqwrap::JqError>(())
//! ```

pub mod config;
pub mod error;
pub mod params;
pub mod platform;
pub mod query;
pub mod result;

#[cfg(test)]
pub mod test_utils;

use std::path::Path;

// Re-export commonly used types for convenience
pub use config::Config;
pub use error::{JqError, SetupError};
pub use params::{Bindings, JqParams, OutputFlags};
pub use query::JqExecutor;
pub use result::JqResult;

/// Run `filter` over `json` with the process-wide executor
///
/// Raw output is enabled; returns the trimmed stdout only.
pub fn execute(json: &str, filter: &str) -> Result<String, JqError> {
    JqExecutor::global()?.query(json, filter)
}

/// Run a fully specified query with the process-wide executor
pub fn execute_params(params: &JqParams) -> Result<JqResult, JqError> {
    JqExecutor::global()?.execute(params)
}

/// Path of the jq binary used by the process-wide executor
pub fn path() -> Result<&'static Path, JqError> {
    Ok(JqExecutor::global()?.binary())
}
