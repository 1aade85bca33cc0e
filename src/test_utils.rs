//! Shared test utilities for jqwrap
//!
//! Tests that run jq use the system binary from PATH.

#[cfg(test)]
pub mod test_helpers {
    use std::path::PathBuf;

    use tempfile::TempDir;

    use crate::query::JqExecutor;

    /// Test fixture JSON data
    pub const TEST_JSON: &str = r#"{
  "name": "John",
  "age": 30
}"#;

    pub fn system_jq() -> PathBuf {
        which::which("jq").expect("jq must be on PATH to run these tests")
    }

    /// Executor on the system jq with a private query-file directory
    ///
    /// Keep the returned `TempDir` alive for as long as the executor is used.
    pub fn test_executor() -> (TempDir, JqExecutor) {
        let cache = TempDir::new().unwrap();
        let executor = JqExecutor::new(system_jq()).with_cache_dir(cache.path());
        (cache, executor)
    }
}
