use std::fmt;

/// Captured outcome of one jq process
///
/// A non-zero exit code is a normal outcome (invalid filter, `-e` with a
/// false result) and is reported here rather than as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JqResult {
    exit_code: i32,
    stdout: String,
    stderr: String,
}

impl JqResult {
    /// Build a result, trimming surrounding whitespace from both streams
    pub fn new(exit_code: i32, stdout: &str, stderr: &str) -> Self {
        Self {
            exit_code,
            stdout: stdout.trim().to_string(),
            stderr: stderr.trim().to_string(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Parse stdout as a single JSON value
    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.stdout)
    }

    pub fn into_stdout(self) -> String {
        self.stdout
    }
}

impl fmt::Display for JqResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stdout)
    }
}

impl AsRef<str> for JqResult {
    fn as_ref(&self) -> &str {
        &self.stdout
    }
}

impl From<JqResult> for String {
    fn from(result: JqResult) -> Self {
        result.stdout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streams_are_trimmed() {
        let result = JqResult::new(0, "\n  \"John\"\n\n", "  warn \r\n");
        assert_eq!(result.stdout(), "\"John\"");
        assert_eq!(result.stderr(), "warn");
    }

    #[test]
    fn test_success_follows_exit_code() {
        assert!(JqResult::new(0, "", "").success());
        assert!(!JqResult::new(5, "", "error").success());
    }

    #[test]
    fn test_string_conversions_use_stdout() {
        let result = JqResult::new(0, "John\n", "ignored");
        assert_eq!(result.to_string(), "John");
        assert_eq!(result.as_ref(), "John");
        let s: String = result.into();
        assert_eq!(s, "John");
    }

    #[test]
    fn test_json_parses_stdout() {
        let result = JqResult::new(0, r#"{"a":2,"m":3}"#, "");
        let value = result.json().unwrap();
        assert_eq!(value["a"], 2);
        assert_eq!(value["m"], 3);
    }

    #[test]
    fn test_json_rejects_multiple_values() {
        let result = JqResult::new(0, "1\n2", "");
        assert!(result.json().is_err());
    }
}
