pub mod args;
pub mod executor;
pub mod query_file;

// Re-export public types
pub use executor::JqExecutor;
