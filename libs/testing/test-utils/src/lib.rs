//! Shared test utilities for database testing
//!
//! - `TestMongo`: MongoDB container with automatic cleanup (feature: "mongo")
//! - `database_name`: deterministic, collision-free database names per test
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::{TestMongo, database_name};
//!
//! #[tokio::test]
//! async fn my_mongo_test() {
//!     let mongo = TestMongo::new().await;
//!     let uri = mongo.uri_for(&database_name("my_mongo_test"));
//! }
//! ```

#[cfg(feature = "mongo")]
mod mongo;

#[cfg(feature = "mongo")]
pub use mongo::TestMongo;

/// MongoDB rejects these in database names
const FORBIDDEN_DB_CHARS: &[char] = &['/', '\\', '.', ' ', '"', '$', '*', '<', '>', ':', '|', '?'];

/// Longest database name MongoDB accepts, in bytes
const MAX_DB_NAME_LEN: usize = 63;

/// Build a database name from a test name
///
/// The same test name always yields the same database name, so tests that
/// share a container never step on each other as long as their names differ.
pub fn database_name(test_name: &str) -> String {
    let sanitized: String = test_name
        .chars()
        .map(|c| {
            if FORBIDDEN_DB_CHARS.contains(&c) || !c.is_ascii() {
                '_'
            } else {
                c
            }
        })
        .collect();

    let mut name = format!("test_{sanitized}");
    name.truncate(MAX_DB_NAME_LEN);
    name
}
