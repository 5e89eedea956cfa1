//! MongoDB test infrastructure
//!
//! Provides a `TestMongo` helper that creates a MongoDB container for testing.

use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::mongo::Mongo;

const MONGO_PORT: u16 = 27017;

/// Test MongoDB wrapper
///
/// The container is stopped and removed when the wrapped `ContainerAsync` is dropped.
pub struct TestMongo {
    #[allow(dead_code)]
    container: ContainerAsync<Mongo>,
    host_port: u16,
}

impl TestMongo {
    /// Start a standalone MongoDB 7 container
    pub async fn new() -> Self {
        let container = Mongo::default()
            .with_tag("7.0")
            .start()
            .await
            .expect("Failed to start MongoDB container");

        let host_port = container
            .get_host_port_ipv4(MONGO_PORT)
            .await
            .expect("Failed to get MongoDB port");

        tracing::info!(port = host_port, "Test MongoDB ready (mongo 7.0)");

        Self {
            container,
            host_port,
        }
    }

    /// Connection string without a database path
    pub fn uri(&self) -> String {
        mongo_uri(self.host_port, None)
    }

    /// Connection string pointing at `database`
    pub fn uri_for(&self, database: &str) -> String {
        mongo_uri(self.host_port, Some(database))
    }

    pub fn host_port(&self) -> u16 {
        self.host_port
    }
}

fn mongo_uri(port: u16, database: Option<&str>) -> String {
    match database {
        Some(database) => format!("mongodb://127.0.0.1:{port}/{database}"),
        None => format!("mongodb://127.0.0.1:{port}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mongo_uri() {
        assert_eq!(mongo_uri(32768, None), "mongodb://127.0.0.1:32768");
        assert_eq!(
            mongo_uri(32768, Some("test_connect")),
            "mongodb://127.0.0.1:32768/test_connect"
        );
    }
}
