//! MongoDB connector and connection lifecycle
//!
//! Provides connection management, state tracking and MongoDB-specific helpers.

mod config;
mod connector;
mod events;
mod health;
mod lifecycle;
mod state;

#[cfg(test)]
mod log_capture;

pub use config::{DEFAULT_URI, FALLBACK_DATABASE, MongoConfig};
pub use connector::{MongoError, client_options, connect, connect_from_config};
pub use events::sdam_handler;
pub use health::{HealthStatus, check_health, check_health_detailed};
pub use lifecycle::MongoDatabase;
pub use state::{ConnectionMonitor, ConnectionState, UNKNOWN_STATUS, status_label};

// Re-export MongoDB types for convenience
pub use mongodb::{Client, Collection, Database};
