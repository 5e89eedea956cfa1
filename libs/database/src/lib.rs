//! Database library providing the MongoDB connection lifecycle
//!
//! Opens a MongoDB connection from environment configuration, tracks and logs
//! the connection state, closes the connection on SIGINT/SIGTERM and reports a
//! human-readable status.
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB support
//! - `config` - Configuration support with `core_config::FromEnv`
//! - `all` - All features
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use database::common::ShutdownCoordinator;
//! use database::mongodb::{MongoConfig, MongoDatabase};
//!
//! let db = Arc::new(MongoDatabase::new(MongoConfig::default()));
//! db.connect().await?;
//! assert_eq!(db.connection_status(), "connected");
//!
//! let (coordinator, _rx) = ShutdownCoordinator::new();
//! let closer = db.clone().close_on_shutdown(&coordinator);
//! coordinator.wait_for_signal().await;
//! closer.await?;
//! assert_eq!(db.connection_status(), "disconnected");
//! ```

pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use common::{ShutdownCoordinator, ShutdownSignal};
