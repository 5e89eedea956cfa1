//! Common utilities shared across database implementations

pub mod shutdown;

pub use shutdown::{ShutdownCoordinator, ShutdownSignal, shutdown_signal};
