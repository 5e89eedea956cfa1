use mongodb::Client;
use serde::Serialize;
use std::time::Instant;

use super::ConnectionState;
use super::connector::verify;

/// Health check status for MongoDB
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Whether the database answered a ping
    pub healthy: bool,
    /// Tracked connection state at the time of the check
    pub state: ConnectionState,
    /// Optional message (e.g., error details)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Response time in milliseconds
    pub response_time_ms: u64,
}

impl HealthStatus {
    /// Status for a handle that holds no client
    pub fn not_connected(state: ConnectionState) -> Self {
        Self {
            healthy: false,
            state,
            message: Some(format!("MongoDB is {state}")),
            response_time_ms: 0,
        }
    }
}

/// Check MongoDB health with a `ping` command
///
/// # Example
/// ```ignore
/// use database::mongodb::{connect, check_health};
///
/// let client = connect("mongodb://localhost:27017").await?;
/// let healthy = check_health(&client).await;
/// ```
pub async fn check_health(client: &Client) -> bool {
    verify(client).await.is_ok()
}

/// Check MongoDB health with timing information and any error message
pub async fn check_health_detailed(client: &Client, state: ConnectionState) -> HealthStatus {
    let start = Instant::now();
    let result = verify(client).await;
    let response_time_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(()) => HealthStatus {
            healthy: true,
            state,
            message: None,
            response_time_ms,
        },
        Err(e) => HealthStatus {
            healthy: false,
            state,
            message: Some(e.to_string()),
            response_time_ms,
        },
    }
}
