//! Connection readiness tracking

use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use strum::{AsRefStr, Display, IntoStaticStr};
use tracing::{error, info, warn};

/// Label reported for a raw state outside the known table
pub const UNKNOWN_STATUS: &str = "unknown";

/// Readiness of the MongoDB connection.
///
/// The discriminants are the raw values stored by [`ConnectionMonitor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, AsRefStr, IntoStaticStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum ConnectionState {
    Disconnected = 0,
    Connected = 1,
    Connecting = 2,
    Disconnecting = 3,
}

impl ConnectionState {
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::Disconnected),
            1 => Some(Self::Connected),
            2 => Some(Self::Connecting),
            3 => Some(Self::Disconnecting),
            _ => None,
        }
    }

    pub fn as_raw(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Human-readable label for a raw state value, `"unknown"` when out of range
pub fn status_label(raw: u8) -> &'static str {
    ConnectionState::from_raw(raw).map_or(UNKNOWN_STATUS, ConnectionState::as_str)
}

/// Sha/// Shared, lock-free view of the connection state.
///
/// Cloned into the driver's event handler so that topology changes observed by
/// the driver and explicit connect/disconnect calls update the same value.
/// Transitions to connected/disconnected are logged once per actual change.
#[derive(Clone, Default)]
pub struct ConnectionMonitor {
    state: Arc<AtomicU8>,
}

impl ConnectionMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self) -> u8 {
        self.state.load(Ordering::SeqCst)
    }

    /// Current state; a corrupted raw value reads as disconnected
    pub fn state(&self) -> ConnectionState {
        ConnectionState::from_raw(self.raw()).unwrap_or(ConnectionState::Disconnected)
    }

    pub fn status(&self) -> &'static str {
        status_label(self.raw())
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    pub fn begin_connect(&self) {
        self.set(ConnectionState::Connecting);
    }

    pub fn begin_disconnect(&self) {
        self.set(ConnectionState::Disconnecting);
    }

    /// The driver saw a server come back. Returns true when the state changed.
    ///
    /// Only a disconnected monitor is promoted: while connecting, the
    /// handshake in [`confirm_connected`](Self::confirm_connected) decides,
    /// and a close in progress is never undone.
    pub fn on_connected(&self) -> bool {
        self.promote(&[ConnectionState::Disconnected])
    }

    /// An explicit connect finished its handshake. Returns true when the state changed.
    pub fn confirm_connected(&self) -> bool {
        self.promote(&[ConnectionState::Disconnected, ConnectionState::Connecting])
    }

    /// The driver reported an error. The state is left as is.
    pub fn on_error(&self, err: &dyn fmt::Display) {
        error!(error = %err, "MongoDB connection error");
    }

    /// No server is reachable any more. Returns true when the state changed.
    pub fn on_disconnected(&self) -> bool {
        let previous = self
            .state
            .swap(ConnectionState::Disconnected.as_raw(), Ordering::SeqCst);
        let changed = previous != ConnectionState::Disconnected.as_raw();

        if changed {
            warn!(previous = status_label(previous), "MongoDB disconnected");
        }
        changed
    }

    /// Mark disconnected without logging, after a failed connect or a finished close
    pub fn reset(&self) {
        self.set(ConnectionState::Disconnected);
    }

    fn promote(&self, from: &[ConnectionState]) -> bool {
        let connected = ConnectionState::Connected.as_raw();
        let result = self.state.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |raw| {
            from.iter().any(|s| s.as_raw() == raw).then_some(connected)
        });

        let changed = result.is_ok();
        if changed {
            info!("MongoDB connection established");
        }
        changed
    }

    fn set(&self, state: ConnectionState) {
        self.state.store(state.as_raw(), Ordering::SeqCst);
    }
}

impl fmt::Debug for ConnectionMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionMonitor")
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels() {
        assert_eq!(status_label(0), "disconnected");
        assert_eq!(status_label(1), "connected");
        assert_eq!(status_label(2), "connecting");
        assert_eq!(status_label(3), "disconnecting");
        assert_eq!(status_label(4), "unknown");
        assert_eq!(status_label(u8::MAX), "unknown");
    }

    #[test]
    fn test_state_strings_match_serde() {
        for state in [
            ConnectionState::Disconnected,
            ConnectionState::Connected,
            ConnectionState::Connecting,
            ConnectionState::Disconnecting,
        ] {
            let json = serde_json::to_string(&state).unwrap();
            assert_eq!(json, format!("\"{}\"", state));
            assert_eq!(ConnectionState::from_raw(state.as_raw()), Some(state));
        }
    }

    #[test]
    fn test_monitor_starts_disconnected() {
        let monitor = ConnectionMonitor::new();
        assert_eq!(monitor.state(), ConnectionState::Disconnected);
        assert_eq!(monitor.status(), "disconnected");
        assert!(!monitor.is_connected());
    }

    #[test]
    fn test_connect_cycle() {
        let monitor = ConnectionMonitor::new();

        monitor.begin_connect();
        assert_eq!(monitor.status(), "connecting");

        assert!(monitor.confirm_connected());
        assert!(!monitor.confirm_connected());
        assert!(!monitor.on_connected());
        assert_eq!(monitor.status(), "connected");

        monitor.begin_disconnect();
        assert_eq!(monitor.status(), "disconnecting");

        assert!(monitor.on_disconnected());
        assert!(!monitor.on_disconnected());
        assert_eq!(monitor.status(), "disconnected");
    }

    #[test]
    fn test_driver_event_does_not_finish_a_pending_connect() {
        let monitor = ConnectionMonitor::new();
        monitor.begin_connect();

        assert!(!monitor.on_connected());
        assert_eq!(monitor.state(), ConnectionState::Connecting);

        // handshake failed: connect() resets without ever reporting connected
        monitor.reset();
        assert_eq!(monitor.status(), "disconnected");
    }

    #[test]
    fn test_connected_event_ignored_while_disconnecting() {
        let monitor = ConnectionMonitor::new();
        monitor.begin_disconnect();

        assert!(!monitor.on_connected());
        assert!(!monitor.confirm_connected());
        assert_eq!(monitor.state(), ConnectionState::Disconnecting);
    }

    #[test]
    fn test_reconnect_after_unexpected_loss() {
        let monitor = ConnectionMonitor::new();
        monitor.on_connected();
        assert!(monitor.on_disconnected());

        assert!(monitor.on_connected());
        assert!(monitor.is_connected());
    }

    #[test]
    fn test_error_keeps_state() {
        let monitor = ConnectionMonitor::new();
        monitor.on_connected();
        monitor.on_error(&"heartbeat failed");
        assert!(monitor.is_connected());
    }

    #[test]
    fn test_clones_share_state() {
        let monitor = ConnectionMonitor::new();
        let handler_side = monitor.clone();
        handler_side.on_connected();
        assert_eq!(monitor.status(), "connected");
    }
}
