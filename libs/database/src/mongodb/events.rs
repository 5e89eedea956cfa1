//! Driver event wiring
//!
//! Translates the driver's SDAM (server discovery and monitoring) events into
//! connected / error / disconnected transitions on a [`ConnectionMonitor`].

use mongodb::ServerType;
use mongodb::event::EventHandler;
use mongodb::event::sdam::{SdamEvent, TopologyDescription};
use std::fmt::Display;
use tracing::{debug, trace};

use super::ConnectionMonitor;

/// Build the SDAM handler to install on the client options before the client is created
pub fn sdam_handler(monitor: ConnectionMonitor) -> EventHandler<SdamEvent> {
    EventHandler::callback(move |event: SdamEvent| handle_sdam_event(&monitor, event))
}

fn handle_sdam_event(monitor: &ConnectionMonitor, event: SdamEvent) {
    match event {
        SdamEvent::TopologyDescriptionChanged(change) => {
            apply_availability(
                monitor,
                has_available_server(&change.previous_description),
                has_available_server(&change.new_description),
            );
        }
        SdamEvent::ServerHeartbeatFailed(failed) => {
            route_heartbeat_failure(monitor, &failed.server_address, &failed.failure);
        }
        other => trace!(event = ?other, "Ignoring SDAM event"),
    }
}

/// Report a failed heartbeat. Returns true when it was logged as a connection error.
///
/// Only a failure on a live connection is an error; while disconnected or
/// connecting the driver retries on its own and the failure goes to debug.
fn route_heartbeat_failure(
    monitor: &ConnectionMonitor,
    server: &dyn Display,
    failure: &dyn Display,
) -> bool {
    if monitor.is_connected() {
        monitor.on_error(failure);
        true
    } else {
        debug!(server = %server, error = %failure, "MongoDB heartbeat failed");
        false
    }
}

fn has_available_server(description: &TopologyDescription) -> bool {
    description
        .servers()
        .values()
        .any(|server| !matches!(server.server_type(), ServerType::Unknown))
}

/// Apply a before/after availability pair to the monitor
fn apply_availability(monitor: &ConnectionMonitor, was_available: bool, is_available: bool) {
    match (was_available, is_available) {
        (false, true) => {
            monitor.on_connected();
        }
        (true, false) => {
            monitor.on_disconnected();
        }
        _ => {}
    }
}
