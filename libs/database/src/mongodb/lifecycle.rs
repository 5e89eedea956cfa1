use mongodb::{Client, Database};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv};

use super::connector::{MongoError, client_options, verify};
use super::events::sdam_handler;
use super::health::{HealthStatus, check_health_detailed};
use super::{ConnectionMonitor, ConnectionState, FALLBACK_DATABASE, MongoConfig};
use crate::common::ShutdownCoordinator;

#[derive(Clone)]
struct Connection {
    client: Client,
    database: Database,
}

/// Process-wide MongoDB handle with tracked connection state.
///
/// Owns at most one client. Share it as `Arc<MongoDatabase>`; connect and
/// disconnect are serialised so concurrent callers never open two clients.
///
/// # Example
/// ```ignore
/// use database::mongodb::{MongoConfig, MongoDatabase};
///
/// let db = MongoDatabase::new(MongoConfig::default());
/// let items = db.connect().await?.collection::<Document>("items");
/// println!("{}", db.connection_status()); // "connected"
/// db.disconnect().await?;
/// ```
pub struct MongoDatabase {
    config: MongoConfig,
    monitor: ConnectionMonitor,
    connection: RwLock<Option<Connection>>,
    transition: Mutex<()>,
}

impl MongoDatabase {
    pub fn new(config: MongoConfig) -> Self {
        Self {
            config,
            monitor: ConnectionMonitor::new(),
            connection: RwLock::new(None),
            transition: Mutex::new(()),
        }
    }

    /// Build a handle from `MONGODB_URI` and friends, see [`MongoConfig`]
    #[cfg(feature = "config")]
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(MongoConfig::from_env()?))
    }

    /// Open the connection and return the configured database.
    ///
    /// Returns the existing handle when already connected. On failure the
    /// state goes back to `disconnected` and the error is logged and returned;
    /// deciding whether to exit is left to the caller.
    #[instrument(skip(self), fields(uri = %self.config.redacted_uri()))]
    pub async fn connect(&self) -> Result<Database, MongoError> {
        let _transition = self.transition.lock().await;

        if let Some(database) = self.database() {
            debug!("MongoDB already connected");
            return Ok(database);
        }

        self.monitor.begin_connect();
        info!("Connecting to MongoDB");

        match self.open().await {
            Ok(connection) => {
                let database = connection.database.clone();
                *self.write_connection() = Some(connection);
                self.monitor.confirm_connected();
                info!(database = %database.name(), "MongoDB connected successfully");
                Ok(database)
            }
            Err(e) => {
                self.monitor.reset();
                error!(error = %e, "MongoDB connection error");
                Err(e)
            }
        }
    }

    async fn open(&self) -> Result<Connection, MongoError> {
        let handler = sdam_handler(self.monitor.clone());
        let options = client_options(&self.config, Some(handler)).await?;
        let client = Client::with_options(options)?;
        verify(&client).await?;

        let database = client
            .default_database()
            .unwrap_or_else(|| client.database(FALLBACK_DATABASE));
        Ok(Connection { client, database })
    }

    /// Close the connection. Calling it when nothing is open is a no-op.
    ///
    /// The close is bounded by `shutdown_timeout_secs`; the state ends up
    /// `disconnected` either way.
    #[instrument(skip(self))]
    pub async fn disconnect(&self) -> Result<(), MongoError> {
        let _transition = self.transition.lock().await;

        let connection = self.write_connection().take();
        let Some(Connection { client, database }) = connection else {
            debug!("MongoDB connection already closed");
            return Ok(());
        };
        drop(database);

        self.monitor.begin_disconnect();
        let limit = Duration::from_secs(self.config.shutdown_timeout_secs);
        let closed = tokio::time::timeout(limit, async move { client.shutdown().await }).await;
        self.monitor.reset();

        match closed {
            Ok(()) => {
                info!("MongoDB connection closed");
                Ok(())
            }
            Err(_) => {
                error!(timeout = ?limit, "Error closing MongoDB connection");
                Err(MongoError::ShutdownTimeout(limit))
            }
        }
    }

    /// Close the connection once `coordinator` broadcasts shutdown.
    ///
    /// Close errors are logged; the task itself never fails.
    pub fn close_on_shutdown(self: Arc<Self>, coordinator: &ShutdownCoordinator) -> JoinHandle<()> {
        let coordinator = coordinator.clone();
        tokio::spawn(async move {
            coordinator.cancelled().await;
            info!("Closing MongoDB connection before exit");
            if let Err(e) = self.disconnect().await {
                error!(error = %e, "Error closing MongoDB connection");
            }
        })
    }

    /// Human-readable connection state: `disconnected`, `connected`,
    /// `connecting`, `disconnecting` or `unknown`
    pub fn connection_status(&self) -> &'static str {
        self.monitor.status()
    }

    pub fn state(&self) -> ConnectionState {
        self.monitor.state()
    }

    pub fn monitor(&self) -> &ConnectionMonitor {
        &self.monitor
    }

    pub fn config(&self) -> &MongoConfig {
        &self.config
    }

    /// The configured database, `None` until connected
    pub fn database(&self) -> Option<Database> {
        self.read_connection()
            .as_ref()
            .map(|connection| connection.database.clone())
    }

    pub fn client(&self) -> Option<Client> {
        self.read_connection()
            .as_ref()
            .map(|connection| connection.client.clone())
    }

    pub async fn health(&self) -> HealthStatus {
        match self.client() {
            Some(client) => check_health_detailed(&client, self.state()).await,
            None => HealthStatus::not_connected(self.state()),
        }
    }

    fn read_connection(&self) -> RwLockReadGuard<'_, Option<Connection>> {
        self.connection
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_connection(&self) -> RwLockWriteGuard<'_, Option<Connection>> {
        self.connection
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
