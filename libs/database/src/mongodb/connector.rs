use mongodb::bson::doc;
use mongodb::event::EventHandler;
use mongodb::event::sdam::SdamEvent;
use mongodb::{Client, options::ClientOptions};
use std::time::Duration;
use tracing::info;

use super::MongoConfig;

/// Error type for MongoDB operations
#[derive(Debug, thiserror::Error)]
pub enum MongoError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Closing the connection did not finish within {0:?}")]
    ShutdownTimeout(Duration),
}

/// Build driver options from a [`MongoConfig`]
///
/// The SDAM handler, when given, must be attached here: the driver only picks
/// up event handlers at client construction.
pub async fn client_options(
    config: &MongoConfig,
    sdam_handler: Option<EventHandler<SdamEvent>>,
) -> Result<ClientOptions, MongoError> {
    let mut options = ClientOptions::parse(&config.uri).await?;

    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);
    options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
    options.server_selection_timeout =
        Some(Duration::from_secs(config.server_selection_timeout_secs));
    let from_uri = options.default_database.take();
    options.default_database = Some(config.resolve_database(from_uri));

    if let Some(ref app_name) = config.app_name {
        options.app_name = Some(app_name.clone());
    }

    if let Some(handler) = sdam_handler {
        options.sdam_event_handler = Some(handler);
    }

    Ok(options)
}

/// Round-trip a `ping` to the server; the driver connects lazily otherwise
pub(crate) async fn verify(client: &Client) -> Result<(), MongoError> {
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| MongoError::ConnectionFailed(e.to_string()))?;
    Ok(())
}

/// Connect to MongoDB and return a verified Client
///
/// # Example
/// ```ignore
/// use database::mongodb::connect;
///
/// let client = connect("mongodb://localhost:27017/wow-items").await?;
/// let db = client.default_database();
/// ```
pub async fn connect(uri: &str) -> Result<Client, MongoError> {
    connect_from_config(&MongoConfig::new(uri)).await
}

/// Connect using a MongoConfig, without state tracking
///
/// Use [`MongoDatabase`](super::MongoDatabase) when the connection state
/// needs to be observed.
pub async fn connect_from_config(config: &MongoConfig) -> Result<Client, MongoError> {
    info!(uri = %config.redacted_uri(), "Attempting to connect to MongoDB");

    let options = client_options(config, None).await?;
    let database = options.default_database.clone().unwrap_or_default();
    let client = Client::with_options(options)?;
    verify(&client).await?;

    info!(database = %database, "Successfully connected to MongoDB");
    Ok(client)
}
