//! wow-items backend - Entry Point
//!
//! Holds the MongoDB connection open until SIGINT/SIGTERM.

#[tokio::main]
async fn main() -> eyre::Result<()> {
    wow_items_backend::run().await
}
