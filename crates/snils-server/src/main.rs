//! SNILS Demo Server Binary

use std::sync::Arc;

use snils_server::{serve, AppState, ADDR_ENV, DEFAULT_ADDR};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let state = Arc::new(AppState::with_demo_employees());
    let addr = std::env::var(ADDR_ENV).unwrap_or_else(|_| DEFAULT_ADDR.to_string());

    serve(&addr, state).await?;
    Ok(())
}
