//! SNILS Demo Server
//!
//! Serves a small employee directory with SNILS numbers in it, for trying
//! out page extraction, plus a JSON API over the extraction core.

pub mod http;
pub mod pages;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Environment variable holding the bind address
pub const ADDR_ENV: &str = "SNILS_ADDR";

/// Bind address used when `SNILS_ADDR` is not set
pub const DEFAULT_ADDR: &str = "127.0.0.1:5000";

/// An employee listed on the demo pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub name: String,
    /// SNILS as it should appear on the page
    pub snils: String,
}

impl Employee {
    pub fn new(name: impl Into<String>, snils: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            snils: snils.into(),
        }
    }
}

/// Shared application state
pub struct AppState {
    pub employees: Vec<Employee>,
}

impl AppState {
    pub fn new(employees: Vec<Employee>) -> Self {
        Self { employees }
    }

    /// State with the built-in sample employees; every number carries a valid checksum
    pub fn with_demo_employees() -> Self {
        Self::new(vec![
            Employee::new("Иванов Иван", "112-233-445 95"),
            Employee::new("Петров Петр", "156-789-123 17"),
            Employee::new("Сидорова Анна", "234-567-890 99"),
        ])
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_demo_employees()
    }
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Create the router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Demo pages
        .route("/", get(pages::index))
        .route("/employees", get(pages::employees))
        // API endpoints
        .route("/api/extract", post(http::extract))
        .route("/api/validate/{value}", get(http::validate))
        .route("/health", get(http::health))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `addr` and serve until the process stops
pub async fn serve(addr: &str, state: Arc<AppState>) -> Result<(), ServerError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.to_string(),
            source,
        })?;
    serve_listener(listener, state).await
}

/// Serve on an already bound listener
pub async fn serve_listener(listener: TcpListener, state: Arc<AppState>) -> Result<(), ServerError> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("SNILS demo server listening on {}", addr);
    }
    axum::serve(listener, create_router(state)).await?;
    Ok(())
}
