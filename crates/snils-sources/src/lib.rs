//! Text sources for SNILS extraction
//!
//! Everything here exists to turn some outside resource into a `String`
//! for [`snils_identifiers::extract`]:
//! - files, decoded with a preferred encoding and fallbacks
//! - web pages fetched over HTTP, optionally stripped of markup
//! - configuration for both, loaded from TOML
//!
//! Failures are reported as [`SourceError`] so callers can tell an
//! unavailable source apart from a source with no numbers in it.

pub mod config;
pub mod fetch;
pub mod file;
pub mod html;

use std::path::PathBuf;

use thiserror::Error;

pub use config::{ConfigError, FetchConfig, FileConfig, SnilsConfig};
pub use fetch::{normalize_url, WebFetcher};
pub use file::{decode_with_fallback, read_text_file, scan_file};
pub use html::strip_html;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),
    #[error("Could not decode text with any of: {}", tried.join(", "))]
    Decode { tried: Vec<String> },
    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },
    #[error("Request to {url} timed out")]
    Timeout { url: String },
    #[error("Request failed: {message}")]
    Request { message: String },
    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },
}
