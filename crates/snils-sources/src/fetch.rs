//! Fetching web pages over HTTP using reqwest

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use snils_identifiers::{extract, ExtractedSnils};
use url::Url;

use crate::config::FetchConfig;
use crate::html::strip_html;
use crate::SourceError;

/// Parse a user-supplied URL, assuming `http://` when no scheme is given
pub fn normalize_url(raw: &str) -> Result<Url, SourceError> {
    let trimmed = raw.trim();
    let invalid = || SourceError::InvalidUrl {
        url: raw.to_string(),
    };
    if trimmed.is_empty() {
        return Err(invalid());
    }

    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };

    let url = Url::parse(&with_scheme).map_err(|_| invalid())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(invalid()),
    }
}

/// HTTP client that returns page text ready for extraction
pub struct WebFetcher {
    client: Client,
    config: FetchConfig,
}

impl WebFetcher {
    pub fn new(config: FetchConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| SourceError::Request {
                message: e.to_string(),
            })?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// GET a page and return its text.
    ///
    /// Non-2xx responses are errors. HTML bodies are stripped of markup
    /// when the configuration asks for it.
    pub async fn fetch_text(&self, url: &str) -> Result<String, SourceError> {
        let url = normalize_url(url)?;
        tracing::debug!("Fetching {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| request_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("{} responded with {}", url, status);
            return Err(SourceError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let html = is_html(&response);
        let body = response
            .text()
            .await
            .map_err(|e| request_error(&url, e))?;
        tracing::debug!("Fetched {} bytes from {}", body.len(), url);

        if self.config.strip_html && html {
            Ok(strip_html(&body))
        } else {
            Ok(body)
        }
    }

    /// Fetch a page and extract SNILS from it
    pub async fn scan_url(
        &self,
        url: &str,
        validate: bool,
    ) -> Result<Vec<ExtractedSnils>, SourceError> {
        let text = self.fetch_text(url).await?;
        Ok(extract(&text, validate))
    }
}

/// Responses without a content type are treated as HTML
fn is_html(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map_or(true, |ct| ct.to_ascii_lowercase().contains("html"))
}

fn request_error(url: &Url, err: reqwest::Error) -> SourceError {
    if err.is_timeout() {
        SourceError::Timeout {
            url: url.to_string(),
        }
    } else {
        SourceError::Request {
            message: err.to_string(),
        }
    }
}
