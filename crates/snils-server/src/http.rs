//! HTTP endpoint handlers

use axum::{extract::Path, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use snils_identifiers::{extract as extract_from_text, ExtractedSnils, Snils};

/// Request to extract SNILS from text
#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub text: String,
    /// Drop numbers with a bad checksum (default: true)
    pub validate: Option<bool>,
}

/// Response for extraction
#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractResponse {
    pub results: Vec<ExtractedSnils>,
    pub count: usize,
}

/// Extract SNILS from posted text
pub async fn extract(Json(request): Json<ExtractRequest>) -> Json<ExtractResponse> {
    let validate = request.validate.unwrap_or(true);
    let results = extract_from_text(&request.text, validate);
    tracing::debug!(
        "Extracted {} SNILS from {} bytes (validate: {})",
        results.len(),
        request.text.len(),
        validate
    );

    let count = results.len();
    Json(ExtractResponse { results, count })
}

/// Response for a single-number check
#[derive(Debug, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub input: String,
    pub valid: bool,
    pub canonical: String,
    pub checksum: u8,
    pub expected_checksum: u8,
}

/// Check one number; malformed input is a 400
pub async fn validate(
    Path(value): Path<String>,
) -> Result<Json<ValidateResponse>, (StatusCode, String)> {
    let snils: Snils = value
        .parse()
        .map_err(|e: snils_identifiers::SnilsError| (StatusCode::BAD_REQUEST, e.to_string()))?;

    Ok(Json(ValidateResponse {
        valid: snils.is_valid(),
        canonical: snils.to_string(),
        checksum: snils.checksum(),
        expected_checksum: snils.expected_checksum(),
        input: value,
    }))
}

/// Liveness check
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
