use axum::body::Bytes;
use serde::de::DeserializeOwned;
use tracing::warn;

use super::types::ApiErrorType;

/// Decodes a JSON request body. The `Content-Type` header is not checked.
pub fn decode_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiErrorType> {
    serde_json::from_slice(body).map_err(|e| {
        warn!("Rejected request body: {}", e);
        ApiErrorType::invalid_input("Invalid request body")
    })
}

/// Parses a positive integer path parameter, e.g. `parse_id("7", "student")`.
pub fn parse_id(raw: &str, entity: &str) -> Result<i64, ApiErrorType> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => {
            warn!("Rejected {} id {:?}", entity, raw);
            Err(ApiErrorType::invalid_input(format!("Invalid {entity} ID")))
        }
    }
}

/// Builds the schedule export filename. Anything outside ASCII letters,
/// digits, `-`, `_` and `.` becomes `_`, so the name is a safe header token.
pub fn attachment_filename(first_name: &str, last_name: &str) -> String {
    format!("schedule_{first_name}_{last_name}.pdf")
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' => c,
            _ => '_',
        })
        .collect()
}
