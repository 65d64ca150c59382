use axum::{Json, extract::rejection::JsonRejection};

use super::ApiError;

/// Unwraps a JSON body, turning any rejection into a 400 with our error body.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::validation(format!("Invalid request body: {}", rejection.body_text())))
}

/// Requires a non-blank string parameter and returns it trimmed.
pub fn require_str(value: Option<String>, field: &str) -> Result<String, ApiError> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::validation(format!("Missing required parameter: {field}"))),
    }
}

/// Requires a non-blank secret and returns it exactly as sent.
pub fn require_secret(value: Option<String>, field: &str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::validation(format!("Missing required parameter: {field}"))),
    }
}

pub fn require_number(value: Option<f64>, field: &str) -> Result<f64, ApiError> {
    let value = value.ok_or_else(|| ApiError::validation(format!("Missing required parameter: {field}")))?;

    if !value.is_finite() || value < 0.0 {
        return Err(ApiError::validation(format!(
            "Invalid {field}: {value}. Must be a number >= 0"
        )));
    }

    Ok(value)
}

/// Like [`require_number`] but falls back to `default` when absent.
pub fn number_or(value: Option<f64>, default: f64, field: &str) -> Result<f64, ApiError> {
    require_number(Some(value.unwrap_or(default)), field)
}
