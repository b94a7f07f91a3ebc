use crate::utils::error::{AppError, AppResult};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const UI_STATE_COOKIE: &str = "safari_ui";
pub const TOUR_FILTERS_COOKIE: &str = "safari_tour_filters";

/// Serialize a state container into a cookie-safe string.
pub fn encode<T: Serialize>(state: &T) -> AppResult<String> {
    let json = serde_json::to_string(state)
        .map_err(|e| AppError::BadRequest(format!("cannot persist state: {}", e)))?;
    Ok(urlencoding::encode(&json).into_owned())
}

/// Inverse of [`encode`]. Anything malformed is an error, never a silent default.
pub fn decode<T: DeserializeOwned>(raw: &str) -> AppResult<T> {
    let json = urlencoding::decode(raw)
        .map_err(|e| AppError::BadRequest(format!("persisted state is not valid UTF-8: {}", e)))?;
    serde_json::from_str(&json)
        .map_err(|e| AppError::BadRequest(format!("persisted state is malformed: {}", e)))
}
