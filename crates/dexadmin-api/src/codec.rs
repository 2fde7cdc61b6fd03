use axum::{
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::ApiError;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// A successful response body: indented JSON followed by a newline.
#[derive(Debug, Clone)]
pub struct PrettyJson<T>(pub T);

/// Encode a value the way every successful admin response is written.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut body = serde_json::to_vec_pretty(value)?;
    body.push(b'\n');
    Ok(body)
}

impl<T: Serialize> IntoResponse for PrettyJson<T> {
    fn into_response(self) -> Response {
        match encode(&self.0) {
            Ok(body) => (StatusCode::OK, [(CONTENT_TYPE, JSON_CONTENT_TYPE)], body).into_response(),
            Err(e) => ApiError::Internal(format!("JSON encode error: {}", e)).into_response(),
        }
    }
}
