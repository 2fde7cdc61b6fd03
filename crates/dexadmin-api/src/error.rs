use axum::{
    http::{
        header::{CONTENT_TYPE, WWW_AUTHENTICATE, X_CONTENT_TYPE_OPTIONS},
        HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use thiserror::Error;

/// Realm advertised to clients that fail authentication.
const AUTH_REALM: &str = r#"Basic realm="dex admin""#;

/// Errors returned to admin API callers. Rendered as plain text.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("authorization failed")]
    Unauthorized,

    /// Caller fault: malformed or out-of-range input.
    #[error("{0}")]
    BadRequest(String),

    /// Server fault: the exchange core could not do what was asked even
    /// though the request passed validation.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError::BadRequest(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ApiError::Internal(msg) = &self {
            tracing::error!(status = status.as_u16(), "{}", msg);
        }

        let mut response = (
            status,
            [
                (CONTENT_TYPE, "text/plain; charset=utf-8"),
                (X_CONTENT_TYPE_OPTIONS, "nosniff"),
            ],
            format!("{}\n", self),
        )
            .into_response();

        if let ApiError::Unauthorized = self {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static(AUTH_REALM));
        }
        response
    }
}

/// Errors from running the admin HTTP server
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind admin server to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("TLS setup failed: {0}")]
    Tls(String),

    #[error("admin server IO error: {0}")]
    Io(#[from] std::io::Error),
}
