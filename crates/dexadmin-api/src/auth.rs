use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha2::{Digest, Sha256};
use std::fmt;
use std::net::SocketAddr;
use subtle::ConstantTimeEq;

use crate::error::ApiError;
use crate::state::AppState;

/// SHA-256 digest of the admin password.
///
/// Only the digest is held. Any username is accepted with the right password.
#[derive(Clone)]
pub struct AuthSecret {
    digest: [u8; 32],
}

fn sha256(data: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(data));
    out
}

impl AuthSecret {
    pub fn from_password(password: &str) -> Self {
        AuthSecret {
            digest: sha256(password.as_bytes()),
        }
    }

    pub fn from_digest(digest: [u8; 32]) -> Self {
        AuthSecret { digest }
    }

    /// Parse a hex-encoded SHA-256 digest.
    pub fn from_hex_digest(s: &str) -> Result<Self, hex::FromHexError> {
        let mut digest = [0u8; 32];
        hex::decode_to_slice(s, &mut digest)?;
        Ok(AuthSecret { digest })
    }

    /// Check a presented password. The digests are compared in constant time.
    pub fn verify(&self, password: &str) -> bool {
        let presented = sha256(password.as_bytes());
        bool::from(self.digest[..].ct_eq(&presented[..]))
    }
}

impl fmt::Debug for AuthSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthSecret(..)")
    }
}

/// Extract the `(user, password)` pair from a basic `Authorization` header.
pub fn basic_auth(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}

/// Middleware guarding every admin route.
pub async fn require_auth(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let authorized = basic_auth(req.headers())
        .map(|(_, pass)| state.auth.verify(&pass))
        .unwrap_or(false);

    if !authorized {
        tracing::warn!(%peer, "admin authentication failure");
        return Err(ApiError::Unauthorized);
    }

    tracing::debug!(%peer, path = %req.uri().path(), "admin request authenticated");
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_verify() {
        let secret = AuthSecret::from_password("password123");
        assert!(secret.verify("password123"));
        assert!(!secret.verify("assword123"));
        assert!(!secret.verify(""));
    }

    #[test]
    fn test_from_hex_digest_matches_password() {
        let hex_digest = hex::encode(Sha256::digest(b"password123"));
        let secret = AuthSecret::from_hex_digest(&hex_digest).unwrap();
        assert!(secret.verify("password123"));
        assert!(AuthSecret::from_hex_digest("abcd").is_err());
    }

    #[test]
    fn test_basic_auth_parsing() {
        let encoded = STANDARD.encode("user:pa:ss");
        let (user, pass) = basic_auth(&headers_with(&format!("Basic {}", encoded))).unwrap();
        assert_eq!(user, "user");
        assert_eq!(pass, "pa:ss");

        assert!(basic_auth(&HeaderMap::new()).is_none());
        assert!(basic_auth(&headers_with("Bearer abc")).is_none());
        assert!(basic_auth(&headers_with("Basic !!!")).is_none());
    }

    #[test]
    fn test_debug_hides_digest() {
        let secret = AuthSecret::from_password("password123");
        assert_eq!(format!("{:?}", secret), "AuthSecret(..)");
    }
}
