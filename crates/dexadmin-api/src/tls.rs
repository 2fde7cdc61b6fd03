use rustls::pki_types::{pem::PemObject, CertificateDer, PrivateKeyDer};
use rustls::ServerConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_rustls::TlsAcceptor;

use crate::error::ServerError;

/// PEM certificate chain and private key the admin server presents.
///
/// Provisioning the files is up to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsConfig {
    pub cert: PathBuf,
    pub key: PathBuf,
}

fn tls_error(path: &Path, what: &str, err: impl std::fmt::Display) -> ServerError {
    ServerError::Tls(format!("failed to load {} {}: {}", what, path.display(), err))
}

fn load_certs(path: &Path) -> Result<Vec<CertificateDer<'static>>, ServerError> {
    let certs = CertificateDer::pem_file_iter(path)
        .and_then(|certs| certs.collect::<Result<Vec<_>, _>>())
        .map_err(|e| tls_error(path, "certificate", e))?;
    if certs.is_empty() {
        return Err(tls_error(path, "certificate", "no certificates found"));
    }
    Ok(certs)
}

impl TlsConfig {
    pub fn new(cert: impl Into<PathBuf>, key: impl Into<PathBuf>) -> Self {
        TlsConfig {
            cert: cert.into(),
            key: key.into(),
        }
    }

    /// Read the certificate and key and build the TLS acceptor.
    pub fn acceptor(&self) -> Result<TlsAcceptor, ServerError> {
        let certs = load_certs(&self.cert)?;
        let key = PrivateKeyDer::from_pem_file(&self.key).map_err(|e| tls_error(&self.key, "key", e))?;

        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let mut config = ServerConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()
            .map_err(|e| ServerError::Tls(e.to_string()))?
            .with_no_client_auth()
            .with_single_cert(certs, key)
            .map_err(|e| ServerError::Tls(format!("certificate and key do not match: {}", e)))?;
        config.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];

        Ok(TlsAcceptor::from(Arc::new(config)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_files() {
        let config = TlsConfig::new("/nonexistent/cert.pem", "/nonexistent/key.pem");
        match config.acceptor() {
            Err(ServerError::Tls(msg)) => assert!(msg.contains("certificate"), "{}", msg),
            other => panic!("expected a TLS error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_empty_certificate_file() {
        let mut cert = tempfile::NamedTempFile::new().unwrap();
        cert.write_all(b"not a pem file\n").unwrap();
        let config = TlsConfig::new(cert.path(), "/nonexistent/key.pem");
        match config.acceptor() {
            Err(ServerError::Tls(msg)) => assert!(msg.contains("no certificates found"), "{}", msg),
            other => panic!("expected a TLS error, got {:?}", other.map(|_| ())),
        }
    }
}
