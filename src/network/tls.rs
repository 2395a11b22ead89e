//! TLS client configuration for BMC and inventory connections
//!
//! Management controllers almost always present self-signed certificates,
//! so the BMC client skips certificate-chain validation unless an operator
//! supplies a CA bundle to pin against. The inventory API client uses the
//! regular webpki root store.

use crate::error::{InventoryError, Result};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, RootCertStore};
use std::path::Path;
use std::sync::Arc;

fn builder() -> Result<rustls::ConfigBuilder<ClientConfig, rustls::WantsVerifier>> {
    ClientConfig::builder_with_provider(Arc::new(rustls::crypto::ring::default_provider()))
        .with_safe_default_protocol_versions()
        .map_err(|e| InventoryError::config(format!("TLS protocol setup failed: {}", e)))
}

/// Client config that accepts any server certificate.
///
/// Only meant for BMCs with self-signed certificates.
pub fn insecure_client_config() -> Result<ClientConfig> {
    Ok(builder()?
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(SkipServerVerification))
        .with_no_client_auth())
}

/// Client config trusting only the certificates in a PEM bundle
pub fn pinned_client_config(ca_pem: &[u8]) -> Result<ClientConfig> {
    let certs: Vec<CertificateDer<'static>> = rustls_pemfile::certs(&mut &*ca_pem)
        .collect::<std::result::Result<_, _>>()
        .map_err(|e| InventoryError::config(format!("Invalid CA bundle: {}", e)))?;

    if certs.is_empty() {
        return Err(InventoryError::config("CA bundle contains no certificates"));
    }

    let mut roots = RootCertStore::empty();
    let (added, ignored) = roots.add_parsable_certificates(certs);
    if added == 0 {
        return Err(InventoryError::config(format!(
            "CA bundle has no usable certificates ({} rejected)",
            ignored
        )));
    }

    Ok(builder()?.with_root_certificates(roots).with_no_client_auth())
}

/// Load a PEM bundle from disk and build a pinned client config
pub fn pinned_client_config_from_file(path: &Path) -> Result<ClientConfig> {
    let pem = std::fs::read(path).map_err(|e| {
        InventoryError::config(format!("Failed to read CA bundle {:?}: {}", path, e))
    })?;
    tracing::info!("Verifying BMC certificate against {:?}", path);
    pinned_client_config(&pem)
}

/// Client config trusting the bundled webpki roots
pub fn default_client_config() -> Result<ClientConfig> {
    let mut roots = RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    Ok(builder()?.with_root_certificates(roots).with_no_client_auth())
}

/// Skip server certificate verification (for self-signed BMC certs).
///
/// Signatures are not checked either; the handshake only proves the peer
/// speaks TLS, not who it is.
#[derive(Debug)]
struct SkipServerVerification;

impl rustls::client::danger::ServerCertVerifier for SkipServerVerification {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> std::result::Result<rustls::client::danger::ServerCertVerified, rustls::Error> {
        Ok(rustls::client::danger::ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> std::result::Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &rustls::DigitallySignedStruct,
    ) -> std::result::Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<rustls::SignatureScheme> {
        rustls::crypto::ring::default_provider()
            .signature_verification_algorithms
            .supported_schemes()
    }
}
