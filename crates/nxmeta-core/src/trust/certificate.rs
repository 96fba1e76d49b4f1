//! Certificate summaries for trust bundle payloads
//!
//! Decoding is a seam: the bundle parser hands each payload to a
//! [`CertificateDecoder`]. Summaries are informational only; nothing here
//! validates a chain or makes a trust decision.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use x509_parser::certificate::X509Certificate;

/// Reporting fields extracted from a DER certificate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateSummary {
    /// Lowercase hex SHA-256 over the DER bytes
    pub sha256_fingerprint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_after: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_algorithm: Option<String>,
}

impl CertificateSummary {
    /// Summary carrying only the fingerprint of `der`
    pub fn fingerprint_only(der: &[u8]) -> Self {
        Self {
            sha256_fingerprint: sha256_hex(der),
            serial_number: None,
            not_before: None,
            not_after: None,
            issuer: None,
            subject: None,
            signature_algorithm: None,
        }
    }
}

/// Turns a DER payload into a summary, or `None` if it is not a certificate
pub trait CertificateDecoder {
    fn decode(&self, der: &[u8]) -> Option<CertificateSummary>;
}

/// Decoder that records the SHA-256 fingerprint of every non-empty payload
#[derive(Debug, Default, Clone, Copy)]
pub struct FingerprintDecoder;

impl CertificateDecoder for FingerprintDecoder {
    fn decode(&self, der: &[u8]) -> Option<CertificateSummary> {
        if der.is_empty() {
            return None;
        }
        Some(CertificateSummary::fingerprint_only(der))
    }
}

/// Decoder that reads X.509 fields out of DER certificates.
///
/// Payloads that do not parse as a certificate still get a fingerprint-only
/// summary; empty payloads get none.
#[derive(Debug, Default, Clone, Copy)]
pub struct X509Decoder;

impl CertificateDecoder for X509Decoder {
    fn decode(&self, der: &[u8]) -> Option<CertificateSummary> {
        if der.is_empty() {
            return None;
        }
        let mut summary = CertificateSummary::fingerprint_only(der);
        if let Ok((_, cert)) = x509_parser::parse_x509_certificate(der) {
            fill_from_certificate(&mut summary, &cert);
        }
        Some(summary)
    }
}

fn fill_from_certificate(summary: &mut CertificateSummary, cert: &X509Certificate<'_>) {
    let validity = cert.validity();
    summary.serial_number = Some(serial_hex(cert.raw_serial()));
    summary.not_before = Some(validity.not_before.to_string());
    summary.not_after = Some(validity.not_after.to_string());
    summary.issuer = Some(cert.issuer().to_string());
    summary.subject = Some(cert.subject().to_string());
    summary.signature_algorithm = Some(cert.signature_algorithm.algorithm.to_id_string());
}

/// `0x`-prefixed uppercase hex of a big-endian serial, without leading zeros
fn serial_hex(raw: &[u8]) -> String {
    let digits = hex::encode_upper(raw);
    let trimmed = digits.trim_start_matches('0');
    format!("0x{}", if trimmed.is_empty() { "0" } else { trimmed })
}

/// Decoder for bundles whose payloads are not certificates
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCertificates;

impl CertificateDecoder for NoCertificates {
    fn decode(&self, _der: &[u8]) -> Option<CertificateSummary> {
        None
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
