//! Trust bundle parsing and certificate summaries

pub mod bundle;
pub mod certificate;

pub use bundle::{parse, TrustBundle, TrustBundleEntry, TRUST_BUNDLE_MAGIC};
pub use certificate::{
    CertificateDecoder, CertificateSummary, FingerprintDecoder, NoCertificates, X509Decoder,
};
