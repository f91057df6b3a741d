//! pkiverify-lib: certificate trust decisions for monitoring checks.
//!
//! Given an expected common name, a certificate, and a CA certificate (each
//! optional), [`run`] picks one verification mode, performs it, and returns a
//! [`VerificationOutcome`] whose [`ServiceState`] maps to a monitoring-plugin
//! exit code (0 = OK, 2 = CRITICAL).

mod fields;
mod fingerprint;
mod loader;
mod oid;
mod outcome;
mod parser;
mod report;
mod request;
mod strategy;
mod trust;
mod util;

use std::path::{Path, PathBuf};

pub use fields::{
    BasicConstraints, Certificate, DateTime, DistinguishedName, PublicKeyInfo, SanEntry,
};
pub use fingerprint::compute_fingerprint;
pub use loader::{load_certificate, MAX_INPUT_BYTES};
pub use outcome::{ServiceState, VerificationOutcome, LOG_TARGET};
pub use parser::{parse_cert, parse_der, parse_pem};
pub use report::render_report;
pub use request::{VerificationMode, VerificationRequest};
pub use strategy::run;
pub use trust::{is_certificate_authority, verifies_against, VerificationError, VerifyOptions};

/// Errors from decoding certificate bytes.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("empty input")]
    Empty,

    #[error("invalid PEM format: {0}")]
    Pem(String),

    #[error("invalid DER format: {0}")]
    Der(String),

    #[error("unsupported X.509 version {0} (expected v1, v2, or v3)")]
    UnsupportedVersion(u32),
}

/// A certificate file could not be turned into a [`Certificate`].
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read certificate file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(
        "certificate file '{}' is too large ({size} bytes, max {max} bytes)",
        path.display()
    )]
    TooLarge { path: PathBuf, size: u64, max: u64 },

    #[error("cannot parse certificate file '{}': {source}", path.display())]
    Parse { path: PathBuf, source: ParseError },
}

impl LoadError {
    /// The file that failed to load.
    pub fn path(&self) -> &Path {
        match self {
            LoadError::Io { path, .. }
            | LoadError::TooLarge { path, .. }
            | LoadError::Parse { path, .. } => path,
        }
    }
}

/// Failures that abort a run instead of producing an outcome.
#[derive(Debug, thiserror::Error)]
pub enum PkiVerifyError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("failed to write certificate report: {0}")]
    Io(#[from] std::io::Error),
}
