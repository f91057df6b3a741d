//! Trust checks between a subject certificate and a candidate authority.
//!
//! `verifies_against` answers "was this certificate issued and signed by that
//! CA?" and separates a plain "no" (`Ok(false)`) from a check that could not
//! be completed (`Err(VerificationError)`). Callers that only need pass/fail
//! treat both as failure.

use crate::fields::Certificate;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;
use x509_parser::prelude::*;

/// Options controlling chain verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyOptions {
    /// Whether to check the validity windows of the subject and the CA.
    pub check_time: bool,
    /// Verify at a specific Unix timestamp instead of the current time.
    pub at_time: Option<i64>,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            check_time: true,
            at_time: None,
        }
    }
}

impl VerifyOptions {
    fn check_instant(&self) -> i64 {
        self.at_time.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
                .unwrap_or(0)
        })
    }
}

/// Reasons a chain check could not reach a yes/no answer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerificationError {
    #[error("unsupported signature algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("malformed certificate: {0}")]
    Malformed(String),

    #[error("certificate is not yet valid (Not Before: {0})")]
    NotYetValid(String),

    #[error("certificate has expired (Not After: {0})")]
    Expired(String),

    #[error("issuer certificate ({0}) is not a CA certificate")]
    IssuerNotCa(String),

    #[error("CA certificate ({subject}) is not yet valid (Not Before: {not_before})")]
    IssuerNotYetValid { subject: String, not_before: String },

    #[error("CA certificate ({subject}) has expired (Not After: {not_after})")]
    IssuerExpired { subject: String, not_after: String },
}

/// Where an instant falls relative to a certificate's validity window.
enum Window {
    Before,
    Inside,
    After,
}

fn window(cert: &Certificate, now: i64) -> Window {
    if now < cert.not_before.timestamp {
        Window::Before
    } else if now > cert.not_after.timestamp {
        Window::After
    } else {
        Window::Inside
    }
}

/// Whether the certificate carries Basic Constraints with `cA = TRUE`.
pub fn is_certificate_authority(cert: &Certificate) -> bool {
    cert.basic_constraints.is_some_and(|bc| bc.ca)
}

/// Check that `subject` was issued and signed by `authority`.
///
/// Returns `Ok(false)` when the subject names a different issuer or its
/// signature does not verify under the authority's key. With
/// `options.check_time`, both certificates must be inside their validity
/// windows.
pub fn verifies_against(
    authority: &Certificate,
    subject: &Certificate,
    options: &VerifyOptions,
) -> Result<bool, VerificationError> {
    let (_, subject_x509) = X509Certificate::from_der(&subject.raw_der)
        .map_err(|e| VerificationError::Malformed(format!("subject certificate: {}", e)))?;
    let (_, authority_x509) = X509Certificate::from_der(&authority.raw_der)
        .map_err(|e| VerificationError::Malformed(format!("CA certificate: {}", e)))?;

    if !is_certificate_authority(authority) {
        return Err(VerificationError::IssuerNotCa(authority.subject_string()));
    }

    if subject_x509.issuer().as_raw() != authority_x509.subject().as_raw() {
        debug!(
            issuer = %subject.issuer,
            authority = %authority.subject,
            "issuer name does not match CA subject"
        );
        return Ok(false);
    }

    if options.check_time {
        let now = options.check_instant();
        match window(subject, now) {
            Window::Before => {
                return Err(VerificationError::NotYetValid(subject.not_before.to_openssl()))
            }
            Window::After => {
                return Err(VerificationError::Expired(subject.not_after.to_openssl()))
            }
            Window::Inside => {}
        }
        match window(authority, now) {
            Window::Before => {
                return Err(VerificationError::IssuerNotYetValid {
                    subject: authority.subject_string(),
                    not_before: authority.not_before.to_openssl(),
                })
            }
            Window::After => {
                return Err(VerificationError::IssuerExpired {
                    subject: authority.subject_string(),
                    not_after: authority.not_after.to_openssl(),
                })
            }
            Window::Inside => {}
        }
    }

    match subject_x509.verify_signature(Some(authority_x509.public_key())) {
        Ok(()) => Ok(true),
        Err(X509Error::SignatureVerificationError) => {
            debug!(subject = %subject.subject, "signature does not verify under CA key");
            Ok(false)
        }
        Err(X509Error::SignatureUnsupportedAlgorithm) => Err(
            VerificationError::UnsupportedAlgorithm(subject.signature_algorithm.clone()),
        ),
        Err(e) => Err(VerificationError::Malformed(e.to_string())),
    }
}
