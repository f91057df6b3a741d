//! Verification requests and mode selection.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// The question a request asks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationMode {
    /// Does the certificate's CN equal the expected name?
    CnMatch,
    /// Is the certificate signed by the given CA?
    ChainVerify,
    /// Is the given certificate a CA certificate?
    CaIdentity,
    /// Print the certificate, no trust decision.
    InspectOnly,
    /// No relevant input was supplied.
    NoOp,
}

impl std::fmt::Display for VerificationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            VerificationMode::CnMatch => "cn-match",
            VerificationMode::ChainVerify => "chain-verify",
            VerificationMode::CaIdentity => "ca-identity",
            VerificationMode::InspectOnly => "inspect-only",
            VerificationMode::NoOp => "no-op",
        };
        f.write_str(name)
    }
}

/// Up to three optional inputs describing what to verify.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationRequest {
    expected_cn: Option<String>,
    cert_path: Option<PathBuf>,
    ca_cert_path: Option<PathBuf>,
}

/// A resolved mode together with the inputs it consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Plan<'a> {
    CnMatch { expected_cn: &'a str, cert: &'a Path },
    ChainVerify { cert: &'a Path, ca_cert: &'a Path },
    CaIdentity { ca_cert: &'a Path },
    InspectOnly { cert: &'a Path },
    NoOp,
}

impl Plan<'_> {
    pub(crate) fn mode(&self) -> VerificationMode {
        match self {
            Plan::CnMatch { .. } => VerificationMode::CnMatch,
            Plan::ChainVerify { .. } => VerificationMode::ChainVerify,
            Plan::CaIdentity { .. } => VerificationMode::CaIdentity,
            Plan::InspectOnly { .. } => VerificationMode::InspectOnly,
            Plan::NoOp => VerificationMode::NoOp,
        }
    }
}

impl VerificationRequest {
    /// Build a request. Empty strings count as "not provided".
    pub fn new(
        expected_cn: Option<String>,
        cert_path: Option<PathBuf>,
        ca_cert_path: Option<PathBuf>,
    ) -> Self {
        Self {
            expected_cn: expected_cn.filter(|cn| !cn.is_empty()),
            cert_path: cert_path.filter(|p| !p.as_os_str().is_empty()),
            ca_cert_path: ca_cert_path.filter(|p| !p.as_os_str().is_empty()),
        }
    }

    pub fn expected_cn(&self) -> Option<&str> {
        self.expected_cn.as_deref()
    }

    pub fn cert_path(&self) -> Option<&Path> {
        self.cert_path.as_deref()
    }

    pub fn ca_cert_path(&self) -> Option<&Path> {
        self.ca_cert_path.as_deref()
    }

    /// Select the single mode this request runs.
    ///
    /// Rules are tried in order and the first match wins, so a request with
    /// all three inputs only runs the CN check.
    pub fn resolve(&self) -> VerificationMode {
        self.plan().mode()
    }

    pub(crate) fn plan(&self) -> Plan<'_> {
        match (self.expected_cn(), self.cert_path(), self.ca_cert_path()) {
            (Some(expected_cn), Some(cert), _) => Plan::CnMatch { expected_cn, cert },
            (_, Some(cert), Some(ca_cert)) => Plan::ChainVerify { cert, ca_cert },
            (_, None, Some(ca_cert)) => Plan::CaIdentity { ca_cert },
            (_, Some(cert), _) => Plan::InspectOnly { cert },
            (_, None, None) => Plan::NoOp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(cn: Option<&str>, cert: Option<&str>, ca: Option<&str>) -> VerificationRequest {
        VerificationRequest::new(
            cn.map(String::from),
            cert.map(PathBuf::from),
            ca.map(PathBuf::from),
        )
    }

    #[test]
    fn resolution_table() {
        let cases = [
            (None, None, None, VerificationMode::NoOp),
            (Some("h"), None, None, VerificationMode::NoOp),
            (None, Some("c.pem"), None, VerificationMode::InspectOnly),
            (None, None, Some("ca.pem"), VerificationMode::CaIdentity),
            (Some("h"), None, Some("ca.pem"), VerificationMode::CaIdentity),
            (None, Some("c.pem"), Some("ca.pem"), VerificationMode::ChainVerify),
            (Some("h"), Some("c.pem"), None, VerificationMode::CnMatch),
            (Some("h"), Some("c.pem"), Some("ca.pem"), VerificationMode::CnMatch),
        ];
        for (cn, cert, ca, expected) in cases {
            assert_eq!(
                request(cn, cert, ca).resolve(),
                expected,
                "cn={:?} cert={:?} cacert={:?}",
                cn,
                cert,
                ca
            );
        }
    }

    #[test]
    fn all_three_inputs_never_run_chain_verification() {
        let req = request(Some("host.example"), Some("leaf.pem"), Some("root.pem"));
        assert_eq!(
            req.plan(),
            Plan::CnMatch {
                expected_cn: "host.example",
                cert: Path::new("leaf.pem"),
            }
        );
    }

    #[test]
    fn empty_values_count_as_absent() {
        let req = request(Some(""), Some(""), Some("ca.pem"));
        assert_eq!(req.expected_cn(), None);
        assert_eq!(req.cert_path(), None);
        assert_eq!(req.resolve(), VerificationMode::CaIdentity);
    }

    #[test]
    fn mode_names() {
        assert_eq!(VerificationMode::ChainVerify.to_string(), "chain-verify");
        assert_eq!(VerificationMode::NoOp.to_string(), "no-op");
    }
}
