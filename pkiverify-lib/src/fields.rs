//! Certificate data types and field extraction.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// A loaded X.509 certificate.
///
/// Owned by a single verification call; nothing caches or shares it.
#[derive(Debug, Clone, Serialize)]
pub struct Certificate {
    /// Certificate version (1, 2, or 3).
    pub version: u32,
    /// Serial number as a colon-separated hex string.
    pub serial: String,
    /// Signature algorithm name.
    pub signature_algorithm: String,
    /// Issuer distinguished name.
    pub issuer: DistinguishedName,
    /// Subject distinguished name.
    pub subject: DistinguishedName,
    /// Validity start date.
    pub not_before: DateTime,
    /// Validity end date.
    pub not_after: DateTime,
    /// Public key summary.
    pub public_key: PublicKeyInfo,
    /// Basic Constraints extension, if present.
    pub basic_constraints: Option<BasicConstraints>,
    /// Subject Alternative Name entries (empty if the extension is absent).
    pub subject_alt_names: Vec<SanEntry>,

    /// Raw DER bytes of the entire certificate.
    #[serde(skip)]
    pub raw_der: Vec<u8>,
    /// File the certificate was loaded from, if any.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// Distinguished name with ordered components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistinguishedName {
    /// Ordered list of (attribute_type, value) pairs.
    /// Attribute types use short names where known (e.g., "CN", "O", "C").
    pub components: Vec<(String, String)>,
}

impl DistinguishedName {
    /// One-line form in OpenSSL's default style, e.g.
    /// `C = US, O = Org, CN = example.com`. Backslash, comma and equals
    /// signs inside values are escaped.
    pub fn to_oneline(&self) -> String {
        self.to_string()
    }

    /// First value of the given attribute (by short name).
    pub fn get(&self, key: &str) -> Option<&str> {
        self.components
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl std::fmt::Display for DistinguishedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut separator = "";
        for (key, value) in &self.components {
            write!(f, "{}{} = ", separator, key)?;
            for ch in value.chars() {
                if matches!(ch, '\\' | ',' | '=') {
                    f.write_str("\\")?;
                }
                write!(f, "{}", ch)?;
            }
            separator = ", ";
        }
        Ok(())
    }
}

/// Public key summary.
#[derive(Debug, Clone, Serialize)]
pub struct PublicKeyInfo {
    /// Algorithm name: "RSA", "EC", "Ed25519", etc.
    pub algorithm: String,
    /// Key size in bits (e.g., 2048 for RSA, 256 for P-256).
    pub key_size: Option<u32>,
    /// Named curve for EC keys (e.g., "P-256").
    pub curve: Option<String>,
}

impl std::fmt::Display for PublicKeyInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.algorithm)?;
        if let Some(bits) = self.key_size {
            write!(f, " ({} bit)", bits)?;
        }
        if let Some(curve) = &self.curve {
            write!(f, " [{}]", curve)?;
        }
        Ok(())
    }
}

/// Basic Constraints extension (RFC 5280 Section 4.2.1.9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BasicConstraints {
    pub ca: bool,
    pub path_len: Option<u32>,
    pub critical: bool,
}

/// Subject Alternative Name entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum SanEntry {
    Dns(String),
    Email(String),
    Ip(String),
    Uri(String),
    DirName(String),
    Other(String),
}

impl std::fmt::Display for SanEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SanEntry::Dns(v) => write!(f, "DNS:{}", v),
            SanEntry::Email(v) => write!(f, "email:{}", v),
            SanEntry::Ip(v) => write!(f, "IP Address:{}", v),
            SanEntry::Uri(v) => write!(f, "URI:{}", v),
            SanEntry::DirName(v) => write!(f, "DirName:{}", v),
            SanEntry::Other(v) => write!(f, "othername:{}", v),
        }
    }
}

/// Date-time representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateTime {
    /// ISO 8601 formatted string.
    pub iso8601: String,
    /// Unix timestamp.
    pub timestamp: i64,
}

impl DateTime {
    /// Format in OpenSSL's default date style: `Feb  3 23:57:06 2026 GMT`.
    pub fn to_openssl(&self) -> String {
        const MONTHS: [&str; 12] = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ];
        match ::time::OffsetDateTime::from_unix_timestamp(self.timestamp) {
            Ok(dt) => {
                let month = MONTHS
                    .get(usize::from(u8::from(dt.month())).saturating_sub(1))
                    .copied()
                    .unwrap_or("???");
                format!(
                    "{} {:2} {:02}:{:02}:{:02} {} GMT",
                    month,
                    dt.day(),
                    dt.hour(),
                    dt.minute(),
                    dt.second(),
                    dt.year()
                )
            }
            Err(_) => self.iso8601.clone(),
        }
    }
}

impl std::fmt::Display for DateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_openssl())
    }
}

impl Certificate {
    /// The subject's Common Name, if the subject carries one.
    pub fn common_name(&self) -> Option<&str> {
        self.subject.get("CN")
    }

    /// Return the subject as a one-line string.
    pub fn subject_string(&self) -> String {
        self.subject.to_oneline()
    }

    /// Return the issuer as a one-line string.
    pub fn issuer_string(&self) -> String {
        self.issuer.to_oneline()
    }

    /// SHA-256 fingerprint of the certificate's DER encoding.
    pub fn fingerprint(&self) -> String {
        crate::fingerprint::compute_fingerprint(&self.raw_der)
    }

    /// Path the certificate was loaded from.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dn(parts: &[(&str, &str)]) -> DistinguishedName {
        DistinguishedName {
            components: parts
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn oneline_escapes_separators() {
        let name = dn(&[("O", "Acme, Inc."), ("CN", "a=b\\c")]);
        assert_eq!(name.to_oneline(), "O = Acme\\, Inc., CN = a\\=b\\\\c");
    }

    #[test]
    fn get_returns_first_match() {
        let name = dn(&[("CN", "first"), ("OU", "ops"), ("CN", "second")]);
        assert_eq!(name.get("CN"), Some("first"));
        assert_eq!(name.get("O"), None);
    }

    #[test]
    fn openssl_date_format() {
        let dt = DateTime {
            iso8601: "2020-01-01T00:00:00Z".into(),
            timestamp: 1_577_836_800,
        };
        assert_eq!(dt.to_openssl(), "Jan  1 00:00:00 2020 GMT");
    }

    #[test]
    fn public_key_display() {
        let rsa = PublicKeyInfo {
            algorithm: "RSA".into(),
            key_size: Some(2048),
            curve: None,
        };
        assert_eq!(rsa.to_string(), "RSA (2048 bit)");
        let ec = PublicKeyInfo {
            algorithm: "EC".into(),
            key_size: Some(256),
            curve: Some("P-256".into()),
        };
        assert_eq!(ec.to_string(), "EC (256 bit) [P-256]");
    }
}
