//! Certificate parsing from PEM and DER formats.

use crate::fields::{
    BasicConstraints, Certificate, DateTime, DistinguishedName, PublicKeyInfo, SanEntry,
};
use crate::oid;
use crate::util;
use crate::ParseError;
use x509_parser::prelude::*;

/// Parse a certificate from PEM or DER (auto-detected).
///
/// If the input begins with `-----BEGIN` (after stripping whitespace), it is
/// treated as PEM. Otherwise it is treated as DER.
pub fn parse_cert(input: &[u8]) -> Result<Certificate, ParseError> {
    if input.is_empty() {
        return Err(ParseError::Empty);
    }

    if util::is_pem(input) {
        parse_pem(input)
    } else {
        parse_der(input)
    }
}

/// Parse the first certificate of a PEM input.
pub fn parse_pem(input: &[u8]) -> Result<Certificate, ParseError> {
    let (_, pem) =
        x509_parser::pem::parse_x509_pem(input).map_err(|e| ParseError::Pem(e.to_string()))?;

    if pem.label != "CERTIFICATE"
        && pem.label != "TRUSTED CERTIFICATE"
        && pem.label != "X509 CERTIFICATE"
    {
        return Err(ParseError::Pem(format!(
            "expected CERTIFICATE, got {}",
            pem.label
        )));
    }

    parse_der(&pem.contents)
}

/// Parse a certificate from DER format.
pub fn parse_der(input: &[u8]) -> Result<Certificate, ParseError> {
    let (remaining, x509) =
        X509Certificate::from_der(input).map_err(|e| ParseError::Der(e.to_string()))?;

    // Fingerprints and re-parsing in the trust checks must see only the
    // certificate bytes, not trailing data.
    let cert_len = input.len() - remaining.len();
    let cert_der = input.get(..cert_len).unwrap_or(input);
    build_certificate(&x509, cert_der)
}

fn build_certificate(x509: &X509Certificate, raw_der: &[u8]) -> Result<Certificate, ParseError> {
    let tbs = &x509.tbs_certificate;

    let raw_version = tbs.version.0;
    if raw_version > 2 {
        return Err(ParseError::UnsupportedVersion(raw_version + 1));
    }

    let basic_constraints = x509
        .basic_constraints()
        .map_err(|e| ParseError::Der(format!("invalid Basic Constraints: {}", e)))?
        .map(|ext| BasicConstraints {
            ca: ext.value.ca,
            path_len: ext.value.path_len_constraint,
            critical: ext.critical,
        });

    let subject_alt_names = x509
        .subject_alternative_name()
        .map_err(|e| ParseError::Der(format!("invalid Subject Alternative Name: {}", e)))?
        .map(|ext| {
            ext.value
                .general_names
                .iter()
                .map(san_entry)
                .collect()
        })
        .unwrap_or_default();

    Ok(Certificate {
        version: raw_version + 1,
        serial: format_serial(tbs.raw_serial()),
        signature_algorithm: format_sig_algorithm(&x509.signature_algorithm),
        issuer: build_dn(&tbs.issuer),
        subject: build_dn(&tbs.subject),
        not_before: build_datetime(&tbs.validity.not_before),
        not_after: build_datetime(&tbs.validity.not_after),
        public_key: build_public_key_info(&tbs.subject_pki),
        basic_constraints,
        subject_alt_names,
        raw_der: raw_der.to_vec(),
        source: None,
    })
}

/// Serial as colon-separated hex without DER sign padding. A zero serial
/// keeps its last byte.
fn format_serial(raw: &[u8]) -> String {
    let padding = raw.iter().take_while(|&&b| b == 0).count();
    let start = padding.min(raw.len().saturating_sub(1));
    util::hex_colon_upper(raw.get(start..).unwrap_or_default())
}

fn format_sig_algorithm(algo: &AlgorithmIdentifier) -> String {
    match algo.algorithm.to_id_string().as_str() {
        oid::SHA1_WITH_RSA => "sha1WithRSAEncryption".into(),
        oid::SHA256_WITH_RSA => "sha256WithRSAEncryption".into(),
        oid::SHA384_WITH_RSA => "sha384WithRSAEncryption".into(),
        oid::SHA512_WITH_RSA => "sha512WithRSAEncryption".into(),
        oid::RSASSA_PSS => "rsassaPss".into(),
        oid::ECDSA_WITH_SHA256 => "ecdsa-with-SHA256".into(),
        oid::ECDSA_WITH_SHA384 => "ecdsa-with-SHA384".into(),
        oid::ECDSA_WITH_SHA512 => "ecdsa-with-SHA512".into(),
        oid::ED25519 => "Ed25519".into(),
        oid::ED448 => "Ed448".into(),
        other => other.to_string(),
    }
}

/// Flatten a name into (short name, value) pairs. Values that are not
/// strings are kept as `#` followed by their hex bytes.
fn build_dn(name: &X509Name) -> DistinguishedName {
    let components = name
        .iter_attributes()
        .map(|attr| {
            let key = util::oid_short_name(&attr.attr_type().to_id_string());
            let value = match attr.as_str() {
                Ok(text) => text.to_owned(),
                Err(_) => format!("#{}", util::hex_colon_upper(attr.attr_value().data)),
            };
            (key, value)
        })
        .collect();
    DistinguishedName { components }
}

fn build_datetime(asn1_time: &ASN1Time) -> DateTime {
    let ts = asn1_time.timestamp();
    let iso = match ::time::OffsetDateTime::from_unix_timestamp(ts) {
        Ok(dt) => format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            dt.year(),
            u8::from(dt.month()),
            dt.day(),
            dt.hour(),
            dt.minute(),
            dt.second()
        ),
        Err(_) => format!("{}", ts),
    };
    DateTime {
        iso8601: iso,
        timestamp: ts,
    }
}

fn build_public_key_info(spki: &SubjectPublicKeyInfo) -> PublicKeyInfo {
    let oid_str = spki.algorithm.algorithm.to_id_string();

    let (algorithm, key_size, curve) = match oid_str.as_str() {
        oid::RSA_ENCRYPTION => ("RSA".into(), rsa_key_bits(spki), None),
        oid::EC_PUBLIC_KEY => {
            let (curve_name, key_size) = ec_curve(&spki.algorithm);
            ("EC".into(), key_size, Some(curve_name))
        }
        oid::ED25519 => ("Ed25519".into(), Some(256), None),
        oid::ED448 => ("Ed448".into(), Some(448), None),
        _ => (oid_str, None, None),
    };

    PublicKeyInfo {
        algorithm,
        key_size,
        curve,
    }
}

/// RSA modulus length in bits, or `None` if the key does not parse.
fn rsa_key_bits(spki: &SubjectPublicKeyInfo) -> Option<u32> {
    match spki.parsed() {
        Ok(x509_parser::public_key::PublicKey::RSA(rsa)) => {
            // DER positive integers may carry a leading zero byte.
            let significant = match rsa.modulus.split_first() {
                Some((&0, rest)) if !rest.is_empty() => rest,
                _ => rsa.modulus,
            };
            u32::try_from(significant.len()).ok().map(|n| n * 8)
        }
        _ => None,
    }
}

/// Named curve of an EC key and its size in bits, when the curve is known.
fn ec_curve(algo: &AlgorithmIdentifier) -> (String, Option<u32>) {
    let Some(curve) = algo.parameters.as_ref().and_then(|p| p.as_oid().ok()) else {
        return ("unknown".into(), None);
    };
    match curve.to_id_string().as_str() {
        oid::CURVE_P256 => ("P-256".into(), Some(256)),
        oid::CURVE_P384 => ("P-384".into(), Some(384)),
        oid::CURVE_P521 => ("P-521".into(), Some(521)),
        other => (other.to_owned(), None),
    }
}

fn san_entry(name: &GeneralName) -> SanEntry {
    match name {
        GeneralName::DNSName(dns) => SanEntry::Dns((*dns).to_owned()),
        GeneralName::RFC822Name(mail) => SanEntry::Email((*mail).to_owned()),
        GeneralName::URI(uri) => SanEntry::Uri((*uri).to_owned()),
        GeneralName::IPAddress(bytes) => SanEntry::Ip(format_ip_bytes(bytes)),
        GeneralName::DirectoryName(dn) => SanEntry::DirName(build_dn(dn).to_string()),
        GeneralName::OtherName(type_id, _) => {
            SanEntry::Other(format!("<{}>", type_id.to_id_string()))
        }
        GeneralName::RegisteredID(id) => SanEntry::Other(id.to_id_string()),
        unsupported => SanEntry::Other(format!("{:?}", unsupported)),
    }
}

fn format_ip_bytes(bytes: &[u8]) -> String {
    if let Ok(octets) = <[u8; 4]>::try_from(bytes) {
        std::net::Ipv4Addr::from(octets).to_string()
    } else if let Ok(octets) = <[u8; 16]>::try_from(bytes) {
        std::net::Ipv6Addr::from(octets).to_string()
    } else {
        util::hex_colon_upper(bytes)
    }
}
