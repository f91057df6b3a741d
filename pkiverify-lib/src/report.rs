//! Human-readable certificate summary.

use crate::fields::Certificate;

/// Render the report block printed for every loaded certificate.
///
/// The block ends with a newline; callers separate consecutive blocks with
/// an empty line.
pub fn render_report(cert: &Certificate) -> String {
    let mut out = String::new();

    out.push_str(&format!("  Version:             {}\n", cert.version));
    out.push_str(&format!("  Subject:             {}\n", cert.subject_string()));
    out.push_str(&format!("  Issuer:              {}\n", cert.issuer_string()));
    out.push_str(&format!("  Valid From:          {}\n", cert.not_before));
    out.push_str(&format!("  Valid Until:         {}\n", cert.not_after));
    out.push_str(&format!("  Serial:              {}\n", cert.serial));
    out.push_str(&format!(
        "  Signature Algorithm: {}\n",
        cert.signature_algorithm
    ));
    out.push_str(&format!("  Public Key:          {}\n", cert.public_key));

    match &cert.basic_constraints {
        Some(bc) => {
            let pl = match bc.path_len {
                Some(n) => format!(", pathlen:{}", n),
                None => String::new(),
            };
            let critical = if bc.critical { " [critical]" } else { "" };
            out.push_str(&format!(
                "  Basic Constraints:   CA={}{}{}\n",
                bc.ca, pl, critical
            ));
        }
        None => out.push_str("  Basic Constraints:   (none)\n"),
    }

    if !cert.subject_alt_names.is_empty() {
        let names = cert
            .subject_alt_names
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!("  Subject Alt Names:   {}\n", names));
    }

    out.push_str(&format!("  Fingerprint:         {}\n", cert.fingerprint()));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{
        BasicConstraints, DateTime, DistinguishedName, PublicKeyInfo, SanEntry,
    };

    fn sample() -> Certificate {
        let dn = |cn: &str| DistinguishedName {
            components: vec![("CN".into(), cn.into())],
        };
        let at = |ts: i64| DateTime {
            iso8601: String::new(),
            timestamp: ts,
        };
        Certificate {
            version: 3,
            serial: "10:00".into(),
            signature_algorithm: "sha256WithRSAEncryption".into(),
            issuer: dn("Example Root CA"),
            subject: dn("host.example"),
            not_before: at(1_577_836_800),
            not_after: at(4_733_510_400),
            public_key: PublicKeyInfo {
                algorithm: "RSA".into(),
                key_size: Some(2048),
                curve: None,
            },
            basic_constraints: Some(BasicConstraints {
                ca: false,
                path_len: None,
                critical: false,
            }),
            subject_alt_names: vec![SanEntry::Dns("host.example".into())],
            raw_der: b"der".to_vec(),
            source: None,
        }
    }

    #[test]
    fn report_lists_identity_validity_and_fingerprint() {
        let report = render_report(&sample());
        assert!(report.contains("Subject:             CN = host.example\n"));
        assert!(report.contains("Issuer:              CN = Example Root CA\n"));
        assert!(report.contains("Valid From:          Jan  1 00:00:00 2020 GMT\n"));
        assert!(report.contains("Valid Until:         Jan  1 00:00:00 2120 GMT\n"));
        assert!(report.contains("Basic Constraints:   CA=false\n"));
        assert!(report.contains("Subject Alt Names:   DNS:host.example\n"));
        assert!(report.contains("Fingerprint:         "));
        assert!(report.ends_with('\n'));
    }

    #[test]
    fn report_without_extensions() {
        let mut cert = sample();
        cert.basic_constraints = None;
        cert.subject_alt_names.clear();
        let report = render_report(&cert);
        assert!(report.contains("Basic Constraints:   (none)\n"));
        assert!(!report.contains("Subject Alt Names"));
    }
}
