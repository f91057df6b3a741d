//! Reading certificate files from disk.

use crate::fields::Certificate;
use crate::parser::parse_cert;
use crate::LoadError;
use std::path::Path;
use tracing::debug;

/// Maximum file size for certificate inputs (10 MiB).
pub const MAX_INPUT_BYTES: u64 = 10 * 1024 * 1024;

/// Load the first certificate (PEM or DER, auto-detected) from `path`.
///
/// Every error names the file that failed.
pub fn load_certificate(path: &Path) -> Result<Certificate, LoadError> {
    let meta = std::fs::metadata(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if meta.len() > MAX_INPUT_BYTES {
        return Err(LoadError::TooLarge {
            path: path.to_path_buf(),
            size: meta.len(),
            max: MAX_INPUT_BYTES,
        });
    }

    let data = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut cert = parse_cert(&data).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    cert.source = Some(path.to_path_buf());

    debug!(
        path = %path.display(),
        subject = %cert.subject,
        serial = %cert.serial,
        "loaded certificate"
    );
    Ok(cert)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_names_the_path() {
        let err = load_certificate(Path::new("/nonexistent/pkiverify/cert.pem")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/pkiverify/cert.pem"));
        assert_eq!(err.path(), Path::new("/nonexistent/pkiverify/cert.pem"));
    }

    #[test]
    fn unparseable_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not a certificate").unwrap();
        let err = load_certificate(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
        assert!(err
            .to_string()
            .contains(&file.path().display().to_string()));
    }

    #[test]
    fn empty_file_is_a_parse_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = load_certificate(file.path()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Parse {
                source: crate::ParseError::Empty,
                ..
            }
        ));
    }
}
