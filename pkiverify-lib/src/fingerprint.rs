//! Certificate fingerprint (digest) computation.

use crate::util;
use digest::Digest;

/// SHA-256 fingerprint of DER-encoded certificate bytes.
///
/// Returns a colon-separated uppercase hex string (e.g., "AB:CD:EF:...").
pub fn compute_fingerprint(der_bytes: &[u8]) -> String {
    util::hex_colon_upper(&sha2::Sha256::digest(der_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_of_empty_input() {
        assert_eq!(
            compute_fingerprint(b""),
            "E3:B0:C4:42:98:FC:1C:14:9A:FB:F4:C8:99:6F:B9:24:\
             27:AE:41:E4:64:9B:93:4C:A4:95:99:1B:78:52:B8:55"
        );
    }

    #[test]
    fn fingerprint_has_thirty_two_bytes() {
        assert_eq!(compute_fingerprint(b"abc").split(':').count(), 32);
    }
}
