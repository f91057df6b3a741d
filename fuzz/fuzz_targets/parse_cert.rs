#![no_main]

use libfuzzer_sys::fuzz_target;
use pkiverify_lib::{is_certificate_authority, parse_cert, render_report, verifies_against};

fuzz_target!(|data: &[u8]| {
    // Parsing, reporting and the trust checks must never panic.
    if let Ok(cert) = parse_cert(data) {
        let _ = cert.common_name();
        let _ = render_report(&cert);
        let _ = is_certificate_authority(&cert);
        let _ = verifies_against(&cert, &cert, &Default::default());
    }
});
