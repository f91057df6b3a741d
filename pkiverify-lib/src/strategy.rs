//! One verification procedure per mode, and the entry point that runs the
//! mode a request resolves to.

use crate::fields::Certificate;
use crate::loader::load_certificate;
use crate::outcome::{VerificationOutcome, LOG_TARGET};
use crate::report::render_report;
use crate::request::{Plan, VerificationMode, VerificationRequest};
use crate::trust::{is_certificate_authority, verifies_against, VerifyOptions};
use crate::PkiVerifyError;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// Run the verification a request asks for.
///
/// Reports for every loaded certificate are written to `out` (subject before
/// authority) and the outcome's diagnostic is logged. Load failures and
/// write failures abort the run; every trust failure, including a chain check
/// that cannot complete, becomes a CRITICAL outcome.
pub fn run<W: Write + ?Sized>(
    request: &VerificationRequest,
    options: &VerifyOptions,
    out: &mut W,
) -> Result<VerificationOutcome, PkiVerifyError> {
    let plan = request.plan();
    debug!(mode = %plan.mode(), "resolved verification mode");

    let outcome = match plan {
        Plan::CnMatch { expected_cn, cert } => check_common_name(expected_cn, cert, out)?,
        Plan::ChainVerify { cert, ca_cert } => check_signed_by(cert, ca_cert, options, out)?,
        Plan::CaIdentity { ca_cert } => check_is_ca(ca_cert, out)?,
        Plan::InspectOnly { cert } => inspect(cert, out)?,
        // Nothing to do. Kept as a silent success for compatibility.
        Plan::NoOp => VerificationOutcome::ok(VerificationMode::NoOp, None, String::new()),
    };

    Ok(outcome)
}

fn emit_report<W: Write + ?Sized>(out: &mut W, cert: &Certificate) -> std::io::Result<()> {
    writeln!(out, "{}", render_report(cert))
}

fn cn_of(cert: &Certificate) -> String {
    cert.common_name().unwrap_or_default().to_string()
}

fn check_common_name<W: Write + ?Sized>(
    expected_cn: &str,
    cert_path: &Path,
    out: &mut W,
) -> Result<VerificationOutcome, PkiVerifyError> {
    let cert = load_certificate(cert_path)?;

    info!(
        target: LOG_TARGET,
        "Verifying common name (CN) '{}' in certificate '{}'.",
        expected_cn,
        cert_path.display()
    );
    emit_report(out, &cert)?;

    let cert_cn = cn_of(&cert);
    let mode = VerificationMode::CnMatch;
    let outcome = if expected_cn == cert_cn {
        let msg = format!(
            "OK: CN '{}' matches certificate CN '{}'.",
            expected_cn, cert_cn
        );
        VerificationOutcome::ok(mode, Some(cert_cn), msg)
    } else {
        let msg = format!(
            "CRITICAL: CN '{}' does NOT match certificate CN '{}'.",
            expected_cn, cert_cn
        );
        VerificationOutcome::critical(mode, Some(cert_cn), msg)
    };
    outcome.log();
    Ok(outcome)
}

fn check_signed_by<W: Write + ?Sized>(
    cert_path: &Path,
    ca_cert_path: &Path,
    options: &VerifyOptions,
    out: &mut W,
) -> Result<VerificationOutcome, PkiVerifyError> {
    let cert = load_certificate(cert_path)?;
    let ca_cert = load_certificate(ca_cert_path)?;

    info!(
        target: LOG_TARGET,
        "Verifying certificate '{}' with CA certificate '{}'.",
        cert_path.display(),
        ca_cert_path.display()
    );
    emit_report(out, &cert)?;
    emit_report(out, &ca_cert)?;

    let cert_cn = cn_of(&cert);
    let mode = VerificationMode::ChainVerify;
    let outcome = match verifies_against(&ca_cert, &cert, options) {
        Ok(true) => {
            let msg = format!("OK: Certificate with CN '{}' is signed by CA.", cert_cn);
            VerificationOutcome::ok(mode, Some(cert_cn), msg)
        }
        Ok(false) => {
            let msg = format!(
                "CRITICAL: Certificate with CN '{}' is NOT signed by CA.",
                cert_cn
            );
            VerificationOutcome::critical(mode, Some(cert_cn), msg)
        }
        Err(e) => {
            let msg = format!(
                "CRITICAL: Certificate with CN '{}' is NOT signed by CA: {}",
                cert_cn, e
            );
            VerificationOutcome::critical(mode, Some(cert_cn), msg)
        }
    };
    outcome.log();
    Ok(outcome)
}

fn check_is_ca<W: Write + ?Sized>(
    ca_cert_path: &Path,
    out: &mut W,
) -> Result<VerificationOutcome, PkiVerifyError> {
    let ca_cert = load_certificate(ca_cert_path)?;

    info!(
        target: LOG_TARGET,
        "Checking whether certificate '{}' is a valid CA certificate.",
        ca_cert_path.display()
    );
    emit_report(out, &ca_cert)?;

    let mode = VerificationMode::CaIdentity;
    let cn = ca_cert.common_name().map(String::from);
    let outcome = if is_certificate_authority(&ca_cert) {
        let msg = format!(
            "OK: CA certificate file '{}' was verified successfully.",
            ca_cert_path.display()
        );
        VerificationOutcome::ok(mode, cn, msg)
    } else {
        let msg = format!(
            "CRITICAL: The file '{}' does not seem to be a CA certificate file.",
            ca_cert_path.display()
        );
        VerificationOutcome::critical(mode, cn, msg)
    };
    outcome.log();
    Ok(outcome)
}

fn inspect<W: Write + ?Sized>(
    cert_path: &Path,
    out: &mut W,
) -> Result<VerificationOutcome, PkiVerifyError> {
    let cert = load_certificate(cert_path)?;

    // Logged before the report, like the other modes' announcement lines.
    let msg = format!("Printing certificate '{}'", cert_path.display());
    let outcome = VerificationOutcome::ok(
        VerificationMode::InspectOnly,
        cert.common_name().map(String::from),
        msg,
    );
    outcome.log();
    emit_report(out, &cert)?;

    Ok(outcome)
}
