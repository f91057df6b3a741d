//! pkiverify: verify TLS certificates (CN, signed by CA, is CA) or print them.

use anyhow::{Context, Result};
use clap::Parser;
use pkiverify_lib::{VerificationRequest, VerifyOptions, LOG_TARGET};
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Exit code for load and usage failures (distinct from CRITICAL = 2).
const EXIT_FAILURE: i32 = 1;

/// Environment variable holding the log filter (e.g. `debug`, `cli=warn`).
const LOG_ENV: &str = "PKIVERIFY_LOG";

#[derive(Parser, Debug)]
#[command(
    name = "pkiverify",
    version,
    about = "Verify TLS certificates: CN, signed by CA, is CA; print certificate",
    long_about = "pkiverify answers one question per run, chosen from the flags given:\n\
                  \n  --cn NAME --cert FILE      does the certificate's CN equal NAME?\
                  \n  --cert FILE --cacert FILE  is the certificate signed by the CA?\
                  \n  --cacert FILE              is the file a CA certificate?\
                  \n  --cert FILE                print the certificate\n\n\
                  When --cn and --cert are both given, only the CN is checked.\n\
                  Exit codes follow the monitoring-plugin convention: 0 = OK,\n\
                  2 = CRITICAL. A certificate file that cannot be loaded exits 1.",
    after_help = "EXAMPLES:\n\
                  \n  pkiverify --cn host.example --cert host.pem\
                  \n  pkiverify --cert host.pem --cacert ca.pem\
                  \n  pkiverify --cacert ca.pem\
                  \n  pkiverify --cert host.pem\
                  \n  PKIVERIFY_LOG=debug pkiverify --cert host.pem --cacert ca.pem"
)]
struct Cli {
    /// Common Name. Use with --cert to check the CN in the certificate.
    #[arg(long, value_name = "NAME")]
    cn: Option<String>,
    /// Certificate file (PEM or DER). Standalone: print certificate. With --cacert: verify against CA.
    #[arg(long, value_name = "FILE")]
    cert: Option<PathBuf>,
    /// CA certificate file (PEM or DER). Standalone: check whether this is a CA certificate.
    #[arg(long, value_name = "FILE")]
    cacert: Option<PathBuf>,
    /// Skip the certificate validity date check when verifying against a CA
    #[arg(long)]
    no_check_time: bool,
    /// Verify at a specific Unix timestamp instead of the current time
    #[arg(long, value_name = "EPOCH", conflicts_with = "no_check_time")]
    attime: Option<i64>,
    /// Print the outcome as JSON after the certificate reports
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn request(&self) -> VerificationRequest {
        VerificationRequest::new(self.cn.clone(), self.cert.clone(), self.cacert.clone())
    }

    fn verify_options(&self) -> VerifyOptions {
        VerifyOptions {
            check_time: !self.no_check_time,
            at_time: self.attime,
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}

fn main() -> Result<()> {
    // clap exits with 2 on usage errors, which would read as CRITICAL.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(EXIT_FAILURE);
        }
        Err(e) => e.exit(),
    };

    init_logging();

    let request = cli.request();
    let options = cli.verify_options();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let outcome = pkiverify_lib::run(&request, &options, &mut out)
        .map_err(|e| {
            error!(target: LOG_TARGET, "{}", e);
            e
        })
        .context("certificate verification aborted")?;

    if cli.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&outcome)?)?;
    }
    out.flush()?;

    if !outcome.state.is_ok() {
        std::process::exit(outcome.exit_code());
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pkiverify_lib::VerificationMode;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_map_onto_request() {
        let cli = Cli::try_parse_from([
            "pkiverify",
            "--cn",
            "host.example",
            "--cert",
            "leaf.pem",
            "--cacert",
            "ca.pem",
        ])
        .unwrap();
        let req = cli.request();
        assert_eq!(req.expected_cn(), Some("host.example"));
        assert_eq!(req.resolve(), VerificationMode::CnMatch);
        assert_eq!(cli.verify_options(), VerifyOptions::default());
    }

    #[test]
    fn no_flags_is_a_valid_invocation() {
        let cli = Cli::try_parse_from(["pkiverify"]).unwrap();
        assert_eq!(cli.request().resolve(), VerificationMode::NoOp);
    }

    #[test]
    fn time_options() {
        let cli = Cli::try_parse_from(["pkiverify", "--attime", "1700000000"]).unwrap();
        assert_eq!(
            cli.verify_options(),
            VerifyOptions {
                check_time: true,
                at_time: Some(1_700_000_000),
            }
        );
        let cli = Cli::try_parse_from(["pkiverify", "--no-check-time"]).unwrap();
        assert!(!cli.verify_options().check_time);
        assert!(
            Cli::try_parse_from(["pkiverify", "--no-check-time", "--attime", "1"]).is_err()
        );
    }
}
