//! Verification outcomes and their monitoring status codes.

use crate::request::VerificationMode;
use serde::Serialize;
use tracing::{error, info};

/// Source label attached to every outcome log line.
pub const LOG_TARGET: &str = "cli";

/// Two-level monitoring status. This tool never reports WARNING or UNKNOWN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ServiceState {
    Ok,
    Critical,
}

impl ServiceState {
    /// Monitoring-plugin exit code: 0 = OK, 2 = CRITICAL.
    pub fn exit_code(self) -> i32 {
        match self {
            ServiceState::Ok => 0,
            ServiceState::Critical => 2,
        }
    }

    pub fn is_ok(self) -> bool {
        self == ServiceState::Ok
    }
}

impl std::fmt::Display for ServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceState::Ok => f.write_str("OK"),
            ServiceState::Critical => f.write_str("CRITICAL"),
        }
    }
}

/// The single result of one verification request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationOutcome {
    pub state: ServiceState,
    pub mode: VerificationMode,
    /// CN of the subject certificate, when one was loaded.
    pub subject_cn: Option<String>,
    /// Mode-specific message; empty only for the no-op mode.
    pub diagnostic: String,
}

impl VerificationOutcome {
    pub(crate) fn ok(mode: VerificationMode, subject_cn: Option<String>, diagnostic: String) -> Self {
        Self {
            state: ServiceState::Ok,
            mode,
            subject_cn,
            diagnostic,
        }
    }

    pub(crate) fn critical(
        mode: VerificationMode,
        subject_cn: Option<String>,
        diagnostic: String,
    ) -> Self {
        Self {
            state: ServiceState::Critical,
            mode,
            subject_cn,
            diagnostic,
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.state.exit_code()
    }

    /// Write the diagnostic to the log: `info` for OK, `error` for CRITICAL.
    ///
    /// Nothing is logged when the diagnostic is empty.
    pub fn log(&self) {
        if self.diagnostic.is_empty() {
            return;
        }
        match self.state {
            ServiceState::Ok => info!(target: LOG_TARGET, "{}", self.diagnostic),
            ServiceState::Critical => error!(target: LOG_TARGET, "{}", self.diagnostic),
        }
    }
}
