//! Typed domain error enum.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! `DeployError` implements `thiserror::Error` and converts to `anyhow::Error`
//! via the `?` operator. Callers that need the kind use
//! `err.downcast_ref::<DeployError>()`.

use std::path::PathBuf;

use thiserror::Error;

/// Every way a deployment can fail.
#[derive(Debug, Error)]
pub enum DeployError {
    // ── Credentials ──────────────────────────────────────────────────────────
    #[error("Could not read credential from {}: {reason}", path.display())]
    Credential { path: PathBuf, reason: String },

    // ── Provider ─────────────────────────────────────────────────────────────
    #[error("Provider rejected {operation}: {message}")]
    ProviderRequest { operation: String, message: String },

    #[error("Droplet {id} is ready but reports no IPv4 address")]
    NoIpv4Address { id: u64 },

    #[error("Droplet {id} still locked after {attempts} status checks")]
    Timeout { id: u64, attempts: u32 },

    #[error("Deployment cancelled")]
    Cancelled,

    // ── Remote shell ─────────────────────────────────────────────────────────
    #[error("Could not connect to {address} after {attempts} attempts: {last_error}")]
    Connect {
        address: String,
        attempts: u32,
        last_error: String,
    },

    #[error("Remote session failed: {0}")]
    Session(String),

    #[error("Remote command failed: {0}")]
    Command(String),

    // ── Configuration ────────────────────────────────────────────────────────
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl DeployError {
    /// Process exit code the binary should use for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Cancelled => 130,
            _ => 1,
        }
    }
}
