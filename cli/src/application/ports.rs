//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use anyhow::Result;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::domain::{DeployConfig, Droplet, DropletSpec, PtySpec};

// ── Compute Provider Port ─────────────────────────────────────────────────────

/// Cloud compute API: create a droplet and read its current state.
#[allow(async_fn_in_trait)]
pub trait ComputeProvider {
    /// Submit a create request. The returned droplet is usually still locked.
    async fn create_droplet(&self, spec: &DropletSpec) -> Result<Droplet>;
    /// Fetch the droplet's current lock state and networks.
    async fn get_droplet(&self, id: u64) -> Result<Droplet>;
}

// ── Remote Shell Ports ────────────────────────────────────────────────────────

/// Dials a host and returns an authenticated session.
#[allow(async_fn_in_trait)]
pub trait RemoteShell {
    type Session: RemoteSession;

    /// Make a single connection attempt. Retrying is the caller's concern.
    async fn connect(&self, address: &str) -> Result<Self::Session>;
}

/// An authenticated remote-shell session with one channel.
#[allow(async_fn_in_trait)]
pub trait RemoteSession {
    /// Request a pseudo-terminal for the command that follows.
    async fn request_pty(&mut self, pty: &PtySpec) -> Result<()>;
    /// Start `command` and hand back its streams.
    async fn start(&mut self, command: &str) -> Result<RemoteProcess>;
    /// Disconnect gracefully. Dropping the session also releases it.
    async fn close(self) -> Result<()>;
}

/// Exit status future: `Some(code)` when the server reported one.
pub type ExitFuture = Pin<Box<dyn Future<Output = Result<Option<u32>>> + Send>>;

/// Byte streams of a running remote command.
pub struct RemoteProcess {
    pub stdin: Box<dyn AsyncWrite + Send + Unpin>,
    pub stdout: Box<dyn AsyncRead + Send + Unpin>,
    pub stderr: Box<dyn AsyncRead + Send + Unpin>,
    /// Resolves once the command has finished and its output is flushed.
    pub exit: ExitFuture,
}

/// Local streams bound to a remote command.
pub struct LocalStdio<I, O, E> {
    pub stdin: I,
    pub stdout: O,
    pub stderr: E,
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait, no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Configuration Port ────────────────────────────────────────────────────────

/// Loads the deployment configuration.
pub trait ConfigStore {
    /// Load configuration, falling back to defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed.
    fn load(&self) -> Result<DeployConfig>;
    /// Path the configuration is read from.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    fn path(&self) -> Result<PathBuf>;
}
