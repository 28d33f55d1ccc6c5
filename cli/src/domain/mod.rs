//! Domain layer: pure types, validation, and name generation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod droplet;
pub mod error;
pub mod naming;
pub mod remote;

pub use config::DeployConfig;
pub use droplet::{Droplet, DropletLifecycle, DropletSpec};
pub use error::DeployError;
pub use remote::{ConnectPolicy, PollPolicy, PtySpec, TerminalMode};
