//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: the provider HTTP client,
//! the SSH transport, credential and configuration files, and process stdio.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod config;
pub mod credentials;
pub mod digitalocean;
pub mod ssh;
pub mod stdio;
