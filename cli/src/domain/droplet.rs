//! Droplet domain types and pure address extraction.
//!
//! Field names follow the DigitalOcean v2 JSON schema so the infra adapter can
//! deserialize straight into these types.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::DeployError;

/// Create-request body for a new droplet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropletSpec {
    /// Unique droplet name, e.g. `"fastnetmon-test-deployment-k3x9..."`.
    pub name: String,
    /// Region slug, e.g. `"fra1"`.
    pub region: String,
    /// Size slug, e.g. `"2gb"`.
    pub size: String,
    /// Image slug, e.g. `"ubuntu-20-04-x64"`.
    pub image: String,
    /// Fingerprints of SSH keys already registered with the provider.
    pub ssh_keys: Vec<String>,
}

/// Droplet as reported by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct Droplet {
    pub id: u64,
    /// `true` while an action (such as the initial boot) is in progress.
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub networks: Networks,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Networks {
    #[serde(default)]
    pub v4: Vec<NetworkV4>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkV4 {
    pub ip_address: String,
    /// `"public"` or `"private"`.
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Lifecycle derived from the provider's lock flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropletLifecycle {
    Provisioning,
    Ready,
}

impl Droplet {
    #[must_use]
    pub fn lifecycle(&self) -> DropletLifecycle {
        if self.locked {
            DropletLifecycle::Provisioning
        } else {
            DropletLifecycle::Ready
        }
    }

    /// First reachable IPv4 address.
    ///
    /// Prefers the first `public` entry and falls back to the first entry of
    /// any type.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::NoIpv4Address` if the droplet reports no IPv4
    /// networks at all.
    pub fn first_ipv4(&self) -> Result<&str> {
        let v4 = &self.networks.v4;
        v4.iter()
            .find(|n| n.kind == "public")
            .or_else(|| v4.first())
            .map(|n| n.ip_address.as_str())
            .ok_or_else(|| DeployError::NoIpv4Address { id: self.id }.into())
    }
}
