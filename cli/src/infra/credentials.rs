//! Credential loading: the provider API token and the SSH private key.

use std::fmt;
use std::path::Path;

use anyhow::Result;
use russh::keys::ssh_key::PrivateKey;

use crate::domain::DeployError;

/// Bearer token for the provider API. `Debug` never prints the secret.
#[derive(Clone)]
pub struct ApiToken(String);

impl ApiToken {
    #[cfg(test)]
    pub(crate) fn new(token: &str) -> Self {
        Self(token.to_string())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(***)")
    }
}

/// Read the API token from `path`, trimming surrounding whitespace.
///
/// # Errors
///
/// Returns `DeployError::Credential` if the file cannot be read or holds
/// only whitespace.
pub fn read_api_token(path: &Path) -> Result<ApiToken> {
    let raw = std::fs::read_to_string(path).map_err(|e| DeployError::Credential {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let token = raw.trim();
    if token.is_empty() {
        return Err(DeployError::Credential {
            path: path.to_path_buf(),
            reason: "file is empty".to_string(),
        }
        .into());
    }
    Ok(ApiToken(token.to_string()))
}

/// Load an unencrypted OpenSSH or PEM private key.
///
/// # Errors
///
/// Returns `DeployError::Credential` if the key is missing or cannot be parsed.
pub fn load_private_key(path: &Path) -> Result<PrivateKey> {
    russh::keys::load_secret_key(path, None).map_err(|e| {
        DeployError::Credential {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
        .into()
    })
}
