//! DigitalOcean v2 API adapter for the `ComputeProvider` port.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde::Deserialize;

use crate::application::ports::ComputeProvider;
use crate::domain::{DeployError, Droplet, DropletSpec};
use crate::infra::credentials::ApiToken;

/// Per-request timeout for API calls.
pub const API_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct DropletEnvelope {
    droplet: Droplet,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// HTTP client for the droplet endpoints.
pub struct DigitalOceanClient {
    http: Client,
    base_url: String,
    token: ApiToken,
}

impl DigitalOceanClient {
    /// Build a client for `base_url` (e.g. `https://api.digitalocean.com`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: &str, token: ApiToken) -> Result<Self> {
        let http = Client::builder()
            .timeout(API_TIMEOUT)
            .user_agent(concat!("droplet-deploy/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

impl ComputeProvider for DigitalOceanClient {
    async fn create_droplet(&self, spec: &DropletSpec) -> Result<Droplet> {
        let response = self
            .http
            .post(self.url("/v2/droplets"))
            .bearer_auth(self.token.expose())
            .json(spec)
            .send()
            .await
            .map_err(|e| request_failed("create droplet", &e))?;
        decode_droplet("create droplet", response).await
    }

    async fn get_droplet(&self, id: u64) -> Result<Droplet> {
        let response = self
            .http
            .get(self.url(&format!("/v2/droplets/{id}")))
            .bearer_auth(self.token.expose())
            .send()
            .await
            .map_err(|e| request_failed("get droplet", &e))?;
        decode_droplet("get droplet", response).await
    }
}

fn request_failed(operation: &str, e: &reqwest::Error) -> anyhow::Error {
    DeployError::ProviderRequest {
        operation: operation.to_string(),
        message: e.to_string(),
    }
    .into()
}

async fn decode_droplet(operation: &str, response: Response) -> Result<Droplet> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|b| b.message)
            .unwrap_or(body);
        return Err(DeployError::ProviderRequest {
            operation: operation.to_string(),
            message: format!("HTTP {status}: {detail}"),
        }
        .into());
    }
    let envelope: DropletEnvelope =
        response
            .json()
            .await
            .map_err(|e| DeployError::ProviderRequest {
                operation: operation.to_string(),
                message: format!("unexpected response body: {e}"),
            })?;
    Ok(envelope.droplet)
}
