//! ProxyPerspectiveClient - server-mediated generation.
//!
//! The server holds the model credential. Contract:
//!
//! - request: `POST {base_url}/api/generate` with `{ "topic": "..." }`
//! - success: 2xx with the perspective array as body
//! - failure: non-2xx with `{ "error": "..." }`

use crate::response::parse_perspectives;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use stratagem_core::error::{Result, StratagemError};
use stratagem_core::generator::{PerspectiveGenerator, normalize_topic};
use stratagem_core::perspective::{BatchPolicy, Perspective};

const GENERATE_PATH: &str = "/api/generate";

#[derive(Clone)]
pub struct ProxyPerspectiveClient {
    client: Client,
    endpoint: String,
    policy: BatchPolicy,
}

impl ProxyPerspectiveClient {
    /// # Errors
    ///
    /// `Config` when `base_url` is empty.
    pub fn new(base_url: &str, policy: BatchPolicy) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(StratagemError::config(
                "proxy backend selected but generation.proxy_url is not set",
            ));
        }

        Ok(Self {
            client: Client::new(),
            endpoint: format!("{base_url}{GENERATE_PATH}"),
            policy,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    topic: &'a str,
}

#[derive(Deserialize)]
struct ServerError {
    error: Option<String>,
}

#[async_trait]
impl PerspectiveGenerator for ProxyPerspectiveClient {
    fn name(&self) -> &str {
        "proxy"
    }

    async fn generate(&self, topic: &str) -> Result<Vec<Perspective>> {
        let topic = normalize_topic(topic)?;
        tracing::info!("[ProxyClient] Requesting perspectives from {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&GenerateRequest { topic })
            .send()
            .await
            .map_err(|err| {
                StratagemError::transport(None, format!("generation server unreachable: {err}"))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|err| {
            StratagemError::transport(
                Some(status.as_u16()),
                format!("failed to read server response: {err}"),
            )
        })?;

        if !status.is_success() {
            return Err(map_server_error(status, &body));
        }

        let perspectives = parse_perspectives(&body, self.policy)?;
        tracing::info!(
            "[ProxyClient] Accepted batch of {} perspectives",
            perspectives.len()
        );
        Ok(perspectives)
    }
}

/// Maps a non-2xx response to a transport error carrying the server-reported reason.
fn map_server_error(status: StatusCode, body: &str) -> StratagemError {
    let message = serde_json::from_str::<ServerError>(body)
        .ok()
        .and_then(|e| e.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            format!(
                "Server error: {}",
                status.canonical_reason().unwrap_or(status.as_str())
            )
        });

    StratagemError::transport(Some(status.as_u16()), message)
}
