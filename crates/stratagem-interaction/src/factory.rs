use crate::gemini_api_client::GeminiPerspectiveClient;
use crate::proxy_client::ProxyPerspectiveClient;
use std::sync::Arc;
use stratagem_core::config::{AppConfig, GenerationBackend};
use stratagem_core::error::Result;
use stratagem_core::generator::PerspectiveGenerator;
use stratagem_core::perspective::BatchPolicy;
use stratagem_infrastructure::SecretServiceImpl;

/// Builds the generation client selected by `config.generation.backend`.
///
/// Missing credentials or endpoint surface here as `Config` errors, before any workflow
/// runs.
pub fn build_generator(
    config: &AppConfig,
    secrets: &SecretServiceImpl,
) -> Result<Arc<dyn PerspectiveGenerator>> {
    let generation = &config.generation;
    match generation.backend {
        GenerationBackend::Gemini => {
            let credentials = secrets.gemini_credentials()?;
            let client = GeminiPerspectiveClient::from_config(&credentials, generation)?;
            tracing::debug!("[Factory] Using Gemini backend ({})", client.model());
            Ok(Arc::new(client))
        }
        GenerationBackend::Proxy => {
            let base_url = generation.proxy_url.as_deref().unwrap_or_default();
            let client = ProxyPerspectiveClient::new(
                base_url,
                BatchPolicy::exact(generation.perspective_count),
            )?;
            tracing::debug!("[Factory] Using proxy backend ({})", client.endpoint());
            Ok(Arc::new(client))
        }
    }
}
