use crate::perspective::DEFAULT_PERSPECTIVE_COUNT;
use serde::{Deserialize, Serialize};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_STORAGE_KEY: &str = "strategic_reports";

/// Which generation client the workflow talks to.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GenerationBackend {
    /// Direct Gemini REST call with a locally held API key.
    #[default]
    Gemini,
    /// Server-mediated call; the server holds the credential.
    Proxy,
}

/// Root of `config.toml`. Every field has a default so a missing file is valid.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub generation: GenerationConfig,
    pub storage: StorageConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GenerationConfig {
    pub backend: GenerationBackend,
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub perspective_count: usize,
    /// Base URL of the generation server, required for the proxy backend.
    pub proxy_url: Option<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            backend: GenerationBackend::default(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            temperature: 0.8,
            top_p: 0.95,
            perspective_count: DEFAULT_PERSPECTIVE_COUNT,
            proxy_url: None,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    /// Key the report sequence is stored under.
    pub storage_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

/// Contents of `secret.json`.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct SecretConfig {
    #[serde(default)]
    pub gemini: Option<GeminiConfig>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    #[serde(default)]
    pub model_name: Option<String>,
}
