//! GeminiPerspectiveClient - direct REST call to Gemini `generateContent`.
//!
//! The request forces structured output: `responseMimeType` is `application/json` and
//! `responseSchema` pins the perspective array shape.

use crate::prompt::{build_prompt, response_schema};
use crate::response::parse_perspectives;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use stratagem_core::config::{DEFAULT_GEMINI_MODEL, GeminiConfig, GenerationConfig};
use stratagem_core::error::{Result, StratagemError};
use stratagem_core::generator::{PerspectiveGenerator, normalize_topic};
use stratagem_core::perspective::{BatchPolicy, Perspective};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Generation client that talks to the Gemini HTTP API with a locally held key.
#[derive(Clone)]
pub struct GeminiPerspectiveClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
    top_p: f32,
    count: usize,
}

impl GeminiPerspectiveClient {
    /// Creates a client with default sampling (temperature 0.8, top-p 0.95) and 50 items.
    ///
    /// # Errors
    ///
    /// `Config` when the API key is empty.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(StratagemError::config("Gemini API key is empty"));
        }

        let defaults = GenerationConfig::default();
        Ok(Self {
            client: Client::new(),
            api_key,
            model: model.into(),
            base_url: BASE_URL.to_string(),
            temperature: defaults.temperature,
            top_p: defaults.top_p,
            count: defaults.perspective_count,
        })
    }

    /// Builds a client from credentials and generation settings.
    ///
    /// The model in `secret.json` wins over the configured one, which wins over the default.
    pub fn from_config(credentials: &GeminiConfig, generation: &GenerationConfig) -> Result<Self> {
        let model = credentials
            .model_name
            .clone()
            .filter(|m| !m.trim().is_empty())
            .or_else(|| Some(generation.model.clone()).filter(|m| !m.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());

        Ok(Self::new(credentials.api_key.clone(), model)?
            .with_sampling(generation.temperature, generation.top_p)
            .with_count(generation.perspective_count))
    }

    pub fn with_sampling(mut self, temperature: f32, top_p: f32) -> Self {
        self.temperature = temperature;
        self.top_p = top_p;
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Overrides the API root, e.g. for a regional endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, topic: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: build_prompt(topic, self.count),
                }],
            }],
            generation_config: GenerationSettings {
                response_mime_type: "application/json".to_string(),
                response_schema: response_schema(self.count),
                temperature: self.temperature,
                top_p: self.top_p,
            },
        }
    }

    async fn send_request(&self, body: &GenerateContentRequest) -> Result<String> {
        let url = format!("{}/{}:generateContent", self.base_url, self.model);

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| {
                StratagemError::transport(None, format!("Gemini API request failed: {err}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, &body_text));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|err| {
            StratagemError::parse(format!("Failed to parse Gemini response: {err}"))
        })?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl PerspectiveGenerator for GeminiPerspectiveClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, topic: &str) -> Result<Vec<Perspective>> {
        let topic = normalize_topic(topic)?;
        tracing::info!(
            "[GeminiClient] Requesting {} perspectives from {}",
            self.count,
            self.model
        );

        let request = self.build_request(topic);
        let text = self.send_request(&request).await?;
        let perspectives = parse_perspectives(&text, BatchPolicy::exact(self.count))?;

        tracing::info!(
            "[GeminiClient] Accepted batch of {} perspectives",
            perspectives.len()
        );
        Ok(perspectives)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationSettings,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationSettings {
    response_mime_type: String,
    response_schema: Value,
    temperature: f32,
    top_p: f32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn extract_text_response(response: GenerateContentResponse) -> Result<String> {
    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| {
            StratagemError::schema_violation("Gemini API returned no text in the response candidates")
        })
}

fn map_http_error(status: StatusCode, body: &str) -> StratagemError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.to_string());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| {
            if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            } else {
                body.to_string()
            }
        });

    StratagemError::transport(Some(status.as_u16()), message)
}
