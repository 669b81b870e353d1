// client.rs
use crate::gemini::models::{ErrorEnvelope, GenerateRequest, GenerateResponse};
use crate::gemini::GeminiError;
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

const USER_AGENT: &str = concat!("listing_rewriter/", env!("CARGO_PKG_VERSION"));

/// A text-generation backend: prompt in, completion text out.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> Result<String, GeminiError>;
}

pub struct GeminiClient {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        model: &str,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, GeminiError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GeminiError::Config("missing API key".to_string()));
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| GeminiError::Network(e.to_string()))?;

        let endpoint = generate_content_url(base_url, model)?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String, GeminiError> {
        debug!(endpoint = %self.endpoint, prompt_len = prompt.len(), "generateContent");

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("x-goog-api-key", &self.api_key)
            .json(&GenerateRequest::from_prompt(prompt))
            .send()
            .map_err(|e| GeminiError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| GeminiError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(classify_error(status.as_u16(), &body));
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| GeminiError::Decode(e.to_string()))?;

        parsed.first_text().ok_or_else(|| {
            debug!(
                finish_reason = parsed.finish_reason().unwrap_or("none"),
                "generateContent returned no text"
            );
            GeminiError::EmptyResponse
        })
    }
}

/// `{base}/v1beta/models/{model}:generateContent`
fn generate_content_url(base_url: &str, model: &str) -> Result<Url, GeminiError> {
    let mut base = base_url.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }

    Url::parse(&base)
        .and_then(|u| u.join(&format!("v1beta/models/{model}:generateContent")))
        .map_err(|e| GeminiError::Config(format!("invalid base url '{base_url}': {e}")))
}

/// Map a non-2xx reply to an error, keeping quota exhaustion distinguishable.
fn classify_error(status: u16, body: &str) -> GeminiError {
    let envelope = serde_json::from_str::<ErrorEnvelope>(body).ok();

    let message = envelope
        .as_ref()
        .and_then(|e| e.error.message.clone())
        .unwrap_or_else(|| {
            if body.is_empty() {
                "(no body)".to_string()
            } else {
                body.to_string()
            }
        });

    let exhausted = envelope
        .as_ref()
        .map(|e| {
            e.error.status.as_deref() == Some("RESOURCE_EXHAUSTED") || e.error.code == Some(429)
        })
        .unwrap_or(false);

    if status == 429 || exhausted {
        GeminiError::RateLimited { status, message }
    } else {
        GeminiError::Api { status, message }
    }
}
