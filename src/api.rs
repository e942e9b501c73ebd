//! Text-generation service client.
//!
//! The service is treated as a black box: one instruction string in, one
//! generated string out. The concrete client speaks the Gemini-style
//! `generateContent` REST shape, authenticated by a caller-supplied
//! credential that is sent as a query parameter and never logged or
//! persisted.
//!
//! [`TextGenerator`] is the seam: the pipeline is generic over it so tests
//! can substitute a canned implementation without any network.

use crate::config::GenerationConfig;
use crate::error::GenerationError;
use crate::utils::truncate_for_log;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

/// One opaque instruction in, one opaque generated string out.
pub trait TextGenerator {
    async fn generate(&self, instruction: &str) -> Result<String, GenerationError>;
}

/// Client for a Gemini-style `generateContent` endpoint.
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    credential: String,
}

impl GeminiClient {
    /// Build a client from the generation settings and a session credential.
    ///
    /// Uses the same client identification string as the fetchers.
    pub fn new(
        config: &GenerationConfig,
        user_agent: &str,
        credential: &str,
    ) -> Result<Self, GenerationError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            credential: credential.to_string(),
        })
    }
}

impl TextGenerator for GeminiClient {
    /// Single attempt, explicit timeout; any failure surfaces verbatim.
    #[instrument(level = "info", skip_all, fields(model = %self.model))]
    async fn generate(&self, instruction: &str) -> Result<String, GenerationError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = GenerateRequest::from_text(instruction);

        let t0 = Instant::now();
        let response = self
            .http
            .post(&url)
            .query(&[("key", self.credential.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, elapsed_ms = t0.elapsed().as_millis() as u64, "Generation call rejected");
            return Err(GenerationError::Status {
                status,
                body: truncate_for_log(&body, 300),
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        let text = response_text(parsed).ok_or(GenerationError::EmptyResponse)?;
        info!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            chars = text.chars().count(),
            "Generation call succeeded"
        );
        Ok(text)
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
}

impl GenerateRequest {
    fn from_text(text: &str) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![Part {
                    text: text.to_string(),
                }],
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

/// Pull the generated text out of a response: first candidate, all parts
/// joined, whitespace trimmed. `None` when there is nothing usable.
fn response_text(response: GenerateResponse) -> Option<String> {
    let content = response.candidates.into_iter().next()?.content?;
    let text = content
        .parts
        .into_iter()
        .map(|p| p.text)
        .collect::<Vec<_>>()
        .join("");
    let trimmed = text.trim().to_string();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}
