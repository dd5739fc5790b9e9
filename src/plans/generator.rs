//! Text generation backends for meal plans.
//!
//! The assembler only sees [`PlanGenerator`]; the Gemini client is the
//! production implementation and [`UnconfiguredGenerator`] stands in when no
//! API key is set.

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::prompt::PromptPayload;
use crate::config::AiConfig;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("plan generator is not configured")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("generator returned empty content")]
    EmptyContent,
}

impl From<reqwest::Error> for GenerationError {
    fn from(e: reqwest::Error) -> Self {
        GenerationError::Http(e.without_url())
    }
}

#[async_trait]
pub trait PlanGenerator: Send + Sync {
    fn is_configured(&self) -> bool;

    /// Returns the raw text produced for `payload`.
    async fn generate(&self, payload: &PromptPayload) -> Result<String, GenerationError>;
}

pub struct UnconfiguredGenerator;

#[async_trait]
impl PlanGenerator for UnconfiguredGenerator {
    fn is_configured(&self) -> bool {
        false
    }

    async fn generate(&self, _payload: &PromptPayload) -> Result<String, GenerationError> {
        Err(GenerationError::NotConfigured)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    system_instruction: GeminiContent<'a>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    candidate_count: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<GeminiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorEnvelope {
    error: GeminiError,
}

pub struct GeminiGenerator {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiGenerator {
    pub fn new(api_key: String, model: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;
        Ok(Self {
            client,
            api_key,
            model,
        })
    }

    fn url(&self) -> String {
        format!("{GEMINI_API_BASE}/models/{}:generateContent", self.model)
    }
}

#[async_trait]
impl PlanGenerator for GeminiGenerator {
    fn is_configured(&self) -> bool {
        true
    }

    async fn generate(&self, payload: &PromptPayload) -> Result<String, GenerationError> {
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user"),
                parts: vec![TextPart {
                    text: &payload.prompt,
                }],
            }],
            system_instruction: GeminiContent {
                role: None,
                parts: vec![TextPart {
                    text: &payload.system,
                }],
            },
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                candidate_count: 1,
            },
        };

        let response = self
            .client
            .post(self.url())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<GeminiErrorEnvelope>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GeminiResponse = serde_json::from_str(&text)?;
        let content = extract_text(parsed)?;
        debug!(model = %self.model, chars = content.len(), "gemini reply received");
        Ok(content)
    }
}

fn extract_text(response: GeminiResponse) -> Result<String, GenerationError> {
    if let Some(err) = response.error {
        return Err(GenerationError::Api {
            status: 200,
            message: err.message,
        });
    }
    response
        .candidates
        .and_then(|c| c.into_iter().next())
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().find_map(|p| p.text))
        .filter(|t| !t.trim().is_empty())
        .ok_or(GenerationError::EmptyContent)
}

/// Picks the generator for the configured AI settings.
pub fn from_config(cfg: &AiConfig) -> anyhow::Result<Arc<dyn PlanGenerator>> {
    match &cfg.api_key {
        Some(key) => {
            info!(model = %cfg.model, "gemini plan generator enabled");
            Ok(Arc::new(GeminiGenerator::new(
                key.clone(),
                cfg.model.clone(),
                Duration::from_secs(cfg.timeout_secs),
            )?))
        }
        None => {
            info!("GEMINI_API_KEY not set; plans will use the built-in fallback");
            Ok(Arc::new(UnconfiguredGenerator))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GeminiResponse {
        serde_json::from_str(json).expect("response json")
    }

    #[test]
    fn extracts_first_candidate_text() {
        let r = parse(
            r#"{"candidates":[{"content":{"parts":[{"text":"{\"breakfast\":{}}"}],"role":"model"}}]}"#,
        );
        assert_eq!(extract_text(r).unwrap(), "{\"breakfast\":{}}");
    }

    #[test]
    fn empty_or_missing_candidates_are_errors() {
        assert!(matches!(
            extract_text(parse(r#"{"candidates":[]}"#)),
            Err(GenerationError::EmptyContent)
        ));
        assert!(matches!(
            extract_text(parse(r#"{"candidates":[{"content":{"parts":[{"text":"  "}]}}]}"#)),
            Err(GenerationError::EmptyContent)
        ));
        assert!(matches!(
            extract_text(parse(r#"{"error":{"message":"quota"}}"#)),
            Err(GenerationError::Api { .. })
        ));
    }

    #[test]
    fn request_uses_camel_case_fields() {
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user"),
                parts: vec![TextPart { text: "p" }],
            }],
            system_instruction: GeminiContent {
                role: None,
                parts: vec![TextPart { text: "s" }],
            },
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                candidate_count: 1,
            },
        };
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v["systemInstruction"]["parts"][0]["text"], "s");
        assert_eq!(v["generationConfig"]["responseMimeType"], "application/json");
        assert!(v["systemInstruction"].get("role").is_none());
    }

    #[test]
    fn config_without_key_yields_unconfigured_generator() {
        let cfg = AiConfig {
            api_key: None,
            model: "gemini-1.5-flash".into(),
            timeout_secs: 5,
        };
        assert!(!from_config(&cfg).unwrap().is_configured());

        let cfg = AiConfig {
            api_key: Some("real-key".into()),
            ..cfg
        };
        assert!(from_config(&cfg).unwrap().is_configured());
    }

    #[test]
    fn url_does_not_carry_the_key() {
        let g = GeminiGenerator::new(
            "SECRETKEY123".into(),
            "gemini-1.5-flash".into(),
            Duration::from_secs(1),
        )
        .unwrap();
        let url = g.url();
        assert!(url.ends_with("/models/gemini-1.5-flash:generateContent"));
        assert!(!url.contains("SECRETKEY123"));
    }

    #[tokio::test]
    async fn transport_errors_do_not_expose_the_key() {
        let g = GeminiGenerator::new(
            "SECRETKEY123".into(),
            "m".into(),
            Duration::from_millis(1),
        )
        .unwrap();
        let payload = PromptPayload {
            system: "s".into(),
            prompt: "p".into(),
        };
        let err = g.generate(&payload).await.unwrap_err();
        assert!(matches!(err, GenerationError::Http(_)));
        let shown = format!("{err} {err:?}");
        assert!(!shown.contains("SECRETKEY123"), "{shown}");
        assert!(!shown.contains("generativelanguage"), "{shown}");
    }

    #[tokio::test]
    async fn unconfigured_generator_refuses() {
        let payload = PromptPayload {
            system: "s".into(),
            prompt: "p".into(),
        };
        assert!(matches!(
            UnconfiguredGenerator.generate(&payload).await,
            Err(GenerationError::NotConfigured)
        ));
    }
}
