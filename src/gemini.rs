//! Google Gemini backend for [`TextModel`].
//!
//! Talks to the `generateContent` REST endpoint directly with `reqwest`. Only
//! the text parts of the request and response shapes are modelled.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{API_KEY_VAR, ModelConfig};
use crate::error::InitializationError;
use crate::model::{ModelClient, TextModel};
use crate::template::PromptTemplate;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Errors returned by [`GeminiModel`].
#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("request to Gemini failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Gemini API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("malformed Gemini response: {0}")]
    MalformedResponse(String),

    #[error("prompt blocked by Gemini: {0}")]
    Blocked(String),

    #[error("Gemini returned no text")]
    EmptyResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [TextPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
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
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Gemini text model reached over HTTPS.
pub struct GeminiModel {
    http: reqwest::Client,
    api_key: SecretString,
    endpoint: String,
}

impl GeminiModel {
    pub fn new(
        api_key: SecretString,
        model: &str,
        base_url: &str,
        api_version: &str,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        let endpoint = format!(
            "{}/{}/models/{}:generateContent",
            base_url.trim_end_matches('/'),
            api_version.trim_matches('/'),
            model
        );

        Ok(Self {
            http,
            api_key,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl TextModel for GeminiModel {
    type Error = GeminiError;

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        let body = GenerateContentRequest {
            contents: [Content {
                role: "user",
                parts: [TextPart { text: prompt }],
            }],
        };

        let response = self
            .http
            .post(&self.endpoint)
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            return Err(GeminiError::Api {
                status: status.as_u16(),
                message: error_message(&bytes),
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_slice(&bytes)
            .map_err(|e| GeminiError::MalformedResponse(e.to_string()))?;

        extract_text(parsed)
    }
}

// Prefer the structured `{"error": {"message": ...}}` body, else the raw text.
fn error_message(body: &[u8]) -> String {
    match serde_json::from_slice::<ApiErrorResponse>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) => String::from_utf8_lossy(body).trim().to_string(),
    }
}

fn extract_text(response: GenerateContentResponse) -> Result<String, GeminiError> {
    if let Some(reason) = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason)
    {
        return Err(GeminiError::Blocked(reason));
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(GeminiError::EmptyResponse);
    };

    let text: String = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|part| part.text)
        .collect();

    if text.is_empty() {
        return match candidate.finish_reason {
            Some(reason) if reason != "STOP" => Err(GeminiError::Blocked(reason)),
            _ => Err(GeminiError::EmptyResponse),
        };
    }

    Ok(text)
}

impl ModelClient<GeminiModel> {
    /// Builds the Gemini-backed client from `config`.
    ///
    /// A missing API key is reported as [`InitializationError::MissingCredential`]
    /// so the caller can log it and keep serving in degraded mode.
    pub fn initialize(config: &ModelConfig) -> Result<Self, InitializationError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.expose_secret().trim().is_empty())
            .ok_or(InitializationError::MissingCredential(API_KEY_VAR))?;

        let template = PromptTemplate::parse(&config.prompt_template)?;

        let model = GeminiModel::new(
            api_key,
            &config.model_identifier,
            &config.base_url,
            &config.api_version,
            config.timeout,
        )?;

        Ok(ModelClient::new(
            config.model_identifier.clone(),
            model,
            template,
        ))
    }
}
