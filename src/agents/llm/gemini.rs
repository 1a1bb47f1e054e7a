//! Google Gemini chat provider

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::env;

use super::{ChatProvider, ProviderConfig, ProviderKind};
use crate::agents::domain::{AgentResponse, Message, Role, TokenUsage};
use crate::agents::error::{ProviderError, ProviderResult};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Google Gemini chat provider
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider from connection settings
    pub fn new(model: &str, config: &ProviderConfig) -> ProviderResult<Self> {
        let api_key = match &config.api_key {
            Some(key) => key.clone(),
            None => env::var("GEMINI_API_KEY").map_err(|_| {
                ProviderError::Authentication(
                    "GEMINI_API_KEY environment variable not set".to_string(),
                )
            })?,
        };

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url,
            model: model.to_string(),
        })
    }

    /// Build the request body for the generateContent API
    fn build_request_body(
        &self,
        system_prompt: &str,
        messages: &[Message],
        max_tokens: u32,
        temperature: f32,
    ) -> Value {
        let mut body = json!({
            "contents": self.convert_messages(messages),
            "generationConfig": {
                "temperature": temperature,
                "maxOutputTokens": max_tokens,
            },
        });

        if !system_prompt.is_empty() {
            body["systemInstruction"] = json!({
                "parts": [{ "text": system_prompt }]
            });
        }

        body
    }

    /// Convert canonical messages to Gemini content format
    ///
    /// Gemini names the assistant role "model" and carries the system
    /// prompt in a separate `systemInstruction` field.
    fn convert_messages(&self, messages: &[Message]) -> Vec<Value> {
        messages
            .iter()
            .filter_map(|m| {
                let role = match m.role {
                    Role::System => return None,
                    Role::User => "user",
                    Role::Assistant => "model",
                };
                Some(json!({
                    "role": role,
                    "parts": [{ "text": m.content }]
                }))
            })
            .collect()
    }

    fn parse_response(&self, response: &GeminiResponse) -> ProviderResult<AgentResponse> {
        let candidate = response
            .candidates
            .first()
            .ok_or_else(|| ProviderError::Parse("Response contained no candidates".to_string()))?;

        let mut content = String::new();
        if let Some(parts) = candidate.content.as_ref().map(|c| &c.parts) {
            for part in parts {
                if let Some(text) = &part.text {
                    content.push_str(text);
                }
            }
        }

        let finish_reason = candidate.finish_reason.as_deref().map(|reason| match reason {
            "STOP" => "stop".to_string(),
            "MAX_TOKENS" => "length".to_string(),
            "SAFETY" | "RECITATION" => "content_filter".to_string(),
            other => other.to_lowercase(),
        });

        let usage = response
            .usage_metadata
            .as_ref()
            .map(|u| {
                TokenUsage::new(
                    u.prompt_token_count.unwrap_or(0),
                    u.candidates_token_count.unwrap_or(0),
                    u.total_token_count,
                )
            })
            .unwrap_or_default();

        Ok(AgentResponse {
            content,
            model: self.model.clone(),
            provider: ProviderKind::Gemini,
            usage,
            finish_reason,
            timestamp: Utc::now(),
        })
    }
}

#[async_trait]
impl ChatProvider for GeminiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn send(
        &self,
        system_prompt: &str,
        messages: &[Message],
        max_tokens: u32,
        temperature: f32,
    ) -> ProviderResult<AgentResponse> {
        let body = self.build_request_body(system_prompt, messages, max_tokens, temperature);

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(format!("Failed to parse response: {}", e)))?;

        self.parse_response(&gemini_response)
    }
}

// Gemini API response types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
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
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
    total_token_count: Option<u32>,
}
