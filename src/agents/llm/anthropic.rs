//! Anthropic chat provider

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::env;

use super::{ChatProvider, ProviderConfig, ProviderKind};
use crate::agents::domain::{AgentResponse, Message, Role, TokenUsage};
use crate::agents::error::{ProviderError, ProviderResult};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

/// Anthropic chat provider
pub struct AnthropicProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider from connection settings
    pub fn new(model: &str, config: &ProviderConfig) -> ProviderResult<Self> {
        let api_key = match &config.api_key {
            Some(key) => key.clone(),
            None => env::var("ANTHROPIC_API_KEY").map_err(|_| {
                ProviderError::Authentication(
                    "ANTHROPIC_API_KEY environment variable not set".to_string(),
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

    /// Build the request body for the Messages API
    fn build_request_body(
        &self,
        system_prompt: &str,
        messages: &[Message],
        max_tokens: u32,
        temperature: f32,
    ) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": self.convert_messages(messages),
            "max_tokens": max_tokens,
        });

        if !system_prompt.is_empty() {
            body["system"] = json!(system_prompt);
        }

        // Extended thinking models reject an explicit temperature
        if !self.model.ends_with("-thinking") {
            body["temperature"] = json!(temperature);
        }

        body
    }

    /// Convert canonical messages to Anthropic turn format
    ///
    /// System messages are dropped; the system prompt travels through the
    /// top-level `system` field instead.
    fn convert_messages(&self, messages: &[Message]) -> Vec<Value> {
        messages
            .iter()
            .filter_map(|m| match m.role {
                Role::System => None,
                Role::User => Some(json!({
                    "role": "user",
                    "content": m.content
                })),
                Role::Assistant => Some(json!({
                    "role": "assistant",
                    "content": m.content
                })),
            })
            .collect()
    }

    fn parse_response(&self, response: &AnthropicResponse) -> AgentResponse {
        let mut content = String::new();
        for block in &response.content {
            if block.block_type == "text" {
                if let Some(text) = &block.text {
                    content.push_str(text);
                }
            }
        }

        let finish_reason = response.stop_reason.as_deref().map(|reason| match reason {
            "end_turn" | "stop_sequence" => "stop".to_string(),
            "max_tokens" => "length".to_string(),
            other => other.to_string(),
        });

        let usage = TokenUsage::new(
            response.usage.input_tokens,
            response.usage.output_tokens,
            None,
        );

        AgentResponse {
            content,
            model: self.model.clone(),
            provider: ProviderKind::Anthropic,
            usage,
            finish_reason,
            timestamp: Utc::now(),
        }
    }
}

#[async_trait]
impl ChatProvider for AnthropicProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
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

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
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

        let anthropic_response: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(format!("Failed to parse response: {}", e)))?;

        Ok(self.parse_response(&anthropic_response))
    }
}

// Anthropic API response types

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    stop_reason: Option<String>,
    #[serde(default)]
    usage: AnthropicUsage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AnthropicUsage {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> AnthropicProvider {
        AnthropicProvider::new(
            "claude-sonnet-4-20250514",
            &ProviderConfig {
                api_key: Some("test-key".to_string()),
                base_url: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_body_carries_system_and_temperature() {
        let p = provider();
        let messages = vec![Message::user("Hello")];
        let body = p.build_request_body("You are helpful", &messages, 1024, 0.5);

        assert_eq!(body["system"], "You are helpful");
        assert_eq!(body["max_tokens"], 1024);
        assert_eq!(body["temperature"], 0.5);
        assert_eq!(body["messages"][0]["role"], "user");
    }

    #[test]
    fn test_thinking_model_omits_temperature() {
        let p = AnthropicProvider::new(
            "claude-opus-4-thinking",
            &ProviderConfig {
                api_key: Some("test-key".to_string()),
                base_url: None,
            },
        )
        .unwrap();

        let body = p.build_request_body("", &[Message::user("hi")], 256, 0.7);
        assert!(body.get("temperature").is_none());
        assert!(body.get("system").is_none());
    }

    #[test]
    fn test_system_messages_dropped_from_turns() {
        let p = provider();
        let messages = vec![
            Message::system("ignored"),
            Message::user("question"),
            Message::assistant("answer"),
        ];

        let converted = p.convert_messages(&messages);
        assert_eq!(converted.len(), 2);
        assert_eq!(converted[0]["role"], "user");
        assert_eq!(converted[1]["role"], "assistant");
    }

    #[test]
    fn test_parse_response_concatenates_text_blocks() {
        let p = provider();
        let response = AnthropicResponse {
            content: vec![
                ContentBlock {
                    block_type: "text".to_string(),
                    text: Some("Hello ".to_string()),
                },
                ContentBlock {
                    block_type: "thinking".to_string(),
                    text: Some("hidden".to_string()),
                },
                ContentBlock {
                    block_type: "text".to_string(),
                    text: Some("world".to_string()),
                },
            ],
            stop_reason: Some("end_turn".to_string()),
            usage: AnthropicUsage {
                input_tokens: 10,
                output_tokens: 5,
            },
        };

        let parsed = p.parse_response(&response);
        assert_eq!(parsed.content, "Hello world");
        assert_eq!(parsed.finish_reason.as_deref(), Some("stop"));
        assert_eq!(parsed.usage.total_tokens, 15);
        assert_eq!(parsed.provider, ProviderKind::Anthropic);
    }

    #[test]
    fn test_stop_reason_mapping() {
        let p = provider();
        let mk = |reason: &str| AnthropicResponse {
            content: vec![],
            stop_reason: Some(reason.to_string()),
            usage: AnthropicUsage::default(),
        };

        assert_eq!(
            p.parse_response(&mk("stop_sequence")).finish_reason.as_deref(),
            Some("stop")
        );
        assert_eq!(
            p.parse_response(&mk("max_tokens")).finish_reason.as_deref(),
            Some("length")
        );
    }
}
