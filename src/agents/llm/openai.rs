//! OpenAI chat provider

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::env;

use super::{ChatProvider, ProviderConfig, ProviderKind};
use crate::agents::domain::{AgentResponse, Message, Role, TokenUsage};
use crate::agents::error::{ProviderError, ProviderResult};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI chat provider
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiProvider {
    /// Create a new OpenAI provider from connection settings
    pub fn new(model: &str, config: &ProviderConfig) -> ProviderResult<Self> {
        let api_key = match &config.api_key {
            Some(key) => key.clone(),
            None => env::var("OPENAI_API_KEY").map_err(|_| {
                ProviderError::Authentication(
                    "OPENAI_API_KEY environment variable not set".to_string(),
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

    /// Build the request body for the Chat Completions API
    fn build_request_body(
        &self,
        system_prompt: &str,
        messages: &[Message],
        max_tokens: u32,
        temperature: f32,
    ) -> Value {
        json!({
            "model": self.model,
            "messages": self.convert_messages(system_prompt, messages),
            "max_completion_tokens": max_tokens,
            "temperature": temperature,
        })
    }

    /// Convert canonical messages to OpenAI format
    ///
    /// The system prompt becomes the first message in the list.
    fn convert_messages(&self, system_prompt: &str, messages: &[Message]) -> Vec<Value> {
        let mut converted = Vec::with_capacity(messages.len() + 1);

        if !system_prompt.is_empty() {
            converted.push(json!({
                "role": "system",
                "content": system_prompt
            }));
        }

        for m in messages {
            let role = match m.role {
                Role::System => continue,
                Role::User => "user",
                Role::Assistant => "assistant",
            };
            converted.push(json!({
                "role": role,
                "content": m.content
            }));
        }

        converted
    }

    fn parse_response(&self, response: &OpenAiResponse) -> ProviderResult<AgentResponse> {
        let choice = response
            .choices
            .first()
            .ok_or_else(|| ProviderError::Parse("Response contained no choices".to_string()))?;

        let content = choice.message.content.clone().unwrap_or_default();

        let usage = response
            .usage
            .as_ref()
            .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens, Some(u.total_tokens)))
            .unwrap_or_default();

        Ok(AgentResponse {
            content,
            model: self.model.clone(),
            provider: ProviderKind::OpenAi,
            usage,
            finish_reason: choice.finish_reason.clone(),
            timestamp: Utc::now(),
        })
    }
}

#[async_trait]
impl ChatProvider for OpenAiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
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
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
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

        let openai_response: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(format!("Failed to parse response: {}", e)))?;

        self.parse_response(&openai_response)
    }
}

// OpenAI API response types

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<Choice>,
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> OpenAiProvider {
        OpenAiProvider::new(
            "gpt-4o",
            &ProviderConfig {
                api_key: Some("test-key".to_string()),
                base_url: None,
            },
        )
        .unwrap()
    }

    #[test]
    fn test_system_prompt_leads_message_list() {
        let p = provider();
        let messages = vec![Message::user("question"), Message::assistant("answer")];
        let converted = p.convert_messages("Be terse", &messages);

        assert_eq!(converted.len(), 3);
        assert_eq!(converted[0]["role"], "system");
        assert_eq!(converted[0]["content"], "Be terse");
        assert_eq!(converted[1]["role"], "user");
        assert_eq!(converted[2]["role"], "assistant");
    }

    #[test]
    fn test_empty_system_prompt_omitted() {
        let p = provider();
        let converted = p.convert_messages("", &[Message::user("hi")]);
        assert_eq!(converted.len(), 1);
        assert_eq!(converted[0]["role"], "user");
    }

    #[test]
    fn test_body_uses_max_completion_tokens() {
        let p = provider();
        let body = p.build_request_body("sys", &[Message::user("hi")], 2048, 0.5);
        assert_eq!(body["max_completion_tokens"], 2048);
        assert_eq!(body["temperature"], 0.5);
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn test_parse_response_null_content_becomes_empty() {
        let p = provider();
        let response = OpenAiResponse {
            choices: vec![Choice {
                message: ChoiceMessage { content: None },
                finish_reason: Some("stop".to_string()),
            }],
            usage: Some(OpenAiUsage {
                prompt_tokens: 7,
                completion_tokens: 3,
                total_tokens: 10,
            }),
        };

        let parsed = p.parse_response(&response).unwrap();
        assert_eq!(parsed.content, "");
        assert_eq!(parsed.finish_reason.as_deref(), Some("stop"));
        assert_eq!(parsed.usage.total_tokens, 10);
    }

    #[test]
    fn test_parse_response_rejects_empty_choices() {
        let p = provider();
        let response = OpenAiResponse {
            choices: vec![],
            usage: None,
        };

        let err = p.parse_response(&response).unwrap_err();
        assert!(matches!(err, ProviderError::Parse(_)));
    }
}
