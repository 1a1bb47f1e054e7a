//! Chat provider implementations
//!
//! This module provides a unified interface for talking to the supported
//! LLM providers:
//! - Anthropic (Claude)
//! - OpenAI (GPT)
//! - Google Gemini
//!
//! Adapters translate the canonical [`Message`] list into each provider's
//! wire format and normalize the response back into an [`AgentResponse`].

mod anthropic;
mod gemini;
mod openai;

pub use anthropic::AnthropicProvider;
pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

use crate::agents::domain::{AgentResponse, Message};
use crate::agents::error::{AgentError, ProviderResult};

/// Supported LLM providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Anthropic (Claude models)
    Anthropic,
    /// OpenAI (GPT models)
    OpenAi,
    /// Google Gemini
    #[serde(alias = "google")]
    Gemini,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::OpenAi => "openai",
            ProviderKind::Gemini => "gemini",
        })
    }
}

impl FromStr for ProviderKind {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            "openai" | "gpt" => Ok(ProviderKind::OpenAi),
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            other => Err(AgentError::UnsupportedProvider(other.to_string())),
        }
    }
}

/// Connection settings for one provider endpoint
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// API key; falls back to the provider's conventional environment
    /// variable when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL override for the provider API
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Trait for chat providers
///
/// A provider owns one authenticated connection and translates canonical
/// messages to and from its wire format. Adapters must drop system-role
/// messages from the turn list and carry the system prompt through the
/// provider's dedicated channel instead.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Which provider this client talks to
    fn kind(&self) -> ProviderKind;

    /// Get the model being used
    fn model(&self) -> &str;

    /// Send a turn list and return the normalized response
    async fn send(
        &self,
        system_prompt: &str,
        messages: &[Message],
        max_tokens: u32,
        temperature: f32,
    ) -> ProviderResult<AgentResponse>;
}

/// Create a provider client for the given kind
pub fn create_client(
    kind: ProviderKind,
    model: &str,
    config: &ProviderConfig,
) -> ProviderResult<Arc<dyn ChatProvider>> {
    match kind {
        ProviderKind::Anthropic => Ok(Arc::new(AnthropicProvider::new(model, config)?)),
        ProviderKind::OpenAi => Ok(Arc::new(OpenAiProvider::new(model, config)?)),
        ProviderKind::Gemini => Ok(Arc::new(GeminiProvider::new(model, config)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_parsing() {
        assert_eq!(
            "anthropic".parse::<ProviderKind>().unwrap(),
            ProviderKind::Anthropic
        );
        assert_eq!("GPT".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert_eq!(
            "google".parse::<ProviderKind>().unwrap(),
            ProviderKind::Gemini
        );

        let err = "mistral".parse::<ProviderKind>().unwrap_err();
        assert!(err.to_string().contains("Unsupported provider"));
    }

    #[test]
    fn test_provider_kind_display_roundtrip() {
        for kind in [
            ProviderKind::Anthropic,
            ProviderKind::OpenAi,
            ProviderKind::Gemini,
        ] {
            assert_eq!(kind.to_string().parse::<ProviderKind>().unwrap(), kind);
        }
    }
}
