//! Response envelope shared by all providers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agents::llm::ProviderKind;

/// Token usage information
///
/// Providers that omit a counter report it as 0 rather than failing.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens consumed by the prompt/input
    pub input_tokens: u32,
    /// Tokens generated in the response
    pub output_tokens: u32,
    /// Total tokens used
    pub total_tokens: u32,
}

impl TokenUsage {
    /// Build a usage record, deriving the total when the provider omits it
    pub fn new(input_tokens: u32, output_tokens: u32, total_tokens: Option<u32>) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: total_tokens.unwrap_or(input_tokens + output_tokens),
        }
    }
}

/// Uniform response produced by one `chat` call
///
/// `content` is always present; a response with no textual content carries an
/// empty string, never an absent value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResponse {
    /// Response text
    pub content: String,
    /// Model that produced the response
    pub model: String,
    /// Provider that served the request
    pub provider: ProviderKind,
    /// Token accounting
    pub usage: TokenUsage,
    /// Canonical finish reason, when the provider reported one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    /// When the response was received
    pub timestamp: DateTime<Utc>,
}

impl AgentResponse {
    /// Total tokens consumed by the call
    pub fn total_tokens(&self) -> u32 {
        self.usage.total_tokens
    }
}
