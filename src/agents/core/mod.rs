//! Core agent runtime
//!
//! An [`Agent`] binds one provider connection to a system prompt, sampling
//! parameters, and an append-only conversation history. The provider client
//! is constructed lazily on the first chat call and reused afterwards.

use std::sync::Arc;

use crate::agents::domain::{AgentResponse, Message};
use crate::agents::error::AgentResult;
use crate::agents::llm::{create_client, ChatProvider, ProviderConfig, ProviderKind};

/// Generation settings for one agent
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub provider: ProviderKind,
    pub model: String,
    pub system_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// A stateful wrapper around one provider connection
///
/// History grows by exactly two messages (user, assistant) per successful
/// chat call and is never mutated on failure. System prompts are carried
/// out-of-band and never stored in history.
pub struct Agent {
    config: AgentConfig,
    connection: ProviderConfig,
    history: Vec<Message>,
    client: Option<Arc<dyn ChatProvider>>,
}

impl Agent {
    /// Create an agent; the provider client is built on first use
    pub fn new(config: AgentConfig, connection: ProviderConfig) -> Self {
        Self {
            config,
            connection,
            history: Vec::new(),
            client: None,
        }
    }

    /// Create an agent with a pre-built provider client
    pub fn with_client(config: AgentConfig, client: Arc<dyn ChatProvider>) -> Self {
        Self {
            config,
            connection: ProviderConfig::default(),
            history: Vec::new(),
            client: Some(client),
        }
    }

    /// Send one user message and return the provider's response
    ///
    /// When `include_history` is true the outgoing request carries the
    /// stored history followed by the new user message; when false it
    /// carries the new message alone. Either way, the user message and the
    /// assistant reply are appended to history after a successful call.
    pub async fn chat(&mut self, text: &str, include_history: bool) -> AgentResult<AgentResponse> {
        let client = self.ensure_client()?;

        let user_message = Message::user(text);
        let outgoing = if include_history {
            let mut messages = self.history.clone();
            messages.push(user_message.clone());
            messages
        } else {
            vec![user_message.clone()]
        };

        let response = client
            .send(
                &self.config.system_prompt,
                &outgoing,
                self.config.max_tokens,
                self.config.temperature,
            )
            .await?;

        // History advances only after a successful round trip
        self.history.push(user_message);
        self.history.push(Message::assistant(&response.content));

        Ok(response)
    }

    /// Reset conversation history; the system prompt is untouched
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Replace the system prompt for subsequent calls
    pub fn set_system_prompt(&mut self, prompt: impl Into<String>) {
        self.config.system_prompt = prompt.into();
    }

    /// Number of messages currently stored in history
    pub fn context_length(&self) -> usize {
        self.history.len()
    }

    /// Stored conversation history, oldest first
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// The agent's generation settings
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    fn ensure_client(&mut self) -> AgentResult<Arc<dyn ChatProvider>> {
        if let Some(client) = &self.client {
            return Ok(client.clone());
        }

        let client = create_client(self.config.provider, &self.config.model, &self.connection)?;
        self.client = Some(client.clone());
        Ok(client)
    }
}

#[cfg(test)]
#[path = "agent_test.rs"]
mod tests;
