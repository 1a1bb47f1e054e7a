use super::*;
use crate::agents::domain::Role;
use crate::agents::error::{ProviderError, ProviderResult};
use crate::agents::llm::ChatProvider;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Mock provider that scripts replies and records what it was sent
struct MockProvider {
    call_count: AtomicUsize,
    fail_on_call: Option<usize>,
    sent_message_counts: Mutex<Vec<usize>>,
    sent_system_prompts: Mutex<Vec<String>>,
}

impl MockProvider {
    fn new() -> Self {
        Self {
            call_count: AtomicUsize::new(0),
            fail_on_call: None,
            sent_message_counts: Mutex::new(Vec::new()),
            sent_system_prompts: Mutex::new(Vec::new()),
        }
    }

    fn failing_on_call(call: usize) -> Self {
        Self {
            fail_on_call: Some(call),
            ..Self::new()
        }
    }

    fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatProvider for MockProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn send(
        &self,
        system_prompt: &str,
        messages: &[Message],
        _max_tokens: u32,
        _temperature: f32,
    ) -> ProviderResult<AgentResponse> {
        let call = self.call_count.fetch_add(1, Ordering::SeqCst) + 1;
        self.sent_message_counts.lock().unwrap().push(messages.len());
        self.sent_system_prompts
            .lock()
            .unwrap()
            .push(system_prompt.to_string());

        if self.fail_on_call == Some(call) {
            return Err(ProviderError::Api {
                status: 500,
                message: "simulated provider failure".to_string(),
            });
        }

        Ok(AgentResponse {
            content: format!("reply {}", call),
            model: "mock-model".to_string(),
            provider: ProviderKind::Anthropic,
            usage: crate::agents::domain::TokenUsage::new(3, 2, None),
            finish_reason: Some("stop".to_string()),
            timestamp: Utc::now(),
        })
    }
}

fn test_config() -> AgentConfig {
    AgentConfig {
        provider: ProviderKind::Anthropic,
        model: "mock-model".to_string(),
        system_prompt: "You are a test assistant".to_string(),
        max_tokens: 256,
        temperature: 0.5,
    }
}

#[tokio::test]
async fn test_history_alternates_user_assistant() {
    let mock = Arc::new(MockProvider::new());
    let mut agent = Agent::with_client(test_config(), mock.clone());

    agent.chat("first", false).await.unwrap();
    agent.chat("second", false).await.unwrap();
    agent.chat("third", false).await.unwrap();

    let history = agent.history();
    assert_eq!(history.len(), 6);
    for (i, message) in history.iter().enumerate() {
        let expected = if i % 2 == 0 {
            Role::User
        } else {
            Role::Assistant
        };
        assert_eq!(message.role, expected);
    }
    assert_eq!(history[0].content, "first");
    assert_eq!(history[1].content, "reply 1");
    assert_eq!(history[5].content, "reply 3");
}

#[tokio::test]
async fn test_failure_leaves_history_untouched() {
    let mock = Arc::new(MockProvider::failing_on_call(2));
    let mut agent = Agent::with_client(test_config(), mock.clone());

    agent.chat("first", false).await.unwrap();
    assert_eq!(agent.context_length(), 2);

    let err = agent.chat("second", false).await.unwrap_err();
    assert!(err.to_string().contains("simulated provider failure"));

    // Only the successful call is recorded
    assert_eq!(agent.context_length(), 2);
    assert_eq!(agent.history()[0].content, "first");
    assert_eq!(mock.calls(), 2);
}

#[tokio::test]
async fn test_include_history_controls_outgoing_request() {
    let mock = Arc::new(MockProvider::new());
    let mut agent = Agent::with_client(test_config(), mock.clone());

    agent.chat("one", false).await.unwrap();
    agent.chat("two", true).await.unwrap();
    agent.chat("three", false).await.unwrap();

    // First call sends the lone user message, second carries the two
    // stored messages plus the new one, third opts out again even though
    // four messages are stored by then
    let counts = mock.sent_message_counts.lock().unwrap().clone();
    assert_eq!(counts, vec![1, 3, 1]);
    assert_eq!(agent.context_length(), 6);
}

#[tokio::test]
async fn test_clear_history_is_idempotent() {
    let mock = Arc::new(MockProvider::new());
    let mut agent = Agent::with_client(test_config(), mock.clone());

    agent.clear_history();
    assert_eq!(agent.context_length(), 0);

    agent.chat("hello", true).await.unwrap();
    assert_eq!(agent.context_length(), 2);

    agent.clear_history();
    agent.clear_history();
    assert_eq!(agent.context_length(), 0);

    agent.chat("again", true).await.unwrap();
    assert_eq!(agent.history()[0].role, Role::User);
}

#[tokio::test]
async fn test_system_prompt_carried_out_of_band() {
    let mock = Arc::new(MockProvider::new());
    let mut agent = Agent::with_client(test_config(), mock.clone());

    agent.chat("hello", true).await.unwrap();
    agent.set_system_prompt("You are terse");
    agent.chat("hello again", true).await.unwrap();

    let prompts = mock.sent_system_prompts.lock().unwrap().clone();
    assert_eq!(prompts[0], "You are a test assistant");
    assert_eq!(prompts[1], "You are terse");

    // Changing the prompt does not rewrite history, and system messages
    // never appear there
    assert_eq!(agent.context_length(), 4);
    assert!(agent.history().iter().all(|m| m.role != Role::System));
}
