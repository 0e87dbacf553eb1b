//! Provider-agnostic chat types and the [`ChatModel`] trait.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions for the model
    System,
    /// End-user input
    User,
    /// Model output
    Assistant,
}

impl Role {
    /// Wire name shared by Ollama and OpenAI-compatible APIs
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Request sent to a chat model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Conversation so far, oldest first
    pub messages: Vec<Message>,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Upper bound on generated tokens
    pub max_tokens: Option<usize>,
    /// Ask the provider to constrain output to a JSON object
    pub json_output: bool,
}

impl ChatRequest {
    /// Create a request from messages
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the generated token limit
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Request JSON-only output
    pub fn with_json_output(mut self) -> Self {
        self.json_output = true;
        self
    }
}

/// Token accounting reported by a provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageMetadata {
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub total_tokens: usize,
}

impl UsageMetadata {
    pub fn new(input_tokens: usize, output_tokens: usize) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
        }
    }
}

/// Completed chat response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Assistant text
    pub content: String,
    /// Model that produced the answer, as reported by the provider
    pub model: String,
    /// Token usage, when reported
    pub usage: Option<UsageMetadata>,
    /// Provider-specific extras (finish reason, durations, ...)
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl ChatResponse {
    /// Create a response with just text and model name
    pub fn new(content: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            model: model.into(),
            usage: None,
            metadata: HashMap::new(),
        }
    }

    /// Assistant text with surrounding whitespace removed
    pub fn text(&self) -> &str {
        self.content.trim()
    }
}

/// Core trait for chat-based language models.
///
/// Implementations convert [`ChatRequest`] into their provider's wire format,
/// perform the HTTP call and map the result back. They must be `Send + Sync`
/// so a single client can be shared behind an `Arc` across requests.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generate a complete chat response
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Check whether the provider is reachable.
    ///
    /// Default implementation assumes availability.
    async fn is_available(&self) -> Result<bool> {
        Ok(true)
    }

    /// Model identifier this client is bound to
    fn model_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        assert_eq!(Message::system("s").role, Role::System);
        assert_eq!(Message::user("u").role, Role::User);
        assert_eq!(Message::assistant("a").role, Role::Assistant);
        assert_eq!(Role::User.as_str(), "user");
    }

    #[test]
    fn test_chat_request_builder() {
        let request = ChatRequest::new(vec![Message::user("hi")])
            .with_temperature(0.2)
            .with_max_tokens(500)
            .with_json_output();

        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.temperature, Some(0.2));
        assert_eq!(request.max_tokens, Some(500));
        assert!(request.json_output);
    }

    #[test]
    fn test_usage_total() {
        let usage = UsageMetadata::new(10, 25);
        assert_eq!(usage.total_tokens, 35);
    }

    #[test]
    fn test_response_text_is_trimmed() {
        let response = ChatResponse::new("\n  Ferris  \n", "llama3.2");
        assert_eq!(response.text(), "Ferris");
    }

    #[test]
    fn test_role_serde() {
        let json = serde_json::to_string(&Message::assistant("ok")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"ok"}"#);
    }
}
