//! Ollama client implementation.
//!
//! Talks to the native `/api/chat` endpoint of an Ollama server.
//!
//! # Example
//!
//! ```rust,ignore
//! use llm::local::OllamaClient;
//! use llm::{ChatModel, ChatRequest, LocalLlmConfig, Message};
//!
//! let config = LocalLlmConfig::new("http://localhost:11434", "mistral:latest");
//! let client = OllamaClient::new(config)?;
//!
//! let request = ChatRequest::new(vec![Message::user("Hello!")]);
//! let response = client.chat(request).await?;
//! ```

use crate::chat::{ChatModel, ChatRequest, ChatResponse, Message, UsageMetadata};
use crate::config::LocalLlmConfig;
use crate::error::{LlmError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Ollama client for local inference.
#[derive(Clone)]
pub struct OllamaClient {
    config: LocalLlmConfig,
    client: Client,
}

impl OllamaClient {
    /// Create a new Ollama client with the given configuration.
    pub fn new(config: LocalLlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::ConfigError(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Check if the Ollama server answers on `/api/tags`.
    pub async fn check_health(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.config.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn convert_message(msg: &Message) -> OllamaMessage {
        OllamaMessage {
            role: msg.role.as_str().to_string(),
            content: msg.content.clone(),
        }
    }

    fn build_request(&self, request: &ChatRequest) -> OllamaRequest {
        let mut options = HashMap::new();
        if let Some(temp) = request.temperature {
            options.insert("temperature", serde_json::Value::from(temp));
        }
        if let Some(max_tokens) = request.max_tokens {
            options.insert("num_predict", serde_json::Value::from(max_tokens));
        }

        OllamaRequest {
            model: self.config.model.clone(),
            messages: request.messages.iter().map(Self::convert_message).collect(),
            stream: false,
            format: request.json_output.then(|| "json".to_string()),
            options: if options.is_empty() {
                None
            } else {
                Some(options)
            },
        }
    }

    fn convert_response(ollama_resp: OllamaResponse) -> ChatResponse {
        let usage = if ollama_resp.prompt_eval_count.is_some() || ollama_resp.eval_count.is_some() {
            Some(UsageMetadata::new(
                ollama_resp.prompt_eval_count.unwrap_or(0),
                ollama_resp.eval_count.unwrap_or(0),
            ))
        } else {
            None
        };

        let mut metadata = HashMap::new();
        if let Some(total_duration) = ollama_resp.total_duration {
            metadata.insert(
                "total_duration_ns".to_string(),
                serde_json::Value::Number(total_duration.into()),
            );
        }
        if let Some(reason) = ollama_resp.done_reason {
            metadata.insert("finish_reason".to_string(), serde_json::Value::String(reason));
        }

        ChatResponse {
            content: ollama_resp.message.content,
            model: ollama_resp.model,
            usage,
            metadata,
        }
    }
}

#[async_trait]
impl ChatModel for OllamaClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let url = format!("{}/api/chat", self.config.base_url);
        let req_body = self.build_request(&request);

        tracing::debug!(model = %self.config.model, messages = req_body.messages.len(), "Ollama chat request");

        let response = self
            .client
            .post(&url)
            .json(&req_body)
            .send()
            .await
            .map_err(|e| LlmError::from_transport("Ollama", e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(if status == StatusCode::NOT_FOUND {
                LlmError::ModelNotFound(format!("{}: {}", self.config.model, error_text))
            } else {
                LlmError::ProviderError(format!("Ollama API error {}: {}", status, error_text))
            });
        }

        let ollama_resp: OllamaResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        Ok(Self::convert_response(ollama_resp))
    }

    async fn is_available(&self) -> Result<bool> {
        self.check_health().await
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

// Ollama API types
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<HashMap<&'static str, serde_json::Value>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    model: String,
    message: OllamaMessage,
    #[serde(default)]
    done_reason: Option<String>,
    #[serde(default)]
    total_duration: Option<u64>,
    #[serde(default)]
    prompt_eval_count: Option<usize>,
    #[serde(default)]
    eval_count: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn client() -> OllamaClient {
        OllamaClient::new(
            LocalLlmConfig::new("http://localhost:11434", "gemma3:1b")
                .with_timeout(Duration::from_secs(5)),
        )
        .unwrap()
    }

    #[test]
    fn test_client_creation() {
        let client = client();
        assert_eq!(client.model_name(), "gemma3:1b");
    }

    #[test]
    fn test_build_request_options() {
        let request = ChatRequest::new(vec![Message::system("be brief"), Message::user("Hi")])
            .with_temperature(0.7)
            .with_max_tokens(256);

        let body = serde_json::to_value(client().build_request(&request)).unwrap();

        assert_eq!(body["model"], "gemma3:1b");
        assert_eq!(body["stream"], false);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "Hi");
        assert_eq!(body["options"]["num_predict"], 256);
        assert!((body["options"]["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert!(body.get("format").is_none());
    }

    #[test]
    fn test_build_request_json_mode() {
        let request = ChatRequest::new(vec![Message::user("rank")]).with_json_output();
        let body = serde_json::to_value(client().build_request(&request)).unwrap();

        assert_eq!(body["format"], "json");
        assert!(body.get("options").is_none());
    }

    #[test]
    fn test_convert_response() {
        let raw = r#"{
            "model": "gemma3:1b",
            "created_at": "2024-05-01T10:00:00Z",
            "message": {"role": "assistant", "content": "Ownership is..."},
            "done": true,
            "done_reason": "stop",
            "total_duration": 1500000000,
            "prompt_eval_count": 12,
            "eval_count": 30
        }"#;
        let parsed: OllamaResponse = serde_json::from_str(raw).unwrap();
        let response = OllamaClient::convert_response(parsed);

        assert_eq!(response.content, "Ownership is...");
        assert_eq!(response.model, "gemma3:1b");
        assert_eq!(response.usage, Some(UsageMetadata::new(12, 30)));
        assert_eq!(response.metadata["finish_reason"], "stop");
    }

    #[test]
    fn test_convert_response_without_counts() {
        let raw = r#"{"model": "llama3.2", "message": {"role": "assistant", "content": "ok"}}"#;
        let parsed: OllamaResponse = serde_json::from_str(raw).unwrap();
        let response = OllamaClient::convert_response(parsed);

        assert!(response.usage.is_none());
        assert!(response.metadata.is_empty());
    }

    #[tokio::test]
    #[ignore] // Requires a running Ollama server
    async fn test_ollama_integration() {
        let client = OllamaClient::new(LocalLlmConfig::new("http://localhost:11434", "llama3.2")).unwrap();
        if !client.is_available().await.unwrap() {
            return;
        }
        let response = client
            .chat(ChatRequest::new(vec![Message::user("Say hi")]))
            .await
            .unwrap();
        assert!(!response.text().is_empty());
    }
}
