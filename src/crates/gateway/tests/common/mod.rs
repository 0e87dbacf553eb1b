//! Shared fixtures for gateway integration tests
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Duration as ChronoDuration;
use gateway::db::DatabaseConnection;
use gateway::orchestration::ProviderClient;
use gateway::services::{AuthService, JwtManager};
use llm::{ChatModel, ChatRequest, ChatResponse, LlmError};

pub const TEST_SECRET: &str = "integration-test-secret-32-chars-min";

pub async fn test_db() -> DatabaseConnection {
    DatabaseConnection::in_memory().await.unwrap()
}

pub fn jwt() -> JwtManager {
    JwtManager::new(TEST_SECRET, ChronoDuration::hours(1)).unwrap()
}

pub fn auth_service(db: &DatabaseConnection) -> AuthService {
    AuthService::new(db.clone(), jwt())
}

/// Answers every request with the same text, optionally after a delay
pub struct StaticModel {
    reply: String,
    delay: Duration,
    last_request: Mutex<Option<ChatRequest>>,
}

impl StaticModel {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            delay: Duration::ZERO,
            last_request: Mutex::new(None),
        }
    }

    pub fn slow(reply: impl Into<String>, delay: Duration) -> Self {
        Self {
            delay,
            ..Self::new(reply)
        }
    }

    /// Last prompt text this model received
    pub fn last_prompt(&self) -> Option<String> {
        self.last_request
            .lock()
            .unwrap()
            .as_ref()
            .and_then(|r| r.messages.last().map(|m| m.content.clone()))
    }
}

#[async_trait]
impl ChatModel for StaticModel {
    async fn chat(&self, request: ChatRequest) -> llm::Result<ChatResponse> {
        *self.last_request.lock().unwrap() = Some(request);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(ChatResponse::new(self.reply.clone(), "static"))
    }

    fn model_name(&self) -> &str {
        "static"
    }
}

/// Fails every request
pub struct FailingModel {
    message: String,
}

impl FailingModel {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl ChatModel for FailingModel {
    async fn chat(&self, _request: ChatRequest) -> llm::Result<ChatResponse> {
        Err(LlmError::ServiceUnavailable(self.message.clone()))
    }

    async fn is_available(&self) -> llm::Result<bool> {
        Ok(false)
    }

    fn model_name(&self) -> &str {
        "failing"
    }
}

pub fn provider(name: &str, model: impl ChatModel + 'static) -> ProviderClient {
    ProviderClient::new(name, Arc::new(model), Duration::from_secs(2))
}

pub fn provider_arc(name: &str, model: Arc<dyn ChatModel>) -> ProviderClient {
    ProviderClient::new(name, model, Duration::from_secs(2))
}

pub fn answering(name: &str, reply: &str) -> ProviderClient {
    provider(name, StaticModel::new(reply))
}

pub fn failing(name: &str) -> ProviderClient {
    provider(name, FailingModel::new(format!("{} is down", name)))
}
