//! Chat model abstraction and provider clients for the arena gateway.
//!
//! The gateway talks to every backend through the [`ChatModel`] trait, so the
//! orchestration code never sees provider wire formats.
//!
//! # Local Providers
//!
//! - **Ollama** - native `/api/chat` endpoint of a local Ollama server
//!
//! # Remote Providers
//!
//! - **OpenAI-compatible** - any `/chat/completions` endpoint (OpenAI itself,
//!   OpenRouter, or Ollama's `/v1` compatibility layer)
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use llm::local::OllamaClient;
//! use llm::{ChatModel, ChatRequest, LocalLlmConfig, Message};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OllamaClient::new(LocalLlmConfig::new("http://localhost:11434", "llama3.2"))?;
//!
//!     let request = ChatRequest::new(vec![Message::user("What is Rust?")]).with_temperature(0.7);
//!     let response = client.chat(request).await?;
//!     println!("{}", response.text());
//!
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod config;
pub mod error;

#[cfg(feature = "local")]
pub mod local;

#[cfg(feature = "remote")]
pub mod remote;

pub use chat::{ChatModel, ChatRequest, ChatResponse, Message, Role, UsageMetadata};
pub use config::{LocalLlmConfig, RemoteLlmConfig};
pub use error::{LlmError, Result};
