//! Remote LLM provider implementations.
//!
//! # Providers
//!
//! - **OpenAI-compatible** - OpenAI, OpenRouter, Ollama's `/v1` layer and any
//!   other server speaking the `/chat/completions` protocol

pub mod openai;

pub use openai::OpenAiClient;
