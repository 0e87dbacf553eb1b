//! Local LLM provider implementations.
//!
//! Providers running on localhost or the local network. They need no API key.
//!
//! # Providers
//!
//! - **Ollama** - local model runner, native chat API

pub mod ollama;

pub use ollama::OllamaClient;
