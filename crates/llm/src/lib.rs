//! Text-generation client crate for grounded.
//!
//! Provides a provider-agnostic abstraction over text-generation backends:
//! a prompt goes in, the full generated text comes out (no streaming).
//!
//! # Providers
//! - **Ollama**: Local LLM runtime (default)
//!
//! # Example
//! ```no_run
//! use grounded_llm::{LlmClient, providers::OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new();
//! let text = client.generate("What is the capital of France?", "llama3.1:8b").await?;
//! println!("{}", text);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod reply;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse};
pub use factory::create_client;
pub use providers::OllamaClient;
pub use reply::{GenerateReply, ReplyKind, NO_RESPONSE_FALLBACK};
