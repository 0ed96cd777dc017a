//! Ragline Chat — provider resolution and chat completion clients.
//!
//! Chooses between the primary (OpenAI) and secondary (Together) hosted
//! providers from a configuration snapshot and a set of open-model name
//! markers, then issues non-streaming OpenAI-compatible completion calls.

pub mod client;
pub mod resolver;
pub mod types;

pub use client::{ChatBackend, ChatClient};
pub use resolver::{resolve_chat_model, resolve_model_name, select_provider, DEFAULT_CHAT_MODEL};
pub use types::{ChatMessage, ChatProvider};
