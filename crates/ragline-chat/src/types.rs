//! Chat provider and message types.

use serde::{Deserialize, Serialize};

/// Hosted chat provider identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatProvider {
    OpenAI,
    Together,
}

impl ChatProvider {
    /// OpenAI-compatible chat completions endpoint for this provider.
    pub fn completions_url(&self) -> &'static str {
        match self {
            ChatProvider::OpenAI => "https://api.openai.com/v1/chat/completions",
            ChatProvider::Together => "https://api.together.xyz/v1/chat/completions",
        }
    }
}

impl std::fmt::Display for ChatProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatProvider::OpenAI => write!(f, "openai"),
            ChatProvider::Together => write!(f, "together"),
        }
    }
}

/// Chat message submitted to a completion endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn human(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}
