//! Configuration snapshot.
//!
//! All environment reads happen once in [`RagConfig::from_env`]; every other
//! component takes the snapshot by reference, so model/provider resolution is
//! pure given the snapshot and testable without touching process state.

use serde::Serialize;
use std::path::PathBuf;

/// Default directory scanned for PDF source documents.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Immutable snapshot of all environment-sourced configuration.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RagConfig {
    /// API key for the primary (OpenAI) provider (`OPENAI_API_KEY`).
    #[serde(skip_serializing)]
    pub openai_api_key: Option<String>,
    /// API key for the secondary (Together) provider (`TOGETHER_API_KEY`).
    #[serde(skip_serializing)]
    pub together_api_key: Option<String>,
    /// Chat model override for the primary provider (`OPENAI_MODEL`).
    pub openai_model: Option<String>,
    /// Chat model override for the secondary provider (`TOGETHER_MODEL`).
    pub together_model: Option<String>,
    /// Embedding model override for the secondary provider
    /// (`TOGETHER_EMBEDDING_MODEL`).
    pub together_embedding_model: Option<String>,
    /// Directory scanned recursively for PDF documents (`RAG_DATA_DIR`).
    pub data_dir: PathBuf,
}

impl RagConfig {
    /// Capture configuration from the process environment.
    pub fn from_env() -> Self {
        Self {
            openai_api_key: non_empty_var("OPENAI_API_KEY"),
            together_api_key: non_empty_var("TOGETHER_API_KEY"),
            openai_model: non_empty_var("OPENAI_MODEL"),
            together_model: non_empty_var("TOGETHER_MODEL"),
            together_embedding_model: non_empty_var("TOGETHER_EMBEDDING_MODEL"),
            data_dir: non_empty_var("RAG_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
        }
    }

    /// Snapshot with a fixed data directory, everything else unset.
    /// Used by tests and embedders that wire keys explicitly.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
