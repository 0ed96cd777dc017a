//! Tool facade: one callable taking a query string, returning an answer string.
//!
//! The full ingestion → chunk → embed → index build runs at most once per
//! tool, behind a single-flight cell; every call then runs the two-stage
//! pipeline. There is no invalidation or rebuild — index freshness is a
//! stated non-goal.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::info;

use ragline_chat::{resolve_chat_model, ChatBackend};
use ragline_core::{RagConfig, Result};
use ragline_index::{build_index, resolve_embedding_backend, EmbeddingBackend};
use ragline_ingest::{chunk_size_for, load_documents_or_empty, TextSplitter};

use crate::pipeline::RagPipeline;

/// Sampling temperature for the generation model.
const GENERATION_TEMPERATURE: f64 = 0.0;

/// String-in/string-out RAG facade, registerable as a tool in a hosting
/// agent graph.
pub struct RagTool {
    config: RagConfig,
    /// Injected backends (tests, alternative wiring); resolved from the
    /// config snapshot when absent.
    backends: Option<(Arc<dyn EmbeddingBackend>, Arc<dyn ChatBackend>)>,
    pipeline: OnceCell<RagPipeline>,
}

impl RagTool {
    /// Facade resolving real providers from the configuration snapshot.
    pub fn new(config: RagConfig) -> Self {
        Self {
            config,
            backends: None,
            pipeline: OnceCell::new(),
        }
    }

    /// Facade with injected embedding/chat backends.
    pub fn with_backends(
        config: RagConfig,
        embedder: Arc<dyn EmbeddingBackend>,
        chat: Arc<dyn ChatBackend>,
    ) -> Self {
        Self {
            config,
            backends: Some((embedder, chat)),
            pipeline: OnceCell::new(),
        }
    }

    /// Answer a natural-language query from the indexed documents.
    ///
    /// The first call builds the pipeline; concurrent first calls share one
    /// build. Returns the generated response, or the JSON-serialized raw
    /// pipeline state if generation produced no response string (documented
    /// leniency of the tool contract).
    pub async fn answer(&self, query: &str) -> Result<String> {
        let pipeline = self
            .pipeline
            .get_or_try_init(|| self.build_pipeline())
            .await?;

        let state = pipeline.run(query).await?;
        match state.response {
            Some(response) => Ok(response),
            None => Ok(serde_json::to_string(&state)?),
        }
    }

    async fn build_pipeline(&self) -> Result<RagPipeline> {
        let (embedder, chat) = match &self.backends {
            Some((embedder, chat)) => (embedder.clone(), chat.clone()),
            None => {
                let embedder: Arc<dyn EmbeddingBackend> =
                    Arc::new(resolve_embedding_backend(&self.config)?);
                let chat: Arc<dyn ChatBackend> = Arc::new(resolve_chat_model(
                    &self.config,
                    None,
                    GENERATION_TEMPERATURE,
                )?);
                (embedder, chat)
            }
        };

        // Best-effort ingestion: a missing directory degrades to an empty
        // index rather than failing the pipeline.
        let documents = load_documents_or_empty(&self.config.data_dir);
        let splitter = TextSplitter::new(chunk_size_for(embedder.model()));
        let chunks = splitter.split_documents(&documents);
        info!(
            "Building pipeline from {}: {} documents, {} chunks",
            self.config.data_dir.display(),
            documents.len(),
            chunks.len()
        );

        let index = build_index(chunks, embedder.as_ref()).await?;
        Ok(RagPipeline::new(index, embedder, chat))
    }
}
