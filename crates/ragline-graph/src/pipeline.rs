//! Two-stage retrieve/generate pipeline.
//!
//! Strictly sequential: retrieve fills the context from the vector index,
//! generate submits the context-constrained prompt to the chat model. No
//! branching, no retries; provider errors propagate to the caller unchanged.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use ragline_chat::{ChatBackend, ChatMessage};
use ragline_core::{Error, Result};
use ragline_index::{EmbeddingBackend, ScoredChunk, VectorIndex, DEFAULT_TOP_K};

/// Refusal string the prompt instructs the model to emit when the answer is
/// not contained in the provided context.
pub const REFUSAL: &str = "I don't know";

/// Transient per-query state threaded through the two stages.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineState {
    pub question: String,
    pub context: Vec<ScoredChunk>,
    pub response: Option<String>,
}

impl PipelineState {
    fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            context: Vec::new(),
            response: None,
        }
    }
}

/// Render the generation prompt: context block, query, and the
/// answer-only-from-context instruction with the refusal contract.
pub fn render_prompt(question: &str, context: &[ScoredChunk]) -> String {
    let context_text = context
        .iter()
        .map(|c| c.chunk.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    format!(
        "\n#CONTEXT:\n{context_text}\n\nQUERY:\n{question}\n\n\
         Use the provide context to answer the provided user query. \
         Only use the provided context to answer the query. \
         If you do not know the answer, or it's not contained in the provided context \
         respond with \"{REFUSAL}\""
    )
}

/// Retrieve-then-generate pipeline over a built index.
pub struct RagPipeline {
    index: VectorIndex,
    embedder: Arc<dyn EmbeddingBackend>,
    chat: Arc<dyn ChatBackend>,
    top_k: usize,
}

impl RagPipeline {
    pub fn new(
        index: VectorIndex,
        embedder: Arc<dyn EmbeddingBackend>,
        chat: Arc<dyn ChatBackend>,
    ) -> Self {
        Self {
            index,
            embedder,
            chat,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    /// Run both stages for one query and return the final state.
    pub async fn run(&self, question: &str) -> Result<PipelineState> {
        let mut state = PipelineState::new(question);
        self.retrieve(&mut state).await?;
        self.generate(&mut state).await?;
        Ok(state)
    }

    /// Stage 1: fill the context with the top-k most similar chunks.
    ///
    /// An empty index skips the query-embedding round trip; the outcome is
    /// identical to searching it (empty context), so the stage sequence is
    /// unchanged.
    async fn retrieve(&self, state: &mut PipelineState) -> Result<()> {
        if self.index.is_empty() {
            debug!("Index is empty; retrieving empty context");
            return Ok(());
        }

        let vectors = self
            .embedder
            .embed_batch(std::slice::from_ref(&state.question))
            .await?;
        let query = vectors
            .into_iter()
            .next()
            .ok_or_else(|| Error::Inference("no query embedding returned".into()))?;

        state.context = self.index.search(&query, self.top_k);
        debug!("Retrieved {} chunks", state.context.len());
        Ok(())
    }

    /// Stage 2: generate a context-constrained answer.
    async fn generate(&self, state: &mut PipelineState) -> Result<()> {
        let prompt = render_prompt(&state.question, &state.context);
        let messages = [ChatMessage::human(prompt)];
        let response = self.chat.complete(&messages).await?;
        state.response = Some(response);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragline_ingest::Chunk;
    use std::path::PathBuf;

    fn scored(text: &str) -> ScoredChunk {
        ScoredChunk {
            chunk: Chunk {
                text: text.into(),
                source: PathBuf::from("doc.pdf"),
                chunk_index: 0,
            },
            score: 0.9,
        }
    }

    #[test]
    fn prompt_carries_refusal_contract_on_empty_context() {
        let prompt = render_prompt("What is 2+2?", &[]);
        assert!(prompt.contains("#CONTEXT:\n\n"));
        assert!(prompt.contains("QUERY:\nWhat is 2+2?"));
        assert!(prompt.contains("respond with \"I don't know\""));
    }

    #[test]
    fn prompt_embeds_context_chunks_in_order() {
        let context = vec![scored("first passage"), scored("second passage")];
        let prompt = render_prompt("q", &context);
        let first = prompt.find("first passage").unwrap();
        let second = prompt.find("second passage").unwrap();
        assert!(first < second);
        assert!(prompt.contains("first passage\n\nsecond passage"));
    }

    #[test]
    fn raw_state_serializes_for_the_fallback_path() {
        let state = PipelineState {
            question: "q".into(),
            context: vec![scored("ctx")],
            response: None,
        };
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"question\":\"q\""));
        assert!(json.contains("\"response\":null"));
    }
}
