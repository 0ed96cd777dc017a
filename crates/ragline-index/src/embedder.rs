//! Embedding backend seam.

use async_trait::async_trait;
use ndarray::Array1;

use ragline_core::Result;

/// Trait for embedding backends.
///
/// Remote providers batch internally; stubs in tests return deterministic
/// vectors.
#[async_trait]
pub trait EmbeddingBackend: Send + Sync {
    /// Embed a batch of texts, one vector per input, in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Array1<f32>>>;

    /// Embedding model identifier (drives chunk sizing).
    fn model(&self) -> &str;
}
