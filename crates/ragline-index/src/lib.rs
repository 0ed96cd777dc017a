//! Ragline Index — embedding backends and in-memory similarity search.

pub mod embedder;
pub mod remote;
pub mod vector;

pub use embedder::EmbeddingBackend;
pub use remote::{
    resolve_embedding_backend, RemoteEmbedder, DEFAULT_OPENAI_EMBEDDING_MODEL,
    DEFAULT_TOGETHER_EMBEDDING_MODEL,
};
pub use vector::{build_index, ScoredChunk, VectorIndex, DEFAULT_TOP_K};
