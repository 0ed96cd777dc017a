//! Ragline Ingest — best-effort PDF loading and token-bounded chunking.

pub mod loader;
pub mod splitter;

pub use loader::{load_documents, load_documents_or_empty, Document};
pub use splitter::{approx_token_len, chunk_size_for, Chunk, TextSplitter};
