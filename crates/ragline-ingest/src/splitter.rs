//! Token-bounded recursive text splitting.
//!
//! Splits along a separator cascade (paragraph → line → sentence → word →
//! character), measuring with a pluggable token-length function so chunk
//! bounds are token units, not bytes. Adjacent chunks never overlap.

use std::path::PathBuf;

use serde::Serialize;

use crate::loader::Document;

/// Chunk size when embedding with BAAI/bge-large-en-v1.5 (512-token model limit).
pub const CHUNK_SIZE_BGE: usize = 400;
/// Chunk size for all other embedding models.
pub const CHUNK_SIZE_DEFAULT: usize = 750;

/// A bounded-length slice of a document, sized in token units.
#[derive(Debug, Clone, Serialize)]
pub struct Chunk {
    pub text: String,
    pub source: PathBuf,
    pub chunk_index: usize,
}

/// Chunk size as a function of the configured embedding model.
pub fn chunk_size_for(embedding_model: &str) -> usize {
    if embedding_model == "BAAI/bge-large-en-v1.5" {
        CHUNK_SIZE_BGE
    } else {
        CHUNK_SIZE_DEFAULT
    }
}

/// Approximate token count: one token per four characters, rounded up.
pub fn approx_token_len(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

/// Recursive splitter with a token-measured chunk bound and zero overlap.
pub struct TextSplitter {
    chunk_size: usize,
    /// Always zero in this configuration; no sliding-window redundancy.
    pub chunk_overlap: usize,
    separators: Vec<&'static str>,
    length: Box<dyn Fn(&str) -> usize + Send + Sync>,
}

impl TextSplitter {
    /// Splitter with the default approximate token counter.
    pub fn new(chunk_size: usize) -> Self {
        Self::with_length_fn(chunk_size, approx_token_len)
    }

    /// Splitter measuring with a caller-provided token-length function.
    pub fn with_length_fn(
        chunk_size: usize,
        length: impl Fn(&str) -> usize + Send + Sync + 'static,
    ) -> Self {
        Self {
            chunk_size,
            chunk_overlap: 0,
            separators: vec!["\n\n", "\n", ". ", " ", ""],
            length: Box::new(length),
        }
    }

    fn measure(&self, text: &str) -> usize {
        (self.length)(text)
    }

    /// Split text into pieces of at most `chunk_size` token units.
    /// Chunk edges are trimmed; whitespace-only pieces are dropped.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &self.separators)
            .into_iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect()
    }

    /// Split every document independently, preserving document order and
    /// in-document order.
    pub fn split_documents(&self, documents: &[Document]) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        for doc in documents {
            for (chunk_index, text) in self.split_text(&doc.text).into_iter().enumerate() {
                chunks.push(Chunk {
                    text,
                    source: doc.source.clone(),
                    chunk_index,
                });
            }
        }
        chunks
    }

    fn split_recursive(&self, text: &str, separators: &[&'static str]) -> Vec<String> {
        if self.measure(text) <= self.chunk_size {
            return vec![text.to_string()];
        }

        let Some((&separator, remaining)) = separators.split_first() else {
            return self.split_chars(text);
        };
        if separator.is_empty() {
            return self.split_chars(text);
        }

        let mut chunks = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        for piece in text.split(separator) {
            if self.measure(piece) > self.chunk_size {
                // Flush, then descend to the next separator for this piece.
                if !current.is_empty() {
                    chunks.push(current.join(separator));
                    current.clear();
                }
                chunks.extend(self.split_recursive(piece, remaining));
                continue;
            }

            if current.is_empty() {
                current.push(piece);
                continue;
            }

            let candidate = format!("{}{}{}", current.join(separator), separator, piece);
            if self.measure(&candidate) > self.chunk_size {
                chunks.push(current.join(separator));
                current = vec![piece];
            } else {
                current.push(piece);
            }
        }

        if !current.is_empty() {
            chunks.push(current.join(separator));
        }
        chunks
    }

    /// Last resort: accumulate characters up to the token bound.
    fn split_chars(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();
        for ch in text.chars() {
            current.push(ch);
            if self.measure(&current) > self.chunk_size && current.chars().count() > 1 {
                current.pop();
                chunks.push(std::mem::take(&mut current));
                current.push(ch);
            }
        }
        if !current.is_empty() {
            chunks.push(current);
        }
        chunks
    }
}
