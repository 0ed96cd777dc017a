//! Ragline Core — shared error type and configuration snapshot.

pub mod config;
pub mod error;

pub use config::{RagConfig, DEFAULT_DATA_DIR};
pub use error::{Error, Result};
