//! Ragline Graph — two-stage retrieve/generate pipeline and tool facade.
//!
//! A query enters through [`RagTool::answer`], which lazily builds the
//! document index exactly once, then runs retrieve → generate and returns
//! the answer string.

pub mod pipeline;
pub mod tool;

pub use pipeline::{render_prompt, PipelineState, RagPipeline, REFUSAL};
pub use tool::RagTool;
