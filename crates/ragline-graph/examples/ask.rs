//! Answer a single query over the configured document directory.
//!
//! Usage: `cargo run --example ask -- "What do the documents cover?"`
//! Configuration comes from the environment (OPENAI_API_KEY or
//! TOGETHER_API_KEY, RAG_DATA_DIR, model overrides).

use ragline_core::RagConfig;
use ragline_graph::RagTool;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let query = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "What do the documents cover?".to_string());

    let tool = RagTool::new(RagConfig::from_env());
    let answer = tool.answer(&query).await?;
    println!("{answer}");
    Ok(())
}
