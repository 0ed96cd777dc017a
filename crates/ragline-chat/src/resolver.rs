//! Chat model and provider resolution.
//!
//! Model name precedence: explicit override > `TOGETHER_MODEL` >
//! `OPENAI_MODEL` > hardcoded default. Provider choice walks an ordered rule
//! table; the first matching rule wins. Both steps are pure functions of the
//! configuration snapshot.

use ragline_core::{Error, RagConfig, Result};
use tracing::debug;

use crate::client::ChatClient;
use crate::types::ChatProvider;

/// Fallback chat model when no override is configured.
pub const DEFAULT_CHAT_MODEL: &str = "germeeai_f92a/openai/gpt-oss-20b-d37a5870";

/// Case-insensitive substrings marking open-model families served by the
/// Together endpoint.
pub const OPEN_MODEL_MARKERS: &[&str] = &["meta-llama", "mistral", "qwen", "germeeai", "baai"];

/// A provider selection rule: the first rule whose predicate matches decides
/// the provider.
struct ProviderRule {
    name: &'static str,
    applies: fn(&RagConfig, &str) -> bool,
    provider: ChatProvider,
}

const PROVIDER_RULES: &[ProviderRule] = &[
    ProviderRule {
        name: "together-key-present",
        applies: |cfg, _| cfg.together_api_key.is_some(),
        provider: ChatProvider::Together,
    },
    ProviderRule {
        name: "open-model-marker",
        applies: |_, model| {
            let lower = model.to_lowercase();
            OPEN_MODEL_MARKERS.iter().any(|m| lower.contains(m))
        },
        provider: ChatProvider::Together,
    },
    ProviderRule {
        name: "default-openai",
        applies: |_, _| true,
        provider: ChatProvider::OpenAI,
    },
];

/// Resolve the chat model name: explicit override, else secondary-provider
/// env model, else primary-provider env model, else the hardcoded default.
pub fn resolve_model_name(config: &RagConfig, explicit: Option<&str>) -> String {
    explicit
        .map(str::to_string)
        .or_else(|| config.together_model.clone())
        .or_else(|| config.openai_model.clone())
        .unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string())
}

/// Select the provider for a resolved model name.
pub fn select_provider(config: &RagConfig, model_name: &str) -> ChatProvider {
    for rule in PROVIDER_RULES {
        if (rule.applies)(config, model_name) {
            debug!("Provider rule '{}' matched for model {}", rule.name, model_name);
            return rule.provider;
        }
    }
    // The last rule always matches.
    unreachable!("provider rule table has no catch-all")
}

/// Resolve a configured chat client from the snapshot.
///
/// Fails with a configuration error if the selected provider has no API key;
/// there is no silent fallback to the other provider.
pub fn resolve_chat_model(
    config: &RagConfig,
    explicit: Option<&str>,
    temperature: f64,
) -> Result<ChatClient> {
    let model = resolve_model_name(config, explicit);
    let provider = select_provider(config, &model);

    let api_key = match provider {
        ChatProvider::OpenAI => config.openai_api_key.clone(),
        ChatProvider::Together => config.together_api_key.clone(),
    }
    .ok_or_else(|| Error::Config(format!("no API key configured for provider {provider}")))?;

    Ok(ChatClient::new(provider, model, api_key, temperature))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RagConfig {
        RagConfig::with_data_dir("data")
    }

    #[test]
    fn marker_names_select_together_without_key() {
        let cfg = config();
        for name in [
            "meta-llama/Llama-3.3-70B-Instruct-Turbo",
            "MISTRAL-7b",
            "Qwen/Qwen2.5-72B",
            "germeeai_f92a/openai/gpt-oss-20b-d37a5870",
            "BAAI/bge-large-en-v1.5",
        ] {
            assert_eq!(select_provider(&cfg, name), ChatProvider::Together, "{name}");
        }
    }

    #[test]
    fn unmarked_names_without_together_key_select_openai() {
        let cfg = config();
        assert_eq!(select_provider(&cfg, "gpt-4o-mini"), ChatProvider::OpenAI);
        assert_eq!(select_provider(&cfg, "gpt-3.5-turbo"), ChatProvider::OpenAI);
    }

    #[test]
    fn together_key_wins_regardless_of_name() {
        let cfg = RagConfig {
            together_api_key: Some("tg-key".into()),
            ..config()
        };
        assert_eq!(select_provider(&cfg, "gpt-4o-mini"), ChatProvider::Together);
    }

    #[test]
    fn name_resolution_precedence() {
        let mut cfg = config();
        assert_eq!(resolve_model_name(&cfg, None), DEFAULT_CHAT_MODEL);

        cfg.openai_model = Some("gpt-4o".into());
        assert_eq!(resolve_model_name(&cfg, None), "gpt-4o");

        cfg.together_model = Some("meta-llama/Llama-3.3-70B".into());
        assert_eq!(resolve_model_name(&cfg, None), "meta-llama/Llama-3.3-70B");

        assert_eq!(resolve_model_name(&cfg, Some("explicit-model")), "explicit-model");
    }

    #[test]
    fn resolve_fails_loudly_without_credentials() {
        let cfg = config();
        let err = resolve_chat_model(&cfg, Some("gpt-4o-mini"), 0.0).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn resolve_builds_client_for_configured_provider() {
        let cfg = RagConfig {
            openai_api_key: Some("sk-test".into()),
            ..config()
        };
        let client = resolve_chat_model(&cfg, Some("gpt-4o-mini"), 0.0).unwrap();
        assert_eq!(client.provider(), ChatProvider::OpenAI);
        assert_eq!(client.model(), "gpt-4o-mini");
    }

    #[test]
    fn marker_name_requires_together_key() {
        // Marker selects Together even without the key; construction then
        // fails loudly instead of silently degrading to OpenAI.
        let cfg = RagConfig {
            openai_api_key: Some("sk-test".into()),
            ..config()
        };
        let err = resolve_chat_model(&cfg, Some("mistral-small"), 0.0).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
