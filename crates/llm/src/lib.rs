use std::sync::Arc;

mod model;
mod provider;
mod rig_adapter;

pub use model::{DEFAULT_GEMINI_MODEL, DEFAULT_OPENAI_MODEL, ProviderKind};
pub use provider::{
    BoxFuture, ChatSession, LlmProvider, ProviderConfig, ProviderError, ProviderResult,
    SessionConfig, Turn, TurnRole,
};
pub use rig_adapter::{RigChatSession, RigProviderAdapter};

pub fn create_provider(mut config: ProviderConfig) -> ProviderResult<Arc<dyn LlmProvider>> {
    if config.provider_id.trim().is_empty() {
        config.provider_id = ProviderKind::Gemini.id().to_string();
    }

    let Some(kind) = ProviderKind::parse(&config.provider_id) else {
        return Err(ProviderError::UnsupportedProvider {
            stage: "create-provider",
            provider_id: config.provider_id,
        });
    };

    config.provider_id = kind.id().to_string();
    Ok(Arc::new(RigProviderAdapter::new(kind, config)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_provider_id_defaults_to_gemini() {
        let provider = create_provider(ProviderConfig::new("", "key", ""))
            .expect("gemini provider should build without network access");

        assert_eq!(provider.id(), "gemini");
        assert_eq!(provider.default_model(), DEFAULT_GEMINI_MODEL);
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let error = create_provider(ProviderConfig::new("llamafarm", "key", ""))
            .err()
            .expect("unknown provider must fail");

        assert!(matches!(
            error,
            ProviderError::UnsupportedProvider { ref provider_id, .. } if provider_id == "llamafarm"
        ));
    }

    #[test]
    fn missing_api_key_is_rejected_before_any_request() {
        let error = create_provider(ProviderConfig::new("gemini", "   ", ""))
            .err()
            .expect("blank key must fail");

        assert!(matches!(error, ProviderError::MissingApiKey { .. }));
        assert_eq!(error.to_string(), "missing API key for provider 'gemini'");
    }
}
