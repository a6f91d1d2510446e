use std::sync::Arc;

use mentor_llm::{ChatSession, LlmProvider, SessionConfig, create_provider};

use crate::config::MentorConfig;
use crate::copy;
use crate::state::ChatEvent;

/// Opens the counselling session described by `config`.
///
/// Never fails: any problem (missing credential, unsupported provider, transport error) is
/// logged and reported as [`ChatEvent::SessionFailed`].
pub async fn bootstrap(config: MentorConfig) -> ChatEvent {
    let provider = match config.provider_config().map(create_provider) {
        Ok(Ok(provider)) => provider,
        Ok(Err(error)) => {
            tracing::error!(error = %error, "failed to initialize provider adapter");
            return ChatEvent::SessionFailed;
        }
        Err(error) => {
            tracing::error!(error = %error, "chat initialization failed");
            return ChatEvent::SessionFailed;
        }
    };

    start_session(provider.as_ref(), config.model_id(provider.default_model())).await
}

/// Creates one session with the fixed counsellor persona.
pub async fn start_session(provider: &dyn LlmProvider, model_id: &str) -> ChatEvent {
    let config = SessionConfig::new(model_id, copy::SYSTEM_INSTRUCTION);

    match provider.create_session(config).await {
        Ok(session) => {
            tracing::info!(
                provider_id = %provider.id(),
                provider = %provider.name(),
                model_id = %session.model_id(),
                "chat session ready"
            );
            ChatEvent::SessionReady(session)
        }
        Err(error) => {
            tracing::error!(
                provider_id = %provider.id(),
                model_id,
                error = %error,
                "chat initialization failed"
            );
            ChatEvent::SessionFailed
        }
    }
}

/// Performs one send and maps the outcome to the event that completes it.
pub async fn dispatch(session: Arc<dyn ChatSession>, text: String) -> ChatEvent {
    match session.send(text).await {
        Ok(reply) => ChatEvent::ReplyReceived(reply),
        Err(error) => {
            tracing::error!(
                model_id = %session.model_id(),
                error = %error,
                "error sending message"
            );
            ChatEvent::ReplyFailed
        }
    }
}
