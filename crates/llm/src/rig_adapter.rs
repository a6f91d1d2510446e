use std::fmt;
use std::sync::Arc;

use rig::OneOrMany;
use rig::completion::{AssistantContent, CompletionModel, Message as RigMessage};
use rig::prelude::CompletionClient;
use rig::providers::{gemini, openai};
use snafu::{ResultExt, ensure};
use tokio::sync::Mutex;

use super::model::ProviderKind;
use super::provider::{
    BoxFuture, ChatSession, CompletionsFailedSnafu, EmptyPromptSnafu, EmptyReplySnafu,
    HttpClientSnafu, LlmProvider, MissingApiKeySnafu, ProviderConfig, ProviderResult,
    SessionConfig, Turn, TurnRole,
};

pub struct RigProviderAdapter {
    kind: ProviderKind,
    config: ProviderConfig,
}

impl RigProviderAdapter {
    pub fn new(kind: ProviderKind, config: ProviderConfig) -> ProviderResult<Self> {
        ensure!(
            !config.api_key.is_empty(),
            MissingApiKeySnafu {
                stage: "rig-adapter-new",
                provider_id: config.provider_id.clone(),
            }
        );

        Ok(Self { kind, config })
    }

    fn build_gemini_client(config: &ProviderConfig) -> ProviderResult<gemini::Client> {
        let mut builder = gemini::Client::builder().api_key(config.api_key.as_str());
        if !config.endpoint.is_empty() {
            builder = builder.base_url(config.endpoint.as_str());
        }
        builder.build().context(HttpClientSnafu {
            stage: "build-gemini-client",
        })
    }

    fn build_openai_client(config: &ProviderConfig) -> ProviderResult<openai::Client> {
        let mut builder = openai::Client::builder().api_key(config.api_key.as_str());
        if !config.endpoint.is_empty() {
            builder = builder.base_url(config.endpoint.as_str());
        }
        builder.build().context(HttpClientSnafu {
            stage: "build-openai-client",
        })
    }

    fn open_session(&self, config: SessionConfig) -> ProviderResult<Arc<dyn ChatSession>> {
        let session: Arc<dyn ChatSession> = match self.kind {
            ProviderKind::Gemini => {
                let client = Self::build_gemini_client(&self.config)?;
                let model = client.completion_model(config.model_id.clone());
                Arc::new(RigChatSession::new(model, config))
            }
            ProviderKind::OpenAi => {
                let client = Self::build_openai_client(&self.config)?;
                let model = client.completion_model(config.model_id.clone());
                Arc::new(RigChatSession::new(model, config))
            }
        };

        tracing::info!(
            provider_id = %self.config.provider_id,
            model_id = %session.model_id(),
            "opened chat session"
        );
        Ok(session)
    }
}

impl LlmProvider for RigProviderAdapter {
    fn id(&self) -> &str {
        &self.config.provider_id
    }

    fn name(&self) -> &str {
        self.kind.display_name()
    }

    fn default_model(&self) -> &str {
        self.kind.default_model()
    }

    fn create_session<'a>(
        &'a self,
        config: SessionConfig,
    ) -> BoxFuture<'a, ProviderResult<Arc<dyn ChatSession>>> {
        Box::pin(async move { self.open_session(config) })
    }
}

/// Chat session over any rig completion model, keeping the transcript client-side.
pub struct RigChatSession<M> {
    model: M,
    config: SessionConfig,
    history: Mutex<Vec<Turn>>,
}

impl<M> RigChatSession<M>
where
    M: CompletionModel,
{
    pub fn new(model: M, config: SessionConfig) -> Self {
        Self {
            model,
            config,
            history: Mutex::new(Vec::new()),
        }
    }

    #[cfg(test)]
    async fn turns(&self) -> Vec<Turn> {
        self.history.lock().await.clone()
    }

    async fn exchange(&self, text: String) -> ProviderResult<String> {
        ensure!(
            !text.trim().is_empty(),
            EmptyPromptSnafu {
                stage: "session-send"
            }
        );

        // Held across the request so concurrent sends cannot interleave history.
        let mut history = self.history.lock().await;
        let prior_turns = history.iter().map(to_rig_message).collect::<Vec<_>>();

        tracing::debug!(
            model_id = %self.config.model_id,
            prior_turns = prior_turns.len(),
            "sending chat message"
        );

        let response = self
            .model
            .completion_request(RigMessage::user(text.clone()))
            .messages(prior_turns)
            .preamble(self.config.system_instruction.clone())
            .send()
            .await
            .context(CompletionsFailedSnafu {
                stage: "session-send",
            })?;

        let reply = reply_text(&response.choice);
        ensure!(
            !reply.trim().is_empty(),
            EmptyReplySnafu {
                stage: "session-reply",
                model_id: self.config.model_id.clone(),
            }
        );

        // A failed exchange leaves the remembered conversation untouched.
        history.push(Turn::user(text));
        history.push(Turn::model(reply.clone()));
        Ok(reply)
    }
}

impl<M> fmt::Debug for RigChatSession<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RigChatSession")
            .field("model_id", &self.config.model_id)
            .finish_non_exhaustive()
    }
}

impl<M> ChatSession for RigChatSession<M>
where
    M: CompletionModel + 'static,
{
    fn model_id(&self) -> &str {
        &self.config.model_id
    }

    fn send<'a>(&'a self, text: String) -> BoxFuture<'a, ProviderResult<String>> {
        Box::pin(self.exchange(text))
    }
}

fn to_rig_message(turn: &Turn) -> RigMessage {
    match turn.role {
        TurnRole::User => RigMessage::user(turn.content.clone()),
        TurnRole::Model => RigMessage::assistant(turn.content.clone()),
    }
}

/// Concatenates the text parts of a completion, skipping tool calls and reasoning.
fn reply_text(choice: &OneOrMany<AssistantContent>) -> String {
    choice
        .iter()
        .filter_map(|content| match content {
            AssistantContent::Text(text) => Some(text.text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderError;

    #[test]
    fn reply_text_joins_text_parts_only() {
        let choice = OneOrMany::many(vec![
            AssistantContent::text("안녕하세요"),
            AssistantContent::text(" 😊"),
        ])
        .expect("non-empty content");

        assert_eq!(reply_text(&choice), "안녕하세요 😊");
    }

    fn gemini_session() -> RigChatSession<impl CompletionModel + 'static> {
        let client =
            RigProviderAdapter::build_gemini_client(&ProviderConfig::new("gemini", "test-key", ""))
                .expect("client builds without network");
        RigChatSession::new(
            client.completion_model("gemini-2.5-flash"),
            SessionConfig::new("gemini-2.5-flash", "be kind"),
        )
    }

    #[tokio::test]
    async fn gemini_adapter_opens_session_for_requested_model() {
        let adapter = RigProviderAdapter::new(
            ProviderKind::Gemini,
            ProviderConfig::new("gemini", "test-key", ""),
        )
        .expect("adapter with key");

        let session = adapter
            .create_session(SessionConfig::new("gemini-2.5-flash", "be kind"))
            .await
            .expect("session builds without network");

        assert_eq!(session.model_id(), "gemini-2.5-flash");
    }

    #[tokio::test]
    async fn blank_prompt_fails_without_touching_history() {
        let session = gemini_session();
        assert!(session.turns().await.is_empty());

        let error = session.send("   ".to_string()).await.err();

        assert!(matches!(
            error,
            Some(ProviderError::EmptyPrompt { .. })
        ));
        assert!(session.turns().await.is_empty());
    }
}
