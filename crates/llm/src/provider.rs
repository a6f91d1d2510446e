use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use snafu::Snafu;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub provider_id: String,
    pub api_key: String,
    pub endpoint: String,
}

impl ProviderConfig {
    pub fn new(
        provider_id: impl Into<String>,
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            provider_id: provider_id.into().trim().to_string(),
            api_key: api_key.into().trim().to_string(),
            endpoint: endpoint.into().trim().to_string(),
        }
    }
}

/// Parameters fixed for the whole lifetime of one chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub model_id: String,
    pub system_instruction: String,
}

impl SessionConfig {
    pub fn new(model_id: impl Into<String>, system_instruction: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            system_instruction: system_instruction.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnRole {
    User,
    Model,
}

/// One completed exchange half, as remembered by a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: TurnRole,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Model,
            content: content.into(),
        }
    }
}

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
pub type ProviderResult<T> = Result<T, ProviderError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ProviderError {
    #[snafu(display("missing API key for provider '{provider_id}'"))]
    MissingApiKey {
        stage: &'static str,
        provider_id: String,
    },
    #[snafu(display("provider '{provider_id}' is not supported"))]
    UnsupportedProvider {
        stage: &'static str,
        provider_id: String,
    },
    #[snafu(display("refusing to send an empty prompt on `{stage}`"))]
    EmptyPrompt { stage: &'static str },
    #[snafu(display("http client failed on `{stage}`, {source}"))]
    HttpClient {
        stage: &'static str,
        source: rig::http_client::Error,
    },
    #[snafu(display("completions failed on `{stage}`, {source}"))]
    CompletionsFailed {
        stage: &'static str,
        source: rig::completion::CompletionError,
    },
    #[snafu(display("model '{model_id}' returned no text on `{stage}`"))]
    EmptyReply {
        stage: &'static str,
        model_id: String,
    },
}

/// Stateful conversation held against a provider.
///
/// The session remembers every successful exchange and replays it with the system
/// instruction on each `send`, so callers only ever pass the newest user text.
pub trait ChatSession: Send + Sync + fmt::Debug {
    fn model_id(&self) -> &str;
    fn send<'a>(&'a self, text: String) -> BoxFuture<'a, ProviderResult<String>>;
}

pub trait LlmProvider: Send + Sync {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn default_model(&self) -> &str;
    fn create_session<'a>(
        &'a self,
        config: SessionConfig,
    ) -> BoxFuture<'a, ProviderResult<Arc<dyn ChatSession>>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_config_trims_every_field() {
        let config = ProviderConfig::new(" gemini ", "\tsecret\n", " https://example.test ");

        assert_eq!(config.provider_id, "gemini");
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.endpoint, "https://example.test");
    }
}
