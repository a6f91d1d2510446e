pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Backends the rig adapter knows how to open a chat session against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Gemini,
    OpenAi,
}

impl ProviderKind {
    /// Resolves a configured provider identifier, accepting the adapter-prefixed aliases.
    pub fn parse(provider_id: &str) -> Option<Self> {
        match provider_id.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" | "rig-gemini" => Some(Self::Gemini),
            "openai" | "rig-openai" => Some(Self::OpenAi),
            _ => None,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAi => "openai",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Gemini => "Rig Gemini",
            Self::OpenAi => "Rig OpenAI",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            Self::Gemini => DEFAULT_GEMINI_MODEL,
            Self::OpenAi => DEFAULT_OPENAI_MODEL,
        }
    }
}
