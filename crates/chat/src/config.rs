use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized},
};
use mentor_llm::{ProviderConfig, ProviderKind};
use serde::{Deserialize, Deserializer, Serialize};
use snafu::{Snafu, ensure};

pub const SETTINGS_DIRECTORY_NAME: &str = "mentor";
pub const SETTINGS_FILE_NAME: &str = "settings.json";
/// Environment variable holding the provider credential.
pub const API_KEY_ENV: &str = "API_KEY";
/// Accepted alias for [`API_KEY_ENV`]; `API_KEY` wins when both are set.
pub const API_KEY_ALIAS_ENV: &str = "GEMINI_API_KEY";
pub const ENV_PREFIX: &str = "MENTOR_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentorConfig {
    #[serde(default = "default_provider", deserialize_with = "scalar_string")]
    pub provider: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub api_key: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub endpoint: String,
    /// Blank means the provider's default model.
    #[serde(default, deserialize_with = "scalar_string")]
    pub model: String,
}

impl Default for MentorConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_key: String::new(),
            endpoint: String::new(),
            model: String::new(),
        }
    }
}

impl MentorConfig {
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|path| path.join(SETTINGS_DIRECTORY_NAME))
            .unwrap_or_else(|| PathBuf::from(".mentor"))
    }

    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join(SETTINGS_FILE_NAME)
    }

    pub fn load() -> Self {
        Self::load_from(&Self::default_config_path())
    }

    /// Layers defaults, the optional JSON file at `path`, then the environment.
    ///
    /// An unreadable or malformed settings file never aborts startup. It is skipped and
    /// the environment still applies, so a credential exported in the shell survives a
    /// broken file.
    pub fn load_from(path: &Path) -> Self {
        match Self::figment(Some(path)).extract::<MentorConfig>() {
            Ok(config) => return config.normalized(),
            Err(error) => {
                tracing::warn!(
                    "failed to parse settings from {:?}: {}. ignoring settings file",
                    path,
                    error
                );
            }
        }

        match Self::figment(None).extract::<MentorConfig>() {
            Ok(config) => config.normalized(),
            Err(error) => {
                tracing::warn!("failed to read settings from environment: {}. using defaults", error);
                Self::default()
            }
        }
    }

    fn figment(settings_file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(MentorConfig::default()));
        if let Some(path) = settings_file {
            if path.exists() {
                figment = figment.merge(Json::file(path));
            } else {
                tracing::debug!("settings file not found at {:?}, skipping", path);
            }
        }

        figment
            .merge(Env::prefixed(ENV_PREFIX).only(&["provider", "model", "endpoint"]))
            .merge(
                Env::raw()
                    .only(&[API_KEY_ALIAS_ENV])
                    .map(|_| "api_key".into()),
            )
            .merge(Env::raw().only(&[API_KEY_ENV]))
    }

    pub fn normalized(mut self) -> Self {
        self.provider = if self.provider.trim().is_empty() {
            default_provider()
        } else {
            self.provider.trim().to_string()
        };
        self.api_key = self.api_key.trim().to_string();
        self.endpoint = self.endpoint.trim().to_string();
        self.model = self.model.trim().to_string();
        self
    }

    pub fn has_credential(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Model to open the session with; blank configuration falls back to the provider's.
    pub fn model_id<'a>(&'a self, provider_default: &'a str) -> &'a str {
        let model = self.model.trim();
        if model.is_empty() {
            provider_default
        } else {
            model
        }
    }

    pub fn provider_config(&self) -> Result<ProviderConfig, ConfigError> {
        ensure!(
            self.has_credential(),
            MissingCredentialSnafu {
                stage: "provider-config",
                variable: API_KEY_ENV,
            }
        );

        Ok(ProviderConfig::new(
            &self.provider,
            &self.api_key,
            &self.endpoint,
        ))
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ConfigError {
    #[snafu(display("{variable} is not set in environment variables"))]
    MissingCredential {
        stage: &'static str,
        variable: &'static str,
    },
}

/// Environment values such as `API_KEY=1234567890` or `MENTOR_MODEL=2.5` reach serde as
/// numbers; every field here is text.
fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Unsigned(u64),
        Signed(i64),
        Float(f64),
        Bool(bool),
    }

    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Text(text) => text,
        Scalar::Unsigned(value) => value.to_string(),
        Scalar::Signed(value) => value.to_string(),
        Scalar::Float(value) => value.to_string(),
        Scalar::Bool(value) => value.to_string(),
    })
}

fn default_provider() -> String {
    ProviderKind::Gemini.id().to_string()
}

#[cfg(test)]
mod tests {
    use figment::Jail;
    use mentor_llm::{DEFAULT_GEMINI_MODEL, DEFAULT_OPENAI_MODEL};

    use super::*;

    #[test]
    fn defaults_target_gemini_flash_without_credential() {
        Jail::expect_with(|jail| {
            jail.clear_env();

            let config = MentorConfig::load_from(Path::new("missing.json"));

            assert_eq!(config.provider, "gemini");
            assert_eq!(config.model_id(DEFAULT_GEMINI_MODEL), "gemini-2.5-flash");
            assert!(!config.has_credential());
            assert!(matches!(
                config.provider_config(),
                Err(ConfigError::MissingCredential { .. })
            ));
            Ok(())
        });
    }

    #[test]
    fn environment_credential_overrides_file() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(
                SETTINGS_FILE_NAME,
                r#"{ "api_key": "from-file", "model": "gemini-2.5-pro" }"#,
            )?;
            jail.set_env(API_KEY_ENV, " from-env ");

            let config = MentorConfig::load_from(Path::new(SETTINGS_FILE_NAME));

            assert_eq!(config.api_key, "from-env");
            assert_eq!(config.model, "gemini-2.5-pro");
            let provider = config.provider_config().expect("credential present");
            assert_eq!(provider.api_key, "from-env");
            assert_eq!(provider.provider_id, "gemini");
            Ok(())
        });
    }

    #[test]
    fn alias_and_prefixed_overrides_apply() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env(API_KEY_ALIAS_ENV, "alias-key");
            jail.set_env("MENTOR_PROVIDER", "openai");
            jail.set_env("MENTOR_MODEL", "gpt-4o-mini");

            let config = MentorConfig::load_from(Path::new("missing.json"));

            assert_eq!(config.provider, "openai");
            assert_eq!(config.model, "gpt-4o-mini");
            assert_eq!(config.api_key, "alias-key");
            Ok(())
        });
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(SETTINGS_FILE_NAME, "{ not json")?;

            let config = MentorConfig::load_from(Path::new(SETTINGS_FILE_NAME));

            assert_eq!(config, MentorConfig::default());
            Ok(())
        });
    }

    #[test]
    fn malformed_file_keeps_environment_credential() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(SETTINGS_FILE_NAME, "{ not json")?;
            jail.set_env(API_KEY_ENV, "AIzaRealKey");

            let config = MentorConfig::load_from(Path::new(SETTINGS_FILE_NAME));

            assert_eq!(config.api_key, "AIzaRealKey");
            assert_eq!(config.provider, "gemini");
            assert!(config.provider_config().is_ok());
            Ok(())
        });
    }

    #[test]
    fn numeric_looking_environment_values_stay_text() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env(API_KEY_ENV, "1234567890");
            jail.set_env("MENTOR_MODEL", "2.5");

            let config = MentorConfig::load_from(Path::new("missing.json"));

            assert_eq!(config.api_key, "1234567890");
            assert_eq!(config.model, "2.5");
            Ok(())
        });
    }

    #[test]
    fn blank_model_falls_back_to_provider_default() {
        let config = MentorConfig {
            model: "  ".into(),
            ..MentorConfig::default()
        };

        assert_eq!(config.model_id(DEFAULT_OPENAI_MODEL), "gpt-4o-mini");
    }

    #[test]
    fn provider_switch_without_model_uses_that_providers_default() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env(API_KEY_ENV, "key");
            jail.set_env("MENTOR_PROVIDER", "openai");

            let config = MentorConfig::load_from(Path::new("missing.json"));

            assert!(config.model.is_empty());
            assert_eq!(config.model_id(DEFAULT_OPENAI_MODEL), DEFAULT_OPENAI_MODEL);
            Ok(())
        });
    }
}
