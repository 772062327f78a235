//! Layered configuration: defaults, then an optional TOML file, then the
//! environment (a `.env` file is honored).

use crate::history::DEFAULT_MAX_TURNS;
use crate::llm::CompletionOptions;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_CONFIG_FILE: &str = "assistant.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Missing required setting: {key}")]
    Missing { key: &'static str },

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub openai: OpenAiSettings,
    pub conversation: ConversationSettings,
    pub storage: StorageSettings,
    pub admin: AdminSettings,
    pub logging: LoggingSettings,
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ConversationSettings {
    pub max_turns: usize,
    pub paragraph_delay_ms: u64,
    pub max_input_length: usize,
    pub system_prompt_path: Option<PathBuf>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct StorageSettings {
    pub path: PathBuf,
}

#[derive(Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AdminSettings {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct LoggingSettings {
    pub filter: String,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        let options = CompletionOptions::default();
        Self {
            api_key: String::new(),
            base_url: "https://api.openai.com/v1".to_string(),
            model: options.model,
            temperature: options.temperature,
            max_tokens: options.max_output_tokens,
            request_timeout_secs: None,
        }
    }
}

impl Default for ConversationSettings {
    fn default() -> Self {
        Self {
            max_turns: DEFAULT_MAX_TURNS,
            paragraph_delay_ms: 200,
            max_input_length: 4000,
            system_prompt_path: None,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("auth.json"),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "excel_assistant_lib=info".to_string(),
        }
    }
}

impl fmt::Debug for OpenAiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiSettings")
            .field("api_key", &redacted(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl fmt::Debug for AdminSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminSettings")
            .field("email", &self.email)
            .field("password", &redacted(&self.password))
            .finish()
    }
}

fn redacted(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

impl AppConfig {
    /// Defaults, then `path` (or `assistant.toml` when present), then the
    /// environment. The result is validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };

        dotenv::dotenv().ok();
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Environment overrides. `lookup` is `std::env::var` outside tests.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = non_empty("OPENAI_API_KEY") {
            self.openai.api_key = value;
        }
        if let Some(value) = non_empty("ASSISTANT_MODEL") {
            self.openai.model = value;
        }
        if let Some(value) = non_empty("ASSISTANT_API_BASE") {
            self.openai.base_url = value;
        }
        if let Some(value) = non_empty("ASSISTANT_DB_PATH") {
            self.storage.path = PathBuf::from(value);
        }
        if let Some(value) = non_empty("ASSISTANT_ADMIN_EMAIL") {
            self.admin.email = value;
        }
        if let Some(value) = non_empty("ASSISTANT_ADMIN_PASSWORD") {
            self.admin.password = value;
        }
        if let Some(value) = non_empty("ASSISTANT_LOG") {
            self.logging.filter = value;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.openai.base_url).map_err(|e| ConfigError::Invalid {
            key: "openai.base_url",
            reason: e.to_string(),
        })?;

        if !(0.0..=2.0).contains(&self.openai.temperature) {
            return Err(ConfigError::Invalid {
                key: "openai.temperature",
                reason: format!("{} is outside 0.0..=2.0", self.openai.temperature),
            });
        }

        if self.openai.max_tokens == 0 {
            return Err(ConfigError::Invalid {
                key: "openai.max_tokens",
                reason: "must be greater than zero".to_string(),
            });
        }

        // Zero would truncate away the question before it is sent.
        if self.conversation.max_turns == 0 {
            return Err(ConfigError::Invalid {
                key: "conversation.max_turns",
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.conversation.max_input_length == 0 {
            return Err(ConfigError::Invalid {
                key: "conversation.max_input_length",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    pub fn validate_for_chat(&self) -> Result<(), ConfigError> {
        if self.openai.api_key.trim().is_empty() {
            return Err(ConfigError::Missing {
                key: "openai.api_key",
            });
        }
        Ok(())
    }

    pub fn validate_for_admin(&self) -> Result<(), ConfigError> {
        if self.admin.email.trim().is_empty() {
            return Err(ConfigError::Missing { key: "admin.email" });
        }
        if self.admin.password.is_empty() {
            return Err(ConfigError::Missing {
                key: "admin.password",
            });
        }
        Ok(())
    }

    pub fn completion_options(&self) -> CompletionOptions {
        CompletionOptions {
            model: self.openai.model.clone(),
            temperature: self.openai.temperature,
            max_output_tokens: self.openai.max_tokens,
        }
    }

    pub fn paragraph_delay(&self) -> Duration {
        Duration::from_millis(self.conversation.paragraph_delay_ms)
    }
}
