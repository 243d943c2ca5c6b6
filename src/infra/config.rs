// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::infra::errors::QuillError;
use crate::infra::paths;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "openai/gpt-4-turbo";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub chat: ChatConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model used when no `-m` flag is given, in `provider/model` format.
    pub default: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            default: DEFAULT_MODEL.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// OpenAI-compatible API root, without a trailing slash.
    pub base_url: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Per-request timeout. The upstream service publishes none, so a
    /// stuck stream would otherwise hang the session forever.
    pub timeout_seconds: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key_env: "OPENROUTER_API_KEY".into(),
            timeout_seconds: 120,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    pub system_prompt: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    /// Persist the session after every completed assistant turn.
    pub autosave: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            system_prompt: "You are Quill, an intelligent writing assistant. \
                            You are creative, accurate, and helpful in writing, \
                            coding, idea generation, and more."
                .into(),
            max_tokens: None,
            temperature: None,
            autosave: true,
        }
    }
}

impl Config {
    /// Load from the default location, falling back to defaults when no
    /// config.toml exists.
    pub fn load() -> Result<Self, QuillError> {
        let path = paths::config_file_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, QuillError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| QuillError::Config(format!("{}: {e}", path.display())))
    }

    /// Resolve the API key from the configured environment variable.
    pub fn resolve_api_key(&self) -> Result<String, QuillError> {
        std::env::var(&self.backend.api_key_env).map_err(|_| {
            QuillError::Config(format!(
                "no API key found; set {} in your environment",
                self.backend.api_key_env
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = Config::default();
        assert_eq!(c.model.default, DEFAULT_MODEL);
        assert_eq!(c.backend.base_url, DEFAULT_BASE_URL);
        assert_eq!(c.backend.timeout_seconds, 120);
        assert!(c.chat.autosave);
        assert!(c.chat.max_tokens.is_none());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let c: Config = toml::from_str(
            r#"
            [model]
            default = "anthropic/claude-3-opus"

            [chat]
            system_prompt = "Be terse."
            max_tokens = 500
            autosave = false
            "#,
        )
        .unwrap();
        assert_eq!(c.model.default, "anthropic/claude-3-opus");
        assert_eq!(c.chat.max_tokens, Some(500));
        assert!(!c.chat.autosave);
        // untouched section keeps its defaults
        assert_eq!(c.backend.api_key_env, "OPENROUTER_API_KEY");
    }

    #[test]
    fn test_empty_toml_is_default() {
        let c: Config = toml::from_str("").unwrap();
        assert_eq!(c.model.default, Config::default().model.default);
    }

    #[test]
    fn test_resolve_api_key_missing_env() {
        let mut c = Config::default();
        c.backend.api_key_env = "QUILL_TEST_KEY_THAT_IS_NOT_SET".into();
        assert!(matches!(c.resolve_api_key(), Err(QuillError::Config(_))));
    }
}
