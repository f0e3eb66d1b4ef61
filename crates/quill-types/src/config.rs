//! Global configuration for Quill.
//!
//! Deserialized from `config.toml` in the config directory. Every field
//! has a default so a partial (or absent) file still yields a usable
//! configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Global configuration, loaded once at startup and passed down
/// explicitly (no ambient global).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Truncation window: maximum messages retained per conversation,
    /// system message included. Values below 1 are clamped to 1.
    #[serde(default = "default_chat_cache_length")]
    pub chat_cache_length: usize,

    /// Directory for persisted conversation records. Defaults to
    /// `{data_dir}/chat_cache` when unset.
    #[serde(default)]
    pub chat_cache_path: Option<PathBuf>,

    /// Color used by the plain-text printer and chat display.
    #[serde(default = "default_color")]
    pub default_color: String,

    /// Syntect theme for fenced code blocks.
    #[serde(default = "default_code_theme")]
    pub code_theme: String,

    /// Model identifier sent to the completion provider.
    #[serde(default = "default_model")]
    pub model: String,

    /// Override the provider base URL (OpenAI-compatible endpoints).
    #[serde(default)]
    pub api_base_url: Option<String>,
}

fn default_chat_cache_length() -> usize {
    100
}

fn default_color() -> String {
    "cyan".to_string()
}

fn default_code_theme() -> String {
    "base16-ocean.dark".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            chat_cache_length: default_chat_cache_length(),
            chat_cache_path: None,
            default_color: default_color(),
            code_theme: default_code_theme(),
            model: default_model(),
            api_base_url: None,
        }
    }
}

impl GlobalConfig {
    /// Resolve the chat cache directory, falling back to
    /// `{data_dir}/chat_cache` when no explicit path is configured.
    pub fn chat_cache_path(&self, data_dir: &Path) -> PathBuf {
        self.chat_cache_path
            .clone()
            .unwrap_or_else(|| data_dir.join("chat_cache"))
    }

    /// Truncation window with the ≥1 floor enforced.
    pub fn window(&self) -> usize {
        self.chat_cache_length.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GlobalConfig::default();
        assert_eq!(config.chat_cache_length, 100);
        assert_eq!(config.default_color, "cyan");
        assert_eq!(config.code_theme, "base16-ocean.dark");
        assert_eq!(config.model, "gpt-4o");
        assert!(config.chat_cache_path.is_none());
        assert!(config.api_base_url.is_none());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: GlobalConfig = toml::from_str("chat_cache_length = 5").unwrap();
        assert_eq!(config.chat_cache_length, 5);
        assert_eq!(config.model, "gpt-4o");
    }

    #[test]
    fn test_window_floor() {
        let config: GlobalConfig = toml::from_str("chat_cache_length = 0").unwrap();
        assert_eq!(config.window(), 1);
    }

    #[test]
    fn test_cache_path_fallback() {
        let config = GlobalConfig::default();
        let path = config.chat_cache_path(Path::new("/data/quill"));
        assert_eq!(path, PathBuf::from("/data/quill/chat_cache"));

        let config = GlobalConfig {
            chat_cache_path: Some(PathBuf::from("/tmp/cache")),
            ..GlobalConfig::default()
        };
        assert_eq!(
            config.chat_cache_path(Path::new("/data/quill")),
            PathBuf::from("/tmp/cache")
        );
    }
}
