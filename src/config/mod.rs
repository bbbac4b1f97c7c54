//! Configuration management for the call agent
//!
//! Values are layered env > TOML file > default. The environment is read
//! once here and nowhere else; the resulting [`Config`] is passed explicitly
//! to the resolver and server.

pub mod file;

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::SecretString;

use crate::classifier::CategoryRuleConfig;
use crate::completion::DEFAULT_SYSTEM_PROMPT;
use file::ConfigFile;

/// Call agent configuration
#[derive(Debug)]
pub struct Config {
    /// Remote completion settings
    pub completion: CompletionConfig,

    /// HTTP API server settings
    pub api_server: ApiServerConfig,

    /// Local classifier settings
    pub classifier: ClassifierConfig,
}

/// Remote completion configuration
pub struct CompletionConfig {
    /// Credential for the completion service; `None` disables the remote path
    pub api_key: Option<SecretString>,

    /// Base URL of an OpenAI-compatible API
    pub base_url: String,

    /// Model identifier
    pub model: String,

    /// Reply length budget in tokens
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f64,

    /// Bound on a single remote call
    pub timeout: Duration,

    /// System instruction sent ahead of the conversation
    pub system_prompt: String,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 150,
            temperature: 0.7,
            timeout: Duration::from_secs(10),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl fmt::Debug for CompletionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// HTTP API server configuration
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    /// Host to bind
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Path to static files directory (web UI)
    pub static_dir: Option<PathBuf>,

    /// Global request limit per minute, `None` to disable
    pub rate_limit_per_minute: Option<u32>,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            static_dir: None,
            rate_limit_per_minute: None,
        }
    }
}

/// Local classifier configuration
#[derive(Debug, Clone, Default)]
pub struct ClassifierConfig {
    /// Operator rules evaluated before the built-in categories
    pub rules: Vec<CategoryRuleConfig>,

    /// Override for the no-match reply
    pub default_reply: Option<String>,
}

impl Config {
    /// Load configuration from the process environment and config file
    ///
    /// `path` overrides the standard config file location.
    #[must_use]
    pub fn load(path: Option<&Path>) -> Self {
        let fc = file::load_config_file(path);
        Self::from_sources(fc, |key| std::env::var(key).ok())
    }

    /// Build configuration from a parsed file and an environment lookup
    pub fn from_sources(fc: ConfigFile, env: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = CompletionConfig::default();
        let completion_file = fc.completion;

        // Empty keys are treated as unset in every layer
        let non_empty = |k: String| {
            let k = k.trim().to_string();
            (!k.is_empty()).then_some(k)
        };
        let api_key = env("OPENAI_API_KEY")
            .and_then(non_empty)
            .or_else(|| completion_file.api_key.and_then(non_empty))
            .map(SecretString::from);

        let completion = CompletionConfig {
            api_key,
            base_url: env("CALL_AGENT_COMPLETION_URL")
                .or(completion_file.base_url)
                .unwrap_or(defaults.base_url),
            model: env("CALL_AGENT_MODEL")
                .or(completion_file.model)
                .unwrap_or(defaults.model),
            max_tokens: env("CALL_AGENT_MAX_TOKENS")
                .and_then(|s| s.parse().ok())
                .or(completion_file.max_tokens)
                .unwrap_or(defaults.max_tokens),
            temperature: env("CALL_AGENT_TEMPERATURE")
                .and_then(|s| s.parse().ok())
                .or(completion_file.temperature)
                .unwrap_or(defaults.temperature),
            // A zero bound would time out every remote call
            timeout: env("CALL_AGENT_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .filter(|secs: &u64| *secs > 0)
                .or(completion_file.timeout_secs.filter(|secs| *secs > 0))
                .map_or(defaults.timeout, Duration::from_secs),
            system_prompt: completion_file
                .system_prompt
                .filter(|p| !p.trim().is_empty())
                .unwrap_or(defaults.system_prompt),
        };

        let server_defaults = ApiServerConfig::default();
        let api_server = ApiServerConfig {
            host: env("CALL_AGENT_HOST")
                .or(fc.server.host)
                .unwrap_or(server_defaults.host),
            port: env("CALL_AGENT_PORT")
                .or_else(|| env("PORT"))
                .and_then(|s| s.parse().ok())
                .or(fc.server.port)
                .unwrap_or(server_defaults.port),
            static_dir: env("CALL_AGENT_STATIC_DIR")
                .or(fc.server.static_dir)
                .map(PathBuf::from),
            rate_limit_per_minute: env("CALL_AGENT_RATE_LIMIT")
                .and_then(|s| s.parse().ok())
                .or(fc.server.rate_limit_per_minute)
                .filter(|rpm| *rpm > 0),
        };

        let classifier = ClassifierConfig {
            rules: fc.classifier.rules,
            default_reply: fc.classifier.default_reply,
        };

        Self {
            completion,
            api_server,
            classifier,
        }
    }

    /// Whether the remote completion path will be attempted
    #[must_use]
    pub const fn remote_enabled(&self) -> bool {
        self.completion.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_sources(ConfigFile::default(), env_from(&[]));

        assert!(!config.remote_enabled());
        assert_eq!(config.completion.model, "gpt-3.5-turbo");
        assert_eq!(config.completion.max_tokens, 150);
        assert!((config.completion.temperature - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.completion.timeout, Duration::from_secs(10));
        assert_eq!(config.api_server.port, 3000);
        assert!(config.api_server.rate_limit_per_minute.is_none());
    }

    #[test]
    fn test_env_overrides_file() {
        let fc: ConfigFile = toml::from_str(
            r#"
            [completion]
            api_key = "sk-file"
            model = "file-model"

            [server]
            port = 8080
            "#,
        )
        .unwrap();

        let config = Config::from_sources(
            fc,
            env_from(&[("OPENAI_API_KEY", "sk-env"), ("CALL_AGENT_PORT", "9000")]),
        );

        assert_eq!(
            config.completion.api_key.as_ref().map(|k| k.expose_secret()),
            Some("sk-env")
        );
        assert_eq!(config.completion.model, "file-model");
        assert_eq!(config.api_server.port, 9000);
    }

    #[test]
    fn test_port_env_fallback() {
        let config = Config::from_sources(ConfigFile::default(), env_from(&[("PORT", "5050")]));
        assert_eq!(config.api_server.port, 5050);
    }

    #[test]
    fn test_empty_key_is_absent() {
        let config =
            Config::from_sources(ConfigFile::default(), env_from(&[("OPENAI_API_KEY", "  ")]));
        assert!(!config.remote_enabled());
    }

    #[test]
    fn test_empty_env_key_does_not_hide_file_key() {
        let fc: ConfigFile = toml::from_str("[completion]\napi_key = \"sk-file\"").unwrap();
        let config = Config::from_sources(fc, env_from(&[("OPENAI_API_KEY", "")]));

        assert!(config.remote_enabled());
        assert_eq!(
            config.completion.api_key.as_ref().unwrap().expose_secret(),
            "sk-file"
        );
    }

    #[test]
    fn test_zero_timeout_ignored() {
        let fc: ConfigFile = toml::from_str("[completion]\ntimeout_secs = 4").unwrap();
        let config = Config::from_sources(fc, env_from(&[("CALL_AGENT_TIMEOUT_SECS", "0")]));
        assert_eq!(config.completion.timeout, Duration::from_secs(4));

        let fc: ConfigFile = toml::from_str("[completion]\ntimeout_secs = 0").unwrap();
        let config = Config::from_sources(fc, env_from(&[]));
        assert_eq!(config.completion.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_unparseable_env_values_fall_through() {
        let config = Config::from_sources(
            ConfigFile::default(),
            env_from(&[("CALL_AGENT_MAX_TOKENS", "lots"), ("CALL_AGENT_TIMEOUT_SECS", "3")]),
        );

        assert_eq!(config.completion.max_tokens, 150);
        assert_eq!(config.completion.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_zero_rate_limit_disables() {
        let config = Config::from_sources(
            ConfigFile::default(),
            env_from(&[("CALL_AGENT_RATE_LIMIT", "0")]),
        );
        assert!(config.api_server.rate_limit_per_minute.is_none());
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = Config::from_sources(
            ConfigFile::default(),
            env_from(&[("OPENAI_API_KEY", "sk-very-secret")]),
        );

        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("REDACTED"));
    }
}
