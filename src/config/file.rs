//! TOML configuration file loading
//!
//! Supports `~/.config/call-agent/config.toml` as a persistent config source.
//! All fields are optional; the file is a partial overlay on top of defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::classifier::CategoryRuleConfig;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    /// Remote completion settings
    #[serde(default)]
    pub completion: CompletionFileConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerFileConfig,

    /// Local classifier settings
    #[serde(default)]
    pub classifier: ClassifierFileConfig,
}

/// Remote completion configuration
#[derive(Debug, Default, Deserialize)]
pub struct CompletionFileConfig {
    /// API key for the completion service
    pub api_key: Option<String>,

    /// Base URL of an OpenAI-compatible API (e.g. "https://api.openai.com/v1")
    pub base_url: Option<String>,

    /// Model identifier
    pub model: Option<String>,

    /// Reply length budget in tokens
    pub max_tokens: Option<u32>,

    /// Sampling temperature
    pub temperature: Option<f64>,

    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,

    /// System instruction override
    pub system_prompt: Option<String>,
}

/// Server/runtime configuration
#[derive(Debug, Default, Deserialize)]
pub struct ServerFileConfig {
    /// Bind host
    pub host: Option<String>,

    /// API server port
    pub port: Option<u16>,

    /// Static files directory (web UI bundle)
    pub static_dir: Option<String>,

    /// Global request limit per minute
    pub rate_limit_per_minute: Option<u32>,
}

/// Local classifier configuration
#[derive(Debug, Default, Deserialize)]
pub struct ClassifierFileConfig {
    /// Extra category rules, evaluated before the built-in ones
    #[serde(default)]
    pub rules: Vec<CategoryRuleConfig>,

    /// Reply when no category matches
    pub default_reply: Option<String>,
}

/// Load the TOML config file from `path`, or the standard path when `None`
///
/// Returns `ConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file(path: Option<&Path>) -> ConfigFile {
    let Some(path) = path.map(Path::to_path_buf).or_else(config_file_path) else {
        return ConfigFile::default();
    };

    if !path.exists() {
        return ConfigFile::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                ConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            ConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/call-agent/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("call-agent").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_parse_full_file() {
        let config: ConfigFile = toml::from_str(
            r#"
            [completion]
            api_key = "sk-file"
            model = "gpt-4o-mini"
            max_tokens = 80
            temperature = 0.2

            [server]
            port = 8080
            rate_limit_per_minute = 60

            [classifier]
            default_reply = "Could you repeat that?"

            [[classifier.rules]]
            name = "refund"
            pattern = '\brefund\b'
            reply = "Refunds take five business days."
            "#,
        )
        .unwrap();

        assert_eq!(config.completion.api_key.as_deref(), Some("sk-file"));
        assert_eq!(config.completion.max_tokens, Some(80));
        assert_eq!(config.server.port, Some(8080));
        assert_eq!(config.server.rate_limit_per_minute, Some(60));
        assert_eq!(config.classifier.rules.len(), 1);
        assert_eq!(config.classifier.rules[0].name, "refund");
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_file(Some(&dir.path().join("absent.toml")));

        assert!(config.completion.api_key.is_none());
        assert!(config.classifier.rules.is_empty());
    }

    #[test]
    fn test_unparseable_file_yields_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = ").unwrap();

        let config = load_config_file(Some(file.path()));
        assert!(config.server.port.is_none());
    }

    #[test]
    fn test_load_from_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = 4100").unwrap();

        let config = load_config_file(Some(file.path()));
        assert_eq!(config.server.port, Some(4100));
    }
}
