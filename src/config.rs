//! Application config: `config/default.toml`, an optional extra file, then
//! `REWRITER__*` environment variables (double underscore for nesting, e.g.
//! `REWRITER__GEMINI__MODEL=gemini-1.5-flash`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::errors::RewriteError;
use crate::processor::RetryPolicy;

pub const ENV_PREFIX: &str = "REWRITER";
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseSection,
    #[serde(default)]
    pub gemini: GeminiSection,
    #[serde(default)]
    pub retry: RetrySection,
}

/// [database]
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSection {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("db.sqlite3")
}

/// [gemini]: endpoint, model and key. An empty key falls back to `GEMINI_API_KEY`.
#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSection {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeminiSection {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_model() -> String {
    "gemini-pro".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl GeminiSection {
    /// Configured key, else the `GEMINI_API_KEY` environment variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key_or(std::env::var(API_KEY_ENV).ok())
    }

    /// Configured key, else `fallback`. Blank keys count as unset.
    pub fn api_key_or(&self, fallback: Option<String>) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or(fallback)
            .filter(|k| !k.trim().is_empty())
    }

    pub fn require_api_key(&self) -> Result<String, RewriteError> {
        require_key(self.resolve_api_key())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn require_key(key: Option<String>) -> Result<String, RewriteError> {
    key.ok_or_else(|| {
        RewriteError::Config(format!(
            "no Gemini API key: set gemini.api_key, {ENV_PREFIX}__GEMINI__API_KEY or {API_KEY_ENV}"
        ))
    })
}

/// [retry]: rate-limit retries
#[derive(Debug, Clone, Deserialize)]
pub struct RetrySection {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
}

impl Default for RetrySection {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_delay_secs: default_retry_delay_secs(),
        }
    }
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_secs() -> u64 {
    10
}

impl RetrySection {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, Duration::from_secs(self.retry_delay_secs))
    }
}

/// Load `config/default.toml` (if present), then `config_path` (if given; it
/// must exist), then `REWRITER__*` environment overrides.
pub fn load_config(config_path: Option<&Path>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder()
        .add_source(config::File::with_name("config/default").required(false));

    if let Some(path) = config_path {
        builder = builder.add_source(config::File::from(path.to_path_buf()).required(true));
    }

    builder = builder.add_source(
        config::Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    );

    builder.build()?.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_toml(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .prefix("rewriter_config_")
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_without_sections() {
        let cfg: AppConfig = config::Config::builder()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(cfg.database.path, PathBuf::from("db.sqlite3"));
        assert_eq!(cfg.gemini.model, "gemini-pro");
        assert_eq!(cfg.gemini.timeout(), Duration::from_secs(60));
        assert_eq!(
            cfg.retry.policy(),
            RetryPolicy::new(3, Duration::from_secs(10))
        );
    }

    #[test]
    fn file_overrides_defaults() {
        let file = temp_toml(
            r#"
            [database]
            path = "other.sqlite3"

            [gemini]
            api_key = "from-file"
            model = "gemini-1.5-flash"

            [retry]
            max_retries = 5
            retry_delay_secs = 2
            "#,
        );

        let cfg = load_config(Some(file.path())).unwrap();

        assert_eq!(cfg.database.path, PathBuf::from("other.sqlite3"));
        assert_eq!(cfg.gemini.model, "gemini-1.5-flash");
        assert_eq!(cfg.gemini.resolve_api_key().as_deref(), Some("from-file"));
        assert_eq!(cfg.retry.policy(), RetryPolicy::new(5, Duration::from_secs(2)));
    }

    #[test]
    fn blank_key_is_not_a_key() {
        let section = GeminiSection {
            api_key: Some("   ".to_string()),
            ..Default::default()
        };

        assert!(section.api_key_or(None).is_none());
        assert!(section.api_key_or(Some(" \t".to_string())).is_none());
        assert!(matches!(
            require_key(section.api_key_or(None)),
            Err(RewriteError::Config(_))
        ));
    }

    #[test]
    fn env_key_fills_in_for_missing_config_key() {
        let unset = GeminiSection::default();
        assert_eq!(
            unset.api_key_or(Some("from-env".to_string())).as_deref(),
            Some("from-env")
        );

        let set = GeminiSection {
            api_key: Some("from-config".to_string()),
            ..Default::default()
        };
        assert_eq!(
            set.api_key_or(Some("from-env".to_string())).as_deref(),
            Some("from-config")
        );
        assert_eq!(require_key(set.api_key_or(None)).unwrap(), "from-config");
    }

    #[test]
    fn missing_extra_file_is_an_error() {
        let err = load_config(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(err.to_string().contains("here"), "{err}");
    }
}
