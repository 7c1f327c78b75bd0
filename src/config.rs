//! Configuration file parser for ~/.config/newsdesk/config.toml.
//!
//! The config file is optional: a missing or empty file yields
//! `Config::default()`. Unknown keys are accepted but logged as warnings so
//! typos are visible with `RUST_LOG=warn`.
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::util::{validate_base_url, UrlError};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("Invalid {key}: {source}")]
    InvalidUrl {
        key: &'static str,
        #[source]
        source: UrlError,
    },

    #[error("Invalid {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

// ============================================================================
// Configuration Struct
// ============================================================================

/// Environment variable overriding `api_base_url`.
pub const ENV_API_URL: &str = "NEWSDESK_API_URL";
/// Environment variable overriding `site_base_url`.
pub const ENV_SITE_URL: &str = "NEWSDESK_SITE_URL";

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the content API (the `/news-app/...` paths hang off it).
    pub api_base_url: String,

    /// Origin used to absolutize site-relative image paths.
    pub site_base_url: String,

    /// Image path used when an article has none.
    pub default_image: String,

    /// Character budget for excerpts before the trailing "...".
    pub excerpt_chars: usize,

    /// Articles per page on category pages.
    pub page_size: usize,

    /// Number of headlines requested for the home page.
    pub headline_limit: usize,

    /// Articles requested per landing category on the home page.
    pub category_limit: usize,

    /// Related articles shown under an article.
    pub related_limit: usize,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Categories shown on the home page, in display order.
    pub landing_categories: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "https://news-app-three-lyart.vercel.app".to_string(),
            site_base_url: "https://naijadaily.ng".to_string(),
            default_image: "/default-image.jpg".to_string(),
            excerpt_chars: 150,
            page_size: 15,
            headline_limit: 7,
            category_limit: 7,
            related_limit: 3,
            request_timeout_secs: 30,
            landing_categories: ["News", "Metro", "Politics", "Sport", "Entertainment", "Business"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 10] = [
        "api_base_url",
        "site_base_url",
        "default_image",
        "excerpt_chars",
        "page_size",
        "headline_limit",
        "category_limit",
        "related_limit",
        "request_timeout_secs",
        "landing_categories",
    ];

    /// Default location: `$HOME/.config/newsdesk/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        let home = std::env::var_os("HOME")?;
        Some(
            PathBuf::from(home)
                .join(".config")
                .join("newsdesk")
                .join("config.toml"),
        )
    }

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)`
    /// - Invalid values (zero page size, non-HTTPS base URL) → `Err`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        let config = Self::from_toml(&content)?;
        tracing::info!(
            path = %path.display(),
            api = %config.api_base_url,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Parse configuration from TOML text and validate it.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `NEWSDESK_API_URL` / `NEWSDESK_SITE_URL` overrides.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(
            std::env::var(ENV_API_URL).ok(),
            std::env::var(ENV_SITE_URL).ok(),
        )
    }

    fn with_overrides(
        mut self,
        api: Option<String>,
        site: Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(api) = api.filter(|s| !s.trim().is_empty()) {
            tracing::debug!(api = %api, "API base URL overridden from environment");
            self.api_base_url = api;
        }
        if let Some(site) = site.filter(|s| !s.trim().is_empty()) {
            tracing::debug!(site = %site, "Site base URL overridden from environment");
            self.site_base_url = site;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.api_url()?;
        validate_base_url(&self.site_base_url).map_err(|source| ConfigError::InvalidUrl {
            key: "site_base_url",
            source,
        })?;

        for (key, value) in [
            ("page_size", self.page_size),
            ("headline_limit", self.headline_limit),
            ("category_limit", self.category_limit),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    key,
                    reason: "must be at least 1".to_string(),
                });
            }
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "request_timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// The validated API base URL.
    pub fn api_url(&self) -> Result<Url, ConfigError> {
        validate_base_url(&self.api_base_url).map_err(|source| ConfigError::InvalidUrl {
            key: "api_base_url",
            source,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.excerpt_chars, 150);
        assert_eq!(config.page_size, 15);
        assert_eq!(config.related_limit, 3);
        assert_eq!(config.landing_categories.len(), 6);
        assert_eq!(config.landing_categories[0], "News");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/newsdesk_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.page_size, 15);
    }

    #[test]
    fn test_empty_and_whitespace_return_default() {
        assert_eq!(Config::from_toml("").unwrap().page_size, 15);
        assert_eq!(Config::from_toml("  \n \n").unwrap().page_size, 15);
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let config = Config::from_toml("page_size = 12\n").unwrap();
        assert_eq!(config.page_size, 12);
        assert_eq!(config.excerpt_chars, 150);
        assert_eq!(config.site_base_url, "https://naijadaily.ng");
    }

    #[test]
    fn test_full_config_from_file() {
        let dir = std::env::temp_dir().join("newsdesk_config_test_full");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");

        let content = r#"
api_base_url = "https://api.example.com"
site_base_url = "https://www.example.com"
default_image = "/img/none.png"
excerpt_chars = 100
page_size = 6
headline_limit = 5
category_limit = 4
related_limit = 2
request_timeout_secs = 10
landing_categories = ["Politics", "Sport"]
"#;
        std::fs::write(&path, content).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.api_base_url, "https://api.example.com");
        assert_eq!(config.default_image, "/img/none.png");
        assert_eq!(config.excerpt_chars, 100);
        assert_eq!(config.page_size, 6);
        assert_eq!(config.headline_limit, 5);
        assert_eq!(config.category_limit, 4);
        assert_eq!(config.related_limit, 2);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.landing_categories, vec!["Politics", "Sport"]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let err = Config::from_toml("this is not [valid toml").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));
    }

    #[test]
    fn test_wrong_type_returns_error() {
        assert!(Config::from_toml("page_size = \"fifteen\"\n").is_err());
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let config = Config::from_toml("page_size = 8\ntheme = \"dark\"\n").unwrap();
        assert_eq!(config.page_size, 8);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let err = Config::from_toml("page_size = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "page_size", .. }));
    }

    #[test]
    fn test_insecure_api_url_rejected() {
        let err = Config::from_toml("api_base_url = \"http://api.example.com\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { key: "api_base_url", .. }));
    }

    #[test]
    fn test_localhost_api_url_accepted() {
        let config = Config::from_toml("api_base_url = \"http://127.0.0.1:9000\"\n").unwrap();
        assert_eq!(config.api_url().unwrap().port(), Some(9000));
    }

    #[test]
    fn test_overrides_replace_urls() {
        let config = Config::default()
            .with_overrides(
                Some("http://localhost:4000".to_string()),
                Some("https://mirror.example.com".to_string()),
            )
            .unwrap();
        assert_eq!(config.api_base_url, "http://localhost:4000");
        assert_eq!(config.site_base_url, "https://mirror.example.com");
    }

    #[test]
    fn test_blank_override_ignored() {
        let config = Config::default()
            .with_overrides(Some("  ".to_string()), None)
            .unwrap();
        assert_eq!(config.api_base_url, Config::default().api_base_url);
    }

    #[test]
    fn test_bad_override_rejected() {
        let result = Config::default().with_overrides(Some("ftp://x".to_string()), None);
        assert!(result.is_err());
    }

    #[test]
    fn test_too_large_file_rejected() {
        let dir = std::env::temp_dir().join("newsdesk_config_test_too_large");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "a".repeat(1_048_577)).unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));
        assert!(err.to_string().contains("too large"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
