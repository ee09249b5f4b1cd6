use crate::error::{FeedbackError, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

const DEFAULT_LOG_LEVEL: &str = "peer_feedback=info,tower_http=info";

/// Main configuration structure loaded from peer_feedback.toml and environment variables
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub mail: MailConfig,
    /// Runtime configuration loaded from environment variables
    #[serde(skip)]
    pub runtime: RuntimeConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub http_bind: SocketAddr,
    pub request_timeout_ms: u64,
    /// Base URL used when linking to a project's feedback page
    pub public_base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            request_timeout_ms: 10_000,
            public_base_url: "http://localhost:3000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "peer_feedback.db".to_string(),
        }
    }
}

/// Outbound mail relay; notifications are disabled without `relay_url`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MailConfig {
    pub relay_url: Option<String>,
    pub from: String,
    pub timeout_ms: u64,
    #[serde(skip_serializing)]
    pub token: Option<String>,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            relay_url: None,
            from: "noreply@peer-feedback.local".to_string(),
            timeout_ms: 5_000,
            token: None,
        }
    }
}

impl MailConfig {
    pub fn enabled(&self) -> bool {
        self.relay_url.as_deref().is_some_and(|u| !u.is_empty())
    }
}

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub log_level: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl RuntimeConfig {
    pub fn load_from_env() -> Self {
        Self {
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string()),
        }
    }
}

impl Config {
    /// Load `.env` (or `PF_ENV_FILE`) into the process environment; existing vars win
    pub fn load_env_file() {
        if let Ok(env_path) = std::env::var("PF_ENV_FILE") {
            let _ = dotenvy::from_path(env_path);
        } else {
            let _ = dotenvy::from_path(".env");
        }
    }

    /// Load configuration from TOML file and environment variables
    /// Uses PEER_FEEDBACK_CONFIG environment variable or defaults to "peer_feedback.toml"
    pub fn load() -> anyhow::Result<Self> {
        Self::load_env_file();

        let config_path = std::env::var("PEER_FEEDBACK_CONFIG")
            .unwrap_or_else(|_| "peer_feedback.toml".to_string());

        let mut config: Config = if let Ok(content) = std::fs::read_to_string(&config_path) {
            Self::from_toml_str(&content)?
        } else {
            tracing::warn!("Config file {} not found, using defaults", config_path);
            Self::default()
        };

        config.apply_env_overrides()?;
        config.runtime = RuntimeConfig::load_from_env();
        config.validate()?;

        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply PF_* environment overrides (env-first)
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(path) = std::env::var("PF_DB_PATH") {
            self.database.path = path;
            tracing::debug!("PF_DB_PATH env override applied");
        }
        if let Ok(bind) = std::env::var("PF_HTTP_BIND") {
            self.server.http_bind = bind
                .parse()
                .map_err(|e| {
                    FeedbackError::config(format!(
                        "PF_HTTP_BIND '{}' is not a socket address: {}",
                        bind, e
                    ))
                })?;
        }
        if let Some(timeout) = std::env::var("PF_HTTP_REQUEST_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            self.server.request_timeout_ms = timeout;
        }
        if let Ok(base) = std::env::var("PF_PUBLIC_BASE_URL") {
            self.server.public_base_url = base;
        }
        if let Ok(relay) = std::env::var("PF_MAIL_RELAY_URL") {
            self.mail.relay_url = Some(relay).filter(|r| !r.is_empty());
        }
        if let Ok(from) = std::env::var("PF_MAIL_FROM") {
            self.mail.from = from;
        }
        if let Ok(token) = std::env::var("PF_MAIL_TOKEN") {
            self.mail.token = Some(token).filter(|t| !t.is_empty());
        }
        if let Some(timeout) = std::env::var("PF_MAIL_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            self.mail.timeout_ms = timeout;
        }
        Ok(())
    }

    /// Validate and clamp loaded values
    pub fn validate(&mut self) -> Result<()> {
        if self.database.path.trim().is_empty() {
            return Err(FeedbackError::config("database.path must not be empty"));
        }

        if self
            .mail
            .relay_url
            .as_deref()
            .is_some_and(|r| r.trim().is_empty())
        {
            self.mail.relay_url = None;
        }
        if let Some(relay) = &self.mail.relay_url
            && !crate::models::is_valid_url(relay)
        {
            return Err(FeedbackError::config(format!(
                "mail.relay_url '{}' is not an http(s) URL",
                relay
            )));
        }

        if self.mail.timeout_ms == 0 {
            self.mail.timeout_ms = 1;
        } else if self.mail.timeout_ms > 60_000 {
            tracing::warn!(
                "mail.timeout_ms {} exceeds max 60000, clamping",
                self.mail.timeout_ms
            );
            self.mail.timeout_ms = 60_000;
        }

        if self.server.request_timeout_ms == 0 {
            tracing::warn!("server.request_timeout_ms is 0, using default 10000");
            self.server.request_timeout_ms = 10_000;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let mut config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.server.http_bind.port(), 3000);
        assert_eq!(config.database.path, "peer_feedback.db");
        assert!(!config.mail.enabled());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config = Config::from_toml_str(
            r#"
            [database]
            path = ":memory:"

            [mail]
            relay_url = "https://mail.example.com/send"
            "#,
        )
        .unwrap();
        assert_eq!(config.database.path, ":memory:");
        assert!(config.mail.enabled());
        assert_eq!(config.mail.timeout_ms, 5_000);
        assert_eq!(config.server.request_timeout_ms, 10_000);
    }

    #[test]
    fn bad_relay_url_is_rejected() {
        let mut config = Config::default();
        config.mail.relay_url = Some("smtp.example.com".into());
        let err = config.validate().unwrap_err();
        assert!(matches!(err, FeedbackError::Config { .. }));
    }

    #[test]
    fn empty_relay_url_disables_mail() {
        let mut config = Config::from_toml_str(
            r#"
            [mail]
            relay_url = ""
            "#,
        )
        .unwrap();
        config.validate().unwrap();
        assert_eq!(config.mail.relay_url, None);
        assert!(!config.mail.enabled());
    }

    #[test]
    fn empty_database_path_is_a_config_error() {
        let mut config = Config::default();
        config.database.path = "  ".into();
        assert!(matches!(
            config.validate(),
            Err(FeedbackError::Config { .. })
        ));
    }

    #[test]
    fn mail_timeout_is_clamped() {
        let mut config = Config::default();
        config.mail.timeout_ms = 120_000;
        config.validate().unwrap();
        assert_eq!(config.mail.timeout_ms, 60_000);

        config.mail.timeout_ms = 0;
        config.validate().unwrap();
        assert_eq!(config.mail.timeout_ms, 1);
    }

    #[test]
    fn env_file_is_loaded_from_pf_env_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.env");
        std::fs::write(&path, "PF_ENV_FILE_MARKER=loaded\n").unwrap();
        // Edition 2024 marks env mutation unsafe; no other test reads these vars
        unsafe {
            std::env::set_var("PF_ENV_FILE", &path);
        }
        Config::load_env_file();
        assert_eq!(std::env::var("PF_ENV_FILE_MARKER").as_deref(), Ok("loaded"));
        unsafe {
            std::env::remove_var("PF_ENV_FILE");
        }
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(Config::from_toml_str("[server]\nhttp_bind = 42").is_err());
    }
}
