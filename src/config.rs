//! Configuration module for the contact relay.
//!
//! Configuration is layered: an optional TOML file, then environment
//! variable overrides, then [`Config::validate`]. Missing required values
//! are fatal at startup.

use axum::http::HeaderValue;
use serde::Deserialize;
use std::path::Path;

use crate::{RelayError, Result};

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on. Required.
    #[serde(default)]
    pub port: Option<u16>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: None,
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CorsConfig {
    /// Origins allowed to post the contact form.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Outbound relay configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    /// Relay host name.
    #[serde(default = "default_smtp_host")]
    pub host: String,
    /// Relay submission port (STARTTLS).
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    /// Login name; also the public address mail is sent from.
    #[serde(default)]
    pub username: String,
    /// Login password.
    #[serde(default)]
    pub password: String,
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: default_smtp_host(),
            port: default_smtp_port(),
            username: String::new(),
            password: String::new(),
        }
    }
}

/// Contact form behaviour.
#[derive(Debug, Clone, Deserialize)]
pub struct ContactConfig {
    /// Private mailbox that receives forwarded submissions.
    #[serde(default)]
    pub forward_to: String,
    /// Display name used in From/To headers and reply text.
    #[serde(default = "default_operator_name")]
    pub operator_name: String,
    /// Path to the HTML template for the reply email.
    #[serde(default = "default_template_path")]
    pub template_path: String,
}

fn default_operator_name() -> String {
    "Site Operator".to_string()
}

fn default_template_path() -> String {
    "templates/thank_you_email.html".to_string()
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            forward_to: String::new(),
            operator_name: default_operator_name(),
            template_path: default_template_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional log file; console only when unset.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// HTTP listener configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// CORS configuration.
    #[serde(default)]
    pub cors: CorsConfig,
    /// Outbound relay configuration.
    #[serde(default)]
    pub smtp: SmtpConfig,
    /// Contact form behaviour.
    #[serde(default)]
    pub contact: ContactConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(RelayError::Io)?;
        Self::parse(&content)
    }

    /// Load the file if it exists (defaults otherwise), apply environment
    /// overrides and validate.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = if path.as_ref().exists() {
            Self::load(path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| RelayError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `ALLOWED_ORIGINS`: comma delimited list of CORS origins
    /// - `PORT`: listen port
    /// - `PUBLIC_EMAIL` / `PUBLIC_EMAIL_PASSWORD`: relay login and sender address
    /// - `PRIVATE_EMAIL`: forward address
    /// - `OPERATOR_NAME`, `SMTP_HOST`, `SMTP_PORT`
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup. Empty values are ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(origins) = get("ALLOWED_ORIGINS") {
            self.cors.allowed_origins = split_origins(&origins);
        }
        if let Some(port) = get("PORT") {
            self.server.port = Some(parse_port("PORT", &port)?);
        }
        if let Some(username) = get("PUBLIC_EMAIL") {
            self.smtp.username = username;
        }
        if let Some(password) = get("PUBLIC_EMAIL_PASSWORD") {
            self.smtp.password = password;
        }
        if let Some(forward_to) = get("PRIVATE_EMAIL") {
            self.contact.forward_to = forward_to;
        }
        if let Some(name) = get("OPERATOR_NAME") {
            self.contact.operator_name = name;
        }
        if let Some(host) = get("SMTP_HOST") {
            self.smtp.host = host;
        }
        if let Some(port) = get("SMTP_PORT") {
            self.smtp.port = parse_port("SMTP_PORT", &port)?;
        }
        Ok(())
    }

    /// Validate the configuration.
    ///
    /// Returns an error naming the first missing or invalid setting.
    pub fn validate(&self) -> Result<()> {
        if self.server.port.is_none() {
            return Err(missing("server.port", "PORT"));
        }
        if self.cors.allowed_origins.is_empty() {
            return Err(missing("cors.allowed_origins", "ALLOWED_ORIGINS"));
        }
        if let Some(bad) = self
            .cors
            .allowed_origins
            .iter()
            .find(|o| o.parse::<HeaderValue>().is_err())
        {
            return Err(RelayError::Config(format!("invalid CORS origin: {bad:?}")));
        }
        if self.smtp.username.is_empty() {
            return Err(missing("smtp.username", "PUBLIC_EMAIL"));
        }
        if self.smtp.password.is_empty() {
            return Err(missing("smtp.password", "PUBLIC_EMAIL_PASSWORD"));
        }
        if self.contact.forward_to.is_empty() {
            return Err(missing("contact.forward_to", "PRIVATE_EMAIL"));
        }
        Ok(())
    }
}

fn split_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_port(key: &str, value: &str) -> Result<u16> {
    value
        .trim()
        .parse()
        .map_err(|_| RelayError::Config(format!("{key} must be a port number, got {value:?}")))
}

pub(crate) fn missing(setting: &str, env: &str) -> RelayError {
    RelayError::Config(format!(
        "{setting} is not set. Set it in config.toml or via the {env} environment variable."
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn complete_config() -> Config {
        let mut config = Config::default();
        config
            .apply_overrides_from(lookup(&[
                ("ALLOWED_ORIGINS", "https://example.com"),
                ("PORT", "8080"),
                ("PUBLIC_EMAIL", "public@example.com"),
                ("PUBLIC_EMAIL_PASSWORD", "hunter2"),
                ("PRIVATE_EMAIL", "private@example.com"),
            ]))
            .unwrap();
        config
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.server.port.is_none());
        assert!(config.cors.allowed_origins.is_empty());
        assert_eq!(config.smtp.host, "smtp.gmail.com");
        assert_eq!(config.smtp.port, 587);
        assert!(config.smtp.username.is_empty());
        assert!(config.smtp.password.is_empty());
        assert!(config.contact.forward_to.is_empty());
        assert_eq!(config.contact.operator_name, "Site Operator");
        assert_eq!(
            config.contact.template_path,
            "templates/thank_you_email.html"
        );
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 3000

[cors]
allowed_origins = ["https://example.com", "https://www.example.com"]

[smtp]
host = "mail.example.com"
port = 2525
username = "public@example.com"
password = "secret"

[contact]
forward_to = "private@example.com"
operator_name = "Jane Doe"
template_path = "custom/reply.html"

[logging]
level = "debug"
file = "logs/relay.log"
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, Some(3000));
        assert_eq!(config.cors.allowed_origins.len(), 2);
        assert_eq!(config.cors.allowed_origins[1], "https://www.example.com");
        assert_eq!(config.smtp.host, "mail.example.com");
        assert_eq!(config.smtp.port, 2525);
        assert_eq!(config.smtp.username, "public@example.com");
        assert_eq!(config.smtp.password, "secret");
        assert_eq!(config.contact.forward_to, "private@example.com");
        assert_eq!(config.contact.operator_name, "Jane Doe");
        assert_eq!(config.contact.template_path, "custom/reply.html");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file.as_deref(), Some("logs/relay.log"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[contact]
operator_name = "Partial"
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.contact.operator_name, "Partial");
        assert!(config.server.port.is_none());
        assert_eq!(config.smtp.host, "smtp.gmail.com");
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("this is not valid toml [[[");

        assert!(result.is_err());
        if let Err(RelayError::Config(msg)) = result {
            assert!(msg.contains("config parse error"));
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load("nonexistent.toml");
        assert!(matches!(result, Err(RelayError::Io(_))));
    }

    #[test]
    fn test_overrides_split_origins() {
        let mut config = Config::default();
        config
            .apply_overrides_from(lookup(&[(
                "ALLOWED_ORIGINS",
                "https://a.example, https://b.example,,",
            )]))
            .unwrap();

        assert_eq!(
            config.cors.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn test_overrides_credentials_and_port() {
        let mut config = Config::default();
        config
            .apply_overrides_from(lookup(&[
                ("PORT", "9000"),
                ("PUBLIC_EMAIL", "public@example.com"),
                ("PUBLIC_EMAIL_PASSWORD", "hunter2"),
                ("PRIVATE_EMAIL", "private@example.com"),
                ("OPERATOR_NAME", "Jane Doe"),
            ]))
            .unwrap();

        assert_eq!(config.server.port, Some(9000));
        assert_eq!(config.smtp.username, "public@example.com");
        assert_eq!(config.smtp.password, "hunter2");
        assert_eq!(config.contact.forward_to, "private@example.com");
        assert_eq!(config.contact.operator_name, "Jane Doe");
    }

    #[test]
    fn test_overrides_ignore_empty_values() {
        let mut config = Config::default();
        config.smtp.username = "original@example.com".to_string();
        config
            .apply_overrides_from(lookup(&[("PUBLIC_EMAIL", "")]))
            .unwrap();

        assert_eq!(config.smtp.username, "original@example.com");
    }

    #[test]
    fn test_overrides_invalid_port() {
        let mut config = Config::default();
        let result = config.apply_overrides_from(lookup(&[("PORT", "eighty")]));

        match result {
            Err(RelayError::Config(msg)) => assert!(msg.contains("PORT")),
            other => panic!("Expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_complete() {
        assert!(complete_config().validate().is_ok());
    }

    #[test]
    fn test_validate_missing_port() {
        let mut config = complete_config();
        config.server.port = None;

        let err = config.validate().unwrap_err();
        assert!(matches!(err, RelayError::Config(_)));
        assert!(err.to_string().contains("server.port"));
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_validate_missing_port_from_file_without_env() {
        let toml = r#"
[cors]
allowed_origins = ["https://example.com"]

[smtp]
username = "public@example.com"
password = "secret"

[contact]
forward_to = "private@example.com"
"#;
        let mut config = Config::parse(toml).unwrap();
        config.apply_overrides_from(lookup(&[])).unwrap();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_validate_missing_origins() {
        let mut config = complete_config();
        config.cors.allowed_origins.clear();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ALLOWED_ORIGINS"));
    }

    #[test]
    fn test_validate_invalid_origin() {
        let mut config = complete_config();
        config.cors.allowed_origins = vec!["https://bad\norigin".to_string()];

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("invalid CORS origin"));
    }

    #[test]
    fn test_validate_missing_password() {
        let mut config = complete_config();
        config.smtp.password.clear();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("PUBLIC_EMAIL_PASSWORD"));
    }

    #[test]
    fn test_validate_missing_forward_address() {
        let mut config = complete_config();
        config.contact.forward_to.clear();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("PRIVATE_EMAIL"));
    }

    #[test]
    fn test_example_config_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config.example.toml");
        let config = Config::load(path).unwrap();

        assert_eq!(config.server.port, Some(8080));
        assert_eq!(config.cors.allowed_origins, vec!["https://www.example.com"]);
        assert_eq!(config.contact.forward_to, "private@example.com");
        assert!(config.logging.file.is_none());
    }
}
