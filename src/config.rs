use std::env;
use std::time::Duration;
use url::Url;

pub fn init_logging() {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
}

const COLLABORATOR_URL: &str = "http://127.0.0.1:5000";

/// Base URL shared by both collaborators unless overridden individually.
pub fn collaborator_url() -> String {
    env::var("COLLABORATOR_URL").unwrap_or_else(|_| COLLABORATOR_URL.to_string())
}

pub fn parser_url() -> String {
    env::var("PARSER_URL").unwrap_or_else(|_| collaborator_url())
}

pub fn extractor_url() -> String {
    env::var("EXTRACTOR_URL").unwrap_or_else(|_| collaborator_url())
}

const BIND_HOST: &str = "127.0.0.1";
const BIND_PORT: u16 = 8080;

pub fn bind_host() -> String {
    env::var("BIND_HOST").unwrap_or_else(|_| BIND_HOST.to_string())
}

const STATIC_DIR: &str = "./static";

pub fn static_dir() -> String {
    env::var("STATIC_DIR").unwrap_or_else(|_| STATIC_DIR.to_string())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid URL for {name}: {reason}")]
    InvalidUrl { name: &'static str, reason: String },

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Resolved runtime settings for the server binary.
#[derive(Debug, Clone)]
pub struct Settings {
    pub parser_url: Url,
    pub extractor_url: Url,
    pub bind_host: String,
    pub bind_port: u16,
    pub static_dir: String,
    /// `None` keeps collaborator calls unbounded.
    pub collaborator_timeout: Option<Duration>,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Settings {
            parser_url: parse_base_url("PARSER_URL", &parser_url())?,
            extractor_url: parse_base_url("EXTRACTOR_URL", &extractor_url())?,
            bind_host: bind_host(),
            bind_port: parse_port(env::var("BIND_PORT").ok())?,
            static_dir: static_dir(),
            collaborator_timeout: parse_timeout(env::var("COLLABORATOR_TIMEOUT_SECS").ok())?,
        })
    }
}

/// Parses a collaborator base URL. A trailing slash is added so that
/// `Url::join` appends endpoint paths instead of replacing the last segment.
pub fn parse_base_url(name: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    let url = Url::parse(&normalized).map_err(|e| ConfigError::InvalidUrl {
        name,
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidUrl {
            name,
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

fn parse_port(raw: Option<String>) -> Result<u16, ConfigError> {
    match raw {
        None => Ok(BIND_PORT),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name: "BIND_PORT", value }),
    }
}

fn parse_timeout(raw: Option<String>) -> Result<Option<Duration>, ConfigError> {
    match raw {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map(|secs| Some(Duration::from_secs(secs)))
            .map_err(|_| ConfigError::InvalidValue {
                name: "COLLABORATOR_TIMEOUT_SECS",
                value,
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let url = parse_base_url("PARSER_URL", "http://localhost:5000/api").unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/");
        assert_eq!(url.join("upload").unwrap().as_str(), "http://localhost:5000/api/upload");
    }

    #[test]
    fn test_base_url_rejects_other_schemes() {
        let result = parse_base_url("PARSER_URL", "ftp://localhost");
        assert!(matches!(result, Err(ConfigError::InvalidUrl { name: "PARSER_URL", .. })));
        assert!(parse_base_url("PARSER_URL", "not a url").is_err());
    }

    #[test]
    fn test_port_defaults_and_parses() {
        assert_eq!(parse_port(None).unwrap(), 8080);
        assert_eq!(parse_port(Some("9000".to_string())).unwrap(), 9000);
        assert!(parse_port(Some("eighty".to_string())).is_err());
    }

    #[test]
    fn test_timeout_is_optional() {
        assert_eq!(parse_timeout(None).unwrap(), None);
        assert_eq!(parse_timeout(Some("".to_string())).unwrap(), None);
        assert_eq!(parse_timeout(Some("30".to_string())).unwrap(), Some(Duration::from_secs(30)));
        assert!(parse_timeout(Some("-1".to_string())).is_err());
    }
}
