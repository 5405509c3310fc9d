use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::external::{google_trends, polygon};

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;
const DEFAULT_TRENDS_HL: &str = "en-US";
const DEFAULT_TRENDS_TZ: i32 = 360;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is missing.")]
    Missing(&'static str),
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Settings for the Google Trends client, fixed for the life of the process.
#[derive(Debug, Clone)]
pub struct TrendsSettings {
    pub base_url: Url,
    pub hl: String,
    // Minutes offset from UTC, as Google Trends expects it
    pub tz: i32,
    pub geo: String,
    pub property: String,
}

impl TrendsSettings {
    /// Country used for the session-cookie request: the last two characters of `hl`.
    pub fn region(&self) -> String {
        let len = self.hl.chars().count();
        self.hl.chars().skip(len.saturating_sub(2)).collect()
    }
}

impl Default for TrendsSettings {
    fn default() -> Self {
        Self {
            base_url: Url::parse(google_trends::DEFAULT_BASE_URL)
                .expect("default Google Trends URL is valid"),
            hl: DEFAULT_TRENDS_HL.to_string(),
            tz: DEFAULT_TRENDS_TZ,
            geo: String::new(),
            property: String::new(),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub polygon_api_key: String,
    pub polygon_base_url: Url,
    pub host: IpAddr,
    pub port: u16,
    pub upstream_timeout: Duration,
    pub trends: TrendsSettings,
}

// Hand-written so the API key never ends up in logs.
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("polygon_api_key", &"<redacted>")
            .field("polygon_base_url", &self.polygon_base_url.as_str())
            .field("host", &self.host)
            .field("port", &self.port)
            .field("upstream_timeout", &self.upstream_timeout)
            .field("trends", &self.trends)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let polygon_api_key = lookup("POLYGON_API_KEY")
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::Missing("POLYGON_API_KEY"))?;

        let polygon_base_url = parse_url(
            "POLYGON_BASE_URL",
            lookup("POLYGON_BASE_URL").as_deref().unwrap_or(polygon::DEFAULT_BASE_URL),
        )?;

        let host = match lookup("HOST") {
            Some(raw) => raw.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                name: "HOST",
                reason: e.to_string(),
            })?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let port = parse_number("PORT", lookup("PORT"), DEFAULT_PORT)?;

        let timeout_secs = parse_number(
            "UPSTREAM_TIMEOUT_SECS",
            lookup("UPSTREAM_TIMEOUT_SECS"),
            DEFAULT_UPSTREAM_TIMEOUT_SECS,
        )?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "UPSTREAM_TIMEOUT_SECS",
                reason: "must be greater than zero".to_string(),
            });
        }

        let trends = TrendsSettings {
            base_url: parse_url(
                "TRENDS_BASE_URL",
                lookup("TRENDS_BASE_URL").as_deref().unwrap_or(google_trends::DEFAULT_BASE_URL),
            )?,
            hl: lookup("TRENDS_HL").unwrap_or_else(|| DEFAULT_TRENDS_HL.to_string()),
            tz: parse_number("TRENDS_TZ", lookup("TRENDS_TZ"), DEFAULT_TRENDS_TZ)?,
            ..TrendsSettings::default()
        };

        Ok(Self {
            polygon_api_key,
            polygon_base_url,
            host,
            port,
            upstream_timeout: Duration::from_secs(timeout_secs),
            trends,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_number<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match raw {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: format!("'{}': {}", raw, e),
        }),
        None => Ok(default),
    }
}

fn parse_url(name: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::Invalid {
        name,
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::Invalid {
            name,
            reason: format!("'{}' is not a base URL", raw),
        });
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let env: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_missing_api_key_is_rejected() {
        let err = load(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("POLYGON_API_KEY")));
        assert_eq!(err.to_string(), "POLYGON_API_KEY is missing.");
    }

    #[test]
    fn test_empty_api_key_is_rejected() {
        assert!(matches!(load(&[("POLYGON_API_KEY", "")]), Err(ConfigError::Missing(_))));
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("POLYGON_API_KEY", "abc")]).unwrap();

        assert_eq!(config.polygon_api_key, "abc");
        assert_eq!(config.bind_addr(), "0.0.0.0:5000".parse().unwrap());
        assert_eq!(config.upstream_timeout, Duration::from_secs(30));
        assert_eq!(config.polygon_base_url.as_str(), "https://api.polygon.io/");
        assert_eq!(config.trends.hl, "en-US");
        assert_eq!(config.trends.tz, 360);
        assert_eq!(config.trends.geo, "");
        assert_eq!(config.trends.property, "");
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("POLYGON_API_KEY", "abc"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("UPSTREAM_TIMEOUT_SECS", "5"),
            ("TRENDS_TZ", "-60"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr(), "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.upstream_timeout, Duration::from_secs(5));
        assert_eq!(config.trends.tz, -60);
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("POLYGON_API_KEY", "abc"), ("PORT", "http")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let err = load(&[("POLYGON_API_KEY", "abc"), ("UPSTREAM_TIMEOUT_SECS", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "UPSTREAM_TIMEOUT_SECS", .. }));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = load(&[("POLYGON_API_KEY", "super-secret")]).unwrap();
        assert!(!format!("{:?}", config).contains("super-secret"));
    }

    #[test]
    fn test_region_from_locale() {
        assert_eq!(TrendsSettings::default().region(), "US");
        let settings = TrendsSettings { hl: "de".to_string(), ..TrendsSettings::default() };
        assert_eq!(settings.region(), "de");
    }
}
