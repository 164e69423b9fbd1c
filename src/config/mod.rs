//! Bot configuration.
//!
//! Built in layers, later ones winning: defaults, an optional YAML file,
//! environment variables (after `.env` is loaded), then command-line flags.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::exchanges::endpoints::BinanceFuturesRest;

pub const ENV_API_KEY: &str = "BINANCE_TESTNET_API_KEY";
pub const ENV_API_SECRET: &str = "BINANCE_TESTNET_API_SECRET";
pub const ENV_BASE_URL: &str = "BINANCE_FUTURES_BASE_URL";
pub const ENV_LOG_FILE: &str = "BOT_LOG_FILE";
pub const ENV_LOG_LEVEL: &str = "BOT_LOG_LEVEL";
pub const ENV_CONFIG_PATH: &str = "BOT_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing {what}: pass {flag} or set {env}")]
    MissingCredential {
        what: &'static str,
        flag: &'static str,
        env: &'static str,
    },
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// API key pair. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown: String = self.api_key.chars().take(4).collect();
        f.debug_struct("Credentials")
            .field("api_key", &format!("{}***", shown))
            .field("api_secret", &"***")
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub base_url: String,
    pub recv_window_ms: u64,
    pub timeout_secs: u64,
}

impl fmt::Debug for ExchangeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExchangeConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("api_secret", &self.api_secret.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("recv_window_ms", &self.recv_window_ms)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            base_url: BinanceFuturesRest::TESTNET_BASE.to_string(),
            recv_window_ms: BinanceFuturesRest::DEFAULT_RECV_WINDOW_MS,
            timeout_secs: 10,
        }
    }
}

impl ExchangeConfig {
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        let api_key = non_empty(self.api_key.as_deref()).ok_or(ConfigError::MissingCredential {
            what: "API key",
            flag: "--api-key",
            env: ENV_API_KEY,
        })?;
        let api_secret =
            non_empty(self.api_secret.as_deref()).ok_or(ConfigError::MissingCredential {
                what: "API secret",
                flag: "--api-secret",
                env: ENV_API_SECRET,
            })?;
        Ok(Credentials {
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub file: PathBuf,
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("logs/trading.log"),
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TradingConfig {
    pub default_symbol: String,
    pub default_quantity: Decimal,
    pub status_check_delay_secs: u64,
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            default_symbol: "BTCUSDT".to_string(),
            default_quantity: Decimal::new(1, 3),
            status_check_delay_secs: 2,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub exchange: ExchangeConfig,
    pub logging: LoggingConfig,
    pub trading: TradingConfig,
}

/// Values given on the command line. `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub base_url: Option<String>,
}

impl BotConfig {
    pub fn from_yaml_str(yaml: &str, path: &Path) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content, path)
    }

    /// Loads `.env`, then resolves every layer from the process environment.
    pub fn load(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::load_with(path, overrides, |key| std::env::var(key).ok())
    }

    /// Same as [`BotConfig::load`] with an injectable environment lookup.
    pub fn load_with<F>(
        path: Option<&Path>,
        overrides: &ConfigOverrides,
        env: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file_path = path
            .map(Path::to_path_buf)
            .or_else(|| env(ENV_CONFIG_PATH).map(PathBuf::from));
        let mut config = match file_path {
            Some(p) => Self::from_file(&p)?,
            None => Self::default(),
        };
        config.apply_env(&env);
        config.apply_overrides(overrides);
        config.check()?;
        Ok(config)
    }

    fn apply_env<F>(&mut self, env: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = env(ENV_API_KEY) {
            self.exchange.api_key = Some(v);
        }
        if let Some(v) = env(ENV_API_SECRET) {
            self.exchange.api_secret = Some(v);
        }
        if let Some(v) = env(ENV_BASE_URL) {
            self.exchange.base_url = v;
        }
        if let Some(v) = env(ENV_LOG_FILE) {
            self.logging.file = PathBuf::from(v);
        }
        if let Some(v) = env(ENV_LOG_LEVEL) {
            self.logging.level = v;
        }
    }

    fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(v) = &overrides.api_key {
            self.exchange.api_key = Some(v.clone());
        }
        if let Some(v) = &overrides.api_secret {
            self.exchange.api_secret = Some(v.clone());
        }
        if let Some(v) = &overrides.base_url {
            self.exchange.base_url = v.clone();
        }
    }

    fn check(&self) -> Result<(), ConfigError> {
        let base = &self.exchange.base_url;
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                key: "exchange.base_url",
                reason: format!("'{}' is not an http(s) URL", base),
            });
        }
        if self.exchange.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "exchange.timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.logging.level.parse::<log::LevelFilter>().is_err() {
            return Err(ConfigError::Invalid {
                key: "logging.level",
                reason: format!("unknown level '{}'", self.logging.level),
            });
        }
        Ok(())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = BotConfig::default();
        assert_eq!(config.exchange.base_url, "https://testnet.binancefuture.com");
        assert_eq!(config.exchange.recv_window_ms, 5000);
        assert_eq!(config.logging.file, PathBuf::from("logs/trading.log"));
        assert_eq!(config.trading.default_symbol, "BTCUSDT");
        assert_eq!(config.trading.default_quantity, dec!(0.001));
        assert_eq!(config.trading.status_check_delay_secs, 2);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "exchange:\n  recv_window_ms: 10000\nlogging:\n  level: debug\n";
        let config = BotConfig::from_yaml_str(yaml, Path::new("bot.yaml")).unwrap();
        assert_eq!(config.exchange.recv_window_ms, 10000);
        assert_eq!(config.exchange.base_url, "https://testnet.binancefuture.com");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.trading.status_check_delay_secs, 2);
    }

    #[test]
    fn test_malformed_yaml_is_parse_error() {
        let err = BotConfig::from_yaml_str("exchange: [1, 2", Path::new("bad.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_env_then_flags_precedence() {
        let env = env_from(&[
            (ENV_API_KEY, "env-key"),
            (ENV_API_SECRET, "env-secret"),
            (ENV_LOG_FILE, "/tmp/bot.log"),
        ]);
        let overrides = ConfigOverrides {
            api_key: Some("flag-key".into()),
            ..Default::default()
        };
        let config = BotConfig::load_with(None, &overrides, env).unwrap();
        let creds = config.exchange.credentials().unwrap();
        assert_eq!(creds.api_key, "flag-key");
        assert_eq!(creds.api_secret, "env-secret");
        assert_eq!(config.logging.file, PathBuf::from("/tmp/bot.log"));
    }

    #[test]
    fn test_missing_secret_is_reported() {
        let env = env_from(&[(ENV_API_KEY, "k"), (ENV_API_SECRET, "   ")]);
        let config = BotConfig::load_with(None, &ConfigOverrides::default(), env).unwrap();
        let err = config.exchange.credentials().unwrap_err();
        assert!(err.to_string().contains(ENV_API_SECRET));
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let overrides = ConfigOverrides {
            base_url: Some("testnet.binancefuture.com".into()),
            ..Default::default()
        };
        let err = BotConfig::load_with(None, &overrides, env_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "exchange.base_url", .. }));
    }

    #[test]
    fn test_missing_config_file() {
        let err = BotConfig::load_with(
            Some(Path::new("/nonexistent/bot.yaml")),
            &ConfigOverrides::default(),
            env_from(&[]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_credentials_debug_hides_secret() {
        let creds = Credentials {
            api_key: "abcdef123".into(),
            api_secret: "topsecret".into(),
        };
        let shown = format!("{:?}", creds);
        assert!(!shown.contains("topsecret"));
        assert!(!shown.contains("abcdef123"));
    }

    #[test]
    fn test_example_config_parses() {
        let yaml = include_str!("../../config/bot.example.yaml");
        let config = BotConfig::from_yaml_str(yaml, Path::new("bot.example.yaml")).unwrap();
        assert_eq!(config, BotConfig::default());
    }
}
