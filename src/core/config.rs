use crate::core::kernel::RetryPolicy;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::env;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.okx.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    pub api_key: Secret<String>,
    pub secret_key: Secret<String>,
    pub passphrase: Secret<String>,
    pub base_url: String,
    /// Route orders to the demo trading environment (`x-simulated-trading: 1`)
    pub simulated: bool,
    /// Log request bodies and raw responses
    pub debug: bool,
    /// Account tracks long and short positions separately
    pub hedge_mode: bool,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

// Custom Serialize implementation - never expose secrets in serialization
impl Serialize for ExchangeConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("ExchangeConfig", 7)?;
        state.serialize_field("api_key", "[REDACTED]")?;
        state.serialize_field("secret_key", "[REDACTED]")?;
        state.serialize_field("passphrase", "[REDACTED]")?;
        state.serialize_field("base_url", &self.base_url)?;
        state.serialize_field("simulated", &self.simulated)?;
        state.serialize_field("debug", &self.debug)?;
        state.serialize_field("hedge_mode", &self.hedge_mode)?;
        state.end()
    }
}

// Custom Deserialize implementation
impl<'de> Deserialize<'de> for ExchangeConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ExchangeConfigHelper {
            api_key: String,
            secret_key: String,
            passphrase: String,
            base_url: Option<String>,
            #[serde(default)]
            simulated: bool,
            #[serde(default)]
            debug: bool,
            #[serde(default)]
            hedge_mode: bool,
            timeout_secs: Option<u64>,
        }

        let helper = ExchangeConfigHelper::deserialize(deserializer)?;
        Ok(Self {
            api_key: Secret::new(helper.api_key),
            secret_key: Secret::new(helper.secret_key),
            passphrase: Secret::new(helper.passphrase),
            base_url: helper
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            simulated: helper.simulated,
            debug: helper.debug,
            hedge_mode: helper.hedge_mode,
            timeout: helper
                .timeout_secs
                .map_or(DEFAULT_TIMEOUT, Duration::from_secs),
            retry: RetryPolicy::default(),
        })
    }
}

impl ExchangeConfig {
    /// Create a new configuration with API credentials
    #[must_use]
    pub fn new(api_key: String, secret_key: String, passphrase: String) -> Self {
        Self {
            api_key: Secret::new(api_key),
            secret_key: Secret::new(secret_key),
            passphrase: Secret::new(passphrase),
            base_url: DEFAULT_BASE_URL.to_string(),
            simulated: false,
            debug: false,
            hedge_mode: false,
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }

    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `{EXCHANGE}_API_KEY` (e.g., `OKX_API_KEY`)
    /// - `{EXCHANGE}_API_SECRET`
    /// - `{EXCHANGE}_API_PASSPHRASE`
    /// - `{EXCHANGE}_BASE_URL` (optional)
    /// - `{EXCHANGE}_SIMULATED`, `{EXCHANGE}_DEBUG`, `{EXCHANGE}_HEDGE_MODE` (optional, default false)
    pub fn from_env(exchange_prefix: &str) -> Result<Self, ConfigError> {
        let prefix = exchange_prefix.to_uppercase();
        let required = |suffix: &str| -> Result<String, ConfigError> {
            let var = format!("{}_{}", prefix, suffix);
            match env::var(&var) {
                Ok(value) if !value.trim().is_empty() => Ok(value),
                _ => Err(ConfigError::MissingEnvironmentVariable(var)),
            }
        };
        let flag = |suffix: &str| -> bool {
            env::var(format!("{}_{}", prefix, suffix))
                .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false)
        };

        let mut config = Self::new(
            required("API_KEY")?,
            required("API_SECRET")?,
            required("API_PASSPHRASE")?,
        );
        if let Ok(base_url) = env::var(format!("{}_BASE_URL", prefix)) {
            config.base_url = base_url;
        }
        config.simulated = flag("SIMULATED");
        config.debug = flag("DEBUG");
        config.hedge_mode = flag("HEDGE_MODE");

        Ok(config)
    }

    /// Create configuration from .env file and environment variables
    ///
    /// This method first loads environment variables from a .env file (if it exists),
    /// then reads the configuration using the standard environment variable names.
    ///
    /// **Security Warning**: Never commit .env files to version control!
    #[cfg(feature = "env-file")]
    pub fn from_env_file(exchange_prefix: &str) -> Result<Self, ConfigError> {
        Self::from_env_file_with_path(exchange_prefix, ".env")
    }

    /// Create configuration from a specific .env file path
    #[cfg(feature = "env-file")]
    pub fn from_env_file_with_path(
        exchange_prefix: &str,
        env_file_path: &str,
    ) -> Result<Self, ConfigError> {
        match dotenv::from_path(env_file_path) {
            Ok(()) => {}
            Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {
                // .env file doesn't exist, that's okay - continue with system env vars
            }
            Err(e) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "Failed to load .env file '{}': {}",
                    env_file_path, e
                )));
            }
        }

        Self::from_env(exchange_prefix)
    }

    /// Fail fast when any credential is missing. No request may be attempted without all three.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("api_key", &self.api_key),
            ("secret_key", &self.secret_key),
            ("passphrase", &self.passphrase),
        ];
        for (name, secret) in fields {
            if secret.expose_secret().trim().is_empty() {
                return Err(ConfigError::MissingCredential(name.to_string()));
            }
        }
        if self.base_url.is_empty() {
            return Err(ConfigError::InvalidConfiguration(
                "base URL cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Check if this configuration has all credentials for authenticated operations
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.validate().is_ok()
    }

    /// Fold strategy-level flags into this configuration
    #[must_use]
    pub fn with_runtime_flags(mut self, flags: &RuntimeFlags) -> Self {
        self.debug = flags.debug;
        self.hedge_mode = flags.hedge_mode;
        self
    }

    /// Set simulated (demo) trading
    #[must_use]
    pub const fn simulated(mut self, simulated: bool) -> Self {
        self.simulated = simulated;
        self
    }

    #[must_use]
    pub const fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub const fn hedge_mode(mut self, hedge_mode: bool) -> Self {
        self.hedge_mode = hedge_mode;
        self
    }

    /// Set custom base URL
    #[must_use]
    pub fn base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Get API key (use carefully - exposes secret)
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Get secret key (use carefully - exposes secret)
    pub fn secret_key(&self) -> &str {
        self.secret_key.expose_secret()
    }

    /// Get passphrase (use carefully - exposes secret)
    pub fn passphrase(&self) -> &str {
        self.passphrase.expose_secret()
    }
}

/// Strategy-level switches kept in the trading process's JSON settings file.
///
/// Only the keys this client cares about are read; everything else in the file is ignored.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RuntimeFlags {
    #[serde(rename = "DEBUG", default)]
    pub debug: bool,
    #[serde(rename = "HEDGE_MODE_ENABLED", default)]
    pub hedge_mode: bool,
}

impl RuntimeFlags {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::InvalidConfiguration(format!(
                "Failed to read settings file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(|e| {
            ConfigError::InvalidConfiguration(format!("Malformed settings file: {}", e))
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvironmentVariable(String),

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_missing_passphrase() {
        let config = ExchangeConfig::new("key".to_string(), "secret".to_string(), String::new());
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential(ref f) if f == "passphrase"));
        assert!(!config.has_credentials());
    }

    #[test]
    fn test_validate_accepts_full_credentials() {
        let config = ExchangeConfig::new(
            "key".to_string(),
            "secret".to_string(),
            "pass".to_string(),
        );
        assert!(config.validate().is_ok());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_serialize_redacts_secrets() {
        let config = ExchangeConfig::new(
            "key-123".to_string(),
            "secret-456".to_string(),
            "pass-789".to_string(),
        );
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("key-123"));
        assert!(!json.contains("secret-456"));
        assert!(!json.contains("pass-789"));
        assert!(json.contains("[REDACTED]"));
    }

    #[test]
    fn test_runtime_flags_fold_into_config() {
        let flags = RuntimeFlags::from_json_str(
            r#"{"DEBUG": true, "HEDGE_MODE_ENABLED": true, "TEST_MODE": false}"#,
        )
        .unwrap();
        let config = ExchangeConfig::new("k".to_string(), "s".to_string(), "p".to_string())
            .with_runtime_flags(&flags);
        assert!(config.debug);
        assert!(config.hedge_mode);
    }

    #[test]
    fn test_runtime_flags_default_off() {
        let flags = RuntimeFlags::from_json_str("{}").unwrap();
        assert!(!flags.debug);
        assert!(!flags.hedge_mode);
    }

    #[test]
    fn test_from_env_requires_every_secret() {
        // Unique prefix so parallel tests never see these variables
        env::set_var("CFGTEST_API_KEY", "key");
        env::set_var("CFGTEST_API_SECRET", "secret");
        env::remove_var("CFGTEST_API_PASSPHRASE");
        let err = ExchangeConfig::from_env("cfgtest").unwrap_err();
        assert!(err.to_string().contains("CFGTEST_API_PASSPHRASE"));

        env::set_var("CFGTEST_API_PASSPHRASE", "pass");
        env::set_var("CFGTEST_HEDGE_MODE", "true");
        let config = ExchangeConfig::from_env("cfgtest").unwrap();
        assert_eq!(config.passphrase(), "pass");
        assert!(config.hedge_mode);
        assert!(!config.simulated);
    }
}
