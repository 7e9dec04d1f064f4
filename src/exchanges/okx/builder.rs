use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{Clock, ReqwestRest, RestClientBuilder, RestClientConfig, RetryPolicy, SystemClock};
use crate::exchanges::okx::{connector::OkxConnector, signer::OkxSigner};
use std::sync::Arc;
use std::time::Duration;

/// Builder for creating OKX exchange connectors
pub struct OkxBuilder {
    config: ExchangeConfig,
    clock: Arc<dyn Clock>,
}

impl Default for OkxBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OkxBuilder {
    /// Create a new `OkxBuilder` with default settings
    pub fn new() -> Self {
        Self {
            config: ExchangeConfig::new(String::new(), String::new(), String::new()),
            clock: Arc::new(SystemClock),
        }
    }

    /// Set the exchange configuration
    pub fn with_config(mut self, config: ExchangeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set API credentials
    pub fn with_credentials(
        mut self,
        api_key: String,
        secret_key: String,
        passphrase: String,
    ) -> Self {
        let mut config = ExchangeConfig::new(api_key, secret_key, passphrase);
        config.base_url = self.config.base_url;
        config.simulated = self.config.simulated;
        config.debug = self.config.debug;
        config.hedge_mode = self.config.hedge_mode;
        config.timeout = self.config.timeout;
        config.retry = self.config.retry;
        self.config = config;
        self
    }

    /// Set base URL for REST API
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.config.base_url = base_url;
        self
    }

    pub fn with_simulated(mut self, simulated: bool) -> Self {
        self.config.simulated = simulated;
        self
    }

    pub fn with_hedge_mode(mut self, hedge_mode: bool) -> Self {
        self.config.hedge_mode = hedge_mode;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    /// Set the per-attempt request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.config.retry = retry;
        self
    }

    /// Replace the timestamp source used for signing
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Build the signed REST engine alone
    pub fn build_rest(&self) -> Result<ReqwestRest, ExchangeError> {
        self.config.validate()?;

        let rest_config = RestClientConfig::new(self.config.base_url.clone(), "okx".to_string())
            .with_timeout(self.config.timeout)
            .with_retry(self.config.retry)
            .with_debug(self.config.debug);

        let signer = OkxSigner::new(
            self.config.api_key().to_string(),
            self.config.secret_key().to_string(),
            self.config.passphrase().to_string(),
        )
        .with_clock(self.clock.clone())
        .with_simulated(self.config.simulated);

        RestClientBuilder::new(rest_config)
            .with_signer(Arc::new(signer))
            .build()
    }

    /// Build the OKX connector. Fails before any request when a credential is missing.
    pub fn build(self) -> Result<OkxConnector<ReqwestRest>, ExchangeError> {
        let rest = self.build_rest()?;
        Ok(OkxConnector::new(rest, &self.config))
    }
}

/// Create an OKX connector from a configuration
pub fn build_connector(config: ExchangeConfig) -> Result<OkxConnector<ReqwestRest>, ExchangeError> {
    OkxBuilder::new().with_config(config).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_without_credentials_fails() {
        let result = OkxBuilder::new().build();
        assert!(matches!(result, Err(ExchangeError::ConfigError(_))));
    }

    #[test]
    fn test_build_missing_passphrase() {
        let config = ExchangeConfig::new(
            "test_key".to_string(),
            "test_secret".to_string(),
            String::new(),
        );

        let result = build_connector(config);
        assert!(result.is_err());
        assert!(result.err().unwrap().to_string().contains("passphrase"));
    }

    #[test]
    fn test_builder_with_credentials() {
        let result = OkxBuilder::new()
            .with_timeout(Duration::from_secs(5))
            .with_retry_policy(RetryPolicy::no_retry())
            .with_credentials(
                "test_key".to_string(),
                "test_secret".to_string(),
                "test_passphrase".to_string(),
            )
            .build_rest();

        let rest = result.unwrap();
        assert_eq!(rest.config().timeout, Duration::from_secs(5));
        assert_eq!(rest.config().retry, RetryPolicy::no_retry());
        assert_eq!(rest.config().base_url, "https://www.okx.com");
    }
}
