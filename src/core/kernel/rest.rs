use crate::core::errors::ExchangeError;
use crate::core::kernel::retry::RetryPolicy;
use crate::core::kernel::signer::Signer;
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::RetryIf;
use tracing::{debug, error, instrument, warn};

/// REST client trait for making signed HTTP requests
///
/// Every request is authenticated. Implementations return the response body
/// parsed as JSON, whatever business code it carries; interpreting the
/// envelope is left to the exchange layer.
#[async_trait]
pub trait RestClient: Send + Sync {
    /// Make a signed GET request
    ///
    /// # Arguments
    /// * `endpoint` - The API endpoint path
    /// * `query_params` - Query parameters, serialized in the given order
    async fn get(&self, endpoint: &str, query_params: &[(&str, &str)])
        -> Result<Value, ExchangeError>;

    /// Make a signed POST request with a JSON body
    async fn post(&self, endpoint: &str, body: &Value) -> Result<Value, ExchangeError>;

    /// Make a signed request with custom method
    ///
    /// Query parameters are only applied to GET, the body only to POST.
    async fn signed_request(
        &self,
        method: Method,
        endpoint: &str,
        query_params: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value, ExchangeError>;
}

/// Configuration for the REST client
#[derive(Clone, Debug)]
pub struct RestClientConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Exchange name for logging and tracing
    pub exchange_name: String,
    /// Per-attempt request timeout
    pub timeout: Duration,
    /// Retry budget for transport failures
    pub retry: RetryPolicy,
    /// User agent string to include in requests
    pub user_agent: String,
    /// Log request bodies and raw response text
    pub debug: bool,
}

impl RestClientConfig {
    /// Create a new configuration
    ///
    /// # Arguments
    /// * `base_url` - Base URL for the API
    /// * `exchange_name` - Name of the exchange
    pub fn new(base_url: String, exchange_name: String) -> Self {
        Self {
            base_url,
            exchange_name,
            timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
            user_agent: concat!("okx-client/", env!("CARGO_PKG_VERSION")).to_string(),
            debug: false,
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the user agent string
    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Builder for creating REST client instances
pub struct RestClientBuilder {
    config: RestClientConfig,
    signer: Option<Arc<dyn Signer>>,
}

impl RestClientBuilder {
    /// Create a new builder with the given configuration
    pub fn new(config: RestClientConfig) -> Self {
        Self {
            config,
            signer: None,
        }
    }

    /// Set the signer for authenticated requests
    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Build the REST client
    ///
    /// A signer is mandatory: this client never sends unsigned requests.
    pub fn build(self) -> Result<ReqwestRest, ExchangeError> {
        let signer = self.signer.ok_or_else(|| {
            ExchangeError::ConfigurationError(
                "A signer is required to build the REST client".to_string(),
            )
        })?;

        let client = Client::builder()
            .timeout(self.config.timeout)
            .user_agent(&self.config.user_agent)
            .build()
            .map_err(|e| {
                ExchangeError::ConfigurationError(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(ReqwestRest {
            client,
            config: self.config,
            signer,
        })
    }
}

/// Signed request engine on top of reqwest
#[derive(Clone)]
pub struct ReqwestRest {
    client: Client,
    config: RestClientConfig,
    signer: Arc<dyn Signer>,
}

impl std::fmt::Debug for ReqwestRest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestRest")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Append `?k1=v1&k2=v2` to `endpoint` in the order given.
///
/// The result is used verbatim both in the URL and in the signing string,
/// so values are not percent-encoded.
pub fn build_request_path(endpoint: &str, query_params: &[(&str, &str)]) -> String {
    if query_params.is_empty() {
        return endpoint.to_string();
    }
    let query_string = query_params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");
    format!("{}?{}", endpoint, query_string)
}

impl ReqwestRest {
    pub fn config(&self) -> &RestClientConfig {
        &self.config
    }

    /// Entry point taking the method as text, e.g. `"get"` or `"POST"`
    pub async fn request(
        &self,
        method: &str,
        endpoint: &str,
        query_params: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value, ExchangeError> {
        let method = match method.to_uppercase().as_str() {
            "GET" => Method::GET,
            "POST" => Method::POST,
            other => {
                return Err(ExchangeError::InvalidParameters(format!(
                    "Unsupported HTTP method: {}",
                    other
                )))
            }
        };
        self.make_request(method, endpoint, query_params, body)
            .await
    }

    fn build_url(&self, request_path: &str) -> String {
        format!("{}{}", self.config.base_url, request_path)
    }

    #[instrument(skip(self, query_params, body), fields(exchange = %self.config.exchange_name, method = %method, endpoint = %endpoint))]
    async fn make_request(
        &self,
        method: Method,
        endpoint: &str,
        query_params: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value, ExchangeError> {
        let request_path = if method == Method::GET {
            build_request_path(endpoint, query_params)
        } else {
            endpoint.to_string()
        };

        // Serialized once: these exact bytes are signed and sent on every attempt
        let payload = match body {
            Some(body) if method == Method::POST => serde_json::to_string(body).map_err(|e| {
                ExchangeError::SerializationError(format!(
                    "Failed to serialize request body: {}",
                    e
                ))
            })?,
            _ => String::new(),
        };

        let url = self.build_url(&request_path);
        debug!("{} {}", method, url);
        if self.config.debug && !payload.is_empty() {
            debug!("Request body: {}", payload);
        }

        let attempts = self.config.retry.attempts_for(&method);
        let attempt = AtomicU32::new(0);
        let (attempt_ref, method_ref, url_ref, path_ref, payload_ref) =
            (&attempt, &method, url.as_str(), request_path.as_str(), payload.as_str());

        let result = RetryIf::start(
            self.config.retry.schedule(&method),
            move || {
                let n = attempt_ref.fetch_add(1, Ordering::Relaxed) + 1;
                self.dispatch_once(method_ref, url_ref, path_ref, payload_ref, n, attempts)
            },
            |e: &ExchangeError| e.is_transport(),
        )
        .await;

        match result {
            Ok(text) => self.parse_response(&text),
            Err(e) if e.is_transport() => {
                let attempts = attempt.load(Ordering::Relaxed);
                error!(attempts, "Request failed after {} attempt(s): {} {}", attempts, method, url);
                Err(ExchangeError::RetriesExhausted {
                    attempts,
                    last_error: e.to_string(),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// One signed attempt. The timestamp and signature are regenerated every time.
    async fn dispatch_once(
        &self,
        method: &Method,
        url: &str,
        request_path: &str,
        payload: &str,
        attempt: u32,
        attempts: u32,
    ) -> Result<String, ExchangeError> {
        let headers = self
            .signer
            .sign_request(method.as_str(), request_path, payload)
            .map_err(|e| {
                error!(error = ?e, "Failed to sign {} {}", method, request_path);
                e
            })?;

        let mut request = self.client.request(method.clone(), url);
        for (key, value) in &headers {
            request = request.header(key, value);
        }
        if !payload.is_empty() {
            request = request.body(payload.to_string());
        }

        let outcome = async {
            let response = request.send().await?;
            Ok::<_, ExchangeError>(response.text().await?)
        }
        .await;

        if let Err(e) = &outcome {
            warn!(attempt, attempts, "Request attempt failed: {}", e);
        }
        outcome
    }

    /// Parse the body as the response envelope, regardless of HTTP status or business code
    fn parse_response(&self, response_text: &str) -> Result<Value, ExchangeError> {
        if self.config.debug {
            debug!("Response: {}", response_text);
        }
        serde_json::from_str(response_text).map_err(|e| {
            error!(error = %e, body = %response_text, "Failed to parse JSON response");
            ExchangeError::DeserializationError(format!("Failed to parse JSON response: {}", e))
        })
    }
}

#[async_trait]
impl RestClient for ReqwestRest {
    #[instrument(skip(self, query_params), fields(exchange = %self.config.exchange_name, endpoint = %endpoint, param_count = query_params.len()))]
    async fn get(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
    ) -> Result<Value, ExchangeError> {
        self.make_request(Method::GET, endpoint, query_params, None)
            .await
    }

    #[instrument(skip(self, body), fields(exchange = %self.config.exchange_name, endpoint = %endpoint))]
    async fn post(&self, endpoint: &str, body: &Value) -> Result<Value, ExchangeError> {
        self.make_request(Method::POST, endpoint, &[], Some(body))
            .await
    }

    #[instrument(skip(self, query_params, body), fields(exchange = %self.config.exchange_name, method = %method, endpoint = %endpoint))]
    async fn signed_request(
        &self,
        method: Method,
        endpoint: &str,
        query_params: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value, ExchangeError> {
        self.make_request(method, endpoint, query_params, body)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::kernel::signer::SignatureResult;
    use std::collections::HashMap;

    struct StaticSigner;

    impl Signer for StaticSigner {
        fn sign_request(&self, _method: &str, _request_path: &str, _body: &str) -> SignatureResult {
            Ok(HashMap::new())
        }
    }

    fn rest() -> ReqwestRest {
        RestClientBuilder::new(RestClientConfig::new(
            "http://127.0.0.1:9".to_string(),
            "test".to_string(),
        ))
        .with_signer(Arc::new(StaticSigner))
        .build()
        .unwrap()
    }

    #[test]
    fn test_request_path_keeps_insertion_order() {
        let path = build_request_path("/api/v5/market/candles", &[("b", "2"), ("a", "1")]);
        assert_eq!(path, "/api/v5/market/candles?b=2&a=1");
    }

    #[test]
    fn test_request_path_without_params() {
        assert_eq!(
            build_request_path("/api/v5/account/balance", &[]),
            "/api/v5/account/balance"
        );
    }

    #[test]
    fn test_request_path_two_params() {
        assert_eq!(build_request_path("/p", &[("a", "1"), ("b", "2")]), "/p?a=1&b=2");
    }

    #[test]
    fn test_builder_requires_signer() {
        let result = RestClientBuilder::new(RestClientConfig::new(
            "https://www.okx.com".to_string(),
            "okx".to_string(),
        ))
        .build();
        assert!(matches!(result, Err(ExchangeError::ConfigurationError(_))));
    }

    #[tokio::test]
    async fn test_unsupported_method_is_rejected_before_sending() {
        let err = rest()
            .request("delete", "/api/v5/trade/order", &[], None)
            .await
            .unwrap_err();
        assert!(matches!(err, ExchangeError::InvalidParameters(ref m) if m.contains("DELETE")));
    }

    #[tokio::test]
    async fn test_signer_failure_is_not_retried() {
        struct BrokenSigner;
        impl Signer for BrokenSigner {
            fn sign_request(&self, _: &str, _: &str, _: &str) -> SignatureResult {
                Err(ExchangeError::AuthError("bad key".to_string()))
            }
        }

        let rest = RestClientBuilder::new(
            RestClientConfig::new("http://127.0.0.1:9".to_string(), "test".to_string())
                .with_retry(RetryPolicy::new(3, Duration::from_secs(5))),
        )
        .with_signer(Arc::new(BrokenSigner))
        .build()
        .unwrap();

        let started = std::time::Instant::now();
        let err = rest.get("/api/v5/account/balance", &[]).await.unwrap_err();
        assert!(matches!(err, ExchangeError::AuthError(_)));
        // No retry delay was slept
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_unreachable_host_exhausts_budget() {
        let rest = RestClientBuilder::new(
            RestClientConfig::new("http://127.0.0.1:9".to_string(), "test".to_string())
                .with_timeout(Duration::from_millis(500))
                .with_retry(RetryPolicy::new(3, Duration::from_millis(10))),
        )
        .with_signer(Arc::new(StaticSigner))
        .build()
        .unwrap();

        let err = rest
            .get("/api/v5/market/ticker", &[("instId", "BTC-USDT-SWAP")])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ExchangeError::RetriesExhausted { attempts: 3, .. }
        ));
    }
}
