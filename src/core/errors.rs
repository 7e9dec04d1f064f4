use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error: {code} - {message}")]
    ApiError { code: i32, message: String },

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Request failed after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponseFormat(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] crate::core::config::ConfigError),
}

impl ExchangeError {
    /// Whether the failure happened on the wire and the request may be re-sent.
    ///
    /// Malformed URLs and redirect loops fail the same way on every attempt.
    pub fn is_transport(&self) -> bool {
        match self {
            Self::HttpError(e) => e.is_timeout() || e.is_connect() || e.is_request() || e.is_body(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_only_wire_failures_are_transport() {
        let refused = reqwest::Client::new()
            .get("http://127.0.0.1:9/")
            .send()
            .await
            .unwrap_err();
        assert!(ExchangeError::from(refused).is_transport());

        let malformed = reqwest::Client::new()
            .get("not a url")
            .build()
            .unwrap_err();
        assert!(!ExchangeError::from(malformed).is_transport());

        assert!(!ExchangeError::DeserializationError("eof".to_string()).is_transport());
        assert!(!ExchangeError::ApiError {
            code: 1,
            message: "Insufficient balance".to_string(),
        }
        .is_transport());
        assert!(!ExchangeError::RetriesExhausted {
            attempts: 3,
            last_error: "timeout".to_string(),
        }
        .is_transport());
    }
}
