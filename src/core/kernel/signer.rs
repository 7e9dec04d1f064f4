use crate::core::errors::ExchangeError;
use base64::engine::general_purpose;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::HashMap;

type HmacSha256 = Hmac<Sha256>;

/// Result type for signing operations: the authentication headers for one request
pub type SignatureResult = Result<HashMap<String, String>, ExchangeError>;

/// Signer trait for request authentication
///
/// Implementations take a fresh timestamp on every call, so the returned
/// headers are only valid for the attempt they were produced for.
pub trait Signer: Send + Sync {
    /// Sign a request and return the headers to attach to it
    ///
    /// # Arguments
    /// * `method` - Uppercase HTTP method (GET, POST)
    /// * `request_path` - Endpoint path including `?query` when present, exactly as sent
    /// * `body` - Serialized request body exactly as sent, empty for none
    fn sign_request(&self, method: &str, request_path: &str, body: &str) -> SignatureResult;
}

/// Base64-encoded HMAC-SHA256 of `message` keyed with `secret`
pub fn hmac_sha256_base64(secret: &str, message: &str) -> Result<String, ExchangeError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| ExchangeError::AuthError(format!("Failed to create HMAC: {}", e)))?;

    mac.update(message.as_bytes());
    Ok(general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_is_deterministic() {
        let a = hmac_sha256_base64("secret", "2024-01-01T00:00:00.000ZGET/api/v5/account/balance")
            .unwrap();
        let b = hmac_sha256_base64("secret", "2024-01-01T00:00:00.000ZGET/api/v5/account/balance")
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_signature_changes_with_either_input() {
        let base = hmac_sha256_base64("secret", "message").unwrap();
        assert_ne!(base, hmac_sha256_base64("secret", "message ").unwrap());
        assert_ne!(base, hmac_sha256_base64("Secret", "message").unwrap());
    }

    #[test]
    fn test_known_vector() {
        // RFC 4231 test case 2, base64 encoded
        let sig = hmac_sha256_base64("Jefe", "what do ya want for nothing?").unwrap();
        assert_eq!(sig, "W9zBRr9gdU5qBCQmCJV1x1oAPwidJzmDnexYuWTsOEM=");
    }

    #[test]
    fn test_empty_secret_still_signs() {
        assert!(hmac_sha256_base64("", "payload").is_ok());
    }
}
