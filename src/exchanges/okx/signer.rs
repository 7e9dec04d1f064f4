use crate::core::kernel::{hmac_sha256_base64, Clock, SignatureResult, Signer, SystemClock};
use secrecy::{ExposeSecret, Secret};
use std::collections::HashMap;
use std::sync::Arc;

pub const HEADER_KEY: &str = "OK-ACCESS-KEY";
pub const HEADER_SIGN: &str = "OK-ACCESS-SIGN";
pub const HEADER_TIMESTAMP: &str = "OK-ACCESS-TIMESTAMP";
pub const HEADER_PASSPHRASE: &str = "OK-ACCESS-PASSPHRASE";
pub const HEADER_SIMULATED: &str = "x-simulated-trading";

/// The prehash string format is: timestamp + method + requestPath + body
pub fn canonical_string(timestamp: &str, method: &str, request_path: &str, body: &str) -> String {
    format!("{}{}{}{}", timestamp, method, request_path, body)
}

pub struct OkxSigner {
    api_key: String,
    secret_key: Secret<String>,
    passphrase: String,
    simulated: bool,
    clock: Arc<dyn Clock>,
}

impl OkxSigner {
    pub fn new(api_key: String, secret_key: String, passphrase: String) -> Self {
        Self {
            api_key,
            secret_key: Secret::new(secret_key),
            passphrase,
            simulated: false,
            clock: Arc::new(SystemClock),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Send `x-simulated-trading: 1` so orders land in demo trading
    #[must_use]
    pub fn with_simulated(mut self, simulated: bool) -> Self {
        self.simulated = simulated;
        self
    }

    /// Generate the signature for OKX API requests
    pub fn generate_signature(
        &self,
        timestamp: &str,
        method: &str,
        request_path: &str,
        body: &str,
    ) -> Result<String, crate::core::errors::ExchangeError> {
        let prehash = canonical_string(timestamp, method, request_path, body);
        hmac_sha256_base64(self.secret_key.expose_secret(), &prehash)
    }
}

impl Signer for OkxSigner {
    fn sign_request(&self, method: &str, request_path: &str, body: &str) -> SignatureResult {
        let timestamp = self.clock.timestamp();
        let signature = self.generate_signature(&timestamp, method, request_path, body)?;

        let mut headers = HashMap::new();
        headers.insert(HEADER_KEY.to_string(), self.api_key.clone());
        headers.insert(HEADER_SIGN.to_string(), signature);
        headers.insert(HEADER_TIMESTAMP.to_string(), timestamp);
        headers.insert(HEADER_PASSPHRASE.to_string(), self.passphrase.clone());
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        if self.simulated {
            headers.insert(HEADER_SIMULATED.to_string(), "1".to_string());
        }

        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::kernel::FixedClock;

    fn signer() -> OkxSigner {
        OkxSigner::new("key".to_string(), "secret".to_string(), "pass".to_string())
            .with_clock(Arc::new(FixedClock::from_millis(1_704_067_200_000).unwrap()))
    }

    #[test]
    fn test_headers_carry_fixed_timestamp_and_signature() {
        let headers = signer()
            .sign_request("GET", "/api/v5/market/ticker?instId=BTC-USDT-SWAP", "")
            .unwrap();
        assert_eq!(headers[HEADER_TIMESTAMP], "2024-01-01T00:00:00.000Z");
        assert_eq!(headers[HEADER_KEY], "key");
        assert_eq!(headers[HEADER_PASSPHRASE], "pass");
        assert_eq!(headers["Content-Type"], "application/json");
        assert!(!headers.contains_key(HEADER_SIMULATED));

        let expected = hmac_sha256_base64(
            "secret",
            "2024-01-01T00:00:00.000ZGET/api/v5/market/ticker?instId=BTC-USDT-SWAP",
        )
        .unwrap();
        assert_eq!(headers[HEADER_SIGN], expected);
    }

    #[test]
    fn test_body_is_part_of_signature() {
        let s = signer();
        let empty = s.sign_request("POST", "/api/v5/trade/order", "").unwrap();
        let with_body = s
            .sign_request("POST", "/api/v5/trade/order", r#"{"instId":"BTC-USDT-SWAP"}"#)
            .unwrap();
        assert_ne!(empty[HEADER_SIGN], with_body[HEADER_SIGN]);
    }

    #[test]
    fn test_simulated_header() {
        let headers = signer()
            .with_simulated(true)
            .sign_request("GET", "/api/v5/account/balance", "")
            .unwrap();
        assert_eq!(headers[HEADER_SIMULATED], "1");
    }

    #[test]
    fn test_canonical_string_concatenates_in_order() {
        assert_eq!(
            canonical_string("T", "GET", "/p?a=1&b=2", ""),
            "TGET/p?a=1&b=2"
        );
        assert_eq!(canonical_string("T", "POST", "/p", "{}"), "TPOST/p{}");
    }
}
