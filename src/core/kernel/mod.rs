/// Transport kernel: request signing, clocks, retry and the signed REST engine.
///
/// The kernel knows nothing about OKX endpoints or envelopes. The exchange
/// layer plugs in a [`Signer`] and decodes the JSON this layer returns.
///
/// # Example
/// ```rust,no_run
/// use okx_client::core::kernel::*;
/// use okx_client::exchanges::okx::signer::OkxSigner;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let signer = Arc::new(OkxSigner::new(
///     "api_key".to_string(),
///     "secret_key".to_string(),
///     "passphrase".to_string(),
/// ));
/// let rest = RestClientBuilder::new(RestClientConfig::new(
///     "https://www.okx.com".to_string(),
///     "okx".to_string(),
/// ))
/// .with_signer(signer)
/// .build()?;
///
/// let envelope = rest
///     .get("/api/v5/market/ticker", &[("instId", "BTC-USDT-SWAP")])
///     .await?;
/// println!("{}", envelope);
/// # Ok(())
/// # }
/// ```
pub mod clock;
pub mod rest;
pub mod retry;
pub mod signer;

// Re-export key types for convenience
pub use clock::{format_timestamp, Clock, FixedClock, SystemClock};
pub use rest::{build_request_path, ReqwestRest, RestClient, RestClientBuilder, RestClientConfig};
pub use retry::{Backoff, RetryPolicy};
pub use signer::{hmac_sha256_base64, SignatureResult, Signer};
