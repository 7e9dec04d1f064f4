use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::exchanges::okx::types::{
    account_type, ApiOutcome, OkxAccountInfo, OkxEnvelope, OkxInstrument, OkxKline,
    OkxLeverageInfo, OkxOrderRequest, OkxOrderResponse, OkxSetLeverageRequest, OkxTicker,
    OkxTransferRequest, OkxTransferResponse,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// OKX REST API client implementation
///
/// Each method encodes one endpoint. Business failures come back as
/// `Err`, mapped from the envelope's code; sentinel handling lives in the
/// connector components.
#[derive(Debug, Clone)]
pub struct OkxRest<R: RestClient> {
    rest_client: R,
}

/// Maps OKX error codes to appropriate `ExchangeError` variants
pub fn map_okx_error(code: &str, message: &str) -> ExchangeError {
    match code {
        // Authentication errors
        "50100" | "50101" | "50102" | "50103" | "50104" | "50105" | "50111" | "50113" => {
            ExchangeError::AuthError(format!("{} - {}", code, message))
        }

        // Rate limit errors
        "50011" | "50061" => {
            ExchangeError::RateLimitExceeded(format!("OKX rate limit exceeded: {} - {}", code, message))
        }

        // Server errors
        "50001" | "50013" | "50026" => {
            ExchangeError::ServerError(format!("OKX server error: {} - {}", code, message))
        }

        "51000" => ExchangeError::InvalidParameters(format!("Parameter error: {}", message)),
        "51008" => ExchangeError::InvalidParameters(format!("Insufficient balance: {}", message)),

        // Default case - generic API error
        _ => ExchangeError::ApiError {
            code: code.parse().unwrap_or(-1),
            message: message.to_string(),
        },
    }
}

impl<R: RestClient> OkxRest<R> {
    pub fn new(rest_client: R) -> Self {
        Self { rest_client }
    }

    /// Decode the envelope and surface business failures as errors
    fn handle_response<T>(&self, response_value: Value) -> Result<Vec<T>, ExchangeError>
    where
        T: DeserializeOwned,
    {
        match OkxEnvelope::from_value(response_value)?.into_outcome()? {
            ApiOutcome::Success(items) => Ok(items),
            ApiOutcome::Failure { code, msg } => Err(map_okx_error(&code, &msg)),
        }
    }

    /// Like `handle_response`, keeping only the first item
    fn handle_single_item_response<T>(
        &self,
        response_value: Value,
        error_msg: &str,
    ) -> Result<T, ExchangeError>
    where
        T: DeserializeOwned,
    {
        self.handle_response(response_value)?
            .into_iter()
            .next()
            .ok_or_else(|| ExchangeError::InvalidResponseFormat(error_msg.to_string()))
    }

    fn to_body<T: Serialize>(body: &T) -> Result<Value, ExchangeError> {
        serde_json::to_value(body).map_err(|e| ExchangeError::SerializationError(e.to_string()))
    }

    /// Get ticker information
    pub async fn get_ticker(&self, inst_id: &str) -> Result<OkxTicker, ExchangeError> {
        let endpoint = "/api/v5/market/ticker";
        let query_params = &[("instId", inst_id)];

        let response_value = self.rest_client.get(endpoint, query_params).await?;
        self.handle_single_item_response(response_value, "No ticker data found")
    }

    /// Get all tickers
    pub async fn get_tickers(&self, inst_type: &str) -> Result<Vec<OkxTicker>, ExchangeError> {
        let endpoint = "/api/v5/market/tickers";
        let query_params = &[("instType", inst_type)];

        let response_value = self.rest_client.get(endpoint, query_params).await?;
        self.handle_response(response_value)
    }

    /// Get trading instruments
    pub async fn get_instruments(
        &self,
        inst_type: &str,
    ) -> Result<Vec<OkxInstrument>, ExchangeError> {
        let endpoint = "/api/v5/public/instruments";
        let query_params = &[("instType", inst_type)];

        let response_value = self.rest_client.get(endpoint, query_params).await?;
        self.handle_response(response_value)
    }

    /// Get candlestick data, newest first as OKX returns it
    pub async fn get_candlesticks(
        &self,
        inst_id: &str,
        bar: &str,
        limit: u32,
    ) -> Result<Vec<OkxKline>, ExchangeError> {
        let endpoint = "/api/v5/market/candles";
        let limit_str = limit.to_string();
        let query_params = &[("instId", inst_id), ("bar", bar), ("limit", limit_str.as_str())];

        let response_value = self.rest_client.get(endpoint, query_params).await?;
        let rows: Vec<Vec<String>> = self.handle_response(response_value)?;

        rows.iter()
            .map(|row| {
                OkxKline::from_row(row).ok_or_else(|| {
                    ExchangeError::InvalidResponseFormat(format!(
                        "Candle row has {} columns",
                        row.len()
                    ))
                })
            })
            .collect()
    }

    /// Get leverage settings for an instrument
    pub async fn get_leverage_info(
        &self,
        inst_id: &str,
        mgn_mode: &str,
    ) -> Result<Vec<OkxLeverageInfo>, ExchangeError> {
        let endpoint = "/api/v5/account/leverage-info";
        let query_params = &[("instId", inst_id), ("mgnMode", mgn_mode)];

        let response_value = self.rest_client.get(endpoint, query_params).await?;
        self.handle_response(response_value)
    }

    pub async fn set_leverage(
        &self,
        request: &OkxSetLeverageRequest,
    ) -> Result<Vec<OkxLeverageInfo>, ExchangeError> {
        let endpoint = "/api/v5/account/set-leverage";
        let body = Self::to_body(request)?;

        let response_value = self.rest_client.post(endpoint, &body).await?;
        self.handle_response(response_value)
    }

    /// Get account balance
    pub async fn get_balance(&self, ccy: Option<&str>) -> Result<OkxAccountInfo, ExchangeError> {
        let endpoint = "/api/v5/account/balance";
        let query_params = ccy.map_or_else(Vec::new, |currency| vec![("ccy", currency)]);

        let response_value = self.rest_client.get(endpoint, &query_params).await?;
        self.handle_single_item_response(response_value, "No account data found")
    }

    /// Transfer from the trading account to the funding account
    pub async fn transfer_to_funding(
        &self,
        ccy: &str,
        amt: &str,
    ) -> Result<OkxTransferResponse, ExchangeError> {
        let endpoint = "/api/v5/asset/transfer";
        let request = OkxTransferRequest {
            ccy: ccy.to_string(),
            amt: amt.to_string(),
            from: account_type::TRADING.to_string(),
            to: account_type::FUNDING.to_string(),
            transfer_type: "0".to_string(),
            client_id: None,
        };
        let body = Self::to_body(&request)?;

        let response_value = self.rest_client.post(endpoint, &body).await?;
        self.handle_single_item_response(response_value, "No transfer response data found")
    }

    /// Place a new order
    pub async fn place_order(
        &self,
        order: &OkxOrderRequest,
    ) -> Result<OkxOrderResponse, ExchangeError> {
        let endpoint = "/api/v5/trade/order";
        let body = Self::to_body(order)?;

        let response_value = self.rest_client.post(endpoint, &body).await?;
        let response: OkxOrderResponse =
            self.handle_single_item_response(response_value, "No order response data found")?;

        // Batch-level success can still carry a per-order rejection
        if !response.s_code.is_empty() && response.s_code != OkxEnvelope::SUCCESS_CODE {
            return Err(map_okx_error(&response.s_code, &response.s_msg));
        }
        Ok(response)
    }

    /// Get order details as the raw envelope
    pub async fn get_order(&self, inst_id: &str, ord_id: &str) -> Result<OkxEnvelope, ExchangeError> {
        let endpoint = "/api/v5/trade/order";
        let query_params = &[("instId", inst_id), ("ordId", ord_id)];

        let response_value = self.rest_client.get(endpoint, query_params).await?;
        OkxEnvelope::from_value(response_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_okx_error_classifies_codes() {
        assert!(matches!(map_okx_error("50113", "Invalid Sign"), ExchangeError::AuthError(_)));
        assert!(matches!(
            map_okx_error("50011", "Too Many Requests"),
            ExchangeError::RateLimitExceeded(_)
        ));
        assert!(matches!(
            map_okx_error("51008", "Insufficient balance"),
            ExchangeError::InvalidParameters(ref m) if m.contains("Insufficient balance")
        ));
        match map_okx_error("1", "Insufficient balance") {
            ExchangeError::ApiError { code, message } => {
                assert_eq!(code, 1);
                assert_eq!(message, "Insufficient balance");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unparseable_code_maps_to_minus_one() {
        assert!(matches!(
            map_okx_error("", "no code"),
            ExchangeError::ApiError { code: -1, .. }
        ));
    }
}
