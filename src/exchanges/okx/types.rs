use crate::core::errors::ExchangeError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Top-level OKX response: `{"code": "0", "msg": "", "data": [...]}`
///
/// `Default` is the empty envelope: no code, so never a success.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct OkxEnvelope {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub msg: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Vec<Value>,
    /// Top-level fields beyond the three above, e.g. `inTime`/`outTime`
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Envelope decoded once into success payload or business failure
#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome<T> {
    Success(Vec<T>),
    Failure { code: String, msg: String },
}

impl OkxEnvelope {
    pub const SUCCESS_CODE: &'static str = "0";

    pub fn from_value(value: Value) -> Result<Self, ExchangeError> {
        serde_json::from_value(value).map_err(|e| {
            ExchangeError::DeserializationError(format!("Failed to parse OKX envelope: {}", e))
        })
    }

    pub fn is_success(&self) -> bool {
        self.code == Self::SUCCESS_CODE
    }

    /// Decode `data` into `T` on success; on failure keep the code and the
    /// most specific message available (per-item `sMsg` for order endpoints).
    pub fn into_outcome<T: DeserializeOwned>(self) -> Result<ApiOutcome<T>, ExchangeError> {
        if !self.is_success() {
            let item_msgs: Vec<&str> = self
                .data
                .iter()
                .filter_map(|item| item.get("sMsg").and_then(Value::as_str))
                .filter(|m| !m.is_empty())
                .collect();
            let msg = match (self.msg.is_empty(), item_msgs.is_empty()) {
                (_, true) => self.msg.clone(),
                (true, false) => item_msgs.join("; "),
                (false, false) => format!("{} ({})", self.msg, item_msgs.join("; ")),
            };
            return Ok(ApiOutcome::Failure {
                code: self.code,
                msg,
            });
        }

        let items = self
            .data
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<T>, _>>()
            .map_err(|e| {
                ExchangeError::DeserializationError(format!("Failed to parse OKX data: {}", e))
            })?;
        Ok(ApiOutcome::Success(items))
    }
}

/// OKX instrument information
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OkxInstrument {
    pub inst_type: String, // SPOT, MARGIN, SWAP, FUTURES, OPTION
    pub inst_id: String,   // e.g., BTC-USDT-SWAP
    pub ct_val: String,    // Contract value
    pub ct_val_ccy: String,
    pub lever: String,  // Max leverage
    pub tick_sz: String, // Tick size
    pub lot_sz: String,  // Lot size
    pub min_sz: String,  // Minimum order size
    pub state: String,   // live, suspend, preopen, test
}

/// OKX Ticker data
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OkxTicker {
    pub inst_type: String,   // Instrument type
    pub inst_id: String,     // Instrument ID
    pub last: String,        // Last traded price
    pub last_sz: String,     // Last traded size
    pub ask_px: String,      // Best ask price
    pub ask_sz: String,      // Best ask size
    pub bid_px: String,      // Best bid price
    pub bid_sz: String,      // Best bid size
    pub open_24h: String,    // 24h opening price
    pub high_24h: String,    // 24h highest price
    pub low_24h: String,     // 24h lowest price
    pub vol_ccy_24h: String, // 24h volume in quote currency
    pub vol_24h: String,     // 24h volume in base currency
    pub ts: String,          // Timestamp
}

/// OKX candlestick row: `[ts, o, h, l, c, vol, volCcy, volCcyQuote, confirm]`
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OkxKline {
    pub ts: String,            // Timestamp (ms)
    pub o: String,             // Open price
    pub h: String,             // High price
    pub l: String,             // Low price
    pub c: String,             // Close price
    pub vol: String,           // Volume in contracts
    pub vol_ccy: String,       // Volume in base currency
    pub vol_ccy_quote: String, // Volume in quote currency
    pub confirm: String,       // "1" once the bar is closed
}

impl OkxKline {
    /// Rows shorter than the six OHLCV columns are rejected
    pub fn from_row(row: &[String]) -> Option<Self> {
        if row.len() < 6 {
            return None;
        }
        let col = |i: usize| row.get(i).cloned().unwrap_or_default();
        Some(Self {
            ts: col(0),
            o: col(1),
            h: col(2),
            l: col(3),
            c: col(4),
            vol: col(5),
            vol_ccy: col(6),
            vol_ccy_quote: col(7),
            confirm: col(8),
        })
    }
}

/// One row of `/api/v5/account/leverage-info`
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OkxLeverageInfo {
    pub inst_id: String,
    pub mgn_mode: String,
    pub pos_side: String, // long, short, or net in one-way mode
    pub lever: String,
}

/// OKX Account balance detail
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OkxBalance {
    pub ccy: String,        // Currency
    pub eq: String,         // Equity
    pub cash_bal: String,   // Cash balance
    pub avail_eq: String,   // Available equity
    pub avail_bal: String,  // Available balance
    pub frozen_bal: String, // Frozen balance
}

/// OKX Account information
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OkxAccountInfo {
    pub total_eq: String,
    pub u_time: String,
    pub details: Vec<OkxBalance>,
}

/// Account ids used by `/api/v5/asset/transfer`
pub mod account_type {
    pub const FUNDING: &str = "6";
    pub const TRADING: &str = "18";
}

/// Funds transfer request
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OkxTransferRequest {
    pub ccy: String,
    pub amt: String,
    pub from: String,
    pub to: String,
    /// 0: transfer within the account
    #[serde(rename = "type")]
    pub transfer_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OkxTransferResponse {
    pub trans_id: String,
    pub ccy: String,
    pub amt: String,
    pub from: String,
    pub to: String,
    pub client_id: String,
}

/// Leverage change request
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OkxSetLeverageRequest {
    pub inst_id: String,
    pub lever: String,
    pub mgn_mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos_side: Option<String>,
}

/// OKX Order request
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OkxOrderRequest {
    pub inst_id: String,  // Instrument ID
    pub td_mode: String,  // Trade mode: cash, cross, isolated
    pub side: String,     // Order side: buy, sell
    pub ord_type: String, // Order type: market, limit, post_only, fok, ioc
    pub sz: String,       // Quantity to buy or sell
    #[serde(skip_serializing_if = "Option::is_none")]
    pub px: Option<String>, // Order price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos_side: Option<String>, // Position side, hedge mode only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduce_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cl_ord_id: Option<String>, // Client order ID
}

/// OKX Order response
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct OkxOrderResponse {
    pub ord_id: String,    // Order ID
    pub cl_ord_id: String, // Client order ID
    pub tag: String,       // Order tag
    pub s_code: String,    // Per-order result code
    pub s_msg: String,     // Per-order result message
}
