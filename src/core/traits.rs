use crate::core::errors::ExchangeError;
use crate::core::types::{Candle, KlineInterval, MarginMode, OrderParams, PositionSide};
use crate::exchanges::okx::types::{OkxEnvelope, OkxTicker};
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Market queries. Failures degrade to the documented sentinel and are logged.
#[async_trait]
pub trait MarketDataSource {
    /// Last traded price, zero when unavailable
    async fn get_market_price(&self, symbol: &str) -> Decimal;

    /// Candles oldest first, `None` when unavailable
    async fn get_candles(
        &self,
        symbol: &str,
        interval: KlineInterval,
        limit: u32,
    ) -> Option<Vec<Candle>>;

    /// All tickers of an instrument type (e.g. `SWAP`), empty when unavailable
    async fn get_tickers(&self, inst_type: &str) -> Vec<OkxTicker>;
}

#[async_trait]
pub trait AccountInfo {
    /// `(long, short)` cross-margin leverage, `(0, 0)` when unavailable or not configured
    async fn get_leverage(&self, symbol: &str) -> (Decimal, Decimal);

    /// Available balance of `currency` in the trading account, zero when unavailable
    async fn get_trade_balance(&self, currency: &str) -> Decimal;

    /// Move funds from the trading account to the funding account
    async fn transfer_to_funding(&self, currency: &str, amount: Decimal) -> bool;

    async fn set_leverage(
        &self,
        symbol: &str,
        leverage: u32,
        margin_mode: MarginMode,
        position_side: Option<PositionSide>,
    ) -> bool;
}

#[async_trait]
pub trait OrderPlacer {
    /// Order id on success, empty string on failure
    async fn place_order(&self, params: OrderParams) -> String;

    /// Raw envelope for one order; transport exhaustion is reported as an error
    async fn get_order(&self, symbol: &str, order_id: &str) -> Result<OkxEnvelope, ExchangeError>;
}

/// Everything a trading bot needs from one exchange handle
#[async_trait]
pub trait ExchangeConnector: MarketDataSource + OrderPlacer + AccountInfo {}
