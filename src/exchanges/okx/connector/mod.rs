use crate::core::errors::ExchangeError;
use crate::core::traits::{AccountInfo, ExchangeConnector, MarketDataSource, OrderPlacer};
use crate::core::types::{Candle, KlineInterval, MarginMode, OrderParams, PositionSide};
use crate::core::{config::ExchangeConfig, kernel::RestClient};
use crate::exchanges::okx::types::{OkxEnvelope, OkxTicker};
use async_trait::async_trait;
use rust_decimal::Decimal;

pub mod account;
pub mod market_data;
pub mod trading;

pub use account::Account;
pub use market_data::MarketData;
pub use trading::Trading;

/// OKX connector that composes all sub-trait implementations
///
/// Holds no mutable state: every call is independent and the connector can
/// be shared across tasks behind an `Arc`.
pub struct OkxConnector<R: RestClient> {
    pub market: MarketData<R>,
    pub trading: Trading<R>,
    pub account: Account<R>,
}

impl<R: RestClient + Clone + Send + Sync> OkxConnector<R> {
    pub fn new(rest: R, config: &ExchangeConfig) -> Self {
        Self {
            market: MarketData::new(&rest),
            trading: Trading::new(&rest, config.hedge_mode),
            account: Account::new(&rest),
        }
    }

    pub async fn get_min_order_amount(&self, symbol: &str) -> Option<(Decimal, Decimal)> {
        self.market.get_min_order_amount(symbol).await
    }
}

#[async_trait]
impl<R: RestClient + Clone + Send + Sync> MarketDataSource for OkxConnector<R> {
    async fn get_market_price(&self, symbol: &str) -> Decimal {
        self.market.get_market_price(symbol).await
    }

    async fn get_candles(
        &self,
        symbol: &str,
        interval: KlineInterval,
        limit: u32,
    ) -> Option<Vec<Candle>> {
        self.market.get_candles(symbol, interval, limit).await
    }

    async fn get_tickers(&self, inst_type: &str) -> Vec<OkxTicker> {
        self.market.get_tickers(inst_type).await
    }
}

#[async_trait]
impl<R: RestClient + Clone + Send + Sync> AccountInfo for OkxConnector<R> {
    async fn get_leverage(&self, symbol: &str) -> (Decimal, Decimal) {
        self.account.get_leverage(symbol).await
    }

    async fn get_trade_balance(&self, currency: &str) -> Decimal {
        self.account.get_trade_balance(currency).await
    }

    async fn transfer_to_funding(&self, currency: &str, amount: Decimal) -> bool {
        self.account.transfer_to_funding(currency, amount).await
    }

    async fn set_leverage(
        &self,
        symbol: &str,
        leverage: u32,
        margin_mode: MarginMode,
        position_side: Option<PositionSide>,
    ) -> bool {
        self.account
            .set_leverage(symbol, leverage, margin_mode, position_side)
            .await
    }
}

#[async_trait]
impl<R: RestClient + Clone + Send + Sync> OrderPlacer for OkxConnector<R> {
    async fn place_order(&self, params: OrderParams) -> String {
        self.trading.place_order(params).await
    }

    async fn get_order(&self, symbol: &str, order_id: &str) -> Result<OkxEnvelope, ExchangeError> {
        self.trading.get_order(symbol, order_id).await
    }
}

impl<R: RestClient + Clone + Send + Sync> ExchangeConnector for OkxConnector<R> {}
