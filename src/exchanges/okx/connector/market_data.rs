use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::MarketDataSource;
use crate::core::types::{Candle, KlineInterval};
use crate::exchanges::okx::{conversions, rest::OkxRest, types::OkxTicker};
use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{debug, error, instrument, warn};

/// OKX market data implementation
pub struct MarketData<R: RestClient> {
    rest: OkxRest<R>,
}

impl<R: RestClient + Clone> MarketData<R> {
    pub fn new(rest: &R) -> Self {
        Self {
            rest: OkxRest::new(rest.clone()),
        }
    }
}

#[async_trait]
impl<R: RestClient + Send + Sync> MarketDataSource for MarketData<R> {
    #[instrument(skip(self), fields(exchange = "okx"))]
    async fn get_market_price(&self, symbol: &str) -> Decimal {
        let price = self.rest.get_ticker(symbol).await.and_then(|ticker| {
            conversions::parse_decimal("last", &ticker.last)
                .map_err(ExchangeError::InvalidResponseFormat)
        });

        match price {
            Ok(price) => {
                debug!("{} last price: {}", symbol, price);
                price
            }
            Err(e) => {
                error!("Failed to get market price for {}: {}", symbol, e);
                Decimal::ZERO
            }
        }
    }

    #[instrument(skip(self), fields(exchange = "okx"))]
    async fn get_candles(
        &self,
        symbol: &str,
        interval: KlineInterval,
        limit: u32,
    ) -> Option<Vec<Candle>> {
        let klines = match self
            .rest
            .get_candlesticks(symbol, interval.to_okx_format(), limit)
            .await
        {
            Ok(klines) => klines,
            Err(e) => {
                error!("Failed to get candles for {}: {}", symbol, e);
                return None;
            }
        };

        match conversions::convert_okx_klines(&klines) {
            Ok(candles) => {
                debug!("{} fetched {} candles", symbol, candles.len());
                Some(candles)
            }
            Err(e) => {
                error!("Failed to convert candles for {}: {}", symbol, e);
                None
            }
        }
    }

    #[instrument(skip(self), fields(exchange = "okx"))]
    async fn get_tickers(&self, inst_type: &str) -> Vec<OkxTicker> {
        self.rest.get_tickers(inst_type).await.unwrap_or_else(|e| {
            error!("Failed to get {} tickers: {}", inst_type, e);
            Vec::new()
        })
    }
}

impl<R: RestClient + Send + Sync> MarketData<R> {
    /// Minimum order for a perpetual swap as `(contracts, coin amount)`
    #[instrument(skip(self), fields(exchange = "okx"))]
    pub async fn get_min_order_amount(&self, symbol: &str) -> Option<(Decimal, Decimal)> {
        let instruments = match self.rest.get_instruments("SWAP").await {
            Ok(instruments) => instruments,
            Err(e) => {
                error!("Failed to get instruments: {}", e);
                return None;
            }
        };

        let Some(instrument) = instruments.iter().find(|i| i.inst_id == symbol) else {
            warn!("Instrument {} not listed", symbol);
            return None;
        };

        conversions::convert_min_order(instrument)
            .map_err(|e| error!("Failed to read minimum order for {}: {}", symbol, e))
            .ok()
    }
}
