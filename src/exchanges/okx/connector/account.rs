use crate::core::kernel::RestClient;
use crate::core::traits::AccountInfo;
use crate::core::types::{MarginMode, PositionSide};
use crate::exchanges::okx::{conversions, rest::OkxRest, types::OkxSetLeverageRequest};
use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{debug, error, info, instrument, warn};

/// OKX account implementation
pub struct Account<R: RestClient> {
    rest: OkxRest<R>,
}

impl<R: RestClient + Clone> Account<R> {
    pub fn new(rest: &R) -> Self {
        Self {
            rest: OkxRest::new(rest.clone()),
        }
    }
}

#[async_trait]
impl<R: RestClient + Send + Sync> AccountInfo for Account<R> {
    #[instrument(skip(self), fields(exchange = "okx"))]
    async fn get_leverage(&self, symbol: &str) -> (Decimal, Decimal) {
        match self
            .rest
            .get_leverage_info(symbol, MarginMode::Cross.as_str())
            .await
        {
            Ok(rows) => {
                // No rows is a valid "nothing configured" state
                let (long, short) = conversions::convert_leverage_info(&rows);
                debug!("{} leverage long: {}, short: {}", symbol, long, short);
                (long, short)
            }
            Err(e) => {
                error!("Failed to get leverage for {}: {}", symbol, e);
                (Decimal::ZERO, Decimal::ZERO)
            }
        }
    }

    #[instrument(skip(self), fields(exchange = "okx"))]
    async fn get_trade_balance(&self, currency: &str) -> Decimal {
        let account = match self.rest.get_balance(Some(currency)).await {
            Ok(account) => account,
            Err(e) => {
                error!("Failed to get {} balance: {}", currency, e);
                return Decimal::ZERO;
            }
        };

        match conversions::find_available_balance(&account, currency) {
            Ok(Some(balance)) => {
                debug!("{} available balance: {}", currency, balance);
                balance
            }
            Ok(None) => {
                warn!("No {} balance reported", currency);
                Decimal::ZERO
            }
            Err(e) => {
                error!("Failed to parse {} balance: {}", currency, e);
                Decimal::ZERO
            }
        }
    }

    #[instrument(skip(self), fields(exchange = "okx"))]
    async fn transfer_to_funding(&self, currency: &str, amount: Decimal) -> bool {
        let amt = amount.normalize().to_string();
        match self.rest.transfer_to_funding(currency, &amt).await {
            Ok(response) => {
                info!(
                    "Transferred {} {} to funding account (transId {})",
                    amt, currency, response.trans_id
                );
                true
            }
            Err(e) => {
                error!("Transfer of {} {} to funding account failed: {}", amt, currency, e);
                false
            }
        }
    }

    #[instrument(skip(self), fields(exchange = "okx"))]
    async fn set_leverage(
        &self,
        symbol: &str,
        leverage: u32,
        margin_mode: MarginMode,
        position_side: Option<PositionSide>,
    ) -> bool {
        let request = OkxSetLeverageRequest {
            inst_id: symbol.to_string(),
            lever: leverage.to_string(),
            mgn_mode: margin_mode.as_str().to_string(),
            pos_side: position_side.map(|side| side.as_str().to_string()),
        };

        match self.rest.set_leverage(&request).await {
            Ok(_) => {
                info!("{} leverage set to {}x ({})", symbol, leverage, margin_mode.as_str());
                true
            }
            Err(e) => {
                error!("Failed to set {} leverage to {}x: {}", symbol, leverage, e);
                false
            }
        }
    }
}
