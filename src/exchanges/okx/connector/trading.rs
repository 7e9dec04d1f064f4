use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::OrderPlacer;
use crate::core::types::OrderParams;
use crate::exchanges::okx::{conversions, rest::OkxRest, types::OkxEnvelope};
use async_trait::async_trait;
use tracing::{debug, error, info, instrument};

/// OKX trading implementation
pub struct Trading<R: RestClient> {
    rest: OkxRest<R>,
    hedge_mode: bool,
}

impl<R: RestClient + Clone> Trading<R> {
    pub fn new(rest: &R, hedge_mode: bool) -> Self {
        Self {
            rest: OkxRest::new(rest.clone()),
            hedge_mode,
        }
    }
}

#[async_trait]
impl<R: RestClient + Send + Sync> OrderPlacer for Trading<R> {
    #[instrument(skip(self, params), fields(exchange = "okx", symbol = %params.symbol))]
    async fn place_order(&self, params: OrderParams) -> String {
        let tag = conversions::reduce_only_tag(params.reduce_only);

        let result = match conversions::convert_order_params(&params, self.hedge_mode) {
            Ok(request) => self.rest.place_order(&request).await,
            Err(msg) => Err(ExchangeError::InvalidParameters(msg)),
        };

        match result {
            Ok(response) => {
                info!(
                    "Order placed: {} {} {} contracts{} order id: {}",
                    params.symbol, params.direction, params.size, tag, response.ord_id
                );
                response.ord_id
            }
            Err(e) => {
                error!(
                    "Order failed: {} {} {} contracts{}: {}",
                    params.symbol, params.direction, params.size, tag, e
                );
                String::new()
            }
        }
    }

    #[instrument(skip(self), fields(exchange = "okx"))]
    async fn get_order(&self, symbol: &str, order_id: &str) -> Result<OkxEnvelope, ExchangeError> {
        let envelope = self.rest.get_order(symbol, order_id).await?;
        debug!("{} order {} lookup: {:?}", symbol, order_id, envelope);
        Ok(envelope)
    }
}
