use anyhow::Context;
use okx_client::core::config::{ExchangeConfig, RuntimeFlags};
use okx_client::core::traits::{AccountInfo, MarketDataSource};
use okx_client::{KlineInterval, OkxBuilder};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // Missing credentials stop the process before any request is sent
    #[cfg(feature = "env-file")]
    let config = ExchangeConfig::from_env_file("OKX");
    #[cfg(not(feature = "env-file"))]
    let config = ExchangeConfig::from_env("OKX");
    let mut config = config.context("loading OKX credentials")?;
    if let Ok(path) = std::env::var("STRATEGY_CONFIG") {
        let flags = RuntimeFlags::from_json_file(&path)
            .with_context(|| format!("loading settings from {}", path))?;
        config = config.with_runtime_flags(&flags);
    }

    let okx = OkxBuilder::new().with_config(config).build()?;
    let symbol = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "BTC-USDT-SWAP".to_string());

    let price = okx.get_market_price(&symbol).await;
    println!("{} last price: {}", symbol, price);

    if let Some(candles) = okx.get_candles(&symbol, KlineInterval::Hours1, 5).await {
        for candle in candles {
            println!(
                "{} o={} h={} l={} c={} v={}",
                candle.ts, candle.open, candle.high, candle.low, candle.close, candle.volume
            );
        }
    }

    let (long, short) = okx.get_leverage(&symbol).await;
    println!("{} leverage long: {}x short: {}x", symbol, long, short);

    let balance = okx.get_trade_balance("USDT").await;
    println!("USDT available: {}", balance);

    Ok(())
}
