use super::types as okx_types;
use crate::core::types::{Candle, OrderParams};
use chrono::DateTime;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Trade mode used for every order: cross margin
pub const TRADE_MODE: &str = "cross";

pub fn parse_decimal(field: &str, raw: &str) -> Result<Decimal, String> {
    Decimal::from_str(raw.trim())
        .or_else(|_| Decimal::from_scientific(raw.trim()))
        .map_err(|e| format!("Invalid {} '{}': {}", field, raw, e))
}

/// Convert OKX kline to core candle type
pub fn convert_okx_kline(okx_kline: &okx_types::OkxKline) -> Result<Candle, String> {
    let millis = okx_kline
        .ts
        .parse::<i64>()
        .map_err(|e| format!("Failed to parse timestamp '{}': {}", okx_kline.ts, e))?;
    let ts = DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| format!("Timestamp out of range: {}", millis))?;

    Ok(Candle {
        ts,
        open: parse_decimal("open", &okx_kline.o)?,
        high: parse_decimal("high", &okx_kline.h)?,
        low: parse_decimal("low", &okx_kline.l)?,
        close: parse_decimal("close", &okx_kline.c)?,
        volume: parse_decimal("volume", &okx_kline.vol)?,
    })
}

/// Convert a batch of klines, oldest first. OKX returns newest first.
pub fn convert_okx_klines(okx_klines: &[okx_types::OkxKline]) -> Result<Vec<Candle>, String> {
    let mut candles = okx_klines
        .iter()
        .map(convert_okx_kline)
        .collect::<Result<Vec<_>, _>>()?;
    candles.sort_by_key(|candle| candle.ts);
    Ok(candles)
}

/// Fold leverage rows into `(long, short)`.
///
/// Hedge accounts report one row per position side; one-way accounts
/// report a single `net` row that applies to both. Sides without a row,
/// or with an unparseable lever, are zero.
pub fn convert_leverage_info(rows: &[okx_types::OkxLeverageInfo]) -> (Decimal, Decimal) {
    let mut long = Decimal::ZERO;
    let mut short = Decimal::ZERO;
    for row in rows {
        let Ok(lever) = parse_decimal("lever", &row.lever) else {
            continue;
        };
        match row.pos_side.as_str() {
            "long" => long = lever,
            "short" => short = lever,
            "net" | "" => {
                long = lever;
                short = lever;
            }
            _ => {}
        }
    }
    (long, short)
}

/// Available balance for `currency`, if the account reports it
pub fn find_available_balance(
    account: &okx_types::OkxAccountInfo,
    currency: &str,
) -> Result<Option<Decimal>, String> {
    account
        .details
        .iter()
        .find(|detail| detail.ccy.eq_ignore_ascii_case(currency))
        .map(|detail| parse_decimal("availBal", &detail.avail_bal))
        .transpose()
}

/// Minimum order as `(contracts, coin amount)` where the coin amount is `minSz * ctVal`
pub fn convert_min_order(instrument: &okx_types::OkxInstrument) -> Result<(Decimal, Decimal), String> {
    let min_sz = parse_decimal("minSz", &instrument.min_sz)?;
    let ct_val = parse_decimal("ctVal", &instrument.ct_val)?;
    Ok((min_sz, min_sz * ct_val))
}

/// Build the OKX order body. `posSide` is attached only in hedge mode; one-way
/// accounts reject it.
pub fn convert_order_params(
    params: &OrderParams,
    hedge_mode: bool,
) -> Result<okx_types::OkxOrderRequest, String> {
    let px = if params.order_type.requires_price() {
        match params.price {
            Some(price) => Some(price.normalize().to_string()),
            None => {
                return Err(format!(
                    "{} order for {} requires a price",
                    params.order_type.as_str(),
                    params.symbol
                ))
            }
        }
    } else {
        None
    };

    Ok(okx_types::OkxOrderRequest {
        inst_id: params.symbol.clone(),
        td_mode: TRADE_MODE.to_string(),
        side: params.direction.side().as_str().to_string(),
        ord_type: params.order_type.as_str().to_string(),
        sz: params.size.normalize().to_string(),
        px,
        pos_side: hedge_mode.then(|| params.direction.position_side().as_str().to_string()),
        reduce_only: params.reduce_only.then_some(true),
        cl_ord_id: None,
    })
}

/// Suffix used in order log lines
pub const fn reduce_only_tag(reduce_only: bool) -> &'static str {
    if reduce_only {
        " [reduceOnly]"
    } else {
        ""
    }
}
