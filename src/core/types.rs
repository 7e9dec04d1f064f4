use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TypesError {
    #[error("Invalid direction: {0}")]
    InvalidDirection(String),
    #[error("Invalid order type: {0}")]
    InvalidOrderType(String),
    #[error("Invalid kline interval: {0}")]
    InvalidInterval(String),
}

/// Trading intent as the strategy expresses it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub const fn side(self) -> OrderSide {
        match self {
            Self::Long => OrderSide::Buy,
            Self::Short => OrderSide::Sell,
        }
    }

    pub const fn position_side(self) -> PositionSide {
        match self {
            Self::Long => PositionSide::Long,
            Self::Short => PositionSide::Short,
        }
    }
}

impl FromStr for Direction {
    type Err = TypesError;

    /// Accepts both the strategy vocabulary (`long`/`short`) and the order vocabulary (`buy`/`sell`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "long" | "buy" => Ok(Self::Long),
            "short" | "sell" => Ok(Self::Short),
            other => Err(TypesError::InvalidDirection(other.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Long => write!(f, "long"),
            Self::Short => write!(f, "short"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionSide {
    Long,
    Short,
}

impl PositionSide {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Long => "long",
            Self::Short => "short",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    #[default]
    Market,
    Limit,
    PostOnly,
    Fok,
    Ioc,
}

impl OrderType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Market => "market",
            Self::Limit => "limit",
            Self::PostOnly => "post_only",
            Self::Fok => "fok",
            Self::Ioc => "ioc",
        }
    }

    /// Every type except market rests at (or is bounded by) a price
    pub const fn requires_price(self) -> bool {
        !matches!(self, Self::Market)
    }
}

impl FromStr for OrderType {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "market" => Ok(Self::Market),
            "limit" => Ok(Self::Limit),
            "post_only" => Ok(Self::PostOnly),
            "fok" => Ok(Self::Fok),
            "ioc" => Ok(Self::Ioc),
            other => Err(TypesError::InvalidOrderType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarginMode {
    #[default]
    Cross,
    Isolated,
}

impl MarginMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cross => "cross",
            Self::Isolated => "isolated",
        }
    }
}

/// Everything needed to place one order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderParams {
    pub symbol: String,
    pub direction: Direction,
    /// Number of contracts
    pub size: Decimal,
    pub order_type: OrderType,
    pub price: Option<Decimal>,
    pub reduce_only: bool,
}

impl OrderParams {
    pub fn market(symbol: impl Into<String>, direction: Direction, size: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            direction,
            size,
            order_type: OrderType::Market,
            price: None,
            reduce_only: false,
        }
    }

    pub fn limit(
        symbol: impl Into<String>,
        direction: Direction,
        size: Decimal,
        price: Decimal,
    ) -> Self {
        Self {
            order_type: OrderType::Limit,
            price: Some(price),
            ..Self::market(symbol, direction, size)
        }
    }

    #[must_use]
    pub const fn reduce_only(mut self, reduce_only: bool) -> Self {
        self.reduce_only = reduce_only;
        self
    }
}

/// One OHLCV bar with numeric fields and a calendar timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candle {
    pub ts: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

/// Candle granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KlineInterval {
    Minutes1,
    Minutes3,
    Minutes5,
    Minutes15,
    Minutes30,
    Hours1,
    Hours2,
    Hours4,
    Hours6,
    Hours12,
    Days1,
    Weeks1,
    Months1,
}

impl KlineInterval {
    /// OKX `bar` code. Hour and longer bars are upper-case on OKX.
    pub const fn to_okx_format(self) -> &'static str {
        match self {
            Self::Minutes1 => "1m",
            Self::Minutes3 => "3m",
            Self::Minutes5 => "5m",
            Self::Minutes15 => "15m",
            Self::Minutes30 => "30m",
            Self::Hours1 => "1H",
            Self::Hours2 => "2H",
            Self::Hours4 => "4H",
            Self::Hours6 => "6H",
            Self::Hours12 => "12H",
            Self::Days1 => "1D",
            Self::Weeks1 => "1W",
            Self::Months1 => "1M",
        }
    }
}

impl FromStr for KlineInterval {
    type Err = TypesError;

    /// Parses OKX codes and the common lower-case spellings (`1h`, `4h`, `1d`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let interval = match s {
            "1m" => Self::Minutes1,
            "3m" => Self::Minutes3,
            "5m" => Self::Minutes5,
            "15m" => Self::Minutes15,
            "30m" => Self::Minutes30,
            "1H" | "1h" => Self::Hours1,
            "2H" | "2h" => Self::Hours2,
            "4H" | "4h" => Self::Hours4,
            "6H" | "6h" => Self::Hours6,
            "12H" | "12h" => Self::Hours12,
            "1D" | "1d" => Self::Days1,
            "1W" | "1w" => Self::Weeks1,
            "1M" => Self::Months1,
            other => return Err(TypesError::InvalidInterval(other.to_string())),
        };
        Ok(interval)
    }
}

impl fmt::Display for KlineInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_okx_format())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_maps_to_side_and_position_side() {
        let long: Direction = "long".parse().unwrap();
        assert_eq!(long.side(), OrderSide::Buy);
        assert_eq!(long.position_side(), PositionSide::Long);

        let short: Direction = "short".parse().unwrap();
        assert_eq!(short.side(), OrderSide::Sell);
        assert_eq!(short.position_side(), PositionSide::Short);
    }

    #[test]
    fn test_direction_accepts_order_vocabulary() {
        assert_eq!("BUY".parse::<Direction>().unwrap(), Direction::Long);
        assert_eq!("sell".parse::<Direction>().unwrap(), Direction::Short);
        assert!("flat".parse::<Direction>().is_err());
    }

    #[test]
    fn test_only_market_orders_skip_price() {
        assert!(!OrderType::Market.requires_price());
        assert!(OrderType::Limit.requires_price());
        assert!(OrderType::PostOnly.requires_price());
        assert_eq!("post_only".parse::<OrderType>().unwrap(), OrderType::PostOnly);
    }

    #[test]
    fn test_interval_codes() {
        assert_eq!(KlineInterval::Hours1.to_okx_format(), "1H");
        assert_eq!(KlineInterval::Minutes15.to_okx_format(), "15m");
        assert_eq!("1h".parse::<KlineInterval>().unwrap(), KlineInterval::Hours1);
        // 1m and 1M are different bars
        assert_eq!("1M".parse::<KlineInterval>().unwrap(), KlineInterval::Months1);
        assert_eq!("1m".parse::<KlineInterval>().unwrap(), KlineInterval::Minutes1);
    }

    #[test]
    fn test_limit_order_params() {
        let params = OrderParams::limit(
            "BTC-USDT-SWAP",
            Direction::Long,
            Decimal::from(2),
            Decimal::from(65_000),
        )
        .reduce_only(true);
        assert_eq!(params.order_type, OrderType::Limit);
        assert_eq!(params.price, Some(Decimal::from(65_000)));
        assert!(params.reduce_only);
    }
}
