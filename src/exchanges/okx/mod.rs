pub mod conversions;
pub mod signer;
pub mod types;

pub mod builder;
pub mod connector;
pub mod rest;

// Re-export main components
pub use builder::{build_connector, OkxBuilder};
pub use connector::{Account, MarketData, OkxConnector, Trading};
pub use rest::{map_okx_error, OkxRest};
pub use signer::OkxSigner;
pub use types::{
    ApiOutcome, OkxAccountInfo, OkxBalance, OkxEnvelope, OkxInstrument, OkxKline,
    OkxLeverageInfo, OkxOrderRequest, OkxOrderResponse, OkxTicker, OkxTransferResponse,
};
