//! Market domain: points of sale with opening hours.

pub mod error;
pub mod handlers;
pub mod models;
pub mod service;

pub use error::{MarketError, MarketResult};
pub use handlers::ApiDoc;
pub use models::{CreateMarket, ListMarketsParams, Market, MarketDto, UpdateMarket};
pub use service::{MarketRegistry, MarketService};
