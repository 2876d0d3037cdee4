//! Market data module - last prices consumed by the valuation engine.

mod market_data_model;
mod market_data_traits;
mod market_price_table;

pub use market_data_model::MarketQuote;
pub use market_data_traits::MarketPriceLookupTrait;
pub use market_price_table::MarketPriceTable;
