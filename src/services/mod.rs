//! Service Layer
//!
//! Access to the remote stock API and the tokio runtime it runs on.
//!
//! ```text
//! StocksController ──▶ dyn StockProvider ──▶ HttpStockProvider ──▶ HTTP API
//!                                               (reqwest, tokio)
//! ```

mod http;
mod provider;
mod runtime;

pub use http::*;
pub use provider::*;
pub use runtime::*;
