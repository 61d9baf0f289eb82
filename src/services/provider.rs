//! StockProvider - Remote Data Provider Abstraction
//!
//! The coordinator only talks to this trait, so tests and alternative
//! transports can stand in for the HTTP client.

use async_trait::async_trait;

use crate::domain::metric::{Metric, SortOrder};
use crate::domain::query::StockQuery;
use crate::domain::stock::{HistoricalBar, Stock, StockDetail};
use crate::error::Result;

/// Read operations offered by the remote data provider
#[async_trait]
pub trait StockProvider: Send + Sync {
    /// Every row, in provider order
    async fn fetch_all(&self) -> Result<Vec<Stock>>;

    /// Rows matching free-form text
    async fn search(&self, query: &str) -> Result<Vec<Stock>>;

    /// Every row ordered by `field`; `None` sends an empty field name
    async fn sort(&self, field: Option<Metric>, order: SortOrder) -> Result<Vec<Stock>>;

    /// Rows inside the given `(parameter, value)` bounds
    async fn filter(&self, bounds: &[(String, f64)]) -> Result<Vec<Stock>>;

    /// Full document for one ticker
    async fn stock(&self, ticker: &str) -> Result<StockDetail>;

    /// Price history for one ticker
    async fn history(&self, ticker: &str) -> Result<Vec<HistoricalBar>>;

    /// Dispatch a list query to the matching operation
    async fn execute(&self, query: &StockQuery) -> Result<Vec<Stock>> {
        match query {
            StockQuery::FetchAll => self.fetch_all().await,
            StockQuery::Search { query } => self.search(query).await,
            StockQuery::Sort { field, order } => self.sort(*field, *order).await,
            StockQuery::Filter { bounds } => self.filter(bounds).await,
        }
    }
}
