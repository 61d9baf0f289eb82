//! HTTP Stock Provider
//!
//! reqwest-backed [`StockProvider`] for the stock API. Every operation is a
//! plain GET; list operations answer `{"stocks": [...]}`.
//!
//! The API reports many failures in-band: status 200 with a body of
//! `{"error": "...", "details": "..."}`. Those bodies are turned into
//! [`Error::Provider`] here so callers only ever see `Ok` for real data.
//! The older web client read such a body as an empty `stocks` list and
//! silently cleared its table; here it is a failed request and the rows
//! already on screen stay.

use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use snafu::ResultExt;
use tracing::debug;

use crate::domain::config::ProviderConfig;
use crate::domain::metric::{Metric, SortOrder};
use crate::domain::query::StockQuery;
use crate::domain::stock::{HistoricalBar, Stock, StockDetail};
use crate::error::{DecodeSnafu, Error, HttpSnafu, Result, StatusSnafu};
use crate::services::provider::StockProvider;

#[derive(Deserialize)]
struct StocksEnvelope {
    #[serde(default)]
    stocks: Option<Vec<Stock>>,
}

#[derive(Deserialize)]
struct HistoryEnvelope {
    #[serde(default)]
    historical_data: Vec<HistoricalBar>,
}

/// In-band `{"error": ...}` body, if `value` is one
fn provider_error(value: &Value) -> Option<Error> {
    let obj = value.as_object()?;
    let message = obj.get("error")?.as_str()?;
    Some(Error::Provider {
        message: message.to_string(),
        details: obj
            .get("details")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

/// A list body without `stocks` decodes to an empty list
pub(crate) fn decode_stocks(url: &str, value: Value) -> Result<Vec<Stock>> {
    if let Some(err) = provider_error(&value) {
        return Err(err);
    }
    let envelope: StocksEnvelope = serde_json::from_value(value).context(DecodeSnafu { url })?;
    Ok(envelope.stocks.unwrap_or_default())
}

pub(crate) fn decode_detail(url: &str, value: Value) -> Result<StockDetail> {
    if let Some(err) = provider_error(&value) {
        return Err(err);
    }
    serde_json::from_value(value).context(DecodeSnafu { url })
}

pub(crate) fn decode_history(url: &str, value: Value) -> Result<Vec<HistoricalBar>> {
    if let Some(err) = provider_error(&value) {
        return Err(err);
    }
    let envelope: HistoryEnvelope = serde_json::from_value(value).context(DecodeSnafu { url })?;
    Ok(envelope.historical_data)
}

/// HTTP client for the stock API
#[derive(Debug, Clone)]
pub struct HttpStockProvider {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpStockProvider {
    /// Create a client for `config.base_url` with the configured timeouts
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let raw = config.base_url.trim();
        let base_url = Url::parse(raw).map_err(|e| Error::Invalid {
            message: format!("Invalid provider URL {raw}: {e}"),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Invalid {
                message: format!("Provider URL cannot carry paths: {raw}"),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .context(HttpSnafu { url: raw })?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL with `segments` appended, each percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Invalid {
                message: format!("Provider URL cannot carry paths: {}", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET `url` and parse the body as JSON. Transport errors, non-success
    /// statuses, and non-JSON bodies are all errors.
    async fn get_json(&self, url: Url, params: &[(String, String)]) -> Result<Value> {
        let target = url.to_string();
        debug!(url = %target, ?params, "GET");

        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .context(HttpSnafu { url: target.as_str() })?;

        let status = response.status();
        if !status.is_success() {
            return StatusSnafu {
                url: target.as_str(),
                status: status.as_u16(),
            }
            .fail();
        }

        let body = response
            .text()
            .await
            .context(HttpSnafu { url: target.as_str() })?;
        serde_json::from_str(&body).context(DecodeSnafu { url: target.as_str() })
    }

    async fn get_list(&self, query: &StockQuery) -> Result<Vec<Stock>> {
        let url = self.endpoint(&[query.path().trim_start_matches('/')])?;
        let target = url.to_string();
        let value = self.get_json(url, &query.params()).await?;
        let stocks = decode_stocks(&target, value)?;
        debug!(operation = %query.operation(), rows = stocks.len(), "list response decoded");
        Ok(stocks)
    }
}

#[async_trait]
impl StockProvider for HttpStockProvider {
    async fn fetch_all(&self) -> Result<Vec<Stock>> {
        self.get_list(&StockQuery::FetchAll).await
    }

    async fn search(&self, query: &str) -> Result<Vec<Stock>> {
        self.get_list(&StockQuery::Search {
            query: query.to_string(),
        })
        .await
    }

    async fn sort(&self, field: Option<Metric>, order: SortOrder) -> Result<Vec<Stock>> {
        self.get_list(&StockQuery::Sort { field, order }).await
    }

    async fn filter(&self, bounds: &[(String, f64)]) -> Result<Vec<Stock>> {
        self.get_list(&StockQuery::Filter {
            bounds: bounds.to_vec(),
        })
        .await
    }

    async fn stock(&self, ticker: &str) -> Result<StockDetail> {
        let url = self.endpoint(&["stocks", ticker])?;
        let target = url.to_string();
        let value = self.get_json(url, &[]).await?;
        decode_detail(&target, value)
    }

    async fn history(&self, ticker: &str) -> Result<Vec<HistoricalBar>> {
        let url = self.endpoint(&["get-historical-data", ticker])?;
        let target = url.to_string();
        let value = self.get_json(url, &[]).await?;
        decode_history(&target, value)
    }
}
