//! Price lookups
//!
//! Market data sources answer range queries over half-open intervals `[start, end)`, see [`QuoteSource`].
//! Valuation only ever needs the closing price on one day, see [`PriceAt`].
//! [`DailyWindow`] bridges the two by querying `[date, date + 1 day)` and taking the first row's close.
//!
//! Usage:
//! ```ignore
//!  let quotes = StaticQuotes::new().with_close("MSFT", date, 354.0);
//!  let prices = DailyWindow::new(Arc::new(quotes));
//!  let close = prices.price_at("MSFT", date).await?;
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, warn};
use serde::Deserialize;

use crate::dates::next_day;
use crate::errors::{NoDataError, PriceError, ProviderError};

/// One trading day of a price history
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DailyQuote {
    pub date: NaiveDate,
    pub close: f64,
}

/// A market data source answering range queries
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Short name used in logs and error messages
    fn id(&self) -> &'static str;

    /// Daily quotes for `symbol` in `[start, end)`, oldest first.
    /// An empty result means the source had nothing for that window, not a failure.
    async fn history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyQuote>, ProviderError>;

    /// Current price of `symbol`
    async fn latest_price(&self, symbol: &str) -> Result<f64, PriceError>;
}

/// Closing price of a symbol on a given trading day
#[async_trait]
pub trait PriceAt: Send + Sync {
    async fn price_at(&self, symbol: &str, date: NaiveDate) -> Result<f64, PriceError>;
}

/// Point-in-time lookups over a range-based [`QuoteSource`]
pub struct DailyWindow<S: ?Sized> {
    source: Arc<S>,
}

impl<S: QuoteSource + ?Sized> DailyWindow<S> {
    pub fn new(source: Arc<S>) -> Self {
        DailyWindow { source }
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }
}

#[async_trait]
impl<S: QuoteSource + ?Sized> PriceAt for DailyWindow<S> {
    async fn price_at(&self, symbol: &str, date: NaiveDate) -> Result<f64, PriceError> {
        let no_data = || NoDataError {
            symbol: symbol.to_string(),
            date,
        };
        // the end of the window is exclusive, so the window holds `date` only
        let end = next_day(date).ok_or_else(no_data)?;
        debug!(
            "looking up {} in [{}, {}) from {}",
            symbol,
            date,
            end,
            self.source.id()
        );
        let quotes = self.source.history(symbol, date, end).await?;
        match quotes.first() {
            Some(quote) => Ok(quote.close),
            None => {
                warn!("{} returned no data for {} on {}", self.source.id(), symbol, date);
                Err(no_data().into())
            }
        }
    }
}

/// An in-memory price table, for tests and for running without network access
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct StaticQuotes {
    closes: BTreeMap<String, BTreeMap<NaiveDate, f64>>,
}

impl StaticQuotes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_close(mut self, symbol: &str, date: NaiveDate, close: f64) -> Self {
        self.insert(symbol, date, close);
        self
    }

    pub fn insert(&mut self, symbol: &str, date: NaiveDate, close: f64) {
        self.closes
            .entry(symbol.to_string())
            .or_default()
            .insert(date, close);
    }

    /// Reads a table shaped like `{"AAPL": {"2023-01-03": 125.07}}`
    pub fn from_json(json: &str) -> Result<Self, ProviderError> {
        serde_json::from_str(json).map_err(|e| ProviderError {
            provider: "STATIC",
            message: format!("invalid price table: {e}"),
        })
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ProviderError> {
        let json = std::fs::read_to_string(path).map_err(|e| ProviderError {
            provider: "STATIC",
            message: format!("reading {}: {e}", path.display()),
        })?;
        Self::from_json(&json)
    }
}

#[async_trait]
impl QuoteSource for StaticQuotes {
    fn id(&self) -> &'static str {
        "STATIC"
    }

    async fn history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyQuote>, ProviderError> {
        if start >= end {
            return Ok(Vec::new());
        }
        Ok(self
            .closes
            .get(symbol)
            .map(|closes| {
                closes
                    .range(start..end)
                    .map(|(&date, &close)| DailyQuote { date, close })
                    .collect()
            })
            .unwrap_or_default())
    }

    // the most recent close in the table stands in for a live price
    async fn latest_price(&self, symbol: &str) -> Result<f64, PriceError> {
        self.closes
            .get(symbol)
            .and_then(|closes| closes.iter().next_back())
            .map(|(_, &close)| close)
            .ok_or_else(|| {
                NoDataError {
                    symbol: symbol.to_string(),
                    date: chrono::Utc::now().date_naive(),
                }
                .into()
            })
    }
}
