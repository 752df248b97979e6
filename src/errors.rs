//! Error types for price lookups and portfolio valuation
//!
//! Every failure is typed: a missing price is a `NoDataError`, never a zero or a missing value,
//! so a failed lookup can't be mistaken for a position that simply didn't move.
//!
//! The enums use the custom derive macro From to implement the From trait for each variant:
//! ```ignore
//!  impl From<NoDataError> for PriceError {
//!      fn from (e: NoDataError) -> Self {
//!          PriceError::NoData(e)
//!      }
//!  }
//! ```

use std::fmt;

use chrono::NaiveDate;
pub use stockfolio_derive::From;
use thiserror::Error;

/// The price source had no row for the requested trading day
#[derive(Error, Debug, Clone, PartialEq)]
#[error("no price data for {symbol} on {date}")]
pub struct NoDataError {
    pub symbol: String,
    pub date: NaiveDate,
}

/// What would have ended up as the zero divisor
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ZeroDivisor {
    Investment,
    Interval,
    Price,
}

impl fmt::Display for ZeroDivisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZeroDivisor::Investment => write!(f, "total initial investment is zero"),
            ZeroDivisor::Interval => write!(f, "start and end dates are the same day"),
            ZeroDivisor::Price => write!(f, "reference price is not positive"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("division by zero: {divisor}")]
pub struct DivisionByZeroError {
    pub divisor: ZeroDivisor,
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid date `{input}`, expected YYYY-MM-DD")]
pub struct InvalidDateFormatError {
    pub input: String,
}

/// The price source itself failed (network, malformed response, ...)
#[derive(Error, Debug, Clone, PartialEq)]
#[error("price provider {provider} failed: {message}")]
pub struct ProviderError {
    pub provider: &'static str,
    pub message: String,
}

/// Failure of a single price lookup
#[derive(Error, Debug, Clone, PartialEq, From)]
pub enum PriceError {
    #[error(transparent)]
    NoData(NoDataError),
    #[error(transparent)]
    Provider(ProviderError),
}

/// Failure of a portfolio computation
#[derive(Error, Debug, Clone, PartialEq, From)]
pub enum PortfolioError {
    #[error(transparent)]
    NoData(NoDataError),
    #[error(transparent)]
    DivisionByZero(DivisionByZeroError),
    #[error(transparent)]
    InvalidDateFormat(InvalidDateFormatError),
    #[error(transparent)]
    Provider(ProviderError),
}

impl From<PriceError> for PortfolioError {
    fn from(e: PriceError) -> Self {
        match e {
            PriceError::NoData(e) => PortfolioError::NoData(e),
            PriceError::Provider(e) => PortfolioError::Provider(e),
        }
    }
}
