//! Portfolio valuation over daily closing prices
//!
//! A [`portfolio::Portfolio`] holds [`portfolio::Stock`] positions and reports the profit and the
//! annualized return between two dates. Prices come from any [`pricing::QuoteSource`]:
//! Yahoo! Finance in production, an in-memory table in tests and offline runs.

pub mod api;
pub mod config;
pub mod dates;
pub mod errors;
pub mod portfolio;
pub mod pricing;
pub mod report;
pub mod yahoo_finance;
