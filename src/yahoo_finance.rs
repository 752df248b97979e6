//! Yahoo! Finance as a [`QuoteSource`]

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Days, NaiveDate};
use log::debug;
use time::macros::time;
use time::{Date, Month, OffsetDateTime};
use yahoo_finance_api as yahoo;
use yahoo_finance_api::YahooError;

use crate::errors::{NoDataError, PriceError, ProviderError};
use crate::pricing::{DailyQuote, QuoteSource};

const PROVIDER: &str = "YAHOO";

fn provider_error(e: impl ToString) -> ProviderError {
    ProviderError {
        provider: PROVIDER,
        message: e.to_string(),
    }
}

// "no quotes" and "no result" mean the window was empty, everything else is a real failure
fn is_empty_result(e: &YahooError) -> bool {
    matches!(e, YahooError::NoQuotes | YahooError::NoResult)
}

// midnight UTC at the start of the given day
fn to_offset_datetime(date: NaiveDate) -> Result<OffsetDateTime, ProviderError> {
    let month = Month::try_from(date.month() as u8).map_err(provider_error)?;
    let day = Date::from_calendar_date(date.year(), month, date.day() as u8)
        .map_err(provider_error)?;
    Ok(OffsetDateTime::new_utc(day, time!(0:00:00)))
}

// bars are stamped at the session open, the exchange's UTC offset gives back its local day
fn trading_day(timestamp: i64, gmtoffset: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp.checked_add(gmtoffset)?, 0).map(|t| t.date_naive())
}

// keeps the bars whose exchange-local day falls in [start, end), oldest first
fn bars_in_window(
    bars: impl IntoIterator<Item = (i64, f64)>,
    gmtoffset: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<DailyQuote> {
    bars.into_iter()
        .filter_map(|(timestamp, close)| {
            trading_day(timestamp, gmtoffset).map(|date| DailyQuote { date, close })
        })
        .filter(|q| q.date >= start && q.date < end)
        .collect()
}

pub struct YahooFinance {
    connector: yahoo::YahooConnector,
}

impl YahooFinance {
    pub fn new() -> Result<Self, ProviderError> {
        let connector = yahoo::YahooConnector::new().map_err(provider_error)?;
        Ok(YahooFinance { connector })
    }
}

#[async_trait]
impl QuoteSource for YahooFinance {
    fn id(&self) -> &'static str {
        PROVIDER
    }

    async fn history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyQuote>, ProviderError> {
        // a day either side in UTC covers the local day of any exchange
        let query_start = start.checked_sub_days(Days::new(1)).unwrap_or(start);
        let query_end = end.checked_add_days(Days::new(1)).unwrap_or(end);
        let response = match self
            .connector
            .get_quote_history(
                symbol,
                to_offset_datetime(query_start)?,
                to_offset_datetime(query_end)?,
            )
            .await
        {
            Ok(response) => response,
            Err(e) if is_empty_result(&e) => return Ok(Vec::new()),
            Err(e) => return Err(provider_error(e)),
        };
        let quotes = match response.quotes() {
            Ok(quotes) => quotes,
            Err(e) if is_empty_result(&e) => return Ok(Vec::new()),
            Err(e) => return Err(provider_error(e)),
        };
        let gmtoffset = response
            .metadata()
            .map(|meta| i64::from(meta.gmtoffset))
            .unwrap_or(0);
        debug!(
            "yahoo returned {} rows for {} (gmtoffset {})",
            quotes.len(),
            symbol,
            gmtoffset
        );
        // the widened query and the live session yahoo may append both fall outside the window
        Ok(bars_in_window(
            quotes.iter().map(|q| (q.timestamp as i64, q.close)),
            gmtoffset,
            start,
            end,
        ))
    }

    async fn latest_price(&self, symbol: &str) -> Result<f64, PriceError> {
        let no_data = || NoDataError {
            symbol: symbol.to_string(),
            date: chrono::Utc::now().date_naive(),
        };
        let response = match self.connector.get_latest_quotes(symbol, "1d").await {
            Ok(response) => response,
            Err(e) if is_empty_result(&e) => return Err(no_data().into()),
            Err(e) => return Err(provider_error(e).into()),
        };
        match response.last_quote() {
            Ok(quote) => Ok(quote.close),
            Err(e) if is_empty_result(&e) => Err(no_data().into()),
            Err(e) => Err(provider_error(e).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_bounds_are_utc_midnights() {
        let start = to_offset_datetime(NaiveDate::from_ymd_opt(2023, 2, 1).unwrap()).unwrap();
        assert_eq!(start.unix_timestamp(), 1_675_209_600);
        assert_eq!((start.hour(), start.minute()), (0, 0));

        let leap = to_offset_datetime(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()).unwrap();
        assert_eq!(leap.unix_timestamp() - start.unix_timestamp(), 393 * 86_400);
    }

    const NEW_YORK_WINTER: i64 = -5 * 3600;
    const SYDNEY_SUMMER: i64 = 11 * 3600;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn quote_timestamps_map_to_their_trading_day() {
        // 2023-02-01 14:30 UTC, the NYSE open
        assert_eq!(
            trading_day(1_675_261_800, NEW_YORK_WINTER),
            Some(date(2023, 2, 1))
        );
        // 2023-01-02 23:00 UTC, the ASX open of 2023-01-03
        assert_eq!(
            trading_day(1_672_700_400, SYDNEY_SUMMER),
            Some(date(2023, 1, 3))
        );
        assert_eq!(trading_day(1_672_700_400, 0), Some(date(2023, 1, 2)));
    }

    #[test]
    fn window_keeps_only_the_local_days_asked_for() {
        let asx = [
            // opens of 2023-01-03, 2023-01-04, 2023-01-05 in Sydney
            (1_672_700_400, 7_000.0),
            (1_672_786_800, 7_050.0),
            (1_672_873_200, 7_100.0),
        ];
        let rows = bars_in_window(asx, SYDNEY_SUMMER, date(2023, 1, 4), date(2023, 1, 5));
        assert_eq!(
            rows,
            vec![DailyQuote {
                date: date(2023, 1, 4),
                close: 7_050.0
            }]
        );

        assert!(bars_in_window(asx, SYDNEY_SUMMER, date(2023, 1, 7), date(2023, 1, 8)).is_empty());
    }

    #[test]
    fn window_drops_an_appended_live_session() {
        let nyse = [
            (1_675_261_800, 100.0),
            // 2023-02-02 open, outside a one-day window on 2023-02-01
            (1_675_348_200, 101.0),
        ];
        let rows = bars_in_window(nyse, NEW_YORK_WINTER, date(2023, 2, 1), date(2023, 2, 2));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].close, 100.0);
    }
}
