//! One valuation request, one answer
//!
//! [`evaluate`] takes the dates as text, the way a shell receives them, and returns everything
//! a caller prints or serializes. It can be called any number of times on the same portfolio.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::parse_date;
use crate::errors::PortfolioError;
use crate::portfolio::{annualize, check_divisors, Portfolio};
use crate::pricing::PriceAt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub portfolio_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_initial_investment_usd: f64,
    pub total_profit_usd: f64,
    pub annualized_return: f64,
}

pub async fn evaluate<P: PriceAt + ?Sized>(
    portfolio: &Portfolio,
    prices: &P,
    start_date: &str,
    end_date: &str,
) -> Result<PerformanceReport, PortfolioError> {
    let start_date = parse_date(start_date)?;
    let end_date = parse_date(end_date)?;
    let investment = portfolio.total_initial_investment_usd();
    check_divisors(investment, start_date, end_date)?;
    let total_profit_usd = portfolio.profit(prices, start_date, end_date).await?;
    let annualized_return = annualize(total_profit_usd, investment, start_date, end_date)?;
    Ok(PerformanceReport {
        portfolio_id: portfolio.id().to_string(),
        start_date,
        end_date,
        total_initial_investment_usd: investment,
        total_profit_usd,
        annualized_return,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use approx::assert_relative_eq;

    use super::*;
    use crate::errors::{DivisionByZeroError, InvalidDateFormatError, ZeroDivisor};
    use crate::portfolio::Stock;
    use crate::pricing::{DailyWindow, StaticQuotes};

    fn setup() -> (Portfolio, DailyWindow<StaticQuotes>) {
        let quotes = StaticQuotes::new()
            .with_close("AMZN", NaiveDate::from_ymd_opt(2021, 6, 1).unwrap(), 160.0)
            .with_close("AMZN", NaiveDate::from_ymd_opt(2022, 6, 1).unwrap(), 120.0);
        let mut portfolio = Portfolio::new("42");
        portfolio.add_stock(Stock::new("0", "AMZN", 5.0, 800.0));
        (portfolio, DailyWindow::new(Arc::new(quotes)))
    }

    #[actix_web::test]
    async fn reports_profit_and_annualized_return() {
        let (portfolio, prices) = setup();
        let report = evaluate(&portfolio, &prices, "2021-06-01", "2022-06-01")
            .await
            .unwrap();

        assert_eq!(report.portfolio_id, "42");
        assert_eq!(report.total_initial_investment_usd, 800.0);
        assert_eq!(report.total_profit_usd, -200.0);
        assert_relative_eq!(report.annualized_return, -0.25, epsilon = 1e-12);
    }

    #[actix_web::test]
    async fn can_be_called_again_after_a_failure() {
        let (portfolio, prices) = setup();

        let err = evaluate(&portfolio, &prices, "06/01/2021", "2022-06-01")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            PortfolioError::InvalidDateFormat(InvalidDateFormatError {
                input: "06/01/2021".to_string()
            })
        );

        let err = evaluate(&portfolio, &prices, "2022-06-01", "2022-06-01")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            PortfolioError::DivisionByZero(DivisionByZeroError {
                divisor: ZeroDivisor::Interval
            })
        );

        assert!(evaluate(&portfolio, &prices, "2022-06-01", "2021-06-01")
            .await
            .is_ok());
    }

    #[test]
    fn serializes_dates_as_text() {
        let report = PerformanceReport {
            portfolio_id: "1".to_string(),
            start_date: NaiveDate::from_ymd_opt(2023, 1, 3).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2023, 2, 3).unwrap(),
            total_initial_investment_usd: 10.0,
            total_profit_usd: 1.0,
            annualized_return: 0.5,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["start_date"], "2023-01-03");
        assert_eq!(json["end_date"], "2023-02-03");
    }
}
