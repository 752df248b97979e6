//! Portfolio valuation
//!
//! A [`Portfolio`] owns a list of [`Stock`] positions and values them between two dates:
//! the profit is the sum over positions of `quantity * (close at end - close at start)`,
//! the annualized return compounds `profit / total initial investment` to a 365-day year.
//!
//! The return is a simple one: it doesn't account for dividends, intermediate cash flows or positions
//! changing size during the period.
//!
//! Usage:
//! ```ignore
//!  let mut portfolio = Portfolio::new("retirement");
//!  portfolio.add_stock(Stock::new("1", "MSFT", 3.0, 1062.0));
//!  let profit = portfolio.profit(&prices, start, end).await?;
//!  let annualized = portfolio.get_annualized_return(&prices, start, end).await?;
//! ```

use chrono::NaiveDate;
use log::debug;

use crate::dates::days_between;
use crate::errors::{DivisionByZeroError, PortfolioError, PriceError, ZeroDivisor};
use crate::pricing::{PriceAt, QuoteSource};

/// Length of the year returns are normalised to
pub const DAYS_PER_YEAR: f64 = 365.0;

/// A position in one instrument, fixed at acquisition
#[derive(Debug, Clone, PartialEq)]
pub struct Stock {
    id: String,
    symbol: String,
    quantity: f64,
    initial_amount_invested_usd: f64,
}

fn units_for(amount: f64, price: f64) -> Result<f64, PortfolioError> {
    if price.is_nan() || price <= 0.0 {
        return Err(DivisionByZeroError {
            divisor: ZeroDivisor::Price,
        }
        .into());
    }
    Ok(amount / price)
}

impl Stock {
    pub fn new(
        id: impl Into<String>,
        symbol: impl Into<String>,
        quantity: f64,
        initial_amount_invested_usd: f64,
    ) -> Self {
        Stock {
            id: id.into(),
            symbol: symbol.into(),
            quantity,
            initial_amount_invested_usd,
        }
    }

    /// Buys `amount` USD worth of `symbol` at its current price
    pub async fn acquire<S: QuoteSource + ?Sized>(
        id: impl Into<String>,
        symbol: impl Into<String>,
        amount: f64,
        source: &S,
    ) -> Result<Self, PortfolioError> {
        let symbol = symbol.into();
        let price = source.latest_price(&symbol).await?;
        let quantity = units_for(amount, price)?;
        debug!("acquired {} units of {} at {}", quantity, symbol, price);
        Ok(Stock::new(id, symbol, quantity, amount))
    }

    /// Buys `amount` USD worth of `symbol` at its closing price on `date`
    pub async fn acquire_at<P: PriceAt + ?Sized>(
        id: impl Into<String>,
        symbol: impl Into<String>,
        amount: f64,
        prices: &P,
        date: NaiveDate,
    ) -> Result<Self, PortfolioError> {
        let symbol = symbol.into();
        let price = prices.price_at(&symbol, date).await?;
        let quantity = units_for(amount, price)?;
        debug!(
            "acquired {} units of {} at {} on {}",
            quantity, symbol, price, date
        );
        Ok(Stock::new(id, symbol, quantity, amount))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn initial_amount_invested_usd(&self) -> f64 {
        self.initial_amount_invested_usd
    }

    /// Closing price of this stock on `date`
    pub async fn price<P: PriceAt + ?Sized>(
        &self,
        prices: &P,
        date: NaiveDate,
    ) -> Result<f64, PriceError> {
        prices.price_at(&self.symbol, date).await
    }

    /// Value of the position at the closing price of `date`
    pub async fn valuation<P: PriceAt + ?Sized>(
        &self,
        prices: &P,
        date: NaiveDate,
    ) -> Result<f64, PriceError> {
        Ok(self.price(prices, date).await? * self.quantity)
    }
}

/// Holds the positions and the money put into them
#[derive(Debug, Clone)]
pub struct Portfolio {
    id: String,
    stocks: Vec<Stock>,
    total_initial_investment_usd: f64,
}

impl Portfolio {
    pub fn new(id: impl Into<String>) -> Self {
        Portfolio {
            id: id.into(),
            stocks: Vec::new(),
            total_initial_investment_usd: 0.0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn stocks(&self) -> &[Stock] {
        &self.stocks
    }

    /// Appends a position and adds its initial investment to the running total.
    /// Duplicate ids or symbols are accepted.
    pub fn add_stock(&mut self, stock: Stock) {
        self.total_initial_investment_usd += stock.initial_amount_invested_usd;
        self.stocks.push(stock);
    }

    /// Sum of the initial investments of every position.
    ///
    /// Holds by construction: the fields are private and `add_stock` is the only mutation,
    /// updating the list and the total together. Debug builds recompute the sum on every read.
    pub fn total_initial_investment_usd(&self) -> f64 {
        // summed in insertion order, same as the running total, so equality is exact
        debug_assert_eq!(
            self.total_initial_investment_usd,
            self.stocks
                .iter()
                .fold(0.0, |acc, s| acc + s.initial_amount_invested_usd)
        );
        self.total_initial_investment_usd
    }

    /// Profit in USD between the closes of `start_date` and `end_date`.
    ///
    /// The dates may come in either order, a reversed range gives the opposite sign.
    /// Fails on the first position whose price can't be resolved, without a partial sum.
    pub async fn profit<P: PriceAt + ?Sized>(
        &self,
        prices: &P,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<f64, PortfolioError> {
        let mut total_profit = 0.0;
        for stock in self.stocks.iter() {
            let valuation_start = stock.valuation(prices, start_date).await?;
            let valuation_end = stock.valuation(prices, end_date).await?;
            total_profit += valuation_end - valuation_start;
        }
        debug!(
            "portfolio {} profit between {} and {}: {}",
            self.id, start_date, end_date, total_profit
        );
        Ok(total_profit)
    }

    /// Compound annual growth rate of the portfolio between the two dates
    pub async fn get_annualized_return<P: PriceAt + ?Sized>(
        &self,
        prices: &P,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<f64, PortfolioError> {
        // guard before spending any lookups
        check_divisors(self.total_initial_investment_usd(), start_date, end_date)?;
        let profit = self.profit(prices, start_date, end_date).await?;
        annualize(
            profit,
            self.total_initial_investment_usd(),
            start_date,
            end_date,
        )
    }
}

pub(crate) fn check_divisors(
    investment: f64,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<i64, DivisionByZeroError> {
    let days = days_between(start_date, end_date);
    if days == 0 {
        return Err(DivisionByZeroError {
            divisor: ZeroDivisor::Interval,
        });
    }
    if investment.is_nan() || investment <= 0.0 {
        return Err(DivisionByZeroError {
            divisor: ZeroDivisor::Investment,
        });
    }
    Ok(days)
}

/// `(1 + profit / investment) ^ (365 / days) - 1`, `days` being the absolute length of the interval.
///
/// A total loss or worse has no real root and is reported as `-1.0`.
pub fn annualize(
    profit: f64,
    investment: f64,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<f64, PortfolioError> {
    let days = check_divisors(investment, start_date, end_date)?;
    let total_return_rate = profit / investment;
    if total_return_rate <= -1.0 {
        return Ok(-1.0);
    }
    Ok((1.0 + total_return_rate).powf(DAYS_PER_YEAR / days as f64) - 1.0)
}
