//! Interactive portfolio shell
//!
//! Asks how much to put in each symbol, buys at the live price, then reports the portfolio
//! for every pair of dates entered until the input ends.

use std::io::{self, BufRead, Write};

use clap::Parser;
use env_logger::Env;
use log::error;

use stockfolio::config::AppConfig;
use stockfolio::errors::PortfolioError;
use stockfolio::portfolio::{Portfolio, Stock};
use stockfolio::pricing::DailyWindow;
use stockfolio::report::{evaluate, PerformanceReport};

#[derive(Parser, Debug)]
#[command(about = "Profit and annualized return of a stock portfolio between two dates")]
struct Args {
    /// Portfolio identifier, asked for when left out
    #[arg(long)]
    id: Option<String>,

    /// Symbols to invest in
    #[arg(long, value_delimiter = ',', default_value = "TSLA,AMZN,ROKU,PFE")]
    symbols: Vec<String>,
}

// None once the input is exhausted
fn prompt(lines: &mut impl Iterator<Item = io::Result<String>>, message: &str) -> Option<String> {
    print!("{message}");
    io::stdout().flush().ok()?;
    lines.next()?.ok().map(|line| line.trim().to_string())
}

// a finite, non-negative number of dollars
fn parse_amount(answer: &str) -> Option<f64> {
    answer
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount >= 0.0)
}

fn print_report(report: &PerformanceReport) {
    println!(
        "\nSummary of portfolio performance between {} and {}:\n",
        report.start_date, report.end_date
    );
    println!(
        " Total initial investment: {:.2} USD",
        report.total_initial_investment_usd
    );
    println!(" Total profit: {:.2} USD", report.total_profit_usd);
    println!(" Annualized return: {:.2} %", report.annualized_return * 100.0);
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let source = AppConfig::from_env()
        .quote_source()
        .map_err(io::Error::other)?;
    let prices = DailyWindow::new(source.clone());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    let id = match args.id {
        Some(id) => id,
        None => match prompt(
            &mut lines,
            "\nEnter the identification number for the new portfolio: ",
        ) {
            Some(id) => id,
            None => return Ok(()),
        },
    };
    let mut portfolio = Portfolio::new(id);

    for (index, symbol) in args.symbols.iter().enumerate() {
        loop {
            let message =
                format!("\nQuantity of money in USD to invest in {symbol} (empty to skip): ");
            let Some(answer) = prompt(&mut lines, &message) else {
                return Ok(());
            };
            if answer.is_empty() {
                break;
            }
            let amount = match parse_amount(&answer) {
                Some(amount) => amount,
                None => {
                    println!("`{answer}` is not an amount of money");
                    continue;
                }
            };
            match Stock::acquire(index.to_string(), symbol.as_str(), amount, source.as_ref()).await
            {
                Ok(stock) => {
                    portfolio.add_stock(stock);
                    break;
                }
                Err(e) => {
                    error!("buying {}: {}", symbol, e);
                    println!("Could not buy {symbol}: {e}");
                }
            }
        }
    }

    loop {
        let Some(start_date) = prompt(
            &mut lines,
            "\nEnter a starting date to check the portfolio profits (YYYY-MM-DD): ",
        ) else {
            return Ok(());
        };
        let Some(end_date) = prompt(
            &mut lines,
            "Enter an end date to check the portfolio profits (YYYY-MM-DD): ",
        ) else {
            return Ok(());
        };
        match evaluate(&portfolio, &prices, &start_date, &end_date).await {
            Ok(report) => print_report(&report),
            Err(PortfolioError::DivisionByZero(e)) => println!("\nNo annualized return: {e}"),
            Err(e) => println!("\n{e}"),
        }
    }
}
