//! HTTP endpoints
//!
//! - `GET /health`
//! - `GET /stocks/{symbol}/price/{date}`: closing price on a trading day
//! - `POST /portfolio/summary`: profit and annualized return of a portfolio between two dates
//!
//! Errors come back as `{"error": "..."}` with a status matching the failure.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{get, post, web, HttpResponse, Responder, ResponseError};
use chrono::NaiveDate;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::dates::parse_date;
use crate::errors::PortfolioError;
use crate::portfolio::{check_divisors, Portfolio, Stock};
use crate::pricing::{DailyWindow, PriceAt, QuoteSource};
use crate::report::{evaluate, PerformanceReport};

/// Shared by every worker, read-only
pub struct AppState {
    pub prices: DailyWindow<dyn QuoteSource>,
}

impl AppState {
    pub fn new(source: Arc<dyn QuoteSource>) -> Self {
        AppState {
            prices: DailyWindow::new(source),
        }
    }
}

impl ResponseError for PortfolioError {
    fn status_code(&self) -> StatusCode {
        match self {
            PortfolioError::InvalidDateFormat(_) => StatusCode::BAD_REQUEST,
            PortfolioError::NoData(_) => StatusCode::NOT_FOUND,
            PortfolioError::DivisionByZero(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PortfolioError::Provider(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        warn!("request failed: {}", self);
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StockRequest {
    pub id: String,
    pub symbol: String,
    pub initial_amount_invested_usd: f64,
    /// Bought at the start date's close when left out
    #[serde(default)]
    pub quantity: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryRequest {
    pub id: String,
    pub start_date: String,
    pub end_date: String,
    pub stocks: Vec<StockRequest>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceResponse {
    pub symbol: String,
    pub date: NaiveDate,
    pub close: f64,
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().body("ok")
}

#[get("/stocks/{symbol}/price/{date}")]
async fn price(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<web::Json<PriceResponse>, PortfolioError> {
    let (symbol, date) = path.into_inner();
    let date = parse_date(&date)?;
    let close = state.prices.price_at(&symbol, date).await?;
    Ok(web::Json(PriceResponse {
        symbol,
        date,
        close,
    }))
}

#[post("/portfolio/summary")]
async fn summary(
    state: web::Data<AppState>,
    item: web::Json<SummaryRequest>,
) -> Result<web::Json<PerformanceReport>, PortfolioError> {
    let item = item.into_inner();
    let start_date = parse_date(&item.start_date)?;
    let end_date = parse_date(&item.end_date)?;
    // same order as the portfolio's running total
    let investment = item
        .stocks
        .iter()
        .fold(0.0, |acc, s| acc + s.initial_amount_invested_usd);
    check_divisors(investment, start_date, end_date)?;
    let mut portfolio = Portfolio::new(item.id);
    for stock in item.stocks {
        let stock = match stock.quantity {
            Some(quantity) => Stock::new(
                stock.id,
                stock.symbol,
                quantity,
                stock.initial_amount_invested_usd,
            ),
            None => {
                Stock::acquire_at(
                    stock.id,
                    stock.symbol,
                    stock.initial_amount_invested_usd,
                    &state.prices,
                    start_date,
                )
                .await?
            }
        };
        portfolio.add_stock(stock);
    }
    let report = evaluate(&portfolio, &state.prices, &item.start_date, &item.end_date).await?;
    Ok(web::Json(report))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health).service(price).service(summary);
}
