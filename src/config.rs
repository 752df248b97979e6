//! Runtime configuration from the environment
//!
//! The binaries load a `.env` file with `dotenvy` before reading it.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use log::{info, warn};

use crate::errors::ProviderError;
use crate::pricing::{QuoteSource, StaticQuotes};
use crate::yahoo_finance::YahooFinance;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// JSON price table to serve instead of querying Yahoo! Finance
    pub prices_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            prices_file: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = match lookup("STOCKFOLIO_PORT") {
            Some(raw) => raw.parse::<u16>().unwrap_or_else(|_| {
                warn!("STOCKFOLIO_PORT={} is not a port, using {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };
        AppConfig {
            host: lookup("STOCKFOLIO_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            prices_file: lookup("STOCKFOLIO_PRICES_FILE")
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
        }
    }

    /// The price table when one is configured, Yahoo! Finance otherwise
    pub fn quote_source(&self) -> Result<Arc<dyn QuoteSource>, ProviderError> {
        match &self.prices_file {
            Some(path) => {
                info!("serving prices from {}", path.display());
                Ok(Arc::new(StaticQuotes::from_json_file(path)?))
            }
            None => Ok(Arc::new(YahooFinance::new()?)),
        }
    }
}
