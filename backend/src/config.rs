use std::net::SocketAddr;
use std::time::Duration;
use tracing::warn;

const DEFAULT_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_DATA_URL: &str = "https://query1.finance.yahoo.com";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SYMBOL: &str = "ASELS.IS";

/// Process settings read once at startup
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub addr: SocketAddr,
    pub data_url: String,
    pub request_timeout: Duration,
    pub default_symbol: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            data_url: DEFAULT_DATA_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            default_symbol: DEFAULT_SYMBOL.to_string(),
        }
    }
}

impl Config {
    /// Reads `STOCK_ANALYSIS_*` variables; call `dotenv` first to pick up `.env`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unparseable values fall back to their defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let addr = match lookup("STOCK_ANALYSIS_ADDR") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("Invalid STOCK_ANALYSIS_ADDR {:?}, using {}", raw, DEFAULT_ADDR);
                defaults.addr
            }),
            None => defaults.addr,
        };

        let request_timeout = match lookup("STOCK_ANALYSIS_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    warn!(
                        "Invalid STOCK_ANALYSIS_TIMEOUT_SECS {:?}, using {}",
                        raw, DEFAULT_TIMEOUT_SECS
                    );
                    defaults.request_timeout
                }
            },
            None => defaults.request_timeout,
        };

        let data_url = lookup("STOCK_ANALYSIS_DATA_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(defaults.data_url);

        let default_symbol = lookup("STOCK_ANALYSIS_DEFAULT_SYMBOL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.default_symbol);

        Self {
            addr,
            data_url,
            request_timeout,
            default_symbol,
        }
    }
}
