use crate::models::{PriceBar, PriceSeries};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime};
use reqwest::Url;
use serde::Deserialize;
use std::future::Future;
use thiserror::Error;
use tracing::{debug, info, warn};

// Longest provider body kept in a status error
const MAX_ERROR_BODY: usize = 256;

/// Source of daily bars for one symbol.
/// `Ok(None)` means the provider has nothing for the symbol/range.
pub trait PriceSource {
    fn fetch_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Future<Output = Result<Option<PriceSeries>, ApiError>> + Send;
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Provider error {code}: {description}")]
    Provider { code: String, description: String },
    #[error("Invalid data source URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl ApiError {
    /// Message safe to hand back to API callers: provider bodies stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Status { status, .. } => format!("Data provider returned status {}", status),
            other => other.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Deserialize)]
struct ChartError {
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Deserialize)]
struct ChartMeta {
    // Seconds east of UTC for the listing exchange
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Deserialize)]
struct ChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: std::time::Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("stock-analysis/0.1")
            .build()
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        let raw = base_url.into();
        let base_url = Url::parse(raw.trim_end_matches('/')).map_err(|e| ApiError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl {
                url: raw,
                reason: "cannot be a base URL".to_string(),
            });
        }

        Ok(Self { client, base_url })
    }

    /// Chart endpoint for `symbol`, which is percent-encoded as a single path segment
    fn chart_url(&self, symbol: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["v8", "finance", "chart", symbol]);
        }
        url
    }

    /// Fetch daily bars from the Yahoo Finance chart endpoint.
    /// `end` is inclusive, so the request runs to midnight of the following day.
    async fn fetch_daily_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<PriceSeries>, ApiError> {
        if end < start {
            debug!("Empty range {} .. {} for {}, skipping request", start, end, symbol);
            return Ok(None);
        }

        let url = self.chart_url(symbol);
        let period1 = start.and_time(NaiveTime::MIN).and_utc().timestamp();
        let period2 = (end + Duration::days(1)).and_time(NaiveTime::MIN).and_utc().timestamp();

        let response = self
            .client
            .get(url)
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
                ("events", "history".to_string()),
            ])
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| ApiError::ParseError(format!("Failed to get response text: {}", e)))?;

        // Unknown symbols come back as 404 with a chart error body
        match parse_chart(&response_text, start, end) {
            Ok(series) => {
                info!(
                    "Fetched {} bars for {}",
                    series.as_ref().map_or(0, |s| s.len()),
                    symbol
                );
                Ok(series)
            }
            Err(ApiError::ParseError(_)) if !status.is_success() => {
                warn!("Provider answered {} for {}: {}", status, symbol, response_text);
                Err(ApiError::Status {
                    status: status.as_u16(),
                    body: response_text.chars().take(MAX_ERROR_BODY).collect(),
                })
            }
            Err(e) => Err(e),
        }
    }
}

impl PriceSource for ApiClient {
    async fn fetch_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<PriceSeries>, ApiError> {
        self.fetch_daily_bars(symbol, start, end).await
    }
}

/// Turn a chart payload into a series restricted to `start..=end`.
/// Bars without a close are skipped, missing volume counts as zero, and a
/// repeated date keeps the later bar.
fn parse_chart(
    body: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Option<PriceSeries>, ApiError> {
    let response: ChartResponse = serde_json::from_str(body)
        .map_err(|e| ApiError::ParseError(format!("Failed to parse chart: {}", e)))?;

    if let Some(error) = response.chart.error {
        if error.code == "Not Found" {
            return Ok(None);
        }
        return Err(ApiError::Provider {
            code: error.code,
            description: error.description,
        });
    }

    let result = match response.chart.result.and_then(|r| r.into_iter().next()) {
        Some(result) => result,
        None => return Ok(None),
    };

    let quote = match result.indicators.quote.into_iter().next() {
        Some(quote) => quote,
        None => return Ok(None),
    };

    let mut bars: Vec<PriceBar> = Vec::with_capacity(result.timestamp.len());
    for (i, &timestamp) in result.timestamp.iter().enumerate() {
        let close = match quote.close.get(i).copied().flatten() {
            Some(close) if close.is_finite() => close,
            _ => continue,
        };
        let volume = quote
            .volume
            .get(i)
            .copied()
            .flatten()
            .map_or(0, |v| v.max(0.0).round() as u64);

        let date = DateTime::from_timestamp(timestamp + result.meta.gmtoffset, 0)
            .ok_or_else(|| ApiError::ParseError("Invalid timestamp conversion".to_string()))?
            .date_naive();

        if date < start || date > end {
            continue;
        }

        bars.push(PriceBar { date, close, volume });
    }

    bars.sort_by_key(|b| b.date);
    // dedup_by_key keeps the first of a run; reverse so the later bar wins
    bars.reverse();
    bars.dedup_by_key(|b| b.date);
    bars.reverse();

    if bars.is_empty() {
        return Ok(None);
    }

    PriceSeries::new(bars)
        .map(Some)
        .map_err(|e| ApiError::ParseError(e.to_string()))
}
