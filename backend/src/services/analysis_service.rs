use crate::api_client::PriceSource;
use crate::error::AnalysisError;
use crate::indicators::{IndicatorError, IndicatorSeries, Summary};
use crate::models::{IndicatorParams, PriceSeries, MAX_LONG_PERIOD, MAX_SHORT_PERIOD};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn, Instrument};
use uuid::Uuid;

/// One user-triggered analysis
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub params: IndicatorParams,
}

const MAX_SYMBOL_LEN: usize = 32;

/// Non-fatal: indicators were computed but the latest bar was not classified
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum AnalysisWarning {
    /// Fewer bars than the longest warm-up
    InsufficientHistory { required: usize, actual: usize },
    /// Enough bars, but a latest indicator value is still undefined
    Unclassified { reason: String },
}

/// Caller-owned result of one analysis. Nothing is kept server-side.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub symbol: String,
    pub params: IndicatorParams,
    pub series: PriceSeries,
    pub indicators: IndicatorSeries,
    pub summary: Option<Summary>,
    pub warnings: Vec<AnalysisWarning>,
}

/// Ticker symbols are limited to letters, digits and `.^=-`
pub fn validate_symbol(symbol: &str) -> Result<(), AnalysisError> {
    if symbol.is_empty() || symbol.len() > MAX_SYMBOL_LEN {
        return Err(AnalysisError::invalid_parameter(
            "symbol",
            format!("must be 1 to {} characters", MAX_SYMBOL_LEN),
        ));
    }
    if let Some(bad) = symbol
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '^' | '=' | '-')))
    {
        return Err(AnalysisError::invalid_parameter(
            "symbol",
            format!("unsupported character {:?}", bad),
        ));
    }
    Ok(())
}

pub fn validate_params(params: &IndicatorParams) -> Result<(), AnalysisError> {
    if !(1..=MAX_SHORT_PERIOD).contains(&params.short_period) {
        return Err(AnalysisError::invalid_parameter(
            "short_period",
            format!("must be between 1 and {}, got {}", MAX_SHORT_PERIOD, params.short_period),
        ));
    }
    if !(1..=MAX_LONG_PERIOD).contains(&params.long_period) {
        return Err(AnalysisError::invalid_parameter(
            "long_period",
            format!("must be between 1 and {}, got {}", MAX_LONG_PERIOD, params.long_period),
        ));
    }
    if params.rsi_period == 0 {
        return Err(AnalysisError::invalid_parameter("rsi_period", "must be positive"));
    }
    Ok(())
}

/// Fetch, compute and classify. A fetch failure or an empty result ends the
/// request; short history only suppresses the summary.
pub async fn run_analysis<S: PriceSource + Sync>(
    source: &S,
    request: AnalysisRequest,
) -> Result<AnalysisReport, AnalysisError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("analysis", %request_id, symbol = %request.symbol);

    async move {
        validate_symbol(&request.symbol)?;
        validate_params(&request.params)?;

        let series = source
            .fetch_history(&request.symbol, request.start, request.end)
            .await
            .map_err(|e| {
                warn!("Data source failed: {}", e);
                AnalysisError::AdapterFailure {
                    symbol: request.symbol.clone(),
                    source: e,
                }
            })?;

        let series = match series {
            Some(series) if !series.is_empty() => series,
            _ => {
                info!("No data for {} .. {}", request.start, request.end);
                return Err(AnalysisError::NoData {
                    symbol: request.symbol,
                });
            }
        };

        Ok(analyze_series(request.symbol, series, request.params))
    }
    .instrument(span)
    .await
}

/// Compute indicators for an already fetched series
pub fn analyze_series(symbol: String, series: PriceSeries, params: IndicatorParams) -> AnalysisReport {
    let indicators = IndicatorSeries::compute(&series, &params);

    let mut warnings = Vec::new();
    let summary = match Summary::from_series(&series, &indicators, &params) {
        Ok(summary) => {
            info!(
                "Latest close {:.2}: trend {:?}, RSI {:.1} ({:?})",
                summary.close, summary.trend, summary.rsi, summary.rsi_status
            );
            Some(summary)
        }
        Err(IndicatorError::InsufficientHistory { required, actual }) => {
            warn!("Insufficient history: need {} bars, have {}", required, actual);
            warnings.push(AnalysisWarning::InsufficientHistory { required, actual });
            None
        }
        Err(e) => {
            warn!("Classification skipped: {}", e);
            warnings.push(AnalysisWarning::Unclassified {
                reason: e.to_string(),
            });
            None
        }
    };

    AnalysisReport {
        symbol,
        params,
        series,
        indicators,
        summary,
        warnings,
    }
}
