use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::AnalysisError;
use crate::export::{export_filename, write_csv};
use crate::indicators::Summary;
use crate::models::IndicatorParams;
use crate::services::analysis_service::{
    run_analysis, AnalysisReport, AnalysisRequest, AnalysisWarning,
};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AnalysisQuery {
    pub symbol: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub short_period: Option<usize>,
    pub long_period: Option<usize>,
}

#[derive(Serialize)]
pub struct AnalysisResponse {
    pub symbol: String,
    pub params: IndicatorParams,
    pub dates: Vec<NaiveDate>,
    pub closes: Vec<f64>,
    pub volumes: Vec<u64>,
    pub ma_short: Vec<Option<f64>>,
    pub ma_long: Vec<Option<f64>>,
    pub rsi: Vec<Option<f64>>,
    pub summary: Option<Summary>,
    pub warnings: Vec<AnalysisWarning>,
}

impl From<AnalysisReport> for AnalysisResponse {
    fn from(report: AnalysisReport) -> Self {
        let bars = report.series.bars();
        Self {
            dates: bars.iter().map(|b| b.date).collect(),
            closes: bars.iter().map(|b| b.close).collect(),
            volumes: bars.iter().map(|b| b.volume).collect(),
            symbol: report.symbol,
            params: report.params,
            ma_short: report.indicators.ma_short,
            ma_long: report.indicators.ma_long,
            rsi: report.indicators.rsi,
            summary: report.summary,
            warnings: report.warnings,
        }
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Fill in defaults: configured symbol, 2020-01-01 through today, 20/50 day averages
pub fn build_request(query: AnalysisQuery, config: &Config) -> AnalysisRequest {
    let defaults = IndicatorParams::default();

    let symbol = query
        .symbol
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| config.default_symbol.clone());

    AnalysisRequest {
        symbol,
        start: query.start.unwrap_or_else(default_start),
        end: query.end.unwrap_or_else(|| Utc::now().date_naive()),
        params: IndicatorParams {
            short_period: query.short_period.unwrap_or(defaults.short_period),
            long_period: query.long_period.unwrap_or(defaults.long_period),
            rsi_period: defaults.rsi_period,
        },
    }
}

fn default_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or(NaiveDate::MIN)
}

pub fn error_response(err: AnalysisError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, message) = match &err {
        AnalysisError::NoData { symbol } => {
            tracing::info!("No data for {}", symbol);
            (
                StatusCode::NOT_FOUND,
                "No data found. Please enter a valid symbol.".to_string(),
            )
        }
        AnalysisError::AdapterFailure { source, .. } => {
            tracing::error!("{}: {}", err, source);
            (
                StatusCode::BAD_GATEWAY,
                format!("{}: {}", err, source.public_message()),
            )
        }
        AnalysisError::InvalidParameter { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
        AnalysisError::Export(e) => {
            tracing::error!("CSV export failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    };

    (status, Json(ErrorResponse { error: message }))
}

pub async fn get_analysis(
    State(state): State<AppState>,
    Query(query): Query<AnalysisQuery>,
) -> Result<Json<AnalysisResponse>, (StatusCode, Json<ErrorResponse>)> {
    let request = build_request(query, &state.config);

    run_analysis(state.client.as_ref(), request)
        .await
        .map(|report| Json(AnalysisResponse::from(report)))
        .map_err(error_response)
}

pub async fn get_export(
    State(state): State<AppState>,
    Query(query): Query<AnalysisQuery>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let request = build_request(query, &state.config);

    let report = run_analysis(state.client.as_ref(), request)
        .await
        .map_err(error_response)?;
    let body = write_csv(&report.series, &report.indicators)
        .map_err(|e| error_response(AnalysisError::from(e)))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export_filename(&report.symbol)),
            ),
        ],
        body,
    ))
}
