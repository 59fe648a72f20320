//! CSV export of a price series joined with its indicators.
//!
//! Column order and header names are fixed: `Date,Close,Volume,MA_Short,MA_Long,RSI`.
//! Warm-up gaps are written as empty fields and read back as `None`.

use crate::indicators::IndicatorSeries;
use crate::models::PriceSeries;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const EXPORT_HEADER: [&str; 6] = ["Date", "Close", "Volume", "MA_Short", "MA_Long", "RSI"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to finish CSV output: {0}")]
    Flush(String),
    #[error("Export is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("Unexpected CSV header: {found}")]
    Header { found: String },
    #[error("Indicator series has {indicators} points but price series has {bars}")]
    LengthMismatch { bars: usize, indicators: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Close")]
    pub close: f64,
    #[serde(rename = "Volume")]
    pub volume: u64,
    #[serde(rename = "MA_Short")]
    pub ma_short: Option<f64>,
    #[serde(rename = "MA_Long")]
    pub ma_long: Option<f64>,
    #[serde(rename = "RSI")]
    pub rsi: Option<f64>,
}

pub fn export_filename(symbol: &str) -> String {
    format!("{}_data.csv", symbol)
}

pub fn export_rows(
    series: &PriceSeries,
    indicators: &IndicatorSeries,
) -> Result<Vec<ExportRow>, ExportError> {
    let lengths = [indicators.ma_short.len(), indicators.ma_long.len(), indicators.rsi.len()];
    if let Some(&bad) = lengths.iter().find(|&&len| len != series.len()) {
        return Err(ExportError::LengthMismatch {
            bars: series.len(),
            indicators: bad,
        });
    }

    Ok(series
        .bars()
        .iter()
        .enumerate()
        .map(|(i, bar)| ExportRow {
            date: bar.date,
            close: bar.close,
            volume: bar.volume,
            ma_short: indicators.ma_short[i],
            ma_long: indicators.ma_long[i],
            rsi: indicators.rsi[i],
        })
        .collect())
}

pub fn write_csv(series: &PriceSeries, indicators: &IndicatorSeries) -> Result<String, ExportError> {
    let rows = export_rows(series, indicators)?;

    // Header is written explicitly so an empty series still carries it
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(EXPORT_HEADER)?;
    for row in &rows {
        writer.serialize(row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

pub fn parse_csv(text: &str) -> Result<Vec<ExportRow>, ExportError> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    if headers.iter().ne(EXPORT_HEADER.iter().copied()) {
        return Err(ExportError::Header {
            found: headers.iter().collect::<Vec<_>>().join(","),
        });
    }

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}
