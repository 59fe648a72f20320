use super::{classify_rsi_status, classify_trend, compute_moving_average, compute_rsi, IndicatorError};
use crate::models::{IndicatorParams, PriceSeries, RsiStatus, Trend};
use chrono::NaiveDate;
use serde::Serialize;

/// Derived series aligned 1:1 with the input PriceSeries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSeries {
    pub ma_short: Vec<Option<f64>>,
    pub ma_long: Vec<Option<f64>>,
    pub rsi: Vec<Option<f64>>,
}

impl IndicatorSeries {
    pub fn compute(series: &PriceSeries, params: &IndicatorParams) -> Self {
        Self {
            ma_short: compute_moving_average(series, params.short_period),
            ma_long: compute_moving_average(series, params.long_period),
            rsi: compute_rsi(series, params.rsi_period),
        }
    }

    pub fn len(&self) -> usize {
        self.ma_short.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ma_short.is_empty()
    }
}

/// Latest price information and classifications
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub date: NaiveDate,
    pub close: f64,
    pub volume: u64,
    pub ma_short: f64,
    pub ma_long: f64,
    pub trend: Trend,
    pub rsi: f64,
    pub rsi_status: RsiStatus,
}

impl Summary {
    /// Classifies the last bar. Refuses to run on a series shorter than
    /// `params.required_history()`.
    pub fn from_series(
        series: &PriceSeries,
        indicators: &IndicatorSeries,
        params: &IndicatorParams,
    ) -> Result<Self, IndicatorError> {
        let required = params.required_history();
        let last = match series.last() {
            Some(bar) if series.len() >= required => bar,
            _ => {
                return Err(IndicatorError::InsufficientHistory {
                    required,
                    actual: series.len(),
                })
            }
        };

        let ma_short = latest(&indicators.ma_short, "short moving average")?;
        let ma_long = latest(&indicators.ma_long, "long moving average")?;
        let rsi = latest(&indicators.rsi, "RSI")?;

        Ok(Self {
            date: last.date,
            close: last.close,
            volume: last.volume,
            ma_short,
            ma_long,
            trend: classify_trend(Some(ma_short), Some(ma_long))?,
            rsi,
            rsi_status: classify_rsi_status(Some(rsi))?,
        })
    }
}

fn latest(values: &[Option<f64>], name: &'static str) -> Result<f64, IndicatorError> {
    values
        .last()
        .copied()
        .flatten()
        .ok_or(IndicatorError::MissingValue(name))
}
