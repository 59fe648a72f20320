use crate::models::{RsiStatus, Trend};
use thiserror::Error;

pub const OVERBOUGHT_THRESHOLD: f64 = 70.0;
pub const OVERSOLD_THRESHOLD: f64 = 30.0;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IndicatorError {
    #[error("insufficient history: need at least {required} bars, have {actual}")]
    InsufficientHistory { required: usize, actual: usize },
    #[error("latest {0} value is not available yet")]
    MissingValue(&'static str),
}

/// Rise when the short average is strictly above the long one.
/// Equal averages classify as Drop.
pub fn classify_trend(
    ma_short_latest: Option<f64>,
    ma_long_latest: Option<f64>,
) -> Result<Trend, IndicatorError> {
    let ma_short = ma_short_latest.ok_or(IndicatorError::MissingValue("short moving average"))?;
    let ma_long = ma_long_latest.ok_or(IndicatorError::MissingValue("long moving average"))?;

    Ok(if ma_short > ma_long { Trend::Rise } else { Trend::Drop })
}

/// Thresholds are exclusive: exactly 70 or 30 is still Normal.
pub fn classify_rsi_status(rsi_latest: Option<f64>) -> Result<RsiStatus, IndicatorError> {
    let rsi = rsi_latest.ok_or(IndicatorError::MissingValue("RSI"))?;

    Ok(if rsi > OVERBOUGHT_THRESHOLD {
        RsiStatus::Overbought
    } else if rsi < OVERSOLD_THRESHOLD {
        RsiStatus::Oversold
    } else {
        RsiStatus::Normal
    })
}
