// Technical indicators module
// Moving averages, RSI and the classification of their latest values

pub mod classify;
pub mod moving_averages;
pub mod rsi;
pub mod series;

pub use classify::{classify_rsi_status, classify_trend, IndicatorError};
pub use moving_averages::compute_moving_average;
pub use rsi::{compute_rsi, DEFAULT_RSI_PERIOD};
pub use series::{IndicatorSeries, Summary};
