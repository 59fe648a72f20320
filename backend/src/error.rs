use crate::api_client::ApiError;
use thiserror::Error;

/// Terminal failures of one analysis request
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("No data found for symbol {symbol}. Please enter a valid symbol.")]
    NoData { symbol: String },
    #[error("Data source failure for {symbol}")]
    AdapterFailure {
        symbol: String,
        #[source]
        source: ApiError,
    },
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("Export failed: {0}")]
    Export(#[from] crate::export::ExportError),
}

impl AnalysisError {
    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        AnalysisError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
