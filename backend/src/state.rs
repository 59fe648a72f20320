use crate::api_client::{ApiClient, ApiError};
use crate::config::Config;
use std::sync::Arc;

/// Shared, read-only handles. Results are never cached here: every
/// request fetches and computes its own series.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<ApiClient>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, ApiError> {
        let client = ApiClient::new(config.data_url.clone(), config.request_timeout)?;

        Ok(Self {
            client: Arc::new(client),
            config: Arc::new(config),
        })
    }
}
