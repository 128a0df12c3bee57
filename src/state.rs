use crate::client::{ApiClient, ClientError};
use crate::config::AppConfig;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub api: ApiClient,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, ClientError> {
        let api = ApiClient::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            api,
        })
    }
}
