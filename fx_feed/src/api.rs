use std::sync::Arc;

use log::*;
use reqwest::Client;

use crate::{FxFeedConfig, FxFeedError, RateSheet};

#[derive(Clone)]
pub struct FxFeedApi {
    config: FxFeedConfig,
    client: Arc<Client>,
}

impl FxFeedApi {
    pub fn new(config: FxFeedConfig) -> Result<Self, FxFeedError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FxFeedError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    /// Fetches the current rate sheet from the external service.
    ///
    /// A transport failure, a non-2xx status, or a sheet whose `result` field is not
    /// `"success"` all surface as an [`FxFeedError`].
    pub async fn fetch_rates(&self) -> Result<RateSheet, FxFeedError> {
        trace!("Fetching rate sheet from {}", self.config.url);
        let response =
            self.client.get(&self.config.url).send().await.map_err(|e| FxFeedError::ResponseError(e.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| FxFeedError::ResponseError(e.to_string()))?;
            return Err(FxFeedError::QueryError { status, message });
        }
        let sheet = response.json::<RateSheet>().await.map_err(|e| FxFeedError::JsonError(e.to_string()))?;
        if !sheet.is_success() {
            return Err(FxFeedError::Unsuccessful(sheet.result));
        }
        debug!("Fetched {} rates from the feed", sheet.rates.len());
        Ok(sheet)
    }
}
