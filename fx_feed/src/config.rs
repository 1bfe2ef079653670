use std::time::Duration;

use log::*;

const DEFAULT_FEED_URL: &str = "https://open.er-api.com/v6/latest/USD";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct FxFeedConfig {
    pub url: String,
    /// Hard cap on the round-trip to the rate service. A slow feed must surface as an error,
    /// never as a hung request.
    pub timeout: Duration,
}

impl Default for FxFeedConfig {
    fn default() -> Self {
        Self { url: DEFAULT_FEED_URL.to_string(), timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS) }
    }
}

impl FxFeedConfig {
    pub fn new_from_env_or_default() -> Self {
        let url = std::env::var("PAYDESK_FX_URL").unwrap_or_else(|_| {
            warn!("PAYDESK_FX_URL not set, using {DEFAULT_FEED_URL} as default");
            DEFAULT_FEED_URL.to_string()
        });
        let timeout = std::env::var("PAYDESK_FX_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        Self { url, timeout }
    }
}
