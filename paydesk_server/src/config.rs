use std::env;

use fx_feed::FxFeedConfig;
use log::*;

const DEFAULT_PAYDESK_HOST: &str = "127.0.0.1";
const DEFAULT_PAYDESK_PORT: u16 = 8380;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/paydesk.db";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Where the bulk rate refresh pulls its sheet from.
    pub fx: FxFeedConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_PAYDESK_HOST.to_string(),
            port: DEFAULT_PAYDESK_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            fx: FxFeedConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("PAYDESK_HOST").ok().unwrap_or_else(|| DEFAULT_PAYDESK_HOST.into());
        let port = env::var("PAYDESK_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for PAYDESK_PORT. {e} Using the default, \
                         {DEFAULT_PAYDESK_PORT}, instead."
                    );
                    DEFAULT_PAYDESK_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_PAYDESK_PORT);
        let database_url = env::var("PAYDESK_DATABASE_URL").unwrap_or_else(|_| {
            info!("🪛️ PAYDESK_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let fx = FxFeedConfig::new_from_env_or_default();
        Self { host, port, database_url, fx }
    }
}
