//! # FX feed client
//!
//! A small client for the external exchange-rate service that PayDesk uses to refresh its
//! currency catalog. The service returns a rate sheet keyed by currency code, relative to a
//! single base currency.
//!
//! The client is deliberately dumb: it fetches and validates the sheet, and nothing else.
//! Deciding which local currencies the sheet applies to is the catalog service's job.
mod api;
mod config;
mod error;

mod data_objects;

pub use api::FxFeedApi;
pub use config::FxFeedConfig;
pub use data_objects::RateSheet;
pub use error::FxFeedError;
