//! Day-ahead price forecast from the evcc local API
//!
//! `GET http://{host}/api/state` returns the live grid tariff and the
//! forecast grid; both are folded into a [`ForecastSeries`].

pub mod client;
pub mod types;

pub use client::EvccClient;
pub use types::{ForecastPoint, ForecastSeries};

use crate::error::Result;

/// Anything that can produce a fresh forecast for a host
#[async_trait::async_trait]
pub trait ForecastSource: Send + Sync {
    async fn fetch_forecast(&self, host: &str) -> Result<ForecastSeries>;
}
