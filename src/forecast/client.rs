use crate::error::{Result, TariffError};
use crate::forecast::ForecastSource;
use crate::forecast::types::{EvccState, ForecastSeries};
use crate::logging::{LogContext, get_logger_with_context};
use reqwest::header::ACCEPT;
use std::time::Duration;

/// evcc local API client
pub struct EvccClient {
    client: reqwest::Client,
}

impl EvccClient {
    /// Create new evcc client
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| TariffError::config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// State endpoint for a host such as `192.168.1.20:7070`
    pub fn state_url(host: &str) -> String {
        format!("http://{}/api/state", host.trim())
    }
}

#[async_trait::async_trait]
impl ForecastSource for EvccClient {
    async fn fetch_forecast(&self, host: &str) -> Result<ForecastSeries> {
        let url = Self::state_url(host);
        let logger = get_logger_with_context(
            LogContext::new("evcc").with_field("host", host.trim().to_string()),
        );
        logger.debug(&format!("GET {}", url));

        let resp = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| TariffError::network(format!("error making http request: {}", e)))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| TariffError::network(format!("error reading response: {}", e)))?;
        logger.trace(&format!("{} answered {} ({} bytes)", url, status, body.len()));

        if !status.is_success() {
            logger.error(&format!("evcc API error: {}", status));
            return Err(TariffError::api(status.as_u16(), body));
        }

        let state: EvccState = serde_json::from_str(&body).map_err(|e| {
            logger.error(&format!("error decoding data: {}", e));
            TariffError::decode(e.to_string())
        })?;

        let series = ForecastSeries::from(state);
        logger.debug(&format!(
            "Fetched {} forecast points, current tariff {:.3}",
            series.len(),
            series.current_price
        ));
        Ok(series)
    }
}
