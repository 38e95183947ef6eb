//! Home Assistant state publisher
//!
//! Pushes the cheapest window string to an entity through the REST API:
//! `POST http://{host}/api/states/{entity_id}` with a bearer token and a
//! `{"state": "..."}` JSON body.

use crate::config::HomeAssistantConfig;
use crate::error::{Result, TariffError};
use crate::logging::{LogContext, get_logger_with_context};
use reqwest::header::CONTENT_TYPE;
use serde_json::json;
use std::time::Duration;

/// Anything that can display a state string on the hub
#[async_trait::async_trait]
pub trait StatePublisher: Send + Sync {
    async fn publish_state(&self, target: &HomeAssistantConfig, state: &str) -> Result<()>;
}

/// Home Assistant REST API client
pub struct HomeAssistantClient {
    client: reqwest::Client,
}

impl HomeAssistantClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| TariffError::config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    pub fn states_url(host: &str, entity_id: &str) -> String {
        format!("http://{}/api/states/{}", host.trim(), entity_id.trim())
    }
}

#[async_trait::async_trait]
impl StatePublisher for HomeAssistantClient {
    async fn publish_state(&self, target: &HomeAssistantConfig, state: &str) -> Result<()> {
        let url = Self::states_url(&target.host, &target.text_entityid);
        let logger = get_logger_with_context(
            LogContext::new("homeassistant")
                .with_field("host", target.host.trim().to_string())
                .with_field("entity", target.text_entityid.clone()),
        );
        logger.debug(&format!("POST {} state=\"{}\"", url, state));

        let resp = self
            .client
            .post(&url)
            .bearer_auth(target.token.trim())
            .header(CONTENT_TYPE, "application/json")
            .json(&json!({ "state": state }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(TariffError::api(status.as_u16(), message));
        }

        logger.debug(&format!("Updated {} ({})", target.text_entityid, status));
        Ok(())
    }
}
