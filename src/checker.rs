//! Evaluation cycle and polling loop
//!
//! Each tick re-reads the config file into a fresh snapshot, picks the
//! range for the current hour, evaluates it against a freshly fetched
//! forecast and publishes the window. Forecast transport failures stop the
//! loop unless `global.exit_on_fetch_error` is off; every other failure is
//! logged and the loop carries on.

use crate::config::{Config, RangeConfig};
use crate::dispatch::{RangeChoice, current_hour, select_range};
use crate::error::Result;
use crate::forecast::{EvccClient, ForecastSource};
use crate::homeassistant::{HomeAssistantClient, StatePublisher};
use crate::logging::get_logger;
use crate::window::{LowestPriceWindow, select_lowest_window};
use chrono::Utc;
use std::future::Future;
use std::path::Path;
use tokio::time::{Duration, sleep};

/// What a single cycle did
#[derive(Debug, Clone, PartialEq)]
pub struct CycleOutcome {
    pub choice: RangeChoice,
    /// Window that was (or would have been) published
    pub window: Option<LowestPriceWindow>,
    pub published: bool,
}

/// Drives forecast fetch, window selection and publishing
pub struct TariffChecker {
    source: Box<dyn ForecastSource>,
    publisher: Box<dyn StatePublisher>,
    logger: crate::logging::StructuredLogger,
}

impl TariffChecker {
    pub fn new(source: Box<dyn ForecastSource>, publisher: Box<dyn StatePublisher>) -> Self {
        Self {
            source,
            publisher,
            logger: get_logger("checker"),
        }
    }

    /// Checker wired to the real evcc and Home Assistant HTTP clients
    pub fn from_http() -> Result<Self> {
        Ok(Self::new(
            Box::new(EvccClient::new()?),
            Box::new(HomeAssistantClient::new()?),
        ))
    }

    /// Fetch the forecast and select the cheapest window in `range`
    pub async fn evaluate(&self, host: &str, range: RangeConfig) -> Result<LowestPriceWindow> {
        self.logger.info(&format!(
            "Checking for lowest Price between {}:00 and {}:00",
            range.start, range.end
        ));

        let series = self.source.fetch_forecast(host).await?;
        let window = select_lowest_window(&series, range.start as usize, range.end as usize)?;

        self.logger.info(&format!(
            "Current Price: {:.3} Euro/kWh",
            window.current_price
        ));
        self.logger.info(&format!(
            "Lowest Price: {:.3} Euro/kWh starting at {}:00 - ending at {}:00",
            window.price,
            window.start_hour(),
            window.end_hour()
        ));
        Ok(window)
    }

    /// Run one cycle against a config snapshot at the given hour
    ///
    /// Fetch and selection errors are returned; a failed publish is logged
    /// and reported through [`CycleOutcome::published`].
    pub async fn run_cycle(&self, config: &Config, now_hour: u32) -> Result<CycleOutcome> {
        self.log_settings(config, now_hour);

        let choice = select_range(now_hour, &config.evcc.morning, &config.evcc.afternoon);
        let window = if let Some(range) = choice.range(&config.evcc) {
            self.logger.debug(&format!(
                "Performing {} check based on current time",
                choice
            ));
            self.evaluate(&config.evcc.host, range).await?
        } else {
            self.logger.info("!! OFF SHIFT !!");
            if !config.homeassistant.publish_off_shift {
                return Ok(CycleOutcome {
                    choice,
                    window: None,
                    published: false,
                });
            }
            LowestPriceWindow::default()
        };

        let state = window.state_string();
        let published = match self
            .publisher
            .publish_state(&config.homeassistant, &state)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                self.logger.error(&format!("Failed to publish \"{}\": {}", state, e));
                false
            }
        };

        Ok(CycleOutcome {
            choice,
            window: Some(window),
            published,
        })
    }

    /// Run one cycle using the current wall-clock hour
    pub async fn run_once(&self, config: &Config) -> Result<CycleOutcome> {
        let hour = current_hour(config.global.timezone.as_deref(), Utc::now())?;
        self.run_cycle(config, hour).await
    }

    /// Poll until `shutdown` resolves, the interval drops to 0, or a fatal
    /// error occurs
    ///
    /// The config file at `config_path` is re-read before every cycle; a
    /// missing or invalid file is fatal.
    pub async fn run<F>(&self, config_path: &Path, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            let config = Config::from_file(config_path)?;
            config.validate()?;

            let interval = config.global.interval;
            if interval == 0 {
                self.logger.info("Interval is 0, nothing to do");
                return Ok(());
            }

            match self.run_once(&config).await {
                Ok(outcome) => self.logger.debug(&format!(
                    "Cycle done: {} published={}",
                    outcome.choice, outcome.published
                )),
                Err(e) if e.is_fatal_fetch() && config.global.exit_on_fetch_error => {
                    self.logger.error(&format!("Fatal: {}", e));
                    return Err(e);
                }
                Err(e) => self.logger.warn(&format!("Cycle failed: {}", e)),
            }

            self.logger.debug(&format!("Sleeping for {} seconds", interval));
            tokio::select! {
                () = sleep(Duration::from_secs(interval)) => {}
                () = &mut shutdown => {
                    self.logger.info("Shutdown requested");
                    return Ok(());
                }
            }
        }
    }

    fn log_settings(&self, config: &Config, now_hour: u32) {
        self.logger.debug(&format!("Current Hour: {}", now_hour));
        self.logger.debug(&format!("Config Setting Interval={}", config.global.interval));
        self.logger.debug(&format!("Config Setting EVCC_Host={}", config.evcc.host));
        self.logger.debug(&format!(
            "Config Setting Morning={}-{} Afternoon={}-{}",
            config.evcc.morning.start,
            config.evcc.morning.end,
            config.evcc.afternoon.start,
            config.evcc.afternoon.end
        ));
        self.logger.debug(&format!(
            "Config Setting HA_Host={} HA_Token={} HA_EntityID={}",
            config.homeassistant.host,
            config.homeassistant.masked_token(),
            config.homeassistant.text_entityid
        ));
    }
}
