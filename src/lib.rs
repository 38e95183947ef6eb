//! # Tariff Check - cheapest evcc price window for Home Assistant
//!
//! Periodically reads the day-ahead price forecast from an evcc instance,
//! finds the cheapest contiguous window inside the morning or afternoon
//! lookup range, and publishes it as a `H:00 - H:00` state string to a
//! Home Assistant entity.
//!
//! ## Architecture
//!
//! - `config`: TOML/YAML configuration, re-read every cycle
//! - `logging`: Structured logging and tracing
//! - `forecast`: evcc API client and forecast types
//! - `window`: Cheapest window selection
//! - `dispatch`: Morning/afternoon range selection by hour of day
//! - `homeassistant`: Home Assistant state publisher
//! - `checker`: Evaluation cycle and polling loop

pub mod checker;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod forecast;
pub mod homeassistant;
pub mod logging;
pub mod window;

// Re-export commonly used types
pub use checker::{CycleOutcome, TariffChecker};
pub use config::Config;
pub use dispatch::{RangeChoice, select_range};
pub use error::{Result, TariffError};
pub use window::{LowestPriceWindow, select_lowest_window};
