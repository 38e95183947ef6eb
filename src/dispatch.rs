//! Time-of-day dispatch between the morning and afternoon lookup ranges

use crate::config::{EvccConfig, RangeConfig};
use crate::error::{Result, TariffError};
use chrono::{DateTime, Local, Timelike, Utc};
use std::fmt;
use std::str::FromStr;

/// Which configured range, if any, is evaluated this cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeChoice {
    Morning,
    Afternoon,
    OffShift,
}

impl RangeChoice {
    /// Lookup range for this choice; `None` while off shift
    pub const fn range(self, evcc: &EvccConfig) -> Option<RangeConfig> {
        match self {
            Self::Morning => Some(evcc.morning),
            Self::Afternoon => Some(evcc.afternoon),
            Self::OffShift => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::OffShift => "off-shift",
        }
    }
}

impl fmt::Display for RangeChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First match wins, so morning takes precedence when the ranges overlap
pub const fn select_range(
    now_hour: u32,
    morning: &RangeConfig,
    afternoon: &RangeConfig,
) -> RangeChoice {
    if morning.contains_hour(now_hour) {
        RangeChoice::Morning
    } else if afternoon.contains_hour(now_hour) {
        RangeChoice::Afternoon
    } else {
        RangeChoice::OffShift
    }
}

/// Hour of `now` in the given IANA timezone, or in host local time
pub fn current_hour(timezone: Option<&str>, now: DateTime<Utc>) -> Result<u32> {
    match timezone {
        Some(name) => {
            let tz = chrono_tz::Tz::from_str(name)
                .map_err(|e| TariffError::config(format!("Unknown timezone {}: {}", name, e)))?;
            Ok(now.with_timezone(&tz).hour())
        }
        None => Ok(now.with_timezone(&Local).hour()),
    }
}
