//! Cheapest price window selection
//!
//! A single left-to-right scan over `series[start_hour..=end_hour]`:
//! a strictly lower price opens a new window, a price equal to the current
//! minimum moves the window end. Equality is by value only, so a later tie
//! extends the window across any higher-priced hours in between.
//!
//! The running minimum is seeded from `series[0]`, not from `start_hour`.
//! When an hour before the range is cheaper than everything inside it, no
//! window is opened and `start`/`end` stay unset (shown as hour 0).

use crate::error::{Result, TariffError};
use crate::forecast::ForecastSeries;
use chrono::{DateTime, FixedOffset, Timelike};

/// Cheapest window found in one evaluation
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LowestPriceWindow {
    pub price: f64,
    pub start: Option<DateTime<FixedOffset>>,
    pub end: Option<DateTime<FixedOffset>>,
    pub current_price: f64,
}

impl LowestPriceWindow {
    pub fn start_hour(&self) -> u32 {
        self.start.map_or(0, |t| t.hour())
    }

    pub fn end_hour(&self) -> u32 {
        self.end.map_or(0, |t| t.hour())
    }

    /// Display string pushed to Home Assistant, e.g. `1:00 - 3:00`
    pub fn state_string(&self) -> String {
        format!("{}:00 - {}:00", self.start_hour(), self.end_hour())
    }
}

/// Find the cheapest window in `series[start_hour..=end_hour]`
///
/// Returns [`TariffError::IndexOutOfRange`] if `end_hour` is not a valid
/// index of the series (this includes an empty series).
#[allow(clippy::float_cmp)]
pub fn select_lowest_window(
    series: &ForecastSeries,
    start_hour: usize,
    end_hour: usize,
) -> Result<LowestPriceWindow> {
    let points = series.points();
    if end_hour >= points.len() {
        return Err(TariffError::index_out_of_range(end_hour, points.len()));
    }

    let mut window = LowestPriceWindow {
        price: points[0].price,
        start: None,
        end: None,
        current_price: series.current_price,
    };

    for point in points.get(start_hour..=end_hour).unwrap_or(&[]) {
        if point.price < window.price {
            window.price = point.price;
            window.start = Some(point.start);
            window.end = Some(point.end);
        } else if point.price == window.price {
            window.end = Some(point.end);
        }
    }

    Ok(window)
}
