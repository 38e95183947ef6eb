use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

/// One pricing interval of the forecast grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastPoint {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub price: f64,
}

/// Forecast grid indexed by hour of day, plus the live tariff at fetch time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastSeries {
    points: Vec<ForecastPoint>,
    /// Live tariff; not part of the grid
    pub current_price: f64,
}

impl ForecastSeries {
    pub const fn new(points: Vec<ForecastPoint>, current_price: f64) -> Self {
        Self {
            points,
            current_price,
        }
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// `GET /api/state` response body; only the fields used here are decoded
#[derive(Debug, Clone, Deserialize)]
pub struct EvccState {
    pub result: EvccStateResult,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvccStateResult {
    #[serde(default)]
    pub tariff_grid: Option<f64>,
    #[serde(default)]
    pub forecast: Option<EvccForecast>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EvccForecast {
    #[serde(default)]
    pub grid: Option<Vec<EvccRate>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EvccRate {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    #[serde(rename = "value")]
    pub price: f64,
}

impl From<EvccState> for ForecastSeries {
    fn from(state: EvccState) -> Self {
        let points = state
            .result
            .forecast
            .and_then(|f| f.grid)
            .unwrap_or_default()
            .into_iter()
            .map(|rate| ForecastPoint {
                start: rate.start,
                end: rate.end,
                price: rate.price,
            })
            .collect();
        Self::new(points, state.result.tariff_grid.unwrap_or(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn decodes_evcc_state_payload() {
        let body = r#"{
            "result": {
                "tariffGrid": 0.287,
                "siteTitle": "Home",
                "forecast": {
                    "grid": [
                        {"start": "2024-05-01T00:00:00+02:00", "end": "2024-05-01T01:00:00+02:00", "value": 0.301},
                        {"start": "2024-05-01T01:00:00+02:00", "end": "2024-05-01T02:00:00+02:00", "value": 0.276}
                    ],
                    "co2": []
                }
            }
        }"#;

        let state: EvccState = serde_json::from_str(body).unwrap();
        let series = ForecastSeries::from(state);

        assert_eq!(series.len(), 2);
        assert!((series.current_price - 0.287).abs() < 1e-9);
        assert_eq!(series.points()[1].start.hour(), 1);
        assert_eq!(series.points()[1].end.hour(), 2);
        assert!((series.points()[1].price - 0.276).abs() < 1e-9);
    }

    #[test]
    fn missing_forecast_yields_empty_series() {
        let state: EvccState = serde_json::from_str(r#"{"result": {"forecast": null}}"#).unwrap();
        let series = ForecastSeries::from(state);
        assert!(series.is_empty());
        assert!(series.current_price.abs() < f64::EPSILON);
    }

    #[test]
    fn timestamps_keep_their_offset() {
        let rate: EvccRate = serde_json::from_str(
            r#"{"start": "2024-05-01T22:00:00Z", "end": "2024-05-01T23:00:00+00:00", "value": 0.1}"#,
        )
        .unwrap();
        assert_eq!(rate.start.hour(), 22);
        assert_eq!(rate.end.offset().local_minus_utc(), 0);
    }
}
