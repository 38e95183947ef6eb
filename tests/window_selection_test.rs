use chrono::{DateTime, Duration, FixedOffset, TimeZone, Timelike};
use tariff_check::TariffError;
use tariff_check::forecast::{ForecastPoint, ForecastSeries};
use tariff_check::window::select_lowest_window;

fn midnight() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(2 * 3600)
        .unwrap()
        .with_ymd_and_hms(2024, 6, 3, 0, 0, 0)
        .unwrap()
}

fn hourly(prices: &[f64]) -> ForecastSeries {
    let base = midnight();
    let points = prices
        .iter()
        .enumerate()
        .map(|(i, &price)| ForecastPoint {
            start: base + Duration::hours(i as i64),
            end: base + Duration::hours(i as i64 + 1),
            price,
        })
        .collect();
    ForecastSeries::new(points, 0.312)
}

#[test]
fn end_to_end_example() {
    let base = midnight();
    let series = ForecastSeries::new(
        [10.0, 7.0, 7.0, 9.0]
            .iter()
            .enumerate()
            .map(|(i, &price)| ForecastPoint {
                start: base + Duration::hours(i as i64),
                end: base + Duration::hours(i as i64 + 1),
                price,
            })
            .collect(),
        8.5,
    );

    let window = select_lowest_window(&series, 0, 3).unwrap();
    assert_eq!(window.price, 7.0);
    assert_eq!(window.start.unwrap().hour(), 1);
    assert_eq!(window.end.unwrap().hour(), 3);
    assert_eq!(window.current_price, 8.5);
}

#[test]
fn price_is_range_minimum_when_seed_is_not_lower() {
    // Index 0 is the most expensive hour, so the seed never masks the range
    let prices = [
        0.50, 0.31, 0.29, 0.27, 0.27, 0.30, 0.33, 0.35, 0.32, 0.28, 0.24, 0.22, 0.21, 0.23,
        0.26, 0.30, 0.38, 0.41, 0.44, 0.40, 0.36, 0.33, 0.31, 0.30,
    ];
    let series = hourly(&prices);

    for (a, b) in [(1, 23), (5, 11), (12, 18), (2, 4), (16, 16)] {
        let window = select_lowest_window(&series, a, b).unwrap();
        let expected = prices[a..=b].iter().copied().fold(f64::INFINITY, f64::min);
        assert_eq!(window.price, expected, "range {}..={}", a, b);
    }
}

#[test]
fn equal_prices_extend_the_window() {
    let series = hourly(&[9.0, 5.0, 5.0, 5.0]);
    let window = select_lowest_window(&series, 1, 3).unwrap();
    assert_eq!(window.price, 5.0);
    assert_eq!(window.start, Some(series.points()[1].start));
    assert_eq!(window.end, Some(series.points()[3].end));
    assert_eq!(window.state_string(), "1:00 - 4:00");
}

#[test]
fn new_minimum_discards_accumulated_ties() {
    let series = hourly(&[9.0, 5.0, 5.0, 3.0, 5.0]);
    let window = select_lowest_window(&series, 1, 4).unwrap();
    assert_eq!(window.price, 3.0);
    assert_eq!(window.start, Some(series.points()[3].start));
    assert_eq!(window.end, Some(series.points()[3].end));
}

#[test]
fn non_adjacent_tie_extends_over_higher_hours() {
    let series = hourly(&[9.0, 3.0, 5.0, 3.0]);
    let window = select_lowest_window(&series, 1, 3).unwrap();
    assert_eq!(window.start, Some(series.points()[1].start));
    assert_eq!(window.end, Some(series.points()[3].end));
    assert_eq!(window.state_string(), "1:00 - 4:00");
}

#[test]
fn single_hour_range_returns_that_hour() {
    let series = hourly(&[9.0, 8.0, 4.0, 6.0]);
    let window = select_lowest_window(&series, 2, 2).unwrap();
    assert_eq!(window.price, 4.0);
    assert_eq!(window.start, Some(series.points()[2].start));
    assert_eq!(window.end, Some(series.points()[2].end));
}

#[test]
fn single_hour_range_at_index_zero_only_sets_end() {
    // The seed equals hour 0, so the tie branch fires instead of the new-minimum branch
    let series = hourly(&[4.0, 8.0]);
    let window = select_lowest_window(&series, 0, 0).unwrap();
    assert_eq!(window.price, 4.0);
    assert_eq!(window.start, None);
    assert_eq!(window.end, Some(series.points()[0].end));
    assert_eq!(window.state_string(), "0:00 - 1:00");
}

#[test]
fn cheaper_hour_before_range_leaves_window_unset() {
    let series = hourly(&[1.0, 4.0, 3.0, 5.0]);
    let window = select_lowest_window(&series, 1, 3).unwrap();
    assert_eq!(window.price, 1.0);
    assert_eq!(window.start, None);
    assert_eq!(window.end, None);
    assert_eq!(window.state_string(), "0:00 - 0:00");
}

#[test]
fn end_hour_past_series_is_an_error() {
    let series = hourly(&[0.3; 12]);
    let err = select_lowest_window(&series, 6, 12).unwrap_err();
    assert!(matches!(err, TariffError::IndexOutOfRange { index: 12, len: 12 }));
    assert!(format!("{}", err).contains("out of range"));
}

#[test]
fn empty_series_is_an_error() {
    let err = select_lowest_window(&ForecastSeries::default(), 0, 0).unwrap_err();
    assert!(matches!(err, TariffError::IndexOutOfRange { len: 0, .. }));
}

#[test]
fn inverted_range_scans_nothing() {
    let series = hourly(&[9.0, 1.0, 2.0]);
    let window = select_lowest_window(&series, 2, 1).unwrap();
    assert_eq!(window.price, 9.0);
    assert_eq!(window.start, None);
    assert_eq!(window.end, None);
}
