//! Metrics engine
//!
//! Pure functions from an ascending price series to [`Metrics`]. Nothing here
//! returns an error: degenerate inputs degrade to `0` or `None`.

use crate::constants::{
    MOMENTUM_LONG_DAYS, MOMENTUM_SHORT_DAYS, MS_PER_DAY, MS_PER_YEAR, TRADING_DAYS_PER_YEAR,
};
use crate::models::{Metrics, PricePoint};

/// Compute every metric for a series (expected length >= 2, ascending by timestamp)
pub fn calculate_metrics(series: &[PricePoint]) -> Metrics {
    let closes: Vec<f64> = series.iter().map(|p| p.close).collect();

    let latest_close = closes.last().copied().unwrap_or(0.0);
    let previous_close = closes
        .len()
        .checked_sub(2)
        .and_then(|i| closes.get(i).copied())
        .unwrap_or(0.0);
    let (year_high, year_low) = high_low(&closes);

    Metrics {
        latest_close,
        previous_close,
        change_pct: change_percent(latest_close, previous_close),
        year_high,
        year_low,
        max_drawdown: max_drawdown(&closes),
        volatility: annualized_volatility(&closes),
        cagr: cagr(series),
        momentum_90d: range_change(series, MOMENTUM_SHORT_DAYS),
        momentum_365d: range_change(series, MOMENTUM_LONG_DAYS),
        sample_count: series.len(),
    }
}

/// ((current - previous) / previous) * 100, or 0 when previous is 0
pub fn change_percent(current: f64, previous: f64) -> f64 {
    if previous != 0.0 {
        (current - previous) / previous * 100.0
    } else {
        0.0
    }
}

/// Max and min over all closes
pub fn high_low(closes: &[f64]) -> (f64, f64) {
    let Some(&first) = closes.first() else {
        return (0.0, 0.0);
    };

    let mut high = first;
    let mut low = first;
    for &close in &closes[1..] {
        if close > high {
            high = close;
        }
        if close < low {
            low = close;
        }
    }
    (high, low)
}

/// Most negative percentage decline from the running peak (<= 0)
pub fn max_drawdown(closes: &[f64]) -> f64 {
    let Some(&first) = closes.first() else {
        return 0.0;
    };

    let mut peak = first;
    let mut max_dd = 0.0;
    for &price in closes {
        if price > peak {
            peak = price;
        }
        let dd = (price - peak) / peak * 100.0;
        if dd < max_dd {
            max_dd = dd;
        }
    }
    max_dd
}

/// Percentage change across the trailing `days` calendar days ending at the last point
///
/// None when fewer than two points fall inside the window, or the window's
/// first close is zero or non-finite.
pub fn range_change(series: &[PricePoint], days: i64) -> Option<f64> {
    let last_ts = series.last()?.timestamp;
    let cutoff = last_ts.saturating_sub(days.saturating_mul(MS_PER_DAY));

    let mut window = series.iter().filter(|p| p.timestamp >= cutoff);
    let start = window.next()?.close;
    let end = window.last()?.close;

    if !start.is_finite() || start == 0.0 {
        return None;
    }
    Some((end - start) / start * 100.0)
}

/// Annualized volatility (percent) of daily log returns, population variance
pub fn annualized_volatility(closes: &[f64]) -> f64 {
    let mut returns = Vec::with_capacity(closes.len().saturating_sub(1));
    for pair in closes.windows(2) {
        if pair[0] > 0.0 {
            returns.push((pair[1] / pair[0]).ln());
        }
    }

    let denominator = returns.len().max(1) as f64;

    let mut sum = 0.0;
    for r in &returns {
        sum += r;
    }
    let mean = sum / denominator;

    let mut squared = 0.0;
    for r in &returns {
        squared += (r - mean).powi(2);
    }
    let variance = squared / denominator;

    variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt() * 100.0
}

/// Compound annual growth rate (percent) between the first and last close
pub fn cagr(series: &[PricePoint]) -> f64 {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return 0.0;
    };

    let span_years = (last.timestamp - first.timestamp) as f64 / MS_PER_YEAR;
    if span_years > 0.0 {
        ((last.close / first.close).powf(1.0 / span_years) - 1.0) * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::date_from_millis;

    const T0: i64 = 1_704_067_200_000; // 2024-01-01

    fn daily_series(closes: &[f64]) -> Vec<PricePoint> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let ts = T0 + i as i64 * MS_PER_DAY;
                PricePoint::new(ts, date_from_millis(ts).unwrap(), close, close)
            })
            .collect()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-2,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_reference_scenario() {
        let metrics = calculate_metrics(&daily_series(&[100.0, 110.0, 90.0, 120.0]));

        assert_eq!(metrics.latest_close, 120.0);
        assert_eq!(metrics.previous_close, 90.0);
        assert_close(metrics.change_pct, 33.33);
        assert_close(metrics.max_drawdown, -18.18);
        assert_eq!(metrics.year_high, 120.0);
        assert_eq!(metrics.year_low, 90.0);
        assert_eq!(metrics.sample_count, 4);
        // 3 days of data sit inside both windows
        assert_close(metrics.momentum_90d.unwrap(), 20.0);
        assert_close(metrics.momentum_365d.unwrap(), 20.0);
    }

    #[test]
    fn test_two_points() {
        let metrics = calculate_metrics(&daily_series(&[50.0, 55.0]));

        assert_eq!(metrics.previous_close, 50.0);
        assert_close(metrics.change_pct, 10.0);
        assert_eq!(metrics.sample_count, 2);
    }

    #[test]
    fn test_zero_previous_close_gives_zero_change() {
        let metrics = calculate_metrics(&daily_series(&[0.0, 5.0]));
        assert_eq!(metrics.change_pct, 0.0);
    }

    #[test]
    fn test_flat_series() {
        let metrics = calculate_metrics(&daily_series(&[42.0, 42.0, 42.0, 42.0]));

        assert_eq!(metrics.year_high, 42.0);
        assert_eq!(metrics.year_low, 42.0);
        assert_eq!(metrics.max_drawdown, 0.0);
        assert_eq!(metrics.volatility, 0.0);
        assert_eq!(metrics.cagr, 0.0);
    }

    #[test]
    fn test_non_decreasing_series_has_no_drawdown() {
        assert_eq!(max_drawdown(&[1.0, 1.0, 2.0, 3.0, 3.0, 10.0]), 0.0);
    }

    #[test]
    fn test_drawdown_is_never_positive() {
        let samples: [&[f64]; 4] = [
            &[5.0, 4.0, 3.0],
            &[1.0, 9.0, 2.0, 9.5, 0.5],
            &[3.0, 3.0],
            &[10.0, 20.0, 15.0, 25.0],
        ];
        for closes in samples {
            assert!(max_drawdown(closes) <= 0.0);
        }
        assert_close(max_drawdown(&[1.0, 9.0, 2.0, 9.5, 0.5]), -94.74);
    }

    #[test]
    fn test_year_high_low_span_whole_series() {
        // a value older than a year still counts
        let mut series = daily_series(&[10.0, 20.0]);
        series.insert(0, PricePoint::new(T0 - 800 * MS_PER_DAY, date_from_millis(T0).unwrap(), 500.0, 500.0));
        let metrics = calculate_metrics(&series);

        assert_eq!(metrics.year_high, 500.0);
        assert_eq!(metrics.year_low, 10.0);
    }

    #[test]
    fn test_increasing_series_has_positive_cagr() {
        let metrics = calculate_metrics(&daily_series(&[10.0, 11.0, 12.5, 13.0]));

        assert!(metrics.cagr > 0.0);
        assert_close(metrics.change_pct, (13.0 - 12.5) / 12.5 * 100.0);
    }

    #[test]
    fn test_cagr_one_year_doubling() {
        let ts1 = T0 + 365 * MS_PER_DAY;
        let series = vec![
            PricePoint::new(T0, date_from_millis(T0).unwrap(), 50.0, 50.0),
            PricePoint::new(ts1, date_from_millis(ts1).unwrap(), 100.0, 100.0),
        ];
        assert_close(cagr(&series), 100.0);
    }

    #[test]
    fn test_cagr_zero_span() {
        let series = vec![
            PricePoint::new(T0, date_from_millis(T0).unwrap(), 50.0, 50.0),
            PricePoint::new(T0, date_from_millis(T0).unwrap(), 60.0, 60.0),
        ];
        assert_eq!(cagr(&series), 0.0);
    }

    #[test]
    fn test_momentum_within_a_single_day() {
        let day = date_from_millis(T0).unwrap();
        let series = vec![
            PricePoint::new(T0, day, 10.0, 10.0),
            PricePoint::new(T0 + 1000, day, 11.0, 11.0),
        ];
        let metrics = calculate_metrics(&series);

        // both points are inside the window, so momentum is defined
        assert_close(metrics.momentum_90d.unwrap(), 10.0);
    }

    #[test]
    fn test_momentum_single_point_in_window_is_none() {
        let old = T0 - 200 * MS_PER_DAY;
        let series = vec![
            PricePoint::new(old, date_from_millis(old).unwrap(), 10.0, 10.0),
            PricePoint::new(T0, date_from_millis(T0).unwrap(), 20.0, 20.0),
        ];

        assert!(range_change(&series, 90).is_none());
        assert_close(range_change(&series, 365).unwrap(), 100.0);
    }

    #[test]
    fn test_momentum_window_boundary_is_inclusive() {
        let start = T0 - 90 * MS_PER_DAY;
        let series = vec![
            PricePoint::new(start - 1, date_from_millis(start).unwrap(), 1.0, 1.0),
            PricePoint::new(start, date_from_millis(start).unwrap(), 50.0, 50.0),
            PricePoint::new(T0, date_from_millis(T0).unwrap(), 75.0, 75.0),
        ];

        assert_close(range_change(&series, 90).unwrap(), 50.0);
    }

    #[test]
    fn test_momentum_zero_start_is_none() {
        let series = daily_series(&[0.0, 10.0, 12.0]);
        assert!(range_change(&series, 90).is_none());
    }

    #[test]
    fn test_volatility_matches_population_formula() {
        let closes = [100.0, 110.0, 99.0];
        let r1 = (110.0f64 / 100.0).ln();
        let r2 = (99.0f64 / 110.0).ln();
        let mean = (r1 + r2) / 2.0;
        let variance = ((r1 - mean).powi(2) + (r2 - mean).powi(2)) / 2.0;
        let expected = variance.sqrt() * 252f64.sqrt() * 100.0;

        assert!((annualized_volatility(&closes) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_volatility_skips_non_positive_bases() {
        // only the 0 -> 5 return is skipped, leaving one return and zero variance
        assert_eq!(annualized_volatility(&[0.0, 5.0, 10.0]), 0.0);
        assert_eq!(annualized_volatility(&[0.0, 0.0]), 0.0);
    }
}
