//! Leaderboard ranking over asset summaries

use crate::models::{AssetSummary, LeaderEntry, LeaderboardMetric, SortDirection};
use std::cmp::Ordering;

/// Stable top-N by a key; equal keys keep their input order
pub fn top_n<T, F>(items: &[T], n: usize, direction: SortDirection, key: F) -> Vec<&T>
where
    F: Fn(&T) -> f64,
{
    let mut ranked: Vec<&T> = items.iter().collect();
    ranked.sort_by(|a, b| {
        let ord = key(a).partial_cmp(&key(b)).unwrap_or(Ordering::Equal);
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
    ranked.truncate(n);
    ranked
}

/// Rank summaries by one metric; assets without a finite value are left out
pub fn leaders(
    summaries: &[AssetSummary],
    metric: LeaderboardMetric,
    n: usize,
    direction: SortDirection,
) -> Vec<LeaderEntry> {
    let candidates: Vec<(&AssetSummary, f64)> = summaries
        .iter()
        .filter_map(|s| metric.value(&s.metrics).map(|v| (s, v)))
        .collect();

    top_n(&candidates, n, direction, |(_, value)| *value)
        .into_iter()
        .map(|(summary, value)| LeaderEntry {
            symbol: summary.symbol.clone(),
            name: summary.name.clone(),
            value: *value,
        })
        .collect()
}
