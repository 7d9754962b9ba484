use serde::{Deserialize, Serialize};

use super::Metrics;

/// Sort direction for leaderboards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            _ => Err(format!("Invalid direction: '{}'. Valid values: asc, desc", s)),
        }
    }
}

/// Metric fields a leaderboard can rank by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderboardMetric {
    Momentum90d,
    Momentum365d,
    Cagr,
    MaxDrawdown,
    ChangePct,
    Volatility,
    LatestClose,
}

impl Default for LeaderboardMetric {
    fn default() -> Self {
        LeaderboardMetric::ChangePct
    }
}

impl LeaderboardMetric {
    /// Parse from the camelCase field name used in the JSON responses
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "momentum90d" => Ok(LeaderboardMetric::Momentum90d),
            "momentum365d" => Ok(LeaderboardMetric::Momentum365d),
            "cagr" => Ok(LeaderboardMetric::Cagr),
            "maxdrawdown" => Ok(LeaderboardMetric::MaxDrawdown),
            "changepct" => Ok(LeaderboardMetric::ChangePct),
            "volatility" => Ok(LeaderboardMetric::Volatility),
            "latestclose" => Ok(LeaderboardMetric::LatestClose),
            _ => Err(format!(
                "Invalid metric: '{}'. Valid values: momentum90d, momentum365d, cagr, maxDrawdown, changePct, volatility, latestClose",
                s
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LeaderboardMetric::Momentum90d => "momentum90d",
            LeaderboardMetric::Momentum365d => "momentum365d",
            LeaderboardMetric::Cagr => "cagr",
            LeaderboardMetric::MaxDrawdown => "maxDrawdown",
            LeaderboardMetric::ChangePct => "changePct",
            LeaderboardMetric::Volatility => "volatility",
            LeaderboardMetric::LatestClose => "latestClose",
        }
    }

    /// Rankable value of this field; None for null momentum and non-finite numbers
    pub fn value(&self, metrics: &Metrics) -> Option<f64> {
        let value = match self {
            LeaderboardMetric::Momentum90d => metrics.momentum_90d?,
            LeaderboardMetric::Momentum365d => metrics.momentum_365d?,
            LeaderboardMetric::Cagr => metrics.cagr,
            LeaderboardMetric::MaxDrawdown => metrics.max_drawdown,
            LeaderboardMetric::ChangePct => metrics.change_pct,
            LeaderboardMetric::Volatility => metrics.volatility,
            LeaderboardMetric::LatestClose => metrics.latest_close,
        };
        value.is_finite().then_some(value)
    }
}

/// One row of a leaderboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderEntry {
    pub symbol: String,
    pub name: String,
    pub value: f64,
}

/// The fixed leaderboards shown on the dashboard
#[derive(Debug, Clone, Default, Serialize)]
pub struct Leaders {
    /// Highest 90-day momentum
    pub momentum: Vec<LeaderEntry>,
    /// Highest CAGR
    pub growth: Vec<LeaderEntry>,
    /// Max drawdown, ascending
    pub stability: Vec<LeaderEntry>,
    /// Largest last-day change
    pub intraday: Vec<LeaderEntry>,
}

/// Response of `/api/insights`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    pub datasets: usize,
    pub last_updated: Option<String>,
    pub leaders: Leaders,
}
