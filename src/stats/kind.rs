//! Supported statistic functions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::reduce;

/// Closed set of reductions a layer can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatisticKind {
    Mean,
    Min,
    Max,
    Median,
    Std,
    Sum,
}

impl StatisticKind {
    pub const ALL: [StatisticKind; 6] = [
        StatisticKind::Mean,
        StatisticKind::Min,
        StatisticKind::Max,
        StatisticKind::Median,
        StatisticKind::Std,
        StatisticKind::Sum,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StatisticKind::Mean => "mean",
            StatisticKind::Min => "min",
            StatisticKind::Max => "max",
            StatisticKind::Median => "median",
            StatisticKind::Std => "std",
            StatisticKind::Sum => "sum",
        }
    }

    /// Apply this reduction to `values` (unrounded)
    pub fn apply(self, values: &[f64]) -> f64 {
        match self {
            StatisticKind::Mean => reduce::mean(values),
            StatisticKind::Min => reduce::min(values),
            StatisticKind::Max => reduce::max(values),
            StatisticKind::Median => reduce::median(values),
            StatisticKind::Std => reduce::std_population(values),
            StatisticKind::Sum => reduce::sum(values),
        }
    }
}

impl fmt::Display for StatisticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatisticKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatisticKind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| anyhow::anyhow!("unknown statistic '{}'", s))
    }
}
