//! Statistics data types
//!
//! Sample sets, per-layer results and the response envelope.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::kind::StatisticKind;

/// How raster lookups are filtered before reduction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoDataPolicy {
    /// Drop missing values and zeros (legacy truthiness filter).
    /// NaN is truthy and reaches the reductions.
    #[default]
    Falsy,
    /// Drop missing values and NaN; real zero readings are kept
    Null,
}

impl NoDataPolicy {
    pub fn accepts(self, value: Option<f64>) -> Option<f64> {
        let v = value?;
        match self {
            NoDataPolicy::Falsy if v == 0.0 => None,
            NoDataPolicy::Null if v.is_nan() => None,
            _ => Some(v),
        }
    }
}

/// Raster values that survived the no-data filter for one layer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleSet {
    values: Vec<f64>,
}

impl SampleSet {
    /// Build a sample set from raw lookups, keeping lookup order
    pub fn collect<I>(lookups: I, policy: NoDataPolicy) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let values = lookups
            .into_iter()
            .filter_map(|v| policy.accepts(v))
            .collect();
        Self { values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Display order of a layer; either numeric or a free-form label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayerOrder {
    Index(i64),
    Label(String),
}

impl Default for LayerOrder {
    fn default() -> Self {
        LayerOrder::Index(0)
    }
}

/// Statistics for a single layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerResult {
    /// Rounded statistic values, in the order the layer requested them
    pub results: IndexMap<StatisticKind, f64>,
    pub unit: String,
    pub order: LayerOrder,
}

impl LayerResult {
    pub fn get(&self, kind: StatisticKind) -> Option<f64> {
        self.results.get(&kind).copied()
    }
}

/// Response envelope: one [`LayerResult`] per computed layer
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatisticsReport {
    pub layer_statistics: IndexMap<String, LayerResult>,
}

impl StatisticsReport {
    pub fn layer(&self, layer_id: &str) -> Option<&LayerResult> {
        self.layer_statistics.get(layer_id)
    }
}
