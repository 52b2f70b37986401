//! Layer configuration
//!
//! The configuration file is JSON:
//!
//! ```json
//! {
//!   "max_area": 25000000.0,
//!   "layers": {
//!     "mnt": {
//!       "resolution": 25.0,
//!       "statistics": ["mean", "min", "max"],
//!       "round": 1,
//!       "unit": "m",
//!       "order": 1,
//!       "raster": { "origin": [2500000.0, 1200000.0], "cell_size": 25.0,
//!                   "width": 400, "height": 400, "path": "mnt.f32" }
//!     }
//!   }
//! }
//! ```
//!
//! `values` is accepted as an alias of `statistics`.

use anyhow::Context;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

use crate::error::{Result, StatisticsError};
use crate::raster::{RasterSet, RasterSource};
use crate::stats::{LayerOrder, NoDataPolicy, StatisticKind};

/// Per-layer sampling and reporting settings
#[derive(Debug, Clone, Deserialize)]
pub struct LayerConfig {
    /// Grid step in the geometry's coordinate units
    pub resolution: f64,
    #[serde(alias = "values")]
    pub statistics: Vec<StatisticKind>,
    /// Decimal digits kept after rounding
    #[serde(default)]
    pub round: u32,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub order: LayerOrder,
    #[serde(default)]
    pub no_data: NoDataPolicy,
    #[serde(default)]
    pub raster: Option<RasterSource>,
}

impl LayerConfig {
    pub fn new(resolution: f64, statistics: Vec<StatisticKind>) -> Self {
        Self {
            resolution,
            statistics,
            round: 0,
            unit: String::new(),
            order: LayerOrder::default(),
            no_data: NoDataPolicy::default(),
            raster: None,
        }
    }

    pub fn with_round(mut self, round: u32) -> Self {
        self.round = round;
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn with_order(mut self, order: LayerOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_no_data(mut self, no_data: NoDataPolicy) -> Self {
        self.no_data = no_data;
        self
    }
}

/// Known layers, kept in configuration order
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct LayerRegistry {
    layers: IndexMap<String, LayerConfig>,
}

impl LayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, layer_id: impl Into<String>, config: LayerConfig) {
        self.layers.insert(layer_id.into(), config);
    }

    pub fn get(&self, layer_id: &str) -> Option<&LayerConfig> {
        self.layers.get(layer_id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.layers.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LayerConfig)> {
        self.layers.iter().map(|(id, config)| (id.as_str(), config))
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Resolve the layers a request asks for.
    ///
    /// `None` selects every configured layer. Otherwise each id must be
    /// known; the first unknown id fails the whole request.
    pub fn select<'a, S: AsRef<str>>(
        &'a self,
        requested: Option<&[S]>,
    ) -> Result<Vec<(&'a str, &'a LayerConfig)>> {
        let Some(requested) = requested else {
            return Ok(self.iter().collect());
        };

        let mut selected: Vec<(&str, &LayerConfig)> = Vec::with_capacity(requested.len());
        for id in requested {
            let id = id.as_ref();
            let (key, config) = self
                .layers
                .get_key_value(id)
                .ok_or_else(|| StatisticsError::UnknownLayer(id.to_string()))?;
            if !selected.iter().any(|(k, _)| *k == key.as_str()) {
                selected.push((key.as_str(), config));
            }
        }
        Ok(selected)
    }

    fn validate(&self) -> anyhow::Result<()> {
        for (id, config) in &self.layers {
            anyhow::ensure!(
                config.resolution > 0.0 && config.resolution.is_finite(),
                "layer {}: resolution must be a positive number, got {}",
                id,
                config.resolution
            );
        }
        Ok(())
    }
}

/// Whole configuration file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceConfig {
    /// Largest geometry area accepted for a statistics request
    #[serde(default)]
    pub max_area: Option<f64>,
    pub layers: LayerRegistry,
}

impl ServiceConfig {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: ServiceConfig =
            serde_json::from_str(json).context("Failed to parse layer configuration")?;
        config.layers.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_json(&json)?;
        info!(path = %path.display(), layers = config.layers.len(), "loaded layer configuration");
        Ok(config)
    }

    /// Materialize the grids declared by layers that carry a `raster` section
    pub fn load_rasters(&self, base_dir: &Path) -> anyhow::Result<RasterSet> {
        let mut rasters = RasterSet::new();
        for (id, config) in self.layers.iter() {
            if let Some(source) = &config.raster {
                let raster = source
                    .load(base_dir)
                    .with_context(|| format!("Failed to load raster for layer {}", id))?;
                rasters.insert(id, raster);
            }
        }
        Ok(rasters)
    }
}
