//! Raster statistics over a drawn area of interest
//!
//! Given a polygon and a set of configured raster layers, sample each layer
//! on a regular grid inside the polygon and reduce the sampled values into
//! summary statistics (mean, min, max, median, std, sum).
//!
//! # Modules
//! - `sampling` - Grid point generation and the sliver-geometry guard
//! - `stats` - Statistic kinds, reductions and the per-layer aggregator
//! - `config` - Layer configuration loading
//! - `raster` - Raster lookup seam and an in-memory grid implementation
//! - `geometry` - GeoJSON area-of-interest parsing
//! - `service` - JSON-RPC handlers used by the `stats_server` binary
//!
//! # Example
//! ```
//! use geo::{polygon, MultiPolygon};
//! use raster_statistics::{compute_statistics, ComputeOptions, LayerConfig, LayerRegistry, StatisticKind};
//!
//! let area = MultiPolygon::new(vec![polygon![
//!     (x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 10.0), (x: 0.0, y: 10.0),
//! ]]);
//! let mut layers = LayerRegistry::new();
//! layers.insert("mnt", LayerConfig::new(5.0, vec![StatisticKind::Mean]).with_round(1));
//!
//! let lookup = |_: &str, _: f64, _: f64| -> anyhow::Result<Option<f64>> { Ok(Some(10.0)) };
//! let report = compute_statistics::<&str, _>(&area, None, &layers, &lookup, &ComputeOptions::default())?;
//! assert_eq!(report.layer("mnt").unwrap().get(StatisticKind::Mean), Some(10.0));
//! # Ok::<(), raster_statistics::StatisticsError>(())
//! ```

pub mod config;
pub mod error;
pub mod geometry;
pub mod raster;
pub mod sampling;
pub mod service;
pub mod stats;

pub use config::{LayerConfig, LayerRegistry, ServiceConfig};
pub use error::{ErrorClass, Result, StatisticsError};
pub use geometry::{area_from_geojson_str, area_from_json_value};
pub use raster::{GridRaster, RasterLookup, RasterSet, RasterSource};
pub use sampling::{generate_points, CancelToken, SamplePoint, SamplingGrid};
pub use stats::{
    compute_statistics, ComputeOptions, LayerOrder, LayerResult, NoDataPolicy, SampleSet,
    StatisticKind, StatisticsReport,
};
