//! Per-layer sampling and reduction
//!
//! Drives the sampling grid once per selected layer, queries the raster
//! collaborator at every point (in parallel with Rayon), filters no-data
//! values and reduces the survivors into the layer's statistics.

use geo::{Area, MultiPolygon};
use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::{debug, info};

use super::reduce::round_to;
use super::types::{LayerResult, SampleSet, StatisticsReport};
use crate::config::{LayerConfig, LayerRegistry};
use crate::error::{Result, StatisticsError};
use crate::raster::RasterLookup;
use crate::sampling::{CancelToken, SamplePoint, SamplingGrid};

/// Request-level options that are not tied to a single layer
#[derive(Debug, Clone, Default)]
pub struct ComputeOptions {
    /// Reject geometries whose area exceeds this value
    pub max_area: Option<f64>,
    pub cancel: CancelToken,
}

/// Compute statistics for `area` across the requested layers.
///
/// All requested ids are validated before any sampling happens. Any failure
/// (unknown layer, sliver geometry, lookup error, cancellation) aborts the
/// whole request; no partial report is returned.
pub fn compute_statistics<S, L>(
    area: &MultiPolygon<f64>,
    requested: Option<&[S]>,
    layers: &LayerRegistry,
    lookup: &L,
    options: &ComputeOptions,
) -> Result<StatisticsReport>
where
    S: AsRef<str>,
    L: RasterLookup + ?Sized,
{
    let start = std::time::Instant::now();
    let selected = layers.select(requested)?;
    if selected.is_empty() {
        debug!("no layers selected");
        return Ok(StatisticsReport::default());
    }

    if let Some(limit) = options.max_area {
        let area_value = area.unsigned_area();
        if area_value > limit {
            return Err(StatisticsError::AreaTooLarge {
                area: area_value,
                limit,
            });
        }
    }

    let grid = SamplingGrid::new(area)?;

    let mut report = StatisticsReport::default();
    for (layer_id, config) in selected {
        let result = compute_layer(&grid, layer_id, config, lookup, &options.cancel)?;
        report.layer_statistics.insert(layer_id.to_string(), result);
    }

    info!(
        layers = report.layer_statistics.len(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "statistics computed"
    );

    Ok(report)
}

/// Sample and reduce a single layer over an already validated grid
pub fn compute_layer<L>(
    grid: &SamplingGrid<'_>,
    layer_id: &str,
    config: &LayerConfig,
    lookup: &L,
    cancel: &CancelToken,
) -> Result<LayerResult>
where
    L: RasterLookup + ?Sized,
{
    let points = grid.points(config.resolution, cancel)?;
    let samples = sample_layer(layer_id, &points, config, lookup, cancel)?;

    debug!(
        layer = layer_id,
        points = points.len(),
        samples = samples.len(),
        "sampled layer"
    );

    Ok(reduce_layer(&samples, config))
}

fn sample_layer<L>(
    layer_id: &str,
    points: &[SamplePoint],
    config: &LayerConfig,
    lookup: &L,
    cancel: &CancelToken,
) -> Result<SampleSet>
where
    L: RasterLookup + ?Sized,
{
    let raw: Vec<Option<f64>> = points
        .par_iter()
        .map(|p| {
            if cancel.is_cancelled() {
                return Err(StatisticsError::Cancelled);
            }
            lookup
                .lookup(layer_id, p.x, p.y)
                .map_err(|source| StatisticsError::Lookup {
                    layer: layer_id.to_string(),
                    source,
                })
        })
        .collect::<Result<_>>()?;

    Ok(SampleSet::collect(raw, config.no_data))
}

/// Apply the layer's statistics to `samples` and round each value
pub fn reduce_layer(samples: &SampleSet, config: &LayerConfig) -> LayerResult {
    let results: IndexMap<_, _> = config
        .statistics
        .iter()
        .map(|kind| (*kind, round_to(kind.apply(samples.values()), config.round)))
        .collect();

    LayerResult {
        results,
        unit: config.unit.clone(),
        order: config.order.clone(),
    }
}
