//! Statistics aggregation for raster layers over an area of interest
//!
//! # Submodules
//! - `kind` - Closed set of statistic functions
//! - `reduce` - Pure reductions and rounding
//! - `types` - Sample sets, layer results and the report envelope
//! - `aggregator` - Request entry point tying sampling, lookup and reduction together

mod aggregator;
mod kind;
pub mod reduce;
mod types;

pub use aggregator::{compute_layer, compute_statistics, reduce_layer, ComputeOptions};
pub use kind::StatisticKind;
pub use types::{LayerOrder, LayerResult, NoDataPolicy, SampleSet, StatisticsReport};
