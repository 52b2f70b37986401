//! Point generation over an area of interest
//!
//! Turns a polygon and a sampling step into an ordered grid of interior
//! sample coordinates, rejecting sliver geometries up front.
//!
//! # Submodules
//! - `grid` - Degeneracy guard and the regular grid walk
//! - `cancel` - Cancellation flag shared with the aggregator

mod cancel;
mod grid;

pub use cancel::CancelToken;
pub use grid::{
    generate_points, SamplePoint, SamplingGrid, MIN_TARGET_PROPORTION,
};
