//! Regular grid sampling inside a polygonal area of interest

use geo::coordinate_position::{CoordPos, CoordinatePosition};
use geo::{coord, Area, BoundingRect, MultiPolygon, Rect};
use serde::Serialize;
use tracing::{debug, warn};

use super::cancel::CancelToken;
use crate::error::{Result, StatisticsError};

/// Geometries covering less than this share of their envelope are rejected
pub const MIN_TARGET_PROPORTION: f64 = 0.0001;

/// Grid rows visited between two cancellation checks
const CANCEL_CHECK_ROWS: usize = 1024;

/// A planar sample coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SamplePoint {
    pub x: f64,
    pub y: f64,
}

/// Validated sampling frame for one area of interest.
///
/// Construction runs the sliver check once; the grid can then be walked at
/// any number of resolutions (one per layer) without repeating it.
#[derive(Debug, Clone)]
pub struct SamplingGrid<'a> {
    area: &'a MultiPolygon<f64>,
    bounds: Rect<f64>,
    target_proportion: f64,
}

impl<'a> SamplingGrid<'a> {
    pub fn new(area: &'a MultiPolygon<f64>) -> Result<Self> {
        let bounds = area.bounding_rect().ok_or(StatisticsError::EmptyGeometry)?;

        let envelope_area = bounds.width() * bounds.height();
        let target_proportion = if envelope_area > 0.0 {
            area.unsigned_area() / envelope_area
        } else {
            0.0
        };

        // NaN proportions fall through to the rejection as well
        if !(target_proportion >= MIN_TARGET_PROPORTION) {
            let percent = 100.0 * target_proportion;
            warn!(percent, "rejecting sliver geometry");
            return Err(StatisticsError::DegenerateGeometry { percent });
        }

        Ok(Self {
            area,
            bounds,
            target_proportion,
        })
    }

    /// Envelope of the area of interest
    pub fn bounds(&self) -> Rect<f64> {
        self.bounds
    }

    /// Polygon area divided by envelope area, in `[0, 1]`
    pub fn target_proportion(&self) -> f64 {
        self.target_proportion
    }

    /// Walk the grid at `resolution` and keep the points inside the area.
    ///
    /// Points are ordered by increasing x, then increasing y. The step count
    /// per axis is `floor(extent / resolution)`, so the grid starts on the
    /// low edge of the envelope and its last node sits at most
    /// `extent - resolution` past it; the high edge is never sampled.
    /// Points lying on the polygon boundary are kept.
    pub fn points(&self, resolution: f64, cancel: &CancelToken) -> Result<Vec<SamplePoint>> {
        if !(resolution > 0.0 && resolution.is_finite()) {
            return Err(StatisticsError::InvalidResolution { resolution });
        }

        let min = self.bounds.min();
        let x_range = (self.bounds.width() / resolution).floor() as usize;
        let y_range = (self.bounds.height() / resolution).floor() as usize;

        let mut points = Vec::new();
        for x in 0..x_range {
            let x_coord = min.x + x as f64 * resolution;
            for y in 0..y_range {
                if y % CANCEL_CHECK_ROWS == 0 && cancel.is_cancelled() {
                    return Err(StatisticsError::Cancelled);
                }
                let y_coord = min.y + y as f64 * resolution;
                let position = self.area.coordinate_position(&coord! { x: x_coord, y: y_coord });
                if position != CoordPos::Outside {
                    points.push(SamplePoint { x: x_coord, y: y_coord });
                }
            }
        }

        debug!(
            resolution,
            columns = x_range,
            rows = y_range,
            kept = points.len(),
            "generated sample grid"
        );

        Ok(points)
    }
}

/// One-shot helper: validate `area` and generate its sample points
pub fn generate_points(area: &MultiPolygon<f64>, resolution: f64) -> Result<Vec<SamplePoint>> {
    SamplingGrid::new(area)?.points(resolution, &CancelToken::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, Polygon};

    fn multi(p: Polygon<f64>) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![p])
    }

    fn square(size: f64) -> MultiPolygon<f64> {
        multi(polygon![
            (x: 0.0, y: 0.0),
            (x: size, y: 0.0),
            (x: size, y: size),
            (x: 0.0, y: size),
        ])
    }

    #[test]
    fn test_full_envelope_point_count() {
        let area = square(100.0);
        let points = generate_points(&area, 10.0).unwrap();
        assert_eq!(points.len(), 100);
        for p in &points {
            assert!(area.coordinate_position(&coord! { x: p.x, y: p.y }) != CoordPos::Outside);
        }
    }

    #[test]
    fn test_row_major_order() {
        let points = generate_points(&square(10.0), 5.0).unwrap();
        let coords: Vec<(f64, f64)> = points.iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(coords, vec![(0.0, 0.0), (0.0, 5.0), (5.0, 0.0), (5.0, 5.0)]);
    }

    #[test]
    fn test_floor_edge_policy() {
        // 10.5 / 5 floors to 2 steps per axis, never 3
        let points = generate_points(&square(10.5), 5.0).unwrap();
        assert_eq!(points.len(), 4);
        assert!(points.iter().all(|p| p.x < 10.0 && p.y < 10.0));
    }

    #[test]
    fn test_resolution_larger_than_extent() {
        let points = generate_points(&square(4.0), 5.0).unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn test_generation_is_deterministic() {
        let area = multi(polygon![
            (x: 0.0, y: 0.0),
            (x: 40.0, y: 3.0),
            (x: 37.0, y: 29.0),
            (x: 5.0, y: 41.0),
        ]);
        let first = generate_points(&area, 1.5).unwrap();
        let second = generate_points(&area, 1.5).unwrap();
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn test_hole_is_skipped() {
        let area = multi(polygon!(
            exterior: [
                (x: 0.0, y: 0.0),
                (x: 10.0, y: 0.0),
                (x: 10.0, y: 10.0),
                (x: 0.0, y: 10.0),
            ],
            interiors: [
                [
                    (x: 3.0, y: 3.0),
                    (x: 7.0, y: 3.0),
                    (x: 7.0, y: 7.0),
                    (x: 3.0, y: 7.0),
                ],
            ],
        ));
        let points = generate_points(&area, 1.0).unwrap();
        // 100 grid nodes minus the 3x3 strictly inside the hole
        assert_eq!(points.len(), 91);
        assert!(!points.iter().any(|p| p.x == 5.0 && p.y == 5.0));
    }

    #[test]
    fn test_sliver_is_rejected() {
        let area = multi(polygon![
            (x: 0.0, y: 0.0),
            (x: 1000.0, y: 1000.0),
            (x: 1000.0, y: 999.99),
        ]);
        match SamplingGrid::new(&area) {
            Err(StatisticsError::DegenerateGeometry { percent }) => {
                assert!(percent < 0.01);
                assert!(percent > 0.0);
            }
            other => panic!("expected degenerate geometry, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_area_envelope_is_rejected() {
        let area = multi(polygon![
            (x: 0.0, y: 0.0),
            (x: 10.0, y: 0.0),
            (x: 20.0, y: 0.0),
        ]);
        assert!(matches!(
            SamplingGrid::new(&area),
            Err(StatisticsError::DegenerateGeometry { .. })
        ));
    }

    #[test]
    fn test_empty_geometry() {
        let area: MultiPolygon<f64> = MultiPolygon::new(vec![]);
        assert!(matches!(
            SamplingGrid::new(&area),
            Err(StatisticsError::EmptyGeometry)
        ));
    }

    #[test]
    fn test_invalid_resolution() {
        let area = square(10.0);
        let grid = SamplingGrid::new(&area).unwrap();
        let cancel = CancelToken::new();
        for resolution in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                grid.points(resolution, &cancel),
                Err(StatisticsError::InvalidResolution { .. })
            ));
        }
    }

    #[test]
    fn test_cancelled_walk_stops() {
        let area = square(10.0);
        let grid = SamplingGrid::new(&area).unwrap();
        let cancel = CancelToken::new();
        cancel.cancel();
        assert!(matches!(
            grid.points(1.0, &cancel),
            Err(StatisticsError::Cancelled)
        ));
    }

    #[test]
    fn test_cancel_lands_inside_tall_column() {
        // One column of 20 million rows: only the per-row check can stop it
        let area = multi(polygon![
            (x: 0.0, y: 0.0),
            (x: 1.0, y: 0.0),
            (x: 1.0, y: 20_000_000.0),
            (x: 0.0, y: 20_000_000.0),
        ]);
        let grid = SamplingGrid::new(&area).unwrap();
        let cancel = CancelToken::new();

        let canceller = {
            let cancel = cancel.clone();
            std::thread::spawn(move || {
                std::thread::sleep(std::time::Duration::from_millis(5));
                cancel.cancel();
            })
        };
        let result = grid.points(1.0, &cancel);
        canceller.join().unwrap();

        assert!(matches!(result, Err(StatisticsError::Cancelled)));
    }

    #[test]
    fn test_target_proportion_of_triangle() {
        let area = multi(polygon![
            (x: 0.0, y: 0.0),
            (x: 10.0, y: 0.0),
            (x: 0.0, y: 10.0),
        ]);
        let grid = SamplingGrid::new(&area).unwrap();
        assert!((grid.target_proportion() - 0.5).abs() < 1e-12);
    }
}
