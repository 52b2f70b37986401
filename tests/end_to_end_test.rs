// Import the library functions
use geo::{polygon, MultiPolygon};
use raster_statistics::{
    area_from_geojson_str, compute_statistics, generate_points, ComputeOptions, LayerConfig,
    LayerOrder, LayerRegistry, StatisticKind, StatisticsError,
};
use std::sync::atomic::{AtomicUsize, Ordering};

fn square(size: f64) -> MultiPolygon<f64> {
    MultiPolygon::new(vec![polygon![
        (x: 0.0, y: 0.0),
        (x: size, y: 0.0),
        (x: size, y: size),
        (x: 0.0, y: size),
    ]])
}

fn constant(value: f64) -> impl Fn(&str, f64, f64) -> anyhow::Result<Option<f64>> + Sync {
    move |_: &str, _: f64, _: f64| Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_constant_layer() {
        let area = square(10.0);

        let points = generate_points(&area, 5.0).unwrap();
        let coords: Vec<(f64, f64)> = points.iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(coords, vec![(0.0, 0.0), (0.0, 5.0), (5.0, 0.0), (5.0, 5.0)]);

        let mut layers = LayerRegistry::new();
        layers.insert(
            "mnt",
            LayerConfig::new(5.0, vec![StatisticKind::Mean])
                .with_round(1)
                .with_unit("m")
                .with_order(LayerOrder::Index(1)),
        );

        let report = compute_statistics::<&str, _>(
            &area,
            None,
            &layers,
            &constant(10.0),
            &ComputeOptions::default(),
        )
        .unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "layer_statistics": {
                    "mnt": { "results": { "mean": 10.0 }, "unit": "m", "order": 1 }
                }
            })
        );
        println!("✓ {}", json);
    }

    #[test]
    fn test_envelope_count_matches_grid() {
        let area = square(120.0);
        let points = generate_points(&area, 4.0).unwrap();
        assert_eq!(points.len(), (120 / 4) * (120 / 4));
    }

    #[test]
    fn test_layers_use_their_own_resolution() {
        let calls = AtomicUsize::new(0);
        let counting = |_: &str, _: f64, _: f64| -> anyhow::Result<Option<f64>> {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(2.0))
        };

        let mut layers = LayerRegistry::new();
        layers.insert("coarse", LayerConfig::new(5.0, vec![StatisticKind::Sum]));
        layers.insert("fine", LayerConfig::new(1.0, vec![StatisticKind::Sum]));

        let report = compute_statistics::<&str, _>(
            &square(10.0),
            None,
            &layers,
            &counting,
            &ComputeOptions::default(),
        )
        .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 4 + 100);
        assert_eq!(report.layer("coarse").unwrap().get(StatisticKind::Sum), Some(8.0));
        assert_eq!(report.layer("fine").unwrap().get(StatisticKind::Sum), Some(200.0));
    }

    #[test]
    fn test_requested_subset_only() {
        let mut layers = LayerRegistry::new();
        layers.insert("a", LayerConfig::new(5.0, vec![StatisticKind::Max]));
        layers.insert("b", LayerConfig::new(5.0, vec![StatisticKind::Min]));

        let report = compute_statistics(
            &square(10.0),
            Some(&["b"][..]),
            &layers,
            &constant(7.0),
            &ComputeOptions::default(),
        )
        .unwrap();

        assert_eq!(report.layer_statistics.len(), 1);
        assert_eq!(report.layer("b").unwrap().get(StatisticKind::Min), Some(7.0));
        assert!(report.layer("a").is_none());
    }

    #[test]
    fn test_sliver_aborts_every_layer() {
        let sliver = MultiPolygon::new(vec![polygon![
            (x: 0.0, y: 0.0),
            (x: 1000.0, y: 1000.0),
            (x: 1000.0, y: 999.99),
        ]]);

        let mut layers = LayerRegistry::new();
        layers.insert("a", LayerConfig::new(5.0, vec![StatisticKind::Mean]));
        layers.insert("b", LayerConfig::new(50.0, vec![StatisticKind::Mean]));

        let result = compute_statistics::<&str, _>(
            &sliver,
            None,
            &layers,
            &constant(1.0),
            &ComputeOptions::default(),
        );
        match result {
            Err(err @ StatisticsError::DegenerateGeometry { .. }) => {
                assert!(err.to_string().starts_with("Target area proportion of geometry is too low"));
            }
            other => panic!("expected degenerate geometry, got {:?}", other),
        }
    }

    #[test]
    fn test_geojson_square_with_hole() {
        let feature = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [
                        [[0, 0], [20, 0], [20, 20], [0, 20], [0, 0]],
                        [[5, 5], [15, 5], [15, 15], [5, 15], [5, 5]]
                    ]
                }
            }]
        }"#;
        let area = area_from_geojson_str(feature).unwrap();

        // 20 by 20 grid minus the 9 by 9 nodes strictly inside the hole
        let points = generate_points(&area, 1.0).unwrap();
        assert_eq!(points.len(), 400 - 81);

        let mut layers = LayerRegistry::new();
        layers.insert(
            "dem",
            LayerConfig::new(1.0, vec![StatisticKind::Median, StatisticKind::Std]).with_round(3),
        );
        let x_as_value = |_: &str, x: f64, _: f64| -> anyhow::Result<Option<f64>> { Ok(Some(x)) };
        let report = compute_statistics::<&str, _>(
            &area,
            None,
            &layers,
            &x_as_value,
            &ComputeOptions::default(),
        )
        .unwrap();

        let dem = report.layer("dem").unwrap();
        // x = 0 samples are dropped as no-data and columns 6..=14 are thinned by the hole
        assert_eq!(dem.get(StatisticKind::Median), Some(10.0));
        assert!(dem.get(StatisticKind::Std).unwrap() > 0.0);
    }
}
