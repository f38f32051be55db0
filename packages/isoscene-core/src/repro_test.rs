#[cfg(test)]
mod tests {
    use crate::extrude::extrude;
    use crate::footprint::validate;
    use crate::mesh::SurfaceRole;
    use crate::models::{Bounds, Category, Footprint, GeoPoint, ProjectionConfig};
    use crate::tile_grid::plan;

    #[test]
    fn test_small_square_extrudes_to_prism() {
        let config = ProjectionConfig::new(-83.0, 40.0);
        let footprint = Footprint {
            id: None,
            coords: vec![
                GeoPoint::new(-83.0, 40.0),
                GeoPoint::new(-82.999, 40.0),
                GeoPoint::new(-82.999, 40.001),
                GeoPoint::new(-83.0, 40.001),
                GeoPoint::new(-83.0, 40.0),
            ],
            height: 10.0,
            category: Category::Generic,
        };

        let polygon = validate(&footprint, &config).expect("valid square");
        assert_eq!(polygon.len(), 4);

        let mesh = extrude(&polygon, footprint.height, &config).expect("mesh");
        assert_eq!(mesh.count_role(SurfaceRole::Wall), 4);
        assert_eq!(mesh.count_role(SurfaceRole::Roof), 1);
        assert_eq!(mesh.count_role(SurfaceRole::Floor), 1);

        // heightScale defaults to 0.8
        let roof = mesh.faces_with_role(SurfaceRole::Roof).next().expect("roof");
        let centroid = mesh.face_centroid(roof);
        assert!((centroid.y - 10.0 * config.height_scale).abs() < 1e-9);
        assert!((centroid.y - 8.0).abs() < 1e-9);

        // roughly 85 m by 111 m at this latitude
        let b = polygon.bounds();
        assert!((b.width() - 111_320.0 * 0.001 * 40f64.to_radians().cos()).abs() < 1e-6);
        assert!((b.depth() - 111.32).abs() < 1e-6);
    }

    #[test]
    fn test_open_ring_at_origin_extrudes_to_prism() {
        let config = ProjectionConfig::new(0.0, 0.0);
        let footprint = Footprint {
            id: None,
            coords: vec![
                GeoPoint::new(0.0, 0.0),
                GeoPoint::new(0.001, 0.0),
                GeoPoint::new(0.001, 0.001),
                GeoPoint::new(0.0, 0.001),
            ],
            height: 10.0,
            category: Category::Generic,
        };

        let polygon = validate(&footprint, &config).expect("valid square");
        assert_eq!(polygon.len(), 4);

        let mesh = extrude(&polygon, footprint.height, &config).expect("mesh");
        assert_eq!(mesh.count_role(SurfaceRole::Wall), 4);
        assert_eq!(mesh.count_role(SurfaceRole::Roof), 1);
        assert_eq!(mesh.count_role(SurfaceRole::Floor), 1);

        let roof = mesh.faces_with_role(SurfaceRole::Roof).next().expect("roof");
        assert!((mesh.face_centroid(roof).y - 8.0).abs() < 1e-9);

        let b = polygon.bounds();
        assert!((b.width() - 111.32).abs() < 1e-6);
        assert!((b.depth() - 111.32).abs() < 1e-6);
    }

    #[test]
    fn test_grid_for_100_by_40_content() {
        let grid = plan(&Bounds::new(0.0, 100.0, 0.0, 40.0), 15.0).expect("grid");
        assert_eq!(grid.cols, 8);
        assert_eq!(grid.rows, 4);
        assert_eq!(grid.tiles.len(), 32);
    }
}
