// Local equirectangular projection around a reference center.
//
// Only valid near `center_lat`; it is not conformal and distorts with distance.
use crate::models::{GeoPoint, LocalPoint, ProjectionConfig};

/// Meters per degree of latitude (and of longitude at the equator).
pub const METERS_PER_DEGREE: f64 = 111_320.0;

fn meters_per_degree_lon(center_lat: f64) -> f64 {
    METERS_PER_DEGREE * center_lat.to_radians().cos()
}

/// Map a lon/lat pair to local meters. z is negated so that north is -z in scene space.
pub fn project(point: GeoPoint, config: &ProjectionConfig) -> LocalPoint {
    let x = (point.lon - config.center_lon) * meters_per_degree_lon(config.center_lat) * config.scale;
    let z = -(point.lat - config.center_lat) * METERS_PER_DEGREE * config.scale;
    LocalPoint { x, z }
}

/// Inverse of [`project`].
pub fn unproject(point: LocalPoint, config: &ProjectionConfig) -> GeoPoint {
    let lon = config.center_lon + point.x / (meters_per_degree_lon(config.center_lat) * config.scale);
    let lat = config.center_lat - point.z / (METERS_PER_DEGREE * config.scale);
    GeoPoint { lon, lat }
}

pub fn project_ring(points: &[GeoPoint], config: &ProjectionConfig) -> Vec<LocalPoint> {
    points.iter().map(|p| project(*p, config)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_center_maps_to_origin() {
        let config = ProjectionConfig::new(-83.02, 40.0);
        let p = project(GeoPoint::new(-83.02, 40.0), &config);
        assert!(p.x.abs() < EPS);
        assert!(p.z.abs() < EPS);
    }

    #[test]
    fn test_north_is_negative_z() {
        let config = ProjectionConfig::new(0.0, 0.0);
        let p = project(GeoPoint::new(0.0, 0.001), &config);
        assert!((p.z + 111.32).abs() < 1e-6, "z was {}", p.z);
        assert!(p.x.abs() < EPS);
    }

    #[test]
    fn test_longitude_shrinks_with_latitude() {
        let config = ProjectionConfig::new(0.0, 60.0);
        let p = project(GeoPoint::new(0.001, 60.0), &config);
        // cos(60deg) = 0.5
        assert!((p.x - 55.66).abs() < 1e-6, "x was {}", p.x);
    }

    #[test]
    fn test_scale_multiplies_both_axes() {
        let mut config = ProjectionConfig::new(0.0, 0.0);
        config.scale = 2.0;
        let p = project(GeoPoint::new(0.001, -0.001), &config);
        assert!((p.x - 222.64).abs() < 1e-6);
        assert!((p.z - 222.64).abs() < 1e-6);
    }

    #[test]
    fn test_round_trip_near_center() {
        let mut config = ProjectionConfig::new(-83.0195, 40.0012);
        config.scale = 0.5;
        for (dlon, dlat) in [(0.0, 0.0), (0.003, -0.002), (-0.0071, 0.0049), (0.01, 0.01)] {
            let original = GeoPoint::new(config.center_lon + dlon, config.center_lat + dlat);
            let back = unproject(project(original, &config), &config);
            assert!((back.lon - original.lon).abs() < 1e-10);
            assert!((back.lat - original.lat).abs() < 1e-10);
        }
    }
}
