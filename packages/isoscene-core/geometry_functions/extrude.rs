use crate::error::SkipReason;
use crate::footprint::{check_face, ValidatedPolygon};
use crate::mesh::{classify_faces, Face, Mesh, SurfaceRole};
use crate::models::{LocalPoint, LocalPoint3, ProjectionConfig};

/// Building height in scene units: meters times world scale times vertical exaggeration.
pub fn scaled_height(height: f64, config: &ProjectionConfig) -> f64 {
    height * config.scale * config.height_scale
}

/// Extrude a validated footprint into a closed prism.
///
/// The result holds `2n` vertices (bottom ring, then top ring) and `n + 2`
/// faces: floor, roof, and one wall quad per edge. Face roles are classified
/// from the finished geometry, not from construction order.
pub fn extrude(
    polygon: &ValidatedPolygon,
    height: f64,
    config: &ProjectionConfig,
) -> Result<Mesh, SkipReason> {
    extrude_ring(polygon.points(), scaled_height(height, config))
}

/// Extrude an open (x, z) ring upward by an already scaled height.
///
/// The ring is expected counter-clockwise; a clockwise ring still extrudes
/// but its faces point inward.
pub fn extrude_ring(ring: &[LocalPoint], scaled_height: f64) -> Result<Mesh, SkipReason> {
    if !(scaled_height.is_finite() && scaled_height > 0.0) {
        return Err(SkipReason::NonPositiveHeight);
    }

    // The bottom face has to exist before anything can be extruded from it.
    check_face(ring)?;

    let n = ring.len();
    let mut vertices = Vec::with_capacity(n * 2);

    // Add bottom vertices
    for p in ring {
        vertices.push(LocalPoint3::new(p.x, 0.0, p.z));
    }

    // Add top vertices
    for p in ring {
        vertices.push(LocalPoint3::new(p.x, scaled_height, p.z));
    }

    let mut faces = Vec::with_capacity(n + 2);

    // Floor keeps ring order, which faces -y for a counter-clockwise ring
    faces.push(Face {
        indices: (0..n as u32).collect(),
        role: SurfaceRole::Floor,
    });

    // Roof runs the other way round so its normal points up
    faces.push(Face {
        indices: (n as u32..2 * n as u32).rev().collect(),
        role: SurfaceRole::Roof,
    });

    // Side walls, one quad per ring edge, wound outward
    for i in 0..n {
        let j = (i + 1) % n;
        let (bi, bj) = (i as u32, j as u32);
        let (ti, tj) = ((i + n) as u32, (j + n) as u32);
        faces.push(Face {
            indices: vec![bj, bi, ti, tj],
            role: SurfaceRole::Wall,
        });
    }

    let mut mesh = Mesh { vertices, faces };
    classify_faces(&mut mesh, scaled_height);
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::footprint::validate_ring;

    fn ring(points: &[(f64, f64)]) -> Vec<LocalPoint> {
        points.iter().map(|&(x, z)| LocalPoint::new(x, z)).collect()
    }

    fn l_shape() -> ValidatedPolygon {
        validate_ring(ring(&[
            (0.0, 0.0),
            (20.0, 0.0),
            (20.0, 8.0),
            (8.0, 8.0),
            (8.0, 20.0),
            (0.0, 20.0),
        ]))
        .expect("valid L")
    }

    #[test]
    fn test_face_counts_match_polygon() {
        let polygon = l_shape();
        let config = ProjectionConfig::new(0.0, 0.0);
        let mesh = extrude(&polygon, 12.0, &config).expect("mesh");

        assert_eq!(mesh.vertices.len(), 12);
        assert_eq!(mesh.count_role(SurfaceRole::Wall), polygon.len());
        assert_eq!(mesh.count_role(SurfaceRole::Roof), 1);
        assert_eq!(mesh.count_role(SurfaceRole::Floor), 1);

        for face in mesh.faces.iter().filter(|f| f.role != SurfaceRole::Wall) {
            assert_eq!(face.indices.len(), polygon.len());
        }
    }

    #[test]
    fn test_normals_point_outward() {
        let polygon = l_shape();
        let mesh = extrude_ring(polygon.points(), 5.0).expect("mesh");
        let center_x = 7.0;
        let center_z = 7.0;

        for face in &mesh.faces {
            let n = mesh.face_normal(face).expect("normal");
            let c = mesh.face_centroid(face);
            match face.role {
                SurfaceRole::Roof => assert!(n.y > 0.99),
                SurfaceRole::Floor => assert!(n.y < -0.99),
                SurfaceRole::Wall => {
                    assert!(n.y.abs() < 1e-9);
                    // every wall of this L faces away from the inner corner region
                    let outward = (c.x - center_x) * n.x + (c.z - center_z) * n.z;
                    assert!(outward > 0.0, "wall at {:?} faces inward", c);
                }
            }
        }
    }

    #[test]
    fn test_roof_sits_at_scaled_height() {
        let polygon = l_shape();
        let mut config = ProjectionConfig::new(0.0, 0.0);
        config.scale = 2.0;
        config.height_scale = 0.5;
        let mesh = extrude(&polygon, 10.0, &config).expect("mesh");
        let roof = mesh.faces_with_role(SurfaceRole::Roof).next().expect("roof");
        assert!((mesh.face_centroid(roof).y - 10.0).abs() < 1e-12);
        assert!((mesh.max_y() - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_height_is_rejected() {
        let polygon = l_shape();
        let config = ProjectionConfig::new(0.0, 0.0);
        assert_eq!(extrude(&polygon, 0.0, &config), Err(SkipReason::NonPositiveHeight));
        assert_eq!(extrude(&polygon, -3.0, &config), Err(SkipReason::NonPositiveHeight));
        assert_eq!(extrude(&polygon, f64::NAN, &config), Err(SkipReason::NonPositiveHeight));
    }

    #[test]
    fn test_unconstructible_bottom_face_fails() {
        let collinear = ring(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
        assert_eq!(extrude_ring(&collinear, 4.0), Err(SkipReason::DegenerateFace));
    }

    #[test]
    fn test_triangulated_prism_is_watertight_count() {
        let polygon = l_shape();
        let mesh = extrude_ring(polygon.points(), 3.0).expect("mesh");
        let buffer = mesh.triangulate();
        // two caps of n-2 triangles plus two per wall
        let n = polygon.len();
        assert_eq!(buffer.triangle_count(), 2 * (n - 2) + 2 * n);
    }
}
