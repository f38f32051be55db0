// Polygon mesh with per-face surface roles
use earcutr::earcut;
use nalgebra::Vector3;
use serde::Serialize;

use crate::models::{Bounds, LocalPoint, LocalPoint3};

/// A face counts as horizontal when its unit normal has |y| above this.
pub const HORIZONTAL_NORMAL_THRESHOLD: f64 = 0.9;

const NORMAL_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceRole {
    Wall,
    Roof,
    Floor,
}

/// An n-gon referencing mesh vertices in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Face {
    pub indices: Vec<u32>,
    pub role: SurfaceRole,
}

/// Vertices and n-gon faces. Edges stay sharp; there is no shared smoothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Mesh {
    pub vertices: Vec<LocalPoint3>,
    pub faces: Vec<Face>,
}

/// Flat triangle arrays for renderers that upload buffers directly.
///
/// Vertices are duplicated per face so every triangle carries its face normal.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TriangleBuffer {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub indices: Vec<u32>,
    /// One entry per triangle.
    pub roles: Vec<SurfaceRole>,
}

impl TriangleBuffer {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

impl Mesh {
    fn face_points(&self, face: &Face) -> Vec<Vector3<f64>> {
        face.indices
            .iter()
            .filter_map(|&i| self.vertices.get(i as usize))
            .map(|v| v.to_vector())
            .collect()
    }

    /// Unit normal by Newell's method, `None` for faces with no area.
    pub fn face_normal(&self, face: &Face) -> Option<Vector3<f64>> {
        newell_normal(&self.face_points(face))
    }

    pub fn face_centroid(&self, face: &Face) -> LocalPoint3 {
        let points = self.face_points(face);
        if points.is_empty() {
            return LocalPoint3::new(0.0, 0.0, 0.0);
        }
        let sum = points.iter().fold(Vector3::<f64>::zeros(), |acc, p| acc + p);
        LocalPoint3::from_vector(sum / points.len() as f64)
    }

    pub fn faces_with_role(&self, role: SurfaceRole) -> impl Iterator<Item = &Face> {
        self.faces.iter().filter(move |f| f.role == role)
    }

    pub fn count_role(&self, role: SurfaceRole) -> usize {
        self.faces_with_role(role).count()
    }

    /// Ground-plane bounds of all vertices.
    pub fn footprint_bounds(&self) -> Option<Bounds> {
        let flat: Vec<LocalPoint> = self.vertices.iter().map(|v| LocalPoint::new(v.x, v.z)).collect();
        Bounds::from_points(&flat)
    }

    pub fn max_y(&self) -> f64 {
        self.vertices.iter().map(|v| v.y).fold(f64::NEG_INFINITY, f64::max)
    }

    /// Split every face into triangles. Faces that earcut cannot handle are left out.
    pub fn triangulate(&self) -> TriangleBuffer {
        let mut buffer = TriangleBuffer::default();

        for face in &self.faces {
            let points = self.face_points(face);
            let Some(normal) = newell_normal(&points) else {
                continue;
            };

            let Some(triangles) = triangulate_planar(&points, &normal) else {
                continue;
            };

            let base = (buffer.positions.len() / 3) as u32;
            for p in &points {
                buffer.positions.extend_from_slice(&[p.x as f32, p.y as f32, p.z as f32]);
                buffer.normals.extend_from_slice(&[normal.x as f32, normal.y as f32, normal.z as f32]);
            }
            for tri in triangles.chunks_exact(3) {
                buffer.indices.extend(tri.iter().map(|&i| base + i as u32));
                buffer.roles.push(face.role);
            }
        }

        buffer
    }
}

/// Newell's method; robust for non-convex planar polygons.
pub fn newell_normal(points: &[Vector3<f64>]) -> Option<Vector3<f64>> {
    let n = points.len();
    if n < 3 {
        return None;
    }
    let mut normal = Vector3::<f64>::zeros();
    for i in 0..n {
        let a = &points[i];
        let b = &points[(i + 1) % n];
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
    }
    let len = normal.norm();
    if len > NORMAL_EPSILON {
        Some(normal / len)
    } else {
        None
    }
}

// Earcut in the plane that drops the normal's dominant axis, rewound to match `normal`.
fn triangulate_planar(points: &[Vector3<f64>], normal: &Vector3<f64>) -> Option<Vec<usize>> {
    let (ax, ay, az) = (normal.x.abs(), normal.y.abs(), normal.z.abs());
    let mut data: Vec<f64> = Vec::with_capacity(points.len() * 2);
    for p in points {
        let (u, v) = if ay >= ax && ay >= az {
            (p.x, p.z)
        } else if ax >= az {
            (p.y, p.z)
        } else {
            (p.x, p.y)
        };
        data.push(u);
        data.push(v);
    }

    let mut indices = earcut(&data, &[], 2).ok()?;
    if indices.is_empty() {
        return None;
    }

    for tri in indices.chunks_exact_mut(3) {
        let a = points[tri[0]];
        let b = points[tri[1]];
        let c = points[tri[2]];
        if (b - a).cross(&(c - a)).dot(normal) < 0.0 {
            tri.swap(1, 2);
        }
    }
    Some(indices)
}

/// Role of a face from its orientation and height alone.
pub fn classify_face(normal: Option<Vector3<f64>>, centroid_y: f64, scaled_height: f64) -> SurfaceRole {
    match normal {
        Some(n) if n.y.abs() > HORIZONTAL_NORMAL_THRESHOLD => {
            if centroid_y > scaled_height * 0.5 {
                SurfaceRole::Roof
            } else {
                SurfaceRole::Floor
            }
        }
        _ => SurfaceRole::Wall,
    }
}

/// Recompute every face role from geometry.
pub fn classify_faces(mesh: &mut Mesh, scaled_height: f64) {
    let roles: Vec<SurfaceRole> = mesh
        .faces
        .iter()
        .map(|face| {
            classify_face(
                mesh.face_normal(face),
                mesh.face_centroid(face).y,
                scaled_height,
            )
        })
        .collect();

    for (face, role) in mesh.faces.iter_mut().zip(roles) {
        face.role = role;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_quad(y: f64, flip: bool) -> Mesh {
        let mut vertices = vec![
            LocalPoint3::new(0.0, y, 0.0),
            LocalPoint3::new(1.0, y, 0.0),
            LocalPoint3::new(1.0, y, 1.0),
            LocalPoint3::new(0.0, y, 1.0),
        ];
        if flip {
            vertices.reverse();
        }
        Mesh {
            vertices,
            faces: vec![Face { indices: vec![0, 1, 2, 3], role: SurfaceRole::Wall }],
        }
    }

    #[test]
    fn test_newell_normal_of_horizontal_quad() {
        let mesh = unit_quad(0.0, false);
        let n = mesh.face_normal(&mesh.faces[0]).expect("normal");
        assert!((n.y.abs() - 1.0).abs() < 1e-12);
        let flipped = unit_quad(0.0, true);
        let m = flipped.face_normal(&flipped.faces[0]).expect("normal");
        assert!((n.y + m.y).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_face_has_no_normal() {
        let mesh = Mesh {
            vertices: vec![
                LocalPoint3::new(0.0, 0.0, 0.0),
                LocalPoint3::new(1.0, 0.0, 0.0),
                LocalPoint3::new(2.0, 0.0, 0.0),
            ],
            faces: vec![Face { indices: vec![0, 1, 2], role: SurfaceRole::Roof }],
        };
        assert!(mesh.face_normal(&mesh.faces[0]).is_none());
        let mut mesh = mesh;
        classify_faces(&mut mesh, 10.0);
        assert_eq!(mesh.faces[0].role, SurfaceRole::Wall);
    }

    #[test]
    fn test_classify_by_centroid_height() {
        let mut low = unit_quad(1.0, false);
        classify_faces(&mut low, 10.0);
        assert_eq!(low.faces[0].role, SurfaceRole::Floor);

        let mut high = unit_quad(6.0, true);
        classify_faces(&mut high, 10.0);
        assert_eq!(high.faces[0].role, SurfaceRole::Roof);
    }

    #[test]
    fn test_triangulate_keeps_face_orientation() {
        let mesh = unit_quad(2.0, true);
        let normal = mesh.face_normal(&mesh.faces[0]).expect("normal");
        let buffer = mesh.triangulate();
        assert_eq!(buffer.triangle_count(), 2);
        assert_eq!(buffer.roles, vec![SurfaceRole::Wall, SurfaceRole::Wall]);
        for tri in buffer.indices.chunks_exact(3) {
            let p = |i: u32| {
                let i = i as usize * 3;
                Vector3::new(
                    buffer.positions[i] as f64,
                    buffer.positions[i + 1] as f64,
                    buffer.positions[i + 2] as f64,
                )
            };
            let (a, b, c) = (p(tri[0]), p(tri[1]), p(tri[2]));
            assert!((b - a).cross(&(c - a)).dot(&normal) > 0.0);
        }
    }
}
