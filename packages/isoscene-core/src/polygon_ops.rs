// Planar polygon predicates on (x, z) rings.
//
// Rings are open: the closing edge from the last vertex back to the first is implied.
use crate::models::LocalPoint;
use geo::Area;
use geo_types::{LineString, Polygon};

/// Ray-casting point-in-polygon test.
///
/// The half-open `(zi > pz) != (zj > pz)` rule counts a vertex shared by two
/// edges exactly once.
pub fn point_in_polygon(point: &LocalPoint, ring: &[LocalPoint]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let (px, pz) = (point.x, point.z);
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, zi) = (ring[i].x, ring[i].z);
        let (xj, zj) = (ring[j].x, ring[j].z);
        if ((zi > pz) != (zj > pz)) && (px < (xj - xi) * (pz - zi) / (zj - zi) + xi) {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Squared distance from `point` to the segment `a`-`b`, with the projection clamped to the segment.
pub fn point_segment_distance_sq(point: &LocalPoint, a: &LocalPoint, b: &LocalPoint) -> f64 {
    let dx = b.x - a.x;
    let dz = b.z - a.z;
    let length_sq = dx * dx + dz * dz;
    let t = if length_sq > 0.0 {
        (((point.x - a.x) * dx + (point.z - a.z) * dz) / length_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let proj_x = a.x + t * dx;
    let proj_z = a.z + t * dz;
    (point.x - proj_x).powi(2) + (point.z - proj_z).powi(2)
}

pub fn point_segment_distance(point: &LocalPoint, a: &LocalPoint, b: &LocalPoint) -> f64 {
    point_segment_distance_sq(point, a, b).sqrt()
}

/// Distance from `point` to the nearest edge of the ring.
pub fn distance_to_ring(point: &LocalPoint, ring: &[LocalPoint]) -> f64 {
    ring_edges(ring)
        .map(|(a, b)| point_segment_distance_sq(point, a, b))
        .fold(f64::INFINITY, f64::min)
        .sqrt()
}

/// Iterate the edges of an open ring, closing edge included.
pub fn ring_edges(ring: &[LocalPoint]) -> impl Iterator<Item = (&LocalPoint, &LocalPoint)> {
    let n = ring.len();
    (0..n).map(move |i| (&ring[i], &ring[(i + 1) % n]))
}

/// Shoelace area in the (x, z) plane; positive for counter-clockwise rings.
pub fn signed_area(ring: &[LocalPoint]) -> f64 {
    let exterior: LineString<f64> = ring.iter().map(|p| (p.x, p.z)).collect::<Vec<_>>().into();
    Polygon::new(exterior, vec![]).signed_area()
}

// Orientation of `p` relative to the directed line `a`-`b`
fn direction(a: &LocalPoint, b: &LocalPoint, p: &LocalPoint) -> f64 {
    (p.x - a.x) * (b.z - a.z) - (b.x - a.x) * (p.z - a.z)
}

// Only meaningful when `p` is already known to be collinear with `a`-`b`
fn is_point_on_segment(a: &LocalPoint, b: &LocalPoint, p: &LocalPoint) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.z >= a.z.min(b.z) && p.z <= a.z.max(b.z)
}

/// True if the closed segments `p1`-`p2` and `p3`-`p4` share at least one point.
pub fn segments_intersect(p1: &LocalPoint, p2: &LocalPoint, p3: &LocalPoint, p4: &LocalPoint) -> bool {
    let d1 = direction(p3, p4, p1);
    let d2 = direction(p3, p4, p2);
    let d3 = direction(p1, p2, p3);
    let d4 = direction(p1, p2, p4);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && is_point_on_segment(p3, p4, p1))
        || (d2 == 0.0 && is_point_on_segment(p3, p4, p2))
        || (d3 == 0.0 && is_point_on_segment(p1, p2, p3))
        || (d4 == 0.0 && is_point_on_segment(p1, p2, p4))
}

/// True if any two non-adjacent edges of the ring touch or cross.
pub fn has_self_intersection(ring: &[LocalPoint]) -> bool {
    let n = ring.len();
    if n < 4 {
        return false;
    }
    for i in 0..n {
        let (a1, a2) = (&ring[i], &ring[(i + 1) % n]);
        for j in (i + 2)..n {
            // edge n-1 closes onto vertex 0 and is adjacent to edge 0
            if i == 0 && j == n - 1 {
                continue;
            }
            let (b1, b2) = (&ring[j], &ring[(j + 1) % n]);
            if segments_intersect(a1, a2, b1, b2) {
                return true;
            }
        }
    }
    false
}
