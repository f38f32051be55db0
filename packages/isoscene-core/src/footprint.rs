//! Footprint validation.
//!
//! Projects a footprint into local meters, drops the closing duplicate vertex,
//! and rejects rings that cannot form a bottom face for extrusion.

use std::collections::HashSet;

use crate::error::SkipReason;
use crate::models::{Bounds, Footprint, LocalPoint, ProjectionConfig};
use crate::polygon_ops::{has_self_intersection, ring_edges, signed_area};
use crate::projection::project_ring;

/// Area below this fraction of the squared extent counts as collinear.
const COLLINEAR_AREA_EPSILON: f64 = 1e-9;

/// A projected ring that is known to extrude into a valid prism.
///
/// Vertices are ordered counter-clockwise in the (x, z) plane and hold no
/// closing duplicate.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPolygon {
    points: Vec<LocalPoint>,
    bounds: Bounds,
}

impl ValidatedPolygon {
    pub fn points(&self) -> &[LocalPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn edges(&self) -> impl Iterator<Item = (&LocalPoint, &LocalPoint)> {
        ring_edges(&self.points)
    }

    pub fn area(&self) -> f64 {
        signed_area(&self.points)
    }
}

/// Validate a footprint against the projection.
pub fn validate(footprint: &Footprint, config: &ProjectionConfig) -> Result<ValidatedPolygon, SkipReason> {
    validate_ring(project_ring(&footprint.coords, config))
}

/// Validate an already projected ring.
pub fn validate_ring(mut points: Vec<LocalPoint>) -> Result<ValidatedPolygon, SkipReason> {
    // Exact comparison only; a closing vertex that is merely close to the first one is kept.
    if points.len() >= 2 && points.first() == points.last() {
        points.pop();
    }

    if points.len() < 3 {
        return Err(SkipReason::TooFewVertices);
    }

    check_face(&points)?;

    if signed_area(&points) < 0.0 {
        points.reverse();
    }

    let bounds = Bounds::from_points(&points).ok_or(SkipReason::TooFewVertices)?;
    Ok(ValidatedPolygon { points, bounds })
}

/// Check that an open ring can be turned into a single planar face.
///
/// Fails on coincident vertices, on rings with no area, and on rings whose
/// non-adjacent edges touch.
pub fn check_face(points: &[LocalPoint]) -> Result<(), SkipReason> {
    if points.len() < 3 {
        return Err(SkipReason::TooFewVertices);
    }

    let mut seen = HashSet::with_capacity(points.len());
    for p in points {
        // + 0.0 folds -0.0 into 0.0 so both hash alike
        if !seen.insert(((p.x + 0.0).to_bits(), (p.z + 0.0).to_bits())) {
            return Err(SkipReason::DegenerateFace);
        }
    }

    let bounds = Bounds::from_points(points).ok_or(SkipReason::TooFewVertices)?;
    let extent = bounds.width().max(bounds.depth());
    if signed_area(points).abs() <= COLLINEAR_AREA_EPSILON * extent * extent {
        return Err(SkipReason::DegenerateFace);
    }

    if has_self_intersection(points) {
        return Err(SkipReason::DegenerateFace);
    }

    Ok(())
}
