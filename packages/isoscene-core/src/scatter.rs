//! Decorative prop scattering.
//!
//! Rejection sampling over the scene bounds: draw a point, keep it if it is
//! outside every building and far enough from every building edge. Obstacles
//! are the building footprints only; accepted props never block each other.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SceneError};
use crate::footprint::ValidatedPolygon;
use crate::models::{Bounds, LocalPoint};
use crate::polygon_ops::{point_in_polygon, point_segment_distance_sq};

/// Inset from the scene bounds inside which props are drawn.
pub const EDGE_MARGIN: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropStyle {
    /// Clumped sphere canopy.
    Cluster,
    /// Single cone canopy.
    Cone,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PropPlacement {
    pub x: f64,
    pub z: f64,
    pub style: PropStyle,
    pub scale: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterParams {
    #[serde(default = "default_count")]
    pub count: usize,
    /// Minimum clearance from any building edge.
    #[serde(default = "default_margin")]
    pub margin: f64,
    #[serde(default = "default_max_attempts_multiplier")]
    pub max_attempts_multiplier: usize,
    /// Chance that an accepted prop gets the cluster style.
    #[serde(default = "default_cluster_probability")]
    pub cluster_probability: f64,
    #[serde(default = "default_scale_min")]
    pub scale_min: f64,
    #[serde(default = "default_scale_max")]
    pub scale_max: f64,
}

fn default_count() -> usize {
    80
}
fn default_margin() -> f64 {
    2.0
}
fn default_max_attempts_multiplier() -> usize {
    20
}
fn default_cluster_probability() -> f64 {
    0.7
}
fn default_scale_min() -> f64 {
    0.8
}
fn default_scale_max() -> f64 {
    1.4
}

impl Default for ScatterParams {
    fn default() -> Self {
        Self {
            count: default_count(),
            margin: default_margin(),
            max_attempts_multiplier: default_max_attempts_multiplier(),
            cluster_probability: default_cluster_probability(),
            scale_min: default_scale_min(),
            scale_max: default_scale_max(),
        }
    }
}

impl ScatterParams {
    pub fn with_count(count: usize) -> Self {
        Self { count, ..Self::default() }
    }

    pub fn max_attempts(&self) -> usize {
        self.count.saturating_mul(self.max_attempts_multiplier)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.margin.is_finite() && self.margin >= 0.0) {
            return Err(SceneError::InvalidPropMargin(self.margin));
        }
        if !(self.scale_min.is_finite() && self.scale_max.is_finite() && self.scale_min <= self.scale_max) {
            return Err(SceneError::InvalidPropScale { min: self.scale_min, max: self.scale_max });
        }
        if !(0.0..=1.0).contains(&self.cluster_probability) {
            return Err(SceneError::InvalidClusterProbability(self.cluster_probability));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterResult {
    pub placements: Vec<PropPlacement>,
    pub requested: usize,
    pub attempts: usize,
}

impl ScatterResult {
    /// How many requested props could not be placed within the attempt budget.
    pub fn shortfall(&self) -> usize {
        self.requested.saturating_sub(self.placements.len())
    }
}

/// True if `point` is outside every obstacle and at least `margin` from each edge.
/// A negative margin counts as zero.
pub fn is_clear(point: &LocalPoint, obstacles: &[ValidatedPolygon], margin: f64) -> bool {
    let margin = margin.max(0.0);
    let margin_sq = margin * margin;
    obstacles.iter().all(|polygon| {
        // outside the box grown by the margin cannot touch the polygon
        if !polygon.bounds().expanded(margin).contains_point(point) {
            return true;
        }
        !point_in_polygon(point, polygon.points())
            && polygon
                .edges()
                .all(|(a, b)| point_segment_distance_sq(point, a, b) >= margin_sq)
    })
}

/// Place up to `params.count` props inside `bounds`, avoiding `obstacles`.
///
/// Per attempt the generator is drawn twice (x then z); per accepted point
/// twice more (style then scale). The same seed gives the same placements.
pub fn scatter<R: Rng + ?Sized>(
    obstacles: &[ValidatedPolygon],
    bounds: &Bounds,
    params: &ScatterParams,
    rng: &mut R,
) -> ScatterResult {
    let area = bounds.expanded(-EDGE_MARGIN);
    let max_attempts = params.max_attempts();
    let mut placements = Vec::with_capacity(params.count);
    let mut attempts = 0;

    if area.is_empty() {
        tracing::debug!("scatter area is empty after the {} edge inset", EDGE_MARGIN);
        return ScatterResult { placements, requested: params.count, attempts };
    }

    while placements.len() < params.count && attempts < max_attempts {
        attempts += 1;

        let x = area.min_x + rng.gen::<f64>() * area.width();
        let z = area.min_z + rng.gen::<f64>() * area.depth();
        let candidate = LocalPoint::new(x, z);

        if !is_clear(&candidate, obstacles, params.margin) {
            continue;
        }

        let style = if rng.gen::<f64>() > 1.0 - params.cluster_probability {
            PropStyle::Cluster
        } else {
            PropStyle::Cone
        };
        let scale = params.scale_min + rng.gen::<f64>() * (params.scale_max - params.scale_min);

        placements.push(PropPlacement { x, z, style, scale });
    }

    tracing::debug!("placed {} props in {} attempts", placements.len(), attempts);

    ScatterResult { placements, requested: params.count, attempts }
}
