//! Error types for scene building.
//!
//! `SceneError` covers configuration and I/O failures that abort a run.
//! `SkipReason` covers per-footprint failures that only drop one building.
//! `SubmitError` wraps whatever a render backend returns.

use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SceneError>;

#[derive(Error, Debug)]
pub enum SceneError {
    #[error("projection scale must be a positive finite number, got {0}")]
    InvalidScale(f64),

    #[error("height scale must be a positive finite number, got {0}")]
    InvalidHeightScale(f64),

    #[error("world tile size must be a positive finite number, got {0}")]
    InvalidTileSize(f64),

    #[error("tile grid over {width} x {depth} m with {world_tile_size} m tiles exceeds the tile limit")]
    GridTooLarge { width: f64, depth: f64, world_tile_size: f64 },

    #[error("prop margin must be a non-negative finite number, got {0}")]
    InvalidPropMargin(f64),

    #[error("prop scale range is invalid: min {min}, max {max}")]
    InvalidPropScale { min: f64, max: f64 },

    #[error("cluster probability must lie in [0, 1], got {0}")]
    InvalidClusterProbability(f64),

    #[error("scene has no footprints and no configured bounds; nothing to frame")]
    EmptyScene,

    #[error("all {0} footprints were rejected and no bounds are configured; nothing to frame")]
    AllFootprintsRejected(usize),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure while handing a built scene to a renderer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmitError<E> {
    #[error("{cols} x {rows} tiles of {tile_size} px do not fit in one image")]
    ImageTooLarge { cols: u32, rows: u32, tile_size: u32 },

    #[error("renderer failed: {0}")]
    Renderer(E),
}

/// Why a single footprint was left out of the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    /// Fewer than three vertices after dropping the closing duplicate.
    TooFewVertices,
    /// The bottom face cannot be built: coincident, collinear or crossing vertices.
    DegenerateFace,
    /// Height times scale times height scale is not a positive number.
    NonPositiveHeight,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            SkipReason::TooFewVertices => "fewer than 3 distinct vertices",
            SkipReason::DegenerateFace => "bottom face cannot be constructed",
            SkipReason::NonPositiveHeight => "non-positive extrusion height",
        };
        f.write_str(text)
    }
}
