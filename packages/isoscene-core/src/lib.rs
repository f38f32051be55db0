// Error types shared by every stage
pub mod error;
// Shared data structures
pub mod models;
// Local tangent-plane projection
pub mod projection;
// Planar ring predicates
pub mod polygon_ops;
// Footprint validation
pub mod footprint;
// Mesh and face roles
pub mod mesh;
// Import our geometry functions
#[path = "../geometry_functions/extrude.rs"]
pub mod extrude;
// Prop scattering
pub mod scatter;
// Tile layout and camera framing
pub mod tile_grid;
// Grid manifest
pub mod manifest;
// Pipeline and renderer interface
pub mod scene;
// OSM tag heuristics and ingestion
pub mod attributes;
pub mod osm;
// Run configuration
pub mod config;

#[cfg(target_arch = "wasm32")]
mod bindings;

#[cfg(test)]
mod repro_test;

pub use config::RunConfig;
pub use error::{Result, SceneError, SkipReason, SubmitError};
pub use manifest::Manifest;
pub use models::{Bounds, Category, Footprint, FootprintId, GeoPoint, LocalPoint, LocalPoint3, ProjectionConfig};
pub use scatter::{PropPlacement, PropStyle, ScatterParams};
pub use scene::{build_scene, BuildSummary, BuildingMesh, RenderMode, Renderer, SceneDescription, SceneOptions};
pub use tile_grid::{CameraFrame, CameraParams, Tile, TileGrid};
