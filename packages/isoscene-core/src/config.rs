//! Run configuration.
//!
//! One JSON document carries the footprints and every tunable. Missing keys
//! take the defaults below.

use std::path::Path;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{Bounds, Footprint, ProjectionConfig};
use crate::scatter::ScatterParams;
use crate::scene::{build_scene, SceneDescription, SceneOptions};
use crate::tile_grid::{CameraParams, DEFAULT_WORLD_TILE_SIZE};

pub const DEFAULT_TILE_SIZE: u32 = 512;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneData {
    #[serde(flatten)]
    pub projection: ProjectionConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropsConfig {
    #[serde(flatten)]
    pub scatter: ScatterParams,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_seed() -> u64 {
    42
}

impl Default for PropsConfig {
    fn default() -> Self {
        Self { scatter: ScatterParams::default(), seed: default_seed() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfig {
    #[serde(default)]
    pub buildings: Vec<Footprint>,
    pub scene_data: SceneData,
    /// Pixel edge length of one tile; only passed through to the renderer and manifest.
    #[serde(default = "default_tile_size")]
    pub tile_size: u32,
    #[serde(default = "default_world_tile_size")]
    pub world_tile_size: f64,
    #[serde(default)]
    pub props: PropsConfig,
    #[serde(default)]
    pub camera: CameraParams,
}

fn default_tile_size() -> u32 {
    DEFAULT_TILE_SIZE
}
fn default_world_tile_size() -> f64 {
    DEFAULT_WORLD_TILE_SIZE
}

impl RunConfig {
    pub fn new(buildings: Vec<Footprint>, projection: ProjectionConfig) -> Self {
        Self {
            buildings,
            scene_data: SceneData { projection, bounds: None },
            tile_size: default_tile_size(),
            world_tile_size: default_world_tile_size(),
            props: PropsConfig::default(),
            camera: CameraParams::default(),
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn scene_options(&self) -> SceneOptions {
        SceneOptions {
            projection: self.scene_data.projection,
            bounds: self.scene_data.bounds,
            scatter: self.props.scatter,
            world_tile_size: self.world_tile_size,
            camera: self.camera,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.scene_options().validate()
    }

    /// Build the scene with a generator seeded from `props.seed`.
    pub fn build(&self) -> Result<SceneDescription> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.props.seed);
        build_scene(&self.buildings, &self.scene_options(), &mut rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SceneError;
    use crate::models::Category;

    #[test]
    fn test_minimal_config_takes_defaults() {
        let config = RunConfig::from_json(r#"{"sceneData": {"centerLon": -83.0, "centerLat": 40.0}}"#)
            .expect("config");
        assert!(config.buildings.is_empty());
        assert_eq!(config.scene_data.projection.scale, 1.0);
        assert_eq!(config.scene_data.projection.height_scale, 0.8);
        assert_eq!(config.scene_data.bounds, None);
        assert_eq!(config.tile_size, 512);
        assert_eq!(config.world_tile_size, 15.0);
        assert_eq!(config.props.scatter.count, 80);
        assert_eq!(config.props.scatter.margin, 2.0);
        assert_eq!(config.props.scatter.max_attempts_multiplier, 20);
        assert_eq!(config.props.seed, 42);
        assert_eq!(config.camera.distance, 200.0);
        assert_eq!(config.camera.azimuth_deg, 280.0);
    }

    #[test]
    fn test_full_config() {
        let text = r#"{
            "buildings": [
                {"id": 1, "coords": [[-83.0, 40.0], [-82.999, 40.0], [-82.999, 40.001], [-83.0, 40.0]],
                 "height": 12, "type": "library"},
                {"id": "b-2", "coords": [], "height": 5, "category": "spaceport"}
            ],
            "sceneData": {"centerLon": -83.0, "centerLat": 40.0, "scale": 2, "heightScale": 1.5,
                          "bounds": {"minX": -10, "maxX": 10, "minZ": -5, "maxZ": 5}},
            "tileSize": 256,
            "worldTileSize": 20,
            "props": {"count": 10, "margin": 1.5, "seed": 7},
            "camera": {"distance": 150, "azimuthDeg": 45}
        }"#;
        let config = RunConfig::from_json(text).expect("config");

        assert_eq!(config.buildings.len(), 2);
        assert_eq!(config.buildings[0].category, Category::Library);
        assert_eq!(config.buildings[1].category, Category::Generic);
        assert_eq!(config.scene_data.projection.scale, 2.0);
        assert_eq!(config.scene_data.bounds, Some(Bounds::new(-10.0, 10.0, -5.0, 5.0)));
        assert_eq!(config.tile_size, 256);
        assert_eq!(config.props.scatter.count, 10);
        assert_eq!(config.props.scatter.margin, 1.5);
        assert_eq!(config.props.scatter.max_attempts_multiplier, 20);
        assert_eq!(config.props.seed, 7);
        assert_eq!(config.camera.azimuth_deg, 45.0);
        assert_eq!(config.camera.clip_end, 1000.0);
    }

    #[test]
    fn test_validate_rejects_bad_scales() {
        let mut config = RunConfig::new(Vec::new(), ProjectionConfig::new(0.0, 0.0));
        assert!(config.validate().is_ok());

        config.scene_data.projection.height_scale = 0.0;
        assert!(matches!(config.validate(), Err(SceneError::InvalidHeightScale(_))));

        config.scene_data.projection.height_scale = 0.8;
        config.world_tile_size = f64::NAN;
        assert!(matches!(config.validate(), Err(SceneError::InvalidTileSize(_))));
    }

    #[test]
    fn test_build_is_reproducible() {
        let mut config = RunConfig::new(Vec::new(), ProjectionConfig::new(0.0, 0.0));
        config.scene_data.bounds = Some(Bounds::new(0.0, 60.0, 0.0, 60.0));
        config.props.scatter.count = 15;

        let a = config.build().expect("a");
        let b = config.build().expect("b");
        assert_eq!(a.props, b.props);
        assert_eq!(a.props.len(), 15);

        config.props.seed += 1;
        let c = config.build().expect("c");
        assert_ne!(a.props, c.props);
    }

    #[test]
    fn test_missing_scene_data_is_an_error() {
        assert!(matches!(RunConfig::from_json(r#"{"buildings": []}"#), Err(SceneError::Json(_))));
    }
}
