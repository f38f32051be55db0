//! Scene assembly.
//!
//! Runs projection, validation and extrusion per footprint, scatters props
//! around the surviving buildings, then plans the tile grid and camera. A
//! footprint that fails is logged and counted; only configuration errors
//! abort the run.

use rand::Rng;
use rayon::prelude::*;
use serde::Serialize;

use crate::error::{Result, SceneError, SkipReason, SubmitError};
use crate::extrude::extrude;
use crate::footprint::{validate, ValidatedPolygon};
use crate::manifest::{Manifest, ManifestImages, ManifestTile};
use crate::mesh::Mesh;
use crate::models::{Bounds, Category, Footprint, FootprintId, ProjectionConfig};
use crate::scatter::{scatter, PropPlacement, ScatterParams};
use crate::tile_grid::{self, CameraFrame, CameraParams, Tile, TileGrid, DEFAULT_WORLD_TILE_SIZE};

/// Extruded building tied back to its input footprint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingMesh {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<FootprintId>,
    pub category: Category,
    /// Position of the footprint in the input list.
    pub source_index: usize,
    #[serde(flatten)]
    pub mesh: Mesh,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedFootprint {
    pub source_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<FootprintId>,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildSummary {
    pub meshes_built: usize,
    pub skipped: Vec<SkippedFootprint>,
    pub props_requested: usize,
    pub props_placed: usize,
    pub props_shortfall: usize,
}

/// Everything a renderer needs, in local meters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDescription {
    pub meshes: Vec<BuildingMesh>,
    pub props: Vec<PropPlacement>,
    pub tile_grid: TileGrid,
    pub camera: CameraFrame,
    /// View settings the camera was framed with; per-tile cameras reuse them.
    pub camera_params: CameraParams,
    /// Union of configured bounds and all accepted footprints, before tile padding.
    pub content_bounds: Bounds,
    pub summary: BuildSummary,
}

/// Per-run parameters other than the footprints and the random source.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneOptions {
    pub projection: ProjectionConfig,
    /// Extra area to frame and scatter over, in local meters.
    pub bounds: Option<Bounds>,
    pub scatter: ScatterParams,
    pub world_tile_size: f64,
    pub camera: CameraParams,
}

impl SceneOptions {
    pub fn new(projection: ProjectionConfig) -> Self {
        Self {
            projection,
            bounds: None,
            scatter: ScatterParams::default(),
            world_tile_size: DEFAULT_WORLD_TILE_SIZE,
            camera: CameraParams::default(),
        }
    }

    /// Fatal configuration checks, run before any geometry work.
    pub fn validate(&self) -> Result<()> {
        self.projection.validate()?;
        if !(self.world_tile_size.is_finite() && self.world_tile_size > 0.0) {
            return Err(SceneError::InvalidTileSize(self.world_tile_size));
        }
        self.scatter.validate()
    }
}

// Outcome for one footprint. A validated polygon is an obstacle even if it
// does not extrude.
struct Processed {
    polygon: Option<ValidatedPolygon>,
    result: std::result::Result<BuildingMesh, SkipReason>,
}

fn process_footprint(index: usize, footprint: &Footprint, projection: &ProjectionConfig) -> Processed {
    let polygon = match validate(footprint, projection) {
        Ok(polygon) => polygon,
        Err(reason) => return Processed { polygon: None, result: Err(reason) },
    };
    let result = extrude(&polygon, footprint.height, projection).map(|mesh| BuildingMesh {
        id: footprint.id.clone(),
        category: footprint.category,
        source_index: index,
        mesh,
    });
    Processed { polygon: Some(polygon), result }
}

/// Build a scene from footprints.
///
/// Footprints are processed in parallel but results keep input order. The
/// random source is only used for prop scattering, sequentially, so a fixed
/// seed gives identical output.
pub fn build_scene<R: Rng + ?Sized>(
    footprints: &[Footprint],
    options: &SceneOptions,
    rng: &mut R,
) -> Result<SceneDescription> {
    options.validate()?;
    if footprints.is_empty() && options.bounds.is_none() {
        return Err(SceneError::EmptyScene);
    }

    tracing::info!("building scene from {} footprints", footprints.len());

    let processed: Vec<Processed> = footprints
        .par_iter()
        .enumerate()
        .map(|(index, footprint)| process_footprint(index, footprint, &options.projection))
        .collect();

    let mut meshes = Vec::with_capacity(processed.len());
    let mut obstacles = Vec::with_capacity(processed.len());
    let mut skipped = Vec::new();

    for (index, item) in processed.into_iter().enumerate() {
        if let Some(polygon) = item.polygon {
            obstacles.push(polygon);
        }
        match item.result {
            Ok(mesh) => meshes.push(mesh),
            Err(reason) => {
                let id = footprints[index].id.clone();
                match &id {
                    Some(id) => tracing::warn!("skipping footprint {} (id {}): {}", index, id, reason),
                    None => tracing::warn!("skipping footprint {}: {}", index, reason),
                }
                skipped.push(SkippedFootprint { source_index: index, id, reason });
            }
        }
    }

    let footprint_bounds = obstacles
        .iter()
        .map(|p| *p.bounds())
        .reduce(|a, b| a.union(&b));
    let content_bounds = match (options.bounds, footprint_bounds) {
        (Some(configured), Some(found)) => configured.union(&found),
        (Some(configured), None) => configured,
        (None, Some(found)) => found,
        (None, None) => return Err(SceneError::AllFootprintsRejected(footprints.len())),
    };

    let scattered = scatter(&obstacles, &content_bounds, &options.scatter, rng);
    if scattered.shortfall() > 0 {
        tracing::warn!(
            "placed {} of {} props after {} attempts",
            scattered.placements.len(),
            scattered.requested,
            scattered.attempts
        );
    }

    let tile_grid = tile_grid::plan(&content_bounds, options.world_tile_size)?;
    let camera = CameraFrame::full_scene(&tile_grid, &options.camera);
    tracing::debug!(
        "camera at ({:.1}, {:.1}, {:.1}) ortho scale {:.1}",
        camera.position.x,
        camera.position.y,
        camera.position.z,
        camera.ortho_scale
    );

    let summary = BuildSummary {
        meshes_built: meshes.len(),
        props_requested: scattered.requested,
        props_placed: scattered.placements.len(),
        props_shortfall: scattered.shortfall(),
        skipped,
    };

    tracing::info!(
        "scene built: {} meshes, {} skipped, {} props, {}x{} tiles",
        summary.meshes_built,
        summary.skipped.len(),
        summary.props_placed,
        tile_grid.cols,
        tile_grid.rows
    );

    Ok(SceneDescription {
        meshes,
        props: scattered.placements,
        tile_grid,
        camera,
        camera_params: options.camera,
        content_bounds,
        summary,
    })
}

/// Render backend that turns a scene description into images.
///
/// The render methods return the filename they wrote, which goes into the manifest.
pub trait Renderer {
    type Error;

    fn add_building(&mut self, mesh: &BuildingMesh) -> std::result::Result<(), Self::Error>;

    fn add_prop(&mut self, prop: &PropPlacement) -> std::result::Result<(), Self::Error>;

    fn render_full(
        &mut self,
        camera: &CameraFrame,
        width: u32,
        height: u32,
    ) -> std::result::Result<String, Self::Error>;

    fn render_tile(
        &mut self,
        tile: &Tile,
        camera: &CameraFrame,
        size: u32,
    ) -> std::result::Result<String, Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// One image of `cols * tile_size` by `rows * tile_size` pixels.
    #[default]
    FullImage,
    /// One `tile_size` square image per tile, row-major.
    PerTile,
}

impl SceneDescription {
    /// Feed the scene to `renderer` and describe what it produced.
    pub fn submit<R: Renderer>(
        &self,
        renderer: &mut R,
        tile_size: u32,
        mode: RenderMode,
    ) -> std::result::Result<Manifest, SubmitError<R::Error>> {
        let grid = &self.tile_grid;
        let full_size = match mode {
            RenderMode::FullImage => Some(grid.pixel_size(tile_size).ok_or(SubmitError::ImageTooLarge {
                cols: grid.cols,
                rows: grid.rows,
                tile_size,
            })?),
            RenderMode::PerTile => None,
        };

        for mesh in &self.meshes {
            renderer.add_building(mesh).map_err(SubmitError::Renderer)?;
        }
        for prop in &self.props {
            renderer.add_prop(prop).map_err(SubmitError::Renderer)?;
        }

        match full_size {
            Some((width, height)) => {
                let full_image = renderer
                    .render_full(&self.camera, width, height)
                    .map_err(SubmitError::Renderer)?;
                let images = ManifestImages::FullImage { full_image, width, height };
                Ok(Manifest::new(grid, self.content_bounds, tile_size, images))
            }
            None => {
                let mut tiles = Vec::with_capacity(grid.tiles.len());
                for tile in &grid.tiles {
                    let camera = CameraFrame::for_tile(tile, grid.world_tile_size, &self.camera_params);
                    let filename = renderer
                        .render_tile(tile, &camera, tile_size)
                        .map_err(SubmitError::Renderer)?;
                    tiles.push(ManifestTile { col: tile.col, row: tile.row, filename });
                }
                Ok(Manifest::per_tile(grid, self.content_bounds, tile_size, tiles))
            }
        }
    }
}
