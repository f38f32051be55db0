//! Tile layout and orthographic camera framing.
//!
//! The grid pads the content bounds by half a tile on every side and cuts
//! the padded area into square cells, row-major. The camera frames either
//! the whole grid or one tile at a fixed isometric angle.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SceneError};
use crate::models::{Bounds, LocalPoint3};

pub const DEFAULT_WORLD_TILE_SIZE: f64 = 15.0;

/// Upper limit on the number of tiles in one grid.
pub const MAX_TILES: u64 = 1 << 20;

/// Elevation of a true isometric view, atan(1/sqrt(2)), in degrees.
pub const ISOMETRIC_ELEVATION_DEG: f64 = 35.264_389_682_754_654;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    pub col: u32,
    pub row: u32,
    pub world_center_x: f64,
    pub world_center_z: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileGrid {
    pub cols: u32,
    pub rows: u32,
    pub world_tile_size: f64,
    pub grid_bounds: Bounds,
    pub tiles: Vec<Tile>,
}

impl TileGrid {
    /// Ground area covered by the union of all tile cells.
    pub fn coverage(&self) -> Bounds {
        Bounds::new(
            self.grid_bounds.min_x,
            self.grid_bounds.min_x + self.cols as f64 * self.world_tile_size,
            self.grid_bounds.min_z,
            self.grid_bounds.min_z + self.rows as f64 * self.world_tile_size,
        )
    }

    pub fn tile(&self, col: u32, row: u32) -> Option<&Tile> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.tiles.get(row as usize * self.cols as usize + col as usize)
    }

    /// Ground-plane cell of one tile.
    pub fn tile_bounds(&self, tile: &Tile) -> Bounds {
        let half = self.world_tile_size * 0.5;
        Bounds::new(
            tile.world_center_x - half,
            tile.world_center_x + half,
            tile.world_center_z - half,
            tile.world_center_z + half,
        )
    }

    /// Full-image size in pixels for a given per-tile pixel size, `None` if it overflows `u32`.
    pub fn pixel_size(&self, tile_size: u32) -> Option<(u32, u32)> {
        Some((self.cols.checked_mul(tile_size)?, self.rows.checked_mul(tile_size)?))
    }
}

// None when the extent needs more than MAX_TILES cells on one axis, or is NaN
fn cell_count(extent: f64, world_tile_size: f64) -> Option<u64> {
    let cells = (extent / world_tile_size).ceil();
    if cells.is_nan() || cells > MAX_TILES as f64 {
        return None;
    }
    Some((cells as u64).max(1))
}

/// Lay out the tile grid over `content`.
pub fn plan(content: &Bounds, world_tile_size: f64) -> Result<TileGrid> {
    if !(world_tile_size.is_finite() && world_tile_size > 0.0) {
        return Err(SceneError::InvalidTileSize(world_tile_size));
    }

    let grid_bounds = content.expanded(world_tile_size * 0.5);
    let too_large = || SceneError::GridTooLarge {
        width: grid_bounds.width(),
        depth: grid_bounds.depth(),
        world_tile_size,
    };
    let cols = cell_count(grid_bounds.width(), world_tile_size).ok_or_else(too_large)?;
    let rows = cell_count(grid_bounds.depth(), world_tile_size).ok_or_else(too_large)?;
    let total = cols
        .checked_mul(rows)
        .filter(|&n| n <= MAX_TILES)
        .ok_or_else(too_large)?;

    // both axes are at most MAX_TILES, so they fit in u32
    let (cols, rows) = (cols as u32, rows as u32);
    let mut tiles = Vec::with_capacity(total as usize);
    for row in 0..rows {
        for col in 0..cols {
            tiles.push(Tile {
                col,
                row,
                world_center_x: grid_bounds.min_x + (col as f64 + 0.5) * world_tile_size,
                world_center_z: grid_bounds.min_z + (row as f64 + 0.5) * world_tile_size,
            });
        }
    }

    tracing::debug!(
        "tile grid {}x{} over X[{:.1}, {:.1}] Z[{:.1}, {:.1}]",
        cols,
        rows,
        grid_bounds.min_x,
        grid_bounds.max_x,
        grid_bounds.min_z,
        grid_bounds.max_z
    );

    Ok(TileGrid { cols, rows, world_tile_size, grid_bounds, tiles })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraParams {
    /// Per-axis standoff of an isometric eye; the eye sits `distance * sqrt(3)` from its target.
    #[serde(default = "default_distance")]
    pub distance: f64,
    /// Counter-clockwise from +x when seen from above. Purely stylistic.
    #[serde(default = "default_azimuth_deg")]
    pub azimuth_deg: f64,
    #[serde(default = "default_elevation_deg")]
    pub elevation_deg: f64,
    #[serde(default = "default_clip_start")]
    pub clip_start: f64,
    #[serde(default = "default_clip_end")]
    pub clip_end: f64,
}

fn default_distance() -> f64 {
    200.0
}
fn default_azimuth_deg() -> f64 {
    280.0
}
fn default_elevation_deg() -> f64 {
    ISOMETRIC_ELEVATION_DEG
}
fn default_clip_start() -> f64 {
    0.1
}
fn default_clip_end() -> f64 {
    1000.0
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            distance: default_distance(),
            azimuth_deg: default_azimuth_deg(),
            elevation_deg: default_elevation_deg(),
            clip_start: default_clip_start(),
            clip_end: default_clip_end(),
        }
    }
}

impl CameraParams {
    /// Offset from target to eye.
    pub fn eye_offset(&self) -> Vector3<f64> {
        let az = self.azimuth_deg.to_radians();
        let el = self.elevation_deg.to_radians();
        let reach = self.distance * 3f64.sqrt();
        Vector3::new(el.cos() * az.cos(), el.sin(), el.cos() * az.sin()) * reach
    }
}

/// Orthographic camera placement derived from the grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraFrame {
    /// Vertical world extent mapped onto the render height.
    pub ortho_scale: f64,
    pub position: LocalPoint3,
    pub target: LocalPoint3,
    pub clip_start: f64,
    pub clip_end: f64,
}

impl CameraFrame {
    fn looking_at(target: Vector3<f64>, ortho_scale: f64, params: &CameraParams) -> Self {
        Self {
            ortho_scale,
            position: LocalPoint3::from_vector(target + params.eye_offset()),
            target: LocalPoint3::from_vector(target),
            clip_start: params.clip_start,
            clip_end: params.clip_end,
        }
    }

    /// One orthographic view of the whole grid, centered on the grid bounds.
    pub fn full_scene(grid: &TileGrid, params: &CameraParams) -> Self {
        let center = grid.grid_bounds.center();
        let ortho_scale = grid.rows as f64 * grid.world_tile_size;
        Self::looking_at(Vector3::new(center.x, 0.0, center.z), ortho_scale, params)
    }

    /// View of a single tile for per-tile rendering.
    pub fn for_tile(tile: &Tile, world_tile_size: f64, params: &CameraParams) -> Self {
        Self::looking_at(
            Vector3::new(tile.world_center_x, 0.0, tile.world_center_z),
            world_tile_size,
            params,
        )
    }
}
