// Grid manifest handed to tile viewers and slicing tools
use serde::{Deserialize, Serialize};

use crate::models::Bounds;
use crate::tile_grid::TileGrid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestTile {
    pub col: u32,
    pub row: u32,
    pub filename: String,
}

/// Either one image per tile or a single image covering the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ManifestImages {
    Tiles {
        tiles: Vec<ManifestTile>,
    },
    #[serde(rename_all = "camelCase")]
    FullImage {
        full_image: String,
        width: u32,
        height: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Pixel edge length of one tile.
    pub tile_size: u32,
    pub world_tile_size: f64,
    pub cols: u32,
    pub rows: u32,
    /// Scene content bounds in local meters, before the half-tile grid padding.
    pub bounds: Bounds,
    #[serde(flatten)]
    pub images: ManifestImages,
}

impl Manifest {
    pub fn new(grid: &TileGrid, bounds: Bounds, tile_size: u32, images: ManifestImages) -> Self {
        Self {
            tile_size,
            world_tile_size: grid.world_tile_size,
            cols: grid.cols,
            rows: grid.rows,
            bounds,
            images,
        }
    }

    /// Manifest for per-tile images, in the order given.
    pub fn per_tile(grid: &TileGrid, bounds: Bounds, tile_size: u32, tiles: Vec<ManifestTile>) -> Self {
        Self::new(grid, bounds, tile_size, ManifestImages::Tiles { tiles })
    }

    /// Filename for a tile, if the manifest lists per-tile images.
    pub fn tile_filename(&self, col: u32, row: u32) -> Option<&str> {
        match &self.images {
            ManifestImages::Tiles { tiles } => tiles
                .iter()
                .find(|t| t.col == col && t.row == row)
                .map(|t| t.filename.as_str()),
            ManifestImages::FullImage { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile_grid::plan;
    use serde_json::json;

    fn content() -> Bounds {
        Bounds::new(0.0, 100.0, 0.0, 40.0)
    }

    fn grid() -> TileGrid {
        plan(&content(), 15.0).expect("grid")
    }

    fn full_image() -> Manifest {
        let images = ManifestImages::FullImage {
            full_image: "full-render.png".to_string(),
            width: 4096,
            height: 2048,
        };
        Manifest::new(&grid(), content(), 512, images)
    }

    #[test]
    fn test_full_image_fields() {
        let manifest = full_image();
        let value = serde_json::to_value(&manifest).expect("json");

        assert_eq!(value["tileSize"], json!(512));
        assert_eq!(value["worldTileSize"], json!(15.0));
        assert_eq!(value["cols"], json!(8));
        assert_eq!(value["rows"], json!(4));
        assert_eq!(value["fullImage"], json!("full-render.png"));
        assert_eq!(value["width"], json!(4096));
        assert_eq!(value["height"], json!(2048));
        assert_eq!(value["bounds"]["minX"], json!(0.0));
        assert_eq!(value["bounds"]["maxZ"], json!(40.0));
        assert!(value.get("tiles").is_none());
    }

    #[test]
    fn test_per_tile_fields() {
        let grid = grid();
        let tiles = grid
            .tiles
            .iter()
            .map(|t| ManifestTile {
                col: t.col,
                row: t.row,
                filename: format!("tile_{}_{}.png", t.col, t.row),
            })
            .collect();
        let manifest = Manifest::per_tile(&grid, content(), 256, tiles);
        let value = serde_json::to_value(&manifest).expect("json");

        assert_eq!(value["tiles"].as_array().map(|a| a.len()), Some(32));
        assert_eq!(value["tiles"][9], json!({"col": 1, "row": 1, "filename": "tile_1_1.png"}));
        assert!(value.get("fullImage").is_none());
        assert_eq!(manifest.tile_filename(7, 3), Some("tile_7_3.png"));
        assert_eq!(manifest.tile_filename(8, 0), None);
    }

    #[test]
    fn test_manifest_reads_back() {
        let manifest = full_image();
        let text = serde_json::to_string_pretty(&manifest).expect("json");
        let parsed: Manifest = serde_json::from_str(&text).expect("parse");
        assert_eq!(parsed, manifest);
    }
}
