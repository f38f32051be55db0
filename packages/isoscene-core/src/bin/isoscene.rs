use std::convert::Infallible;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use isoscene_core::attributes::Landmark;
use isoscene_core::osm::OsmDocument;
use isoscene_core::tile_grid::{self, DEFAULT_WORLD_TILE_SIZE};
use isoscene_core::{
    Bounds, BuildingMesh, CameraFrame, PropPlacement, RenderMode, Renderer, RunConfig, Tile,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Build tiled isometric scene descriptions from building footprints")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the scene and write scene.json and manifest.json
    Build {
        /// Run configuration (JSON)
        #[arg(long)]
        config: PathBuf,

        /// Output directory
        #[arg(long, default_value = "out")]
        out: PathBuf,

        /// Override the prop seed
        #[arg(long)]
        seed: Option<u64>,

        /// Override the number of props
        #[arg(long)]
        props: Option<usize>,

        /// Plan one image per tile instead of a single full image
        #[arg(long)]
        per_tile: bool,
    },

    /// Print the tile grid for content bounds in local meters
    Grid {
        #[arg(long, allow_hyphen_values = true)]
        min_x: f64,
        #[arg(long, allow_hyphen_values = true)]
        max_x: f64,
        #[arg(long, allow_hyphen_values = true)]
        min_z: f64,
        #[arg(long, allow_hyphen_values = true)]
        max_z: f64,
        #[arg(long, default_value_t = DEFAULT_WORLD_TILE_SIZE)]
        world_tile_size: f64,
    },

    /// Convert an Overpass JSON response into a footprint list
    Osm {
        /// Overpass API JSON
        #[arg(long)]
        input: PathBuf,

        /// Footprint list output (JSON)
        #[arg(long)]
        out: PathBuf,

        /// Known buildings with fixed height and category (JSON list)
        #[arg(long)]
        landmarks: Option<PathBuf>,
    },
}

/// Names the images a render step is expected to produce, without drawing anything.
struct ImagePlan;

impl Renderer for ImagePlan {
    type Error = Infallible;

    fn add_building(&mut self, _mesh: &BuildingMesh) -> Result<(), Infallible> {
        Ok(())
    }

    fn add_prop(&mut self, _prop: &PropPlacement) -> Result<(), Infallible> {
        Ok(())
    }

    fn render_full(&mut self, _camera: &CameraFrame, _width: u32, _height: u32) -> Result<String, Infallible> {
        Ok("full-render.png".to_string())
    }

    fn render_tile(&mut self, tile: &Tile, _camera: &CameraFrame, _size: u32) -> Result<String, Infallible> {
        Ok(format!("tile_{}_{}.png", tile.col, tile.row))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    match args.command {
        Command::Build { config, out, seed, props, per_tile } => build(&config, &out, seed, props, per_tile)?,
        Command::Grid { min_x, max_x, min_z, max_z, world_tile_size } => {
            let grid = tile_grid::plan(&Bounds::new(min_x, max_x, min_z, max_z), world_tile_size)?;
            println!("{}", serde_json::to_string_pretty(&grid)?);
        }
        Command::Osm { input, out, landmarks } => osm(&input, &out, landmarks.as_deref())?,
    }

    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}

fn build(config_path: &Path, out: &Path, seed: Option<u64>, props: Option<usize>, per_tile: bool) -> Result<()> {
    let mut config = RunConfig::load(config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;
    if let Some(seed) = seed {
        config.props.seed = seed;
    }
    if let Some(count) = props {
        config.props.scatter.count = count;
    }
    config.validate()?;

    let scene = config.build()?;
    let mode = if per_tile { RenderMode::PerTile } else { RenderMode::FullImage };
    let manifest = scene
        .submit(&mut ImagePlan, config.tile_size, mode)
        .context("planning images")?;

    fs::create_dir_all(out).with_context(|| format!("creating {}", out.display()))?;
    write_json(&out.join("scene.json"), &scene)?;
    write_json(&out.join("manifest.json"), &manifest)?;

    info!(
        "wrote {} meshes, {} props, {}x{} tiles to {}",
        scene.summary.meshes_built,
        scene.summary.props_placed,
        manifest.cols,
        manifest.rows,
        out.display()
    );
    Ok(())
}

fn osm(input: &Path, out: &Path, landmarks: Option<&Path>) -> Result<()> {
    let text = fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
    let doc = OsmDocument::from_json(&text).with_context(|| format!("parsing {}", input.display()))?;

    let landmarks: Vec<Landmark> = match landmarks {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => Vec::new(),
    };

    let footprints = doc.footprints(&landmarks);
    write_json(out, &footprints)?;
    info!("wrote {} footprints to {}", footprints.len(), out.display());
    Ok(())
}
