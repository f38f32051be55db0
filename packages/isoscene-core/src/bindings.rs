// JavaScript entry points for the browser build
use std::sync::Once;

use serde_wasm_bindgen::to_value;
use wasm_bindgen::prelude::*;

use crate::config::RunConfig;
use crate::models::Bounds;
use crate::tile_grid;

static INIT: Once = Once::new();

#[wasm_bindgen(start)]
pub fn start() {
    INIT.call_once(|| {
        // Readable panic messages in the browser console
        #[cfg(feature = "console_error_panic_hook")]
        console_error_panic_hook::set_once();
    });
}

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Build a scene from a run configuration given as JSON text.
#[wasm_bindgen]
pub fn build_scene(config_json: &str) -> Result<JsValue, JsValue> {
    let config = RunConfig::from_json(config_json).map_err(to_js_error)?;
    let scene = config.build().map_err(to_js_error)?;
    Ok(to_value(&scene)?)
}

/// Tile layout for the given content bounds in local meters.
#[wasm_bindgen]
pub fn plan_tile_grid(
    min_x: f64,
    max_x: f64,
    min_z: f64,
    max_z: f64,
    world_tile_size: f64,
) -> Result<JsValue, JsValue> {
    let content = Bounds::new(min_x, max_x, min_z, max_z);
    let grid = tile_grid::plan(&content, world_tile_size).map_err(to_js_error)?;
    Ok(to_value(&grid)?)
}
