// Height and category heuristics for OpenStreetMap building tags
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::Category;

pub type Tags = HashMap<String, String>;

/// Three floors at 3.5 m.
pub const DEFAULT_BUILDING_HEIGHT: f64 = 10.5;

pub const METERS_PER_LEVEL: f64 = 3.5;

/// A known building whose height and category override anything in its tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub name: String,
    pub height: f64,
    #[serde(default, alias = "type")]
    pub category: Category,
}

/// First landmark whose name appears in `name`, ignoring case.
pub fn find_landmark<'a>(name: Option<&str>, landmarks: &'a [Landmark]) -> Option<&'a Landmark> {
    let name = name?.to_lowercase();
    landmarks
        .iter()
        .find(|landmark| name.contains(&landmark.name.to_lowercase()))
}

fn height_for_building_type(building: &str) -> Option<f64> {
    let height = match building {
        "university" | "college" => 15.0,
        "school" | "residential" | "commercial" | "chapel" => 12.0,
        "dormitory" | "hospital" => 25.0,
        "apartments" => 20.0,
        "stadium" => 30.0,
        "church" => 18.0,
        "retail" | "warehouse" | "house" | "detached" => 8.0,
        "industrial" => 10.0,
        "garage" => 6.0,
        "parking" => 15.0,
        "terrace" => 9.0,
        _ => return None,
    };
    Some(height)
}

fn parse_height_tag(raw: &str) -> Option<f64> {
    raw.replace(['m', '\''], "").trim().parse().ok()
}

fn parse_levels_tag(raw: &str) -> Option<f64> {
    raw.trim().parse::<i64>().ok().map(|levels| levels as f64 * METERS_PER_LEVEL)
}

/// Building height in meters.
///
/// Tries a landmark match, the `height` tag, `building:levels`, then a
/// per-type table, and falls back to [`DEFAULT_BUILDING_HEIGHT`].
pub fn estimate_height(tags: &Tags, name: Option<&str>, landmarks: &[Landmark]) -> f64 {
    if let Some(landmark) = find_landmark(name, landmarks) {
        return landmark.height;
    }

    if let Some(height) = tags.get("height").and_then(|h| parse_height_tag(h)) {
        return height;
    }

    if let Some(height) = tags.get("building:levels").and_then(|l| parse_levels_tag(l)) {
        return height;
    }

    tags.get("building")
        .and_then(|b| height_for_building_type(b))
        .unwrap_or(DEFAULT_BUILDING_HEIGHT)
}

/// Rendering category from a landmark match, then `amenity`, then `building`.
pub fn building_category(tags: &Tags, name: Option<&str>, landmarks: &[Landmark]) -> Category {
    if let Some(landmark) = find_landmark(name, landmarks) {
        return landmark.category;
    }

    let amenity = tags.get("amenity").map(String::as_str).unwrap_or("");
    match amenity {
        "university" | "college" | "school" => return Category::University,
        "library" => return Category::Library,
        "hospital" | "clinic" => return Category::Hospital,
        "theatre" | "cinema" | "arts_centre" => return Category::Cultural,
        _ => {}
    }

    match tags.get("building").map(String::as_str).unwrap_or("yes") {
        "university" | "college" | "school" => Category::University,
        "dormitory" | "residential" | "apartments" => Category::Residential,
        "stadium" => Category::Stadium,
        "church" | "chapel" => Category::Religious,
        "commercial" | "retail" | "office" => Category::Commercial,
        "industrial" | "warehouse" => Category::Industrial,
        _ => Category::Generic,
    }
}
