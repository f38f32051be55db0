//! Overpass API JSON to footprints.
//!
//! Rebuilds way geometry from the node list of the same response. Ways tagged
//! `building` become footprints with estimated heights; `leisure=stadium`
//! ways are added as stadiums.

use std::collections::HashMap;

use serde::Deserialize;

use crate::attributes::{building_category, estimate_height, find_landmark, Landmark, Tags};
use crate::error::Result;
use crate::models::{Category, Footprint, FootprintId, GeoPoint};

pub const DEFAULT_STADIUM_HEIGHT: f64 = 40.0;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Node {
        id: i64,
        lon: f64,
        lat: f64,
    },
    Way {
        id: i64,
        #[serde(default)]
        nodes: Vec<i64>,
        #[serde(default)]
        tags: Tags,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OsmDocument {
    #[serde(default)]
    pub elements: Vec<Element>,
}

struct Way<'a> {
    id: i64,
    nodes: &'a [i64],
    tags: &'a Tags,
}

impl OsmDocument {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    fn node_index(&self) -> HashMap<i64, GeoPoint> {
        self.elements
            .iter()
            .filter_map(|e| match e {
                Element::Node { id, lon, lat } => Some((*id, GeoPoint::new(*lon, *lat))),
                _ => None,
            })
            .collect()
    }

    fn ways(&self) -> impl Iterator<Item = Way<'_>> {
        self.elements.iter().filter_map(|e| match e {
            Element::Way { id, nodes, tags } => Some(Way { id: *id, nodes, tags }),
            _ => None,
        })
    }

    /// Footprints for every usable building or stadium way, in document order.
    pub fn footprints(&self, landmarks: &[Landmark]) -> Vec<Footprint> {
        let nodes = self.node_index();
        let mut footprints = Vec::new();
        let mut incomplete = 0usize;

        for way in self.ways() {
            let is_building = way.tags.contains_key("building");
            let is_stadium = way.tags.get("leisure").map(String::as_str) == Some("stadium");
            if !is_building && !is_stadium {
                continue;
            }

            let Some(coords) = way_coords(way.nodes, &nodes) else {
                incomplete += 1;
                continue;
            };

            let name = way.tags.get("name").map(String::as_str);
            let (height, category) = if is_building {
                (
                    estimate_height(way.tags, name, landmarks),
                    building_category(way.tags, name, landmarks),
                )
            } else {
                let height = find_landmark(name, landmarks)
                    .map(|l| l.height)
                    .unwrap_or(DEFAULT_STADIUM_HEIGHT);
                (height, Category::Stadium)
            };

            footprints.push(Footprint {
                id: Some(FootprintId::Number(way.id)),
                coords,
                height,
                category,
            });
        }

        if incomplete > 0 {
            tracing::debug!("dropped {} ways with missing nodes or under 3 points", incomplete);
        }
        tracing::info!("extracted {} footprints from OSM data", footprints.len());

        footprints
    }
}

/// Resolve a way's node ids. `None` if any node is missing or fewer than 3 remain.
fn way_coords(node_ids: &[i64], nodes: &HashMap<i64, GeoPoint>) -> Option<Vec<GeoPoint>> {
    let coords = node_ids
        .iter()
        .map(|id| nodes.get(id).copied())
        .collect::<Option<Vec<_>>>()?;
    if coords.len() < 3 {
        return None;
    }
    Some(coords)
}
