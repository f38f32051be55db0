// Shared data structures for the scene pipeline
use serde::{Deserialize, Serialize};
use std::fmt;

/// A longitude/latitude pair in degrees. Serialized as `[lon, lat]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl From<[f64; 2]> for GeoPoint {
    fn from(pair: [f64; 2]) -> Self {
        Self { lon: pair[0], lat: pair[1] }
    }
}

impl From<GeoPoint> for [f64; 2] {
    fn from(point: GeoPoint) -> Self {
        [point.lon, point.lat]
    }
}

/// Footprint identifier. Map APIs hand out numeric ids, hand-written inputs often use strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FootprintId {
    Number(i64),
    Text(String),
}

impl fmt::Display for FootprintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FootprintId::Number(n) => write!(f, "{}", n),
            FootprintId::Text(s) => f.write_str(s),
        }
    }
}

/// Building type tag. The renderer picks materials from it; the core only carries it through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum Category {
    University,
    Library,
    Stadium,
    Residential,
    Commercial,
    Hospital,
    Cultural,
    Religious,
    Industrial,
    Civic,
    #[default]
    Generic,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::University => "university",
            Category::Library => "library",
            Category::Stadium => "stadium",
            Category::Residential => "residential",
            Category::Commercial => "commercial",
            Category::Hospital => "hospital",
            Category::Cultural => "cultural",
            Category::Religious => "religious",
            Category::Industrial => "industrial",
            Category::Civic => "civic",
            Category::Generic => "default",
        }
    }
}

impl From<String> for Category {
    fn from(tag: String) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "university" => Category::University,
            "library" => Category::Library,
            "stadium" => Category::Stadium,
            "residential" => Category::Residential,
            "commercial" => Category::Commercial,
            "hospital" => Category::Hospital,
            "cultural" => Category::Cultural,
            "religious" => Category::Religious,
            "industrial" => Category::Industrial,
            "civic" => Category::Civic,
            _ => Category::Generic,
        }
    }
}

impl From<Category> for &'static str {
    fn from(category: Category) -> Self {
        category.as_str()
    }
}

/// One building: ground-plan ring in lon/lat plus its attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<FootprintId>,
    pub coords: Vec<GeoPoint>,
    pub height: f64,
    #[serde(default, alias = "type")]
    pub category: Category,
}

/// Reference origin and scale factors for the local tangent-plane projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionConfig {
    pub center_lon: f64,
    pub center_lat: f64,
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default = "default_height_scale")]
    pub height_scale: f64,
}

pub const DEFAULT_HEIGHT_SCALE: f64 = 0.8;

fn default_scale() -> f64 {
    1.0
}
fn default_height_scale() -> f64 {
    DEFAULT_HEIGHT_SCALE
}

impl ProjectionConfig {
    pub fn new(center_lon: f64, center_lat: f64) -> Self {
        Self {
            center_lon,
            center_lat,
            scale: default_scale(),
            height_scale: default_height_scale(),
        }
    }

    /// Reject scale factors that would make every downstream computation meaningless.
    pub fn validate(&self) -> crate::error::Result<()> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(crate::error::SceneError::InvalidScale(self.scale));
        }
        if !(self.height_scale.is_finite() && self.height_scale > 0.0) {
            return Err(crate::error::SceneError::InvalidHeightScale(self.height_scale));
        }
        Ok(())
    }
}

/// Planar position in local meters; y is reserved for height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalPoint {
    pub x: f64,
    pub z: f64,
}

impl LocalPoint {
    pub fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }
}

/// Mesh vertex with y up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalPoint3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl LocalPoint3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_vector(self) -> nalgebra::Vector3<f64> {
        nalgebra::Vector3::new(self.x, self.y, self.z)
    }

    pub fn from_vector(v: nalgebra::Vector3<f64>) -> Self {
        Self { x: v.x, y: v.y, z: v.z }
    }
}

/// Axis-aligned box on the ground plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl Bounds {
    pub fn new(min_x: f64, max_x: f64, min_z: f64, max_z: f64) -> Self {
        Self { min_x, max_x, min_z, max_z }
    }

    /// Bounding box of a point set, `None` when the set is empty.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a LocalPoint>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Bounds::new(first.x, first.x, first.z, first.z);
        for p in iter {
            bounds.min_x = bounds.min_x.min(p.x);
            bounds.max_x = bounds.max_x.max(p.x);
            bounds.min_z = bounds.min_z.min(p.z);
            bounds.max_z = bounds.max_z.max(p.z);
        }
        Some(bounds)
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            max_x: self.max_x.max(other.max_x),
            min_z: self.min_z.min(other.min_z),
            max_z: self.max_z.max(other.max_z),
        }
    }

    /// Grow (positive) or shrink (negative) every side by `amount`.
    pub fn expanded(&self, amount: f64) -> Bounds {
        Bounds {
            min_x: self.min_x - amount,
            max_x: self.max_x + amount,
            min_z: self.min_z - amount,
            max_z: self.max_z + amount,
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn depth(&self) -> f64 {
        self.max_z - self.min_z
    }

    pub fn center(&self) -> LocalPoint {
        LocalPoint::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_z + self.max_z) / 2.0,
        )
    }

    /// True when the box has negative extent on either axis.
    pub fn is_empty(&self) -> bool {
        self.max_x < self.min_x || self.max_z < self.min_z
    }

    pub fn contains_point(&self, p: &LocalPoint) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.z >= self.min_z && p.z <= self.max_z
    }

    pub fn contains_bounds(&self, other: &Bounds) -> bool {
        other.min_x >= self.min_x
            && other.max_x <= self.max_x
            && other.min_z >= self.min_z
            && other.max_z <= self.max_z
    }
}
