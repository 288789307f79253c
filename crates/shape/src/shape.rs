use crate::{LatLng, LatLngBounds, Path, PathChange, PathEdit, PathError, ShapeId};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// The kind of overlay.
///
/// The lower-case name is what the map widget reports as the overlay type
/// and what the persisted document stores under `type`.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Polygon,
    Polyline,
    Marker,
}

impl ShapeKind {
    /// Modes offered by the drawing toolbar when none are configured.
    pub const DEFAULT_DRAWING_MODES: [ShapeKind; 4] = [
        ShapeKind::Rectangle,
        ShapeKind::Circle,
        ShapeKind::Polygon,
        ShapeKind::Polyline,
    ];

    /// Whether the shape can become the selection.
    pub fn is_selectable(self) -> bool {
        self != ShapeKind::Marker
    }

    /// Whether the shape is written to the persisted document.
    pub fn is_persisted(self) -> bool {
        self != ShapeKind::Marker
    }
}

/// Rings of a polygon. Most polygons have a single outer ring.
pub type Rings = SmallVec<[Path; 1]>;

/// Kind-specific geometry of a shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Geometry {
    Rectangle { bounds: LatLngBounds },
    /// Radius in metres.
    Circle { center: LatLng, radius: f64 },
    /// Ordered set of closed rings.
    Polygon { paths: Rings },
    Polyline { path: Path },
    Marker { position: LatLng },
}

impl Geometry {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Geometry::Rectangle { .. } => ShapeKind::Rectangle,
            Geometry::Circle { .. } => ShapeKind::Circle,
            Geometry::Polygon { .. } => ShapeKind::Polygon,
            Geometry::Polyline { .. } => ShapeKind::Polyline,
            Geometry::Marker { .. } => ShapeKind::Marker,
        }
    }

    pub fn rectangle(south_west: LatLng, north_east: LatLng) -> Self {
        Geometry::Rectangle {
            bounds: LatLngBounds::new(south_west, north_east),
        }
    }

    pub fn circle(center: LatLng, radius: f64) -> Self {
        Geometry::Circle { center, radius }
    }

    pub fn polygon(paths: impl IntoIterator<Item = Path>) -> Self {
        Geometry::Polygon {
            paths: paths.into_iter().collect(),
        }
    }

    pub fn polyline(path: Path) -> Self {
        Geometry::Polyline { path }
    }

    pub fn marker(position: LatLng) -> Self {
        Geometry::Marker { position }
    }

    /// The path with the given index: ring `index` of a polygon, or the
    /// single path of a polyline (index 0).
    pub fn path_mut(&mut self, index: usize) -> Option<&mut Path> {
        match self {
            Geometry::Polygon { paths } => paths.get_mut(index),
            Geometry::Polyline { path } if index == 0 => Some(path),
            _ => None,
        }
    }
}

/// A shape that has not been given an id yet.
///
/// Produced by the map widget when an overlay is drawn and by the codec when
/// a persisted document is read.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapeRecord {
    pub geometry: Geometry,
    #[serde(default)]
    pub color: String,
}

impl ShapeRecord {
    pub fn new(geometry: Geometry, color: impl Into<String>) -> Self {
        Self {
            geometry,
            color: color.into(),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }
}

/// A drawn overlay tracked by the store.
///
/// The id is fixed at creation; geometry and color are edited in place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    id: ShapeId,
    pub geometry: Geometry,
    pub color: String,
    pub selected: bool,
    pub editable: bool,
}

impl Shape {
    pub fn new(id: ShapeId, record: ShapeRecord) -> Self {
        Self {
            id,
            geometry: record.geometry,
            color: record.color,
            selected: false,
            editable: false,
        }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind()
    }

    /// Copy of the persisted part of the shape.
    pub fn to_record(&self) -> ShapeRecord {
        ShapeRecord {
            geometry: self.geometry.clone(),
            color: self.color.clone(),
        }
    }

    /// Apply an edit to one of the shape's paths.
    ///
    /// Returns `Ok(None)` when the shape has no path with that index.
    pub fn edit_path(
        &mut self,
        ring: usize,
        edit: PathEdit,
    ) -> Result<Option<PathChange>, PathError> {
        match self.geometry.path_mut(ring) {
            Some(path) => path.apply(edit).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_kind_names() {
        let names: Vec<String> = ShapeKind::iter().map(|k| k.to_string()).collect();
        assert_eq!(names, ["rectangle", "circle", "polygon", "polyline", "marker"]);
        assert_eq!(ShapeKind::from_str("polygon"), Ok(ShapeKind::Polygon));
        assert!(ShapeKind::from_str("hexagon").is_err());
    }

    #[test]
    fn test_marker_is_not_selectable() {
        assert!(!ShapeKind::Marker.is_selectable());
        assert!(ShapeKind::Circle.is_selectable());
    }

    #[test]
    fn test_kind_follows_geometry() {
        let record = ShapeRecord::new(Geometry::circle(LatLng::new(1.0, 2.0), 30.0), "#00FF00");
        let shape = Shape::new(ShapeId::new(4), record.clone());
        assert_eq!(shape.kind(), ShapeKind::Circle);
        assert_eq!(shape.id(), ShapeId::new(4));
        assert_eq!(shape.to_record(), record);
        assert!(!shape.selected);
    }

    #[test]
    fn test_edit_polygon_ring() {
        let ring = Path::from_points([
            LatLng::new(0.0, 0.0),
            LatLng::new(0.0, 1.0),
            LatLng::new(1.0, 1.0),
        ]);
        let mut shape = Shape::new(
            ShapeId::new(0),
            ShapeRecord::new(Geometry::polygon([ring]), "#000000"),
        );

        let change = shape
            .edit_path(0, PathEdit::SetAt { index: 2, point: LatLng::new(2.0, 2.0) })
            .unwrap();
        assert!(matches!(change, Some(PathChange::Set { index: 2, .. })));

        // No second ring.
        assert_eq!(shape.edit_path(1, PathEdit::RemoveAt { index: 0 }), Ok(None));
    }

    #[test]
    fn test_rectangle_has_no_paths() {
        let mut shape = Shape::new(
            ShapeId::new(0),
            ShapeRecord::new(Geometry::rectangle(LatLng::new(0.0, 0.0), LatLng::new(1.0, 1.0)), ""),
        );
        assert_eq!(shape.edit_path(0, PathEdit::RemoveAt { index: 0 }), Ok(None));
    }

    #[test]
    fn test_geometry_serde_tag() {
        let geometry = Geometry::marker(LatLng::new(1.5, -2.0));
        let json = serde_json::to_string(&geometry).unwrap();
        assert_eq!(json, r#"{"kind":"marker","position":{"lat":1.5,"lng":-2.0}}"#);
        let back: Geometry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, geometry);
    }
}
