use serde::{Deserialize, Serialize};
use shape::{Geometry, PathEdit, ShapeId, ShapeKind, ShapeRecord};

/// Something the user did on the map, as reported by the host widget.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MapEvent {
    /// The user finished drawing an overlay.
    OverlayComplete { shape: ShapeRecord },

    /// An overlay's bounds, center or radius changed.
    ShapeEdited { id: ShapeId, geometry: Geometry },

    /// A vertex of a polyline path or polygon ring changed.
    PathEdited {
        id: ShapeId,
        #[serde(default)]
        ring: usize,
        edit: PathEdit,
    },

    ShapeClicked { id: ShapeId },

    /// A click on the map outside any overlay.
    MapClicked,

    /// The user picked another tool in the drawing toolbar.
    DrawingModeChanged { mode: Option<ShapeKind> },
}
