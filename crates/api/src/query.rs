//! Queries - read-only access to the drawing layer.

use serde::{Deserialize, Serialize};
use shape::{Geometry, Shape, ShapeId, ShapeKind};

/// A query for drawing state (read-only).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Query {
    GetSelection,

    GetAllShapes,

    GetShape { id: ShapeId },

    GetShapeCount,

    /// The active drawing tool.
    GetMode,

    /// The document the save handler would receive.
    GetJson,

    IsEnabled,
}

/// Response to a query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryResult {
    Selection { id: Option<ShapeId> },

    Shapes { shapes: Vec<ShapeInfo> },

    Shape { shape: Option<ShapeInfo> },

    Count { count: usize },

    Mode { mode: Option<ShapeKind> },

    Json { json: String },

    Enabled { enabled: bool },

    Error { message: String },
}

/// Serializable shape information.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapeInfo {
    pub id: ShapeId,
    pub kind: ShapeKind,
    pub color: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub selected: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub editable: bool,
    pub geometry: Geometry,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl From<&Shape> for ShapeInfo {
    fn from(shape: &Shape) -> Self {
        Self {
            id: shape.id(),
            kind: shape.kind(),
            color: shape.color.clone(),
            selected: shape.selected,
            editable: shape.editable,
            geometry: shape.geometry.clone(),
        }
    }
}
