//! Commands - every operation that changes the drawing layer.
//!
//! A command is the scripted form of what a user does with the toolbar or
//! the map, so recorded sessions can be replayed against a headless map.

use serde::{Deserialize, Serialize};
use shape::{Geometry, PathEdit, ShapeId, ShapeKind};

/// A command that modifies the drawing layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    // === Manager ===
    /// Delete every shape.
    Clear,

    /// Delete the selected shape.
    Delete,

    Enable,

    Disable,

    /// Write the current shapes through the save handler.
    Save,

    /// Replace the current shapes with the stored ones.
    Load,

    /// Pick a drawing tool. `null` is the hand tool.
    SetMode {
        #[serde(default)]
        mode: Option<ShapeKind>,
    },

    // === Shapes ===
    /// Finish drawing a shape, as the map does when an overlay completes.
    Draw {
        geometry: Geometry,
        #[serde(default)]
        color: String,
    },

    /// Replace the geometry of a shape. The kind cannot change.
    Edit { id: ShapeId, geometry: Geometry },

    /// Edit one vertex of a polyline path or polygon ring.
    EditPath {
        id: ShapeId,
        #[serde(default)]
        ring: usize,
        edit: PathEdit,
    },

    SetColor { id: ShapeId, color: String },

    // === Pointer ===
    ClickShape { id: ShapeId },

    ClickMap,

    // === Batch ===
    /// Execute multiple commands in sequence.
    Batch { commands: Vec<Command> },
}

/// Result of executing a command.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommandResult {
    Success {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        created: Vec<ShapeId>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        modified: Vec<ShapeId>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        deleted: Vec<ShapeId>,
    },
    Error {
        message: String,
    },
}

impl CommandResult {
    pub fn success() -> Self {
        Self::Success {
            created: vec![],
            modified: vec![],
            deleted: vec![],
        }
    }

    pub fn created(ids: Vec<ShapeId>) -> Self {
        Self::Success {
            created: ids,
            modified: vec![],
            deleted: vec![],
        }
    }

    pub fn modified(ids: Vec<ShapeId>) -> Self {
        Self::Success {
            created: vec![],
            modified: ids,
            deleted: vec![],
        }
    }

    pub fn deleted(ids: Vec<ShapeId>) -> Self {
        Self::Success {
            created: vec![],
            modified: vec![],
            deleted: ids,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Fold another result into this one. The first error wins.
    pub fn merge(self, other: CommandResult) -> Self {
        match (self, other) {
            (
                Self::Success {
                    mut created,
                    mut modified,
                    mut deleted,
                },
                Self::Success {
                    created: c,
                    modified: m,
                    deleted: d,
                },
            ) => {
                created.extend(c);
                modified.extend(m);
                deleted.extend(d);
                Self::Success {
                    created,
                    modified,
                    deleted,
                }
            }
            (error @ Self::Error { .. }, _) => error,
            (_, error) => error,
        }
    }
}
