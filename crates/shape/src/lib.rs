//! Shape model for the map drawing manager.
//!
//! Shapes live in a flat list; their z-order is their index in the list.
//! Geometry is plain data: the map widget does all projection and hit
//! testing.

pub mod coords;
mod path;
mod shape;
mod shape_id;

pub use coords::{LatLng, LatLngBounds};
pub use path::{Path, PathChange, PathEdit, PathError};
pub use shape::{Geometry, Rings, Shape, ShapeKind, ShapeRecord};
pub use shape_id::ShapeId;
