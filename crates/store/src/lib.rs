//! In-memory shape collection for the drawing manager.
//!
//! Holds the drawn shapes in z-order, the single selection and the id
//! counter, and queues events describing each mutation.

mod store;

pub use store::{ShapeStore, StoreEvent};
// Re-export the model for convenience
pub use shape::{
    Geometry, LatLng, Path, PathChange, PathEdit, PathError, Shape, ShapeId, ShapeKind, ShapeRecord,
};
