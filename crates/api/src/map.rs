//! The map widget as seen by the drawing manager.
//!
//! Rendering, pan/zoom, the drawing toolbar and all geometry math belong to
//! the host's map library. The manager only tells it which controls to show
//! and how each overlay should look.

use crate::ControlPosition;
use shape::{Shape, ShapeId, ShapeKind};
use std::collections::{BTreeMap, BTreeSet};

/// Drawing toolbar configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawingControls {
    pub position: ControlPosition,
    pub drawing_modes: Vec<ShapeKind>,
}

/// Operations the manager needs from the host map.
pub trait MapSurface {
    /// Attach the drawing toolbar to the map.
    fn show_drawing_controls(&mut self, controls: &DrawingControls);

    /// Detach the drawing toolbar.
    fn hide_drawing_controls(&mut self);

    /// Select the active drawing tool. `None` is the hand tool.
    ///
    /// The manager reports the change itself. A widget that answers with its
    /// own mode-change event is harmless: a repeated mode is ignored.
    fn set_drawing_mode(&mut self, mode: Option<ShapeKind>);

    /// Put an overlay for a shape that was not drawn interactively (for
    /// example one read from storage) on the map.
    fn show_overlay(&mut self, shape: &Shape);

    /// Take an overlay off the map.
    fn hide_overlay(&mut self, id: ShapeId);

    fn set_overlay_editable(&mut self, id: ShapeId, editable: bool);
}

/// A map with no display that records what it has been told.
///
/// Used by the command line tools and in tests.
#[derive(Debug, Default)]
pub struct HeadlessMap {
    pub controls: Option<DrawingControls>,
    pub mode: Option<ShapeKind>,
    /// Overlays currently on the map, with their editable flag.
    pub overlays: BTreeMap<ShapeId, bool>,
    /// Overlays that have been taken off the map.
    pub hidden: BTreeSet<ShapeId>,
}

impl HeadlessMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self, id: ShapeId) -> bool {
        self.overlays.contains_key(&id)
    }

    pub fn is_editable(&self, id: ShapeId) -> bool {
        self.overlays.get(&id).copied().unwrap_or(false)
    }
}

impl MapSurface for HeadlessMap {
    fn show_drawing_controls(&mut self, controls: &DrawingControls) {
        self.controls = Some(controls.clone());
    }

    fn hide_drawing_controls(&mut self) {
        self.controls = None;
    }

    fn set_drawing_mode(&mut self, mode: Option<ShapeKind>) {
        self.mode = mode;
    }

    fn show_overlay(&mut self, shape: &Shape) {
        self.hidden.remove(&shape.id());
        self.overlays.insert(shape.id(), shape.editable);
    }

    fn hide_overlay(&mut self, id: ShapeId) {
        if self.overlays.remove(&id).is_some() {
            self.hidden.insert(id);
        }
    }

    fn set_overlay_editable(&mut self, id: ShapeId, editable: bool) {
        // Interactively drawn overlays appear here the first time they are
        // touched.
        self.overlays.insert(id, editable);
    }
}
