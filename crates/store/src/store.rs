use shape::{Geometry, PathChange, PathEdit, PathError, Shape, ShapeId, ShapeRecord};

/// Events emitted by the store.
///
/// Events queue up inside the store until the owner drains them with
/// [`ShapeStore::take_events`].
#[derive(Clone, Debug, PartialEq)]
pub enum StoreEvent {
    ShapeAdded(ShapeId),
    ShapeRemoved(ShapeId),
    ShapeEdited(ShapeId),
    /// A vertex of one of the shape's paths changed.
    PathChanged {
        id: ShapeId,
        ring: usize,
        change: PathChange,
    },
    /// The selection moved to the given shape, or was cleared.
    SelectionChanged(Option<ShapeId>),
    /// Persisted content changed and should be saved.
    ContentChanged,
}

/// The set of drawn shapes.
#[derive(Debug, Default)]
pub struct ShapeStore {
    /// All shapes, in z-order (back to front).
    shapes: Vec<Shape>,

    /// Currently selected shape. Never a marker.
    selection: Option<ShapeId>,

    /// Id given to the next added shape.
    next_id: ShapeId,

    events: Vec<StoreEvent>,
}

impl ShapeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shape, assigning it the next id.
    pub fn add(&mut self, record: ShapeRecord) -> ShapeId {
        let id = self.next_id;
        self.next_id = id.next();
        self.shapes.push(Shape::new(id, record));
        self.emit(StoreEvent::ShapeAdded(id));
        self.emit(StoreEvent::ContentChanged);
        id
    }

    /// Remove a shape. Removing a shape that is not in the store does nothing.
    pub fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        let pos = self.shapes.iter().position(|s| s.id() == id)?;
        let shape = self.shapes.remove(pos);
        if self.selection == Some(id) {
            self.selection = None;
            self.emit(StoreEvent::SelectionChanged(None));
        }
        self.emit(StoreEvent::ShapeRemoved(id));
        self.emit(StoreEvent::ContentChanged);
        Some(shape)
    }

    /// Remove every shape, returning how many were removed.
    ///
    /// The id counter keeps running so ids are never reused.
    pub fn clear(&mut self) -> usize {
        if self.selection.take().is_some() {
            self.emit(StoreEvent::SelectionChanged(None));
        }
        let removed: Vec<ShapeId> = self.shapes.drain(..).map(|s| s.id()).collect();
        for id in &removed {
            self.emit(StoreEvent::ShapeRemoved(*id));
        }
        self.emit(StoreEvent::ContentChanged);
        removed.len()
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id() == id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.get(id).is_some()
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// The id the next added shape will receive.
    pub fn next_id(&self) -> ShapeId {
        self.next_id
    }

    pub fn selection(&self) -> Option<ShapeId> {
        self.selection
    }

    pub fn selected_shape(&self) -> Option<&Shape> {
        self.selection.and_then(|id| self.get(id))
    }

    /// Move the selection to `id`, or clear it with `None`.
    ///
    /// Selecting the current selection, a marker, or an unknown id leaves the
    /// selection untouched. Returns whether the selection changed.
    pub fn set_selection(&mut self, id: Option<ShapeId>, editable: bool) -> bool {
        if id == self.selection {
            return false;
        }

        if let Some(id) = id {
            match self.get(id) {
                Some(shape) if shape.kind().is_selectable() => {}
                Some(shape) => {
                    log::debug!("{}: {} cannot be selected", id, shape.kind());
                    return false;
                }
                None => {
                    log::debug!("{}: not in store, selection unchanged", id);
                    return false;
                }
            }
        }

        if let Some(previous) = self.selection.take() {
            if let Some(shape) = self.get_mut(previous) {
                shape.selected = false;
                shape.editable = false;
            }
        }

        if let Some(id) = id {
            if let Some(shape) = self.get_mut(id) {
                shape.selected = true;
                shape.editable = editable;
            }
            self.selection = Some(id);
        }

        self.emit(StoreEvent::SelectionChanged(self.selection));
        true
    }

    pub fn clear_selection(&mut self) -> bool {
        self.set_selection(None, false)
    }

    /// Change whether the selected shape can be edited.
    pub fn set_selection_editable(&mut self, editable: bool) {
        if let Some(id) = self.selection {
            if let Some(shape) = self.get_mut(id) {
                shape.editable = editable;
            }
        }
    }

    /// Replace a shape's geometry. Returns false if the shape is unknown.
    pub fn edit_geometry(&mut self, id: ShapeId, geometry: Geometry) -> bool {
        let Some(shape) = self.get_mut(id) else {
            return false;
        };
        if shape.kind() != geometry.kind() {
            log::warn!(
                "{}: refusing to turn a {} into a {}",
                id,
                shape.kind(),
                geometry.kind()
            );
            return false;
        }
        shape.geometry = geometry;
        self.emit(StoreEvent::ShapeEdited(id));
        self.emit(StoreEvent::ContentChanged);
        true
    }

    pub fn set_color(&mut self, id: ShapeId, color: impl Into<String>) -> bool {
        let Some(shape) = self.get_mut(id) else {
            return false;
        };
        shape.color = color.into();
        self.emit(StoreEvent::ShapeEdited(id));
        self.emit(StoreEvent::ContentChanged);
        true
    }

    /// Apply an edit to a polyline path or polygon ring.
    ///
    /// Returns `Ok(None)` when the shape or ring does not exist.
    pub fn edit_path(
        &mut self,
        id: ShapeId,
        ring: usize,
        edit: PathEdit,
    ) -> Result<Option<PathChange>, PathError> {
        let Some(shape) = self.get_mut(id) else {
            return Ok(None);
        };
        let change = shape.edit_path(ring, edit)?;
        if let Some(change) = change {
            self.emit(StoreEvent::PathChanged { id, ring, change });
            self.emit(StoreEvent::ShapeEdited(id));
            self.emit(StoreEvent::ContentChanged);
        }
        Ok(change)
    }

    /// Drain the queued events.
    pub fn take_events(&mut self) -> Vec<StoreEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: StoreEvent) {
        self.events.push(event);
    }
}
