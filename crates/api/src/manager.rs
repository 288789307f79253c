//! The drawing manager handle.
//!
//! Owns the shape store and wires map events to it: each change to the
//! persisted content is encoded and handed to the save handler, and each
//! selection change is mirrored on the map.

use crate::{Console, DrawOptions, DrawingControls, MapEvent, MapSurface, ModeChangedCallback};
use interchange::{CodecError, CodecOptions};
use shape::{Geometry, PathEdit, ShapeId, ShapeKind, ShapeRecord};
use storage::{LoadHandler, SaveHandler};
use store::{ShapeStore, StoreEvent};

/// Name printed for a drawing mode; `null` is the hand tool.
pub fn mode_name(mode: Option<ShapeKind>) -> &'static str {
    match mode {
        Some(kind) => match kind {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Circle => "circle",
            ShapeKind::Polygon => "polygon",
            ShapeKind::Polyline => "polyline",
            ShapeKind::Marker => "marker",
        },
        None => "null",
    }
}

/// Interactive drawing layer on top of a map.
pub struct DrawManager<M: MapSurface> {
    map: M,
    store: ShapeStore,
    controls: DrawingControls,
    enabled: bool,
    mode: Option<ShapeKind>,
    on_mode_changed: Option<ModeChangedCallback>,
    codec: CodecOptions,
    save_handler: SaveHandler,
    load_handler: LoadHandler,
    console: Console,
}

impl<M: MapSurface> DrawManager<M> {
    /// Attach a drawing manager to `map` and load any stored shapes.
    pub fn new(
        map: M,
        options: DrawOptions,
        save_handler: SaveHandler,
        load_handler: LoadHandler,
        console: Console,
    ) -> Self {
        let controls = DrawingControls {
            position: options.position,
            drawing_modes: options.drawing_modes,
        };

        let mut manager = Self {
            map,
            store: ShapeStore::new(),
            controls,
            enabled: true,
            mode: None,
            on_mode_changed: options.on_mode_changed,
            codec: options.codec,
            save_handler,
            load_handler,
            console,
        };

        manager.map.show_drawing_controls(&manager.controls);
        manager.map.set_drawing_mode(None);
        manager.print_mode();
        manager.print_selection();

        manager.load_shapes();

        if !options.enabled {
            manager.disable();
        }

        manager
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    pub fn store(&self) -> &ShapeStore {
        &self.store
    }

    pub fn controls(&self) -> &DrawingControls {
        &self.controls
    }

    pub fn codec_options(&self) -> CodecOptions {
        self.codec
    }

    pub fn selection(&self) -> Option<ShapeId> {
        self.store.selection()
    }

    /// Register the callback invoked when the drawing mode changes.
    pub fn on_mode_changed(&mut self, f: impl FnMut(Option<ShapeKind>) + 'static) {
        self.on_mode_changed = Some(Box::new(f));
    }

    // === Public operations ===

    /// Delete every shape.
    pub fn clear(&mut self) {
        self.console.print("clear requested");

        self.set_selection(None);
        let ids: Vec<ShapeId> = self.store.iter().map(|s| s.id()).collect();
        for id in ids {
            self.map.hide_overlay(id);
        }
        let removed = self.store.clear();
        self.console.print(&format!("{} shapes deleted", removed));
        self.flush_events();
    }

    /// Delete the selected shape, if any.
    pub fn delete(&mut self) {
        self.console.print("delete requested");

        if let Some(id) = self.store.selection() {
            self.set_selection(None);
            self.store.remove(id);
            self.map.hide_overlay(id);
            self.flush_events();
        }
    }

    /// Detach the drawing toolbar. Shapes stay on the map but can no longer
    /// be edited.
    pub fn disable(&mut self) {
        self.map.hide_drawing_controls();
        self.enabled = false;
        self.set_selection(None);
        self.flush_events();
        self.map.set_drawing_mode(None);
        self.drawing_mode_changed(None);
    }

    pub fn enable(&mut self) {
        if !self.enabled {
            self.map.show_drawing_controls(&self.controls);
            self.enabled = true;
            if let Some(id) = self.store.selection() {
                self.store.set_selection_editable(true);
                self.map.set_overlay_editable(id, true);
            }
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// The current drawing mode. `None` is the hand tool.
    pub fn mode(&self) -> Option<ShapeKind> {
        self.mode
    }

    /// Switch the drawing tool, as if picked from the toolbar.
    ///
    /// Modes the toolbar does not offer are refused.
    pub fn set_mode(&mut self, mode: Option<ShapeKind>) -> bool {
        if !self.enabled {
            log::warn!("Drawing is disabled, ignoring mode {}", mode_name(mode));
            return false;
        }
        if let Some(kind) = mode {
            if !self.controls.drawing_modes.contains(&kind) {
                log::warn!("Drawing mode {} is not offered by the toolbar", kind);
                return false;
            }
        }
        self.map.set_drawing_mode(mode);
        self.drawing_mode_changed(mode);
        true
    }

    /// The persisted form of the current shapes.
    pub fn json(&self) -> Result<String, CodecError> {
        interchange::encode(self.store.shapes(), self.codec)
    }

    /// Encode the shapes and hand them to the save handler.
    pub fn save(&mut self) {
        match self.json() {
            Ok(json) => {
                self.save_handler.save(&json);
            }
            Err(e) => log::error!("Failed to encode shapes: {}", e),
        }
    }

    /// Replace the current shapes with the stored ones.
    pub fn load(&mut self) {
        self.set_selection(None);
        let ids: Vec<ShapeId> = self.store.iter().map(|s| s.id()).collect();
        for id in ids {
            self.map.hide_overlay(id);
        }
        self.store.clear();
        self.store.take_events();
        self.load_shapes();
    }

    // === Map events ===

    pub fn handle_event(&mut self, event: MapEvent) {
        match event {
            MapEvent::OverlayComplete { shape } => {
                self.shape_drawn(shape);
            }
            MapEvent::ShapeEdited { id, geometry } => {
                self.shape_edited(id, geometry);
            }
            MapEvent::PathEdited { id, ring, edit } => {
                self.path_edited(id, ring, edit);
            }
            MapEvent::ShapeClicked { id } => self.shape_clicked(id),
            MapEvent::MapClicked => self.map_clicked(),
            MapEvent::DrawingModeChanged { mode } => self.drawing_mode_changed(mode),
        }
    }

    /// A new overlay was drawn. It is stored, saved and selected.
    pub fn shape_drawn(&mut self, record: ShapeRecord) -> ShapeId {
        let kind = record.kind();
        let id = self.store.add(record);
        self.set_selection(Some(id));
        self.flush_events();
        self.console
            .print(&format!("new {} created (id = {})", mode_name(Some(kind)), id));
        id
    }

    pub fn shape_edited(&mut self, id: ShapeId, geometry: Geometry) -> bool {
        if !self.store.edit_geometry(id, geometry) {
            log::debug!("{}: edit ignored", id);
            return false;
        }
        self.console.print(&format!("{}: shape edited", id));
        self.flush_events();
        true
    }

    pub fn path_edited(&mut self, id: ShapeId, ring: usize, edit: PathEdit) -> bool {
        match self.store.edit_path(id, ring, edit) {
            Ok(Some(_)) => {
                self.console.print(&format!("{}: shape edited", id));
                self.flush_events();
                true
            }
            Ok(None) => {
                log::debug!("{}: no path {} to edit", id, ring);
                false
            }
            Err(e) => {
                log::warn!("{}: {}", id, e);
                false
            }
        }
    }

    pub fn set_color(&mut self, id: ShapeId, color: impl Into<String>) -> bool {
        if !self.store.set_color(id, color) {
            return false;
        }
        self.console.print(&format!("{}: shape edited", id));
        self.flush_events();
        true
    }

    pub fn shape_clicked(&mut self, id: ShapeId) {
        self.console.print(&format!("{}: shape clicked", id));
        self.set_selection(Some(id));
        self.flush_events();
    }

    pub fn map_clicked(&mut self) {
        self.console.print("map clicked");
        self.set_selection(None);
        self.flush_events();
    }

    /// The drawing mode changed, either from the toolbar or through
    /// [`Self::set_mode`]. A repeat of the current mode, such as the widget
    /// echoing a mode the manager just set, only clears the selection.
    pub fn drawing_mode_changed(&mut self, mode: Option<ShapeKind>) {
        if mode != self.mode {
            self.mode = mode;
            if let Some(f) = self.on_mode_changed.as_mut() {
                f(mode);
            }
            self.print_mode();
        }
        self.set_selection(None);
        self.flush_events();
    }

    // === Internals ===

    /// Move the selection and mirror it on the map.
    fn set_selection(&mut self, id: Option<ShapeId>) {
        let previous = self.store.selection();
        if self.store.set_selection(id, self.enabled) {
            if let Some(previous) = previous {
                self.map.set_overlay_editable(previous, false);
            }
            if let Some(id) = self.store.selection() {
                self.map.set_overlay_editable(id, self.enabled);
            }
        }
    }

    /// Report queued store events and save once if content changed.
    fn flush_events(&mut self) {
        let mut dirty = false;
        for event in self.store.take_events() {
            match event {
                StoreEvent::SelectionChanged(_) => self.print_selection(),
                StoreEvent::ContentChanged => dirty = true,
                other => log::trace!("{:?}", other),
            }
        }
        if dirty {
            self.save();
        }
    }

    /// Append the stored shapes to the store without saving.
    fn load_shapes(&mut self) {
        let start = self.store.len();

        match self.load_handler.load() {
            Ok(Some(json)) => match interchange::decode(&json) {
                Ok(records) => {
                    for record in records {
                        let id = self.store.add(record);
                        if let Some(shape) = self.store.get(id) {
                            self.map.show_overlay(shape);
                        }
                    }
                }
                Err(e) => log::error!("Failed to read stored shapes: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::error!("Failed to load shapes: {}", e),
        }

        self.store.take_events();
        let loaded = self.store.len() - start;
        self.console.print(&format!("{} shapes loaded", loaded));
    }

    fn print_mode(&mut self) {
        let line = format!("drawing mode set to {}", mode_name(self.mode));
        self.console.print(&line);
    }

    fn print_selection(&mut self) {
        let line = match self.store.selection() {
            Some(id) => format!("{}: selected", id),
            None => "selection cleared".to_string(),
        };
        self.console.print(&line);
    }
}
