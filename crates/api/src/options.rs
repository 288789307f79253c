//! Drawing manager configuration.

use interchange::CodecOptions;
use serde::{Deserialize, Serialize};
use shape::ShapeKind;
use strum_macros::Display;

/// Where the map widget places the drawing toolbar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlPosition {
    TopLeft,
    #[default]
    TopCenter,
    TopRight,
    LeftTop,
    LeftCenter,
    LeftBottom,
    RightTop,
    RightCenter,
    RightBottom,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

/// Called with the new drawing mode whenever the user switches tools.
pub type ModeChangedCallback = Box<dyn FnMut(Option<ShapeKind>)>;

/// Options accepted by [`crate::DrawManager::new`].
///
/// Everything except the callback can be read from JSON; missing keys take
/// their defaults.
#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct DrawOptions {
    pub position: ControlPosition,
    pub drawing_modes: Vec<ShapeKind>,
    /// Start with the drawing toolbar attached.
    pub enabled: bool,
    pub codec: CodecOptions,
    #[serde(skip)]
    pub on_mode_changed: Option<ModeChangedCallback>,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            position: ControlPosition::default(),
            drawing_modes: ShapeKind::DEFAULT_DRAWING_MODES.to_vec(),
            enabled: true,
            codec: CodecOptions::default(),
            on_mode_changed: None,
        }
    }
}

impl DrawOptions {
    pub fn with_position(mut self, position: ControlPosition) -> Self {
        self.position = position;
        self
    }

    pub fn with_drawing_modes(mut self, modes: impl IntoIterator<Item = ShapeKind>) -> Self {
        self.drawing_modes = modes.into_iter().collect();
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_codec(mut self, codec: CodecOptions) -> Self {
        self.codec = codec;
        self
    }

    pub fn on_mode_changed(mut self, f: impl FnMut(Option<ShapeKind>) + 'static) -> Self {
        self.on_mode_changed = Some(Box::new(f));
        self
    }
}

impl std::fmt::Debug for DrawOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawOptions")
            .field("position", &self.position)
            .field("drawing_modes", &self.drawing_modes)
            .field("enabled", &self.enabled)
            .field("codec", &self.codec)
            .field("on_mode_changed", &self.on_mode_changed.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interchange::NumberFormat;

    #[test]
    fn test_defaults() {
        let options = DrawOptions::default();
        assert_eq!(options.position, ControlPosition::TopCenter);
        assert_eq!(
            options.drawing_modes,
            vec![
                ShapeKind::Rectangle,
                ShapeKind::Circle,
                ShapeKind::Polygon,
                ShapeKind::Polyline
            ]
        );
        assert!(options.enabled);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let options: DrawOptions = serde_json::from_str(
            r#"{"position":"BOTTOM_LEFT","enabled":false,"codec":{"number_format":"numeric"}}"#,
        )
        .unwrap();
        assert_eq!(options.position, ControlPosition::BottomLeft);
        assert!(!options.enabled);
        assert_eq!(options.drawing_modes.len(), 4);
        assert_eq!(options.codec.number_format, NumberFormat::Numeric);
    }

    #[test]
    fn test_drawing_modes_from_json() {
        let options: DrawOptions =
            serde_json::from_str(r#"{"drawing_modes":["marker","polyline"]}"#).unwrap();
        assert_eq!(options.drawing_modes, vec![ShapeKind::Marker, ShapeKind::Polyline]);
    }

    #[test]
    fn test_position_display() {
        assert_eq!(ControlPosition::RightCenter.to_string(), "RIGHT_CENTER");
    }
}
