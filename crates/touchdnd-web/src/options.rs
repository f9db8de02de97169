//! Backend and preview configuration.

use touchdnd_core::InputMode;

/// Attribute React stamps on server-rendered nodes; a resurrected node must
/// not carry it or reconciliation will try to reuse it.
pub const REACT_ID_ATTRIBUTE: &str = "data-reactid";

/// Touch backend configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TouchBackendOptions {
    /// Event family override. `None` uses the platform's capability detection.
    pub input_mode: Option<InputMode>,
    /// Keep the dragged node alive when it is removed mid-drag.
    pub watch_source_removal: bool,
    /// Bookkeeping attributes stripped from a resurrected node.
    pub stripped_attributes: Vec<String>,
}

impl Default for TouchBackendOptions {
    fn default() -> Self {
        Self {
            input_mode: None,
            watch_source_removal: true,
            stripped_attributes: vec![REACT_ID_ATTRIBUTE.to_owned()],
        }
    }
}

impl TouchBackendOptions {
    /// Force an event family regardless of capability detection.
    #[must_use]
    pub fn with_input_mode(mut self, mode: InputMode) -> Self {
        self.input_mode = Some(mode);
        self
    }
}

/// Rendering options registered alongside a drag preview node.
///
/// The backend only stores these; the host manager's preview layer reads them.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct DragPreviewOptions {
    /// Horizontal anchor within the preview, `0.0` (left) to `1.0` (right).
    pub anchor_x: f64,
    /// Vertical anchor within the preview, `0.0` (top) to `1.0` (bottom).
    pub anchor_y: f64,
    /// Fixed horizontal offset overriding the anchor, in pixels.
    pub offset_x: Option<f64>,
    /// Fixed vertical offset overriding the anchor, in pixels.
    pub offset_y: Option<f64>,
    /// Snapshot the source while it renders in its dragging state.
    pub capture_dragging_state: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_watch_removal_and_strip_react_id() {
        let options = TouchBackendOptions::default();
        assert_eq!(options.input_mode, None);
        assert!(options.watch_source_removal);
        assert_eq!(options.stripped_attributes, vec!["data-reactid".to_owned()]);
    }

    #[test]
    fn input_mode_override() {
        let options = TouchBackendOptions::default().with_input_mode(InputMode::LegacyPointer);
        assert_eq!(options.input_mode, Some(InputMode::LegacyPointer));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn options_deserialize_with_defaults() {
        let options: TouchBackendOptions =
            serde_json::from_str(r#"{"input_mode":"legacy_pointer"}"#).expect("valid options");
        assert_eq!(options.input_mode, Some(InputMode::LegacyPointer));
        assert!(options.watch_source_removal);

        let preview: DragPreviewOptions =
            serde_json::from_str(r#"{"anchorX":0.5,"captureDraggingState":true}"#)
                .expect("valid preview options");
        assert_eq!(preview.anchor_x, 0.5);
        assert!(preview.capture_dragging_state);
        assert_eq!(preview.offset_x, None);
    }
}
