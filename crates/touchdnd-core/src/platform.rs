#![forbid(unsafe_code)]

//! Platform boundary: what the backend needs from the hosting document.
//!
//! Browsers implement this over the DOM (`window`, `Element`,
//! `MutationObserver`); tests implement it over an in-memory tree. The backend
//! never touches a platform API directly.

use crate::event::InputMode;
use crate::geometry::ClientRect;
use crate::handler_id::SourceId;

/// Backend callback a window listener is wired to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowHandler {
    /// Gesture start, capture phase: resets move-start candidates.
    MoveStartCapture,
    /// Gesture start, bubble phase: records the baseline offset.
    MoveStart,
    /// Gesture move, capture phase: begin-drag check and hover.
    MoveCapture,
    /// Gesture end or cancel, capture phase: drop and end-drag.
    MoveEndCapture,
}

/// One window-level listener registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowListener {
    pub event_type: &'static str,
    pub capture: bool,
    pub handler: WindowHandler,
}

impl WindowListener {
    const fn new(event_type: &'static str, capture: bool, handler: WindowHandler) -> Self {
        Self {
            event_type,
            capture,
            handler,
        }
    }
}

const TOUCH_LISTENERS: [WindowListener; 5] = [
    WindowListener::new("touchstart", true, WindowHandler::MoveStartCapture),
    WindowListener::new("touchstart", false, WindowHandler::MoveStart),
    WindowListener::new("touchmove", true, WindowHandler::MoveCapture),
    WindowListener::new("touchend", true, WindowHandler::MoveEndCapture),
    WindowListener::new("touchcancel", true, WindowHandler::MoveEndCapture),
];

const LEGACY_POINTER_LISTENERS: [WindowListener; 4] = [
    WindowListener::new("MSPointerDown", true, WindowHandler::MoveStartCapture),
    WindowListener::new("MSPointerDown", false, WindowHandler::MoveStart),
    WindowListener::new("MSPointerMove", true, WindowHandler::MoveCapture),
    WindowListener::new("MSPointerUp", true, WindowHandler::MoveEndCapture),
];

impl InputMode {
    /// Window listeners the backend attaches on setup, in attachment order.
    #[must_use]
    pub fn window_listeners(self) -> &'static [WindowListener] {
        match self {
            Self::Touch => &TOUCH_LISTENERS,
            Self::LegacyPointer => &LEGACY_POINTER_LISTENERS,
        }
    }
}

/// Document and window queries the backend relies on.
pub trait Document {
    /// Node handle. Cheap to clone; equality is node identity.
    type Node: Clone + PartialEq + std::fmt::Debug;

    /// False when running outside a browsing context (e.g. server rendering).
    fn has_window(&self) -> bool;

    /// Event family the platform delivers.
    fn input_mode(&self) -> InputMode;

    fn add_window_listener(&mut self, listener: WindowListener);

    fn remove_window_listener(&mut self, listener: WindowListener);

    /// Attach the gesture-start listener of a drag source to its node.
    fn add_source_listener(&mut self, node: &Self::Node, source_id: &SourceId, event_type: &'static str);

    fn remove_source_listener(
        &mut self,
        node: &Self::Node,
        source_id: &SourceId,
        event_type: &'static str,
    );

    fn is_element(&self, node: &Self::Node) -> bool;

    /// Parent element of `node`, or `None` for detached nodes and the root.
    fn parent_element(&self, node: &Self::Node) -> Option<Self::Node>;

    /// True while `node` is part of the document.
    fn is_connected(&self, node: &Self::Node) -> bool;

    /// Viewport bounding box of an element, or `None` if it has none.
    fn bounding_client_rect(&self, node: &Self::Node) -> Option<ClientRect>;

    /// Stop rendering `node` without removing it.
    fn hide(&mut self, node: &Self::Node);

    fn remove_attribute(&mut self, node: &Self::Node, name: &str);

    /// Append `node` as the last child of the document body.
    fn append_to_body(&mut self, node: &Self::Node);
}

/// Child-list change notifications.
///
/// The platform reports observed changes back to the backend by calling its
/// child-list mutation handler; the observation handle only scopes teardown.
pub trait MutationSource: Document {
    /// Live observation handle.
    type Observer;

    /// Start watching `parent` for child additions and removals.
    fn observe_child_list(&mut self, parent: &Self::Node) -> Self::Observer;

    fn disconnect(&mut self, observer: Self::Observer);
}
