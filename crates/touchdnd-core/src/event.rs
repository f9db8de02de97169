#![forbid(unsafe_code)]

//! Normalized input events.
//!
//! Two event families reach the backend: multi-touch events (a list of active
//! touches plus the touches that changed) and legacy single-pointer events (one
//! coordinate). [`InputEvent`] carries either, together with the lifecycle kind
//! and the node the platform reported as the event target.

use smallvec::SmallVec;

use crate::geometry::ClientOffset;

/// Which event family the platform delivers.
///
/// Chosen once, at backend construction, from platform capability detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum InputMode {
    /// `touchstart` / `touchmove` / `touchend` / `touchcancel`.
    #[default]
    Touch,
    /// `MSPointerDown` / `MSPointerMove` / `MSPointerUp`.
    LegacyPointer,
}

impl InputMode {
    /// Platform event type name for a lifecycle kind.
    ///
    /// Returns `None` for `Cancel` in legacy pointer mode, which has no
    /// cancel event.
    #[must_use]
    pub const fn event_type(self, kind: GestureKind) -> Option<&'static str> {
        match (self, kind) {
            (Self::Touch, GestureKind::Start) => Some("touchstart"),
            (Self::Touch, GestureKind::Move) => Some("touchmove"),
            (Self::Touch, GestureKind::End) => Some("touchend"),
            (Self::Touch, GestureKind::Cancel) => Some("touchcancel"),
            (Self::LegacyPointer, GestureKind::Start) => Some("MSPointerDown"),
            (Self::LegacyPointer, GestureKind::Move) => Some("MSPointerMove"),
            (Self::LegacyPointer, GestureKind::End) => Some("MSPointerUp"),
            (Self::LegacyPointer, GestureKind::Cancel) => None,
        }
    }

    /// Event type that drag sources listen to for gesture starts.
    #[must_use]
    pub const fn start_event_type(self) -> &'static str {
        match self {
            Self::Touch => "touchstart",
            Self::LegacyPointer => "MSPointerDown",
        }
    }
}

/// Lifecycle position of an input event within a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureKind {
    Start,
    Move,
    End,
    Cancel,
}

impl GestureKind {
    /// True for the kinds that can finish a gesture.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::End | Self::Cancel)
    }
}

/// One contact point of a touch event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    /// Platform-assigned identifier, stable for the lifetime of the contact.
    pub identifier: i64,
    pub client_x: f64,
    pub client_y: f64,
}

impl TouchPoint {
    #[must_use]
    pub const fn new(identifier: i64, client_x: f64, client_y: f64) -> Self {
        Self {
            identifier,
            client_x,
            client_y,
        }
    }

    #[must_use]
    pub const fn client_offset(&self) -> ClientOffset {
        ClientOffset::new(self.client_x, self.client_y)
    }
}

/// Touch payload: the active contacts and the contacts this event is about.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TouchInput {
    /// Contacts currently on the surface.
    ///
    /// Some engines still list contacts that just ended here; others do not.
    pub touches: SmallVec<[TouchPoint; 4]>,
    /// Contacts that started, moved, or ended with this event.
    pub changed_touches: SmallVec<[TouchPoint; 4]>,
}

impl TouchInput {
    #[must_use]
    pub fn new(
        touches: impl IntoIterator<Item = TouchPoint>,
        changed_touches: impl IntoIterator<Item = TouchPoint>,
    ) -> Self {
        Self {
            touches: touches.into_iter().collect(),
            changed_touches: changed_touches.into_iter().collect(),
        }
    }
}

/// Single-pointer payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub pointer_id: i64,
    pub client_x: f64,
    pub client_y: f64,
}

impl PointerInput {
    #[must_use]
    pub const fn new(pointer_id: i64, client_x: f64, client_y: f64) -> Self {
        Self {
            pointer_id,
            client_x,
            client_y,
        }
    }
}

/// Event-family specific payload.
#[derive(Debug, Clone, PartialEq)]
pub enum InputPayload {
    Touch(TouchInput),
    Pointer(PointerInput),
}

/// A normalized input event as delivered by the platform.
///
/// `N` is the platform's node handle type.
#[derive(Debug, Clone, PartialEq)]
pub struct InputEvent<N> {
    pub kind: GestureKind,
    /// Node the platform dispatched the event to, if known.
    pub target: Option<N>,
    pub payload: InputPayload,
}

impl<N> InputEvent<N> {
    /// Build a touch event.
    #[must_use]
    pub fn touch(kind: GestureKind, target: Option<N>, input: TouchInput) -> Self {
        Self {
            kind,
            target,
            payload: InputPayload::Touch(input),
        }
    }

    /// Build a single-pointer event.
    #[must_use]
    pub fn pointer(kind: GestureKind, target: Option<N>, input: PointerInput) -> Self {
        Self {
            kind,
            target,
            payload: InputPayload::Pointer(input),
        }
    }

    /// Event family this payload belongs to.
    #[must_use]
    pub const fn mode(&self) -> InputMode {
        match self.payload {
            InputPayload::Touch(_) => InputMode::Touch,
            InputPayload::Pointer(_) => InputMode::LegacyPointer,
        }
    }
}
