//! Pointer coordinate extraction for the two supported event families.

use touchdnd_core::{ClientOffset, InputEvent, InputMode, InputPayload};

/// Coordinate strategy, fixed at backend construction.
///
/// Events from the other family than the selected strategy produce no offset
/// and never count as still touching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateSource {
    /// Averages every active touch.
    MultiTouch,
    /// Reads the single pointer's position.
    SinglePointer,
}

impl CoordinateSource {
    #[must_use]
    pub const fn for_mode(mode: InputMode) -> Self {
        match mode {
            InputMode::Touch => Self::MultiTouch,
            InputMode::LegacyPointer => Self::SinglePointer,
        }
    }

    #[must_use]
    pub const fn mode(self) -> InputMode {
        match self {
            Self::MultiTouch => InputMode::Touch,
            Self::SinglePointer => InputMode::LegacyPointer,
        }
    }

    /// Pointer position of `event`, or `None` when it carries no coordinates.
    #[must_use]
    pub fn client_offset<N>(self, event: &InputEvent<N>) -> Option<ClientOffset> {
        match (self, &event.payload) {
            (Self::MultiTouch, InputPayload::Touch(touch)) => {
                ClientOffset::mean(touch.touches.iter().map(|point| point.client_offset()))
            }
            (Self::SinglePointer, InputPayload::Pointer(pointer)) => {
                Some(ClientOffset::new(pointer.client_x, pointer.client_y))
            }
            _ => None,
        }
    }

    /// True when some contact stays down after this event.
    ///
    /// A contact is still down if it is listed as active and is not one of the
    /// contacts this event reports as changed. Engines differ on whether an
    /// ended contact is still listed as active; comparing identifiers handles
    /// both. Single pointers have no second contact.
    #[must_use]
    pub fn is_still_touching<N>(self, event: &InputEvent<N>) -> bool {
        match (self, &event.payload) {
            (Self::MultiTouch, InputPayload::Touch(touch)) => touch.touches.iter().any(|active| {
                !touch
                    .changed_touches
                    .iter()
                    .any(|changed| changed.identifier == active.identifier)
            }),
            _ => false,
        }
    }
}
