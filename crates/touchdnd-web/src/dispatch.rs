//! Deterministic dispatch records returned for every handled event.

use touchdnd_core::{ClientOffset, GestureKind};

/// Lifecycle phase recorded for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureLifecyclePhase {
    Start,
    Move,
    End,
    Cancel,
    ChildListMutation,
}

impl From<GestureKind> for GestureLifecyclePhase {
    fn from(kind: GestureKind) -> Self {
        match kind {
            GestureKind::Start => Self::Start,
            GestureKind::Move => Self::Move,
            GestureKind::End => Self::End,
            GestureKind::Cancel => Self::Cancel,
        }
    }
}

/// Why an incoming signal produced no host action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureIgnoredReason {
    /// Window listeners are not attached.
    NotSetUp,
    /// Event family (or kind) has no listener in the selected input mode.
    NotListening,
    /// Event carried no coordinates, e.g. zero active touches.
    NoClientOffset,
    /// No gesture start was seen since the last drop.
    NoBaseline,
    /// The gesture did not start on a drag source.
    NoCandidates,
    /// Pointer is still at the baseline.
    NoMovement,
    /// The host was asked to begin a drag and did not.
    DragDeclined,
    NotDragging,
    /// Another contact remains on the surface.
    StillTouching,
    AlreadyDropped,
    /// No dragged node is being watched.
    NoRemovalWatch,
    /// The watched node still has a parent.
    SourceStillAttached,
}

/// Outcome category for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    /// Gesture start handled; `count` sources are candidates.
    CandidatesRecorded { count: usize },
    /// Hover dispatched, optionally right after beginning the drag.
    Hovered { began_drag: bool, target_count: usize },
    /// Drop and end-drag dispatched.
    Dropped,
    /// The dragged node was reinserted into the document body.
    SourceResurrected,
    Ignored(GestureIgnoredReason),
}

/// Structured log record for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureLogEntry {
    pub phase: GestureLifecyclePhase,
    pub sequence: u64,
    pub client_offset: Option<ClientOffset>,
    pub outcome: GestureOutcome,
}

/// Result of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureDispatch {
    /// The platform must suppress the event's default action.
    pub default_prevented: bool,
    pub log: GestureLogEntry,
}

impl GestureDispatch {
    pub(crate) fn handled(
        phase: GestureLifecyclePhase,
        sequence: u64,
        client_offset: Option<ClientOffset>,
        outcome: GestureOutcome,
        default_prevented: bool,
    ) -> Self {
        Self {
            default_prevented,
            log: GestureLogEntry {
                phase,
                sequence,
                client_offset,
                outcome,
            },
        }
    }

    pub(crate) fn ignored(
        phase: GestureLifecyclePhase,
        sequence: u64,
        client_offset: Option<ClientOffset>,
        reason: GestureIgnoredReason,
    ) -> Self {
        Self::handled(
            phase,
            sequence,
            client_offset,
            GestureOutcome::Ignored(reason),
            false,
        )
    }

    /// Reason the dispatch was ignored, if it was.
    #[must_use]
    pub const fn ignored_reason(&self) -> Option<GestureIgnoredReason> {
        match self.log.outcome {
            GestureOutcome::Ignored(reason) => Some(reason),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignored_dispatch_never_prevents_default() {
        let dispatch = GestureDispatch::ignored(
            GestureLifecyclePhase::Move,
            4,
            None,
            GestureIgnoredReason::NoMovement,
        );
        assert!(!dispatch.default_prevented);
        assert_eq!(dispatch.log.sequence, 4);
        assert_eq!(
            dispatch.ignored_reason(),
            Some(GestureIgnoredReason::NoMovement)
        );
    }

    #[test]
    fn phase_from_gesture_kind() {
        assert_eq!(
            GestureLifecyclePhase::from(GestureKind::Cancel),
            GestureLifecyclePhase::Cancel
        );
        assert_eq!(
            GestureLifecyclePhase::from(GestureKind::Start),
            GestureLifecyclePhase::Start
        );
    }
}
