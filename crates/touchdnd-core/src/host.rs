#![forbid(unsafe_code)]

//! Host drag-and-drop manager boundary.
//!
//! The touch backend does not store drag state. It tells a host manager what
//! happened through [`DragDropActions`] and asks it what is going on through
//! [`DragDropMonitor`]. A manager implementing both is a [`DragDropManager`].

use crate::geometry::ClientOffset;
use crate::handler_id::{SourceId, TargetId};

/// Resolves the viewport offset of a registered drag source's node.
///
/// Handed to [`DragDropActions::begin_drag`] so the manager can compute the
/// initial source position while the drag begins.
pub trait SourceClientOffset {
    /// Top-left of the source's node, or `None` when the source is not
    /// registered or its node is detached.
    fn source_client_offset(&self, source_id: &SourceId) -> Option<ClientOffset>;
}

impl<F> SourceClientOffset for F
where
    F: Fn(&SourceId) -> Option<ClientOffset>,
{
    fn source_client_offset(&self, source_id: &SourceId) -> Option<ClientOffset> {
        self(source_id)
    }
}

/// Arguments of [`DragDropActions::begin_drag`].
#[derive(Clone, Copy)]
pub struct BeginDragOptions<'a> {
    /// Pointer position recorded when the gesture started.
    pub client_offset: Option<ClientOffset>,
    /// Accessor for the candidate sources' node positions.
    pub source_client_offset: &'a dyn SourceClientOffset,
    /// Whether the manager should publish the drag source immediately.
    pub publish_source: bool,
}

impl std::fmt::Debug for BeginDragOptions<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeginDragOptions")
            .field("client_offset", &self.client_offset)
            .field("publish_source", &self.publish_source)
            .finish_non_exhaustive()
    }
}

/// Arguments of [`DragDropActions::hover`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverOptions {
    /// Current pointer position.
    pub client_offset: ClientOffset,
}

/// Actions the backend dispatches into the host manager.
pub trait DragDropActions {
    /// Start a drag from one of `source_ids`.
    ///
    /// Candidates are ordered innermost first: index 0 is the most specific
    /// source under the touch point. The manager picks which candidate (if
    /// any) actually drags.
    ///
    /// Managers that expect the innermost source last and scan from the end
    /// (react-dnd's `beginDrag` does) must scan from the front instead.
    fn begin_drag(&mut self, source_ids: &[SourceId], options: BeginDragOptions<'_>);

    /// Make the current drag source visible to the rest of the application.
    fn publish_drag_source(&mut self);

    /// Report the drop targets currently under the pointer.
    fn hover(&mut self, target_ids: &[TargetId], options: HoverOptions);

    /// Resolve the drop on the currently hovered targets.
    fn perform_drop(&mut self);

    /// Finish the drag.
    fn end_drag(&mut self);
}

/// Read-only view of the host manager's drag state.
pub trait DragDropMonitor {
    fn is_dragging(&self) -> bool;

    /// True once a drop has been resolved for the current drag.
    fn did_drop(&self) -> bool;

    /// Source of the current drag, if any.
    fn source_id(&self) -> Option<SourceId>;
}

/// A host manager: actions plus monitor.
pub trait DragDropManager: DragDropActions + DragDropMonitor {}

impl<T> DragDropManager for T where T: DragDropActions + DragDropMonitor {}
