#![forbid(unsafe_code)]

//! Recording host manager.
//!
//! Implements the host action and monitor traits with the minimal drag state a
//! real manager keeps, and records every call in order.

use std::collections::BTreeSet;

use touchdnd_core::host::{BeginDragOptions, DragDropActions, DragDropMonitor, HoverOptions};
use touchdnd_core::{ClientOffset, SourceId, TargetId};

/// One call the backend made into the manager.
#[derive(Debug, Clone, PartialEq)]
pub enum ManagerCall {
    BeginDrag {
        source_ids: Vec<SourceId>,
        client_offset: Option<ClientOffset>,
        /// Offset the accessor reported for the source that began dragging.
        source_client_offset: Option<ClientOffset>,
        publish_source: bool,
    },
    PublishDragSource,
    Hover {
        target_ids: Vec<TargetId>,
        client_offset: ClientOffset,
    },
    Drop,
    EndDrag,
}

/// Host manager double.
///
/// `begin_drag` picks the first candidate (innermost) that has not been
/// marked undraggable.
#[derive(Debug, Clone, Default)]
pub struct RecordingManager {
    calls: Vec<ManagerCall>,
    dragging: Option<SourceId>,
    source_published: bool,
    did_drop: bool,
    undraggable: BTreeSet<SourceId>,
}

impl RecordingManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse to drag `source_id`, as a source whose `canDrag` is false.
    #[must_use]
    pub fn with_undraggable(mut self, source_id: impl Into<SourceId>) -> Self {
        self.undraggable.insert(source_id.into());
        self
    }

    /// Put the manager into a drag that some other input started.
    pub fn start_external_drag(&mut self, source_id: impl Into<SourceId>) {
        self.dragging = Some(source_id.into());
        self.did_drop = false;
    }

    #[must_use]
    pub fn calls(&self) -> &[ManagerCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<ManagerCall> {
        std::mem::take(&mut self.calls)
    }

    #[must_use]
    pub const fn is_source_published(&self) -> bool {
        self.source_published
    }

    /// Every `begin_drag` call's candidate list.
    #[must_use]
    pub fn begin_drag_candidates(&self) -> Vec<Vec<SourceId>> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                ManagerCall::BeginDrag { source_ids, .. } => Some(source_ids.clone()),
                _ => None,
            })
            .collect()
    }

    /// Every `hover` call's target list.
    #[must_use]
    pub fn hovered_targets(&self) -> Vec<Vec<TargetId>> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                ManagerCall::Hover { target_ids, .. } => Some(target_ids.clone()),
                _ => None,
            })
            .collect()
    }
}

impl DragDropActions for RecordingManager {
    fn begin_drag(&mut self, source_ids: &[SourceId], options: BeginDragOptions<'_>) {
        let chosen = source_ids
            .iter()
            .find(|source_id| !self.undraggable.contains(*source_id))
            .cloned();
        let source_client_offset = chosen
            .as_ref()
            .and_then(|source_id| options.source_client_offset.source_client_offset(source_id));
        tracing::debug!(?chosen, ?source_client_offset, "recording manager: begin drag");
        self.calls.push(ManagerCall::BeginDrag {
            source_ids: source_ids.to_vec(),
            client_offset: options.client_offset,
            source_client_offset,
            publish_source: options.publish_source,
        });
        if chosen.is_some() {
            self.dragging = chosen;
            self.did_drop = false;
            self.source_published = options.publish_source;
        }
    }

    fn publish_drag_source(&mut self) {
        self.calls.push(ManagerCall::PublishDragSource);
        if self.dragging.is_some() {
            self.source_published = true;
        }
    }

    fn hover(&mut self, target_ids: &[TargetId], options: HoverOptions) {
        self.calls.push(ManagerCall::Hover {
            target_ids: target_ids.to_vec(),
            client_offset: options.client_offset,
        });
    }

    fn perform_drop(&mut self) {
        self.calls.push(ManagerCall::Drop);
        self.did_drop = true;
    }

    fn end_drag(&mut self) {
        self.calls.push(ManagerCall::EndDrag);
        self.dragging = None;
        self.did_drop = false;
        self.source_published = false;
    }
}

impl DragDropMonitor for RecordingManager {
    fn is_dragging(&self) -> bool {
        self.dragging.is_some()
    }

    fn did_drop(&self) -> bool {
        self.did_drop
    }

    fn source_id(&self) -> Option<SourceId> {
        self.dragging.clone()
    }
}
