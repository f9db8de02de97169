#![forbid(unsafe_code)]

//! Touch backend: turns raw touch/pointer events into drag-and-drop actions.
//!
//! # State Machine
//!
//! ```text
//! Idle -> Candidate     (gesture start on one or more drag sources)
//! Candidate -> Dragging (first move whose offset differs from the baseline)
//! Candidate -> Idle     (last contact lifted without movement)
//! Dragging -> Idle      (last contact lifted: drop + end-drag)
//! ```
//!
//! `Dragging` is owned by the host manager: the backend asks
//! [`DragDropMonitor::is_dragging`] rather than tracking it itself.
//!
//! # Invariants
//!
//! 1. Only one backend per process has its window listeners attached.
//! 2. Candidates are reset by every gesture start, before any source handler runs.
//! 3. A move at the baseline offset never begins a drag.
//! 4. Candidates are handed to the host innermost first.
//! 5. The removal watch, when present, is on the node of the host's current
//!    drag source.
//!
//! # Failure Modes
//!
//! - Events without coordinates are ignored; the gesture simply gets no update.
//! - Unregistered or detached source nodes report no offset to the host.
//! - If the host declines to begin a drag, the candidates are still consumed
//!   and the gesture produces no further actions.

use touchdnd_core::host::{BeginDragOptions, DragDropManager, HoverOptions};
use touchdnd_core::platform::MutationSource;
use touchdnd_core::{ClientOffset, GestureKind, InputEvent, InputMode, SourceId, TargetId};
use touchdnd_core::{debug, trace, warn};

use crate::candidates::MoveStartCandidates;
use crate::coordinates::CoordinateSource;
use crate::dispatch::{GestureDispatch, GestureIgnoredReason, GestureLifecyclePhase, GestureOutcome};
use crate::error::BackendError;
use crate::lock::BackendLock;
use crate::options::{DragPreviewOptions, TouchBackendOptions};
use crate::registry::{Registration, RegistrationKind, Registry};
use crate::removal::{RemovalWatch, resurrect};

/// Where the current gesture stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    /// A gesture started on at least one drag source; no movement yet.
    Candidate,
    /// The host reports an active drag.
    Dragging,
}

/// Touch drag-and-drop backend.
///
/// Owns the platform document handle `D` and the host manager `M`. The
/// platform forwards window events to [`dispatch`](Self::dispatch) (or to the
/// individual phase handlers) and child-list observer callbacks to
/// [`handle_child_list_mutation`](Self::handle_child_list_mutation).
///
/// Dropping a set-up backend tears it down.
pub struct TouchBackend<D: MutationSource, M: DragDropManager> {
    document: D,
    manager: M,
    options: TouchBackendOptions,
    coordinates: CoordinateSource,
    registry: Registry<D::Node>,
    candidates: MoveStartCandidates,
    baseline: Option<ClientOffset>,
    removal: Option<RemovalWatch<D>>,
    lock: Option<BackendLock>,
    next_sequence: u64,
}

impl<D: MutationSource, M: DragDropManager> std::fmt::Debug for TouchBackend<D, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TouchBackend")
            .field("input_mode", &self.coordinates.mode())
            .field("set_up", &self.lock.is_some())
            .field("candidates", &self.candidates.len())
            .field("baseline", &self.baseline)
            .field("watching_removal", &self.removal.is_some())
            .finish()
    }
}

impl<D: MutationSource, M: DragDropManager> TouchBackend<D, M> {
    /// Create a backend. The coordinate strategy is fixed here, from
    /// `options.input_mode` or the document's capability detection.
    #[must_use]
    pub fn new(document: D, manager: M, options: TouchBackendOptions) -> Self {
        let mode = options.input_mode.unwrap_or_else(|| document.input_mode());
        debug!(?mode, "touch backend created");
        Self {
            document,
            manager,
            options,
            coordinates: CoordinateSource::for_mode(mode),
            registry: Registry::new(),
            candidates: MoveStartCandidates::new(),
            baseline: None,
            removal: None,
            lock: None,
            next_sequence: 1,
        }
    }

    // ── Accessors ───────────────────────────────────────────────────────

    #[must_use]
    pub fn document(&self) -> &D {
        &self.document
    }

    /// Mutable document access, for platforms that mutate the tree through
    /// the backend's handle.
    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    #[must_use]
    pub fn manager(&self) -> &M {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut M {
        &mut self.manager
    }

    #[must_use]
    pub fn options(&self) -> &TouchBackendOptions {
        &self.options
    }

    #[must_use]
    pub const fn input_mode(&self) -> InputMode {
        self.coordinates.mode()
    }

    #[must_use]
    pub const fn coordinate_source(&self) -> CoordinateSource {
        self.coordinates
    }

    /// True while this backend holds the window listeners.
    #[must_use]
    pub fn is_set_up(&self) -> bool {
        self.lock.is_some()
    }

    #[must_use]
    pub fn drag_phase(&self) -> DragPhase {
        if self.manager.is_dragging() {
            DragPhase::Dragging
        } else if !self.candidates.is_empty() {
            DragPhase::Candidate
        } else {
            DragPhase::Idle
        }
    }

    /// Pending move-start candidates, innermost first.
    #[must_use]
    pub fn candidates(&self) -> &[SourceId] {
        self.candidates.as_slice()
    }

    /// Pointer offset recorded at the current gesture's start.
    #[must_use]
    pub const fn baseline(&self) -> Option<ClientOffset> {
        self.baseline
    }

    /// Node currently watched for removal.
    #[must_use]
    pub fn watched_source_node(&self) -> Option<&D::Node> {
        self.removal.as_ref().map(RemovalWatch::node)
    }

    #[must_use]
    pub fn registry(&self) -> &Registry<D::Node> {
        &self.registry
    }

    /// Viewport offset of a registered source's node.
    #[must_use]
    pub fn source_client_offset(&self, source_id: &SourceId) -> Option<ClientOffset> {
        self.registry.source_client_offset(&self.document, source_id)
    }

    // ── Lifecycle ───────────────────────────────────────────────────────

    /// Attach the window listeners.
    ///
    /// Does nothing outside a browsing context.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::AlreadyActive`] if any backend in the process,
    /// this one included, is already set up. Nothing is attached in that case.
    pub fn setup(&mut self) -> Result<(), BackendError> {
        if !self.document.has_window() {
            trace!("setup skipped: no window");
            return Ok(());
        }
        let lock = BackendLock::acquire().inspect_err(|_| {
            warn!("touch backend setup rejected: another backend is active");
        })?;
        for listener in self.input_mode().window_listeners() {
            self.document.add_window_listener(*listener);
        }
        self.lock = Some(lock);
        debug!(mode = ?self.input_mode(), "touch backend set up");
        Ok(())
    }

    /// Detach the window listeners and reset gesture state.
    ///
    /// Does nothing outside a browsing context. Listeners are only removed if
    /// this backend attached them.
    pub fn teardown(&mut self) {
        if !self.document.has_window() {
            return;
        }
        self.baseline = None;
        self.candidates.clear();
        self.uninstall_removal_watch();
        if let Some(lock) = self.lock.take() {
            for listener in self.input_mode().window_listeners() {
                self.document.remove_window_listener(*listener);
            }
            drop(lock);
            debug!("touch backend torn down");
        }
    }

    // ── Registration ────────────────────────────────────────────────────

    /// Register `node` as the drag source `source_id` and attach its start
    /// listener. Re-registering an id replaces the previous node.
    pub fn register_drag_source(&mut self, source_id: impl Into<SourceId>, node: D::Node) -> Registration {
        let source_id = source_id.into();
        let event_type = self.input_mode().start_event_type();
        let (sequence, previous) = self.registry.insert_source(source_id.clone(), node.clone());
        if let Some(previous) = previous {
            self.document
                .remove_source_listener(&previous, &source_id, event_type);
        }
        self.document.add_source_listener(&node, &source_id, event_type);
        trace!(source = %source_id, sequence, "drag source registered");
        Registration::new(RegistrationKind::Source(source_id), sequence)
    }

    /// Register the preview node and its rendering options for `source_id`.
    pub fn register_drag_preview(
        &mut self,
        source_id: impl Into<SourceId>,
        node: D::Node,
        options: DragPreviewOptions,
    ) -> Registration {
        let source_id = source_id.into();
        let sequence = self.registry.insert_preview(source_id.clone(), node, options);
        trace!(source = %source_id, sequence, "drag preview registered");
        Registration::new(RegistrationKind::Preview(source_id), sequence)
    }

    /// Register `node` as the drop target `target_id`.
    pub fn register_drop_target(&mut self, target_id: impl Into<TargetId>, node: D::Node) -> Registration {
        let target_id = target_id.into();
        let sequence = self.registry.insert_target(target_id.clone(), node);
        trace!(target = %target_id, sequence, "drop target registered");
        Registration::new(RegistrationKind::Target(target_id), sequence)
    }

    /// Undo a registration. Returns `false` if it had already been disposed
    /// or superseded.
    pub fn dispose(&mut self, registration: Registration) -> bool {
        let (kind, sequence) = registration.into_parts();
        match kind {
            RegistrationKind::Source(source_id) => {
                let Some(node) = self.registry.remove_source(&source_id, sequence) else {
                    return false;
                };
                let event_type = self.input_mode().start_event_type();
                self.document
                    .remove_source_listener(&node, &source_id, event_type);
                true
            }
            RegistrationKind::Preview(source_id) => self.registry.remove_preview(&source_id, sequence),
            RegistrationKind::Target(target_id) => self.registry.remove_target(&target_id, sequence),
        }
    }

    // ── Event dispatch ──────────────────────────────────────────────────

    /// Run every handler a platform event reaches, in phase order.
    ///
    /// For a gesture start: the window capture handler, then the start handler
    /// of each drag source on the path from the document root to the event
    /// target (outermost first; oldest registration first on a shared node),
    /// then the window bubble handler.
    pub fn dispatch(&mut self, event: &InputEvent<D::Node>) -> GestureDispatch {
        let phase = GestureLifecyclePhase::from(event.kind);
        if !self.is_set_up() {
            let sequence = self.bump_sequence();
            return GestureDispatch::ignored(phase, sequence, None, GestureIgnoredReason::NotSetUp);
        }
        if event.mode() != self.input_mode() || self.input_mode().event_type(event.kind).is_none() {
            let sequence = self.bump_sequence();
            return GestureDispatch::ignored(phase, sequence, None, GestureIgnoredReason::NotListening);
        }
        match event.kind {
            kind if kind.is_terminal() => self.handle_window_move_end_capture(event),
            GestureKind::Start => self.dispatch_move_start(event),
            _ => self.handle_window_move_capture(event),
        }
    }

    fn dispatch_move_start(&mut self, event: &InputEvent<D::Node>) -> GestureDispatch {
        let sequence = self.bump_sequence();
        self.handle_window_move_start_capture();
        let sources = event
            .target
            .as_ref()
            .map(|target| self.sources_on_path(target))
            .unwrap_or_default();
        for source_id in &sources {
            self.handle_move_start(source_id);
        }
        let client_offset = self.handle_window_move_start(event);
        trace!(candidates = self.candidates.len(), ?client_offset, "gesture start");
        GestureDispatch::handled(
            GestureLifecyclePhase::Start,
            sequence,
            client_offset,
            GestureOutcome::CandidatesRecorded {
                count: self.candidates.len(),
            },
            false,
        )
    }

    /// Drag sources on the path from the root to `target`, in the order
    /// their start handlers run.
    fn sources_on_path(&self, target: &D::Node) -> Vec<SourceId> {
        let mut path = Vec::new();
        let mut cursor = Some(target.clone());
        while let Some(node) = cursor {
            cursor = self.document.parent_element(&node);
            path.push(node);
        }
        path.iter()
            .rev()
            .flat_map(|node| self.registry.sources_at(node))
            .collect()
    }

    /// Gesture start, window capture phase: forget the previous gesture's
    /// candidates.
    pub fn handle_window_move_start_capture(&mut self) {
        self.candidates.clear();
    }

    /// Gesture start observed by a drag source's own listener.
    ///
    /// Callers wiring listeners themselves must invoke this outermost source
    /// first, so the innermost source ends up at the front.
    pub fn handle_move_start(&mut self, source_id: &SourceId) {
        self.candidates.prepend(source_id.clone());
    }

    /// Gesture start, window bubble phase: record the baseline offset.
    pub fn handle_window_move_start(&mut self, event: &InputEvent<D::Node>) -> Option<ClientOffset> {
        let client_offset = self.coordinates.client_offset(event)?;
        self.baseline = Some(client_offset);
        Some(client_offset)
    }

    /// Gesture move, window capture phase.
    ///
    /// Begins the drag on the first real movement, then hovers on every move
    /// while the host reports a drag.
    pub fn handle_window_move_capture(&mut self, event: &InputEvent<D::Node>) -> GestureDispatch {
        let sequence = self.bump_sequence();
        let phase = GestureLifecyclePhase::from(event.kind);
        let Some(client_offset) = self.coordinates.client_offset(event) else {
            return GestureDispatch::ignored(phase, sequence, None, GestureIgnoredReason::NoClientOffset);
        };

        let mut began_drag = false;
        if !self.manager.is_dragging() {
            if let Err(reason) = self.begin_drag_if_moved(client_offset) {
                return GestureDispatch::ignored(phase, sequence, Some(client_offset), reason);
            }
            began_drag = true;
            if !self.manager.is_dragging() {
                debug!("host declined to begin drag");
                return GestureDispatch::ignored(
                    phase,
                    sequence,
                    Some(client_offset),
                    GestureIgnoredReason::DragDeclined,
                );
            }
        }

        self.sync_removal_watch();
        self.manager.publish_drag_source();

        let target_ids = self
            .registry
            .targets_containing(&self.document, client_offset);
        let target_count = target_ids.len();
        self.manager.hover(&target_ids, HoverOptions { client_offset });
        trace!(?client_offset, target_count, "hover");

        GestureDispatch::handled(
            phase,
            sequence,
            Some(client_offset),
            GestureOutcome::Hovered {
                began_drag,
                target_count,
            },
            true,
        )
    }

    fn begin_drag_if_moved(&mut self, client_offset: ClientOffset) -> Result<(), GestureIgnoredReason> {
        let Some(baseline) = self.baseline else {
            return Err(GestureIgnoredReason::NoBaseline);
        };
        if self.candidates.is_empty() {
            return Err(GestureIgnoredReason::NoCandidates);
        }
        if !client_offset.moved_from(baseline) {
            return Err(GestureIgnoredReason::NoMovement);
        }

        let source_ids = self.candidates.take();
        debug!(candidates = ?source_ids.as_slice(), ?baseline, "begin drag");
        let registry = &self.registry;
        let document = &self.document;
        let source_client_offset =
            |source_id: &SourceId| -> Option<ClientOffset> { registry.source_client_offset(document, source_id) };
        self.manager.begin_drag(
            &source_ids,
            BeginDragOptions {
                client_offset: Some(baseline),
                source_client_offset: &source_client_offset,
                publish_source: false,
            },
        );
        Ok(())
    }

    /// Gesture end or cancel, window capture phase.
    pub fn handle_window_move_end_capture(&mut self, event: &InputEvent<D::Node>) -> GestureDispatch {
        let sequence = self.bump_sequence();
        let phase = GestureLifecyclePhase::from(event.kind);
        let client_offset = self.coordinates.client_offset(event);

        if self.coordinates.is_still_touching(event) {
            return GestureDispatch::ignored(
                phase,
                sequence,
                client_offset,
                GestureIgnoredReason::StillTouching,
            );
        }
        if !self.manager.is_dragging() || self.manager.did_drop() {
            let reason = if self.manager.is_dragging() {
                GestureIgnoredReason::AlreadyDropped
            } else {
                GestureIgnoredReason::NotDragging
            };
            self.candidates.clear();
            return GestureDispatch::ignored(phase, sequence, client_offset, reason);
        }

        // A contact that landed mid-drag may have queued candidates.
        self.baseline = None;
        self.candidates.clear();
        self.uninstall_removal_watch();
        self.manager.perform_drop();
        self.manager.end_drag();
        debug!("drop + end drag");

        GestureDispatch::handled(phase, sequence, client_offset, GestureOutcome::Dropped, true)
    }

    // ── Removal resilience ──────────────────────────────────────────────

    /// Child-list observer callback for the dragged node's parent.
    ///
    /// If the dragged node lost its parent, it is hidden, stripped of the
    /// configured attributes, and appended to the body, and the watch ends.
    pub fn handle_child_list_mutation(&mut self) -> GestureDispatch {
        let sequence = self.bump_sequence();
        let phase = GestureLifecyclePhase::ChildListMutation;
        let Some(watch) = self.removal.take() else {
            return GestureDispatch::ignored(phase, sequence, None, GestureIgnoredReason::NoRemovalWatch);
        };
        if self.document.parent_element(watch.node()).is_some() {
            self.removal = Some(watch);
            return GestureDispatch::ignored(
                phase,
                sequence,
                None,
                GestureIgnoredReason::SourceStillAttached,
            );
        }

        warn!(node = ?watch.node(), "dragged node removed mid-drag; reattaching hidden");
        resurrect(&mut self.document, watch.node(), &self.options.stripped_attributes);
        watch.uninstall(&mut self.document);
        GestureDispatch::handled(phase, sequence, None, GestureOutcome::SourceResurrected, false)
    }

    /// Point the removal watch at the node of the host's current source.
    fn sync_removal_watch(&mut self) {
        if !self.options.watch_source_removal {
            return;
        }
        let source_node = self
            .manager
            .source_id()
            .and_then(|source_id| self.registry.source_node(&source_id).cloned());
        let Some(node) = source_node else {
            self.uninstall_removal_watch();
            return;
        };
        if self
            .removal
            .as_ref()
            .is_some_and(|watch| watch.covers(&self.document, &node))
        {
            return;
        }
        self.uninstall_removal_watch();
        trace!(?node, "watching dragged node for removal");
        self.removal = Some(RemovalWatch::install(&mut self.document, node));
    }

    fn uninstall_removal_watch(&mut self) {
        if let Some(watch) = self.removal.take() {
            watch.uninstall(&mut self.document);
        }
    }

    fn bump_sequence(&mut self) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.saturating_add(1);
        sequence
    }
}

impl<D: MutationSource, M: DragDropManager> Drop for TouchBackend<D, M> {
    fn drop(&mut self) {
        if self.lock.is_some() {
            self.teardown();
        }
    }
}
