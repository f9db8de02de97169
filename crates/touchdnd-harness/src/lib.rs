#![forbid(unsafe_code)]

//! Test harness and reference fixtures for touchdnd.
//!
//! - [`FakeDocument`]: in-memory document and child-list observer.
//! - [`RecordingManager`]: host manager double that records every action.
//! - Event builders for touch and legacy pointer gestures.
//! - [`exclusive_setup`]: serializes tests that take the process-wide setup
//!   lock.

pub mod fake_document;
pub mod recording_manager;

use std::sync::{Mutex, MutexGuard, PoisonError};

use touchdnd_core::host::DragDropManager;
use touchdnd_core::{GestureKind, InputEvent, PointerInput, TouchInput, TouchPoint};
use touchdnd_web::{GestureDispatch, TouchBackend, TouchBackendOptions};

pub use fake_document::{FakeDocument, NodeId, ObserverId, SourceListener, VIEWPORT};
pub use recording_manager::{ManagerCall, RecordingManager};

/// Backend over the fake document and the recording manager.
pub type HarnessBackend = TouchBackend<FakeDocument, RecordingManager>;

/// Build a backend with default options.
#[must_use]
pub fn backend(document: FakeDocument) -> HarnessBackend {
    TouchBackend::new(document, RecordingManager::new(), TouchBackendOptions::default())
}

static SETUP_SERIAL: Mutex<()> = Mutex::new(());

/// Hold this for the whole test when it calls `setup()`.
///
/// The setup lock is process-wide and tests in one binary run in parallel.
pub fn exclusive_setup() -> MutexGuard<'static, ()> {
    SETUP_SERIAL.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Deliver queued child-list records to the backend, as a `MutationObserver`
/// callback would: one call per batch.
pub fn pump_mutations<M: DragDropManager>(
    backend: &mut TouchBackend<FakeDocument, M>,
) -> Option<GestureDispatch> {
    let records = backend.document_mut().take_mutation_records();
    if records.is_empty() {
        return None;
    }
    Some(backend.handle_child_list_mutation())
}

// ── Event builders ──────────────────────────────────────────────────────

/// Touch contact `identifier` at `(x, y)`.
#[must_use]
pub const fn touch(identifier: i64, x: f64, y: f64) -> TouchPoint {
    TouchPoint::new(identifier, x, y)
}

/// Touch event with explicit active and changed contacts.
#[must_use]
pub fn touch_event(
    kind: GestureKind,
    target: Option<NodeId>,
    touches: &[TouchPoint],
    changed_touches: &[TouchPoint],
) -> InputEvent<NodeId> {
    InputEvent::touch(
        kind,
        target,
        TouchInput::new(touches.iter().copied(), changed_touches.iter().copied()),
    )
}

/// One finger (id 0) touching down on `target` at `(x, y)`.
#[must_use]
pub fn touch_start(target: NodeId, x: f64, y: f64) -> InputEvent<NodeId> {
    let contact = touch(0, x, y);
    touch_event(GestureKind::Start, Some(target), &[contact], &[contact])
}

/// The single finger moving to `(x, y)`.
#[must_use]
pub fn touch_move(target: NodeId, x: f64, y: f64) -> InputEvent<NodeId> {
    let contact = touch(0, x, y);
    touch_event(GestureKind::Move, Some(target), &[contact], &[contact])
}

/// The single finger lifting at `(x, y)`; no contacts remain.
#[must_use]
pub fn touch_end(target: NodeId, x: f64, y: f64) -> InputEvent<NodeId> {
    touch_event(GestureKind::End, Some(target), &[], &[touch(0, x, y)])
}

/// The platform cancelling the single finger's gesture.
#[must_use]
pub fn touch_cancel(target: NodeId, x: f64, y: f64) -> InputEvent<NodeId> {
    touch_event(GestureKind::Cancel, Some(target), &[], &[touch(0, x, y)])
}

/// Legacy single-pointer event.
#[must_use]
pub fn pointer_event(kind: GestureKind, target: Option<NodeId>, x: f64, y: f64) -> InputEvent<NodeId> {
    InputEvent::pointer(kind, target, PointerInput::new(1, x, y))
}
