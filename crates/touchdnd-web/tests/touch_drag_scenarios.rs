#![forbid(unsafe_code)]

//! End-to-end gesture scenarios over the in-memory document.

use pretty_assertions::assert_eq;
use touchdnd_core::host::{DragDropActions, DragDropMonitor};
use touchdnd_core::{ClientOffset, ClientRect, GestureKind, SourceId, TargetId};
use touchdnd_harness::{
    FakeDocument, ManagerCall, RecordingManager, backend, exclusive_setup, pointer_event, touch,
    touch_cancel, touch_end, touch_event, touch_move, touch_start,
};
use touchdnd_web::{DragPhase, GestureIgnoredReason, GestureOutcome, TouchBackend, TouchBackendOptions};

fn rect(left: f64, top: f64, right: f64, bottom: f64) -> ClientRect {
    ClientRect::new(left, top, right, bottom)
}

fn offset(x: f64, y: f64) -> ClientOffset {
    ClientOffset::new(x, y)
}

fn sources(ids: &[&str]) -> Vec<SourceId> {
    ids.iter().map(|id| SourceId::from(*id)).collect()
}

fn targets(ids: &[&str]) -> Vec<TargetId> {
    ids.iter().map(|id| TargetId::from(*id)).collect()
}

#[test]
fn touch_without_movement_never_begins_drag() {
    let _serial = exclusive_setup();
    let mut document = FakeDocument::new();
    let body = document.body();
    let node = document.create_element(body, rect(0.0, 0.0, 20.0, 20.0));
    let mut backend = backend(document);
    backend.setup().expect("setup succeeds");
    let _source = backend.register_drag_source("S", node);

    let start = backend.dispatch(&touch_start(node, 10.0, 10.0));
    assert_eq!(start.log.outcome, GestureOutcome::CandidatesRecorded { count: 1 });
    assert_eq!(start.log.client_offset, Some(offset(10.0, 10.0)));
    assert_eq!(backend.drag_phase(), DragPhase::Candidate);

    let end = backend.dispatch(&touch_end(node, 10.0, 10.0));
    assert_eq!(end.ignored_reason(), Some(GestureIgnoredReason::NotDragging));
    assert!(!end.default_prevented);
    assert!(backend.manager().calls().is_empty());
    assert_eq!(backend.drag_phase(), DragPhase::Idle);
}

#[test]
fn move_off_baseline_begins_drag_and_hovers_target() {
    let _serial = exclusive_setup();
    let mut document = FakeDocument::new();
    let body = document.body();
    let target = document.create_element(body, rect(0.0, 0.0, 100.0, 100.0));
    let node = document.create_element(target, rect(5.0, 5.0, 25.0, 25.0));
    let mut backend = backend(document);
    backend.setup().expect("setup succeeds");
    let _source = backend.register_drag_source("S", node);
    let _target = backend.register_drop_target("T", target);

    backend.dispatch(&touch_start(node, 10.0, 10.0));
    let moved = backend.dispatch(&touch_move(node, 50.0, 50.0));
    assert!(moved.default_prevented);
    assert_eq!(
        moved.log.outcome,
        GestureOutcome::Hovered {
            began_drag: true,
            target_count: 1
        }
    );
    assert_eq!(
        backend.manager().calls(),
        &[
            ManagerCall::BeginDrag {
                source_ids: sources(&["S"]),
                client_offset: Some(offset(10.0, 10.0)),
                source_client_offset: Some(offset(5.0, 5.0)),
                publish_source: false,
            },
            ManagerCall::PublishDragSource,
            ManagerCall::Hover {
                target_ids: targets(&["T"]),
                client_offset: offset(50.0, 50.0),
            },
        ]
    );
    assert_eq!(backend.drag_phase(), DragPhase::Dragging);
    assert!(backend.manager().is_source_published());
    assert_eq!(backend.watched_source_node(), Some(&node));
    assert_eq!(backend.document().observed_parents(), vec![target]);

    backend.manager_mut().take_calls();
    let end = backend.dispatch(&touch_end(node, 50.0, 50.0));
    assert!(end.default_prevented);
    assert_eq!(end.log.outcome, GestureOutcome::Dropped);
    assert_eq!(backend.manager().calls(), &[ManagerCall::Drop, ManagerCall::EndDrag]);
    assert_eq!(backend.baseline(), None);
    assert_eq!(backend.watched_source_node(), None);
    assert!(backend.document().observed_parents().is_empty());
    assert_eq!(backend.drag_phase(), DragPhase::Idle);
}

#[test]
fn every_move_after_begin_hovers_again() {
    let _serial = exclusive_setup();
    let mut document = FakeDocument::new();
    let body = document.body();
    let left = document.create_element(body, rect(0.0, 0.0, 100.0, 100.0));
    let right = document.create_element(body, rect(200.0, 0.0, 300.0, 100.0));
    let node = document.create_element(left, rect(10.0, 10.0, 20.0, 20.0));
    let mut backend = backend(document);
    backend.setup().expect("setup succeeds");
    let _source = backend.register_drag_source("S", node);
    let _left = backend.register_drop_target("L", left);
    let _right = backend.register_drop_target("R", right);

    backend.dispatch(&touch_start(node, 15.0, 15.0));
    backend.dispatch(&touch_move(node, 16.0, 15.0));
    backend.dispatch(&touch_move(node, 150.0, 50.0));
    let last = backend.dispatch(&touch_move(node, 250.0, 50.0));
    assert_eq!(
        last.log.outcome,
        GestureOutcome::Hovered {
            began_drag: false,
            target_count: 1
        }
    );
    assert_eq!(backend.manager().begin_drag_candidates().len(), 1);
    assert_eq!(
        backend.manager().hovered_targets(),
        vec![targets(&["L"]), targets(&[]), targets(&["R"])]
    );
}

#[test]
fn nested_sources_are_offered_innermost_first() {
    let _serial = exclusive_setup();
    let mut document = FakeDocument::new();
    let body = document.body();
    let outer = document.create_element(body, rect(0.0, 0.0, 200.0, 200.0));
    let inner = document.create_element(outer, rect(20.0, 20.0, 80.0, 80.0));
    let label = document.create_text(inner);
    let mut backend = backend(document);
    backend.setup().expect("setup succeeds");
    let _outer = backend.register_drag_source("outer", outer);
    let _inner = backend.register_drag_source("inner", inner);

    let start = backend.dispatch(&touch_start(label, 30.0, 30.0));
    assert_eq!(start.log.outcome, GestureOutcome::CandidatesRecorded { count: 2 });
    assert_eq!(backend.candidates(), sources(&["inner", "outer"]).as_slice());

    backend.dispatch(&touch_move(label, 31.0, 30.0));
    assert_eq!(
        backend.manager().begin_drag_candidates(),
        vec![sources(&["inner", "outer"])]
    );
    assert_eq!(backend.manager().source_id(), Some(SourceId::from("inner")));
    assert!(backend.candidates().is_empty());
}

#[test]
fn newest_registration_on_a_shared_node_comes_first() {
    let _serial = exclusive_setup();
    let mut document = FakeDocument::new();
    let body = document.body();
    let node = document.create_element(body, rect(0.0, 0.0, 50.0, 50.0));
    let mut backend = backend(document);
    backend.setup().expect("setup succeeds");
    let _first = backend.register_drag_source("first", node);
    let _second = backend.register_drag_source("second", node);

    backend.dispatch(&touch_start(node, 1.0, 1.0));
    assert_eq!(backend.candidates(), sources(&["second", "first"]).as_slice());
}

#[test]
fn new_gesture_start_discards_leftover_candidates() {
    let _serial = exclusive_setup();
    let mut document = FakeDocument::new();
    let body = document.body();
    let node = document.create_element(body, rect(0.0, 0.0, 50.0, 50.0));
    let empty = document.create_element(body, rect(100.0, 100.0, 200.0, 200.0));
    let mut backend = backend(document);
    backend.setup().expect("setup succeeds");
    let _source = backend.register_drag_source("S", node);

    // Aborted gesture: started on the source, never ended.
    backend.dispatch(&touch_start(node, 10.0, 10.0));
    assert_eq!(backend.candidates().len(), 1);

    let restart = backend.dispatch(&touch_start(empty, 150.0, 150.0));
    assert_eq!(restart.log.outcome, GestureOutcome::CandidatesRecorded { count: 0 });
    let moved = backend.dispatch(&touch_move(empty, 160.0, 150.0));
    assert_eq!(moved.ignored_reason(), Some(GestureIgnoredReason::NoCandidates));
    assert!(backend.manager().calls().is_empty());
}

#[test]
fn lifting_one_of_two_fingers_keeps_the_drag() {
    let _serial = exclusive_setup();
    let mut document = FakeDocument::new();
    let body = document.body();
    let node = document.create_element(body, rect(0.0, 0.0, 50.0, 50.0));
    let mut backend = backend(document);
    backend.setup().expect("setup succeeds");
    let _source = backend.register_drag_source("S", node);

    let first = touch(1, 10.0, 10.0);
    let second = touch(2, 30.0, 10.0);
    backend.dispatch(&touch_event(GestureKind::Start, Some(node), &[first, second], &[second]));
    assert_eq!(backend.baseline(), Some(offset(20.0, 10.0)));

    let first_moved = touch(1, 20.0, 20.0);
    let second_moved = touch(2, 40.0, 20.0);
    let moved = backend.dispatch(&touch_event(
        GestureKind::Move,
        Some(node),
        &[first_moved, second_moved],
        &[first_moved, second_moved],
    ));
    assert_eq!(moved.log.client_offset, Some(offset(30.0, 20.0)));
    assert_eq!(backend.drag_phase(), DragPhase::Dragging);

    let partial = backend.dispatch(&touch_event(GestureKind::End, Some(node), &[first_moved], &[second_moved]));
    assert_eq!(partial.ignored_reason(), Some(GestureIgnoredReason::StillTouching));
    assert_eq!(backend.drag_phase(), DragPhase::Dragging);

    let last = backend.dispatch(&touch_event(GestureKind::End, Some(node), &[], &[first_moved]));
    assert_eq!(last.log.outcome, GestureOutcome::Dropped);
    assert_eq!(backend.drag_phase(), DragPhase::Idle);
}

#[test]
fn finger_landing_mid_drag_leaves_no_candidates_after_drop() {
    let _serial = exclusive_setup();
    let mut document = FakeDocument::new();
    let body = document.body();
    let node = document.create_element(body, rect(0.0, 0.0, 50.0, 50.0));
    let mut backend = backend(document);
    backend.setup().expect("setup succeeds");
    let _source = backend.register_drag_source("S", node);

    backend.dispatch(&touch_start(node, 10.0, 10.0));
    backend.dispatch(&touch_move(node, 20.0, 20.0));
    assert_eq!(backend.drag_phase(), DragPhase::Dragging);

    let first = touch(0, 20.0, 20.0);
    let second = touch(1, 30.0, 30.0);
    backend.dispatch(&touch_event(GestureKind::Start, Some(node), &[first, second], &[second]));
    assert_eq!(backend.candidates(), sources(&["S"]).as_slice());

    let lifted = backend.dispatch(&touch_event(GestureKind::End, Some(node), &[first], &[second]));
    assert_eq!(lifted.ignored_reason(), Some(GestureIgnoredReason::StillTouching));

    let end = backend.dispatch(&touch_event(GestureKind::End, Some(node), &[], &[first]));
    assert_eq!(end.log.outcome, GestureOutcome::Dropped);
    assert!(backend.candidates().is_empty());
    assert_eq!(backend.baseline(), None);
    assert_eq!(backend.drag_phase(), DragPhase::Idle);
    assert!(backend.manager().calls().ends_with(&[ManagerCall::Drop, ManagerCall::EndDrag]));
}

#[test]
fn touch_cancel_drops_like_touch_end() {
    let _serial = exclusive_setup();
    let mut document = FakeDocument::new();
    let body = document.body();
    let node = document.create_element(body, rect(0.0, 0.0, 50.0, 50.0));
    let mut backend = backend(document);
    backend.setup().expect("setup succeeds");
    let _source = backend.register_drag_source("S", node);

    backend.dispatch(&touch_start(node, 10.0, 10.0));
    backend.dispatch(&touch_move(node, 12.0, 10.0));
    let cancel = backend.dispatch(&touch_cancel(node, 12.0, 10.0));
    assert_eq!(cancel.log.outcome, GestureOutcome::Dropped);
    assert!(backend.manager().calls().ends_with(&[ManagerCall::Drop, ManagerCall::EndDrag]));
}

#[test]
fn drop_target_edges_count_as_inside() {
    let _serial = exclusive_setup();
    let mut document = FakeDocument::new();
    let body = document.body();
    let node = document.create_element(body, rect(300.0, 300.0, 320.0, 320.0));
    let first = document.create_element(body, rect(0.0, 0.0, 100.0, 100.0));
    let second = document.create_element(body, rect(100.0, 100.0, 200.0, 200.0));
    let mut backend = backend(document);
    backend.setup().expect("setup succeeds");
    let _source = backend.register_drag_source("S", node);
    let _second = backend.register_drop_target("second", second);
    let _first = backend.register_drop_target("first", first);

    backend.dispatch(&touch_start(node, 310.0, 310.0));
    backend.dispatch(&touch_move(node, 100.0, 100.0));
    assert_eq!(
        backend.manager().hovered_targets(),
        vec![targets(&["second", "first"])]
    );
}

#[test]
fn detached_targets_never_match() {
    let _serial = exclusive_setup();
    let mut document = FakeDocument::new();
    let body = document.body();
    let node = document.create_element(body, rect(300.0, 300.0, 320.0, 320.0));
    let gone = document.create_detached_element(rect(0.0, 0.0, 100.0, 100.0));
    let mut backend = backend(document);
    backend.setup().expect("setup succeeds");
    let _source = backend.register_drag_source("S", node);
    let _gone = backend.register_drop_target("gone", gone);

    backend.dispatch(&touch_start(node, 310.0, 310.0));
    backend.dispatch(&touch_move(node, 0.0, 0.0));
    assert_eq!(backend.manager().hovered_targets(), vec![targets(&[])]);
}

#[test]
fn host_declining_the_drag_consumes_candidates() {
    let _serial = exclusive_setup();
    let mut document = FakeDocument::new();
    let body = document.body();
    let node = document.create_element(body, rect(0.0, 0.0, 50.0, 50.0));
    let manager = RecordingManager::new().with_undraggable("S");
    let mut backend = TouchBackend::new(document, manager, TouchBackendOptions::default());
    backend.setup().expect("setup succeeds");
    let _source = backend.register_drag_source("S", node);

    backend.dispatch(&touch_start(node, 10.0, 10.0));
    let declined = backend.dispatch(&touch_move(node, 20.0, 10.0));
    assert_eq!(declined.ignored_reason(), Some(GestureIgnoredReason::DragDeclined));
    assert!(!declined.default_prevented);
    let again = backend.dispatch(&touch_move(node, 30.0, 10.0));
    assert_eq!(again.ignored_reason(), Some(GestureIgnoredReason::NoCandidates));
    assert_eq!(backend.manager().calls().len(), 1);
}

#[test]
fn move_without_touches_is_a_no_op() {
    let _serial = exclusive_setup();
    let mut document = FakeDocument::new();
    let body = document.body();
    let node = document.create_element(body, rect(0.0, 0.0, 50.0, 50.0));
    let mut backend = backend(document);
    backend.setup().expect("setup succeeds");
    let _source = backend.register_drag_source("S", node);

    backend.dispatch(&touch_start(node, 10.0, 10.0));
    let empty = backend.dispatch(&touch_event(GestureKind::Move, Some(node), &[], &[]));
    assert_eq!(empty.ignored_reason(), Some(GestureIgnoredReason::NoClientOffset));
    assert_eq!(backend.candidates().len(), 1);
    assert!(backend.manager().calls().is_empty());
}

#[test]
fn move_during_foreign_drag_hovers_without_begin() {
    let _serial = exclusive_setup();
    let mut document = FakeDocument::new();
    let body = document.body();
    let target = document.create_element(body, rect(0.0, 0.0, 100.0, 100.0));
    let mut backend = backend(document);
    backend.setup().expect("setup succeeds");
    let _target = backend.register_drop_target("T", target);
    backend.manager_mut().start_external_drag("elsewhere");

    let moved = backend.dispatch(&touch_move(target, 40.0, 40.0));
    assert_eq!(
        moved.log.outcome,
        GestureOutcome::Hovered {
            began_drag: false,
            target_count: 1
        }
    );
    assert_eq!(backend.manager().begin_drag_candidates().len(), 0);
    // The foreign source has no registered node to watch.
    assert_eq!(backend.watched_source_node(), None);
}

#[test]
fn end_after_host_already_dropped_only_resets_candidates() {
    let _serial = exclusive_setup();
    let mut document = FakeDocument::new();
    let body = document.body();
    let node = document.create_element(body, rect(0.0, 0.0, 50.0, 50.0));
    let mut backend = backend(document);
    backend.setup().expect("setup succeeds");
    let _source = backend.register_drag_source("S", node);

    backend.dispatch(&touch_start(node, 10.0, 10.0));
    backend.dispatch(&touch_move(node, 11.0, 10.0));
    // The host dropped through some other path before the finger lifted.
    backend.manager_mut().perform_drop();
    let end = backend.dispatch(&touch_end(node, 11.0, 10.0));
    assert_eq!(end.ignored_reason(), Some(GestureIgnoredReason::AlreadyDropped));
    assert!(!backend.manager().calls().contains(&ManagerCall::EndDrag));
}

#[test]
fn legacy_pointer_gesture_round_trip() {
    let _serial = exclusive_setup();
    let mut document = FakeDocument::legacy_pointer();
    let body = document.body();
    let target = document.create_element(body, rect(0.0, 0.0, 100.0, 100.0));
    let node = document.create_element(body, rect(200.0, 200.0, 220.0, 220.0));
    let mut backend = backend(document);
    backend.setup().expect("setup succeeds");
    let _source = backend.register_drag_source("S", node);
    let _target = backend.register_drop_target("T", target);
    assert_eq!(backend.document().window_listeners().len(), 4);
    assert_eq!(backend.document().source_listeners()[0].event_type, "MSPointerDown");

    backend.dispatch(&pointer_event(GestureKind::Start, Some(node), 210.0, 210.0));
    backend.dispatch(&pointer_event(GestureKind::Move, Some(node), 50.0, 50.0));
    let touch_in_pointer_mode = backend.dispatch(&touch_move(node, 60.0, 60.0));
    assert_eq!(
        touch_in_pointer_mode.ignored_reason(),
        Some(GestureIgnoredReason::NotListening)
    );
    let cancel = backend.dispatch(&pointer_event(GestureKind::Cancel, Some(node), 50.0, 50.0));
    assert_eq!(cancel.ignored_reason(), Some(GestureIgnoredReason::NotListening));

    let up = backend.dispatch(&pointer_event(GestureKind::End, Some(node), 50.0, 50.0));
    assert_eq!(up.log.outcome, GestureOutcome::Dropped);
    assert_eq!(
        backend.manager().hovered_targets(),
        vec![targets(&["T"])]
    );
}

#[test]
fn dispatch_sequences_increase_monotonically() {
    let _serial = exclusive_setup();
    let mut document = FakeDocument::new();
    let body = document.body();
    let node = document.create_element(body, rect(0.0, 0.0, 50.0, 50.0));
    let mut backend = backend(document);
    backend.setup().expect("setup succeeds");

    let a = backend.dispatch(&touch_start(node, 1.0, 1.0));
    let b = backend.dispatch(&touch_move(node, 2.0, 1.0));
    let c = backend.dispatch(&touch_end(node, 2.0, 1.0));
    assert!(a.log.sequence < b.log.sequence);
    assert!(b.log.sequence < c.log.sequence);
}
