#![forbid(unsafe_code)]

//! Structured log events emitted over a drag's lifecycle.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use touchdnd_core::ClientRect;
use touchdnd_harness::{
    FakeDocument, backend, exclusive_setup, pump_mutations, touch_end, touch_move, touch_start,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    target: String,
    message: Option<String>,
}

struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct MessageVisitor(HashMap<String, String>);

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{value:?}"));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }
}

impl<S> tracing_subscriber::Layer<S> for EventCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = MessageVisitor(HashMap::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            message: visitor.0.remove("message"),
        });
    }
}

fn with_captured_events<F: FnOnce()>(f: F) -> Vec<CapturedEvent> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = EventCapture {
        events: events.clone(),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    events.lock().unwrap().clone()
}

fn backend_messages(events: &[CapturedEvent]) -> Vec<(tracing::Level, String)> {
    events
        .iter()
        .filter(|event| event.target.starts_with("touchdnd_web"))
        .filter_map(|event| Some((event.level, event.message.clone()?)))
        .collect()
}

#[test]
fn drag_lifecycle_is_logged() {
    let _serial = exclusive_setup();
    let events = with_captured_events(|| {
        let mut document = FakeDocument::new();
        let body = document.body();
        let node = document.create_element(body, ClientRect::new(0.0, 0.0, 50.0, 50.0));
        let mut backend = backend(document);
        backend.setup().expect("setup succeeds");
        let _source = backend.register_drag_source("S", node);
        backend.dispatch(&touch_start(node, 10.0, 10.0));
        backend.dispatch(&touch_move(node, 20.0, 10.0));
        backend.dispatch(&touch_end(node, 20.0, 10.0));
    });

    let messages = backend_messages(&events);
    let debug: Vec<&str> = messages
        .iter()
        .filter(|(level, _)| *level == tracing::Level::DEBUG)
        .map(|(_, message)| message.as_str())
        .collect();
    assert!(debug.contains(&"touch backend set up"), "{debug:?}");
    assert!(debug.contains(&"begin drag"), "{debug:?}");
    assert!(debug.contains(&"drop + end drag"), "{debug:?}");
    assert!(debug.contains(&"touch backend torn down"), "{debug:?}");
}

#[test]
fn rejected_setup_and_resurrection_warn() {
    let _serial = exclusive_setup();
    let events = with_captured_events(|| {
        let mut document = FakeDocument::new();
        let body = document.body();
        let list = document.create_element(body, ClientRect::new(0.0, 0.0, 100.0, 100.0));
        let node = document.create_element(list, ClientRect::new(0.0, 0.0, 100.0, 20.0));
        let mut active = backend(document);
        active.setup().expect("setup succeeds");

        let mut rejected = backend(FakeDocument::new());
        assert!(rejected.setup().is_err());

        let _source = active.register_drag_source("S", node);
        active.dispatch(&touch_start(node, 10.0, 10.0));
        active.dispatch(&touch_move(node, 20.0, 10.0));
        active.document_mut().remove(node);
        pump_mutations(&mut active);
    });

    let warnings: Vec<String> = backend_messages(&events)
        .into_iter()
        .filter(|(level, _)| *level == tracing::Level::WARN)
        .map(|(_, message)| message)
        .collect();
    assert_eq!(
        warnings,
        vec![
            "touch backend setup rejected: another backend is active".to_owned(),
            "dragged node removed mid-drag; reattaching hidden".to_owned(),
        ]
    );
}
