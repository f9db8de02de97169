#![forbid(unsafe_code)]

//! In-memory document for deterministic backend tests.
//!
//! Models just enough of a DOM for the touch backend: an element/text tree
//! rooted at `<html>` with a `<body>`, per-element bounding boxes, attributes,
//! a hidden flag, window and per-node listener bookkeeping, and child-list
//! observers that queue mutation records instead of calling back.

use std::collections::BTreeMap;

use touchdnd_core::platform::{Document, MutationSource, WindowListener};
use touchdnd_core::{ClientRect, InputMode, SourceId};

/// Viewport size used for the root and body boxes.
pub const VIEWPORT: ClientRect = ClientRect::new(0.0, 0.0, 1024.0, 768.0);

/// Node handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

/// Child-list observer handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
}

#[derive(Debug, Clone)]
struct FakeNode {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    rect: ClientRect,
    attributes: BTreeMap<String, String>,
    hidden: bool,
}

/// A start listener attached to a drag source's node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceListener {
    pub node: NodeId,
    pub source_id: SourceId,
    pub event_type: &'static str,
}

/// In-memory [`Document`] + [`MutationSource`].
#[derive(Debug, Clone)]
pub struct FakeDocument {
    nodes: Vec<FakeNode>,
    root: NodeId,
    body: NodeId,
    has_window: bool,
    input_mode: InputMode,
    window_listeners: Vec<WindowListener>,
    window_listener_additions: usize,
    source_listeners: Vec<SourceListener>,
    observers: BTreeMap<ObserverId, NodeId>,
    next_observer: u32,
    mutation_records: Vec<ObserverId>,
}

impl Default for FakeDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeDocument {
    /// A touch-capable document with an empty body.
    #[must_use]
    pub fn new() -> Self {
        let mut document = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            body: NodeId(0),
            has_window: true,
            input_mode: InputMode::Touch,
            window_listeners: Vec::new(),
            window_listener_additions: 0,
            source_listeners: Vec::new(),
            observers: BTreeMap::new(),
            next_observer: 1,
            mutation_records: Vec::new(),
        };
        let root = document.push_node(NodeKind::Element, None, VIEWPORT);
        let body = document.push_node(NodeKind::Element, Some(root), VIEWPORT);
        document.root = root;
        document.body = body;
        document
    }

    /// A document whose platform reports legacy single-pointer events.
    #[must_use]
    pub fn legacy_pointer() -> Self {
        Self {
            input_mode: InputMode::LegacyPointer,
            ..Self::new()
        }
    }

    /// A document outside any browsing context (server rendering).
    #[must_use]
    pub fn without_window() -> Self {
        Self {
            has_window: false,
            ..Self::new()
        }
    }

    fn push_node(&mut self, kind: NodeKind, parent: Option<NodeId>, rect: ClientRect) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(FakeNode {
            kind,
            parent,
            children: Vec::new(),
            rect,
            attributes: BTreeMap::new(),
            hidden: false,
        });
        if let Some(parent) = parent {
            self.node_mut(parent).children.push(id);
        }
        id
    }

    fn node(&self, id: NodeId) -> &FakeNode {
        &self.nodes[id.0 as usize]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut FakeNode {
        &mut self.nodes[id.0 as usize]
    }

    fn record_child_list_change(&mut self, parent: NodeId) {
        let observers: Vec<ObserverId> = self
            .observers
            .iter()
            .filter(|(_, observed)| **observed == parent)
            .map(|(id, _)| *id)
            .collect();
        self.mutation_records.extend(observers);
    }

    // ── Tree construction ───────────────────────────────────────────────

    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    pub const fn body(&self) -> NodeId {
        self.body
    }

    /// Append a new element with bounding box `rect` under `parent`.
    pub fn create_element(&mut self, parent: NodeId, rect: ClientRect) -> NodeId {
        let id = self.push_node(NodeKind::Element, Some(parent), rect);
        self.record_child_list_change(parent);
        id
    }

    /// Append a new text node under `parent`.
    pub fn create_text(&mut self, parent: NodeId) -> NodeId {
        let id = self.push_node(NodeKind::Text, Some(parent), ClientRect::default());
        self.record_child_list_change(parent);
        id
    }

    /// Append a new element that is not part of the document.
    pub fn create_detached_element(&mut self, rect: ClientRect) -> NodeId {
        self.push_node(NodeKind::Element, None, rect)
    }

    /// Detach `node` from its parent, as a framework re-render would.
    pub fn remove(&mut self, node: NodeId) {
        let Some(parent) = self.node(node).parent else {
            return;
        };
        self.node_mut(parent).children.retain(|child| *child != node);
        self.node_mut(node).parent = None;
        self.record_child_list_change(parent);
    }

    /// Move `node` to the end of `parent`'s children.
    pub fn append_child(&mut self, parent: NodeId, node: NodeId) {
        self.remove(node);
        self.node_mut(parent).children.push(node);
        self.node_mut(node).parent = Some(parent);
        self.record_child_list_change(parent);
    }

    pub fn set_rect(&mut self, node: NodeId, rect: ClientRect) {
        self.node_mut(node).rect = rect;
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        self.node_mut(node)
            .attributes
            .insert(name.to_owned(), value.to_owned());
    }

    // ── Inspection ──────────────────────────────────────────────────────

    #[must_use]
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.node(node).attributes.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn is_hidden(&self, node: NodeId) -> bool {
        self.node(node).hidden
    }

    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    #[must_use]
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.node(node).children
    }

    #[must_use]
    pub fn window_listeners(&self) -> &[WindowListener] {
        &self.window_listeners
    }

    /// Total window listener attachments ever made, including removed ones.
    #[must_use]
    pub const fn window_listener_additions(&self) -> usize {
        self.window_listener_additions
    }

    #[must_use]
    pub fn source_listeners(&self) -> &[SourceListener] {
        &self.source_listeners
    }

    /// Sources with a start listener on `node`.
    #[must_use]
    pub fn source_listeners_on(&self, node: NodeId) -> Vec<SourceId> {
        self.source_listeners
            .iter()
            .filter(|listener| listener.node == node)
            .map(|listener| listener.source_id.clone())
            .collect()
    }

    /// Nodes currently observed for child-list changes.
    #[must_use]
    pub fn observed_parents(&self) -> Vec<NodeId> {
        self.observers.values().copied().collect()
    }

    /// Drain queued mutation records (one per observer per change).
    pub fn take_mutation_records(&mut self) -> Vec<ObserverId> {
        std::mem::take(&mut self.mutation_records)
    }
}

impl Document for FakeDocument {
    type Node = NodeId;

    fn has_window(&self) -> bool {
        self.has_window
    }

    fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    fn add_window_listener(&mut self, listener: WindowListener) {
        // Identical registrations are deduplicated, as addEventListener does.
        if !self.window_listeners.contains(&listener) {
            self.window_listeners.push(listener);
            self.window_listener_additions += 1;
        }
    }

    fn remove_window_listener(&mut self, listener: WindowListener) {
        self.window_listeners.retain(|existing| *existing != listener);
    }

    fn add_source_listener(&mut self, node: &NodeId, source_id: &SourceId, event_type: &'static str) {
        let listener = SourceListener {
            node: *node,
            source_id: source_id.clone(),
            event_type,
        };
        if !self.source_listeners.contains(&listener) {
            self.source_listeners.push(listener);
        }
    }

    fn remove_source_listener(&mut self, node: &NodeId, source_id: &SourceId, event_type: &'static str) {
        self.source_listeners.retain(|listener| {
            !(listener.node == *node && listener.source_id == *source_id && listener.event_type == event_type)
        });
    }

    fn is_element(&self, node: &NodeId) -> bool {
        self.node(*node).kind == NodeKind::Element
    }

    fn parent_element(&self, node: &NodeId) -> Option<NodeId> {
        self.node(*node).parent
    }

    fn is_connected(&self, node: &NodeId) -> bool {
        let mut cursor = Some(*node);
        while let Some(current) = cursor {
            if current == self.root {
                return true;
            }
            cursor = self.node(current).parent;
        }
        false
    }

    fn bounding_client_rect(&self, node: &NodeId) -> Option<ClientRect> {
        let fake = self.node(*node);
        if fake.kind != NodeKind::Element {
            return None;
        }
        // Undisplayed and detached elements report an all-zero box.
        if fake.hidden || !self.is_connected(node) {
            return Some(ClientRect::default());
        }
        Some(fake.rect)
    }

    fn hide(&mut self, node: &NodeId) {
        self.node_mut(*node).hidden = true;
    }

    fn remove_attribute(&mut self, node: &NodeId, name: &str) {
        self.node_mut(*node).attributes.remove(name);
    }

    fn append_to_body(&mut self, node: &NodeId) {
        let body = self.body;
        self.append_child(body, *node);
    }
}

impl MutationSource for FakeDocument {
    type Observer = ObserverId;

    fn observe_child_list(&mut self, parent: &NodeId) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.insert(id, *parent);
        id
    }

    fn disconnect(&mut self, observer: ObserverId) {
        self.observers.remove(&observer);
        self.mutation_records.retain(|record| *record != observer);
    }
}
