//! Identifier-to-node registration tables.
//!
//! Four independent tables: source nodes, preview nodes, preview options, and
//! target nodes. Every node entry remembers the sequence number of the
//! registration that wrote it, which orders iteration and lets a stale
//! [`Registration`] be disposed without touching a newer one.

use ahash::AHashMap;
use touchdnd_core::platform::Document;
use touchdnd_core::{ClientOffset, SourceId, TargetId};

use crate::options::DragPreviewOptions;

/// What a [`Registration`] refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationKind {
    Source(SourceId),
    Preview(SourceId),
    Target(TargetId),
}

/// Disposer returned by the backend's `register_*` methods.
///
/// Pass it to `TouchBackend::dispose` to undo the registration. Disposing a
/// registration that has since been overwritten by a newer one for the same
/// id does nothing.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a registration must be passed to `dispose` to disconnect its node"]
pub struct Registration {
    kind: RegistrationKind,
    sequence: u64,
}

impl Registration {
    pub(crate) const fn new(kind: RegistrationKind, sequence: u64) -> Self {
        Self { kind, sequence }
    }

    #[must_use]
    pub const fn kind(&self) -> &RegistrationKind {
        &self.kind
    }

    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    pub(crate) fn into_parts(self) -> (RegistrationKind, u64) {
        (self.kind, self.sequence)
    }
}

#[derive(Debug, Clone)]
struct Entry<N> {
    node: N,
    sequence: u64,
}

/// Registration tables keyed by handler id.
#[derive(Debug, Clone)]
pub struct Registry<N> {
    source_nodes: AHashMap<SourceId, Entry<N>>,
    preview_nodes: AHashMap<SourceId, Entry<N>>,
    preview_options: AHashMap<SourceId, DragPreviewOptions>,
    target_nodes: AHashMap<TargetId, Entry<N>>,
    next_sequence: u64,
}

impl<N> Default for Registry<N> {
    fn default() -> Self {
        Self {
            source_nodes: AHashMap::new(),
            preview_nodes: AHashMap::new(),
            preview_options: AHashMap::new(),
            target_nodes: AHashMap::new(),
            next_sequence: 1,
        }
    }
}

impl<N: Clone + PartialEq> Registry<N> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn bump(&mut self) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.saturating_add(1);
        sequence
    }

    /// Store `node` for `source_id`, returning the new sequence and the node it
    /// replaced.
    pub fn insert_source(&mut self, source_id: SourceId, node: N) -> (u64, Option<N>) {
        let sequence = self.bump();
        let previous = self
            .source_nodes
            .insert(source_id, Entry { node, sequence })
            .map(|entry| entry.node);
        (sequence, previous)
    }

    /// Remove the source entry if it was written by `sequence`.
    pub fn remove_source(&mut self, source_id: &SourceId, sequence: u64) -> Option<N> {
        remove_if_current(&mut self.source_nodes, source_id, sequence)
    }

    pub fn insert_preview(
        &mut self,
        source_id: SourceId,
        node: N,
        options: DragPreviewOptions,
    ) -> u64 {
        let sequence = self.bump();
        self.preview_options.insert(source_id.clone(), options);
        self.preview_nodes.insert(source_id, Entry { node, sequence });
        sequence
    }

    /// Remove the preview node and its options if written by `sequence`.
    pub fn remove_preview(&mut self, source_id: &SourceId, sequence: u64) -> bool {
        let removed = remove_if_current(&mut self.preview_nodes, source_id, sequence).is_some();
        if removed {
            self.preview_options.remove(source_id);
        }
        removed
    }

    pub fn insert_target(&mut self, target_id: TargetId, node: N) -> u64 {
        let sequence = self.bump();
        self.target_nodes.insert(target_id, Entry { node, sequence });
        sequence
    }

    pub fn remove_target(&mut self, target_id: &TargetId, sequence: u64) -> bool {
        remove_if_current(&mut self.target_nodes, target_id, sequence).is_some()
    }

    #[must_use]
    pub fn source_node(&self, source_id: &SourceId) -> Option<&N> {
        self.source_nodes.get(source_id).map(|entry| &entry.node)
    }

    #[must_use]
    pub fn preview_node(&self, source_id: &SourceId) -> Option<&N> {
        self.preview_nodes.get(source_id).map(|entry| &entry.node)
    }

    #[must_use]
    pub fn preview_options(&self, source_id: &SourceId) -> Option<&DragPreviewOptions> {
        self.preview_options.get(source_id)
    }

    #[must_use]
    pub fn target_node(&self, target_id: &TargetId) -> Option<&N> {
        self.target_nodes.get(target_id).map(|entry| &entry.node)
    }

    #[must_use]
    pub fn source_count(&self) -> usize {
        self.source_nodes.len()
    }

    #[must_use]
    pub fn target_count(&self) -> usize {
        self.target_nodes.len()
    }

    /// Sources registered on exactly `node`, oldest registration first.
    #[must_use]
    pub fn sources_at(&self, node: &N) -> Vec<SourceId> {
        let mut hits: Vec<(u64, &SourceId)> = self
            .source_nodes
            .iter()
            .filter(|(_, entry)| entry.node == *node)
            .map(|(id, entry)| (entry.sequence, id))
            .collect();
        hits.sort_unstable_by_key(|(sequence, _)| *sequence);
        hits.into_iter().map(|(_, id)| id.clone()).collect()
    }

    /// Viewport offset of a source's node.
    pub fn source_client_offset<D>(&self, document: &D, source_id: &SourceId) -> Option<ClientOffset>
    where
        D: Document<Node = N>,
    {
        let node = self.source_node(source_id)?;
        node_client_offset(document, node)
    }

    /// Targets whose bounding box contains `point`, in registration order.
    pub fn targets_containing<D>(&self, document: &D, point: ClientOffset) -> Vec<TargetId>
    where
        D: Document<Node = N>,
    {
        let mut hits: Vec<(u64, &TargetId)> = self
            .target_nodes
            .iter()
            .filter(|(_, entry)| document.is_connected(&entry.node))
            .filter(|(_, entry)| {
                document
                    .bounding_client_rect(&entry.node)
                    .is_some_and(|rect| rect.contains(point))
            })
            .map(|(id, entry)| (entry.sequence, id))
            .collect();
        hits.sort_unstable_by_key(|(sequence, _)| *sequence);
        hits.into_iter().map(|(_, id)| id.clone()).collect()
    }
}

fn remove_if_current<K, N>(table: &mut AHashMap<K, Entry<N>>, key: &K, sequence: u64) -> Option<N>
where
    K: std::hash::Hash + Eq,
{
    if table.get(key).is_some_and(|entry| entry.sequence == sequence) {
        table.remove(key).map(|entry| entry.node)
    } else {
        None
    }
}

/// Top-left of `node` in viewport coordinates.
///
/// Non-element nodes resolve to their parent element. Returns `None` when no
/// element is found or it is not part of the document.
pub fn node_client_offset<D: Document>(document: &D, node: &D::Node) -> Option<ClientOffset> {
    let element = if document.is_element(node) {
        node.clone()
    } else {
        document.parent_element(node)?
    };
    if !document.is_connected(&element) {
        return None;
    }
    document
        .bounding_client_rect(&element)
        .map(|rect| rect.top_left())
}
