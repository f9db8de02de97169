//! Keeps the dragged node alive when the application removes it mid-drag.
//!
//! Touch continuations are delivered to the node the gesture started on. If a
//! re-render detaches that node, the gesture would be lost. While a drag is
//! active the backend watches the node's parent; once the node is found
//! without a parent it is hidden and reattached at the end of the body until
//! the gesture ends.

use touchdnd_core::platform::{Document, MutationSource};

/// Child-list watch over the parent of the dragged node.
pub(crate) struct RemovalWatch<D: MutationSource> {
    node: D::Node,
    parent: Option<D::Node>,
    observer: Option<D::Observer>,
}

impl<D: MutationSource> RemovalWatch<D> {
    /// Watch `node`'s current parent. A node without a parent is remembered
    /// but not observed.
    pub(crate) fn install(document: &mut D, node: D::Node) -> Self {
        let parent = document.parent_element(&node);
        let observer = parent
            .as_ref()
            .map(|parent| document.observe_child_list(parent));
        Self {
            node,
            parent,
            observer,
        }
    }

    pub(crate) fn uninstall(self, document: &mut D) {
        if let Some(observer) = self.observer {
            document.disconnect(observer);
        }
    }

    pub(crate) fn node(&self) -> &D::Node {
        &self.node
    }

    /// True when this watch already observes `node` under its current parent.
    pub(crate) fn covers(&self, document: &D, node: &D::Node) -> bool {
        self.node == *node && self.observer.is_some() && document.parent_element(node) == self.parent
    }
}

/// Hide `node`, strip bookkeeping attributes, and append it to the body.
pub(crate) fn resurrect<D: Document>(document: &mut D, node: &D::Node, stripped_attributes: &[String]) {
    document.hide(node);
    for attribute in stripped_attributes {
        document.remove_attribute(node, attribute);
    }
    document.append_to_body(node);
}
