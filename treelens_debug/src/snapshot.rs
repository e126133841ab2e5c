// Copyright 2026 the Treelens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Owned copies of exported trees.
//!
//! Exported node slices are only valid during the sink call.
//! [`TreeSnapshot`] copies each delivery and can rebuild the parent links
//! into a [`TreeNode`] hierarchy.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use treelens_core::export::{AnnotatedNode, FlatNode, TreeSink};
use treelens_core::registry::Provenance;
use treelens_core::{ObjHandle, UiEngine};

/// A node copied out of an export, with provenance when the export was
/// annotated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnedNode {
    /// The flattened object.
    pub node: FlatNode,
    /// Creation site, if the registry had one.
    pub provenance: Option<Provenance>,
    /// Label text, once filled in by [`TreeSnapshot::capture_text`].
    pub text: Option<String>,
}

impl OwnedNode {
    fn new(node: FlatNode, provenance: Option<Provenance>) -> Self {
        Self {
            node,
            provenance,
            text: None,
        }
    }
}

/// One object and its children, in export order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeNode {
    /// This object.
    pub node: OwnedNode,
    /// Child subtrees.
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Iterates over this subtree in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = &Self> + '_ {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// Number of nodes in this subtree, including `self`.
    #[must_use]
    pub fn subtree_size(&self) -> usize {
        self.iter().count()
    }

    /// Depth-first search for `handle`.
    #[must_use]
    pub fn find(&self, handle: ObjHandle) -> Option<&Self> {
        self.iter().find(|n| n.node.node.handle == handle)
    }
}

impl Drop for TreeNode {
    fn drop(&mut self) {
        // Flatten before dropping so deep chains do not recurse.
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Shared holder of the most recent export.
///
/// Clones share storage: register one clone as the session's tree sink and
/// keep another to read from.
#[derive(Clone, Debug, Default)]
pub struct TreeSnapshot {
    latest: Rc<RefCell<Vec<OwnedNode>>>,
}

impl TreeSnapshot {
    /// Creates an empty snapshot holder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes in the latest export.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.latest.borrow().len()
    }

    /// Copy of the latest export in pre-order.
    #[must_use]
    pub fn nodes(&self) -> Vec<OwnedNode> {
        self.latest.borrow().clone()
    }

    /// Looks up one node of the latest export.
    #[must_use]
    pub fn find(&self, handle: ObjHandle) -> Option<OwnedNode> {
        self.latest
            .borrow()
            .iter()
            .find(|n| n.node.handle == handle)
            .cloned()
    }

    /// Fills in label text for every node of the latest export from
    /// `engine`. Call it right after the export, before the tree changes.
    ///
    /// Returns the number of nodes that carry text.
    pub fn capture_text<E: UiEngine + ?Sized>(&self, engine: &E) -> usize {
        let mut latest = self.latest.borrow_mut();
        let mut filled = 0;
        for owned in latest.iter_mut() {
            owned.text = engine.text(owned.node.handle).map(String::from);
            filled += usize::from(owned.text.is_some());
        }
        filled
    }

    /// Rebuilds the latest export into a hierarchy.
    ///
    /// The root is the first node whose parent is null. Returns `None` for an
    /// empty export.
    #[must_use]
    pub fn tree(&self) -> Option<TreeNode> {
        build_tree(&self.latest.borrow())
    }
}

impl TreeSink for TreeSnapshot {
    fn on_tree(&mut self, nodes: &[FlatNode]) {
        let mut latest = self.latest.borrow_mut();
        latest.clear();
        latest.extend(nodes.iter().map(|&node| OwnedNode::new(node, None)));
    }

    fn on_annotated_tree(&mut self, nodes: &[AnnotatedNode]) {
        let mut latest = self.latest.borrow_mut();
        latest.clear();
        latest.extend(nodes.iter().map(|n| OwnedNode::new(n.node, n.provenance)));
    }
}

/// Rebuilds parent links of a pre-order node list into a tree.
///
/// Nodes are assembled bottom-up, so a node whose parent appears after it
/// is dropped. The root is the first node with a null parent.
#[must_use]
pub fn build_tree(nodes: &[OwnedNode]) -> Option<TreeNode> {
    // Finished subtrees waiting for their parent, in reverse sibling order.
    let mut waiting: HashMap<ObjHandle, Vec<TreeNode>> = HashMap::new();
    let mut root = None;
    for owned in nodes.iter().rev() {
        let mut children = waiting.remove(&owned.node.handle).unwrap_or_default();
        children.reverse();
        let subtree = TreeNode {
            node: owned.clone(),
            children,
        };
        if owned.node.parent.is_null() {
            root = Some(subtree);
        } else {
            waiting.entry(owned.node.parent).or_default().push(subtree);
        }
    }
    root
}
