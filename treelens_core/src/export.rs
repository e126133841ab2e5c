// Copyright 2026 the Treelens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flattening the live tree into a transferable snapshot.
//!
//! [`TreeExporter::export`] walks the engine's active screen and produces
//! one [`FlatNode`] per object, in depth-first pre-order, so every node's
//! parent appears before it. The walk happens in two passes: the first
//! counts reachable objects and reserves exactly that much space, the second
//! fills it. If the two passes disagree the snapshot is discarded rather
//! than delivered short or padded.
//!
//! The sequence is lent to the registered [`TreeSink`] for the duration of
//! one call and freed afterwards.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::engine::{ObjFlag, UiEngine};
use crate::handle::ObjHandle;
use crate::registry::{MetadataRegistry, Provenance};

/// Class label used when the engine cannot name an object's class.
pub const UNKNOWN_CLASS: &str = "unknown";

/// One object in a flattened snapshot.
///
/// Geometry is the absolute on-screen rectangle at the time of the walk,
/// saturated into `i16`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FlatNode {
    /// The object.
    pub handle: ObjHandle,
    /// Its parent, or [`ObjHandle::NULL`] for the snapshot root.
    pub parent: ObjHandle,
    /// The object's own concrete class label.
    pub class_name: &'static str,
    /// Left edge.
    pub x: i16,
    /// Top edge.
    pub y: i16,
    /// Width in pixels.
    pub width: i16,
    /// Height in pixels.
    pub height: i16,
    /// Whether the object's hidden flag is set.
    pub hidden: bool,
    /// Opaque per-object tag from [`UiEngine::debug_tag`].
    pub debug_tag: usize,
}

/// A [`FlatNode`] together with its creation provenance, if recorded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AnnotatedNode {
    /// The flattened object.
    pub node: FlatNode,
    /// Registry record for `node.handle`.
    pub provenance: Option<Provenance>,
}

/// Receives exported snapshots.
///
/// Implementations must not keep the slice past return. Closures
/// `FnMut(&[FlatNode])` are sinks for plain snapshots.
pub trait TreeSink {
    /// Called once per [`TreeExporter::export`].
    fn on_tree(&mut self, nodes: &[FlatNode]);

    /// Called once per [`TreeExporter::export_annotated`].
    ///
    /// The default forwards the plain nodes to [`on_tree`](Self::on_tree).
    fn on_annotated_tree(&mut self, nodes: &[AnnotatedNode]) {
        let plain: Vec<FlatNode> = nodes.iter().map(|n| n.node).collect();
        self.on_tree(&plain);
    }
}

impl<F: FnMut(&[FlatNode])> TreeSink for F {
    fn on_tree(&mut self, nodes: &[FlatNode]) {
        self(nodes);
    }
}

/// Why an export produced nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExportError {
    /// The engine has no active screen.
    #[error("engine has no active root")]
    NoActiveRoot,
    /// No sink is registered.
    #[error("no tree sink registered")]
    NoSink,
    /// The output buffer could not be allocated.
    #[error("could not allocate a buffer for {0} nodes")]
    AllocationFailed(usize),
    /// The tree changed between the counting and filling passes.
    #[error("tree changed during export: counted {counted}, visited {visited}")]
    TreeChanged {
        /// Nodes found by the counting pass.
        counted: usize,
        /// Nodes found by the filling pass.
        visited: usize,
    },
}

/// Counts every object reachable from `root`, `root` included.
#[must_use]
pub fn count_nodes<E: UiEngine + ?Sized>(engine: &E, root: ObjHandle) -> usize {
    let mut total = 0;
    let mut stack = alloc::vec![root];
    while let Some(obj) = stack.pop() {
        total += 1;
        engine.for_each_child(obj, &mut |child| stack.push(child));
    }
    total
}

/// Describes a single object.
#[must_use]
pub fn describe<E: UiEngine + ?Sized>(engine: &E, obj: ObjHandle, parent: ObjHandle) -> FlatNode {
    let (x, y, width, height) = engine.coords(obj).map_or((0, 0, 0, 0), |a| {
        (
            saturate(a.x1),
            saturate(a.y1),
            saturate(a.width()),
            saturate(a.height()),
        )
    });
    FlatNode {
        handle: obj,
        parent,
        class_name: engine.class_name(obj).unwrap_or(UNKNOWN_CLASS),
        x,
        y,
        width,
        height,
        hidden: engine.has_flag(obj, ObjFlag::Hidden),
        debug_tag: engine.debug_tag(obj),
    }
}

fn saturate(v: i32) -> i16 {
    i16::try_from(v).unwrap_or(if v < 0 { i16::MIN } else { i16::MAX })
}

/// Produces the pre-order flattening of the subtree at `root` into a buffer
/// sized by a prior count.
///
/// # Errors
///
/// See [`ExportError::AllocationFailed`] and [`ExportError::TreeChanged`].
pub fn flatten<E: UiEngine + ?Sized>(
    engine: &E,
    root: ObjHandle,
) -> Result<Vec<FlatNode>, ExportError> {
    let counted = count_nodes(engine, root);

    let mut nodes: Vec<FlatNode> = Vec::new();
    nodes
        .try_reserve_exact(counted)
        .map_err(|_| ExportError::AllocationFailed(counted))?;

    // (object, parent). Children are pushed in reverse so the first child is
    // visited first.
    let mut stack = alloc::vec![(root, ObjHandle::NULL)];
    let mut visited = 0;
    while let Some((obj, parent)) = stack.pop() {
        visited += 1;
        if visited > counted {
            continue;
        }
        nodes.push(describe(engine, obj, parent));
        let first = stack.len();
        engine.for_each_child(obj, &mut |child| stack.push((child, obj)));
        stack[first..].reverse();
    }

    if visited != counted {
        return Err(ExportError::TreeChanged { counted, visited });
    }
    Ok(nodes)
}

/// Delivers tree snapshots to a single registered sink.
#[derive(Default)]
pub struct TreeExporter {
    sink: Option<Box<dyn TreeSink>>,
}

impl fmt::Debug for TreeExporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeExporter")
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

impl TreeExporter {
    /// Creates an exporter with no sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `sink`, replacing any previous one.
    pub fn set_sink(&mut self, sink: impl TreeSink + 'static) {
        self.sink = Some(Box::new(sink));
    }

    /// Removes the sink.
    pub fn clear_sink(&mut self) {
        self.sink = None;
    }

    /// Returns `true` if a sink is registered.
    #[must_use]
    pub fn has_sink(&self) -> bool {
        self.sink.is_some()
    }

    /// Flattens the active screen and hands it to the sink once.
    ///
    /// Returns the number of nodes delivered.
    ///
    /// # Errors
    ///
    /// Returns an [`ExportError`] and does not call the sink if there is no
    /// sink or active root, or if the snapshot could not be built intact.
    pub fn export<E: UiEngine + ?Sized>(&mut self, engine: &E) -> Result<usize, ExportError> {
        let sink = self.sink.as_mut().ok_or(ExportError::NoSink)?;
        let root = engine.active_root().ok_or(ExportError::NoActiveRoot)?;
        let nodes = flatten(engine, root)?;
        sink.on_tree(&nodes);
        Ok(nodes.len())
    }

    /// Like [`export`](Self::export), attaching each node's registry record.
    ///
    /// # Errors
    ///
    /// As for [`export`](Self::export).
    pub fn export_annotated<E: UiEngine + ?Sized>(
        &mut self,
        engine: &E,
        registry: &MetadataRegistry,
    ) -> Result<usize, ExportError> {
        let sink = self.sink.as_mut().ok_or(ExportError::NoSink)?;
        let root = engine.active_root().ok_or(ExportError::NoActiveRoot)?;
        let nodes = flatten(engine, root)?;

        let mut annotated: Vec<AnnotatedNode> = Vec::new();
        annotated
            .try_reserve_exact(nodes.len())
            .map_err(|_| ExportError::AllocationFailed(nodes.len()))?;
        annotated.extend(nodes.into_iter().map(|node| AnnotatedNode {
            provenance: registry.lookup(node.handle),
            node,
        }));

        sink.on_annotated_tree(&annotated);
        Ok(annotated.len())
    }
}
