// Copyright 2026 the Treelens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point queries against the live tree.

use alloc::vec::Vec;

use crate::engine::{ObjFlag, UiEngine};
use crate::handle::ObjHandle;

/// Returns the topmost visible object under `(x, y)` in the subtree at `root`.
///
/// Hidden objects and everything below them are skipped. Children are
/// searched last-to-first, since later siblings are drawn on top. An object
/// is a candidate only if its own area contains the point.
#[must_use]
pub fn obj_at_point<E: UiEngine + ?Sized>(engine: &E, root: ObjHandle, x: i32, y: i32) -> Option<ObjHandle> {
    if root.is_null() || engine.has_flag(root, ObjFlag::Hidden) {
        return None;
    }
    let area = engine.coords(root)?;
    if !area.contains(x, y) {
        return None;
    }
    let mut children = Vec::new();
    engine.for_each_child(root, &mut |child| children.push(child));
    children
        .into_iter()
        .rev()
        .find_map(|child| obj_at_point(engine, child, x, y))
        .or(Some(root))
}
