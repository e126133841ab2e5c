// Copyright 2026 the Treelens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The boundary between treelens and the GUI engine it instruments.
//!
//! The engine owns the live object tree. Treelens only ever holds
//! [`ObjHandle`] tokens into it and reaches the tree through the
//! [`UiEngine`] trait, one call at a time, on the engine's owner thread.
//!
//! # Stale handles
//!
//! Implementations must answer every query about a null, destroyed, or
//! never-issued handle with the neutral value (`None`, `false`, `0`) and
//! treat every mutation of such a handle as a no-op. Treelens relies on this
//! to make restores and lookups on stale handles harmless.

use crate::area::Area;
use crate::handle::ObjHandle;

/// An object flag treelens reads or writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjFlag {
    /// The object (and its subtree) is not drawn.
    Hidden,
    /// The object receives pointer input.
    Clickable,
}

/// A retained-mode GUI engine, as seen by the instrumentation layer.
///
/// Implemented by the reference [`ObjTree`](crate::tree::ObjTree) and by
/// bindings to real toolkits.
pub trait UiEngine {
    /// Returns the root of the currently displayed screen.
    fn active_root(&self) -> Option<ObjHandle>;

    /// Returns the number of direct children of `obj`.
    fn child_count(&self, obj: ObjHandle) -> usize;

    /// Returns the `index`-th direct child of `obj`, in enumeration order.
    fn child(&self, obj: ObjHandle, index: usize) -> Option<ObjHandle>;

    /// Calls `f` with each direct child of `obj`, in enumeration order.
    ///
    /// The default goes through [`child_count`](Self::child_count) and
    /// [`child`](Self::child). Engines whose children are a linked list
    /// should override it so walks stay linear in fan-out.
    fn for_each_child(&self, obj: ObjHandle, f: &mut dyn FnMut(ObjHandle)) {
        for i in 0..self.child_count(obj) {
            if let Some(child) = self.child(obj, i) {
                f(child);
            }
        }
    }

    /// Returns the absolute on-screen area of `obj`.
    fn coords(&self, obj: ObjHandle) -> Option<Area>;

    /// Returns whether `flag` is set on `obj`.
    fn has_flag(&self, obj: ObjHandle, flag: ObjFlag) -> bool;

    /// Sets `flag` on `obj`.
    fn add_flag(&mut self, obj: ObjHandle, flag: ObjFlag);

    /// Clears `flag` on `obj`.
    fn clear_flag(&mut self, obj: ObjHandle, flag: ObjFlag);

    /// Returns the concrete class label of `obj` (e.g. `"lv_label"`).
    fn class_name(&self, obj: ObjHandle) -> Option<&'static str>;

    /// Returns the text of `obj` if it is a text-bearing widget (a label).
    fn text(&self, obj: ObjHandle) -> Option<&str> {
        let _ = obj;
        None
    }

    /// Returns whether `obj` currently names a live object.
    ///
    /// Engines that cannot tell (raw pointer engines) may return `true` for
    /// any non-null handle; that is the accepted staleness window.
    fn is_live(&self, obj: ObjHandle) -> bool;

    /// Runs the real constructor named `ctor` under `parent`.
    ///
    /// Returns [`ObjHandle::NULL`] when the engine cannot construct the
    /// object (unknown constructor, resource exhaustion).
    fn construct(&mut self, ctor: &'static str, parent: ObjHandle) -> ObjHandle;

    /// Returns an opaque per-object debug tag (user data).
    ///
    /// Engines without a place to keep one return 0.
    fn debug_tag(&self, obj: ObjHandle) -> usize {
        let _ = obj;
        0
    }
}
