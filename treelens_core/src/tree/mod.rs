// Copyright 2026 the Treelens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A reference retained-mode object tree.
//!
//! [`ObjTree`] is a small engine that behaves the way embedded retained-mode
//! toolkits do, so the instrumentation layer can be exercised without one:
//!
//! - One screen root, created with the tree, that is never destroyed.
//! - Objects are created under a parent through named constructors
//!   (`"lv_label_create"`, …) and destroyed together with their subtree.
//! - Slots are recycled through a free list and handles are derived from
//!   the slot, so a destroyed object's handle is handed out again by the
//!   next creation. Holders of old handles cannot tell the difference,
//!   which is exactly the staleness window instrumentation has to live with.
//! - Each object has an area relative to its parent, a flag set, a class
//!   label, a user-data word that is exported as the debug tag, and text
//!   for labels.

mod store;

pub use store::{Children, DEFAULT_LABEL_TEXT, ObjFlags, ObjTree};
