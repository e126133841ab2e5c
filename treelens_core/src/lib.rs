// Copyright 2026 the Treelens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Instrumentation for retained-mode embedded UI object trees.
//!
//! `treelens_core` sits between an application and a UI engine that owns a
//! tree of widgets. It records where every widget was created, exports the
//! live tree as a flat pre-order snapshot, temporarily forces the whole tree
//! clickable for inspection, and forwards flushed screen regions to a
//! visualizer. It is `no_std` compatible (with `alloc`).
//!
//! # Architecture
//!
//! ```text
//!   application ──► Session::create() ──► UiEngine::construct()
//!                        │
//!                        ▼
//!                 MetadataRegistry (handle → file, line, kind)
//!
//!   host tooling ──► Session::export_tree() ──► TreeSink
//!   engine flush ──► Session::invoke_flush_region() ──► FlushSink
//!   session ops  ──► Logger ──► LogSink
//! ```
//!
//! **[`engine`]** — The [`UiEngine`](engine::UiEngine) trait: the only
//! surface through which treelens reads or mutates the engine's tree.
//!
//! **[`tree`]** — [`ObjTree`](tree::ObjTree), a reference engine with
//! recycled slot handles, used by tests and demos.
//!
//! **[`registry`]** — Provenance records keyed by object handle.
//!
//! **[`intercept`]** — Table-driven constructor wrappers that capture the
//! caller's location with `#[track_caller]`.
//!
//! **[`export`]** — Flattening the active tree into [`FlatNode`](export::FlatNode)s.
//!
//! **[`click`]** — Snapshot and restore of per-object clickability.
//!
//! **[`flush`]** — The flush-region tap.
//!
//! **[`log`]** — Level-filtered, single-sink logging.
//!
//! **[`session`]** — [`Session`](session::Session), which owns all of the
//! above for one engine.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies and
//!   routes log messages to stderr when no log sink is registered.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod area;
pub mod click;
pub mod engine;
pub mod export;
pub mod flush;
pub mod handle;
pub mod intercept;
pub mod log;
pub mod probe;
pub mod registry;
pub mod session;
pub mod tree;

pub use area::Area;
pub use engine::{ObjFlag, UiEngine};
pub use handle::ObjHandle;
pub use session::{Session, SessionConfig};

#[cfg(test)]
mod proptests;
