// Copyright 2026 the Treelens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Consumer-side tooling for treelens sessions.
//!
//! This crate provides sink implementations and helpers for host tools that
//! sit on the other side of a [`Session`](treelens_core::Session):
//!
//! - [`snapshot::TreeSnapshot`] — keeps the latest exported tree and
//!   rebuilds it into an owned hierarchy.
//! - [`json`] — `serde_json` renderings of snapshots and registry dumps.
//! - [`flush::FlushAreaCollector`] — merges flushed regions per frame and
//!   ages them out for redraw flashing.
//! - [`pretty::PrettyLogSink`] — one line per log message to any writer.
//! - [`tracing_sink::TracingLogSink`] — forwards log messages into `tracing`.

pub mod flush;
pub mod json;
pub mod pretty;
pub mod snapshot;
pub mod tracing_sink;
