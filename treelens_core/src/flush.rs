// Copyright 2026 the Treelens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Display-flush tap.
//!
//! Engines call [`FlushTap::invoke`] from their flush callback with the area
//! being pushed to the display. If a sink is registered it sees the area
//! before `invoke` returns. There is a single sink slot; registering a new
//! sink replaces the old one.

use alloc::boxed::Box;
use core::fmt;

use crate::area::Area;

/// Receives flushed screen areas.
///
/// Closures `FnMut(&Area)` are sinks.
pub trait FlushSink {
    /// Called once per flush with the exact (inclusive) redrawn area.
    fn on_flush(&mut self, area: &Area);
}

impl<F: FnMut(&Area)> FlushSink for F {
    fn on_flush(&mut self, area: &Area) {
        self(area);
    }
}

/// Single-consumer forwarding point for flushed areas.
#[derive(Default)]
pub struct FlushTap {
    sink: Option<Box<dyn FlushSink>>,
}

impl fmt::Debug for FlushTap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlushTap")
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

impl FlushTap {
    /// Creates a tap with no sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `sink`, replacing any previous one.
    pub fn register(&mut self, sink: impl FlushSink + 'static) {
        self.sink = Some(Box::new(sink));
    }

    /// Removes the sink.
    pub fn clear(&mut self) {
        self.sink = None;
    }

    /// Returns `true` if a sink is registered.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.sink.is_some()
    }

    /// Forwards `area` to the sink, if any. Returns whether it was delivered.
    pub fn invoke(&mut self, area: &Area) -> bool {
        match &mut self.sink {
            Some(sink) => {
                sink.on_flush(area);
                true
            }
            None => false,
        }
    }
}
