// Copyright 2026 the Treelens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Redraw-region collection for flash overlays.
//!
//! A frame may flush many small areas. [`FlushAreaCollector::scope`] merges
//! everything flushed while its closure runs into one bounding box and
//! timestamps it; overlays draw the [`active_events`] until they age out
//! after [`FLASH_DURATION`].
//!
//! [`active_events`]: FlushAreaCollector::active_events

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use kurbo::Rect;
use treelens_core::Area;
use treelens_core::flush::FlushSink;

/// How long a merged region stays visible.
pub const FLASH_DURATION: Duration = Duration::from_millis(1000 / 3);

/// A merged redraw region.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlushEvent {
    /// Bounding box of everything flushed in one scope.
    pub rect: Rect,
    /// When the scope ended.
    pub at: Instant,
}

#[derive(Debug)]
struct Inner {
    enabled: bool,
    pending: Vec<Rect>,
    events: Vec<FlushEvent>,
}

/// Collects flushed areas. Clones share state.
#[derive(Clone, Debug)]
pub struct FlushAreaCollector {
    inner: Rc<RefCell<Inner>>,
}

impl Default for FlushAreaCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl FlushAreaCollector {
    /// Creates an enabled collector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                enabled: true,
                pending: Vec::new(),
                events: Vec::new(),
            })),
        }
    }

    /// Returns whether flushed areas are being collected.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.inner.borrow().enabled
    }

    /// Turns collection on or off. Disabling drops pending areas and events.
    pub fn set_enabled(&self, enabled: bool) {
        let mut inner = self.inner.borrow_mut();
        inner.enabled = enabled;
        if !enabled {
            inner.pending.clear();
            inner.events.clear();
        }
    }

    /// Runs `f`, then merges every area flushed during it into one event.
    ///
    /// Areas flushed before the scope are discarded. Nothing is recorded if
    /// `f` flushed nothing.
    pub fn scope<R>(&self, f: impl FnOnce() -> R) -> R {
        self.inner.borrow_mut().pending.clear();
        let result = f();
        self.finish_scope(Instant::now());
        result
    }

    fn finish_scope(&self, now: Instant) {
        let mut inner = self.inner.borrow_mut();
        let merged = inner.pending.drain(..).reduce(|acc, r| acc.union(r));
        if let Some(rect) = merged {
            inner.events.retain(|e| now.saturating_duration_since(e.at) < FLASH_DURATION);
            inner.events.push(FlushEvent { rect, at: now });
        }
    }

    /// Number of areas flushed since the current scope began.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    /// Events younger than [`FLASH_DURATION`].
    #[must_use]
    pub fn active_events(&self) -> Vec<FlushEvent> {
        self.active_events_at(Instant::now())
    }

    /// Events younger than [`FLASH_DURATION`] as of `now`.
    #[must_use]
    pub fn active_events_at(&self, now: Instant) -> Vec<FlushEvent> {
        self.inner
            .borrow()
            .events
            .iter()
            .filter(|e| now.saturating_duration_since(e.at) < FLASH_DURATION)
            .copied()
            .collect()
    }
}

impl FlushSink for FlushAreaCollector {
    fn on_flush(&mut self, area: &Area) {
        let mut inner = self.inner.borrow_mut();
        if inner.enabled {
            inner.pending.push(area.to_rect());
        }
    }
}

#[cfg(test)]
mod tests {
    use treelens_core::{Session, SessionConfig};

    use super::*;

    #[test]
    fn scope_merges_to_bounding_box() {
        let collector = FlushAreaCollector::new();
        let session = RefCell::new(Session::new(SessionConfig::quiet()));
        session
            .borrow_mut()
            .register_flush_region_sink(collector.clone());

        collector.scope(|| {
            let mut s = session.borrow_mut();
            s.invoke_flush_region(&Area::new(10, 10, 19, 19));
            s.invoke_flush_region(&Area::new(50, 0, 59, 4));
        });

        let events = collector.active_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].rect, Rect::new(10.0, 0.0, 60.0, 20.0));
        assert_eq!(collector.pending_count(), 0);
    }

    #[test]
    fn empty_scope_records_nothing() {
        let collector = FlushAreaCollector::new();
        collector.scope(|| {});
        assert!(collector.active_events().is_empty());
    }

    #[test]
    fn events_age_out() {
        let collector = FlushAreaCollector::new();
        let mut sink = collector.clone();
        collector.scope(|| sink.on_flush(&Area::new(0, 0, 9, 9)));

        let at = collector.active_events()[0].at;
        assert_eq!(collector.active_events_at(at + FLASH_DURATION / 2).len(), 1);
        assert!(collector.active_events_at(at + FLASH_DURATION).is_empty());
    }

    #[test]
    fn disabled_collector_ignores_flushes() {
        let collector = FlushAreaCollector::new();
        collector.set_enabled(false);
        let mut sink = collector.clone();
        collector.scope(|| sink.on_flush(&Area::new(0, 0, 9, 9)));
        assert!(collector.active_events().is_empty());

        collector.set_enabled(true);
        collector.scope(|| sink.on_flush(&Area::new(0, 0, 9, 9)));
        assert_eq!(collector.active_events().len(), 1);
    }
}
