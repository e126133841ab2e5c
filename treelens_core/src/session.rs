// Copyright 2026 the Treelens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The instrumentation session.
//!
//! A [`Session`] owns every piece of instrumentation state: the metadata
//! registry, the widget table, the clickability snapshot, and the three sink
//! slots (log, tree export, flush region). There are no process-wide
//! globals; two sessions over two engines never see each other.
//!
//! Every method runs synchronously on the caller's thread, which must be the
//! engine's owner thread. Sessions are not re-entrant: sinks must not call
//! back into the session that is invoking them.

use alloc::string::String;

use crate::area::Area;
use crate::click::{ClickCache, RestoreSummary};
use crate::engine::{ObjFlag, UiEngine};
use crate::export::{ExportError, TreeExporter, TreeSink};
use crate::flush::{FlushSink, FlushTap};
use crate::handle::ObjHandle;
use crate::intercept::{CreationInterceptor, InterceptError, WidgetTable, intercept};
use crate::log::{LogLevel, LogSink, Logger, log_at};
use crate::probe;
use crate::registry::{MetadataRegistry, Provenance, Registration};

/// Configuration for a [`Session`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Messages below this level are not dispatched.
    pub min_log_level: LogLevel,
    /// Whether construction through the session records provenance.
    pub interception_enabled: bool,
}

impl SessionConfig {
    /// Records provenance and logs at `Info` and above.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            min_log_level: LogLevel::Info,
            interception_enabled: true,
        }
    }

    /// Records provenance and logs only warnings and errors.
    #[must_use]
    pub const fn quiet() -> Self {
        Self {
            min_log_level: LogLevel::Warn,
            interception_enabled: true,
        }
    }

    /// Records provenance and logs everything.
    #[must_use]
    pub const fn verbose() -> Self {
        Self {
            min_log_level: LogLevel::Trace,
            interception_enabled: true,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// One instrumentation context over one engine.
#[derive(Debug)]
pub struct Session {
    registry: MetadataRegistry,
    interceptor: CreationInterceptor,
    clicks: ClickCache,
    exporter: TreeExporter,
    flush: FlushTap,
    logger: Logger,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

macro_rules! widget_constructors {
    ($($(#[$meta:meta])* $method:ident => $name:literal;)+) => {
        $(
            $(#[$meta])*
            #[track_caller]
            pub fn $method<E: UiEngine + ?Sized>(&mut self, engine: &mut E, parent: ObjHandle) -> ObjHandle {
                self.create(engine, $name, parent).unwrap_or(ObjHandle::NULL)
            }
        )+
    };
}

impl Session {
    /// Creates a session with the standard LVGL widget table.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self::with_widget_table(config, WidgetTable::lvgl())
    }

    /// Creates a session with a custom widget table.
    #[must_use]
    pub fn with_widget_table(config: SessionConfig, table: WidgetTable) -> Self {
        let mut interceptor = CreationInterceptor::new(table);
        interceptor.set_enabled(config.interception_enabled);
        Self {
            registry: MetadataRegistry::new(),
            interceptor,
            clicks: ClickCache::new(),
            exporter: TreeExporter::new(),
            flush: FlushTap::new(),
            logger: Logger::new(config.min_log_level),
        }
    }

    // -- Logging --

    /// Routes session log output to `sink`, replacing any previous sink.
    pub fn register_log_sink(&mut self, sink: impl LogSink + 'static) {
        self.logger.set_sink(sink);
    }

    /// Restores the default log destination.
    pub fn clear_log_sink(&mut self) {
        self.logger.clear_sink();
    }

    /// Returns the session logger.
    pub fn logger_mut(&mut self) -> &mut Logger {
        &mut self.logger
    }

    // -- Creation interception --

    /// Returns the provenance registry.
    #[must_use]
    pub fn registry(&self) -> &MetadataRegistry {
        &self.registry
    }

    /// Returns the provenance registry for editing.
    pub fn registry_mut(&mut self) -> &mut MetadataRegistry {
        &mut self.registry
    }

    /// Returns the creation interceptor.
    pub fn interceptor_mut(&mut self) -> &mut CreationInterceptor {
        &mut self.interceptor
    }

    /// Returns the registry record for `handle`.
    #[must_use]
    pub fn lookup(&self, handle: ObjHandle) -> Option<Provenance> {
        self.registry.lookup(handle)
    }

    /// Constructs the widget called `name` under `parent`, recording the
    /// caller's location.
    ///
    /// A null handle from the engine is returned as is.
    ///
    /// # Errors
    ///
    /// Returns [`InterceptError::UnknownWidget`] if `name` is not in the
    /// session's widget table.
    #[track_caller]
    pub fn create<E: UiEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        name: &str,
        parent: ObjHandle,
    ) -> Result<ObjHandle, InterceptError> {
        match self
            .interceptor
            .create(engine, &mut self.registry, name, parent)
        {
            Ok((handle, registration)) => {
                self.note_registration(handle, name, registration);
                Ok(handle)
            }
            Err(err) => {
                log_at!(self.logger, LogLevel::Error, "{err}");
                Err(err)
            }
        }
    }

    /// Runs an arbitrary constructor, recording the caller's location under
    /// `kind`.
    #[track_caller]
    pub fn create_with(&mut self, kind: &'static str, ctor: impl FnOnce() -> ObjHandle) -> ObjHandle {
        let (handle, registration) = if self.interceptor.is_enabled() {
            intercept(&mut self.registry, kind, ctor)
        } else {
            (ctor(), Registration::Ignored)
        };
        self.note_registration(handle, kind, registration);
        handle
    }

    widget_constructors! {
        /// Creates a plain container object.
        obj_create => "lv_obj_create";
        /// Creates a label.
        label_create => "lv_label_create";
        /// Creates a button.
        button_create => "lv_button_create";
        /// Creates an image.
        image_create => "lv_image_create";
        /// Creates an image through the legacy `lv_img_create` name.
        img_create => "lv_img_create";
        /// Creates a slider.
        slider_create => "lv_slider_create";
        /// Creates a switch.
        switch_create => "lv_switch_create";
        /// Creates a chart.
        chart_create => "lv_chart_create";
    }

    fn note_registration(&mut self, handle: ObjHandle, name: &str, registration: Registration) {
        match registration {
            Registration::Dropped => log_at!(
                self.logger,
                LogLevel::Warn,
                "registry full, provenance for {handle} ({name}) dropped"
            ),
            Registration::Ignored if handle.is_null() => log_at!(
                self.logger,
                LogLevel::Warn,
                "{name} returned a null handle"
            ),
            Registration::Overwritten => log_at!(
                self.logger,
                LogLevel::Debug,
                "{name} reused {handle}, provenance overwritten"
            ),
            _ => log_at!(self.logger, LogLevel::Debug, "{name} -> {handle}"),
        }
    }

    /// Writes the registry's diagnostic text dump to `out`.
    pub fn dump_registry(&self, out: &mut impl core::fmt::Write) -> core::fmt::Result {
        self.registry.write_dump(out)
    }

    /// Returns the registry's diagnostic text dump.
    #[must_use]
    pub fn dump_registry_string(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = self.registry.write_dump(&mut out);
        out
    }

    // -- Tree export --

    /// Routes tree snapshots to `sink`, replacing any previous sink.
    pub fn register_tree_export_sink(&mut self, sink: impl TreeSink + 'static) {
        self.exporter.set_sink(sink);
        log_at!(self.logger, LogLevel::Debug, "tree export sink registered");
    }

    /// Flattens the active screen and delivers it to the tree sink.
    ///
    /// # Errors
    ///
    /// See [`TreeExporter::export`].
    pub fn export_tree<E: UiEngine + ?Sized>(&mut self, engine: &E) -> Result<usize, ExportError> {
        let result = self.exporter.export(engine);
        self.note_export(&result);
        result
    }

    /// Like [`export_tree`](Self::export_tree), with provenance attached.
    ///
    /// # Errors
    ///
    /// See [`TreeExporter::export`].
    pub fn export_annotated_tree<E: UiEngine + ?Sized>(
        &mut self,
        engine: &E,
    ) -> Result<usize, ExportError> {
        let result = self.exporter.export_annotated(engine, &self.registry);
        self.note_export(&result);
        result
    }

    fn note_export(&mut self, result: &Result<usize, ExportError>) {
        match result {
            Ok(n) => log_at!(self.logger, LogLevel::Debug, "exported {n} nodes"),
            Err(err) => log_at!(self.logger, LogLevel::Warn, "tree export aborted: {err}"),
        }
    }

    // -- Flush regions --

    /// Routes flushed areas to `sink`, replacing any previous sink.
    pub fn register_flush_region_sink(&mut self, sink: impl FlushSink + 'static) {
        self.flush.register(sink);
        log_at!(self.logger, LogLevel::Debug, "flush region sink registered");
    }

    /// Stops forwarding flushed areas.
    pub fn clear_flush_region_sink(&mut self) {
        self.flush.clear();
        log_at!(self.logger, LogLevel::Debug, "flush region sink cleared");
    }

    /// Called by the engine's flush callback with the area being flushed.
    ///
    /// Returns `false` if no sink is registered. Not logged; this runs on
    /// every flush.
    pub fn invoke_flush_region(&mut self, area: &Area) -> bool {
        self.flush.invoke(area)
    }

    // -- Clickability --

    /// Forces every object on the active screen clickable, remembering the
    /// previous state. Returns the number of objects touched.
    pub fn make_all_clickable<E: UiEngine + ?Sized>(&mut self, engine: &mut E) -> usize {
        match engine.active_root() {
            Some(root) => self.make_clickable_from(engine, root),
            None => {
                log_at!(self.logger, LogLevel::Warn, "make_all_clickable: no active root");
                self.clicks.snapshot_and_force_clickable_from(engine, ObjHandle::NULL)
            }
        }
    }

    /// Forces every object under `root` clickable, remembering the
    /// previous state. Any earlier snapshot is discarded unrestored.
    pub fn make_clickable_from<E: UiEngine + ?Sized>(&mut self, engine: &mut E, root: ObjHandle) -> usize {
        if !self.clicks.is_empty() {
            log_at!(
                self.logger,
                LogLevel::Debug,
                "discarding unrestored click snapshot of {} objects",
                self.clicks.len()
            );
        }
        let n = self.clicks.snapshot_and_force_clickable_from(engine, root);
        log_at!(self.logger, LogLevel::Info, "made {n} objects clickable");
        n
    }

    /// Puts back the clickability recorded by the last snapshot.
    pub fn revert_clickability<E: UiEngine + ?Sized>(&mut self, engine: &mut E) -> RestoreSummary {
        let summary = self.clicks.restore(engine);
        if summary.stale > 0 {
            log_at!(
                self.logger,
                LogLevel::Warn,
                "skipped {} destroyed objects while restoring clickability",
                summary.stale
            );
        }
        log_at!(
            self.logger,
            LogLevel::Info,
            "restored clickability: {} cleared, {} unchanged",
            summary.restored,
            summary.unchanged
        );
        summary
    }

    // -- Inspection helpers --

    /// Returns the topmost visible object under `(x, y)` on the active screen.
    #[must_use]
    pub fn obj_at_point<E: UiEngine + ?Sized>(&self, engine: &E, x: i32, y: i32) -> Option<ObjHandle> {
        engine
            .active_root()
            .and_then(|root| probe::obj_at_point(engine, root, x, y))
    }

    /// Returns the text of a label; `None` for other widgets and stale handles.
    #[must_use]
    pub fn obj_text<'e, E: UiEngine + ?Sized>(&self, engine: &'e E, obj: ObjHandle) -> Option<&'e str> {
        engine.text(obj)
    }

    /// Shows or hides `obj`. Stale handles are ignored.
    pub fn set_hidden<E: UiEngine + ?Sized>(&mut self, engine: &mut E, obj: ObjHandle, hidden: bool) {
        if !engine.is_live(obj) {
            log_at!(self.logger, LogLevel::Debug, "set_hidden on stale {obj}");
            return;
        }
        if hidden {
            engine.add_flag(obj, ObjFlag::Hidden);
        } else {
            engine.clear_flag(obj, ObjFlag::Hidden);
        }
    }
}
