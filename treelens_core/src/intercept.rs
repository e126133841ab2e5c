// Copyright 2026 the Treelens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Creation interception.
//!
//! Application code builds widgets through explicit wrappers instead of
//! calling engine constructors directly. A wrapper runs the real constructor,
//! records the caller's source location and the constructor name in the
//! [`MetadataRegistry`], and hands back the engine's handle untouched.
//!
//! Which logical widget names exist, and which real constructor each one
//! runs, is plain data in a [`WidgetTable`]. Two names may share one real
//! constructor (an alias); both record the real constructor's name, so the
//! registry content does not depend on which spelling the caller used.
//!
//! All wrappers are `#[track_caller]`: the recorded location is that of the
//! code that asked for the widget, even through several wrapper layers.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::engine::UiEngine;
use crate::handle::ObjHandle;
use crate::registry::{MetadataRegistry, Provenance, Registration};

/// Errors from [`CreationInterceptor::create`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InterceptError {
    /// The logical widget name is not in the table.
    #[error("no constructor registered for widget kind `{0}`")]
    UnknownWidget(String),
}

/// One logical widget name and the real constructor it runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WidgetEntry {
    /// The name callers use.
    pub name: &'static str,
    /// The engine constructor that is actually run.
    pub ctor: &'static str,
}

impl WidgetEntry {
    /// Returns `true` if `name` differs from the real constructor.
    #[must_use]
    pub fn is_alias(&self) -> bool {
        self.name != self.ctor
    }
}

/// Widgets whose logical name is also their real constructor.
const LVGL_WIDGETS: &[&str] = &[
    "lv_obj_create",
    "lv_label_create",
    "lv_button_create",
    "lv_slider_create",
    "lv_switch_create",
    "lv_checkbox_create",
    "lv_dropdown_create",
    "lv_textarea_create",
    "lv_calendar_create",
    "lv_chart_create",
    "lv_list_create",
    "lv_page_create",
    "lv_tabview_create",
    "lv_table_create",
    "lv_tileview_create",
    "lv_canvas_create",
    "lv_colorwheel_create",
    "lv_spinner_create",
    "lv_preload_create",
    "lv_imgbtn_create",
    "lv_line_create",
    "lv_led_create",
    "lv_lmeter_create",
    "lv_roller_create",
    "lv_btnmatrix_create",
    "lv_msgbox_create",
    "lv_menu_create",
    "lv_keyboard_create",
    "lv_spinbox_create",
    "lv_scale_create",
    "lv_objmask_create",
];

/// `(alias, real)` pairs.
const LVGL_ALIASES: &[(&str, &str)] = &[("lv_img_create", "lv_image_create")];

/// Mapping from logical widget names to real constructors.
#[derive(Clone, Debug, Default)]
pub struct WidgetTable {
    entries: Vec<WidgetEntry>,
}

impl WidgetTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard LVGL widget set, including the `lv_img_create` alias.
    #[must_use]
    pub fn lvgl() -> Self {
        let mut table = Self::new();
        for &name in LVGL_WIDGETS {
            table.insert(name);
        }
        for &(alias, real) in LVGL_ALIASES {
            table.insert(real);
            table.alias(alias, real);
        }
        table
    }

    /// Adds a widget whose logical name is its real constructor.
    pub fn insert(&mut self, name: &'static str) {
        self.alias(name, name);
    }

    /// Adds (or retargets) `alias` so that it runs `ctor`.
    pub fn alias(&mut self, alias: &'static str, ctor: &'static str) {
        let entry = WidgetEntry { name: alias, ctor };
        match self.entries.iter_mut().find(|e| e.name == alias) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Removes a logical name. Returns `false` if it was not present.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.name != name);
        self.entries.len() != before
    }

    /// Returns the real constructor for a logical name.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&'static str> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.ctor)
    }

    /// Iterates over all entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &WidgetEntry> + '_ {
        self.entries.iter()
    }

    /// Number of logical names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Runs `ctor` and records the caller's location under `kind`.
///
/// The handle is returned exactly as `ctor` produced it. A null handle is
/// not registered.
#[track_caller]
pub fn intercept(
    registry: &mut MetadataRegistry,
    kind: &'static str,
    ctor: impl FnOnce() -> ObjHandle,
) -> (ObjHandle, Registration) {
    let handle = ctor();
    let registration = registry.register(Provenance::here(handle, kind));
    (handle, registration)
}

/// Table-driven constructor wrapper.
///
/// Interception can be switched off, in which case [`create`](Self::create)
/// still resolves names and constructs objects but records nothing.
#[derive(Clone, Debug)]
pub struct CreationInterceptor {
    table: WidgetTable,
    enabled: bool,
}

impl Default for CreationInterceptor {
    fn default() -> Self {
        Self::new(WidgetTable::lvgl())
    }
}

impl CreationInterceptor {
    /// Creates an enabled interceptor over `table`.
    #[must_use]
    pub fn new(table: WidgetTable) -> Self {
        Self {
            table,
            enabled: true,
        }
    }

    /// Returns the widget table.
    #[must_use]
    pub fn table(&self) -> &WidgetTable {
        &self.table
    }

    /// Returns the widget table for editing.
    pub fn table_mut(&mut self) -> &mut WidgetTable {
        &mut self.table
    }

    /// Returns whether construction is being recorded.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turns recording on or off.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Constructs the widget called `name` under `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`InterceptError::UnknownWidget`] if `name` is not in the
    /// table. Nothing is constructed in that case.
    #[track_caller]
    pub fn create<E: UiEngine + ?Sized>(
        &self,
        engine: &mut E,
        registry: &mut MetadataRegistry,
        name: &str,
        parent: ObjHandle,
    ) -> Result<(ObjHandle, Registration), InterceptError> {
        let ctor = self
            .table
            .resolve(name)
            .ok_or_else(|| InterceptError::UnknownWidget(name.to_string()))?;
        if !self.enabled {
            return Ok((engine.construct(ctor, parent), Registration::Ignored));
        }
        Ok(intercept(registry, ctor, || engine.construct(ctor, parent)))
    }
}
