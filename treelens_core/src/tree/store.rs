// Copyright 2026 the Treelens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slot storage with allocation, topology, and property management.

use alloc::string::String;
use alloc::vec::Vec;

use crate::area::Area;
use crate::engine::{ObjFlag, UiEngine};
use crate::handle::ObjHandle;

/// Per-object boolean flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ObjFlags {
    /// Whether the object (and its subtree) is hidden.
    pub hidden: bool,
    /// Whether the object receives pointer input.
    pub clickable: bool,
}

impl ObjFlags {
    fn get(self, flag: ObjFlag) -> bool {
        match flag {
            ObjFlag::Hidden => self.hidden,
            ObjFlag::Clickable => self.clickable,
        }
    }

    fn set(&mut self, flag: ObjFlag, value: bool) {
        match flag {
            ObjFlag::Hidden => self.hidden = value,
            ObjFlag::Clickable => self.clickable = value,
        }
    }
}

/// Constructors the reference tree understands: `(constructor, class, clickable by default)`.
const CONSTRUCTORS: &[(&str, &str, bool)] = &[
    ("lv_obj_create", "lv_obj", true),
    ("lv_label_create", "lv_label", false),
    ("lv_button_create", "lv_button", true),
    ("lv_slider_create", "lv_slider", true),
    ("lv_switch_create", "lv_switch", true),
    ("lv_checkbox_create", "lv_checkbox", true),
    ("lv_dropdown_create", "lv_dropdown", true),
    ("lv_textarea_create", "lv_textarea", true),
    ("lv_calendar_create", "lv_calendar", true),
    ("lv_chart_create", "lv_chart", false),
    ("lv_list_create", "lv_list", true),
    ("lv_page_create", "lv_page", true),
    ("lv_tabview_create", "lv_tabview", true),
    ("lv_table_create", "lv_table", true),
    ("lv_tileview_create", "lv_tileview", true),
    ("lv_canvas_create", "lv_canvas", false),
    ("lv_colorwheel_create", "lv_colorwheel", true),
    ("lv_spinner_create", "lv_spinner", false),
    ("lv_preload_create", "lv_preload", false),
    ("lv_imgbtn_create", "lv_imgbtn", true),
    ("lv_line_create", "lv_line", false),
    ("lv_led_create", "lv_led", false),
    ("lv_lmeter_create", "lv_lmeter", false),
    ("lv_roller_create", "lv_roller", true),
    ("lv_btnmatrix_create", "lv_btnmatrix", true),
    ("lv_msgbox_create", "lv_msgbox", true),
    ("lv_menu_create", "lv_menu", true),
    ("lv_keyboard_create", "lv_keyboard", true),
    ("lv_spinbox_create", "lv_spinbox", true),
    ("lv_scale_create", "lv_scale", false),
    ("lv_objmask_create", "lv_objmask", false),
    ("lv_image_create", "lv_image", false),
];

/// Sentinel value indicating "no object" in slot index fields.
const INVALID: u32 = u32::MAX;

const SCREEN_CLASS: &str = "lv_obj";

/// The only class that carries text.
const LABEL_CLASS: &str = "lv_label";

/// Text a freshly created label shows.
pub const DEFAULT_LABEL_TEXT: &str = "Text";

fn lookup_constructor(ctor: &str) -> Option<(&'static str, bool)> {
    CONSTRUCTORS
        .iter()
        .find(|(name, _, _)| *name == ctor)
        .map(|&(_, class, clickable)| (class, clickable))
}

/// Slot storage for a retained-mode object tree.
///
/// Objects are addressed by [`ObjHandle`]s derived from their slot index.
/// Destroyed objects are recycled via a free list, most recently freed
/// first, so a handle is reused by the very next creation after a destroy.
#[derive(Debug)]
pub struct ObjTree {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Properties --
    pub(crate) local_area: Vec<Area>,
    pub(crate) flags: Vec<ObjFlags>,
    pub(crate) class: Vec<&'static str>,
    pub(crate) user_data: Vec<usize>,
    pub(crate) text: Vec<String>,

    // -- Allocation --
    pub(crate) alive: Vec<bool>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,
    pub(crate) live_count: usize,
    pub(crate) capacity_limit: Option<usize>,

    pub(crate) screen: u32,
}

impl ObjTree {
    /// Creates a tree holding a single screen root of the given size.
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        let mut tree = Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            local_area: Vec::new(),
            flags: Vec::new(),
            class: Vec::new(),
            user_data: Vec::new(),
            text: Vec::new(),
            alive: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            live_count: 0,
            capacity_limit: None,
            screen: INVALID,
        };
        let screen = tree.alloc(SCREEN_CLASS, false);
        tree.local_area[screen as usize] = Area::from_origin_size(0, 0, width, height);
        tree.screen = screen;
        tree
    }

    /// Limits the number of simultaneously live objects (screen included).
    ///
    /// Once the limit is reached, [`create`](Self::create) returns
    /// [`ObjHandle::NULL`], the way an engine out of heap would.
    #[must_use]
    pub fn with_capacity_limit(mut self, limit: usize) -> Self {
        self.capacity_limit = Some(limit);
        self
    }

    /// Returns the screen root.
    #[must_use]
    pub fn screen(&self) -> ObjHandle {
        Self::handle_of(self.screen)
    }

    /// Returns the number of live objects, screen included.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live_count
    }

    // -- Allocation API --

    /// Creates an object with constructor `ctor` as the last child of `parent`.
    ///
    /// Returns [`ObjHandle::NULL`] if the constructor is unknown, `parent` is
    /// stale, or the capacity limit is reached.
    pub fn create(&mut self, ctor: &str, parent: ObjHandle) -> ObjHandle {
        let Some(p) = self.slot(parent) else {
            return ObjHandle::NULL;
        };
        let Some((class, clickable)) = lookup_constructor(ctor) else {
            return ObjHandle::NULL;
        };
        if self
            .capacity_limit
            .is_some_and(|limit| self.live_count >= limit)
        {
            return ObjHandle::NULL;
        }

        let c = self.alloc(class, clickable);
        self.link_last(p, c);
        Self::handle_of(c)
    }

    /// Destroys `obj` and its entire subtree, freeing their slots for reuse.
    ///
    /// Destroying the screen or a stale handle is a no-op. Returns the number
    /// of objects destroyed.
    pub fn destroy(&mut self, obj: ObjHandle) -> usize {
        match self.slot(obj) {
            Some(idx) if idx != self.screen => {
                self.unlink_from_parent(idx);
                self.free_subtree(idx)
            }
            _ => 0,
        }
    }

    /// Destroys every child of `obj`, keeping `obj` itself.
    ///
    /// Returns the number of objects destroyed.
    pub fn clean(&mut self, obj: ObjHandle) -> usize {
        let Some(idx) = self.slot(obj) else {
            return 0;
        };
        let mut destroyed = 0;
        while self.first_child[idx as usize] != INVALID {
            let child = self.first_child[idx as usize];
            self.unlink_from_parent(child);
            destroyed += self.free_subtree(child);
        }
        destroyed
    }

    // -- Topology API --

    /// Returns the parent of an object, if any.
    #[must_use]
    pub fn parent(&self, obj: ObjHandle) -> Option<ObjHandle> {
        let idx = self.slot(obj)?;
        let p = self.parent[idx as usize];
        (p != INVALID).then(|| Self::handle_of(p))
    }

    /// Returns an iterator over the direct children of an object.
    ///
    /// A stale handle yields no children.
    #[must_use]
    pub fn children(&self, obj: ObjHandle) -> Children<'_> {
        let cursor = self
            .slot(obj)
            .map_or(INVALID, |idx| self.first_child[idx as usize]);
        Children {
            next_sibling: &self.next_sibling,
            cursor,
        }
    }

    /// Moves `obj` to be the last child of `new_parent`.
    ///
    /// Ignored if either handle is stale, `obj` is the screen, or
    /// `new_parent` lies inside `obj`'s subtree.
    pub fn reparent(&mut self, obj: ObjHandle, new_parent: ObjHandle) {
        let (Some(c), Some(p)) = (self.slot(obj), self.slot(new_parent)) else {
            return;
        };
        if c == self.screen || self.is_ancestor_or_self(c, p) {
            return;
        }
        self.unlink_from_parent(c);
        self.link_last(p, c);
    }

    // -- Properties --

    /// Sets the area of `obj` relative to its parent's top-left corner.
    pub fn set_area(&mut self, obj: ObjHandle, area: Area) {
        if let Some(idx) = self.slot(obj) {
            self.local_area[idx as usize] = area;
        }
    }

    /// Returns the area of `obj` relative to its parent.
    #[must_use]
    pub fn local_area(&self, obj: ObjHandle) -> Option<Area> {
        self.slot(obj).map(|idx| self.local_area[idx as usize])
    }

    /// Returns the flags of `obj`.
    #[must_use]
    pub fn flags(&self, obj: ObjHandle) -> Option<ObjFlags> {
        self.slot(obj).map(|idx| self.flags[idx as usize])
    }

    /// Shows or hides `obj`.
    pub fn set_hidden(&mut self, obj: ObjHandle, hidden: bool) {
        if let Some(idx) = self.slot(obj) {
            self.flags[idx as usize].hidden = hidden;
        }
    }

    /// Replaces the text of a label. Ignored for other classes.
    pub fn set_text(&mut self, obj: ObjHandle, text: &str) {
        if let Some(idx) = self.slot(obj).filter(|&i| self.class[i as usize] == LABEL_CLASS) {
            let slot = &mut self.text[idx as usize];
            slot.clear();
            slot.push_str(text);
        }
    }

    /// Stores a user-data word on `obj`; it is reported as the debug tag.
    pub fn set_user_data(&mut self, obj: ObjHandle, data: usize) {
        if let Some(idx) = self.slot(obj) {
            self.user_data[idx as usize] = data;
        }
    }

    // -- Internal helpers --

    fn handle_of(idx: u32) -> ObjHandle {
        ObjHandle::from_raw(idx as usize + 1)
    }

    /// Resolves a handle to a live slot index.
    fn slot(&self, obj: ObjHandle) -> Option<u32> {
        let idx = u32::try_from(obj.raw().checked_sub(1)?).ok()?;
        (idx < self.len && self.alive[idx as usize]).then_some(idx)
    }

    fn alloc(&mut self, class: &'static str, clickable: bool) -> u32 {
        let flags = ObjFlags {
            hidden: false,
            clickable,
        };
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            let i = idx as usize;
            self.parent[i] = INVALID;
            self.first_child[i] = INVALID;
            self.next_sibling[i] = INVALID;
            self.prev_sibling[i] = INVALID;
            self.local_area[i] = Area::default();
            self.flags[i] = flags;
            self.class[i] = class;
            self.user_data[i] = 0;
            self.text[i].clear();
            if class == LABEL_CLASS {
                self.text[i].push_str(DEFAULT_LABEL_TEXT);
            }
            self.alive[i] = true;
            idx
        } else {
            // Allocate a new slot.
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.local_area.push(Area::default());
            self.flags.push(flags);
            self.class.push(class);
            self.user_data.push(0);
            self.text.push(if class == LABEL_CLASS {
                String::from(DEFAULT_LABEL_TEXT)
            } else {
                String::new()
            });
            self.alive.push(true);
            idx
        };
        self.live_count += 1;
        idx
    }

    fn link_last(&mut self, p: u32, c: u32) {
        self.parent[c as usize] = p;
        self.prev_sibling[c as usize] = INVALID;
        self.next_sibling[c as usize] = INVALID;

        if self.first_child[p as usize] == INVALID {
            self.first_child[p as usize] = c;
        } else {
            // Walk to last child.
            let mut last = self.first_child[p as usize];
            while self.next_sibling[last as usize] != INVALID {
                last = self.next_sibling[last as usize];
            }
            self.next_sibling[last as usize] = c;
            self.prev_sibling[c as usize] = last;
        }
    }

    /// Removes `idx` from its parent's child list.
    fn unlink_from_parent(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        if p == INVALID {
            return;
        }
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            // Was first child.
            self.first_child[p as usize] = next;
        }

        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
    }

    /// Frees an already unlinked subtree, children before parents.
    fn free_subtree(&mut self, root: u32) -> usize {
        let mut stack = alloc::vec![root];
        let mut order = Vec::new();
        while let Some(idx) = stack.pop() {
            order.push(idx);
            let mut child = self.first_child[idx as usize];
            while child != INVALID {
                stack.push(child);
                child = self.next_sibling[child as usize];
            }
        }
        // Parents were pushed first; freeing in reverse puts the root on top
        // of the free list so its handle is the first to be reused.
        for &idx in order.iter().rev() {
            self.alive[idx as usize] = false;
            self.first_child[idx as usize] = INVALID;
            self.parent[idx as usize] = INVALID;
            self.free_list.push(idx);
        }
        self.live_count -= order.len();
        order.len()
    }

    fn is_ancestor_or_self(&self, ancestor: u32, mut idx: u32) -> bool {
        while idx != INVALID {
            if idx == ancestor {
                return true;
            }
            idx = self.parent[idx as usize];
        }
        false
    }

    fn absolute_area(&self, idx: u32) -> Area {
        let mut area = self.local_area[idx as usize];
        let mut p = self.parent[idx as usize];
        while p != INVALID {
            let origin = self.local_area[p as usize];
            area = area.translate(origin.x1, origin.y1);
            p = self.parent[p as usize];
        }
        area
    }
}

impl UiEngine for ObjTree {
    fn active_root(&self) -> Option<ObjHandle> {
        Some(self.screen())
    }

    fn child_count(&self, obj: ObjHandle) -> usize {
        self.children(obj).count()
    }

    fn child(&self, obj: ObjHandle, index: usize) -> Option<ObjHandle> {
        self.children(obj).nth(index)
    }

    fn for_each_child(&self, obj: ObjHandle, f: &mut dyn FnMut(ObjHandle)) {
        self.children(obj).for_each(f);
    }

    fn coords(&self, obj: ObjHandle) -> Option<Area> {
        self.slot(obj).map(|idx| self.absolute_area(idx))
    }

    fn has_flag(&self, obj: ObjHandle, flag: ObjFlag) -> bool {
        self.slot(obj)
            .is_some_and(|idx| self.flags[idx as usize].get(flag))
    }

    fn add_flag(&mut self, obj: ObjHandle, flag: ObjFlag) {
        if let Some(idx) = self.slot(obj) {
            self.flags[idx as usize].set(flag, true);
        }
    }

    fn clear_flag(&mut self, obj: ObjHandle, flag: ObjFlag) {
        if let Some(idx) = self.slot(obj) {
            self.flags[idx as usize].set(flag, false);
        }
    }

    fn class_name(&self, obj: ObjHandle) -> Option<&'static str> {
        self.slot(obj).map(|idx| self.class[idx as usize])
    }

    fn text(&self, obj: ObjHandle) -> Option<&str> {
        self.slot(obj)
            .filter(|&i| self.class[i as usize] == LABEL_CLASS)
            .map(|i| self.text[i as usize].as_str())
    }

    fn is_live(&self, obj: ObjHandle) -> bool {
        self.slot(obj).is_some()
    }

    fn construct(&mut self, ctor: &'static str, parent: ObjHandle) -> ObjHandle {
        self.create(ctor, parent)
    }

    fn debug_tag(&self, obj: ObjHandle) -> usize {
        self.slot(obj).map_or(0, |idx| self.user_data[idx as usize])
    }
}

/// Iterator over the direct children of an object, in creation order.
///
/// Created by [`ObjTree::children`].
#[derive(Clone, Debug)]
pub struct Children<'a> {
    next_sibling: &'a [u32],
    cursor: u32,
}

impl Iterator for Children<'_> {
    type Item = ObjHandle;

    fn next(&mut self) -> Option<ObjHandle> {
        let idx = self.cursor;
        (idx != INVALID).then(|| {
            self.cursor = self.next_sibling[idx as usize];
            ObjTree::handle_of(idx)
        })
    }
}
