// Copyright 2026 the Treelens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree-wide clickability override.
//!
//! An inspector needs to pick any object with the pointer, including labels
//! and decorations that normally ignore input. [`ClickCache`] records each
//! object's clickable flag, forces the flag on across a subtree, and later
//! puts back the objects that were not clickable before.
//!
//! There is one snapshot at a time. Taking a new snapshot discards the old
//! one without restoring it, so values from the earlier snapshot are lost.

use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::engine::{ObjFlag, UiEngine};
use crate::handle::ObjHandle;

/// Result of [`ClickCache::restore`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RestoreSummary {
    /// Objects whose clickable flag was cleared again.
    pub restored: usize,
    /// Objects that were clickable before and were left alone.
    pub unchanged: usize,
    /// Cached handles no longer live in the engine; skipped.
    pub stale: usize,
}

/// Snapshot of original clickable flags, keyed by handle.
#[derive(Debug, Default)]
pub struct ClickCache {
    original: HashMap<ObjHandle, bool>,
}

impl ClickCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.original.len()
    }

    /// Returns `true` if no snapshot is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.original.is_empty()
    }

    /// Returns the cached original flag for `obj`.
    #[must_use]
    pub fn original(&self, obj: ObjHandle) -> Option<bool> {
        self.original.get(&obj).copied()
    }

    /// Drops any previous snapshot, then records and forces clickable every
    /// object reachable from `root`.
    ///
    /// Returns the number of objects visited.
    pub fn snapshot_and_force_clickable_from<E: UiEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        root: ObjHandle,
    ) -> usize {
        self.original.clear();
        if root.is_null() {
            return 0;
        }

        let mut stack: Vec<ObjHandle> = alloc::vec![root];
        while let Some(obj) = stack.pop() {
            // A malformed engine could enumerate an object twice; the first
            // observation is the original value.
            if self.original.contains_key(&obj) {
                continue;
            }
            self.original
                .insert(obj, engine.has_flag(obj, ObjFlag::Clickable));
            engine.add_flag(obj, ObjFlag::Clickable);

            engine.for_each_child(obj, &mut |child| stack.push(child));
        }
        self.original.len()
    }

    /// Clears the clickable flag on every cached object that was not
    /// clickable before, then empties the cache.
    ///
    /// Handles the engine no longer considers live are skipped.
    pub fn restore<E: UiEngine + ?Sized>(&mut self, engine: &mut E) -> RestoreSummary {
        let mut summary = RestoreSummary::default();
        for (obj, was_clickable) in self.original.drain() {
            if was_clickable {
                summary.unchanged += 1;
            } else if engine.is_live(obj) {
                engine.clear_flag(obj, ObjFlag::Clickable);
                summary.restored += 1;
            } else {
                summary.stale += 1;
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::ObjTree;

    fn sample() -> (ObjTree, [ObjHandle; 4]) {
        let mut tree = ObjTree::new(320, 240);
        let screen = tree.screen();
        let panel = tree.create("lv_obj_create", screen);
        let label = tree.create("lv_label_create", panel);
        let button = tree.create("lv_button_create", panel);
        (tree, [screen, panel, label, button])
    }

    fn clickable(tree: &ObjTree, objs: &[ObjHandle]) -> Vec<bool> {
        objs.iter()
            .map(|&o| tree.has_flag(o, ObjFlag::Clickable))
            .collect()
    }

    #[test]
    fn forces_every_node_clickable() {
        let (mut tree, objs) = sample();
        let mut cache = ClickCache::new();
        assert_eq!(cache.snapshot_and_force_clickable_from(&mut tree, objs[0]), 4);
        assert!(clickable(&tree, &objs).iter().all(|&c| c));
        assert_eq!(cache.original(objs[2]), Some(false));
    }

    #[test]
    fn restore_round_trips() {
        let (mut tree, objs) = sample();
        let before = clickable(&tree, &objs);
        let mut cache = ClickCache::new();
        cache.snapshot_and_force_clickable_from(&mut tree, objs[0]);
        let summary = cache.restore(&mut tree);

        assert_eq!(clickable(&tree, &objs), before);
        assert_eq!(summary.restored + summary.unchanged, 4);
        assert!(cache.is_empty());
    }

    #[test]
    fn restore_without_snapshot_is_a_no_op() {
        let (mut tree, objs) = sample();
        let before = clickable(&tree, &objs);
        let mut cache = ClickCache::new();
        assert_eq!(cache.restore(&mut tree), RestoreSummary::default());
        assert_eq!(cache.restore(&mut tree), RestoreSummary::default());
        assert_eq!(clickable(&tree, &objs), before);
    }

    #[test]
    fn second_snapshot_loses_the_first() {
        let (mut tree, objs) = sample();
        let mut cache = ClickCache::new();
        cache.snapshot_and_force_clickable_from(&mut tree, objs[0]);
        cache.snapshot_and_force_clickable_from(&mut tree, objs[0]);
        cache.restore(&mut tree);

        // The second snapshot saw everything already clickable.
        assert!(clickable(&tree, &objs).iter().all(|&c| c));
    }

    #[test]
    fn destroyed_objects_are_skipped_on_restore() {
        let (mut tree, objs) = sample();
        let mut cache = ClickCache::new();
        cache.snapshot_and_force_clickable_from(&mut tree, objs[0]);
        tree.destroy(objs[2]);

        let summary = cache.restore(&mut tree);
        assert_eq!(summary.stale, 1);
        assert!(!tree.has_flag(objs[0], ObjFlag::Clickable));
    }

    #[test]
    fn snapshot_of_a_subtree_leaves_the_rest_alone() {
        let (mut tree, objs) = sample();
        let mut cache = ClickCache::new();
        assert_eq!(cache.snapshot_and_force_clickable_from(&mut tree, objs[1]), 3);
        assert!(!tree.has_flag(objs[0], ObjFlag::Clickable));
        assert_eq!(cache.original(objs[0]), None);
    }
}
