// Copyright 2026 the Treelens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests over randomly built trees.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use hashbrown::HashSet;
use proptest::prelude::*;

use crate::click::ClickCache;
use crate::engine::{ObjFlag, UiEngine};
use crate::export::{FlatNode, TreeExporter};
use crate::handle::ObjHandle;
use crate::registry::{MetadataRegistry, Provenance};
use crate::tree::ObjTree;

const CTORS: [&str; 4] = [
    "lv_obj_create",
    "lv_label_create",
    "lv_button_create",
    "lv_image_create",
];

#[derive(Clone, Debug)]
enum Op {
    Create { parent: usize, ctor: usize },
    Destroy { target: usize },
    Toggle { target: usize, clickable: bool },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (any::<usize>(), 0..CTORS.len()).prop_map(|(parent, ctor)| Op::Create { parent, ctor }),
        1 => any::<usize>().prop_map(|target| Op::Destroy { target }),
        1 => (any::<usize>(), any::<bool>()).prop_map(|(target, clickable)| Op::Toggle { target, clickable }),
    ]
}

/// Replays `ops`, picking targets among the objects that are live at each step.
fn build(ops: &[Op]) -> ObjTree {
    let mut tree = ObjTree::new(320, 240);
    let mut live = alloc::vec![tree.screen()];
    for op in ops {
        match *op {
            Op::Create { parent, ctor } => {
                let parent = live[parent % live.len()];
                let obj = tree.create(CTORS[ctor], parent);
                if !obj.is_null() {
                    live.push(obj);
                }
            }
            Op::Destroy { target } => {
                tree.destroy(live[target % live.len()]);
                live.retain(|&h| tree.is_live(h));
            }
            Op::Toggle { target, clickable } => {
                let obj = live[target % live.len()];
                if clickable {
                    tree.add_flag(obj, ObjFlag::Clickable);
                } else {
                    tree.clear_flag(obj, ObjFlag::Clickable);
                }
            }
        }
    }
    tree
}

fn reachable(tree: &ObjTree) -> Vec<ObjHandle> {
    let mut out = Vec::new();
    let mut stack = alloc::vec![tree.screen()];
    while let Some(obj) = stack.pop() {
        out.push(obj);
        stack.extend(tree.children(obj));
    }
    out
}

proptest! {
    #[test]
    fn registry_keeps_the_latest_record(writes in prop::collection::vec((0_usize..8, 0_u32..1000), 0..64)) {
        let mut registry = MetadataRegistry::new();
        let location = core::panic::Location::caller();
        let mut expected = alloc::collections::BTreeMap::new();
        for &(raw, line) in &writes {
            let handle = ObjHandle::from_raw(raw);
            let kind = CTORS[line as usize % CTORS.len()];
            registry.register(Provenance { line, ..Provenance::at(handle, location, kind) });
            if raw != 0 {
                expected.insert(raw, line);
            }
        }
        prop_assert_eq!(registry.len(), expected.len());
        for (&raw, &line) in &expected {
            prop_assert_eq!(registry.lookup(ObjHandle::from_raw(raw)).map(|p| p.line), Some(line));
        }
        prop_assert!(registry.lookup(ObjHandle::NULL).is_none());
    }

    #[test]
    fn export_is_a_pre_order_of_the_live_tree(ops in prop::collection::vec(op(), 0..80)) {
        let tree = build(&ops);
        let captured: Rc<RefCell<Vec<FlatNode>>> = Rc::default();
        let sink = Rc::clone(&captured);
        let mut exporter = TreeExporter::new();
        exporter.set_sink(move |nodes: &[FlatNode]| *sink.borrow_mut() = nodes.to_vec());

        let count = exporter.export(&tree);
        prop_assert_eq!(count, Ok(tree.live_count()));

        let nodes = captured.borrow();
        prop_assert_eq!(nodes.len(), tree.live_count());
        prop_assert_eq!(nodes[0].handle, tree.screen());
        prop_assert!(nodes[0].parent.is_null());

        let mut seen = HashSet::new();
        for node in nodes.iter() {
            if !node.parent.is_null() {
                prop_assert!(seen.contains(&node.parent));
            }
            prop_assert!(seen.insert(node.handle));
        }
    }

    #[test]
    fn click_snapshot_round_trips(ops in prop::collection::vec(op(), 0..80)) {
        let mut tree = build(&ops);
        let objs = reachable(&tree);
        let before: Vec<bool> = objs.iter().map(|&h| tree.has_flag(h, ObjFlag::Clickable)).collect();

        let mut cache = ClickCache::new();
        let root = tree.screen();
        prop_assert_eq!(cache.snapshot_and_force_clickable_from(&mut tree, root), objs.len());
        prop_assert!(objs.iter().all(|&h| tree.has_flag(h, ObjFlag::Clickable)));

        cache.restore(&mut tree);
        let after: Vec<bool> = objs.iter().map(|&h| tree.has_flag(h, ObjFlag::Clickable)).collect();
        prop_assert_eq!(before, after);
        prop_assert!(cache.is_empty());
    }
}
