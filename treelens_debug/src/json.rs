// Copyright 2026 the Treelens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON renderings for host tools.
//!
//! Handles are written as hex strings (`"0x2a"`) so they survive consumers
//! that parse numbers as doubles.

use serde_json::{Value, json};

use treelens_core::ObjHandle;
use treelens_core::export::FlatNode;
use treelens_core::registry::{MetadataRegistry, Provenance};

use crate::snapshot::{OwnedNode, TreeNode};

fn handle(h: ObjHandle) -> Value {
    Value::String(h.to_string())
}

fn provenance(p: &Provenance) -> Value {
    json!({
        "obj": handle(p.handle),
        "file": p.file,
        "line": p.line,
        "helper": p.kind,
    })
}

/// One flat node as a JSON object.
#[must_use]
pub fn node_to_json(node: &FlatNode) -> Value {
    json!({
        "handle": handle(node.handle),
        "parent": handle(node.parent),
        "class": node.class_name,
        "x": node.x,
        "y": node.y,
        "width": node.width,
        "height": node.height,
        "hidden": node.hidden,
        "debug_tag": node.debug_tag,
    })
}

fn owned_to_json(owned: &OwnedNode, children: Vec<Value>) -> Value {
    let mut value = node_to_json(&owned.node);
    if let Value::Object(map) = &mut value {
        if let Some(text) = &owned.text {
            map.insert("text".into(), Value::String(text.clone()));
        }
        if let Some(p) = owned.provenance {
            map.insert("created_at".into(), provenance(&p));
        }
        map.insert("children".into(), Value::Array(children));
    }
    value
}

/// A flat export as a JSON array, in export order.
#[must_use]
pub fn tree_to_json(nodes: &[FlatNode]) -> Value {
    Value::Array(nodes.iter().map(node_to_json).collect())
}

/// A rebuilt hierarchy as nested JSON objects with a `children` array.
#[must_use]
pub fn hierarchy_to_json(tree: &TreeNode) -> Value {
    // Each frame holds a node and the JSON of the children converted so far.
    let mut stack: Vec<(&TreeNode, Vec<Value>)> = vec![(tree, Vec::new())];
    loop {
        let next = stack
            .last()
            .and_then(|&(node, ref done)| node.children.get(done.len()));
        if let Some(child) = next {
            stack.push((child, Vec::with_capacity(child.children.len())));
            continue;
        }
        let Some((node, done)) = stack.pop() else {
            return Value::Null;
        };
        let value = owned_to_json(&node.node, done);
        match stack.last_mut() {
            Some((_, siblings)) => siblings.push(value),
            None => return value,
        }
    }
}

/// The registry contents as a JSON array, in first-registration order.
#[must_use]
pub fn registry_to_json(registry: &MetadataRegistry) -> Value {
    Value::Array(registry.iter().map(provenance).collect())
}

#[cfg(test)]
mod tests {
    use treelens_core::export::TreeSink;
    use treelens_core::tree::ObjTree;
    use treelens_core::{Area, Session, SessionConfig};

    use super::*;
    use crate::snapshot::TreeSnapshot;

    #[test]
    fn flat_node_shape() {
        let node = FlatNode {
            handle: ObjHandle::from_raw(0x2a),
            parent: ObjHandle::NULL,
            class_name: "lv_obj",
            x: 0,
            y: 0,
            width: 320,
            height: 240,
            hidden: false,
            debug_tag: 7,
        };
        assert_eq!(
            tree_to_json(&[node]),
            json!([{
                "handle": "0x2a",
                "parent": "0x0",
                "class": "lv_obj",
                "x": 0,
                "y": 0,
                "width": 320,
                "height": 240,
                "hidden": false,
                "debug_tag": 7,
            }])
        );
    }

    #[test]
    fn label_text_is_included() {
        let mut tree = ObjTree::new(320, 240);
        let mut session = Session::new(SessionConfig::quiet());
        let screen = tree.screen();
        let label = session.label_create(&mut tree, screen);
        tree.set_text(label, "Humidity 40%");

        let snapshot = TreeSnapshot::new();
        session.register_tree_export_sink(snapshot.clone());
        session.export_tree(&tree).unwrap();
        snapshot.capture_text(&tree);
        let value = hierarchy_to_json(&snapshot.tree().unwrap());

        assert!(value.get("text").is_none());
        assert_eq!(value["children"][0]["text"], "Humidity 40%");
    }

    #[test]
    fn deep_hierarchy_converts_iteratively() {
        const DEPTH: usize = 100_000;
        let nodes: Vec<OwnedNode> = snapshot_chain(DEPTH);
        let tree = crate::snapshot::build_tree(&nodes).unwrap();
        let value = hierarchy_to_json(&tree);

        let mut depth = 1;
        let mut cursor = &value;
        while let Some(child) = cursor["children"].get(0) {
            cursor = child;
            depth += 1;
        }
        assert_eq!(depth, DEPTH);
        assert_eq!(cursor["handle"], ObjHandle::from_raw(DEPTH).to_string());
        // serde_json drops nested values recursively.
        std::mem::forget(value);
    }

    fn snapshot_chain(depth: usize) -> Vec<OwnedNode> {
        let snapshot = TreeSnapshot::new();
        let flat: Vec<FlatNode> = (1..=depth)
            .map(|i| FlatNode {
                handle: ObjHandle::from_raw(i),
                parent: ObjHandle::from_raw(i - 1),
                class_name: "lv_obj",
                x: 0,
                y: 0,
                width: 1,
                height: 1,
                hidden: false,
                debug_tag: 0,
            })
            .collect();
        let mut sink = snapshot.clone();
        sink.on_tree(&flat);
        snapshot.nodes()
    }

    #[test]
    fn registry_entries_in_order() {
        let mut tree = ObjTree::new(320, 240);
        let mut session = Session::new(SessionConfig::quiet());
        let screen = tree.screen();
        let a = session.obj_create(&mut tree, screen);
        let b = session.label_create(&mut tree, a);

        let value = registry_to_json(session.registry());
        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["obj"], a.to_string());
        assert_eq!(entries[0]["helper"], "lv_obj_create");
        assert_eq!(entries[1]["obj"], b.to_string());
        assert_eq!(entries[1]["helper"], "lv_label_create");
        assert!(entries[1]["file"].as_str().unwrap().ends_with("json.rs"));
    }

    #[test]
    fn hierarchy_nests_children() {
        let mut tree = ObjTree::new(320, 240);
        let mut session = Session::new(SessionConfig::quiet());
        let screen = tree.screen();
        let card = session.obj_create(&mut tree, screen);
        tree.set_area(card, Area::from_origin_size(10, 20, 100, 50));
        session.button_create(&mut tree, card);

        let snapshot = TreeSnapshot::new();
        session.register_tree_export_sink(snapshot.clone());
        session.export_annotated_tree(&tree).unwrap();
        let value = hierarchy_to_json(&snapshot.tree().unwrap());

        assert_eq!(value["class"], "lv_obj");
        assert!(value.get("created_at").is_none());
        let card_json = &value["children"][0];
        assert_eq!(card_json["x"], 10);
        assert_eq!(card_json["width"], 100);
        assert_eq!(card_json["created_at"]["helper"], "lv_obj_create");
        assert_eq!(card_json["children"][0]["class"], "lv_button");
        assert_eq!(card_json["children"][0]["children"], json!([]));
    }
}
