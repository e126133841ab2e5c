// Copyright 2026 the Treelens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Builds a small dashboard on the reference object tree and runs every
//! session operation against it.
//!
//! Session log output is routed into `tracing`; set `RUST_LOG=treelens=debug`
//! to see per-operation summaries.

use std::cell::RefCell;
use std::io::{self, Write};

use tracing_subscriber::EnvFilter;
use treelens_core::tree::ObjTree;
use treelens_core::{Area, ObjFlag, ObjHandle, Session, SessionConfig, UiEngine};
use treelens_debug::flush::FlushAreaCollector;
use treelens_debug::json;
use treelens_debug::pretty::write_tree;
use treelens_debug::snapshot::TreeSnapshot;
use treelens_debug::tracing_sink::TracingLogSink;

const SCREEN_W: i32 = 480;
const SCREEN_H: i32 = 320;

struct Dashboard {
    header: ObjHandle,
    temperature: ObjHandle,
    refresh: ObjHandle,
    chart: ObjHandle,
}

fn build(session: &mut Session, tree: &mut ObjTree) -> Dashboard {
    let screen = tree.screen();

    let header = session.obj_create(tree, screen);
    tree.set_area(header, Area::from_origin_size(0, 0, SCREEN_W, 40));
    let title = session.label_create(tree, header);
    tree.set_area(title, Area::from_origin_size(8, 8, 200, 24));
    tree.set_text(title, "Greenhouse");
    let logo = session.img_create(tree, header);
    tree.set_area(logo, Area::from_origin_size(SCREEN_W - 40, 4, 32, 32));

    let card = session.obj_create(tree, screen);
    tree.set_area(card, Area::from_origin_size(8, 48, 220, 120));
    let temperature = session.label_create(tree, card);
    tree.set_area(temperature, Area::from_origin_size(8, 8, 120, 32));
    tree.set_user_data(temperature, 0x7e);
    tree.set_text(temperature, "21.5 C");
    let refresh = session.button_create(tree, card);
    tree.set_area(refresh, Area::from_origin_size(8, 72, 100, 40));
    let caption = session.label_create(tree, refresh);
    tree.set_area(caption, Area::from_origin_size(10, 10, 80, 20));
    tree.set_text(caption, "Refresh");

    let chart = session.chart_create(tree, screen);
    tree.set_area(chart, Area::from_origin_size(240, 48, 232, 264));
    let slider = session.slider_create(tree, screen);
    tree.set_area(slider, Area::from_origin_size(8, 280, 220, 16));

    Dashboard {
        header,
        temperature,
        refresh,
        chart,
    }
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut tree = ObjTree::new(SCREEN_W, SCREEN_H);
    let mut session = Session::new(SessionConfig::verbose());
    session.register_log_sink(TracingLogSink);

    let ui = build(&mut session, &mut tree);
    let mut out = io::stdout().lock();

    // -- export -------------------------------------------------------------
    let snapshot = TreeSnapshot::new();
    session.register_tree_export_sink(snapshot.clone());
    match session.export_annotated_tree(&tree) {
        Ok(n) => {
            let labelled = snapshot.capture_text(&tree);
            tracing::info!("exported {n} objects, {labelled} with text");
        }
        Err(err) => tracing::error!("export failed: {err}"),
    }
    if let Some(root) = snapshot.tree() {
        writeln!(out, "== tree ==")?;
        write_tree(&mut out, &root)?;
        writeln!(out, "\n== tree (json) ==")?;
        writeln!(out, "{}", json::hierarchy_to_json(&root))?;
    }

    // -- registry -----------------------------------------------------------
    writeln!(out, "\n== registry ==")?;
    write!(out, "{}", session.dump_registry_string())?;
    writeln!(out, "{}", json::registry_to_json(session.registry()))?;

    // -- hit testing ----------------------------------------------------------
    writeln!(out, "\n== hit test ==")?;
    for (x, y) in [(20, 130), (300, 100), (470, 10), (2, 310)] {
        let hit = session.obj_at_point(&tree, x, y);
        let class = hit.and_then(|h| tree.class_name(h)).unwrap_or("-");
        let origin = hit
            .and_then(|h| session.lookup(h))
            .map_or_else(String::new, |p| format!(" created at {}:{}", p.file, p.line));
        let text = hit
            .and_then(|h| session.obj_text(&tree, h))
            .map_or_else(String::new, |t| format!(" {t:?}"));
        writeln!(out, "({x}, {y}) -> {class}{text}{origin}")?;
    }
    session.set_hidden(&mut tree, ui.chart, true);
    let hit = session.obj_at_point(&tree, 300, 100);
    writeln!(out, "chart hidden: (300, 100) -> {:?}", hit.and_then(|h| tree.class_name(h)))?;
    session.set_hidden(&mut tree, ui.chart, false);

    // -- clickability -----------------------------------------------------------
    writeln!(out, "\n== clickability ==")?;
    let before = tree.has_flag(ui.temperature, ObjFlag::Clickable);
    let touched = session.make_all_clickable(&mut tree);
    let during = tree.has_flag(ui.temperature, ObjFlag::Clickable);
    let summary = session.revert_clickability(&mut tree);
    let after = tree.has_flag(ui.temperature, ObjFlag::Clickable);
    writeln!(out, "forced {touched} objects; label clickable {before} -> {during} -> {after}")?;
    writeln!(out, "{summary:?}")?;

    // -- flush regions ------------------------------------------------------------
    writeln!(out, "\n== flush regions ==")?;
    let collector = FlushAreaCollector::new();
    session.register_flush_region_sink(collector.clone());
    let session = RefCell::new(session);
    collector.scope(|| {
        let mut s = session.borrow_mut();
        for obj in [ui.temperature, ui.refresh, ui.header] {
            if let Some(area) = tree.coords(obj) {
                s.invoke_flush_region(&area);
            }
        }
    });
    for event in collector.active_events() {
        writeln!(out, "flash {:?}", event.rect)?;
    }
    session.borrow_mut().clear_flush_region_sink();

    Ok(())
}
