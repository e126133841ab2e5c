// Copyright 2026 the Treelens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable output.
//!
//! [`PrettyLogSink`] implements [`LogSink`] and writes one line per message
//! to a [`Write`](std::io::Write) destination (default: stderr).
//! [`write_tree`] prints a rebuilt hierarchy as an indented outline.

use std::io::{self, Write};

use treelens_core::log::{LogLevel, LogSink};

use crate::snapshot::TreeNode;

/// Writes `[LEVEL] message` lines to a [`Write`](std::io::Write) destination.
pub struct PrettyLogSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyLogSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyLogSink").finish_non_exhaustive()
    }
}

impl PrettyLogSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyLogSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the destination.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> LogSink for PrettyLogSink<W> {
    fn log(&mut self, level: LogLevel, message: &str) {
        let _ = writeln!(self.writer, "[{:<5}] {message}", level.as_str());
    }
}

/// Writes `tree` as an indented outline, one object per line.
///
/// # Errors
///
/// Propagates write errors from `out`.
pub fn write_tree(out: &mut impl Write, tree: &TreeNode) -> io::Result<()> {
    let mut stack = vec![(tree, 0_usize)];
    while let Some((node, depth)) = stack.pop() {
        let n = &node.node.node;
        write!(
            out,
            "{:indent$}{} {} ({}, {}) {}x{}",
            "",
            n.class_name,
            n.handle,
            n.x,
            n.y,
            n.width,
            n.height,
            indent = depth * 2,
        )?;
        if let Some(text) = &node.node.text {
            write!(out, " {text:?}")?;
        }
        if n.hidden {
            write!(out, " hidden")?;
        }
        if let Some(p) = node.node.provenance {
            write!(out, " @ {}:{}", p.file, p.line)?;
        }
        writeln!(out)?;
        stack.extend(node.children.iter().rev().map(|c| (c, depth + 1)));
    }
    Ok(())
}
