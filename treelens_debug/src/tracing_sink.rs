// Copyright 2026 the Treelens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bridge from treelens logging into `tracing`.

use treelens_core::log::{LogLevel, LogSink};

/// Forwards each message as a `tracing` event with target `"treelens"`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn log(&mut self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Trace => tracing::trace!(target: "treelens", "{message}"),
            LogLevel::Debug => tracing::debug!(target: "treelens", "{message}"),
            LogLevel::Info => tracing::info!(target: "treelens", "{message}"),
            LogLevel::Warn => tracing::warn!(target: "treelens", "{message}"),
            LogLevel::Error => tracing::error!(target: "treelens", "{message}"),
        }
    }
}
