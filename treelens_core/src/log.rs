// Copyright 2026 the Treelens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Log sink abstraction.
//!
//! Treelens does not format or store log lines itself. A [`Logger`] holds at
//! most one [`LogSink`] supplied by the host and hands it each message that
//! passes the minimum level. Closures `FnMut(LogLevel, &str)` are sinks.
//!
//! With no sink registered, messages go to stderr when the `std` feature is
//! enabled and are dropped otherwise.

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt::{self, Write as _};

/// Severity of a log message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum LogLevel {
    /// Very verbose diagnostics.
    Trace = 0,
    /// Per-operation summaries.
    Debug = 1,
    /// Notable events.
    Info = 2,
    /// Absorbed failures.
    Warn = 3,
    /// Failures surfaced to the caller.
    Error = 4,
}

impl LogLevel {
    /// Short uppercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives formatted log messages.
pub trait LogSink {
    /// Called once per message, synchronously.
    fn log(&mut self, level: LogLevel, message: &str);
}

impl<F: FnMut(LogLevel, &str)> LogSink for F {
    fn log(&mut self, level: LogLevel, message: &str) {
        self(level, message);
    }
}

/// Single-sink, level-filtered log dispatcher.
pub struct Logger {
    sink: Option<Box<dyn LogSink>>,
    min_level: LogLevel,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("has_sink", &self.sink.is_some())
            .field("min_level", &self.min_level)
            .finish()
    }
}

impl Logger {
    /// Creates a logger with no sink.
    #[must_use]
    pub const fn new(min_level: LogLevel) -> Self {
        Self {
            sink: None,
            min_level,
        }
    }

    /// Installs `sink`, replacing any previous one.
    pub fn set_sink(&mut self, sink: impl LogSink + 'static) {
        self.sink = Some(Box::new(sink));
    }

    /// Removes the sink.
    pub fn clear_sink(&mut self) {
        self.sink = None;
    }

    /// Returns the minimum level that is dispatched.
    #[must_use]
    pub const fn min_level(&self) -> LogLevel {
        self.min_level
    }

    /// Sets the minimum level that is dispatched.
    pub fn set_min_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    /// Returns `true` if a message at `level` would be dispatched.
    #[must_use]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    /// Formats and dispatches one message.
    pub fn log(&mut self, level: LogLevel, args: fmt::Arguments<'_>) {
        if !self.enabled(level) {
            return;
        }
        let message = match args.as_str() {
            Some(s) => String::from(s),
            None => {
                let mut s = String::new();
                if s.write_fmt(args).is_err() {
                    return;
                }
                s
            }
        };
        match &mut self.sink {
            Some(sink) => sink.log(level, &message),
            None => fallback(level, &message),
        }
    }
}

#[cfg(feature = "std")]
fn fallback(level: LogLevel, message: &str) {
    extern crate std;
    std::eprintln!("[{}] {message}", level as u8);
}

#[cfg(not(feature = "std"))]
fn fallback(_level: LogLevel, _message: &str) {}

/// Logs through a [`Logger`] with `format!`-style arguments.
macro_rules! log_at {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format_args!($($arg)+))
    };
}

pub(crate) use log_at;

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use super::*;

    type Captured = Rc<RefCell<Vec<(LogLevel, String)>>>;

    fn capture(logger: &mut Logger) -> Captured {
        let lines: Captured = Rc::default();
        let sink = Rc::clone(&lines);
        logger.set_sink(move |level: LogLevel, msg: &str| sink.borrow_mut().push((level, msg.into())));
        lines
    }

    #[test]
    fn filters_below_min_level() {
        let mut logger = Logger::new(LogLevel::Info);
        let lines = capture(&mut logger);
        log_at!(logger, LogLevel::Debug, "hidden {}", 1);
        log_at!(logger, LogLevel::Warn, "shown {}", 2);
        assert_eq!(*lines.borrow(), [(LogLevel::Warn, String::from("shown 2"))]);
    }

    #[test]
    fn last_sink_wins() {
        let mut logger = Logger::new(LogLevel::Trace);
        let first = capture(&mut logger);
        let second = capture(&mut logger);
        log_at!(logger, LogLevel::Info, "hello");
        assert!(first.borrow().is_empty());
        assert_eq!(second.borrow().len(), 1);
    }

    #[test]
    fn levels_keep_their_wire_values() {
        assert_eq!(LogLevel::Trace as u8, 0);
        assert_eq!(LogLevel::Error as u8, 4);
        assert!(LogLevel::Warn > LogLevel::Info);
    }
}
