// Copyright 2026 the Treelens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Provenance metadata keyed by object identity.
//!
//! The [`MetadataRegistry`] remembers, for each handle the creation
//! interceptor has seen, where in the source the object was constructed and
//! through which constructor. Handles are opaque tokens here: the registry
//! never asks the engine whether a handle is still live. An entry lives until
//! it is removed, the registry is cleared, or a new construction returns the
//! same handle and overwrites it.

use alloc::vec::Vec;
use core::fmt;
use core::panic::Location;

use hashbrown::HashMap;

use crate::handle::ObjHandle;

/// Where and how an object was constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Provenance {
    /// The constructed object.
    pub handle: ObjHandle,
    /// Source file of the construction call site.
    pub file: &'static str,
    /// Source line of the construction call site.
    pub line: u32,
    /// Constructor name, e.g. `"lv_label_create"`.
    pub kind: &'static str,
}

impl Provenance {
    /// Builds a record whose file and line are those of the caller.
    ///
    /// Propagates through other `#[track_caller]` functions, so wrappers
    /// record the location of *their* caller.
    #[track_caller]
    #[must_use]
    pub fn here(handle: ObjHandle, kind: &'static str) -> Self {
        Self::at(handle, Location::caller(), kind)
    }

    /// Builds a record for an explicit source location.
    #[must_use]
    pub fn at(handle: ObjHandle, location: &'static Location<'static>, kind: &'static str) -> Self {
        Self {
            handle,
            file: location.file(),
            line: location.line(),
            kind,
        }
    }
}

/// What [`MetadataRegistry::register`] did with a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Registration {
    /// A new entry was created.
    Inserted,
    /// An existing entry for the same handle was replaced.
    Overwritten,
    /// The handle was null; nothing happened.
    Ignored,
    /// Memory for a new entry could not be reserved; any prior state is intact.
    Dropped,
}

/// Identity-keyed store of [`Provenance`] records.
///
/// Iteration ([`iter`](Self::iter), [`dump`](Self::dump)) follows first
/// insertion order. Overwriting a handle keeps its position.
#[derive(Debug, Default)]
pub struct MetadataRegistry {
    entries: HashMap<ObjHandle, Provenance>,
    order: Vec<ObjHandle>,
}

impl MetadataRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the record for `record.handle`.
    ///
    /// A null handle is ignored. If memory for a new entry cannot be
    /// reserved the update is dropped and the registry is left unchanged.
    pub fn register(&mut self, record: Provenance) -> Registration {
        if record.handle.is_null() {
            return Registration::Ignored;
        }
        if let Some(existing) = self.entries.get_mut(&record.handle) {
            *existing = record;
            return Registration::Overwritten;
        }
        if self.entries.try_reserve(1).is_err() || self.order.try_reserve(1).is_err() {
            return Registration::Dropped;
        }
        self.order.push(record.handle);
        self.entries.insert(record.handle, record);
        Registration::Inserted
    }

    /// Returns the current record for `handle`, if any.
    #[must_use]
    pub fn lookup(&self, handle: ObjHandle) -> Option<Provenance> {
        self.entries.get(&handle).copied()
    }

    /// Removes and returns the record for `handle`.
    pub fn remove(&mut self, handle: ObjHandle) -> Option<Provenance> {
        let removed = self.entries.remove(&handle)?;
        self.order.retain(|h| *h != handle);
        Some(removed)
    }

    /// Removes every record.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates over every record in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Provenance> + '_ {
        self.order.iter().filter_map(|h| self.entries.get(h))
    }

    /// Returns a copy of every record in insertion order.
    #[must_use]
    pub fn dump(&self) -> Vec<Provenance> {
        self.iter().copied().collect()
    }

    /// Writes the human-readable diagnostic dump.
    pub fn write_dump(&self, out: &mut impl fmt::Write) -> fmt::Result {
        writeln!(out, "---- TREELENS REGISTRY DUMP ----")?;
        for p in self.iter() {
            writeln!(
                out,
                "  obj={}   file=\"{}\"   line={}   helper=\"{}\"",
                p.handle, p.file, p.line, p.kind
            )?;
        }
        writeln!(out, "---- END DUMP ----")
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::*;

    fn record(raw: usize, line: u32, kind: &'static str) -> Provenance {
        Provenance {
            handle: ObjHandle::from_raw(raw),
            file: "screens/dashboard.rs",
            line,
            kind,
        }
    }

    #[test]
    fn lookup_missing_is_none() {
        let registry = MetadataRegistry::new();
        assert_eq!(registry.lookup(ObjHandle::from_raw(0xdead)), None);
    }

    #[test]
    fn null_handle_is_ignored() {
        let mut registry = MetadataRegistry::new();
        assert_eq!(
            registry.register(record(0, 1, "lv_obj_create")),
            Registration::Ignored
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn overwrite_keeps_latest_and_position() {
        let mut registry = MetadataRegistry::new();
        registry.register(record(0x10, 1, "lv_obj_create"));
        registry.register(record(0x20, 2, "lv_label_create"));
        assert_eq!(
            registry.register(record(0x10, 3, "lv_button_create")),
            Registration::Overwritten
        );

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.lookup(ObjHandle::from_raw(0x10)),
            Some(record(0x10, 3, "lv_button_create"))
        );
        let order: Vec<_> = registry.iter().map(|p| p.handle.raw()).collect();
        assert_eq!(order, [0x10, 0x20]);
    }

    #[test]
    fn remove_and_clear() {
        let mut registry = MetadataRegistry::new();
        registry.register(record(0x10, 1, "lv_obj_create"));
        registry.register(record(0x20, 2, "lv_obj_create"));
        assert!(registry.remove(ObjHandle::from_raw(0x10)).is_some());
        assert!(registry.remove(ObjHandle::from_raw(0x10)).is_none());
        assert_eq!(registry.dump(), [record(0x20, 2, "lv_obj_create")]);
        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn here_captures_the_call_site() {
        let line = line!() + 1;
        let p = Provenance::here(ObjHandle::from_raw(1), "lv_obj_create");
        assert_eq!(p.line, line);
        assert!(p.file.ends_with("registry.rs"));
    }

    #[test]
    fn text_dump_format() {
        let mut registry = MetadataRegistry::new();
        registry.register(record(0xdead, 42, "lv_label_create"));
        let mut out = String::new();
        registry.write_dump(&mut out).unwrap();
        assert_eq!(
            out,
            "---- TREELENS REGISTRY DUMP ----\n  obj=0xdead   file=\"screens/dashboard.rs\"   line=42   helper=\"lv_label_create\"\n---- END DUMP ----\n"
        );
    }
}
