// Copyright 2026 the Treelens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Object identity.

use core::fmt;

/// An opaque, pointer-width identity for a live UI object.
///
/// Handles are tokens, not references: nothing in this crate can dereference
/// one. The engine that issued a handle is free to destroy the object and
/// later hand the same value out again for an unrelated object, so every
/// lookup keyed by a handle must tolerate "not found" and "no longer what it
/// used to be".
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ObjHandle(usize);

impl ObjHandle {
    /// The null sentinel. Constructors return it on failure and exported
    /// snapshots use it as the parent of the root.
    pub const NULL: Self = Self(0);

    /// Wraps a raw pointer-width value.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    /// Returns the raw pointer-width value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> usize {
        self.0
    }

    /// Returns `true` for the null sentinel.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Returns `None` for the null sentinel, `Some(self)` otherwise.
    #[inline]
    #[must_use]
    pub const fn non_null(self) -> Option<Self> {
        if self.is_null() { None } else { Some(self) }
    }
}

impl fmt::Debug for ObjHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjHandle({:#x})", self.0)
    }
}

impl fmt::Display for ObjHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
