//! Identifier types: object handles and the opaque string labels they carry.

use core::fmt;

/// Canonical 256-bit digest used for canonical state hashing.
pub type Hash = [u8; 32];

/// Opaque handle for an object owned by an [`ObjectStore`](crate::ObjectStore).
///
/// Handles are issued by the store from a strictly increasing sequence and
/// are never reused, even after the object they named is removed. Validity is
/// defined solely as "currently present in the store"; holding an `Oid` does
/// not keep the object alive.
///
/// # Invariants
/// - Zero (`Oid(0)`) is never issued; the store's sequence starts at `1`.
/// - Two objects created by the same store never share a handle, and a
///   handle freed by removal is never issued again.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Oid(u64);

impl Oid {
    /// Returns the underlying raw sequence value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    pub(crate) const fn from_raw(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque string label describing an object's kind or state.
///
/// Tags carry no structure of their own; the store and selectors only ever
/// compare them for equality and set membership.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tag(String);

impl Tag {
    /// Creates a tag from any string-like value.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Returns the label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Tag {
    fn from(label: &str) -> Self {
        Self(label.to_owned())
    }
}

impl From<String> for Tag {
    fn from(label: String) -> Self {
        Self(label)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque string label naming one outgoing, single-target directed link.
///
/// An object holds at most one binding per slot name; a slot with no binding
/// is "unbound". Like [`Tag`], slots are compared only for equality and set
/// membership.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Slot(String);

impl Slot {
    /// Creates a slot name from any string-like value.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Returns the label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Slot {
    fn from(label: &str) -> Self {
        Self(label.to_owned())
    }
}

impl From<String> for Slot {
    fn from(label: String) -> Self {
        Self(label)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
