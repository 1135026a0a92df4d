//! Immutable snapshots: what the selector evaluator sees.
//!
//! Selectors never read the store directly. The store projects an object into
//! an [`ObjectState`] (its tags and bound slot names) or an [`ObjectContext`]
//! (that state plus the states of every object one hop away), and matching is
//! a pure function over the projection. Snapshots must not be cached across
//! store mutations.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;

use crate::ident::{Slot, Tag};

/// Snapshot of a single object: its tag set and the names of its bound slots.
///
/// Only slot *names* are captured, not their targets. A selector can ask
/// whether a slot is bound; whichever object it is bound to is visible only
/// through the indirect half of an [`ObjectContext`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectState {
    /// Tags carried by the object at snapshot time.
    pub tags: BTreeSet<Tag>,
    /// Slot names that had a live target at snapshot time.
    pub slots: BTreeSet<Slot>,
}

/// One-hop projection of an object: its own state plus the state of every
/// object it directly links to.
///
/// A slot name absent from `indirect` always means the slot is unbound on the
/// object. The store's integrity invariant rules out the other reading — a
/// binding whose target has been removed cannot exist.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ObjectContext {
    /// State of the object itself.
    pub direct: ObjectState,
    /// State of each linked object, keyed by the slot that reaches it.
    ///
    /// Lookup-only; iteration order is unspecified and never observable
    /// through matching, which is a pure conjunction.
    pub indirect: FxHashMap<Slot, ObjectState>,
}
