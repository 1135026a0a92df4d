//! Pure predicate templates over object snapshots.
//!
//! A selector describes the local graph shape a rewrite rule requires: tag
//! presence and absence, slot boundness, and the same checks applied one hop
//! away through named slots. Matching never touches the store — it evaluates
//! against snapshots, so a match result is only as fresh as the projection it
//! was computed from.

use std::collections::{BTreeMap, BTreeSet};

use crate::ident::{Slot, Tag};
use crate::state::{ObjectContext, ObjectState};

/// Predicate over a single [`ObjectState`].
///
/// All four checks are independent conjuncts. Empty sets vacuously pass, so
/// the default selector matches any state. Contradictory sets (the same label
/// required both present and absent, or a slot required both bound and
/// unbound) are representable; such a selector simply never matches, and
/// rejecting it is left to whichever layer authors rules.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectSelector {
    /// Tags that must all be present.
    pub present: BTreeSet<Tag>,
    /// Tags that must all be absent.
    pub absent: BTreeSet<Tag>,
    /// Slot names that must all be bound.
    pub bound: BTreeSet<Slot>,
    /// Slot names that must all be unbound.
    pub unbound: BTreeSet<Slot>,
}

impl ObjectSelector {
    /// Returns `true` when `state` satisfies every check in this selector.
    #[must_use]
    pub fn matches(&self, state: &ObjectState) -> bool {
        self.present.is_subset(&state.tags)
            && self.absent.is_disjoint(&state.tags)
            && self.bound.is_subset(&state.slots)
            && self.unbound.is_disjoint(&state.slots)
    }
}

/// Predicate over an [`ObjectContext`]: a direct check plus per-slot checks
/// against the states reached through bound slots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContextSelector {
    /// Selector applied to the object's own state.
    pub direct: ObjectSelector,
    /// Selectors applied to the state reached through each named slot.
    ///
    /// An entry whose slot is unbound in the context fails outright, whatever
    /// the nested selector requires — absence is never vacuously satisfied.
    pub indirect: BTreeMap<Slot, ObjectSelector>,
}

impl ContextSelector {
    /// Returns `true` when the context passes the direct check and every
    /// indirect entry. The default selector matches every context.
    #[must_use]
    pub fn matches(&self, context: &ObjectContext) -> bool {
        self.direct.matches(&context.direct)
            && self.indirect.iter().all(|(slot, selector)| {
                context
                    .indirect
                    .get(slot)
                    .is_some_and(|state| selector.matches(state))
            })
    }
}

/// Selector pair for two-object rule matching.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinarySelector {
    /// Selector for the left object's context.
    pub left: ContextSelector,
    /// Selector for the right object's context.
    pub right: ContextSelector,
}

impl BinarySelector {
    /// Returns `true` when each side matches its own context independently.
    #[must_use]
    pub fn matches(&self, left: &ObjectContext, right: &ObjectContext) -> bool {
        self.left.matches(left) && self.right.matches(right)
    }
}
