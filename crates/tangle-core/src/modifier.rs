//! Modifier descriptors: tag deltas and indirection-addressed link edits.
//!
//! A modifier is a batch of edits expressed relative to an *anchor* object —
//! the object a rule matched. Each link edit names its real subject through an
//! [`EffectiveSubject`] (the anchor or one hop from it) and, for binds, its
//! new target through an [`EffectiveTarget`] (the subject itself, one hop, or
//! two hops from it). Resolution against a live store happens in
//! [`apply`](crate::ObjectStore::apply); this module only carries the shapes
//! and enforces the construction invariant that bounds rewrite reach.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::ident::{Slot, Tag};

/// Which object a binding edit is really about, relative to the anchor.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectiveSubject {
    /// The anchor object itself.
    Direct,
    /// The object currently reached from the anchor through the named slot.
    ///
    /// Resolution is a structural precondition: if the slot is unbound at
    /// apply time, the whole application fails with
    /// [`ApplyError::UnresolvedSubject`](crate::ApplyError::UnresolvedSubject).
    Indirect(Slot),
}

impl EffectiveSubject {
    /// Returns `true` for the one-hop variant.
    #[must_use]
    pub fn is_indirect(&self) -> bool {
        matches!(self, Self::Indirect(_))
    }
}

/// The new target of a bind edit, relative to the *resolved* subject.
///
/// Unlike subjects, targets may legitimately fail to resolve; a bind whose
/// target path is broken degrades to a no-op rather than an error.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectiveTarget {
    /// The subject itself — binds a self-loop.
    Subject,
    /// The object the subject currently reaches through the named slot.
    Direct(Slot),
    /// The object reached by following the first slot from the subject, then
    /// the second slot from there.
    Indirect(Slot, Slot),
}

impl EffectiveTarget {
    /// Returns `true` for the two-hop variant.
    #[must_use]
    pub fn is_indirect(&self) -> bool {
        matches!(self, Self::Indirect(..))
    }
}

/// Address of one binding edit: which subject, and which slot on it.
///
/// Plain structural equality, ordering, and hashing — each `(subject, slot)`
/// pair addresses a distinct binding, so a modifier holds at most one edit
/// per address.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectiveSlot {
    /// Subject the edit resolves against.
    pub subject: EffectiveSubject,
    /// Slot name edited on the resolved subject.
    pub slot: Slot,
}

/// A single link edit: drop the binding, or rebind it to an effective target.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BindingModifier {
    /// Unbind the slot. Unbinding an already-unbound slot is a no-op.
    Unbind,
    /// Bind the slot to the resolved target, when it resolves.
    Bind(EffectiveTarget),
}

impl BindingModifier {
    /// Returns `true` when the edit's target side is the two-hop variant.
    #[must_use]
    pub fn is_indirect(&self) -> bool {
        match self {
            Self::Unbind => false,
            Self::Bind(target) => target.is_indirect(),
        }
    }
}

/// Error rejecting a malformed [`ObjectModifier`] at construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModifierError {
    /// A binding entry routed both its subject and its target through slots.
    ///
    /// Indirection is limited to one side per edit, which bounds a rewrite's
    /// reach to two hops from the anchor.
    #[error("binding edit on slot `{0}` is indirect on both subject and target")]
    DoubleIndirection(Slot),
}

/// Batch edit applied to an anchor object: a tag delta plus binding edits.
///
/// Tag semantics are union-then-subtract — additions are applied before
/// subtractions, so a tag named in both sets ends up absent. Binding edits
/// are applied in address order; each entry touches a disjoint
/// `(subject, slot)` pair, so order carries no meaning.
///
/// Fields are private: the only way to obtain an `ObjectModifier` is
/// [`ObjectModifier::new`], which enforces the one-sided-indirection
/// invariant. Deserialization is deliberately not derived for this type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectModifier {
    added_tags: BTreeSet<Tag>,
    subtracted_tags: BTreeSet<Tag>,
    bindings: BTreeMap<EffectiveSlot, BindingModifier>,
}

impl ObjectModifier {
    /// Builds a modifier, validating every binding entry.
    ///
    /// # Errors
    /// Returns [`ModifierError::DoubleIndirection`] when any entry pairs an
    /// indirect subject with an indirect target.
    pub fn new(
        added_tags: BTreeSet<Tag>,
        subtracted_tags: BTreeSet<Tag>,
        bindings: BTreeMap<EffectiveSlot, BindingModifier>,
    ) -> Result<Self, ModifierError> {
        for (address, modifier) in &bindings {
            if address.subject.is_indirect() && modifier.is_indirect() {
                return Err(ModifierError::DoubleIndirection(address.slot.clone()));
            }
        }
        Ok(Self {
            added_tags,
            subtracted_tags,
            bindings,
        })
    }

    /// Tags the modifier adds to the anchor.
    #[must_use]
    pub fn added_tags(&self) -> &BTreeSet<Tag> {
        &self.added_tags
    }

    /// Tags the modifier subtracts from the anchor.
    #[must_use]
    pub fn subtracted_tags(&self) -> &BTreeSet<Tag> {
        &self.subtracted_tags
    }

    /// Binding edits, keyed by effective slot address.
    #[must_use]
    pub fn bindings(&self) -> &BTreeMap<EffectiveSlot, BindingModifier> {
        &self.bindings
    }
}
