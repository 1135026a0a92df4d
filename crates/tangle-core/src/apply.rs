//! Modifier application: resolving effective addresses and editing the store.
//!
//! The applicator is stateless — every call resolves the modifier's effective
//! subjects and targets against the store's current shape, then issues plain
//! store writes. Subjects must resolve (a rule's structural precondition);
//! targets need not (a broken target path degrades the bind to a no-op).

use std::collections::BTreeSet;

use thiserror::Error;

use crate::ident::{Oid, Slot, Tag};
use crate::modifier::{
    BindingModifier, EffectiveSlot, EffectiveSubject, EffectiveTarget, ObjectModifier,
};
use crate::store::{ObjectStore, StoreError};

/// Error produced while applying a modifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplyError {
    /// The modifier's effective subject could not be resolved because the
    /// anchor's indirection slot is unbound.
    ///
    /// This is an expected outcome, not a misuse: the graph may have changed
    /// since the rule matched. Drivers should re-check with a selector before
    /// applying, but the applicator guards regardless.
    #[error("effective subject unresolved: slot `{0}` is unbound on the anchor")]
    UnresolvedSubject(Slot),
    /// An underlying store operation rejected a dead reference.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What a single binding edit did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindingOutcome {
    /// The slot was unbound (or already was).
    Unbound,
    /// The slot was bound to the resolved target.
    Bound(Oid),
    /// The bind target did not resolve; the edit was skipped.
    SkippedUnresolvedTarget,
}

/// Audit record for one [`ObjectStore::apply`] call.
///
/// Records what the rewrite actually changed, so a driver can log or assert
/// on the effect without re-reading the store: tag *deltas* rather than the
/// requested sets, and one outcome per binding edit in application order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApplyReceipt {
    /// The anchor object the modifier was applied to.
    pub anchor: Oid,
    /// Tags that became present on the anchor.
    pub added: BTreeSet<Tag>,
    /// Tags that became absent on the anchor.
    pub removed: BTreeSet<Tag>,
    /// Outcome of each binding edit, in address order.
    pub bindings: Vec<(EffectiveSlot, BindingOutcome)>,
}

impl ObjectStore {
    /// Resolves which object a binding edit is about, relative to `anchor`.
    ///
    /// # Errors
    /// [`ApplyError::UnresolvedSubject`] when the anchor's indirection slot
    /// is unbound; [`ApplyError::Store`] when `anchor` is not live.
    pub fn resolve_subject(
        &self,
        anchor: Oid,
        subject: &EffectiveSubject,
    ) -> Result<Oid, ApplyError> {
        match subject {
            EffectiveSubject::Direct => {
                if self.is_valid(anchor) {
                    Ok(anchor)
                } else {
                    Err(StoreError::InvalidReference(anchor).into())
                }
            }
            EffectiveSubject::Indirect(slot) => self
                .slot_target(anchor, slot)?
                .ok_or_else(|| ApplyError::UnresolvedSubject(slot.clone())),
        }
    }

    /// Resolves the desired new target of a bind edit, relative to the
    /// already-resolved `subject`.
    ///
    /// Returns `Ok(None)` when any hop along the target path is unbound —
    /// deliberately not an error, since intermediate objects may legitimately
    /// be absent at rewrite time.
    ///
    /// # Errors
    /// [`StoreError::InvalidReference`] when `subject` is not live.
    pub fn resolve_target(
        &self,
        subject: Oid,
        target: &EffectiveTarget,
    ) -> Result<Option<Oid>, StoreError> {
        match target {
            EffectiveTarget::Subject => {
                if self.is_valid(subject) {
                    Ok(Some(subject))
                } else {
                    Err(StoreError::InvalidReference(subject))
                }
            }
            EffectiveTarget::Direct(slot) => self.slot_target(subject, slot),
            EffectiveTarget::Indirect(first, second) => match self.slot_target(subject, first)? {
                None => Ok(None),
                Some(via) => self.slot_target(via, second),
            },
        }
    }

    /// Applies a single binding edit addressed through `subject`.
    ///
    /// The subject is resolved first and must exist. An `Unbind` edit then
    /// unbinds the slot (idempotent); a `Bind` edit resolves its target and
    /// either binds the slot or, when the target path is broken, skips the
    /// edit and reports [`BindingOutcome::SkippedUnresolvedTarget`].
    ///
    /// # Errors
    /// [`ApplyError::UnresolvedSubject`] when the subject's indirection slot
    /// is unbound; [`ApplyError::Store`] when `anchor` is not live.
    pub fn apply_binding(
        &mut self,
        anchor: Oid,
        subject: &EffectiveSubject,
        slot: &Slot,
        modifier: &BindingModifier,
    ) -> Result<BindingOutcome, ApplyError> {
        let subject = self.resolve_subject(anchor, subject)?;
        match modifier {
            BindingModifier::Unbind => {
                self.unbind(subject, slot)?;
                Ok(BindingOutcome::Unbound)
            }
            BindingModifier::Bind(target) => match self.resolve_target(subject, target)? {
                Some(target) => {
                    self.bind(subject, target, slot.clone())?;
                    Ok(BindingOutcome::Bound(target))
                }
                None => Ok(BindingOutcome::SkippedUnresolvedTarget),
            },
        }
    }

    /// Applies a whole modifier batch to `anchor`.
    ///
    /// The tag delta lands first — additions unioned in, then subtractions
    /// removed, so a tag named in both sets ends up absent. Binding edits
    /// follow in address order. Steps are applied directly; there is no
    /// rollback, and a failing step (an unresolved subject or a dead anchor)
    /// leaves the edits that preceded it in place.
    ///
    /// # Errors
    /// [`ApplyError::UnresolvedSubject`] when any entry's indirect subject is
    /// unbound; [`ApplyError::Store`] when `anchor` is not live.
    pub fn apply(
        &mut self,
        anchor: Oid,
        modifier: &ObjectModifier,
    ) -> Result<ApplyReceipt, ApplyError> {
        let before = self.state(anchor)?.tags;
        let union: BTreeSet<Tag> = &before | modifier.added_tags();
        let after: BTreeSet<Tag> = &union - modifier.subtracted_tags();
        let added: BTreeSet<Tag> = &after - &before;
        let removed: BTreeSet<Tag> = &before - &after;
        self.update(anchor, after)?;

        let mut bindings = Vec::with_capacity(modifier.bindings().len());
        for (address, binding) in modifier.bindings() {
            let outcome = self.apply_binding(anchor, &address.subject, &address.slot, binding)?;
            bindings.push((address.clone(), outcome));
        }

        #[cfg(feature = "telemetry")]
        crate::telemetry::applied(anchor, added.len(), removed.len(), bindings.len());

        Ok(ApplyReceipt {
            anchor,
            added,
            removed,
            bindings,
        })
    }
}
