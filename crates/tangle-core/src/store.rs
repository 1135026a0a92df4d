//! The object arena: identity, tags, links, and referential integrity.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::ident::{Oid, Slot, Tag};
use crate::selector::{BinarySelector, ContextSelector};
use crate::state::{ObjectContext, ObjectState};

/// Error returned by store operations that dereference an [`Oid`].
///
/// The store never produces dead references itself; this only ever signals
/// that a caller kept a handle across the removal of the object it named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The oid does not currently name a live object.
    #[error("invalid object reference: {0}")]
    InvalidReference(Oid),
}

/// Internal record for one live object.
#[derive(Clone, Debug, Default)]
pub(crate) struct ObjectRecord {
    pub(crate) tags: BTreeSet<Tag>,
    pub(crate) slots: BTreeMap<Slot, Oid>,
}

/// Arena of tagged, interlinked objects.
///
/// The store exclusively owns every object. All other components hold only
/// [`Oid`]s and observe through snapshots ([`ObjectState`], [`ObjectContext`])
/// re-read after each mutation.
///
/// Central invariant: no slot anywhere in the store references a removed
/// object. [`ObjectStore::remove`] unbinds every inbound slot before deleting
/// its target, so an unbound slot is the only way a link can be missing —
/// "dangling" is unrepresentable.
///
/// All maps are `BTreeMap`s so every iteration-backed result (`select`,
/// `iter_oids`, the digest traversal) is deterministic for a given graph.
#[derive(Clone, Debug, Default)]
pub struct ObjectStore {
    pub(crate) objects: BTreeMap<Oid, ObjectRecord>,
    /// Reverse adjacency: for each live target, the `(source, slot)` pairs
    /// currently bound to it. Kept in lockstep with the forward maps so
    /// removal costs the inbound degree, not a store-wide scan.
    inbound: BTreeMap<Oid, BTreeSet<(Oid, Slot)>>,
    sequence: u64,
}

impl ObjectStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fresh object with no tags and no bindings.
    ///
    /// The returned handle is strictly greater than every handle this store
    /// has issued before.
    pub fn create(&mut self) -> Oid {
        self.sequence += 1;
        let oid = Oid::from_raw(self.sequence);
        self.objects.insert(oid, ObjectRecord::default());
        oid
    }

    /// Returns `true` if `oid` currently names a live object.
    #[must_use]
    pub fn is_valid(&self, oid: Oid) -> bool {
        self.objects.contains_key(&oid)
    }

    /// Returns the number of live objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` when the store holds no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterates over all live handles in ascending order.
    pub fn iter_oids(&self) -> impl Iterator<Item = Oid> + '_ {
        self.objects.keys().copied()
    }

    fn record(&self, oid: Oid) -> Result<&ObjectRecord, StoreError> {
        self.objects
            .get(&oid)
            .ok_or(StoreError::InvalidReference(oid))
    }

    /// Removes `oid` and every binding anywhere in the store that targets it.
    ///
    /// Inbound slots are unbound first, then the object is deleted, so no
    /// source is ever observable with a dead target. Cost is proportional to
    /// the object's inbound and outbound degree.
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidReference`] if `oid` is not live.
    pub fn remove(&mut self, oid: Oid) -> Result<(), StoreError> {
        if !self.objects.contains_key(&oid) {
            return Err(StoreError::InvalidReference(oid));
        }

        // Detach inbound bindings. Self-loops are covered here too: the
        // record is still present, so its own slot entries can be dropped.
        let mut detached = 0_usize;
        if let Some(entries) = self.inbound.remove(&oid) {
            for (source, slot) in entries {
                detached += 1;
                if let Some(record) = self.objects.get_mut(&source) {
                    record.slots.remove(&slot);
                } else {
                    debug_assert!(false, "reverse index referenced a dead source: {source}");
                }
            }
        }

        // Delete the object and scrub its remaining outbound bindings from
        // the reverse index. Self-loop entries are already gone.
        if let Some(record) = self.objects.remove(&oid) {
            for (slot, target) in record.slots {
                self.drop_inbound(target, oid, &slot);
            }
        }

        #[cfg(feature = "telemetry")]
        crate::telemetry::removed(oid, detached);
        #[cfg(not(feature = "telemetry"))]
        let _ = detached;

        Ok(())
    }

    /// Returns a snapshot of the object's tags and bound slot names.
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidReference`] if `oid` is not live.
    pub fn state(&self, oid: Oid) -> Result<ObjectState, StoreError> {
        let record = self.record(oid)?;
        Ok(ObjectState {
            tags: record.tags.clone(),
            slots: record.slots.keys().cloned().collect(),
        })
    }

    /// Replaces the object's tag set wholesale.
    ///
    /// This is not a merge: tags missing from `tags` are dropped. Modifier
    /// application is the only path that unions and subtracts.
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidReference`] if `oid` is not live.
    pub fn update(&mut self, oid: Oid, tags: BTreeSet<Tag>) -> Result<(), StoreError> {
        let record = self
            .objects
            .get_mut(&oid)
            .ok_or(StoreError::InvalidReference(oid))?;
        record.tags = tags;
        Ok(())
    }

    /// Binds `source`'s `slot` to `target`, overwriting any prior binding on
    /// that slot.
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidReference`] if either end is not live.
    pub fn bind(&mut self, source: Oid, target: Oid, slot: Slot) -> Result<(), StoreError> {
        if !self.objects.contains_key(&target) {
            return Err(StoreError::InvalidReference(target));
        }
        let record = self
            .objects
            .get_mut(&source)
            .ok_or(StoreError::InvalidReference(source))?;
        let prior = record.slots.insert(slot.clone(), target);
        if let Some(prior_target) = prior {
            if prior_target != target {
                self.drop_inbound(prior_target, source, &slot);
            }
        }
        self.inbound.entry(target).or_default().insert((source, slot));
        Ok(())
    }

    /// Unbinds `source`'s `slot`. Unbinding a slot that is already unbound is
    /// a no-op, not an error.
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidReference`] if `source` is not live.
    pub fn unbind(&mut self, source: Oid, slot: &Slot) -> Result<(), StoreError> {
        let record = self
            .objects
            .get_mut(&source)
            .ok_or(StoreError::InvalidReference(source))?;
        if let Some(target) = record.slots.remove(slot) {
            self.drop_inbound(target, source, slot);
        }
        Ok(())
    }

    /// Returns the object's bindings as a slot → target snapshot.
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidReference`] if `oid` is not live.
    pub fn bindings(&self, oid: Oid) -> Result<BTreeMap<Slot, Oid>, StoreError> {
        Ok(self.record(oid)?.slots.clone())
    }

    /// Returns the current target of `oid`'s `slot`, or `None` when unbound.
    pub(crate) fn slot_target(&self, oid: Oid, slot: &Slot) -> Result<Option<Oid>, StoreError> {
        Ok(self.record(oid)?.slots.get(slot).copied())
    }

    /// Builds the one-hop projection of `oid`: its own state plus the state
    /// of every object reached through a bound slot.
    ///
    /// # Errors
    /// Returns [`StoreError::InvalidReference`] if `oid` is not live.
    pub fn context(&self, oid: Oid) -> Result<ObjectContext, StoreError> {
        let record = self.record(oid)?;
        let mut indirect = rustc_hash::FxHashMap::default();
        for (slot, target) in &record.slots {
            // Live by the integrity invariant.
            indirect.insert(slot.clone(), self.state(*target)?);
        }
        Ok(ObjectContext {
            direct: self.state(oid)?,
            indirect,
        })
    }

    /// Returns every live object whose context currently matches `selector`,
    /// in ascending handle order.
    ///
    /// Evaluates the full store — no incremental indexing. Correctness over
    /// speed at this layer; a quiescent store is assumed for the duration.
    #[must_use]
    pub fn select(&self, selector: &ContextSelector) -> Vec<Oid> {
        self.iter_oids()
            .filter(|oid| {
                self.context(*oid)
                    .is_ok_and(|context| selector.matches(&context))
            })
            .collect()
    }

    /// Returns every ordered pair of *distinct* live objects where the left
    /// context matches `selector.left` and the right context matches
    /// `selector.right`, in lexicographic handle order.
    ///
    /// The sides match independently, so one object may appear on both sides
    /// across different pairs.
    #[must_use]
    pub fn select_pairs(&self, selector: &BinarySelector) -> Vec<(Oid, Oid)> {
        let left = self.select(&selector.left);
        let right = self.select(&selector.right);
        let mut pairs = Vec::new();
        for l in &left {
            for r in &right {
                if l != r {
                    pairs.push((*l, *r));
                }
            }
        }
        pairs
    }

    /// Removes one `(source, slot)` entry from `target`'s inbound bucket,
    /// dropping the bucket when it empties.
    fn drop_inbound(&mut self, target: Oid, source: Oid, slot: &Slot) {
        let Some(entries) = self.inbound.get_mut(&target) else {
            debug_assert!(false, "reverse index missing bucket for target: {target}");
            return;
        };
        let was_present = entries.remove(&(source, slot.clone()));
        debug_assert!(was_present, "reverse index missing entry for {source}->{target}");
        if entries.is_empty() {
            self.inbound.remove(&target);
        }
    }
}
