//! tangle-core: tagged object-graph store with one-hop selector matching and
//! indirection-aware rewrite modifiers.
//!
//! The crate is the matching-and-rewriting core of an object-graph engine,
//! built from three pieces:
//!
//! * **Store** — [`ObjectStore`] owns every object, issues never-reused
//!   [`Oid`] handles, and guarantees no binding ever points at a removed
//!   object.
//! * **Selectors** — [`ObjectSelector`], [`ContextSelector`], and
//!   [`BinarySelector`] are pure predicates over [`ObjectState`] /
//!   [`ObjectContext`] snapshots: tag presence and absence, slot boundness,
//!   evaluated directly and through each bound slot one hop away.
//! * **Modifiers** — [`ObjectModifier`] batches tag deltas with link edits
//!   addressed through [`EffectiveSubject`] / [`EffectiveTarget`]
//!   indirection; [`ObjectStore::apply`] resolves the addresses and issues
//!   the writes, returning an [`ApplyReceipt`].
//!
//! Rule authoring (a DSL that produces selectors and modifiers) and rule
//! scheduling (which rule fires, where, and when) are deliberately outside
//! this crate; it exposes the matching and rewriting surface they consume.
//! All operations are synchronous and assume a quiescent store — callers
//! serialize mutation.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::module_name_repetitions,
    clippy::use_self
)]

mod apply;
mod digest;
mod ident;
mod modifier;
mod selector;
mod state;
mod store;
#[cfg(feature = "telemetry")]
mod telemetry;

/// Modifier application: errors, per-edit outcomes, and audit receipts.
pub use apply::{ApplyError, ApplyReceipt, BindingOutcome};
/// Short hex rendering for canonical state digests.
pub use digest::short_hex;
/// Identifier types for objects and their labels.
pub use ident::{Hash, Oid, Slot, Tag};
/// Modifier descriptors and their construction-time validation.
pub use modifier::{
    BindingModifier, EffectiveSlot, EffectiveSubject, EffectiveTarget, ModifierError,
    ObjectModifier,
};
/// Pure predicate templates over snapshots.
pub use selector::{BinarySelector, ContextSelector, ObjectSelector};
/// Immutable snapshots the selector evaluator inspects.
pub use state::{ObjectContext, ObjectState};
/// The object arena and its reference errors.
pub use store::{ObjectStore, StoreError};
