#![allow(dead_code)]

use std::collections::BTreeSet;

use tangle_core::{Slot, Tag};

/// Builds a tag set from string literals.
pub fn tags(labels: &[&str]) -> BTreeSet<Tag> {
    labels.iter().copied().map(Tag::from).collect()
}

/// Builds a slot-name set from string literals.
pub fn slots(labels: &[&str]) -> BTreeSet<Slot> {
    labels.iter().copied().map(Slot::from).collect()
}
