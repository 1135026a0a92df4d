//! Selector matching: direct and one-hop checks over snapshots, plus
//! store-level selection.

#![allow(missing_docs)]

use std::collections::BTreeMap;

use tangle_core::{
    BinarySelector, ContextSelector, ObjectContext, ObjectSelector, ObjectState, ObjectStore, Slot,
};

mod common;
use common::{slots, tags};

fn state(tag_labels: &[&str], slot_labels: &[&str]) -> ObjectState {
    ObjectState {
        tags: tags(tag_labels),
        slots: slots(slot_labels),
    }
}

fn context(direct: ObjectState, indirect: &[(&str, ObjectState)]) -> ObjectContext {
    ObjectContext {
        direct,
        indirect: indirect
            .iter()
            .map(|(slot, st)| (Slot::from(*slot), st.clone()))
            .collect(),
    }
}

#[test]
fn empty_selector_matches_every_context() {
    let selector = ContextSelector::default();

    assert!(selector.matches(&ObjectContext::default()));
    assert!(selector.matches(&context(
        state(&["test"], &["next"]),
        &[("next", state(&["node"], &[]))],
    )));
}

#[test]
fn direct_present_requires_subset() {
    let selector = ContextSelector {
        direct: ObjectSelector {
            present: tags(&["test"]),
            ..ObjectSelector::default()
        },
        ..ContextSelector::default()
    };

    assert!(selector.matches(&context(state(&["test"], &[]), &[])));
    assert!(selector.matches(&context(state(&["test", "extra"], &[]), &[])));
    assert!(!selector.matches(&context(state(&["bad"], &[]), &[])));
}

#[test]
fn direct_absent_requires_disjoint() {
    let selector = ContextSelector {
        direct: ObjectSelector {
            absent: tags(&["bad"]),
            ..ObjectSelector::default()
        },
        ..ContextSelector::default()
    };

    assert!(selector.matches(&context(state(&["test"], &[]), &[])));
    assert!(!selector.matches(&context(state(&["bad"], &[]), &[])));
}

#[test]
fn direct_present_and_absent_compose() {
    let selector = ContextSelector {
        direct: ObjectSelector {
            present: tags(&["node"]),
            absent: tags(&["bad"]),
            ..ObjectSelector::default()
        },
        ..ContextSelector::default()
    };

    assert!(selector.matches(&context(state(&["good", "node"], &[]), &[])));
    assert!(!selector.matches(&context(state(&["bad", "node"], &[]), &[])));
}

#[test]
fn bound_and_unbound_check_slot_names() {
    let selector = ObjectSelector {
        bound: slots(&["next"]),
        unbound: slots(&["prev"]),
        ..ObjectSelector::default()
    };

    assert!(selector.matches(&state(&[], &["next"])));
    assert!(selector.matches(&state(&[], &["next", "other"])));
    assert!(!selector.matches(&state(&[], &[])));
    assert!(!selector.matches(&state(&[], &["next", "prev"])));
}

#[test]
fn contradictory_selector_never_matches() {
    // Construction is permissive; a selector requiring the same label both
    // ways is legal and simply unsatisfiable.
    let selector = ObjectSelector {
        present: tags(&["x"]),
        absent: tags(&["x"]),
        ..ObjectSelector::default()
    };

    assert!(!selector.matches(&state(&[], &[])));
    assert!(!selector.matches(&state(&["x"], &[])));
    assert!(!selector.matches(&state(&["x", "y"], &[])));
}

#[test]
fn indirect_entry_checks_the_linked_state() {
    let ctx = context(
        state(&["head"], &["next", "other"]),
        &[
            ("next", state(&["node"], &[])),
            ("other", state(&["bogus"], &[])),
        ],
    );

    let hit = ContextSelector {
        indirect: BTreeMap::from([(
            Slot::from("next"),
            ObjectSelector {
                present: tags(&["node"]),
                ..ObjectSelector::default()
            },
        )]),
        ..ContextSelector::default()
    };
    assert!(hit.matches(&ctx));

    let miss = ContextSelector {
        indirect: BTreeMap::from([(
            Slot::from("next"),
            ObjectSelector {
                present: tags(&["bogus"]),
                ..ObjectSelector::default()
            },
        )]),
        ..ContextSelector::default()
    };
    assert!(!miss.matches(&ctx));

    let composed = ContextSelector {
        indirect: BTreeMap::from([(
            Slot::from("next"),
            ObjectSelector {
                present: tags(&["node"]),
                absent: tags(&["bogus"]),
                ..ObjectSelector::default()
            },
        )]),
        ..ContextSelector::default()
    };
    assert!(composed.matches(&ctx));
}

#[test]
fn unbound_indirect_entry_fails_whatever_the_nested_selector_asks() {
    let ctx = context(state(&["head"], &["next"]), &[("next", state(&["node"], &[]))]);

    // Presence through a missing slot fails.
    let present = ContextSelector {
        indirect: BTreeMap::from([(
            Slot::from("unknown"),
            ObjectSelector {
                present: tags(&["node"]),
                ..ObjectSelector::default()
            },
        )]),
        ..ContextSelector::default()
    };
    assert!(!present.matches(&ctx));

    // Absence through a missing slot fails too — never vacuously satisfied.
    let absent = ContextSelector {
        indirect: BTreeMap::from([(
            Slot::from("unknown"),
            ObjectSelector {
                absent: tags(&["node"]),
                ..ObjectSelector::default()
            },
        )]),
        ..ContextSelector::default()
    };
    assert!(!absent.matches(&ctx));

    // Even an empty nested selector cannot match through an unbound slot.
    let empty = ContextSelector {
        indirect: BTreeMap::from([(Slot::from("unknown"), ObjectSelector::default())]),
        ..ContextSelector::default()
    };
    assert!(!empty.matches(&ctx));
}

#[test]
fn select_finds_objects_whose_context_matches() {
    let mut store = ObjectStore::new();
    let head = store.create();
    let node = store.create();
    store.update(head, tags(&["head"])).unwrap();
    store.update(node, tags(&["node"])).unwrap();
    store.bind(head, node, Slot::from("next")).unwrap();

    let selector = ContextSelector {
        indirect: BTreeMap::from([(
            Slot::from("next"),
            ObjectSelector {
                present: tags(&["node"]),
                ..ObjectSelector::default()
            },
        )]),
        ..ContextSelector::default()
    };

    // head's context reaches a "node" through "next"; node has no "next".
    assert!(selector.matches(&store.context(head).unwrap()));
    assert!(!selector.matches(&store.context(node).unwrap()));
    assert_eq!(store.select(&selector), vec![head]);
}

#[test]
fn select_returns_ascending_handles() {
    let mut store = ObjectStore::new();
    let mut expected = Vec::new();
    for _ in 0..5 {
        let oid = store.create();
        store.update(oid, tags(&["node"])).unwrap();
        expected.push(oid);
    }

    let selector = ContextSelector {
        direct: ObjectSelector {
            present: tags(&["node"]),
            ..ObjectSelector::default()
        },
        ..ContextSelector::default()
    };
    assert_eq!(store.select(&selector), expected);
}

#[test]
fn binary_selector_matches_sides_independently() {
    let predator_ctx = context(state(&["predator", "hungry"], &[]), &[]);
    let prey_ctx = context(state(&["prey"], &[]), &[]);

    let selector = BinarySelector {
        left: ContextSelector {
            direct: ObjectSelector {
                present: tags(&["predator"]),
                ..ObjectSelector::default()
            },
            ..ContextSelector::default()
        },
        right: ContextSelector {
            direct: ObjectSelector {
                present: tags(&["prey"]),
                ..ObjectSelector::default()
            },
            ..ContextSelector::default()
        },
    };

    assert!(selector.matches(&predator_ctx, &prey_ctx));
    assert!(!selector.matches(&prey_ctx, &predator_ctx));
}

#[test]
fn select_pairs_crosses_matching_sides_and_skips_identity() {
    let mut store = ObjectStore::new();
    let p1 = store.create();
    let p2 = store.create();
    let q = store.create();
    let both = store.create();
    store.update(p1, tags(&["left"])).unwrap();
    store.update(p2, tags(&["left"])).unwrap();
    store.update(q, tags(&["right"])).unwrap();
    store.update(both, tags(&["left", "right"])).unwrap();

    let selector = BinarySelector {
        left: ContextSelector {
            direct: ObjectSelector {
                present: tags(&["left"]),
                ..ObjectSelector::default()
            },
            ..ContextSelector::default()
        },
        right: ContextSelector {
            direct: ObjectSelector {
                present: tags(&["right"]),
                ..ObjectSelector::default()
            },
            ..ContextSelector::default()
        },
    };

    // `both` matches each side, but never pairs with itself.
    assert_eq!(
        store.select_pairs(&selector),
        vec![(p1, q), (p1, both), (p2, q), (p2, both), (both, q)]
    );
}
