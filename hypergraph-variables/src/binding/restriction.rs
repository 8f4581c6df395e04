//! Per-variable type restrictions.
//!
//! A variable's restriction is one record holding every constraint
//! category attached to it: the simple nominal-kind set, the deep
//! structural signatures, the fuzzy similarity templates, and the glob
//! match-count interval.  Keeping the categories in a single record,
//! rather than one side table per category, means a merge or an erase
//! cannot leave a variable half-updated.
//!
//! Categories compose as a union: a candidate value is admitted as
//! soon as any present category accepts it, and rejected only if at
//! least one category is present and none accepts.  An absent category
//! imposes nothing; a present-but-empty simple set is the bottom type
//! and admits nothing.

use super::interval::Interval;
use crate::ground::{KindSet, TermArena, TermId};
use std::collections::BTreeSet;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Restriction {
    pub(crate) kinds: Option<KindSet>,
    pub(crate) signatures: Option<BTreeSet<TermId>>,
    pub(crate) fuzzy: Option<BTreeSet<TermId>>,
    pub(crate) interval: Option<Interval>,
}

impl Restriction {
    /// The simple nominal-kind set, if that category is present.
    #[must_use]
    pub fn kinds(&self) -> Option<&KindSet> {
        self.kinds.as_ref()
    }

    /// The deep structural signatures, if that category is present.
    #[must_use]
    pub fn signatures(&self) -> Option<&BTreeSet<TermId>> {
        self.signatures.as_ref()
    }

    /// The similarity templates, if that category is present.  Parsed
    /// and stored, but never matched; see [`Restriction::admits`].
    #[must_use]
    pub fn fuzzy(&self) -> Option<&BTreeSet<TermId>> {
        self.fuzzy.as_ref()
    }

    /// The declared match-count interval, if any.
    #[must_use]
    pub fn interval(&self) -> Option<Interval> {
        self.interval
    }

    /// True when no category is recorded; such a record carries no
    /// information and is never stored.
    pub(crate) fn is_vacuous(&self) -> bool {
        self.kinds.is_none()
            && self.signatures.is_none()
            && self.fuzzy.is_none()
            && self.interval.is_none()
    }

    /// True when the simple set narrowed to nothing.
    #[must_use]
    pub fn is_bottom(&self) -> bool {
        match &self.kinds {
            Some(kinds) => kinds.is_empty(),
            None => false,
        }
    }

    /// Whether a single candidate value passes the present categories.
    ///
    /// # Panics
    ///
    /// Exercising a fuzzy restriction is fatal: similarity matching is
    /// declared in the grammar but intentionally not implemented.
    pub(crate) fn admits(&self, graph: &TermArena, value: TermId) -> bool {
        let mut constrained = false;

        if let Some(kinds) = &self.kinds {
            if kinds.contains(&graph.kind(value)) {
                return true;
            }
            constrained = true;
        }

        if let Some(signatures) = &self.signatures {
            if signatures
                .iter()
                .any(|&signature| graph.signature_match(signature, value))
            {
                return true;
            }
            constrained = true;
        }

        if self.fuzzy.is_some() {
            unimplemented!("similarity matching for fuzzy type restrictions");
        }

        !constrained
    }
}

#[cfg(test)]
fn kind_set(kinds: &[crate::ground::Kind]) -> KindSet {
    kinds.iter().copied().collect()
}

#[test]
fn test_untyped_admits_anything() {
    let mut arena = TermArena::new();
    let concept = arena.kinds_mut().register("Concept", &[]);
    let tiger = arena.node(concept, "tiger");

    let restriction = Restriction::default();
    assert!(restriction.is_vacuous());
    assert!(!restriction.is_bottom());
    assert!(restriction.admits(&arena, tiger));
}

#[test]
fn test_simple_kind_membership() {
    let mut arena = TermArena::new();
    let concept = arena.kinds_mut().register("Concept", &[]);
    let predicate = arena.kinds_mut().register("Predicate", &[]);
    let tiger = arena.node(concept, "tiger");
    let eats = arena.node(predicate, "eats");

    let restriction = Restriction {
        kinds: Some(kind_set(&[concept])),
        ..Restriction::default()
    };
    assert!(restriction.admits(&arena, tiger));
    assert!(!restriction.admits(&arena, eats));
}

#[test]
fn test_bottom_admits_nothing() {
    let mut arena = TermArena::new();
    let concept = arena.kinds_mut().register("Concept", &[]);
    let tiger = arena.node(concept, "tiger");

    let restriction = Restriction {
        kinds: Some(KindSet::new()),
        ..Restriction::default()
    };
    assert!(restriction.is_bottom());
    assert!(!restriction.admits(&arena, tiger));
}

#[test]
fn test_signature_rescues_simple_mismatch() {
    use crate::ground::Kind;

    let mut arena = TermArena::new();
    let concept = arena.kinds_mut().register("Concept", &[]);
    let predicate = arena.kinds_mut().register("Predicate", &[]);
    let eats = arena.node(predicate, "eats");

    let predicate_tag = arena.type_tag(Kind::TYPE, predicate);
    let signature = arena.link(Kind::SIGNATURE, vec![predicate_tag]);

    // The simple set rejects, the signature accepts: union semantics.
    let restriction = Restriction {
        kinds: Some(kind_set(&[concept])),
        signatures: Some([signature].iter().copied().collect()),
        ..Restriction::default()
    };
    assert!(restriction.admits(&arena, eats));
}

#[test]
#[should_panic(expected = "similarity matching")]
fn test_fuzzy_restriction_is_fatal() {
    use crate::ground::Kind;

    let mut arena = TermArena::new();
    let concept = arena.kinds_mut().register("Concept", &[]);
    let tiger = arena.node(concept, "tiger");
    let fuzzy = arena.link(Kind::FUZZY, vec![tiger]);

    let restriction = Restriction {
        fuzzy: Some([fuzzy].iter().copied().collect()),
        ..Restriction::default()
    };
    restriction.admits(&arena, tiger);
}
