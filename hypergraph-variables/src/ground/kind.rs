//! Nominal kinds classify every term in the graph.  The grammar kinds
//! the engine itself interprets are pre-assigned low ids; knowledge-base
//! kinds are registered at runtime in a `KindSpace`.

use std::collections::BTreeSet;

/// A nominal term kind.  Kinds double as the tags of the simple type
/// system: restricting a variable to `Concept` restricts the kind of
/// the values it may bind.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Kind(u16);

/// Sets of kinds are ordered: equivalence checks and round-tripped
/// declarations must not depend on hash order.
pub type KindSet = BTreeSet<Kind>;

impl Kind {
    /// The universal root: every registered kind inherits from it, and
    /// a restriction naming it restricts nothing.
    pub const ATOM: Kind = Kind(0);
    /// An ordinary variable; binds exactly one value.
    pub const VARIABLE: Kind = Kind(1);
    /// A glob variable; binds an interval-constrained run of values.
    pub const GLOB: Kind = Kind(2);
    /// Pair of a variable and a type specifier.
    pub const TYPED_VARIABLE: Kind = Kind(3);
    /// A nominal type tag.
    pub const TYPE: Kind = Kind(4);
    /// A type tag together with its recursive subtypes.
    pub const TYPE_INH: Kind = Kind(5);
    /// A type tag together with its recursive supertypes.
    pub const TYPE_CO_INH: Kind = Kind(6);
    /// Disjunction of type specifiers; empty means bottom.
    pub const TYPE_CHOICE: Kind = Kind(7);
    /// One-argument structural match template.
    pub const SIGNATURE: Kind = Kind(8);
    /// One-argument similarity template.
    pub const FUZZY: Kind = Kind(9);
    /// Two numeric bounds on a glob's match count.
    pub const INTERVAL: Kind = Kind(10);
    /// Combines an interval with type specifiers for a glob.
    pub const TYPE_SET: Kind = Kind(11);
    /// Ordered variable declaration container.
    pub const VARIABLE_LIST: Kind = Kind(12);
    /// Unordered variable declaration container.
    pub const VARIABLE_SET: Kind = Kind(13);
    /// Marker recorded next to a declaration; not a bindable variable.
    pub const ANCHOR: Kind = Kind(14);
    /// Suspends substitution for the subtree underneath.
    pub const QUOTE: Kind = Kind(15);
    /// Undoes one level of quotation.  A declaration headed by this
    /// kind is not yet in reducible form and parses to an empty model.
    pub const UNQUOTE: Kind = Kind(16);
    /// Reference to a named type alias.
    pub const DEFINED_TYPE: Kind = Kind(17);
    /// Flat ordered list; the shape a glob binds.
    pub const LIST: Kind = Kind(18);
    /// Numeric leaf; interval bounds are made of these.
    pub const NUMBER: Kind = Kind(19);

    /// The raw id, mostly useful for indexing side tables.
    #[must_use]
    pub fn id(self) -> u16 {
        self.0
    }

    pub(crate) fn from_id(id: usize) -> Self {
        assert!(id <= u16::MAX as usize, "kind space overflow");
        Kind(id as u16)
    }
}

#[test]
fn test_ids_round_trip() {
    assert_eq!(Kind::from_id(Kind::GLOB.id() as usize), Kind::GLOB);
    assert_ne!(Kind::VARIABLE, Kind::GLOB);
}

#[test]
fn test_kind_sets_are_ordered() {
    let mut set = KindSet::new();
    set.insert(Kind::LIST);
    set.insert(Kind::ATOM);
    set.insert(Kind::GLOB);

    let collected: Vec<Kind> = set.iter().copied().collect();
    assert_eq!(collected, vec![Kind::ATOM, Kind::GLOB, Kind::LIST]);
}
