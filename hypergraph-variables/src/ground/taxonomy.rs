//! The kind inheritance lattice, and the closure queries the
//! declaration parser runs against it.
//!
//! "This type or any subtype" specifiers are expanded eagerly, at
//! declaration-build time, so the checker only ever performs set
//! membership on pre-expanded kind sets.  The `Taxonomy` trait is the
//! whole interface that expansion consumes; `KindSpace` is the concrete
//! registry the rest of the knowledge base shares.

use super::kind::{Kind, KindSet};
use rustc_hash::FxHashMap;

/// Closure queries over the kind inheritance lattice.  Both closures
/// include the queried tag itself.
pub trait Taxonomy {
    /// The tag together with every kind that descends from it.
    fn children_recursive(&self, tag: Kind) -> KindSet;

    /// The tag together with every kind it descends from.
    fn parents_recursive(&self, tag: Kind) -> KindSet;
}

/// The registry of kinds: names, direct parents, and the builtin
/// grammar kinds pre-installed at construction.
#[derive(Clone, Debug)]
pub struct KindSpace {
    names: Vec<Box<str>>,
    parents: Vec<Vec<Kind>>,
    by_name: FxHashMap<Box<str>, Kind>,
}

/// Builtin names, in id order.  `KindSpace::new` asserts the alignment.
const BUILTINS: &[(Kind, &str)] = &[
    (Kind::ATOM, "Atom"),
    (Kind::VARIABLE, "Variable"),
    (Kind::GLOB, "Glob"),
    (Kind::TYPED_VARIABLE, "TypedVariable"),
    (Kind::TYPE, "Type"),
    (Kind::TYPE_INH, "TypeInh"),
    (Kind::TYPE_CO_INH, "TypeCoInh"),
    (Kind::TYPE_CHOICE, "TypeChoice"),
    (Kind::SIGNATURE, "Signature"),
    (Kind::FUZZY, "Fuzzy"),
    (Kind::INTERVAL, "Interval"),
    (Kind::TYPE_SET, "TypeSet"),
    (Kind::VARIABLE_LIST, "VariableList"),
    (Kind::VARIABLE_SET, "VariableSet"),
    (Kind::ANCHOR, "Anchor"),
    (Kind::QUOTE, "Quote"),
    (Kind::UNQUOTE, "Unquote"),
    (Kind::DEFINED_TYPE, "DefinedType"),
    (Kind::LIST, "List"),
    (Kind::NUMBER, "Number"),
];

impl KindSpace {
    #[must_use]
    pub fn new() -> Self {
        let mut space = KindSpace {
            names: Vec::new(),
            parents: Vec::new(),
            by_name: FxHashMap::default(),
        };

        for (expected, name) in BUILTINS.iter() {
            let parents: &[Kind] = if *expected == Kind::ATOM {
                &[]
            } else {
                &[Kind::ATOM]
            };
            let installed = space.install(name, parents);
            debug_assert_eq!(installed, *expected);
        }

        space
    }

    /// Registers a new kind under `name`.  An empty `parents` slice
    /// roots the kind directly under [`Kind::ATOM`].
    pub fn register(&mut self, name: &str, parents: &[Kind]) -> Kind {
        assert!(
            self.by_name.get(name).is_none(),
            "kind name already registered"
        );
        let parents: &[Kind] = if parents.is_empty() {
            &[Kind::ATOM]
        } else {
            parents
        };
        self.install(name, parents)
    }

    fn install(&mut self, name: &str, parents: &[Kind]) -> Kind {
        for parent in parents {
            assert!(
                (parent.id() as usize) < self.names.len(),
                "parent kind not registered"
            );
        }

        let kind = Kind::from_id(self.names.len());
        self.names.push(name.into());
        self.parents.push(parents.to_vec());
        self.by_name.insert(name.into(), kind);
        kind
    }

    #[must_use]
    pub fn name(&self, kind: Kind) -> &str {
        &self.names[kind.id() as usize]
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<Kind> {
        self.by_name.get(name).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for KindSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl Taxonomy for KindSpace {
    fn children_recursive(&self, tag: Kind) -> KindSet {
        let mut closure = KindSet::new();
        closure.insert(tag);

        // The parent lists form a DAG; iterate to a fixed point rather
        // than materialising a child index.
        loop {
            let mut grew = false;
            for id in 0..self.names.len() {
                let kind = Kind::from_id(id);
                if !closure.contains(&kind)
                    && self.parents[id].iter().any(|p| closure.contains(p))
                {
                    closure.insert(kind);
                    grew = true;
                }
            }
            if !grew {
                return closure;
            }
        }
    }

    fn parents_recursive(&self, tag: Kind) -> KindSet {
        let mut closure = KindSet::new();
        let mut stack = vec![tag];

        while let Some(kind) = stack.pop() {
            if closure.insert(kind) {
                stack.extend(self.parents[kind.id() as usize].iter().copied());
            }
        }

        closure
    }
}

#[test]
fn test_builtins_installed() {
    let space = KindSpace::new();
    assert_eq!(space.name(Kind::GLOB), "Glob");
    assert_eq!(space.find("TypedVariable"), Some(Kind::TYPED_VARIABLE));
    assert_eq!(space.find("NoSuchKind"), None);
    assert!(!space.is_empty());
}

#[test]
fn test_closures_include_self() {
    let space = KindSpace::new();
    assert!(space.children_recursive(Kind::LIST).contains(&Kind::LIST));
    assert!(space.parents_recursive(Kind::LIST).contains(&Kind::LIST));
}

#[test]
fn test_closures_follow_registration() {
    let mut space = KindSpace::new();
    let node = space.register("Node", &[]);
    let concept = space.register("Concept", &[node]);
    let special = space.register("SpecialConcept", &[concept]);

    let down = space.children_recursive(node);
    assert!(down.contains(&node));
    assert!(down.contains(&concept));
    assert!(down.contains(&special));
    assert!(!down.contains(&Kind::LIST));

    let up = space.parents_recursive(special);
    assert!(up.contains(&special));
    assert!(up.contains(&concept));
    assert!(up.contains(&node));
    assert!(up.contains(&Kind::ATOM));
}

#[test]
#[should_panic(expected = "already registered")]
fn test_duplicate_name_rejected() {
    let mut space = KindSpace::new();
    space.register("Concept", &[]);
    space.register("Concept", &[]);
}
