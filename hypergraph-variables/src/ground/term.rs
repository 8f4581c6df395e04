//! The interning term arena.
//!
//! Terms are leaves (named nodes, numeric nodes, kind references) or
//! links (a kind plus a child list).  The arena interns every term, so
//! a `TermId` is a structural identity: two terms are structurally
//! equal iff their ids are equal.  This is what lets the variable model
//! store bare ids in its sequence, set, and restriction maps and still
//! honour "two variables are the same iff their handles are
//! structurally equal".
//!
//! The arena also owns the `KindSpace` (terms are meaningless without
//! their kind names), the alias-definition table that type references
//! resolve against, and the structural-match primitive deep signature
//! restrictions delegate to.
//!
//! TODO: interned data is currently stored twice, once in the id table
//! and once as the dedup key; a fingerprint-keyed table would halve
//! that.

use super::kind::Kind;
use super::taxonomy::{KindSpace, Taxonomy};
use rustc_hash::FxHashMap;

/// A handle to an interned term.  Copyable and cheap; all structure
/// lives in the arena.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TermId(u32);

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
enum Payload {
    /// Named leaf: variables, globs, anchors, knowledge-base nodes.
    Name(Box<str>),
    /// A type tag's target kind.
    KindRef(Kind),
    /// Numeric leaf, stored as bits so the arena can hash it.
    Number(u64),
    /// Link over already-interned children.
    Link(Box<[TermId]>),
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
struct TermData {
    kind: Kind,
    payload: Payload,
}

pub struct TermArena {
    kinds: KindSpace,
    terms: Vec<TermData>,
    interned: FxHashMap<TermData, TermId>,
    definitions: FxHashMap<TermId, TermId>,
}

impl TermArena {
    #[must_use]
    pub fn new() -> Self {
        Self::with_kinds(KindSpace::new())
    }

    #[must_use]
    pub fn with_kinds(kinds: KindSpace) -> Self {
        Self {
            kinds,
            terms: Vec::new(),
            interned: FxHashMap::default(),
            definitions: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn kinds(&self) -> &KindSpace {
        &self.kinds
    }

    pub fn kinds_mut(&mut self) -> &mut KindSpace {
        &mut self.kinds
    }

    fn intern(&mut self, data: TermData) -> TermId {
        if let Some(&id) = self.interned.get(&data) {
            return id;
        }

        assert!(self.terms.len() <= u32::MAX as usize, "term arena overflow");
        let id = TermId(self.terms.len() as u32);
        self.terms.push(data.clone());
        self.interned.insert(data, id);
        id
    }

    fn data(&self, id: TermId) -> &TermData {
        &self.terms[id.0 as usize]
    }

    /// Interns a named leaf of `kind`.
    pub fn node(&mut self, kind: Kind, name: &str) -> TermId {
        self.intern(TermData {
            kind,
            payload: Payload::Name(name.into()),
        })
    }

    /// Interns an ordinary variable.
    pub fn variable(&mut self, name: &str) -> TermId {
        self.node(Kind::VARIABLE, name)
    }

    /// Interns a glob variable.
    pub fn glob(&mut self, name: &str) -> TermId {
        self.node(Kind::GLOB, name)
    }

    /// Interns a numeric leaf.
    pub fn number(&mut self, value: f64) -> TermId {
        self.intern(TermData {
            kind: Kind::NUMBER,
            payload: Payload::Number(value.to_bits()),
        })
    }

    /// Interns a type tag.  `shape` must be one of [`Kind::TYPE`],
    /// [`Kind::TYPE_INH`], [`Kind::TYPE_CO_INH`].
    pub fn type_tag(&mut self, shape: Kind, target: Kind) -> TermId {
        assert!(
            shape == Kind::TYPE || shape == Kind::TYPE_INH || shape == Kind::TYPE_CO_INH,
            "not a type tag shape"
        );
        self.intern(TermData {
            kind: shape,
            payload: Payload::KindRef(target),
        })
    }

    /// Interns a link over already-interned children.
    pub fn link(&mut self, kind: Kind, children: Vec<TermId>) -> TermId {
        self.intern(TermData {
            kind,
            payload: Payload::Link(children.into_boxed_slice()),
        })
    }

    #[must_use]
    pub fn kind(&self, id: TermId) -> Kind {
        self.data(id).kind
    }

    /// The leaf name, if the term is a named leaf.
    #[must_use]
    pub fn name(&self, id: TermId) -> Option<&str> {
        match &self.data(id).payload {
            Payload::Name(name) => Some(name),
            _ => None,
        }
    }

    /// Children of a link; empty for leaves.
    #[must_use]
    pub fn children(&self, id: TermId) -> &[TermId] {
        match &self.data(id).payload {
            Payload::Link(children) => children,
            _ => &[],
        }
    }

    #[must_use]
    pub fn arity(&self, id: TermId) -> usize {
        self.children(id).len()
    }

    #[must_use]
    pub fn number_value(&self, id: TermId) -> Option<f64> {
        match self.data(id).payload {
            Payload::Number(bits) => Some(f64::from_bits(bits)),
            _ => None,
        }
    }

    /// The kind a type tag points at.
    #[must_use]
    pub fn tag_target(&self, id: TermId) -> Option<Kind> {
        match self.data(id).payload {
            Payload::KindRef(target) => Some(target),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_link(&self, id: TermId) -> bool {
        matches!(self.data(id).payload, Payload::Link(_))
    }

    /// True for ordinary variables and globs alike.
    #[must_use]
    pub fn is_variable(&self, id: TermId) -> bool {
        let kind = self.kind(id);
        kind == Kind::VARIABLE || kind == Kind::GLOB
    }

    /// True for a flat ordered list: a `LIST` link none of whose
    /// children is itself a list.  Globs bind values of this shape.
    #[must_use]
    pub fn is_flat_list(&self, id: TermId) -> bool {
        self.kind(id) == Kind::LIST
            && self
                .children(id)
                .iter()
                .all(|&child| self.kind(child) != Kind::LIST)
    }

    /// Records `definition` as the expansion of the alias `alias`.
    pub fn define(&mut self, alias: TermId, definition: TermId) {
        self.definitions.insert(alias, definition);
    }

    #[must_use]
    pub fn definition(&self, alias: TermId) -> Option<TermId> {
        self.definitions.get(&alias).copied()
    }

    /// Structural match of `value` against a signature.  `signature`
    /// must be a one-argument `SIGNATURE` link; the match recurses over
    /// the template underneath, treating embedded type tags as kind
    /// predicates rather than literal leaves.
    #[must_use]
    pub fn signature_match(&self, signature: TermId, value: TermId) -> bool {
        debug_assert_eq!(self.kind(signature), Kind::SIGNATURE);
        match self.children(signature).first() {
            Some(&template) => self.template_match(template, value),
            None => false,
        }
    }

    fn template_match(&self, template: TermId, value: TermId) -> bool {
        if template == value {
            return true;
        }

        match self.kind(template) {
            Kind::TYPE => match self.tag_target(template) {
                Some(Kind::ATOM) => true,
                Some(target) => target == self.kind(value),
                None => false,
            },
            Kind::TYPE_INH => match self.tag_target(template) {
                Some(target) => self
                    .kinds
                    .children_recursive(target)
                    .contains(&self.kind(value)),
                None => false,
            },
            Kind::TYPE_CO_INH => match self.tag_target(template) {
                Some(target) => self
                    .kinds
                    .parents_recursive(target)
                    .contains(&self.kind(value)),
                None => false,
            },
            Kind::TYPE_CHOICE => self
                .children(template)
                .iter()
                .any(|&branch| self.template_match(branch, value)),
            _ => {
                self.is_link(template)
                    && self.is_link(value)
                    && self.kind(template) == self.kind(value)
                    && self.arity(template) == self.arity(value)
                    && self
                        .children(template)
                        .iter()
                        .zip(self.children(value))
                        .all(|(&t, &v)| self.template_match(t, v))
            }
        }
    }

    /// Renders a term as an s-expression, for diagnostics.
    #[must_use]
    pub fn display(&self, id: TermId) -> String {
        let kind_name = self.kinds.name(self.kind(id));
        match &self.data(id).payload {
            Payload::Name(name) => format!("({} \"{}\")", kind_name, name),
            Payload::KindRef(target) => format!("({} {})", kind_name, self.kinds.name(*target)),
            Payload::Number(bits) => format!("({} {})", kind_name, f64::from_bits(*bits)),
            Payload::Link(children) => {
                let mut out = format!("({}", kind_name);
                for &child in children.iter() {
                    out.push(' ');
                    out.push_str(&self.display(child));
                }
                out.push(')');
                out
            }
        }
    }
}

impl Default for TermArena {
    fn default() -> Self {
        Self::new()
    }
}

#[test]
fn test_interning_is_structural_identity() {
    let mut arena = TermArena::new();
    let x1 = arena.variable("$x");
    let x2 = arena.variable("$x");
    let y = arena.variable("$y");
    assert_eq!(x1, x2);
    assert_ne!(x1, y);

    let l1 = arena.link(Kind::LIST, vec![x1, y]);
    let l2 = arena.link(Kind::LIST, vec![x2, y]);
    let l3 = arena.link(Kind::LIST, vec![y, x1]);
    assert_eq!(l1, l2);
    assert_ne!(l1, l3);

    // Same name, different kind: different term.
    let g = arena.glob("$x");
    assert_ne!(x1, g);
}

#[test]
fn test_accessors() {
    let mut arena = TermArena::new();
    let x = arena.variable("$x");
    let two = arena.number(2.0);
    let list = arena.link(Kind::LIST, vec![x, two]);

    assert_eq!(arena.kind(list), Kind::LIST);
    assert_eq!(arena.children(list), &[x, two]);
    assert_eq!(arena.arity(list), 2);
    assert_eq!(arena.arity(x), 0);
    assert_eq!(arena.name(x), Some("$x"));
    assert_eq!(arena.name(list), None);
    assert_eq!(arena.number_value(two), Some(2.0));
    assert_eq!(arena.number_value(x), None);
    assert!(arena.is_link(list));
    assert!(!arena.is_link(x));
    assert!(arena.is_variable(x));
    assert!(!arena.is_variable(two));
}

#[test]
fn test_flat_list_predicate() {
    let mut arena = TermArena::new();
    let x = arena.variable("$x");
    let flat = arena.link(Kind::LIST, vec![x]);
    let nested = arena.link(Kind::LIST, vec![flat]);

    assert!(arena.is_flat_list(flat));
    assert!(!arena.is_flat_list(nested));
    assert!(!arena.is_flat_list(x));
}

#[test]
fn test_alias_definitions() {
    let mut arena = TermArena::new();
    let concept = arena.kinds_mut().register("Concept", &[]);
    let alias = arena.node(Kind::DEFINED_TYPE, "MyType");
    let tag = arena.type_tag(Kind::TYPE, concept);

    assert_eq!(arena.definition(alias), None);
    arena.define(alias, tag);
    assert_eq!(arena.definition(alias), Some(tag));
}

#[test]
fn test_signature_match_on_kind_tags() {
    let mut arena = TermArena::new();
    let node = arena.kinds_mut().register("Node", &[]);
    let concept = arena.kinds_mut().register("Concept", &[node]);
    let predicate = arena.kinds_mut().register("Predicate", &[node]);

    let tiger = arena.node(concept, "tiger");
    let eats = arena.node(predicate, "eats");

    let concept_tag = arena.type_tag(Kind::TYPE, concept);
    let sig = arena.link(Kind::SIGNATURE, vec![concept_tag]);
    assert!(arena.signature_match(sig, tiger));
    assert!(!arena.signature_match(sig, eats));

    // Inheritance-aware tags accept descendants.
    let node_inh = arena.type_tag(Kind::TYPE_INH, node);
    let inh_sig = arena.link(Kind::SIGNATURE, vec![node_inh]);
    assert!(arena.signature_match(inh_sig, tiger));
    assert!(arena.signature_match(inh_sig, eats));
}

#[test]
fn test_signature_match_on_structure() {
    let mut arena = TermArena::new();
    let concept = arena.kinds_mut().register("Concept", &[]);
    let inheritance = arena.kinds_mut().register("Inheritance", &[]);

    let animal = arena.node(concept, "animal");
    let tiger = arena.node(concept, "tiger");
    let stone = arena.node(concept, "stone");

    // (Inheritance (Type Concept) (Concept "animal")): first child by
    // kind, second child literally.
    let concept_tag = arena.type_tag(Kind::TYPE, concept);
    let template = arena.link(inheritance, vec![concept_tag, animal]);
    let sig = arena.link(Kind::SIGNATURE, vec![template]);

    let fits = arena.link(inheritance, vec![tiger, animal]);
    let wrong_tail = arena.link(inheritance, vec![tiger, stone]);
    let wrong_arity = arena.link(inheritance, vec![tiger]);

    assert!(arena.signature_match(sig, fits));
    assert!(!arena.signature_match(sig, wrong_tail));
    assert!(!arena.signature_match(sig, wrong_arity));
    assert!(!arena.signature_match(sig, tiger));
}

#[test]
fn test_display() {
    let mut arena = TermArena::new();
    let concept = arena.kinds_mut().register("Concept", &[]);
    let tag = arena.type_tag(Kind::TYPE, concept);
    let x = arena.variable("$x");
    let pair = arena.link(Kind::TYPED_VARIABLE, vec![x, tag]);

    assert_eq!(
        arena.display(pair),
        "(TypedVariable (Variable \"$x\") (Type Concept))"
    );
}
