//! The variable model: an ordered sequence of distinct variable
//! handles, their restriction records, and the operations the
//! surrounding pattern search drives against them.
//!
//! The sequence carries declaration order; the set gives O(1)
//! membership (the fast lookup really is needed: every candidate check
//! starts with one); the index maps a variable back to its ordinal,
//! which is what positional substitution and alpha-equivalence run on.
//! The three views are kept in sync by construction: every mutation
//! goes through `push_variable` or `erase`.

use super::interval::Interval;
use super::restriction::Restriction;
use crate::ground::{Kind, Quotation, TermArena, TermId};
use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Clone, Debug, Default)]
pub struct Variables {
    pub(crate) seq: Vec<TermId>,
    pub(crate) set: FxHashSet<TermId>,
    pub(crate) index: FxHashMap<TermId, usize>,
    pub(crate) ordered: bool,
    pub(crate) restrictions: FxHashMap<TermId, Restriction>,
    pub(crate) anchor: Option<TermId>,
}

impl Variables {
    #[must_use]
    pub fn new(ordered: bool) -> Self {
        Variables {
            ordered,
            ..Variables::default()
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.seq.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    /// The declared variables, in declaration order.
    #[must_use]
    pub fn variables(&self) -> &[TermId] {
        &self.seq
    }

    #[must_use]
    pub fn contains(&self, var: TermId) -> bool {
        self.set.contains(&var)
    }

    /// The ordinal of `var` in the declaration sequence.
    #[must_use]
    pub fn position(&self, var: TermId) -> Option<usize> {
        self.index.get(&var).copied()
    }

    /// Whether declaration order is semantically significant.
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.ordered
    }

    /// The anchor marker recorded next to the declaration, if any.
    #[must_use]
    pub fn anchor(&self) -> Option<TermId> {
        self.anchor
    }

    /// The restriction record for `var`, if any was declared.
    #[must_use]
    pub fn restriction(&self, var: TermId) -> Option<&Restriction> {
        self.restrictions.get(&var)
    }

    /// True when both models hold exactly the same handles in the same
    /// order.
    #[must_use]
    pub fn is_identical(&self, other: &Variables) -> bool {
        self.seq == other.seq
    }

    /// Appends `var`, keeping the sequence, set, and index views in
    /// sync.  Duplicates are ignored.
    pub(crate) fn push_variable(&mut self, var: TermId) {
        if self.set.insert(var) {
            self.index.insert(var, self.seq.len());
            self.seq.push(var);
        }
    }

    // ---- candidate checking -----------------------------------------

    /// Whether `value` satisfies the restrictions on `var`.
    ///
    /// A lone value can stand for a whole match: when 1 lies within
    /// the variable's interval and the value passes the single-value
    /// test, it is accepted outright, even when the value is itself a
    /// list.  Only after that shortcut fails is the value required to
    /// be a flat list of admissible elements with an in-interval
    /// count.  The shortcut runs first on purpose; the asymmetry is
    /// observable and callers rely on it.
    #[must_use]
    pub fn is_type(&self, graph: &TermArena, var: TermId, value: TermId) -> bool {
        if !self.set.contains(&var) {
            return false;
        }

        let interval = self.interval(graph, var);
        if interval.contains(1) && self.admits(graph, var, value) {
            return true;
        }

        if !graph.is_flat_list(value) || !interval.contains(graph.arity(value)) {
            return false;
        }

        graph
            .children(value)
            .iter()
            .all(|&element| self.admits(graph, var, element))
    }

    fn admits(&self, graph: &TermArena, var: TermId, value: TermId) -> bool {
        match self.restrictions.get(&var) {
            Some(restriction) => restriction.admits(graph, value),
            None => true,
        }
    }

    /// Positional check of a whole candidate sequence; the arity must
    /// match the declared count exactly.
    #[must_use]
    pub fn is_type_sequence(&self, graph: &TermArena, values: &[TermId]) -> bool {
        values.len() == self.seq.len()
            && self
                .seq
                .iter()
                .zip(values)
                .all(|(&var, &value)| self.is_type(graph, var, value))
    }

    /// Lone-variable shortcut: the model must hold exactly one
    /// variable, and `value` must satisfy it.
    #[must_use]
    pub fn is_type_value(&self, graph: &TermArena, value: TermId) -> bool {
        self.seq.len() == 1 && self.is_type(graph, self.seq[0], value)
    }

    /// Whether the lone declared variable admits values of `tag` per
    /// its simple restriction, or is simply untyped.
    #[must_use]
    pub fn is_type_kind(&self, tag: Kind) -> bool {
        if self.seq.len() != 1 {
            return false;
        }
        match self.restrictions.get(&self.seq[0]).and_then(|r| r.kinds()) {
            Some(kinds) => kinds.contains(&tag),
            None => true,
        }
    }

    /// The effective interval for `var`: the declared one, or the
    /// default for the variable's kind.
    #[must_use]
    pub fn interval(&self, graph: &TermArena, var: TermId) -> Interval {
        self.restrictions
            .get(&var)
            .and_then(|r| r.interval())
            .unwrap_or_else(|| Interval::default_for(graph.kind(var)))
    }

    #[must_use]
    pub fn is_lower_bound(&self, graph: &TermArena, var: TermId, n: usize) -> bool {
        n >= self.interval(graph, var).lower
    }

    #[must_use]
    pub fn is_upper_bound(&self, graph: &TermArena, var: TermId, n: usize) -> bool {
        n <= self.interval(graph, var).upper
    }

    /// Whether `var` can match a variable number of values, i.e. its
    /// interval differs from the ordinary-variable default.
    #[must_use]
    pub fn is_globby(&self, graph: &TermArena, var: TermId) -> bool {
        self.interval(graph, var) != Interval::single()
    }

    /// False when some variable's simple restriction narrowed to the
    /// bottom type.
    #[must_use]
    pub fn is_well_typed(&self) -> bool {
        self.restrictions.values().all(|r| !r.is_bottom())
    }

    // ---- equivalence and merge --------------------------------------

    /// Alpha-equivalence: same count, same ordering discipline, and
    /// position by position the same variable kind and restrictions.
    /// Both models must live in the same arena.
    #[must_use]
    pub fn is_equal(&self, graph: &TermArena, other: &Variables) -> bool {
        self.seq.len() == other.seq.len()
            && self.ordered == other.ordered
            && (0..self.seq.len()).all(|i| self.is_equal_at(graph, other, i))
    }

    /// The positional equivalence test behind [`Variables::is_equal`].
    ///
    /// Fuzzy restrictions are not compared: their matching semantics
    /// are unimplemented, so there is nothing sound to compare yet.
    #[must_use]
    pub fn is_equal_at(&self, graph: &TermArena, other: &Variables, position: usize) -> bool {
        let mine = self.seq[position];
        let theirs = other.seq[position];

        // A glob here and an ordinary variable there is a mismatch,
        // whatever the restrictions say.
        if graph.kind(mine) != graph.kind(theirs) {
            return false;
        }

        let my_restriction = self.restrictions.get(&mine);
        let their_restriction = other.restrictions.get(&theirs);

        if my_restriction.and_then(|r| r.kinds()) != their_restriction.and_then(|r| r.kinds()) {
            return false;
        }
        if my_restriction.and_then(|r| r.signatures())
            != their_restriction.and_then(|r| r.signatures())
        {
            return false;
        }

        self.interval(graph, mine) == other.interval(graph, theirs)
    }

    /// Whether `other_var` occupies in `other` the position `var`
    /// occupies here (and, when `check_type`, with equivalent
    /// restrictions at that position).
    #[must_use]
    pub fn is_alpha_convertible(
        &self,
        graph: &TermArena,
        var: TermId,
        other_var: TermId,
        other: &Variables,
        check_type: bool,
    ) -> bool {
        match other.position(other_var) {
            Some(position) => {
                self.seq.get(position) == Some(&var)
                    && (!check_type || self.is_equal_at(graph, other, position))
            }
            None => false,
        }
    }

    /// Merges `other` into `self`.  A shared variable has its simple
    /// restriction narrowed to the intersection and its interval
    /// narrowed to the interval intersection; a new variable is
    /// appended with its whole restriction record.  The result is
    /// ordered if either input was.
    pub fn extend(&mut self, graph: &TermArena, other: &Variables) {
        debug!(
            "extending {} declared variables with {} incoming",
            self.seq.len(),
            other.seq.len()
        );

        for &var in &other.seq {
            if self.set.contains(&var) {
                if let Some(incoming) = other.restrictions.get(&var).and_then(|r| r.kinds()) {
                    let entry = self.restrictions.entry(var).or_default();
                    entry.kinds = Some(match entry.kinds.take() {
                        Some(present) => present.intersection(incoming).copied().collect(),
                        None => incoming.clone(),
                    });
                }
            } else {
                self.push_variable(var);
                if let Some(incoming) = other.restrictions.get(&var) {
                    let mut record = incoming.clone();
                    // The interval merge below owns interval handling.
                    record.interval = None;
                    if !record.is_vacuous() {
                        self.restrictions.insert(var, record);
                    }
                }
            }
            self.extend_interval(graph, var, other);
        }

        self.ordered |= other.ordered;
    }

    /// Narrows the stored interval for `var` against `other`'s
    /// effective one.  Defaults are never materialised: an entry is
    /// written only when the narrowed interval differs from the
    /// variable's default.
    fn extend_interval(&mut self, graph: &TermArena, var: TermId, other: &Variables) {
        let stored = self.restrictions.get(&var).and_then(|r| r.interval());
        let narrowed = match stored {
            Some(interval) => interval.intersect(other.interval(graph, var)),
            None => other.interval(graph, var),
        };
        if narrowed != Interval::default_for(graph.kind(var)) {
            self.restrictions.entry(var).or_default().interval = Some(narrowed);
        }
    }

    /// Removes `var` and its restriction record; later variables shift
    /// down one position.
    pub fn erase(&mut self, var: TermId) {
        self.restrictions.remove(&var);
        if let Some(position) = self.index.remove(&var) {
            self.set.remove(&var);
            self.seq.remove(position);
            for i in position..self.seq.len() {
                self.index.insert(self.seq[i], i);
            }
        }
    }

    // ---- declarative round-trip -------------------------------------

    /// Rebuilds the declaration node for `var`, but names it `alt`:
    /// the alpha-renaming primitive.  With `alt == var` this is the
    /// plain inverse of declaration parsing.
    #[must_use]
    pub fn type_declaration(&self, graph: &mut TermArena, var: TermId, alt: TermId) -> TermId {
        let restriction = self.restrictions.get(&var);

        let mut specifiers: Vec<TermId> = Vec::new();
        if let Some(kinds) = restriction.and_then(|r| r.kinds()) {
            let kinds: Vec<Kind> = kinds.iter().copied().collect();
            for kind in kinds {
                specifiers.push(graph.type_tag(Kind::TYPE, kind));
            }
        }
        if let Some(signatures) = restriction.and_then(|r| r.signatures()) {
            specifiers.extend(signatures.iter().copied());
        }
        if let Some(fuzzy) = restriction.and_then(|r| r.fuzzy()) {
            specifiers.extend(fuzzy.iter().copied());
        }

        // A simple restriction that narrowed to nothing renders as the
        // explicit empty disjunction.
        if specifiers.is_empty() && restriction.map_or(false, |r| r.is_bottom()) {
            let nothing = graph.link(Kind::TYPE_CHOICE, Vec::new());
            return graph.link(Kind::TYPED_VARIABLE, vec![alt, nothing]);
        }

        let interval = self.interval(graph, var);
        if interval != Interval::default_for(graph.kind(var)) {
            let lower = graph.number(interval.lower as f64);
            let upper = if interval.is_unbounded() {
                graph.number(-1.0)
            } else {
                graph.number(interval.upper as f64)
            };
            let bounds = graph.link(Kind::INTERVAL, vec![lower, upper]);

            if specifiers.is_empty() {
                return graph.link(Kind::TYPED_VARIABLE, vec![alt, bounds]);
            }
            let types = if specifiers.len() == 1 {
                specifiers[0]
            } else {
                graph.link(Kind::TYPE_CHOICE, specifiers)
            };
            let wrapper = graph.link(Kind::TYPE_SET, vec![bounds, types]);
            return graph.link(Kind::TYPED_VARIABLE, vec![alt, wrapper]);
        }

        if !specifiers.is_empty() {
            let types = if specifiers.len() == 1 {
                specifiers[0]
            } else {
                graph.link(Kind::TYPE_CHOICE, specifiers)
            };
            return graph.link(Kind::TYPED_VARIABLE, vec![alt, types]);
        }

        alt
    }

    /// Rebuilds the whole outward declaration: one node for a lone
    /// variable, otherwise a list or set container per the ordering
    /// discipline.
    #[must_use]
    pub fn declaration(&self, graph: &mut TermArena) -> TermId {
        let declarations: Vec<TermId> = self
            .seq
            .iter()
            .map(|&var| self.type_declaration(graph, var, var))
            .collect();

        if declarations.len() == 1 {
            return declarations[0];
        }
        let container = if self.ordered {
            Kind::VARIABLE_LIST
        } else {
            Kind::VARIABLE_SET
        };
        graph.link(container, declarations)
    }

    // ---- free-variable scan -----------------------------------------

    /// Collects the variables occurring unquoted in `body`, in
    /// first-occurrence order.  A model built this way is always
    /// unordered and untyped: no declaration was given, so no order or
    /// restriction can be meant.
    #[must_use]
    pub fn from_free_variables(graph: &TermArena, body: TermId) -> Self {
        let mut vars = Variables::new(false);
        vars.scan(graph, body, Quotation::new());
        vars
    }

    /// Like [`Variables::from_free_variables`] over several terms at
    /// once.  When the enclosing link is unordered, occurrence order is
    /// meaningless, so the collected variables are put into a canonical
    /// (kind, name) order instead.
    #[must_use]
    pub fn from_free_variables_in(graph: &TermArena, terms: &[TermId], ordered_link: bool) -> Self {
        let mut vars = Variables::new(false);
        for &term in terms {
            vars.scan(graph, term, Quotation::new());
        }
        if !ordered_link {
            vars.sort_canonical(graph);
        }
        vars
    }

    fn scan(&mut self, graph: &TermArena, term: TermId, quotation: Quotation) {
        if graph.is_variable(term) {
            if quotation.is_unquoted() {
                self.push_variable(term);
            }
            return;
        }
        let next = quotation.descend(graph.kind(term));
        for &child in graph.children(term) {
            self.scan(graph, child, next);
        }
    }

    fn sort_canonical(&mut self, graph: &TermArena) {
        self.seq
            .sort_by_key(|&v| (graph.kind(v), graph.name(v).map(str::to_owned)));
        for i in 0..self.seq.len() {
            self.index.insert(self.seq[i], i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// An arena with a small knowledge-base taxonomy on the side.
    fn fixture() -> (TermArena, Kind, Kind, Kind) {
        let mut arena = TermArena::new();
        let node = arena.kinds_mut().register("Node", &[]);
        let concept = arena.kinds_mut().register("Concept", &[node]);
        let predicate = arena.kinds_mut().register("Predicate", &[node]);
        (arena, node, concept, predicate)
    }

    fn parse(arena: &TermArena, declaration: TermId) -> Variables {
        Variables::from_declaration(arena, arena.kinds(), Some(declaration)).expect("parses")
    }

    #[test]
    fn untyped_variable_accepts_anything() {
        let (mut arena, _, concept, predicate) = fixture();
        let x = arena.variable("$x");
        let vars = parse(&arena, x);

        let tiger = arena.node(concept, "tiger");
        let eats = arena.node(predicate, "eats");
        let link = arena.link(predicate, vec![tiger, eats]);
        assert!(vars.is_type(&arena, x, tiger));
        assert!(vars.is_type(&arena, x, link));
        assert!(vars.is_type_value(&arena, tiger));

        // An undeclared variable never checks.
        let y = arena.variable("$y");
        assert!(!vars.is_type(&arena, y, tiger));
    }

    #[test]
    fn nominal_restriction_checks_kind() {
        let (mut arena, _, concept, predicate) = fixture();
        let x = arena.variable("$x");
        let tag = arena.type_tag(Kind::TYPE, concept);
        let decl = arena.link(Kind::TYPED_VARIABLE, vec![x, tag]);
        let vars = parse(&arena, decl);

        let tiger = arena.node(concept, "tiger");
        let eats = arena.node(predicate, "eats");
        assert!(vars.is_type(&arena, x, tiger));
        assert!(!vars.is_type(&arena, x, eats));
    }

    #[test]
    fn subtype_closure_accepts_descendants() {
        let (mut arena, node, concept, _) = fixture();
        let x = arena.variable("$x");
        let tag = arena.type_tag(Kind::TYPE_INH, node);
        let decl = arena.link(Kind::TYPED_VARIABLE, vec![x, tag]);
        let vars = parse(&arena, decl);

        let tiger = arena.node(concept, "tiger");
        let bare = arena.node(node, "bare");
        let two = arena.number(2.0);
        assert!(vars.is_type(&arena, x, tiger));
        assert!(vars.is_type(&arena, x, bare));
        assert!(!vars.is_type(&arena, x, two));
    }

    #[test]
    fn glob_interval_bounds_list_length() {
        let (mut arena, _, concept, _) = fixture();
        let g = arena.glob("$g");
        let two = arena.number(2.0);
        let three = arena.number(3.0);
        let bounds = arena.link(Kind::INTERVAL, vec![two, three]);
        let decl = arena.link(Kind::TYPED_VARIABLE, vec![g, bounds]);
        let vars = parse(&arena, decl);

        let items: Vec<TermId> = (0..4)
            .map(|i| arena.node(concept, &format!("c{}", i)))
            .collect();
        for len in 1..=4 {
            let list = arena.link(Kind::LIST, items[..len].to_vec());
            assert_eq!(
                vars.is_type(&arena, g, list),
                len == 2 || len == 3,
                "length {}",
                len
            );
        }
    }

    #[test]
    fn glob_element_types_apply_to_every_element() {
        let (mut arena, _, concept, _) = fixture();
        let g = arena.glob("$g");
        let zero = arena.number(0.0);
        let five = arena.number(5.0);
        let bounds = arena.link(Kind::INTERVAL, vec![zero, five]);
        let tag = arena.type_tag(Kind::TYPE, concept);
        let wrapper = arena.link(Kind::TYPE_SET, vec![bounds, tag]);
        let decl = arena.link(Kind::TYPED_VARIABLE, vec![g, wrapper]);
        let vars = parse(&arena, decl);

        let a = arena.node(concept, "a");
        let b = arena.node(concept, "b");
        let two = arena.number(2.0);
        let good = arena.link(Kind::LIST, vec![a, b]);
        let bad = arena.link(Kind::LIST, vec![a, two]);
        let empty = arena.link(Kind::LIST, Vec::new());
        assert!(vars.is_type(&arena, g, good));
        assert!(!vars.is_type(&arena, g, bad));
        assert!(vars.is_type(&arena, g, empty));
    }

    #[test]
    fn trivial_interval_accepts_a_literal_list_value() {
        // An untyped ordinary variable has interval (1,1); a list
        // value passes the single-value shortcut before any arity
        // check applies.
        let (mut arena, _, concept, _) = fixture();
        let x = arena.variable("$x");
        let vars = parse(&arena, x);

        let a = arena.node(concept, "a");
        let b = arena.node(concept, "b");
        let list = arena.link(Kind::LIST, vec![a, b]);
        assert!(vars.is_type(&arena, x, list));
    }

    #[test]
    fn sequence_check_is_positionwise_conjunction() {
        let (mut arena, _, concept, predicate) = fixture();
        let x = arena.variable("$x");
        let y = arena.variable("$y");
        let concept_tag = arena.type_tag(Kind::TYPE, concept);
        let typed_x = arena.link(Kind::TYPED_VARIABLE, vec![x, concept_tag]);
        let predicate_tag = arena.type_tag(Kind::TYPE, predicate);
        let typed_y = arena.link(Kind::TYPED_VARIABLE, vec![y, predicate_tag]);
        let decl = arena.link(Kind::VARIABLE_LIST, vec![typed_x, typed_y]);
        let vars = parse(&arena, decl);

        let tiger = arena.node(concept, "tiger");
        let eats = arena.node(predicate, "eats");
        assert!(vars.is_type_sequence(&arena, &[tiger, eats]));
        assert!(!vars.is_type_sequence(&arena, &[eats, tiger]));
        assert!(!vars.is_type_sequence(&arena, &[tiger]));
        assert!(
            vars.is_type_sequence(&arena, &[tiger, eats])
                == (vars.is_type(&arena, x, tiger) && vars.is_type(&arena, y, eats))
        );
    }

    #[test]
    fn kind_check_consults_the_simple_set() {
        let (mut arena, _, concept, predicate) = fixture();
        let x = arena.variable("$x");
        let tag = arena.type_tag(Kind::TYPE, concept);
        let decl = arena.link(Kind::TYPED_VARIABLE, vec![x, tag]);
        let vars = parse(&arena, decl);
        assert!(vars.is_type_kind(concept));
        assert!(!vars.is_type_kind(predicate));

        let untyped = parse(&arena, x);
        assert!(untyped.is_type_kind(predicate));
    }

    #[test]
    fn interval_helpers() {
        let (mut arena, _, _, _) = fixture();
        let x = arena.variable("$x");
        let g = arena.glob("$g");
        let decl = arena.link(Kind::VARIABLE_SET, vec![x, g]);
        let vars = parse(&arena, decl);

        assert_eq!(vars.interval(&arena, x), Interval::single());
        assert_eq!(vars.interval(&arena, g), Interval::at_least_one());
        assert!(!vars.is_globby(&arena, x));
        assert!(vars.is_globby(&arena, g));
        assert!(vars.is_lower_bound(&arena, g, 1));
        assert!(!vars.is_lower_bound(&arena, g, 0));
        assert!(vars.is_upper_bound(&arena, g, 1_000_000));
        assert!(vars.is_upper_bound(&arena, x, 1));
        assert!(!vars.is_upper_bound(&arena, x, 2));
    }

    #[test]
    fn round_trip_preserves_equivalence() {
        let (mut arena, node, concept, predicate) = fixture();

        // A declaration exercising most of the grammar: a bare
        // variable, a nominally typed one, a choice, and an
        // interval-and-type glob.
        let x = arena.variable("$x");
        let y = arena.variable("$y");
        let concept_tag = arena.type_tag(Kind::TYPE, concept);
        let typed_y = arena.link(Kind::TYPED_VARIABLE, vec![y, concept_tag]);

        let z = arena.variable("$z");
        let predicate_tag = arena.type_tag(Kind::TYPE, predicate);
        let node_tag = arena.type_tag(Kind::TYPE, node);
        let choice = arena.link(Kind::TYPE_CHOICE, vec![predicate_tag, node_tag]);
        let typed_z = arena.link(Kind::TYPED_VARIABLE, vec![z, choice]);

        let g = arena.glob("$g");
        let two = arena.number(2.0);
        let three = arena.number(3.0);
        let bounds = arena.link(Kind::INTERVAL, vec![two, three]);
        let wrapper = arena.link(Kind::TYPE_SET, vec![bounds, concept_tag]);
        let typed_g = arena.link(Kind::TYPED_VARIABLE, vec![g, wrapper]);

        for container in &[Kind::VARIABLE_LIST, Kind::VARIABLE_SET] {
            let decl = arena.link(*container, vec![x, typed_y, typed_z, typed_g]);
            let vars = parse(&arena, decl);
            let rebuilt = vars.declaration(&mut arena);
            let reparsed = parse(&arena, rebuilt);
            assert!(vars.is_equal(&arena, &reparsed));
            assert!(reparsed.is_equal(&arena, &vars));
        }
    }

    #[test]
    fn round_trip_of_a_lone_variable_is_the_variable() {
        let (mut arena, _, _, _) = fixture();
        let x = arena.variable("$x");
        let vars = parse(&arena, x);
        assert_eq!(vars.declaration(&mut arena), x);
    }

    #[test]
    fn bottom_renders_as_the_empty_choice() {
        let (mut arena, _, _, _) = fixture();
        let x = arena.variable("$x");
        let empty_choice = arena.link(Kind::TYPE_CHOICE, Vec::new());
        let decl = arena.link(Kind::TYPED_VARIABLE, vec![x, empty_choice]);
        let vars = parse(&arena, decl);
        assert!(!vars.is_well_typed());

        let rebuilt = vars.declaration(&mut arena);
        assert_eq!(rebuilt, decl);
    }

    #[test]
    fn type_declaration_renames() {
        let (mut arena, _, concept, _) = fixture();
        let x = arena.variable("$x");
        let y = arena.variable("$y");
        let tag = arena.type_tag(Kind::TYPE, concept);
        let decl = arena.link(Kind::TYPED_VARIABLE, vec![x, tag]);
        let vars = parse(&arena, decl);

        let renamed = vars.type_declaration(&mut arena, x, y);
        let expected = arena.link(Kind::TYPED_VARIABLE, vec![y, tag]);
        assert_eq!(renamed, expected);
    }

    #[test]
    fn equality_distinguishes_ordering_and_variable_kind() {
        let (mut arena, _, _, _) = fixture();
        let x = arena.variable("$x");
        let y = arena.variable("$y");
        let g = arena.glob("$g");

        let listed = arena.link(Kind::VARIABLE_LIST, vec![x, y]);
        let setted = arena.link(Kind::VARIABLE_SET, vec![x, y]);
        let ordered = parse(&arena, listed);
        let unordered = parse(&arena, setted);
        assert!(!ordered.is_equal(&arena, &unordered));
        // Identity is about holding the same handles, not about the
        // ordering discipline.
        assert!(ordered.is_identical(&unordered));

        let with_glob = arena.link(Kind::VARIABLE_LIST, vec![x, g]);
        let globbed = parse(&arena, with_glob);
        assert!(!ordered.is_equal(&arena, &globbed));
    }

    #[test]
    fn explicit_default_interval_equals_absent_interval() {
        let (mut arena, _, _, _) = fixture();
        let g = arena.glob("$g");
        let one = arena.number(1.0);
        let minus = arena.number(-1.0);
        let bounds = arena.link(Kind::INTERVAL, vec![one, minus]);
        let decl = arena.link(Kind::TYPED_VARIABLE, vec![g, bounds]);

        let explicit = parse(&arena, decl);
        let implicit = parse(&arena, g);
        assert!(explicit.is_equal(&arena, &implicit));
    }

    #[test]
    fn alpha_convertibility() {
        let (mut arena, node, concept, _) = fixture();
        let a = arena.variable("$a");
        let b = arena.variable("$b");
        let concept_tag = arena.type_tag(Kind::TYPE, concept);
        let node_tag = arena.type_tag(Kind::TYPE, node);

        let decl_a = arena.link(Kind::TYPED_VARIABLE, vec![a, concept_tag]);
        let decl_b_same = arena.link(Kind::TYPED_VARIABLE, vec![b, concept_tag]);
        let decl_b_other = arena.link(Kind::TYPED_VARIABLE, vec![b, node_tag]);

        let vars_a = parse(&arena, decl_a);
        let vars_b_same = parse(&arena, decl_b_same);
        let vars_b_other = parse(&arena, decl_b_other);

        assert!(vars_a.is_alpha_convertible(&arena, a, b, &vars_b_same, true));
        assert!(vars_b_same.is_alpha_convertible(&arena, b, a, &vars_a, true));
        assert!(!vars_a.is_alpha_convertible(&arena, a, b, &vars_b_other, true));
        assert!(vars_a.is_alpha_convertible(&arena, a, b, &vars_b_other, false));

        // Position must match, not just membership.
        let c = arena.variable("$c");
        let two = arena.link(Kind::VARIABLE_LIST, vec![c, b]);
        let vars_two = parse(&arena, two);
        assert!(!vars_a.is_alpha_convertible(&arena, a, b, &vars_two, false));
    }

    #[test]
    fn extend_narrows_shared_simple_sets() {
        let (mut arena, _, concept, predicate) = fixture();
        let number = Kind::NUMBER;
        let x = arena.variable("$x");

        let concept_tag = arena.type_tag(Kind::TYPE, concept);
        let number_tag = arena.type_tag(Kind::TYPE, number);
        let predicate_tag = arena.type_tag(Kind::TYPE, predicate);

        let left_choice = arena.link(Kind::TYPE_CHOICE, vec![concept_tag, number_tag]);
        let left_decl = arena.link(Kind::TYPED_VARIABLE, vec![x, left_choice]);
        let right_choice = arena.link(Kind::TYPE_CHOICE, vec![number_tag, predicate_tag]);
        let right_decl = arena.link(Kind::TYPED_VARIABLE, vec![x, right_choice]);

        let mut left = parse(&arena, left_decl);
        let right = parse(&arena, right_decl);
        left.extend(&arena, &right);

        let expected: crate::ground::KindSet = [number].iter().copied().collect();
        assert_eq!(left.restriction(x).and_then(|r| r.kinds()), Some(&expected));
        assert!(left.is_well_typed());
    }

    #[test]
    fn extend_narrows_intervals() {
        let (mut arena, _, _, _) = fixture();
        let g = arena.glob("$g");

        let interval_decl = |arena: &mut TermArena, lo: f64, hi: f64| {
            let lo = arena.number(lo);
            let hi = arena.number(hi);
            let bounds = arena.link(Kind::INTERVAL, vec![lo, hi]);
            arena.link(Kind::TYPED_VARIABLE, vec![g, bounds])
        };

        let d15 = interval_decl(&mut arena, 1.0, 5.0);
        let d310 = interval_decl(&mut arena, 3.0, 10.0);
        let mut left = parse(&arena, d15);
        let right = parse(&arena, d310);
        left.extend(&arena, &right);
        assert_eq!(left.interval(&arena, g), Interval::new(3, 5));

        let d12 = interval_decl(&mut arena, 1.0, 2.0);
        let d59 = interval_decl(&mut arena, 5.0, 9.0);
        let mut left = parse(&arena, d12);
        let right = parse(&arena, d59);
        left.extend(&arena, &right);
        assert_eq!(left.interval(&arena, g), Interval::EMPTY);
    }

    #[test]
    fn extend_appends_new_variables_with_their_records() {
        let (mut arena, _, concept, _) = fixture();
        let x = arena.variable("$x");
        let y = arena.variable("$y");
        let tag = arena.type_tag(Kind::TYPE, concept);
        let typed_y = arena.link(Kind::TYPED_VARIABLE, vec![y, tag]);
        let listed = arena.link(Kind::VARIABLE_LIST, vec![typed_y]);

        let mut left = parse(&arena, x);
        let right = parse(&arena, listed);
        assert!(!left.is_ordered());
        left.extend(&arena, &right);

        assert_eq!(left.variables(), &[x, y]);
        assert!(left.is_ordered());
        let expected: crate::ground::KindSet = [concept].iter().copied().collect();
        assert_eq!(left.restriction(y).and_then(|r| r.kinds()), Some(&expected));
    }

    #[test]
    fn erase_removes_every_trace() {
        let (mut arena, _, concept, _) = fixture();
        let x = arena.variable("$x");
        let y = arena.variable("$y");
        let z = arena.variable("$z");
        let tag = arena.type_tag(Kind::TYPE, concept);
        let typed_y = arena.link(Kind::TYPED_VARIABLE, vec![y, tag]);
        let decl = arena.link(Kind::VARIABLE_LIST, vec![x, typed_y, z]);

        let mut vars = parse(&arena, decl);
        vars.erase(y);

        assert_eq!(vars.variables(), &[x, z]);
        assert!(!vars.contains(y));
        assert_eq!(vars.position(z), Some(1));
        assert!(vars.restriction(y).is_none());

        // Erasing an unknown variable is a no-op.
        vars.erase(y);
        assert_eq!(vars.len(), 2);
    }

    #[test]
    fn free_variable_scan_respects_quotation() {
        let (mut arena, _, concept, predicate) = fixture();
        let x = arena.variable("$x");
        let y = arena.variable("$y");
        let z = arena.variable("$z");
        let tiger = arena.node(concept, "tiger");

        let quoted_y = arena.link(Kind::QUOTE, vec![y]);
        let unquoted_z = arena.link(Kind::UNQUOTE, vec![z]);
        let quoted_wrap = arena.link(Kind::QUOTE, vec![unquoted_z]);
        let body = arena.link(predicate, vec![x, tiger, quoted_y, quoted_wrap, x]);

        let vars = Variables::from_free_variables(&arena, body);
        assert_eq!(vars.variables(), &[x, z]);
        assert!(!vars.is_ordered());
        assert!(vars.restriction(x).is_none());
    }

    #[test]
    fn free_variable_scan_canonicalises_unordered_links() {
        let (mut arena, _, _, _) = fixture();
        let b = arena.variable("$b");
        let a = arena.variable("$a");
        let g = arena.glob("$0");

        let occurrence = Variables::from_free_variables_in(&arena, &[b, g, a], true);
        assert_eq!(occurrence.variables(), &[b, g, a]);

        let canonical = Variables::from_free_variables_in(&arena, &[b, g, a], false);
        assert_eq!(canonical.variables(), &[a, b, g]);
        assert_eq!(canonical.position(g), Some(2));
    }
}
