//! Parsing declaration terms into the variable model.
//!
//! A declaration is a single variable, a typed-variable pair, or an
//! ordered/unordered container of those; typed-variable pairs carry
//! the type specifiers the extractor below classifies into the
//! variable's restriction record.  Inheritance-closure specifiers are
//! expanded against the taxonomy here, eagerly, so candidate checking
//! later is pure set membership.
//!
//! Parsing never recovers: a shape the grammar forbids is a contract
//! violation on the caller's side, reported with the offending node
//! printed.  The one deliberate exception is a declaration still under
//! an unquote, which is not yet in reducible form and silently yields
//! the empty model.

use super::interval::Interval;
use super::restriction::Restriction;
use super::variables::Variables;
use crate::error::Error;
use crate::ground::{Kind, KindSet, Taxonomy, TermArena, TermId};
use log::debug;
use std::collections::BTreeSet;

/// Accumulates the classification of one typed-variable's specifiers.
#[derive(Default)]
struct SpecifierAcc {
    kinds: KindSet,
    bottom: bool,
    signatures: BTreeSet<TermId>,
    fuzzy: BTreeSet<TermId>,
}

impl SpecifierAcc {
    fn into_restriction(self, interval: Option<Interval>) -> Restriction {
        let kinds = if self.bottom {
            Some(KindSet::new())
        } else if self.kinds.is_empty() {
            None
        } else {
            Some(self.kinds)
        };

        Restriction {
            kinds,
            signatures: if self.signatures.is_empty() {
                None
            } else {
                Some(self.signatures)
            },
            fuzzy: if self.fuzzy.is_empty() {
                None
            } else {
                Some(self.fuzzy)
            },
            interval,
        }
    }
}

impl Variables {
    /// Builds the model from a raw declaration term; `None` means "no
    /// variables".
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedDeclaration`] when the term is not a
    /// declaration the grammar allows.
    pub fn from_declaration<T: Taxonomy + ?Sized>(
        graph: &TermArena,
        taxonomy: &T,
        declaration: Option<TermId>,
    ) -> Result<Self, Error> {
        let mut vars = Variables::new(false);
        if let Some(declaration) = declaration {
            vars.parse_declaration(graph, taxonomy, declaration)?;
        }
        debug!(
            "parsed declaration: {} variables, ordered: {}",
            vars.len(),
            vars.is_ordered()
        );
        Ok(vars)
    }

    /// Builds the model from the members of an already-unpacked
    /// declaration container.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedDeclaration`] when a member is not a
    /// variable, typed variable, or anchor.
    pub fn from_declarations<T: Taxonomy + ?Sized>(
        graph: &TermArena,
        taxonomy: &T,
        declarations: &[TermId],
        ordered: bool,
    ) -> Result<Self, Error> {
        let mut vars = Variables::new(ordered);
        vars.parse_members(graph, taxonomy, declarations)?;
        Ok(vars)
    }

    fn parse_declaration<T: Taxonomy + ?Sized>(
        &mut self,
        graph: &TermArena,
        taxonomy: &T,
        declaration: TermId,
    ) -> Result<(), Error> {
        let kind = graph.kind(declaration);

        // Order is a property of the outermost container only.
        self.ordered = kind == Kind::VARIABLE_LIST;

        match kind {
            Kind::VARIABLE | Kind::GLOB => {
                self.push_variable(declaration);
                Ok(())
            }
            Kind::TYPED_VARIABLE => self.extract_type(graph, taxonomy, declaration),
            Kind::VARIABLE_LIST | Kind::VARIABLE_SET => {
                self.parse_members(graph, taxonomy, graph.children(declaration))
            }
            // Not yet in reducible form; the real declaration appears
            // after a later rewrite, so yield the empty model.
            Kind::UNQUOTE => Ok(()),
            _ => Err(Error::malformed(
                graph,
                declaration,
                "expected a variable declaration",
            )),
        }
    }

    fn parse_members<T: Taxonomy + ?Sized>(
        &mut self,
        graph: &TermArena,
        taxonomy: &T,
        members: &[TermId],
    ) -> Result<(), Error> {
        for &member in members {
            match graph.kind(member) {
                Kind::VARIABLE | Kind::GLOB => self.push_variable(member),
                Kind::TYPED_VARIABLE => self.extract_type(graph, taxonomy, member)?,
                Kind::ANCHOR => self.anchor = Some(member),
                _ => {
                    return Err(Error::malformed(
                        graph,
                        member,
                        "expected a variable, typed variable, or anchor",
                    ))
                }
            }
        }
        Ok(())
    }

    /// Classifies one typed-variable pair and records the result.  The
    /// variable is appended whether or not any constraint was
    /// recorded.
    fn extract_type<T: Taxonomy + ?Sized>(
        &mut self,
        graph: &TermArena,
        taxonomy: &T,
        pair: TermId,
    ) -> Result<(), Error> {
        let children = graph.children(pair);
        if children.len() != 2 {
            return Err(Error::malformed(
                graph,
                pair,
                "typed variable must pair a variable with a type specifier",
            ));
        }
        let variable = children[0];
        let mut specifier = children[1];

        let variable_kind = graph.kind(variable);
        if variable_kind != Kind::VARIABLE && variable_kind != Kind::GLOB {
            return Err(Error::malformed(
                graph,
                variable,
                "expected a variable or glob on the left of a typed variable",
            ));
        }

        // Aliases resolve before any classification.
        if graph.kind(specifier) == Kind::DEFINED_TYPE {
            specifier = graph.definition(specifier).ok_or_else(|| {
                Error::malformed(graph, specifier, "type alias has no recorded definition")
            })?;
        }

        let mut acc = SpecifierAcc::default();
        let mut interval = None;
        let specifier_kind = graph.kind(specifier);

        if variable_kind == Kind::GLOB && specifier_kind == Kind::TYPE_SET {
            for &member in graph.children(specifier) {
                if graph.kind(member) == Kind::INTERVAL {
                    interval = Some(parse_interval(graph, member)?);
                } else {
                    classify_specifier(graph, taxonomy, member, true, &mut acc)?;
                }
            }
        } else if variable_kind == Kind::GLOB && specifier_kind == Kind::INTERVAL {
            interval = Some(parse_interval(graph, specifier)?);
        } else if specifier_kind == Kind::VARIABLE {
            // A type that is itself a variable is resolved later by
            // the surrounding matcher; record no constraint.
        } else {
            classify_specifier(graph, taxonomy, specifier, true, &mut acc)?;
        }

        let restriction = acc.into_restriction(interval);
        if !restriction.is_vacuous() {
            self.restrictions.insert(variable, restriction);
        }
        self.push_variable(variable);
        Ok(())
    }
}

fn classify_specifier<T: Taxonomy + ?Sized>(
    graph: &TermArena,
    taxonomy: &T,
    specifier: TermId,
    toplevel: bool,
    acc: &mut SpecifierAcc,
) -> Result<(), Error> {
    match graph.kind(specifier) {
        Kind::TYPE => {
            let target = tag_target(graph, specifier)?;
            // The root tag restricts nothing.
            if target != Kind::ATOM {
                acc.kinds.insert(target);
            }
            Ok(())
        }
        Kind::TYPE_INH => {
            let target = tag_target(graph, specifier)?;
            if target != Kind::ATOM {
                acc.kinds.extend(taxonomy.children_recursive(target));
            }
            Ok(())
        }
        Kind::TYPE_CO_INH => {
            let target = tag_target(graph, specifier)?;
            if target == Kind::ATOM {
                // "Any supertype of the root" admits nothing.  As a
                // lone specifier that is the bottom type; as one
                // branch among others it just contributes nothing.
                if toplevel {
                    acc.bottom = true;
                }
            } else {
                acc.kinds.extend(taxonomy.parents_recursive(target));
            }
            Ok(())
        }
        Kind::TYPE_CHOICE if toplevel => {
            let branches = graph.children(specifier);
            if branches.is_empty() {
                acc.bottom = true;
                return Ok(());
            }
            if branches.len() == 1
                && graph.kind(branches[0]) == Kind::TYPE_CO_INH
                && graph.tag_target(branches[0]) == Some(Kind::ATOM)
            {
                acc.bottom = true;
                return Ok(());
            }
            for &branch in branches {
                classify_specifier(graph, taxonomy, branch, false, acc)?;
            }
            Ok(())
        }
        Kind::SIGNATURE => {
            if graph.arity(specifier) != 1 {
                return Err(Error::malformed(
                    graph,
                    specifier,
                    "signature must have exactly one argument",
                ));
            }
            acc.signatures.insert(specifier);
            Ok(())
        }
        Kind::FUZZY => {
            if graph.arity(specifier) != 1 {
                return Err(Error::malformed(
                    graph,
                    specifier,
                    "fuzzy template must have exactly one argument",
                ));
            }
            acc.fuzzy.insert(specifier);
            Ok(())
        }
        _ => Err(Error::malformed(
            graph,
            specifier,
            "expected a type specifier",
        )),
    }
}

fn tag_target(graph: &TermArena, tag: TermId) -> Result<Kind, Error> {
    graph
        .tag_target(tag)
        .ok_or_else(|| Error::malformed(graph, tag, "type tag does not name a kind"))
}

fn parse_interval(graph: &TermArena, interval: TermId) -> Result<Interval, Error> {
    let bounds = graph.children(interval);
    if bounds.len() != 2 {
        return Err(Error::malformed(
            graph,
            interval,
            "interval must have a lower and an upper bound",
        ));
    }
    let lower = graph
        .number_value(bounds[0])
        .ok_or_else(|| Error::malformed(graph, bounds[0], "interval bound must be numeric"))?;
    let upper = graph
        .number_value(bounds[1])
        .ok_or_else(|| Error::malformed(graph, bounds[1], "interval bound must be numeric"))?;
    Ok(Interval::from_bounds(lower, upper))
}
