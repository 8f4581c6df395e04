//! Substitution of bound values into templates.
//!
//! Substitution is purely syntactic: every unquoted occurrence of a
//! declared variable is replaced by its positionally corresponding
//! value, and nothing is evaluated.  Values are validated against the
//! declared restrictions first.  The result is a fresh interned term
//! the caller owns; nothing else in the graph is touched.

use super::variables::Variables;
use crate::error::Error;
use crate::ground::{Quotation, TermArena, TermId};
use log::trace;
use std::collections::HashMap;
use std::hash::BuildHasher;

impl Variables {
    /// Replaces each declared variable with the positionally
    /// corresponding value, at every unquoted occurrence in
    /// `template`.
    ///
    /// # Errors
    ///
    /// [`Error::ArityMismatch`] when the value count differs from the
    /// declared count; [`Error::TypeMismatch`] when the values fail
    /// the declared restrictions.  The latter is the filtering branch:
    /// callers trying candidate bindings match on it and move on.
    pub fn substitute(
        &self,
        graph: &mut TermArena,
        template: TermId,
        values: &[TermId],
    ) -> Result<TermId, Error> {
        self.check_arity(values)?;
        if !self.is_type_sequence(graph, values) {
            return Err(Error::TypeMismatch);
        }
        trace!("substituting {} values", values.len());
        Ok(self.replace(graph, template, values, Quotation::new()))
    }

    /// Like [`Variables::substitute`], with the bindings given as a
    /// map.  The map is linearised into declaration order first;
    /// unmapped variables are bound to themselves.
    ///
    /// # Errors
    ///
    /// As for [`Variables::substitute`].
    pub fn substitute_map<H: BuildHasher>(
        &self,
        graph: &mut TermArena,
        template: TermId,
        bindings: &HashMap<TermId, TermId, H>,
    ) -> Result<TermId, Error> {
        let values = self.make_sequence(bindings);
        self.substitute(graph, template, &values)
    }

    /// Substitution without type validation; the arity contract still
    /// holds.
    ///
    /// # Errors
    ///
    /// [`Error::ArityMismatch`] when the value count differs from the
    /// declared count.
    pub fn substitute_unchecked(
        &self,
        graph: &mut TermArena,
        template: TermId,
        values: &[TermId],
    ) -> Result<TermId, Error> {
        self.check_arity(values)?;
        Ok(self.replace(graph, template, values, Quotation::new()))
    }

    /// Linearises a binding map into declaration order.  Variables the
    /// map does not mention are bound to themselves.
    #[must_use]
    pub fn make_sequence<H: BuildHasher>(
        &self,
        bindings: &HashMap<TermId, TermId, H>,
    ) -> Vec<TermId> {
        self.variables()
            .iter()
            .map(|var| bindings.get(var).copied().unwrap_or(*var))
            .collect()
    }

    fn check_arity(&self, values: &[TermId]) -> Result<(), Error> {
        if values.len() == self.len() {
            Ok(())
        } else {
            Err(Error::ArityMismatch {
                expected: self.len(),
                got: values.len(),
            })
        }
    }

    fn replace(
        &self,
        graph: &mut TermArena,
        term: TermId,
        values: &[TermId],
        quotation: Quotation,
    ) -> TermId {
        if quotation.is_unquoted() {
            if let Some(position) = self.position(term) {
                return values[position];
            }
        }

        if !graph.is_link(term) {
            return term;
        }

        let kind = graph.kind(term);
        let children: Vec<TermId> = graph.children(term).to_vec();
        let child_quotation = quotation.descend(kind);
        let replaced: Vec<TermId> = children
            .iter()
            .map(|&child| self.replace(graph, child, values, child_quotation))
            .collect();

        if replaced == children {
            term
        } else {
            graph.link(kind, replaced)
        }
    }
}
