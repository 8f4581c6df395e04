//! The error taxonomy of the engine.
//!
//! Malformed declarations and wrong substitution arity are contract
//! violations: the caller handed over data the grammar forbids, and
//! the operation aborts.  A type mismatch during substitution is
//! different: pattern search tries and rejects candidate bindings as
//! ordinary control flow, so that failure is a variant callers are
//! expected to match on, not a fault to propagate blindly.

use crate::ground::{TermArena, TermId};
use thiserror::Error as ThisError;

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum Error {
    /// The declaration term has a shape the grammar does not allow.
    #[error("malformed declaration: {0}")]
    MalformedDeclaration(String),

    /// The number of substitution values does not match the declared
    /// variable count.
    #[error("expected {expected} substitution values, got {got}")]
    ArityMismatch { expected: usize, got: usize },

    /// Substitution values failed the declared type restrictions.
    /// This is the candidate-filtering branch, not a fault.
    #[error("substitution values do not satisfy the declared type restrictions")]
    TypeMismatch,
}

impl Error {
    /// A malformed-declaration error describing the offending node.
    pub(crate) fn malformed(graph: &TermArena, offender: TermId, expected: &str) -> Self {
        Error::MalformedDeclaration(format!("{}, got {}", expected, graph.display(offender)))
    }
}

#[test]
fn test_display_names_the_offender() {
    let mut arena = TermArena::new();
    let x = arena.variable("$x");
    let error = Error::malformed(&arena, x, "expected a type specifier");
    assert_eq!(
        error.to_string(),
        "malformed declaration: expected a type specifier, got (Variable \"$x\")"
    );

    let arity = Error::ArityMismatch {
        expected: 2,
        got: 3,
    };
    assert_eq!(
        arity.to_string(),
        "expected 2 substitution values, got 3"
    );
}
