//! Variable declarations, type restrictions, and substitution for a
//! hypergraph-structured knowledge base.
//!
//! A pattern over the knowledge base quantifies over variables.  Before
//! the surrounding search can run, each declaration must be parsed into
//! a queryable model: which handles are variables, how many values each
//! may bind (ordinary variables bind exactly one, globs bind an
//! interval-constrained run), and what type restrictions candidate
//! values must satisfy.  This crate owns that model, the checker that
//! validates candidate bindings against it, and the quote-aware
//! substitution (beta-reduction) that instantiates templates once
//! bindings are found.
//!
//! The usual split between static shape and dynamic data pervades the
//! design: declarations are parsed once, with inheritance closures
//! expanded eagerly, so that the per-candidate work of a search is set
//! membership and structural comparison on interned ids.
//!
//! The `ground` module provides the lightweight term representation the
//! engine works over: an interning arena of kinds, leaves, and links,
//! where structural equality is id equality.  The `binding` module is
//! the engine proper.

pub mod binding;
pub mod error;
pub mod ground;

pub use binding::Interval;
pub use binding::Restriction;
pub use binding::Variables;
pub use error::Error;
pub use ground::Kind;
pub use ground::KindSet;
pub use ground::KindSpace;
pub use ground::Quotation;
pub use ground::Taxonomy;
pub use ground::TermArena;
pub use ground::TermId;
