//! Ground data: the term graph and its kind system.
//!
//! The engine manipulates opaque handles into a term graph, adorned
//! with a nominal kind.  Everything here is deliberately light: terms
//! are interned, handles are 32-bit ids, and structural equality is id
//! equality.  Shape metadata that applies to whole families of terms
//! (kind names, the inheritance lattice) is hoisted out of the terms
//! themselves into a `KindSpace` stored once next to the arena; this
//! saves space and lets the checker compare kinds without touching
//! strings.

mod kind;
mod quotation;
mod taxonomy;
mod term;

pub use kind::Kind;
pub use kind::KindSet;
pub use quotation::Quotation;
pub use taxonomy::KindSpace;
pub use taxonomy::Taxonomy;
pub use term::TermArena;
pub use term::TermId;
