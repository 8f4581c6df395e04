//! The variable-binding engine: declaration parsing, type
//! restrictions, candidate checking, substitution, and the operations
//! that compare and merge independently built variable sets.
//!
//! A `Variables` model is built once per pattern, then consumed
//! read-only by arbitrarily many candidate checks; only `extend` and
//! `erase` mutate it afterwards, and both take `&mut self`, so the
//! construct-then-freeze discipline is enforced by the borrow checker
//! rather than by convention.

mod declare;
mod interval;
mod restriction;
mod substitute;
mod variables;

pub use interval::Interval;
pub use restriction::Restriction;
pub use variables::Variables;
