//! Inclusive match-count intervals for glob variables.

use crate::ground::Kind;

/// An inclusive (lower, upper) bound on how many values a variable
/// binds.  `usize::MAX` as the upper bound means unbounded.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Interval {
    pub lower: usize,
    pub upper: usize,
}

impl Interval {
    /// The unsatisfiable interval an inverted intersection collapses
    /// to.
    pub const EMPTY: Interval = Interval { lower: 0, upper: 0 };

    #[must_use]
    pub fn new(lower: usize, upper: usize) -> Self {
        Self { lower, upper }
    }

    /// Exactly one value: the ordinary-variable default.
    #[must_use]
    pub fn single() -> Self {
        Self::new(1, 1)
    }

    /// One or more values: the glob default.
    #[must_use]
    pub fn at_least_one() -> Self {
        Self::new(1, usize::MAX)
    }

    /// The interval that applies to a variable of `kind` when none was
    /// declared.
    #[must_use]
    pub fn default_for(kind: Kind) -> Self {
        if kind == Kind::GLOB {
            Self::at_least_one()
        } else {
            Self::single()
        }
    }

    /// Builds an interval from raw declaration bounds.  A negative
    /// lower bound clamps to zero; a negative upper bound means
    /// unbounded.
    #[must_use]
    pub fn from_bounds(lower: f64, upper: f64) -> Self {
        let lower = if lower < 0.0 { 0 } else { lower.round() as usize };
        let upper = if upper < 0.0 {
            usize::MAX
        } else {
            upper.round() as usize
        };
        Self { lower, upper }
    }

    #[must_use]
    pub fn is_unbounded(self) -> bool {
        self.upper == usize::MAX
    }

    #[must_use]
    pub fn contains(self, n: usize) -> bool {
        self.lower <= n && n <= self.upper
    }

    /// Narrows to the counts allowed by both intervals; inverted
    /// results collapse to [`Interval::EMPTY`].
    #[must_use]
    pub fn intersect(self, other: Self) -> Self {
        let lower = self.lower.max(other.lower);
        let upper = self.upper.min(other.upper);
        if lower > upper {
            Self::EMPTY
        } else {
            Self { lower, upper }
        }
    }
}

#[test]
fn test_defaults() {
    assert_eq!(Interval::default_for(Kind::VARIABLE), Interval::new(1, 1));
    assert_eq!(Interval::default_for(Kind::GLOB), Interval::new(1, usize::MAX));
    assert!(Interval::default_for(Kind::GLOB).is_unbounded());
}

#[test]
fn test_contains() {
    let interval = Interval::new(2, 3);
    assert!(!interval.contains(1));
    assert!(interval.contains(2));
    assert!(interval.contains(3));
    assert!(!interval.contains(4));

    assert!(Interval::at_least_one().contains(1_000_000));
    assert!(Interval::EMPTY.contains(0));
    assert!(!Interval::EMPTY.contains(1));
}

#[test]
fn test_intersection() {
    assert_eq!(
        Interval::new(1, 5).intersect(Interval::new(3, 10)),
        Interval::new(3, 5)
    );
    assert_eq!(
        Interval::new(1, 2).intersect(Interval::new(5, 9)),
        Interval::EMPTY
    );
    assert_eq!(
        Interval::new(2, 3).intersect(Interval::at_least_one()),
        Interval::new(2, 3)
    );
}

#[test]
fn test_negative_bounds_clamp() {
    assert_eq!(Interval::from_bounds(-2.0, 3.0), Interval::new(0, 3));
    assert_eq!(Interval::from_bounds(1.0, -1.0), Interval::new(1, usize::MAX));
    assert_eq!(Interval::from_bounds(2.0, 3.0), Interval::new(2, 3));
}
