use std::cmp::Ordering;

use super::{Constrained, Constraint, ConstraintError};

/// Marker type enforcing that an `f64` lies in the closed percent interval `[0, 100]`.
///
/// Percent-passing values on a size distribution are the typical use.
///
/// ```
/// use twine_comminution::support::constraint::Percentage;
///
/// assert_eq!(Percentage::new(80.0).unwrap().into_inner(), 80.0);
/// assert!(Percentage::new(100.1).is_err());
/// assert!(Percentage::new(-0.5).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Percentage;

impl Percentage {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 100.0;

    /// Constructs a [`Constrained<f64, Percentage>`] if `0 ≤ value ≤ 100`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is outside `[0, 100]` or is `NaN`.
    pub fn new(value: f64) -> Result<Constrained<f64, Percentage>, ConstraintError> {
        Constrained::<f64, Percentage>::new(value)
    }
}

impl Constraint<f64> for Percentage {
    fn check(value: &f64) -> Result<(), ConstraintError> {
        match (
            value.partial_cmp(&Percentage::MIN),
            value.partial_cmp(&Percentage::MAX),
        ) {
            (None, _) | (_, None) => Err(ConstraintError::NotANumber),
            (Some(Ordering::Less), _) => Err(ConstraintError::BelowMinimum),
            (_, Some(Ordering::Greater)) => Err(ConstraintError::AboveMaximum),
            _ => Ok(()),
        }
    }
}
