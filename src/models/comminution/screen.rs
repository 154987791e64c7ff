//! Ideal sharp-cutoff screen.
//!
//! Every point of the feed curve at or above the aperture reports to the
//! oversize, every point below it to the undersize. Points are routed
//! unchanged. There is no partition curve and no misplaced material.
//!
//! The feed rate is split by the feed's percent passing at the aperture, so
//! the two products always add back up to the feed.

pub(crate) mod core;

use twine_core::Model;
use uom::si::f64::Length;

use crate::{
    models::comminution::Stream,
    support::constraint::{Constrained, ConstraintResult, StrictlyPositive},
};

pub use self::core::ScreenOutput;

/// A single-deck screen with a fixed aperture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Screen {
    pub aperture: Constrained<Length, StrictlyPositive>,
}

impl Screen {
    /// Creates a screen model.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the aperture is not strictly positive.
    pub fn new(aperture: Length) -> ConstraintResult<Self> {
        Ok(Self {
            aperture: StrictlyPositive::new(aperture)?,
        })
    }
}

impl Model for Screen {
    type Input = Stream;
    type Output = ScreenOutput;
    type Error = std::convert::Infallible;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        Ok(self::core::split(self, input))
    }
}
