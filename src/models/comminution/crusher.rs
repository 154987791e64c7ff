//! Jaw and cone crushers.
//!
//! A crusher takes its feed stream and a closed-side setting (CSS) and
//! reports the comminution energy, the motor power it implies at plant
//! throughput, and the product stream.
//!
//! The model makes two deliberate simplifications:
//!
//! - The product P80 equals the CSS. There is no separate breakage function.
//! - The product curve is a synthetic Gaudin–Schuhmann curve through that P80,
//!   with a shape exponent fixed per crusher family.
//!
//! Specific energy follows Bond's law with sizes in micrometres,
//! `E = 11·Wi·(1/√P80 − 1/√F80)`, and is zero whenever the feed is already at
//! or below the setting. Motor power applies a family correction factor to
//! `E × plant rate`.
//!
//! # Example
//!
//! ```
//! use twine_comminution::models::comminution::{
//!     Stream,
//!     crusher::{Crusher, CrusherFamily, CrusherInput},
//! };
//! use twine_comminution::support::{
//!     psd::SizeDistribution,
//!     units::{kilowatt_hours_per_tonne, tonnes_per_hour},
//! };
//! use twine_core::Model;
//! use uom::si::{f64::Length, length::millimeter, power::kilowatt};
//!
//! let crusher = Crusher::new(
//!     CrusherFamily::Jaw,
//!     Length::new::<millimeter>(60.0),
//!     kilowatt_hours_per_tonne(14.0),
//! )
//! .unwrap();
//!
//! let feed = SizeDistribution::from_rows([(50.0, 12.0), (100.0, 40.0), (200.0, 82.0), (400.0, 100.0)]);
//! let input = CrusherInput::new(Stream::new(feed, tonnes_per_hour(300.0)), tonnes_per_hour(300.0));
//!
//! let output = crusher.call(&input).unwrap();
//! assert!((output.p80.get::<millimeter>() - 60.0).abs() < 1e-9);
//! assert!(output.power.get::<kilowatt>() > 0.0);
//! ```

pub(crate) mod core;
mod error;

use serde::{Deserialize, Serialize};
use twine_core::Model;
use uom::si::f64::{Length, MassRate};

use crate::{
    models::comminution::Stream,
    support::{
        constraint::{Constrained, ConstraintResult, StrictlyPositive},
        units::SpecificEnergy,
    },
};

pub use self::core::CrusherOutput;
pub use error::CrusherError;

/// Crusher families with their empirical constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrusherFamily {
    Jaw,
    Cone,
}

impl CrusherFamily {
    /// Multiplier applied to `E × plant rate` to get installed motor power.
    #[must_use]
    pub fn power_correction(self) -> f64 {
        match self {
            Self::Jaw => 2.0,
            Self::Cone => 1.3,
        }
    }

    /// Gaudin–Schuhmann shape exponent of the product curve.
    #[must_use]
    pub fn shape_exponent(self) -> f64 {
        match self {
            Self::Jaw => 0.88,
            Self::Cone => 0.87,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jaw => "jaw",
            Self::Cone => "cone",
        }
    }
}

/// A crusher at a fixed setting, crushing ore of a given hardness.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crusher {
    pub family: CrusherFamily,
    pub css: Constrained<Length, StrictlyPositive>,
    pub work_index: Constrained<SpecificEnergy, StrictlyPositive>,

    /// Gaudin–Schuhmann exponent of the product curve.
    ///
    /// Defaults to [`CrusherFamily::shape_exponent`].
    pub shape_exponent: Constrained<f64, StrictlyPositive>,
}

impl Crusher {
    /// Creates a crusher model.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the CSS or the work index is not strictly positive.
    pub fn new(
        family: CrusherFamily,
        css: Length,
        work_index: SpecificEnergy,
    ) -> ConstraintResult<Self> {
        Ok(Self {
            family,
            css: StrictlyPositive::new(css)?,
            work_index: StrictlyPositive::new(work_index)?,
            shape_exponent: StrictlyPositive::new(family.shape_exponent())?,
        })
    }

    /// Overrides the product curve exponent.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the exponent is not strictly positive.
    pub fn with_shape_exponent(mut self, exponent: f64) -> ConstraintResult<Self> {
        self.shape_exponent = StrictlyPositive::new(exponent)?;
        Ok(self)
    }
}

/// Feed to a [`Crusher`].
#[derive(Debug, Clone, PartialEq)]
pub struct CrusherInput {
    /// The stream arriving at the crusher.
    pub feed: Stream,

    /// Plant throughput used for the power draw.
    pub plant_rate: MassRate,
}

impl CrusherInput {
    #[must_use]
    pub fn new(feed: Stream, plant_rate: MassRate) -> Self {
        Self { feed, plant_rate }
    }
}

impl Model for Crusher {
    type Input = CrusherInput;
    type Output = CrusherOutput;
    type Error = CrusherError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        self::core::crush(self, &input.feed, input.plant_rate)
    }
}
