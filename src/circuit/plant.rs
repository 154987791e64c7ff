//! Plant-wide operating parameters.
//!
//! [`PlantInputs`] is the raw record a form or a JSON file provides. Every
//! field is optional so a partially filled form still deserializes.
//! [`PlantParameters`] is the validated version the evaluator consumes.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uom::si::{
    f64::{Length, Mass, MassDensity, MassRate, Ratio, Time},
    length::millimeter,
    ratio::{percent, ratio},
    time::hour,
};

use crate::support::{
    constraint::{Constrained, ConstraintError, StrictlyPositive, UnitInterval},
    units::{SpecificEnergy, kilowatt_hours_per_tonne, tonnes, tonnes_per_cubic_meter},
};

/// Plant parameters as entered, in mining units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlantInputs {
    /// Tonnes per day.
    pub daily_capacity: Option<f64>,
    pub shifts_per_day: Option<f64>,
    pub hours_per_shift: Option<f64>,
    /// Percent of scheduled time the plant actually runs.
    pub availability: Option<f64>,
    /// t/m³
    pub bulk_density: Option<f64>,
    /// Bond work index, kWh/t.
    pub work_index: Option<f64>,
    /// Target top size of the final product, mm.
    pub target_p100: Option<f64>,
}

/// Why a [`PlantInputs`] record was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum PlantParametersError {
    #[error("missing plant parameter `{0}`")]
    Missing(&'static str),

    #[error("invalid plant parameter `{field}`: {source}")]
    Invalid {
        field: &'static str,
        source: ConstraintError,
    },

    #[error("shift count must be a whole number, got {0}")]
    FractionalShifts(String),
}

/// Validated plant parameters.
///
/// Read-only during an evaluation. Replacing them invalidates every result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlantParameters {
    daily_capacity: Constrained<Mass, StrictlyPositive>,
    shifts_per_day: Constrained<u32, StrictlyPositive>,
    hours_per_shift: Constrained<Time, StrictlyPositive>,
    availability: Constrained<Ratio, UnitInterval>,
    bulk_density: Constrained<MassDensity, StrictlyPositive>,
    work_index: Constrained<SpecificEnergy, StrictlyPositive>,
    target_p100: Constrained<Length, StrictlyPositive>,
}

impl PlantParameters {
    /// Creates validated plant parameters.
    ///
    /// # Errors
    ///
    /// Returns [`PlantParametersError::Invalid`] naming the first field that
    /// breaks its constraint. Availability must lie in `(0, 1]`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        daily_capacity: Mass,
        shifts_per_day: u32,
        hours_per_shift: Time,
        availability: Ratio,
        bulk_density: MassDensity,
        work_index: SpecificEnergy,
        target_p100: Length,
    ) -> Result<Self, PlantParametersError> {
        let availability = check("availability", UnitInterval::new(availability))?;
        if availability.into_inner().get::<ratio>() == 0.0 {
            return Err(PlantParametersError::Invalid {
                field: "availability",
                source: ConstraintError::Zero,
            });
        }

        Ok(Self {
            daily_capacity: check("daily_capacity", StrictlyPositive::new(daily_capacity))?,
            shifts_per_day: check("shifts_per_day", StrictlyPositive::new(shifts_per_day))?,
            hours_per_shift: check("hours_per_shift", StrictlyPositive::new(hours_per_shift))?,
            availability,
            bulk_density: check("bulk_density", StrictlyPositive::new(bulk_density))?,
            work_index: check("work_index", StrictlyPositive::new(work_index))?,
            target_p100: check("target_p100", StrictlyPositive::new(target_p100))?,
        })
    }

    /// Operating hours per day: `shifts × hours per shift × availability`.
    #[must_use]
    pub fn effective_hours(&self) -> Time {
        *self.hours_per_shift.as_ref()
            * f64::from(self.shifts_per_day.into_inner())
            * self.availability.as_ref().get::<ratio>()
    }

    /// Throughput while running: daily capacity over effective hours.
    #[must_use]
    pub fn plant_rate(&self) -> MassRate {
        *self.daily_capacity.as_ref() / self.effective_hours()
    }

    #[must_use]
    pub fn daily_capacity(&self) -> Mass {
        self.daily_capacity.into_inner()
    }

    #[must_use]
    pub fn shifts_per_day(&self) -> u32 {
        self.shifts_per_day.into_inner()
    }

    #[must_use]
    pub fn hours_per_shift(&self) -> Time {
        self.hours_per_shift.into_inner()
    }

    #[must_use]
    pub fn availability(&self) -> Ratio {
        self.availability.into_inner()
    }

    #[must_use]
    pub fn bulk_density(&self) -> MassDensity {
        self.bulk_density.into_inner()
    }

    #[must_use]
    pub fn work_index(&self) -> Constrained<SpecificEnergy, StrictlyPositive> {
        self.work_index
    }

    #[must_use]
    pub fn target_p100(&self) -> Length {
        self.target_p100.into_inner()
    }
}

impl TryFrom<PlantInputs> for PlantParameters {
    type Error = PlantParametersError;

    fn try_from(inputs: PlantInputs) -> Result<Self, Self::Error> {
        let shifts = whole_shifts(required("shifts_per_day", inputs.shifts_per_day)?)?;

        Self::new(
            tonnes(required("daily_capacity", inputs.daily_capacity)?),
            shifts,
            Time::new::<hour>(required("hours_per_shift", inputs.hours_per_shift)?),
            Ratio::new::<percent>(required("availability", inputs.availability)?),
            tonnes_per_cubic_meter(required("bulk_density", inputs.bulk_density)?),
            kilowatt_hours_per_tonne(required("work_index", inputs.work_index)?),
            Length::new::<millimeter>(required("target_p100", inputs.target_p100)?),
        )
    }
}

fn whole_shifts(value: f64) -> Result<u32, PlantParametersError> {
    let value = check("shifts_per_day", StrictlyPositive::new(value))?.into_inner();
    if value.fract() != 0.0 || value > f64::from(u32::MAX) {
        return Err(PlantParametersError::FractionalShifts(value.to_string()));
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let whole = value as u32;
    Ok(whole)
}

fn required(field: &'static str, value: Option<f64>) -> Result<f64, PlantParametersError> {
    value.ok_or(PlantParametersError::Missing(field))
}

fn check<T>(
    field: &'static str,
    value: Result<T, ConstraintError>,
) -> Result<T, PlantParametersError> {
    value.map_err(|source| PlantParametersError::Invalid { field, source })
}
