use uom::si::{available_energy::joule_per_kilogram, f64::AvailableEnergy};

use super::{KILOGRAMS_PER_TONNE, SECONDS_PER_HOUR};

/// Energy per unit mass, used for comminution energy and the Bond work index.
pub type SpecificEnergy = AvailableEnergy;

/// One kWh/t expressed in J/kg.
const JOULES_PER_KILOGRAM_PER_KWH_PER_TONNE: f64 = 1_000.0 * SECONDS_PER_HOUR / KILOGRAMS_PER_TONNE;

/// Creates a [`SpecificEnergy`] from kilowatt-hours per tonne.
#[must_use]
pub fn kilowatt_hours_per_tonne(value: f64) -> SpecificEnergy {
    SpecificEnergy::new::<joule_per_kilogram>(value * JOULES_PER_KILOGRAM_PER_KWH_PER_TONNE)
}

/// Reads a [`SpecificEnergy`] in kilowatt-hours per tonne.
pub trait KilowattHoursPerTonne {
    fn get_kilowatt_hours_per_tonne(&self) -> f64;
}

impl KilowattHoursPerTonne for SpecificEnergy {
    fn get_kilowatt_hours_per_tonne(&self) -> f64 {
        self.get::<joule_per_kilogram>() / JOULES_PER_KILOGRAM_PER_KWH_PER_TONNE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn one_kwh_per_tonne_is_3600_joules_per_kilogram() {
        assert_relative_eq!(
            kilowatt_hours_per_tonne(1.0).get::<joule_per_kilogram>(),
            3_600.0
        );
        assert_relative_eq!(
            kilowatt_hours_per_tonne(14.5).get_kilowatt_hours_per_tonne(),
            14.5,
            epsilon = 1e-12
        );
    }
}
