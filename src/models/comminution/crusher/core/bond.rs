//! Bond's comminution law.

use uom::si::{
    f64::{Length, MassRate, Power},
    length::micrometer,
};

use crate::support::{
    constraint::{Constrained, NonNegative},
    units::{KilowattHoursPerTonne, SpecificEnergy, kilowatt_hours_per_tonne},
};

use super::super::CrusherFamily;

/// Specific energy (kWh/t) to reduce material from `f80` to `p80`.
///
/// Both sizes are taken in micrometres: `E = 11·Wi·(1/√P80 − 1/√F80)`.
/// Zero whenever either size is non-positive or `P80 ≥ F80`.
pub(crate) fn specific_energy(
    work_index: SpecificEnergy,
    f80: Length,
    p80: Length,
) -> Constrained<SpecificEnergy, NonNegative> {
    let f80 = f80.get::<micrometer>();
    let p80 = p80.get::<micrometer>();

    if f80 <= 0.0 || p80 <= 0.0 || p80 >= f80 {
        return NonNegative::zero();
    }

    let wi = work_index.get_kilowatt_hours_per_tonne();
    let energy = 11.0 * wi * (1.0 / p80.sqrt() - 1.0 / f80.sqrt());

    NonNegative::new(kilowatt_hours_per_tonne(energy)).unwrap_or_else(|_| NonNegative::zero())
}

/// Installed motor power for `energy` at `plant_rate`, with the family correction.
pub(crate) fn corrected_power(
    energy: Constrained<SpecificEnergy, NonNegative>,
    plant_rate: MassRate,
    family: CrusherFamily,
) -> Power {
    energy.into_inner() * plant_rate * family.power_correction()
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{length::millimeter, power::kilowatt};

    use crate::support::units::tonnes_per_hour;

    fn mm(value: f64) -> Length {
        Length::new::<millimeter>(value)
    }

    #[test]
    fn bond_law_in_micrometres() {
        let wi = kilowatt_hours_per_tonne(15.0);
        let e = specific_energy(wi, mm(200.0), mm(60.0));

        let expected = 11.0 * 15.0 * (1.0 / 60_000.0_f64.sqrt() - 1.0 / 200_000.0_f64.sqrt());
        assert_relative_eq!(
            e.into_inner().get_kilowatt_hours_per_tonne(),
            expected,
            max_relative = 1e-12
        );
    }

    #[test]
    fn zero_when_feed_is_not_coarser_than_product() {
        let wi = kilowatt_hours_per_tonne(15.0);
        for (f80, p80) in [(20.0, 20.0), (10.0, 25.0), (0.0, 5.0), (40.0, 0.0), (-3.0, 1.0)] {
            let e = specific_energy(wi, mm(f80), mm(p80));
            assert_eq!(e.into_inner().get_kilowatt_hours_per_tonne(), 0.0);
        }
    }

    #[test]
    fn power_applies_family_correction() {
        let e = NonNegative::new(kilowatt_hours_per_tonne(0.5)).unwrap();
        let rate = tonnes_per_hour(200.0);

        let jaw = corrected_power(e, rate, CrusherFamily::Jaw);
        let cone = corrected_power(e, rate, CrusherFamily::Cone);

        assert_relative_eq!(jaw.get::<kilowatt>(), 200.0, max_relative = 1e-12);
        assert_relative_eq!(cone.get::<kilowatt>(), 130.0, max_relative = 1e-12);
    }
}
