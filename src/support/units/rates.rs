use uom::si::{
    f64::{Mass, MassDensity, MassRate, VolumeRate},
    mass::kilogram,
    mass_density::kilogram_per_cubic_meter,
    mass_rate::kilogram_per_second,
    volume_rate::cubic_meter_per_second,
};

use super::{KILOGRAMS_PER_TONNE, SECONDS_PER_HOUR};

/// Creates a [`Mass`] from metric tonnes.
#[must_use]
pub fn tonnes(value: f64) -> Mass {
    Mass::new::<kilogram>(value * KILOGRAMS_PER_TONNE)
}

/// Creates a [`MassRate`] from tonnes per hour.
#[must_use]
pub fn tonnes_per_hour(value: f64) -> MassRate {
    MassRate::new::<kilogram_per_second>(value * KILOGRAMS_PER_TONNE / SECONDS_PER_HOUR)
}

/// Creates a [`MassDensity`] from tonnes per cubic metre.
#[must_use]
pub fn tonnes_per_cubic_meter(value: f64) -> MassDensity {
    MassDensity::new::<kilogram_per_cubic_meter>(value * KILOGRAMS_PER_TONNE)
}

/// Returns a volumetric rate in cubic metres per hour.
#[must_use]
pub fn cubic_meters_per_hour(rate: VolumeRate) -> f64 {
    rate.get::<cubic_meter_per_second>() * SECONDS_PER_HOUR
}

/// Reads a [`MassRate`] in tonnes per hour.
pub trait TonnesPerHour {
    fn get_tonnes_per_hour(&self) -> f64;
}

impl TonnesPerHour for MassRate {
    fn get_tonnes_per_hour(&self) -> f64 {
        self.get::<kilogram_per_second>() * SECONDS_PER_HOUR / KILOGRAMS_PER_TONNE
    }
}

/// Reads a [`MassDensity`] in tonnes per cubic metre.
pub trait TonnesPerCubicMeter {
    fn get_tonnes_per_cubic_meter(&self) -> f64;
}

impl TonnesPerCubicMeter for MassDensity {
    fn get_tonnes_per_cubic_meter(&self) -> f64 {
        self.get::<kilogram_per_cubic_meter>() / KILOGRAMS_PER_TONNE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{f64::Time, time::hour};

    #[test]
    fn daily_tonnage_over_operating_hours() {
        let rate: MassRate = tonnes(4_800.0) / Time::new::<hour>(16.0);
        assert_relative_eq!(rate.get_tonnes_per_hour(), 300.0, epsilon = 1e-9);
    }

    #[test]
    fn volumetric_capacity_from_bulk_density() {
        let volume: VolumeRate = tonnes_per_hour(320.0) / tonnes_per_cubic_meter(1.6);
        assert_relative_eq!(cubic_meters_per_hour(volume), 200.0, epsilon = 1e-9);
        assert_relative_eq!(
            tonnes_per_cubic_meter(1.6).get_tonnes_per_cubic_meter(),
            1.6,
            epsilon = 1e-12
        );
    }
}
