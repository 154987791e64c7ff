//! Extensions to [`uom`] for mineral-processing units.
//!
//! This crate uses [`uom`] for all physical quantities. Plant engineers think
//! in tonnes per hour, kWh per tonne and tonnes per cubic metre, none of which
//! [`uom`] provides directly, so this module adds constructors and extension
//! traits for them:
//!
//! ```
//! use twine_comminution::support::units::{
//!     KilowattHoursPerTonne, TonnesPerHour, kilowatt_hours_per_tonne, tonnes_per_hour,
//! };
//! use uom::si::{f64::Power, power::kilowatt};
//!
//! let rate = tonnes_per_hour(250.0);
//! let energy = kilowatt_hours_per_tonne(0.4);
//!
//! // kWh/t × t/h = kW
//! let power: Power = energy * rate;
//! assert!((power.get::<kilowatt>() - 100.0).abs() < 1e-9);
//! assert!((rate.get_tonnes_per_hour() - 250.0).abs() < 1e-9);
//! assert!((energy.get_kilowatt_hours_per_tonne() - 0.4).abs() < 1e-12);
//! ```

mod rates;
mod specific_energy;

pub use rates::{
    TonnesPerCubicMeter, TonnesPerHour, cubic_meters_per_hour, tonnes, tonnes_per_cubic_meter,
    tonnes_per_hour,
};
pub use specific_energy::{KilowattHoursPerTonne, SpecificEnergy, kilowatt_hours_per_tonne};

const KILOGRAMS_PER_TONNE: f64 = 1_000.0;
const SECONDS_PER_HOUR: f64 = 3_600.0;
