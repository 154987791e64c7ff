//! Supporting utilities used by the models and the circuit evaluator.
//!
//! - [`constraint`]: Numeric invariants checked once at construction.
//! - [`psd`]: Particle size distributions, interpolation and synthetic curves.
//! - [`units`]: Mineral-processing unit conventions on top of [`uom`].

pub mod constraint;
pub mod psd;
pub mod units;
