//! Crusher catalog and equipment matching.
//!
//! The catalog is static reference data passed explicitly to the matcher, so
//! tests can swap in a synthetic one.

mod catalog;
mod matcher;

pub use catalog::{Band, Catalog, EquipmentSpec};
pub use matcher::{CAPACITY_LOWER_TOLERANCE, CAPACITY_UPPER_TOLERANCE, Recommendation, match_equipment};
