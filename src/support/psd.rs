//! Particle size distributions.
//!
//! A size distribution is a cumulative curve of percent passing against
//! particle size, stored as an ordered list of [`SizePoint`]s in millimetres.
//! Distributions are immutable: every model step produces a new one.
//!
//! This module provides:
//!
//! - [`SizeDistribution`]: The validated curve type, plus lenient parsing of
//!   caller-supplied rows via [`SizeDistribution::from_rows`].
//! - [`value_at_size`] and [`size_at_percent`]: Clamped piecewise-linear
//!   interpolation in either direction.
//! - [`GaudinSchuhmann`]: The power-law model used to synthesize a crusher
//!   product curve from its P80.
//!
//! # Example
//!
//! ```
//! use twine_comminution::support::psd::{SizeDistribution, size_at_percent, value_at_size};
//!
//! let feed = SizeDistribution::from_rows([
//!     (100.0, 40.0),
//!     (50.0, 12.0),
//!     (150.0, 64.0),
//!     (200.0, 82.0),
//! ]);
//!
//! // Rows are sorted by size before use.
//! assert_eq!(feed.points()[0].size, 50.0);
//!
//! assert_eq!(value_at_size(&feed, 125.0), Some(52.0));
//! assert_eq!(size_at_percent(&feed, 40.0), Some(100.0));
//! assert_eq!(value_at_size(&feed, 1_000.0), Some(82.0));
//! ```

mod distribution;
mod gaudin_schuhmann;
mod interpolate;

pub use distribution::{DistributionError, SizeDistribution, SizePoint};
pub use gaudin_schuhmann::{GaudinSchuhmann, gaudin_schuhmann};
pub use interpolate::{size_at_percent, value_at_size};
