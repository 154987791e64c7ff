use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::support::constraint::{Constraint, Percentage};

use super::{size_at_percent, value_at_size};

/// A single point on a cumulative size distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizePoint {
    /// Particle size in millimetres.
    pub size: f64,

    /// Cumulative percent passing `size`, in `[0, 100]`.
    pub passing: f64,
}

impl SizePoint {
    #[must_use]
    pub fn new(size: f64, passing: f64) -> Self {
        Self { size, passing }
    }

    fn is_valid(&self) -> bool {
        self.size.is_finite() && self.size > 0.0 && Percentage::check(&self.passing).is_ok()
    }
}

/// Errors raised when building a [`SizeDistribution`] from explicit points.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[non_exhaustive]
pub enum DistributionError {
    /// A point has a non-positive or non-finite size, or a percent outside `[0, 100]`.
    #[error("invalid point at index {index}: size={size}, passing={passing}")]
    InvalidPoint {
        index: usize,
        size: f64,
        passing: f64,
    },

    /// Sizes or percents decrease between two consecutive points.
    #[error("distribution is not monotonic at index {index}")]
    NotMonotonic { index: usize },
}

/// A cumulative particle size distribution.
///
/// Points are ordered by size. Distributions built with [`SizeDistribution::new`]
/// are additionally guaranteed to have non-decreasing percent passing.
/// There is no way to mutate a distribution once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SizePoint>", into = "Vec<SizePoint>")]
pub struct SizeDistribution {
    points: Vec<SizePoint>,
}

impl SizeDistribution {
    /// Builds a distribution from points already ordered by size.
    ///
    /// # Errors
    ///
    /// Returns [`DistributionError`] if any point is out of range or if sizes
    /// or percents decrease along the curve.
    pub fn new(points: Vec<SizePoint>) -> Result<Self, DistributionError> {
        for (index, point) in points.iter().enumerate() {
            if !point.is_valid() {
                return Err(DistributionError::InvalidPoint {
                    index,
                    size: point.size,
                    passing: point.passing,
                });
            }
        }

        if let Some(index) = points
            .windows(2)
            .position(|w| w[1].size < w[0].size || w[1].passing < w[0].passing)
        {
            return Err(DistributionError::NotMonotonic { index: index + 1 });
        }

        Ok(Self { points })
    }

    /// Builds a distribution from caller-supplied `(size, percent passing)` rows.
    ///
    /// Rows with a non-finite or non-positive size, or a percent outside
    /// `[0, 100]`, are discarded. The remaining rows are sorted by size.
    /// The result may hold fewer than two points, in which case
    /// interpolation on it yields `None`.
    pub fn from_rows(rows: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let mut points: Vec<SizePoint> = rows
            .into_iter()
            .map(|(size, passing)| SizePoint::new(size, passing))
            .filter(SizePoint::is_valid)
            .collect();
        points.sort_by(|a, b| a.size.total_cmp(&b.size));
        Self { points }
    }

    /// An empty distribution, as left behind by a screen with nothing to route.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wraps points the caller guarantees are ordered and in range.
    pub(crate) fn from_points_unchecked(points: Vec<SizePoint>) -> Self {
        debug_assert!(points.windows(2).all(|w| w[0].size <= w[1].size));
        Self { points }
    }

    #[must_use]
    pub fn points(&self) -> &[SizePoint] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Percent passing at `size` (mm). See [`value_at_size`].
    #[must_use]
    pub fn value_at_size(&self, size: f64) -> Option<f64> {
        value_at_size(self, size)
    }

    /// Size (mm) at which `percent` passes. See [`size_at_percent`].
    #[must_use]
    pub fn size_at_percent(&self, percent: f64) -> Option<f64> {
        size_at_percent(self, percent)
    }

    /// The 80 % passing size (F80 or P80), in millimetres.
    #[must_use]
    pub fn d80(&self) -> Option<f64> {
        self.size_at_percent(80.0)
    }

    /// The largest size on the curve (F100 or P100), in millimetres.
    #[must_use]
    pub fn top_size(&self) -> Option<f64> {
        self.points.iter().map(|p| p.size).reduce(f64::max)
    }
}

impl TryFrom<Vec<SizePoint>> for SizeDistribution {
    type Error = DistributionError;

    fn try_from(points: Vec<SizePoint>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<SizeDistribution> for Vec<SizePoint> {
    fn from(distribution: SizeDistribution) -> Self {
        distribution.points
    }
}
