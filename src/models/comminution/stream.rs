use uom::si::f64::{Length, MassRate};
use uom::si::length::millimeter;

use crate::support::psd::SizeDistribution;

/// Material flowing between two units: its size distribution and mass rate.
#[derive(Debug, Clone, PartialEq)]
pub struct Stream {
    pub distribution: SizeDistribution,
    pub rate: MassRate,
}

impl Stream {
    #[must_use]
    pub fn new(distribution: SizeDistribution, rate: MassRate) -> Self {
        Self { distribution, rate }
    }

    /// The 80 % passing size of this stream, if defined.
    #[must_use]
    pub fn d80(&self) -> Option<Length> {
        self.distribution.d80().map(Length::new::<millimeter>)
    }

    /// The top size of this stream, if it carries any points.
    #[must_use]
    pub fn top_size(&self) -> Option<Length> {
        self.distribution.top_size().map(Length::new::<millimeter>)
    }
}
