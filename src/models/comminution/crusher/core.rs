//! Crusher computation.

mod bond;

use uom::si::{
    f64::{Length, MassRate, Power},
    length::millimeter,
};

use crate::{
    models::comminution::Stream,
    support::{
        constraint::{Constrained, NonNegative},
        psd::GaudinSchuhmann,
        units::SpecificEnergy,
    },
};

use super::{Crusher, CrusherError};

pub(crate) use bond::{corrected_power, specific_energy};

/// Ratio of F100 to the reported gape.
///
/// A sizing rule of thumb, not a physical law: the gape is reported as
/// `F100 / 0.85`.
pub(crate) const GAPE_FEED_RATIO: f64 = 0.85;

/// Everything a crusher reports for one feed.
#[derive(Debug, Clone, PartialEq)]
pub struct CrusherOutput {
    /// Feed 80 % passing size.
    pub f80: Length,

    /// Feed top size.
    pub f100: Length,

    /// Product 80 % passing size, equal to the CSS.
    pub p80: Length,

    /// Product top size, the coarsest point of the synthesized product curve.
    pub p100: Length,

    /// `F80 / P80`.
    pub reduction_ratio: f64,

    /// Comminution energy per tonne.
    pub specific_energy: Constrained<SpecificEnergy, NonNegative>,

    /// Installed motor power at plant throughput.
    pub power: Power,

    /// Percent of the feed already finer than the CSS.
    pub percent_passing_css: f64,

    /// Feed that slips through the gap without being crushed.
    pub bypass_rate: MassRate,

    /// Feed actually nipped by the crusher, `feed − bypass`.
    pub crusher_feed_rate: MassRate,

    /// Required feed opening, `F100 / 0.85`.
    pub gape: Length,

    /// Product stream, carrying the full feed rate.
    pub product: Stream,
}

/// Runs a crusher on `feed`.
///
/// # Errors
///
/// Returns [`CrusherError::UndefinedFeedSize`] if the feed F80 cannot be
/// interpolated.
pub(crate) fn crush(
    crusher: &Crusher,
    feed: &Stream,
    plant_rate: MassRate,
) -> Result<CrusherOutput, CrusherError> {
    let undefined = || CrusherError::UndefinedFeedSize {
        points: feed.distribution.len(),
    };

    let f80 = feed.d80().ok_or_else(undefined)?;
    let f100 = feed.top_size().ok_or_else(undefined)?;

    let css = *crusher.css.as_ref();
    let p80 = css;

    let energy = specific_energy(*crusher.work_index.as_ref(), f80, p80);
    let power = corrected_power(energy, plant_rate, crusher.family);

    let product_curve = GaudinSchuhmann::new(crusher.css, crusher.shape_exponent);
    let distribution = product_curve.distribution();
    let p100 = distribution
        .top_size()
        .map_or_else(|| product_curve.modulus(), Length::new::<millimeter>);

    let percent_passing_css = feed
        .distribution
        .value_at_size(css.get::<millimeter>())
        .unwrap_or(0.0);
    let bypass_rate = feed.rate * (percent_passing_css / 100.0);

    Ok(CrusherOutput {
        f80,
        f100,
        p80,
        p100,
        reduction_ratio: (f80 / p80).value,
        specific_energy: energy,
        power,
        percent_passing_css,
        bypass_rate,
        crusher_feed_rate: feed.rate - bypass_rate,
        gape: f100 / GAPE_FEED_RATIO,
        product: Stream::new(distribution, feed.rate),
    })
}
