//! Screen computation.

use uom::si::length::millimeter;

use crate::{
    models::comminution::Stream,
    support::psd::{SizeDistribution, SizePoint},
};

use super::Screen;

/// Products of a screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenOutput {
    /// Material at or above the aperture.
    pub oversize: Stream,

    /// Material below the aperture.
    pub undersize: Stream,

    /// Percent of the feed passing the aperture, used to split the feed rate.
    pub percent_passing: f64,
}

/// Splits `feed` at the screen aperture.
pub(crate) fn split(screen: &Screen, feed: &Stream) -> ScreenOutput {
    let aperture = screen.aperture.as_ref().get::<millimeter>();

    let (oversize, undersize): (Vec<SizePoint>, Vec<SizePoint>) = feed
        .distribution
        .points()
        .iter()
        .partition(|p| p.size >= aperture);

    // Without an interpolable curve the rate follows whichever side got the points.
    let percent_passing = feed.distribution.value_at_size(aperture).unwrap_or(
        if oversize.is_empty() && !undersize.is_empty() {
            100.0
        } else {
            0.0
        },
    );

    let undersize_rate = feed.rate * (percent_passing / 100.0);

    ScreenOutput {
        oversize: Stream::new(
            SizeDistribution::from_points_unchecked(oversize),
            feed.rate - undersize_rate,
        ),
        undersize: Stream::new(
            SizeDistribution::from_points_unchecked(undersize),
            undersize_rate,
        ),
        percent_passing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use twine_core::Model;
    use uom::si::f64::Length;

    use crate::support::units::{TonnesPerHour, tonnes_per_hour};

    fn screen(aperture_mm: f64) -> Screen {
        Screen::new(Length::new::<millimeter>(aperture_mm)).expect("positive aperture")
    }

    fn feed() -> Stream {
        Stream::new(
            SizeDistribution::from_rows([
                (5.0, 10.0),
                (10.0, 25.0),
                (20.0, 55.0),
                (40.0, 85.0),
                (60.0, 100.0),
            ]),
            tonnes_per_hour(200.0),
        )
    }

    #[test]
    fn sharp_cutoff_is_a_strict_partition() {
        let feed = feed();
        let out = screen(30.0).call(&feed).expect("screens never fail");

        let over = out.oversize.distribution.points();
        let under = out.undersize.distribution.points();

        assert_eq!((over.len(), under.len()), (2, 3));
        assert!(over.iter().all(|p| p.size >= 30.0));
        assert!(under.iter().all(|p| p.size < 30.0));
        assert!(over.iter().all(|p| !under.contains(p)));

        let mut rejoined: Vec<SizePoint> = under.iter().chain(over).copied().collect();
        rejoined.sort_by(|a, b| a.size.total_cmp(&b.size));
        assert_eq!(rejoined, feed.distribution.points());
    }

    #[test]
    fn points_are_routed_unchanged() {
        let out = split(&screen(15.0), &feed());
        assert_eq!(
            out.undersize.distribution.points(),
            &[SizePoint::new(5.0, 10.0), SizePoint::new(10.0, 25.0)]
        );
        assert_eq!(out.oversize.distribution.points()[0], SizePoint::new(20.0, 55.0));
    }

    #[test]
    fn rate_split_conserves_mass() {
        let out = split(&screen(30.0), &feed());

        assert_relative_eq!(out.percent_passing, 70.0, max_relative = 1e-9);
        assert_relative_eq!(out.undersize.rate.get_tonnes_per_hour(), 140.0, max_relative = 1e-9);
        assert_relative_eq!(out.oversize.rate.get_tonnes_per_hour(), 60.0, max_relative = 1e-9);
        assert_relative_eq!(
            (out.undersize.rate + out.oversize.rate).get_tonnes_per_hour(),
            200.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn point_at_aperture_reports_to_oversize() {
        let feed = Stream::new(
            SizeDistribution::from_rows([(10.0, 20.0), (20.0, 50.0), (40.0, 100.0)]),
            tonnes_per_hour(100.0),
        );
        let out = split(&screen(20.0), &feed);

        assert_eq!(
            out.oversize.distribution.points(),
            &[SizePoint::new(20.0, 50.0), SizePoint::new(40.0, 100.0)]
        );
        assert_eq!(out.undersize.distribution.points(), &[SizePoint::new(10.0, 20.0)]);
        assert_relative_eq!(out.percent_passing, 50.0, max_relative = 1e-9);
    }

    #[test]
    fn aperture_below_the_curve_sends_everything_over() {
        let out = split(&screen(1.0), &feed());
        assert!(out.undersize.distribution.is_empty());
        assert_eq!(out.oversize.distribution, feed().distribution);
    }

    #[test]
    fn single_point_feed_follows_its_side() {
        let single = Stream::new(SizeDistribution::from_rows([(4.0, 100.0)]), tonnes_per_hour(10.0));

        let out = split(&screen(8.0), &single);
        assert_relative_eq!(out.percent_passing, 100.0);
        assert_relative_eq!(out.undersize.rate.get_tonnes_per_hour(), 10.0, max_relative = 1e-12);

        let out = split(&screen(2.0), &single);
        assert_relative_eq!(out.percent_passing, 0.0);
        assert_relative_eq!(out.oversize.rate.get_tonnes_per_hour(), 10.0, max_relative = 1e-12);
    }
}
