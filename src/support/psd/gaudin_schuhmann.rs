use uom::si::{f64::Length, length::millimeter};

use crate::support::constraint::{Constrained, StrictlyPositive};

use super::{SizeDistribution, SizePoint};

/// Gaudin–Schuhmann power-law size distribution.
///
/// The cumulative percent passing a size `x` is `100·(x/k)^a`, capped at 100,
/// where `a` is the shape exponent and `k` the size modulus. The modulus is
/// chosen so that exactly 80 % passes the requested P80:
/// `k = P80 / 0.8^(1/a)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaudinSchuhmann {
    p80: Constrained<Length, StrictlyPositive>,
    exponent: Constrained<f64, StrictlyPositive>,
}

impl GaudinSchuhmann {
    /// Number of points on a synthesized curve.
    pub const POINTS: usize = 100;

    /// Smallest size on a synthesized curve, in millimetres.
    ///
    /// Very fine curves start lower, at a tenth of the modulus.
    pub const MIN_SIZE_MM: f64 = 0.1;

    /// Upper end of a synthesized curve relative to the size modulus.
    pub const MAX_SIZE_OVER_MODULUS: f64 = 1.1;

    #[must_use]
    pub fn new(
        p80: Constrained<Length, StrictlyPositive>,
        exponent: Constrained<f64, StrictlyPositive>,
    ) -> Self {
        Self { p80, exponent }
    }

    /// The size modulus `k`, the size at which the curve reaches 100 %.
    #[must_use]
    pub fn modulus(&self) -> Length {
        *self.p80.as_ref() / 0.8_f64.powf(1.0 / self.exponent.into_inner())
    }

    /// Percent passing `size_mm` under this model.
    #[must_use]
    pub fn passing_at(&self, size_mm: f64) -> f64 {
        let k = self.modulus().get::<millimeter>();
        (100.0 * (size_mm / k).powf(self.exponent.into_inner())).min(100.0)
    }

    /// Synthesizes the curve as [`Self::POINTS`] log-spaced points from
    /// `min(0.1 mm, k/10)` to `1.1·k`.
    #[must_use]
    pub fn distribution(&self) -> SizeDistribution {
        let k = self.modulus().get::<millimeter>();
        let lo = Self::MIN_SIZE_MM.min(k / 10.0);
        let hi = Self::MAX_SIZE_OVER_MODULUS * k;

        let steps = (Self::POINTS - 1) as f64;
        let points = (0..Self::POINTS)
            .map(|i| {
                let size = lo * (hi / lo).powf(i as f64 / steps);
                SizePoint::new(size, self.passing_at(size))
            })
            .collect();

        SizeDistribution::from_points_unchecked(points)
    }
}

/// Synthesizes a crusher product curve with the given P80 and shape exponent.
///
/// Shorthand for [`GaudinSchuhmann::new`] followed by
/// [`GaudinSchuhmann::distribution`].
#[must_use]
pub fn gaudin_schuhmann(
    p80: Constrained<Length, StrictlyPositive>,
    exponent: Constrained<f64, StrictlyPositive>,
) -> SizeDistribution {
    GaudinSchuhmann::new(p80, exponent).distribution()
}
