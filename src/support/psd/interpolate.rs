use super::{SizeDistribution, SizePoint};

/// Returns the percent passing at `size` (mm).
///
/// Interpolates linearly between the two points bracketing `size`.
/// Queries below the first point return the first point's percent and
/// queries above the last point return the last point's percent; nothing is
/// extrapolated. Where two neighbouring points share a size, the left
/// point's percent is returned.
///
/// Returns `None` when the distribution has fewer than two points.
#[must_use]
pub fn value_at_size(distribution: &SizeDistribution, size: f64) -> Option<f64> {
    interpolate(distribution.points(), size, |p| (p.size, p.passing))
}

/// Returns the size (mm) at which `percent` of the material passes.
///
/// Same algorithm as [`value_at_size`] with the axes swapped: the search runs
/// over percent passing and the size is interpolated. Where two neighbouring
/// points share a percent, the left point's size is returned.
///
/// Returns `None` when the distribution has fewer than two points.
#[must_use]
pub fn size_at_percent(distribution: &SizeDistribution, percent: f64) -> Option<f64> {
    interpolate(distribution.points(), percent, |p| (p.passing, p.size))
}

/// Clamped linear interpolation over `points`, searching on the first
/// coordinate returned by `axes` and interpolating the second.
fn interpolate(points: &[SizePoint], target: f64, axes: impl Fn(&SizePoint) -> (f64, f64)) -> Option<f64> {
    if points.len() < 2 {
        return None;
    }

    let i = points
        .iter()
        .position(|p| axes(p).0 >= target)
        .unwrap_or(points.len());

    if i == 0 {
        return Some(axes(&points[0]).1);
    }
    if i == points.len() {
        return Some(axes(&points[i - 1]).1);
    }

    let (x1, y1) = axes(&points[i - 1]);
    let (x2, y2) = axes(&points[i]);

    #[allow(clippy::float_cmp)]
    if x1 == x2 {
        return Some(y1);
    }

    Some(y1 + (y2 - y1) * (target - x1) / (x2 - x1))
}
