use tracing::debug;
use uom::si::{
    f64::{Length, MassRate, Power},
    length::millimeter,
    power::kilowatt,
};

use crate::{
    circuit::NodeId, models::comminution::crusher::CrusherFamily,
    support::units::TonnesPerHour,
};

use super::{Catalog, EquipmentSpec};

/// Lowest accepted throughput, as a fraction of an entry's minimum capacity.
pub const CAPACITY_LOWER_TOLERANCE: f64 = 0.7;

/// Highest accepted throughput, as a multiple of an entry's maximum capacity.
pub const CAPACITY_UPPER_TOLERANCE: f64 = 1.5;

/// The catalog entry picked for one crusher of an evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recommendation<'a> {
    pub node: &'a NodeId,
    pub family: CrusherFamily,

    /// `None` when no entry of the family has enough power.
    pub equipment: Option<&'a EquipmentSpec>,
}

/// Picks the smallest adequate machine for a crusher duty.
///
/// An entry is adequate when its rated power covers `power`, its CSS range
/// contains `css`, and `rate` lies within
/// `[0.7 × capacity min, 1.5 × capacity max]`. Among adequate entries the
/// lowest rated power wins, the first in catalog order on a tie.
///
/// If nothing is adequate the CSS and capacity filters are dropped and the
/// lowest-power entry with enough power is returned. `None` means even that
/// failed, which is a normal outcome.
///
/// # Example
///
/// ```
/// use twine_comminution::equipment::{Catalog, match_equipment};
/// use twine_comminution::models::comminution::crusher::CrusherFamily;
/// use twine_comminution::support::units::tonnes_per_hour;
/// use uom::si::{f64::{Length, Power}, length::millimeter, power::kilowatt};
///
/// let pick = match_equipment(
///     Catalog::standard(),
///     CrusherFamily::Cone,
///     tonnes_per_hour(180.0),
///     Power::new::<kilowatt>(140.0),
///     Length::new::<millimeter>(20.0),
/// );
/// assert_eq!(pick.map(|e| e.model.as_str()), Some("CH-4.5"));
/// ```
#[must_use]
pub fn match_equipment(
    catalog: &Catalog,
    family: CrusherFamily,
    rate: MassRate,
    power: Power,
    css: Length,
) -> Option<&EquipmentSpec> {
    let tph = rate.get_tonnes_per_hour();
    let kw = power.get::<kilowatt>();
    let css_mm = css.get::<millimeter>();

    let powerful = |e: &&EquipmentSpec| e.rated_power_kw >= kw;
    let fits = |e: &&EquipmentSpec| {
        e.css_range_mm.contains(css_mm)
            && tph >= CAPACITY_LOWER_TOLERANCE * e.capacity_range_tph.min
            && tph <= CAPACITY_UPPER_TOLERANCE * e.capacity_range_tph.max
    };

    smallest(catalog.family(family).filter(powerful).filter(fits)).or_else(|| {
        debug!(
            family = family.as_str(),
            tph, kw, css_mm, "no catalog entry fits the duty, matching on power alone"
        );
        smallest(catalog.family(family).filter(powerful))
    })
}

fn smallest<'a>(entries: impl Iterator<Item = &'a EquipmentSpec>) -> Option<&'a EquipmentSpec> {
    // `reduce` keeps the earlier entry on ties.
    entries.reduce(|best, e| {
        if e.rated_power_kw < best.rated_power_kw {
            e
        } else {
            best
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{equipment::Band, support::units::tonnes_per_hour};

    fn pick(
        catalog: &Catalog,
        family: CrusherFamily,
        tph: f64,
        kw: f64,
        css_mm: f64,
    ) -> Option<&str> {
        match_equipment(
            catalog,
            family,
            tonnes_per_hour(tph),
            Power::new::<kilowatt>(kw),
            Length::new::<millimeter>(css_mm),
        )
        .map(|e| e.model.as_str())
    }

    fn entry(model: &str, css: (f64, f64), capacity: (f64, f64), kw: f64) -> EquipmentSpec {
        EquipmentSpec {
            model: model.into(),
            family: CrusherFamily::Cone,
            series: None,
            gape_mm: None,
            max_feed_mm: 100.0,
            css_range_mm: Band::new(css.0, css.1),
            capacity_range_tph: Band::new(capacity.0, capacity.1),
            rated_power_kw: kw,
        }
    }

    #[test]
    fn smallest_adequate_cone() {
        let catalog = Catalog::standard();
        assert_eq!(pick(catalog, CrusherFamily::Cone, 180.0, 140.0, 20.0), Some("CH-4.5"));
    }

    #[test]
    fn smallest_adequate_jaw() {
        // 300 t/h at a 100 mm setting with 60 kW: F-900x600 is too small on
        // capacity (1.5 × 180 = 270), F-1000x750 fits.
        let catalog = Catalog::standard();
        assert_eq!(pick(catalog, CrusherFamily::Jaw, 300.0, 60.0, 100.0), Some("F-1000x750"));
    }

    #[test]
    fn capacity_band_has_tolerance() {
        let catalog = Catalog::new(vec![
            entry("A", (10.0, 30.0), (100.0, 200.0), 90.0),
            entry("B", (10.0, 30.0), (60.0, 400.0), 120.0),
        ]);

        // Inside [70, 300] the smaller machine fits.
        assert_eq!(pick(&catalog, CrusherFamily::Cone, 70.5, 50.0, 20.0), Some("A"));
        assert_eq!(pick(&catalog, CrusherFamily::Cone, 299.5, 50.0, 20.0), Some("A"));

        // Outside it only the larger one does.
        assert_eq!(pick(&catalog, CrusherFamily::Cone, 65.0, 50.0, 20.0), Some("B"));
        assert_eq!(pick(&catalog, CrusherFamily::Cone, 310.0, 50.0, 20.0), Some("B"));
    }

    #[test]
    fn relaxes_to_power_only() {
        let catalog = Catalog::new(vec![
            entry("big", (30.0, 60.0), (400.0, 900.0), 250.0),
            entry("small", (5.0, 15.0), (10.0, 40.0), 110.0),
            entry("weak", (15.0, 25.0), (100.0, 200.0), 45.0),
        ]);

        // Only "weak" fits CSS and capacity but it lacks power.
        assert_eq!(pick(&catalog, CrusherFamily::Cone, 150.0, 100.0, 20.0), Some("small"));
    }

    #[test]
    fn no_match_is_none() {
        let catalog = Catalog::standard();
        assert_eq!(pick(catalog, CrusherFamily::Cone, 180.0, 400.0, 20.0), None);
        assert_eq!(pick(catalog, CrusherFamily::Jaw, 180.0, 251.0, 20.0), None);
    }

    #[test]
    fn ties_keep_catalog_order() {
        let catalog = Catalog::new(vec![
            entry("first", (10.0, 30.0), (100.0, 200.0), 90.0),
            entry("second", (10.0, 30.0), (100.0, 200.0), 90.0),
        ]);
        assert_eq!(pick(&catalog, CrusherFamily::Cone, 150.0, 50.0, 20.0), Some("first"));
    }

    #[test]
    fn other_family_is_ignored() {
        let catalog = Catalog::new(vec![entry("cone", (10.0, 30.0), (100.0, 200.0), 90.0)]);
        assert_eq!(pick(&catalog, CrusherFamily::Jaw, 150.0, 50.0, 20.0), None);
    }
}
