use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::models::comminution::crusher::CrusherFamily;

/// A closed range `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub min: f64,
    pub max: f64,
}

impl Band {
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentSpec {
    pub model: String,
    pub family: CrusherFamily,

    /// Cone chamber series, `Standard` or `Short Head`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,

    /// Jaw feed opening, mm.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gape_mm: Option<f64>,

    pub max_feed_mm: f64,
    pub css_range_mm: Band,
    pub capacity_range_tph: Band,
    pub rated_power_kw: f64,
}

/// Crusher catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: Vec<EquipmentSpec>,
}

impl Catalog {
    #[must_use]
    pub fn new(entries: Vec<EquipmentSpec>) -> Self {
        Self { entries }
    }

    /// The built-in jaw and cone catalog.
    #[must_use]
    pub fn standard() -> &'static Self {
        static STANDARD: LazyLock<Catalog> = LazyLock::new(|| {
            Catalog::new(
                JAWS.iter()
                    .map(|&(model, gape, feed, css, capacity, kw)| EquipmentSpec {
                        model: model.to_owned(),
                        family: CrusherFamily::Jaw,
                        series: None,
                        gape_mm: Some(gape),
                        max_feed_mm: feed,
                        css_range_mm: Band::new(css.0, css.1),
                        capacity_range_tph: Band::new(capacity.0, capacity.1),
                        rated_power_kw: kw,
                    })
                    .chain(CONES.iter().map(
                        |&(model, series, feed, css, capacity, kw)| EquipmentSpec {
                            model: model.to_owned(),
                            family: CrusherFamily::Cone,
                            series: Some(series.to_owned()),
                            gape_mm: None,
                            max_feed_mm: feed,
                            css_range_mm: Band::new(css.0, css.1),
                            capacity_range_tph: Band::new(capacity.0, capacity.1),
                            rated_power_kw: kw,
                        },
                    ))
                    .collect(),
            )
        });
        &STANDARD
    }

    #[must_use]
    pub fn entries(&self) -> &[EquipmentSpec] {
        &self.entries
    }

    /// Entries of one family, in catalog order.
    pub fn family(&self, family: CrusherFamily) -> impl Iterator<Item = &EquipmentSpec> {
        self.entries.iter().filter(move |e| e.family == family)
    }

    #[must_use]
    pub fn find(&self, model: &str) -> Option<&EquipmentSpec> {
        self.entries.iter().find(|e| e.model == model)
    }
}

type Range = (f64, f64);

/// Model, gape, max feed, CSS range, capacity range (t/h), power (kW).
const JAWS: [(&str, f64, f64, Range, Range, f64); 10] = [
    ("F-1500x1200", 1200.0, 1020.0, (150.0, 300.0), (400.0, 850.0), 250.0),
    ("F-1200x900", 900.0, 750.0, (75.0, 200.0), (130.0, 360.0), 132.0),
    ("F-1100x800", 800.0, 680.0, (75.0, 180.0), (120.0, 300.0), 110.0),
    ("F-1000x750", 750.0, 630.0, (75.0, 175.0), (110.0, 260.0), 90.0),
    ("F-900x600", 600.0, 500.0, (65.0, 150.0), (65.0, 180.0), 75.0),
    ("F-800x550", 550.0, 450.0, (55.0, 130.0), (50.0, 150.0), 55.0),
    ("F-750x500", 500.0, 420.0, (50.0, 125.0), (45.0, 120.0), 55.0),
    ("F-600x400", 400.0, 340.0, (40.0, 100.0), (25.0, 70.0), 37.0),
    ("F-500x300", 300.0, 250.0, (25.0, 80.0), (15.0, 50.0), 30.0),
    ("F-400x250", 250.0, 210.0, (20.0, 60.0), (8.0, 35.0), 22.0),
];

/// Model, series, max feed, CSS range, capacity range (t/h), power (kW).
const CONES: [(&str, &str, f64, Range, Range, f64); 12] = [
    ("CS-7", "Standard", 370.0, (25.0, 60.0), (450.0, 1100.0), 315.0),
    ("CS-5.5", "Standard", 230.0, (19.0, 51.0), (220.0, 480.0), 220.0),
    ("CH-4.5", "Standard", 185.0, (13.0, 38.0), (140.0, 300.0), 160.0),
    ("CS-4", "Standard", 160.0, (13.0, 32.0), (90.0, 210.0), 132.0),
    ("CS-3", "Standard", 125.0, (10.0, 25.0), (60.0, 130.0), 90.0),
    ("CS-2", "Standard", 90.0, (8.0, 19.0), (20.0, 70.0), 55.0),
    ("CH-7 SH", "Short Head", 180.0, (10.0, 38.0), (300.0, 750.0), 315.0),
    ("CH-5.5 SH", "Short Head", 130.0, (8.0, 32.0), (150.0, 400.0), 220.0),
    ("CS-4 SH", "Short Head", 100.0, (6.0, 25.0), (60.0, 160.0), 132.0),
    ("CH-430", "Short Head", 90.0, (6.0, 25.0), (50.0, 150.0), 110.0),
    ("CS-3 SH", "Short Head", 60.0, (5.0, 19.0), (25.0, 80.0), 75.0),
    ("CS-2 SH", "Short Head", 45.0, (3.0, 13.0), (15.0, 50.0), 55.0),
];
