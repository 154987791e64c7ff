//! Tabular records of an evaluation.
//!
//! Numbers are pre-formatted with fixed decimals: two for flows, powers and
//! sizes, three for specific energy, one for gape and CSS. Figures that do
//! not apply to a unit are empty strings. Writing the records to a file is
//! left to the caller.
//!
//! Records cover crushers and screens in topological order. Feed and product
//! nodes are terminals and get no row.

use serde::Serialize;
use uom::si::{
    f64::Length,
    length::millimeter,
    power::kilowatt,
    time::hour,
};

use crate::support::units::{KilowattHoursPerTonne, TonnesPerHour, cubic_meters_per_hour};

use super::{
    evaluate::{Duty, Evaluation, StageResult},
    flowsheet::{Flowsheet, Node, NodeId},
    plant::PlantParameters,
};

/// One row of the stage table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageRecord {
    pub stage: String,
    /// Crusher feed after bypass, or screen feed.
    pub feed_tph: String,
    pub power_kw: String,
    pub specific_energy_kwh_t: String,
    pub gape_mm: String,
    pub css_mm: String,
}

impl StageRecord {
    pub const HEADERS: [&'static str; 6] = [
        "Stage",
        "Feed (t/h)",
        "Power (kW)",
        "Specific energy (kWh/t)",
        "Gape (mm)",
        "CSS (mm)",
    ];

    /// Field values in [`Self::HEADERS`] order.
    #[must_use]
    pub fn values(&self) -> [&str; 6] {
        [
            &self.stage,
            &self.feed_tph,
            &self.power_kw,
            &self.specific_energy_kwh_t,
            &self.gape_mm,
            &self.css_mm,
        ]
    }
}

/// One row of the mass balance, all rates in t/h.
///
/// Circuits are open, so the circulating load is always zero. `circuit` is
/// the crusher's circuit type and empty for screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MassBalanceRecord {
    pub stage: String,
    pub new_feed_tph: String,
    pub bypass_tph: String,
    pub circulating_load_tph: String,
    pub crusher_feed_tph: String,
    pub crusher_feed_m3h: String,
    pub product_tph: String,
    pub circuit: String,
}

impl MassBalanceRecord {
    pub const HEADERS: [&'static str; 8] = [
        "Stage",
        "New feed (t/h)",
        "Bypass (t/h)",
        "Circulating load (t/h)",
        "Crusher feed (t/h)",
        "Crusher feed (m³/h)",
        "Product (t/h)",
        "Circuit",
    ];
}

/// One row of the size analysis, sizes in mm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizeAnalysisRecord {
    pub stage: String,
    pub f100_mm: String,
    pub f80_mm: String,
    pub p80_mm: String,
    pub p100_mm: String,
}

impl SizeAnalysisRecord {
    pub const HEADERS: [&'static str; 5] = ["Stage", "F100 (mm)", "F80 (mm)", "P80 (mm)", "P100 (mm)"];
}

/// Plant-wide figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlantSummary {
    pub plant_rate_tph: f64,
    pub effective_hours: f64,
    pub total_power_kw: f64,
    pub crushers: usize,
}

impl PlantSummary {
    #[must_use]
    pub fn new(plant: &PlantParameters, evaluation: &Evaluation) -> Self {
        Self {
            plant_rate_tph: plant.plant_rate().get_tonnes_per_hour(),
            effective_hours: plant.effective_hours().get::<hour>(),
            total_power_kw: evaluation.total_power().get::<kilowatt>(),
            crushers: evaluation
                .results()
                .filter(|(_, result)| result.crusher().is_some())
                .count(),
        }
    }
}

/// Evaluated crushers and screens with their display names.
fn stages<'a>(
    flowsheet: &'a Flowsheet,
    evaluation: &'a Evaluation,
) -> impl Iterator<Item = (&'a str, &'a StageResult)> {
    evaluation.results().filter_map(move |(id, result)| {
        matches!(result.duty, Duty::Crusher(_) | Duty::Screen(_))
            .then(|| (display_name(flowsheet.node(id), id), result))
    })
}

fn display_name<'a>(node: Option<&'a Node>, id: &'a NodeId) -> &'a str {
    node.map_or(id.as_str(), |node| node.name.as_str())
}

#[must_use]
pub fn stage_records(flowsheet: &Flowsheet, evaluation: &Evaluation) -> Vec<StageRecord> {
    stages(flowsheet, evaluation)
        .map(|(name, result)| {
            let crusher = result.crusher();
            let feed = crusher.map_or(result.feed_rate, |duty| duty.crusher_feed_rate);
            StageRecord {
                stage: name.to_owned(),
                feed_tph: fixed(feed.get_tonnes_per_hour(), 2),
                power_kw: fixed(result.power.get::<kilowatt>(), 2),
                specific_energy_kwh_t: fixed(
                    result.specific_energy.as_ref().get_kilowatt_hours_per_tonne(),
                    3,
                ),
                gape_mm: optional(crusher.map(|duty| duty.gape), 1),
                css_mm: optional(crusher.map(|duty| duty.css), 1),
            }
        })
        .collect()
}

#[must_use]
pub fn mass_balance_records(flowsheet: &Flowsheet, evaluation: &Evaluation) -> Vec<MassBalanceRecord> {
    stages(flowsheet, evaluation)
        .map(|(name, result)| {
            let crusher = result.crusher();
            let figure = |value: Option<f64>| value.map_or_else(String::new, |v| fixed(v, 2));
            MassBalanceRecord {
                stage: name.to_owned(),
                new_feed_tph: fixed(result.feed_rate.get_tonnes_per_hour(), 2),
                bypass_tph: figure(crusher.map(|duty| duty.bypass_rate.get_tonnes_per_hour())),
                circulating_load_tph: fixed(0.0, 2),
                crusher_feed_tph: figure(crusher.map(|duty| duty.crusher_feed_rate.get_tonnes_per_hour())),
                crusher_feed_m3h: figure(crusher.map(|duty| cubic_meters_per_hour(duty.volumetric_rate))),
                product_tph: fixed(result.product_rate().get_tonnes_per_hour(), 2),
                circuit: crusher.map_or_else(String::new, |duty| duty.circuit.as_str().to_owned()),
            }
        })
        .collect()
}

#[must_use]
pub fn size_analysis_records(
    flowsheet: &Flowsheet,
    evaluation: &Evaluation,
) -> Vec<SizeAnalysisRecord> {
    stages(flowsheet, evaluation)
        .map(|(name, result)| SizeAnalysisRecord {
            stage: name.to_owned(),
            f100_mm: optional(result.f100, 2),
            f80_mm: optional(result.f80, 2),
            p80_mm: optional(result.p80, 2),
            p100_mm: optional(result.p100, 2),
        })
        .collect()
}

fn fixed(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

fn optional(size: Option<Length>, decimals: usize) -> String {
    size.map_or_else(String::new, |size| fixed(size.get::<millimeter>(), decimals))
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::length::millimeter;

    use crate::{
        circuit::{
            evaluate::evaluate,
            flowsheet::{NodeKind, PortId},
            plant::PlantInputs,
        },
        support::psd::SizeDistribution,
    };

    fn mm(value: f64) -> Length {
        Length::new::<millimeter>(value)
    }

    fn plant() -> PlantParameters {
        PlantParameters::try_from(PlantInputs {
            daily_capacity: Some(4_800.0),
            shifts_per_day: Some(2.0),
            hours_per_shift: Some(10.0),
            availability: Some(80.0),
            bulk_density: Some(1.6),
            work_index: Some(14.0),
            target_p100: Some(10.0),
        })
        .expect("valid plant")
    }

    /// feed → jaw → screen → { fines, coarse }
    fn evaluated() -> (Flowsheet, Evaluation) {
        let mut fs = Flowsheet::new();
        fs.add_node("feed", "Feed", NodeKind::Feed).unwrap();
        fs.add_node("jaw", "Primary (jaw)", NodeKind::jaw_crusher(mm(60.0)).unwrap())
            .unwrap();
        fs.add_node("screen", "Screen", NodeKind::screen(mm(20.0)).unwrap())
            .unwrap();
        fs.add_node("coarse", "Coarse", NodeKind::Product).unwrap();
        fs.add_node("fines", "Fines", NodeKind::Product).unwrap();
        fs.connect("feed", PortId::Outlet, "jaw", PortId::Inlet).unwrap();
        fs.connect("jaw", PortId::Outlet, "screen", PortId::Inlet).unwrap();
        fs.connect("screen", PortId::Oversize, "coarse", PortId::Inlet).unwrap();
        fs.connect("screen", PortId::Undersize, "fines", PortId::Inlet).unwrap();

        let feed = SizeDistribution::from_rows([
            (50.0, 12.0),
            (75.0, 26.0),
            (100.0, 40.0),
            (150.0, 64.0),
            (200.0, 82.0),
            (300.0, 94.0),
            (400.0, 100.0),
        ]);

        let evaluation = evaluate(&fs, &feed, &plant()).expect("acyclic");
        (fs, evaluation)
    }

    #[test]
    fn fixed_decimals() {
        assert_eq!(fixed(14.5678, 2), "14.57");
        assert_eq!(fixed(0.123_45, 3), "0.123");
        assert_eq!(fixed(470.588, 1), "470.6");
        assert_eq!(fixed(0.0, 2), "0.00");
        assert_eq!(optional(None, 2), "");
    }

    #[test]
    fn stage_table_rows() {
        let (fs, evaluation) = evaluated();
        let records = stage_records(&fs, &evaluation);

        let names: Vec<_> = records.iter().map(|r| r.stage.as_str()).collect();
        assert_eq!(names, ["Primary (jaw)", "Screen"]);

        let jaw = &records[0];
        let duty = evaluation.result(&"jaw".into()).unwrap().crusher().unwrap();
        assert_eq!(jaw.css_mm, "60.0");
        assert_eq!(jaw.gape_mm, "470.6");
        assert_eq!(
            jaw.feed_tph,
            fixed(duty.crusher_feed_rate.get_tonnes_per_hour(), 2)
        );
        assert_eq!(jaw.specific_energy_kwh_t.split('.').nth(1).map(str::len), Some(3));
        assert_eq!(jaw.values()[0], "Primary (jaw)");
        assert_eq!(jaw.values().len(), StageRecord::HEADERS.len());

        // Screens draw no power and have no CSS or gape.
        let screen = &records[1];
        assert_eq!(screen.power_kw, "0.00");
        assert_eq!(screen.specific_energy_kwh_t, "0.000");
        assert_eq!(screen.gape_mm, "");
        assert_eq!(screen.css_mm, "");
    }

    #[test]
    fn mass_balance_rows() {
        let (fs, evaluation) = evaluated();
        let records = mass_balance_records(&fs, &evaluation);
        assert_eq!(records.len(), 2);

        let jaw = &records[0];
        assert_eq!(jaw.new_feed_tph, "300.00");
        assert_eq!(jaw.circulating_load_tph, "0.00");
        assert_eq!(jaw.product_tph, "300.00");
        let bypass: f64 = jaw.bypass_tph.parse().unwrap();
        let crushed: f64 = jaw.crusher_feed_tph.parse().unwrap();
        assert_relative_eq!(bypass + crushed, 300.0, epsilon = 0.011);

        assert_eq!(jaw.circuit, "open");

        let screen = &records[1];
        assert_eq!(screen.circuit, "");
        assert_eq!(screen.bypass_tph, "");
        assert_eq!(screen.crusher_feed_tph, "");
        assert_eq!(screen.crusher_feed_m3h, "");
    }

    #[test]
    fn size_analysis_rows() {
        let (fs, evaluation) = evaluated();
        let records = size_analysis_records(&fs, &evaluation);

        let jaw = &records[0];
        assert_eq!(jaw.f100_mm, "400.00");
        assert_eq!(jaw.f80_mm, "194.44");
        assert!(!jaw.p80_mm.is_empty());
    }

    #[test]
    fn summary_and_json() {
        let (_, evaluation) = evaluated();
        let summary = PlantSummary::new(&plant(), &evaluation);
        assert_relative_eq!(summary.plant_rate_tph, 300.0, max_relative = 1e-9);
        assert_relative_eq!(summary.effective_hours, 16.0, max_relative = 1e-9);
        assert_eq!(summary.crushers, 1);

        let (fs, evaluation) = evaluated();
        let json = serde_json::to_value(&stage_records(&fs, &evaluation)[0]).unwrap();
        assert_eq!(json["css_mm"], "60.0");
    }
}
