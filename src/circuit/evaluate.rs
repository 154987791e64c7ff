//! Stream propagation through a flowsheet.
//!
//! Nodes are visited in topological order (Kahn's algorithm, FIFO). Each
//! node resolves its input from the outlet streams of its predecessors, runs
//! its unit model and stores a [`StageResult`].
//!
//! A node with several inbound edges takes the first inbound stream that is
//! available, in edge insertion order. The other streams are dropped, not
//! blended.
//!
//! A node that cannot run is skipped with a [`SkipReason`] and its
//! descendants are skipped with it. Cycles abort the whole request before
//! any result is produced.

mod error;
mod stage;
mod topology;

use std::collections::{BTreeMap, BTreeSet};

use num_traits::Zero;
use tracing::{debug, info, warn};
use uom::si::{
    f64::{MassRate, Power},
    power::kilowatt,
};

use crate::{
    circuit::{
        flowsheet::{Flowsheet, NodeId},
        plant::PlantParameters,
    },
    equipment::{Catalog, Recommendation, match_equipment},
    models::comminution::Stream,
    support::psd::SizeDistribution,
};

pub use error::{EvaluationError, SkipReason};
pub use stage::{CircuitType, CrusherDuty, Duty, ScreenDuty, StageResult};
use topology::topological_order;

use stage::{Context, Unit};

/// Results of evaluating a flowsheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    results: BTreeMap<NodeId, StageResult>,
    skipped: BTreeMap<NodeId, SkipReason>,

    /// Every node in topological order.
    order: Vec<NodeId>,

    /// Nodes visited by the pass that produced this evaluation.
    visited: Vec<NodeId>,

    plant_rate: MassRate,
    next_sequence: u64,
}

impl Evaluation {
    #[must_use]
    pub fn result(&self, id: &NodeId) -> Option<&StageResult> {
        self.results.get(id)
    }

    /// Results in topological order.
    pub fn results(&self) -> impl Iterator<Item = (&NodeId, &StageResult)> {
        self.order
            .iter()
            .filter_map(|id| self.results.get(id).map(|result| (id, result)))
    }

    #[must_use]
    pub fn skipped(&self) -> &BTreeMap<NodeId, SkipReason> {
        &self.skipped
    }

    #[must_use]
    pub fn skip_reason(&self, id: &NodeId) -> Option<&SkipReason> {
        self.skipped.get(id)
    }

    #[must_use]
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    /// Nodes the producing pass ran, in the order it ran them.
    ///
    /// Every node after a full evaluation, only the invalidated ones after a
    /// partial re-evaluation.
    #[must_use]
    pub fn visited(&self) -> &[NodeId] {
        &self.visited
    }

    #[must_use]
    pub fn plant_rate(&self) -> MassRate {
        self.plant_rate
    }

    /// Sum of the installed power of every evaluated node.
    #[must_use]
    pub fn total_power(&self) -> Power {
        self.results
            .values()
            .fold(Power::zero(), |total, result| total + result.power)
    }

    /// Matches every evaluated crusher against `catalog`, in topological order.
    ///
    /// The required capacity is the crusher feed rate after bypass.
    #[must_use]
    pub fn recommend<'a>(&'a self, catalog: &'a Catalog) -> Vec<Recommendation<'a>> {
        self.results()
            .filter_map(|(id, result)| {
                let duty = result.crusher()?;
                Some(Recommendation {
                    node: id,
                    family: duty.family,
                    equipment: match_equipment(
                        catalog,
                        duty.family,
                        duty.crusher_feed_rate,
                        result.power,
                        duty.css,
                    ),
                })
            })
            .collect()
    }
}

/// Evaluates every node of `flowsheet`.
///
/// # Errors
///
/// Returns an [`EvaluationError`] if the feed has fewer than 2 points or the
/// flowsheet has a cycle. Nothing is evaluated in either case.
///
/// # Example
///
/// ```
/// use twine_comminution::circuit::{Flowsheet, NodeKind, PlantInputs, PlantParameters, PortId, evaluate};
/// use twine_comminution::support::psd::SizeDistribution;
/// use uom::si::{f64::Length, length::millimeter};
///
/// let mut flowsheet = Flowsheet::new();
/// flowsheet.add_node("feed", "Feed", NodeKind::Feed).unwrap();
/// flowsheet
///     .add_node("jaw", "Primary", NodeKind::jaw_crusher(Length::new::<millimeter>(60.0)).unwrap())
///     .unwrap();
/// flowsheet.add_node("product", "Product", NodeKind::Product).unwrap();
/// flowsheet.connect("feed", PortId::Outlet, "jaw", PortId::Inlet).unwrap();
/// flowsheet.connect("jaw", PortId::Outlet, "product", PortId::Inlet).unwrap();
///
/// let plant = PlantParameters::try_from(PlantInputs {
///     daily_capacity: Some(4_800.0),
///     shifts_per_day: Some(2.0),
///     hours_per_shift: Some(10.0),
///     availability: Some(80.0),
///     bulk_density: Some(1.6),
///     work_index: Some(14.0),
///     target_p100: Some(10.0),
/// })
/// .unwrap();
///
/// let feed = SizeDistribution::from_rows([(50.0, 12.0), (100.0, 40.0), (200.0, 82.0), (400.0, 100.0)]);
/// let evaluation = evaluate(&flowsheet, &feed, &plant).unwrap();
///
/// let jaw = evaluation.result(&"jaw".into()).unwrap();
/// assert!(jaw.sequence > evaluation.result(&"feed".into()).unwrap().sequence);
/// ```
pub fn evaluate(
    flowsheet: &Flowsheet,
    feed: &SizeDistribution,
    plant: &PlantParameters,
) -> Result<Evaluation, EvaluationError> {
    run_pass(flowsheet, feed, plant, None)
}

/// A cached evaluation plus the nodes that must be re-run.
pub(crate) struct Previous<'a> {
    pub(crate) evaluation: &'a Evaluation,
    pub(crate) stale: &'a BTreeSet<NodeId>,
}

/// Runs one evaluation pass.
///
/// With `previous`, only its stale nodes are run and every other result is
/// carried over unchanged.
pub(crate) fn run_pass(
    flowsheet: &Flowsheet,
    feed: &SizeDistribution,
    plant: &PlantParameters,
    previous: Option<Previous<'_>>,
) -> Result<Evaluation, EvaluationError> {
    if feed.len() < 2 {
        return Err(EvaluationError::InsufficientFeedPoints { points: feed.len() });
    }

    let order = topological_order(flowsheet)?;

    let units = flowsheet
        .nodes()
        .map(|node| {
            Unit::build(&node.kind, plant)
                .map(|unit| (&node.id, unit))
                .map_err(|source| EvaluationError::InvalidUnit {
                    node: node.id.clone(),
                    source,
                })
        })
        .collect::<Result<BTreeMap<_, _>, _>>()?;

    let (mut results, mut skipped, mut sequence) = match &previous {
        Some(previous) => {
            let keep = |id: &NodeId| !previous.stale.contains(id) && flowsheet.contains(id);
            (
                carry_over(&previous.evaluation.results, keep),
                carry_over(&previous.evaluation.skipped, keep),
                previous.evaluation.next_sequence,
            )
        }
        None => (BTreeMap::new(), BTreeMap::new(), 0),
    };

    let context = Context {
        feed,
        plant,
        plant_rate: plant.plant_rate(),
    };

    let mut visited = Vec::new();
    for id in &order {
        if previous.as_ref().is_some_and(|p| !p.stale.contains(id)) {
            continue;
        }
        let Some(unit) = units.get(id) else {
            continue;
        };
        visited.push(id.clone());

        let outcome = if unit.is_feed() {
            stage::run(unit, None, &context, sequence)
        } else {
            inbound_stream(flowsheet, id, &results, &skipped)
                .and_then(|input| stage::run(unit, Some(input), &context, sequence))
        };

        match outcome {
            Ok(result) => {
                debug!(
                    node = %id,
                    sequence,
                    power_kw = result.power.get::<kilowatt>(),
                    "evaluated node"
                );
                results.insert(id.clone(), result);
                sequence += 1;
            }
            Err(reason) => {
                warn!(node = %id, %reason, "skipping node");
                skipped.insert(id.clone(), reason);
            }
        }
    }

    let evaluation = Evaluation {
        results,
        skipped,
        order,
        visited,
        plant_rate: context.plant_rate,
        next_sequence: sequence,
    };

    info!(
        visited = evaluation.visited.len(),
        skipped = evaluation.skipped.len(),
        total_power_kw = evaluation.total_power().get::<kilowatt>(),
        "flowsheet evaluated"
    );

    Ok(evaluation)
}

fn carry_over<T: Clone>(
    map: &BTreeMap<NodeId, T>,
    keep: impl Fn(&NodeId) -> bool,
) -> BTreeMap<NodeId, T> {
    map.iter()
        .filter(|(id, _)| keep(id))
        .map(|(id, value)| (id.clone(), value.clone()))
        .collect()
}

/// The first available stream on an inbound edge of `id`.
fn inbound_stream(
    flowsheet: &Flowsheet,
    id: &NodeId,
    results: &BTreeMap<NodeId, StageResult>,
    skipped: &BTreeMap<NodeId, SkipReason>,
) -> Result<Stream, SkipReason> {
    let mut blocked = None;

    for edge in flowsheet.inbound(id) {
        if let Some(stream) = results
            .get(&edge.source)
            .and_then(|result| result.outlet(edge.source_port))
        {
            return Ok(stream.clone());
        }
        if blocked.is_none() && skipped.contains_key(&edge.source) {
            blocked = Some(edge.source.clone());
        }
    }

    Err(blocked.map_or(SkipReason::NoInboundStream, SkipReason::UpstreamSkipped))
}
