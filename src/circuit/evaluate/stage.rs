use std::collections::BTreeMap;

use num_traits::Zero;
use twine_core::Model;
use uom::si::f64::{Length, MassRate, Power, VolumeRate};

use crate::{
    circuit::{
        flowsheet::{NodeKind, PortId},
        plant::PlantParameters,
    },
    models::comminution::{
        Stream,
        crusher::{Crusher, CrusherFamily, CrusherInput},
        screen::Screen,
    },
    support::{
        constraint::{Constrained, ConstraintResult, NonNegative},
        psd::SizeDistribution,
        units::SpecificEnergy,
    },
};

use super::SkipReason;

/// Everything the evaluator records for one node.
#[derive(Debug, Clone, PartialEq)]
pub struct StageResult {
    /// Position in evaluation order.
    ///
    /// Strictly greater than the sequence of every direct predecessor, and
    /// monotonic across partial re-evaluations.
    pub sequence: u64,

    /// 80 % passing size of the stream entering the node.
    pub f80: Option<Length>,
    pub f100: Option<Length>,

    /// 80 % passing size of the node's main product.
    ///
    /// The crusher discharge, the screen undersize, or the pass-through
    /// stream of a feed or product node.
    pub p80: Option<Length>,
    pub p100: Option<Length>,

    pub specific_energy: Constrained<SpecificEnergy, NonNegative>,
    pub power: Power,

    /// Mass rate entering the node.
    pub feed_rate: MassRate,

    /// The stream leaving each outlet port.
    pub outlets: BTreeMap<PortId, Stream>,

    pub duty: Duty,
}

impl StageResult {
    #[must_use]
    pub fn outlet(&self, port: PortId) -> Option<&Stream> {
        self.outlets.get(&port)
    }

    /// Total rate leaving the node.
    #[must_use]
    pub fn product_rate(&self) -> MassRate {
        self.outlets
            .values()
            .fold(MassRate::zero(), |total, stream| total + stream.rate)
    }

    #[must_use]
    pub fn crusher(&self) -> Option<&CrusherDuty> {
        match &self.duty {
            Duty::Crusher(duty) => Some(duty),
            _ => None,
        }
    }
}

/// Kind-specific figures of a [`StageResult`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Duty {
    Feed,
    Crusher(CrusherDuty),
    Screen(ScreenDuty),
    Product,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrusherDuty {
    pub family: CrusherFamily,
    pub css: Length,
    pub gape: Length,
    pub reduction_ratio: f64,

    /// Percent of the feed already finer than the CSS.
    pub percent_passing_css: f64,
    pub bypass_rate: MassRate,
    pub crusher_feed_rate: MassRate,

    /// Crusher feed rate over bulk density.
    pub volumetric_rate: VolumeRate,

    pub circuit: CircuitType,
}

/// How a crusher's product leaves the stage.
///
/// Every stage runs in a single pass, so only open circuits exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CircuitType {
    Open,
}

impl CircuitType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenDuty {
    pub aperture: Length,

    /// Percent of the feed passing the aperture.
    pub percent_passing: f64,
}

/// A node's kind turned into a runnable model.
#[derive(Debug, Clone, Copy)]
pub(super) enum Unit {
    Feed,
    Crusher(Crusher),
    Screen(Screen),
    Product,
}

impl Unit {
    pub(super) fn build(kind: &NodeKind, plant: &PlantParameters) -> ConstraintResult<Self> {
        let work_index = plant.work_index().into_inner();
        Ok(match *kind {
            NodeKind::Feed => Self::Feed,
            NodeKind::JawCrusher { css } => {
                Self::Crusher(Crusher::new(CrusherFamily::Jaw, css.into_inner(), work_index)?)
            }
            NodeKind::ConeCrusher { css } => {
                Self::Crusher(Crusher::new(CrusherFamily::Cone, css.into_inner(), work_index)?)
            }
            NodeKind::Screen { aperture } => Self::Screen(Screen { aperture }),
            NodeKind::Product => Self::Product,
        })
    }

    pub(super) fn is_feed(&self) -> bool {
        matches!(self, Self::Feed)
    }
}

/// Plant-wide inputs shared by every node in a pass.
pub(super) struct Context<'a> {
    pub(super) feed: &'a SizeDistribution,
    pub(super) plant: &'a PlantParameters,
    pub(super) plant_rate: MassRate,
}

/// Runs one unit on its resolved input.
///
/// `input` is ignored by feed nodes.
pub(super) fn run(
    unit: &Unit,
    input: Option<Stream>,
    context: &Context<'_>,
    sequence: u64,
) -> Result<StageResult, SkipReason> {
    let passthrough = |stream: Stream, duty: Duty| StageResult {
        sequence,
        f80: stream.d80(),
        f100: stream.top_size(),
        p80: stream.d80(),
        p100: stream.top_size(),
        specific_energy: NonNegative::zero(),
        power: Power::zero(),
        feed_rate: stream.rate,
        outlets: BTreeMap::from([(PortId::Outlet, stream)]),
        duty,
    };

    let input = || input.ok_or(SkipReason::NoInboundStream);

    match unit {
        Unit::Feed => Ok(passthrough(
            Stream::new(context.feed.clone(), context.plant_rate),
            Duty::Feed,
        )),
        Unit::Product => {
            let mut result = passthrough(input()?, Duty::Product);
            // Product nodes have no outlet.
            result.outlets.clear();
            Ok(result)
        }
        Unit::Crusher(crusher) => {
            let input = input()?;
            let feed_rate = input.rate;
            let (f80, f100) = (input.d80(), input.top_size());
            let out = crusher.call(&CrusherInput::new(input, context.plant_rate))?;

            let duty = CrusherDuty {
                family: crusher.family,
                css: *crusher.css.as_ref(),
                gape: out.gape,
                reduction_ratio: out.reduction_ratio,
                percent_passing_css: out.percent_passing_css,
                bypass_rate: out.bypass_rate,
                crusher_feed_rate: out.crusher_feed_rate,
                volumetric_rate: out.crusher_feed_rate / context.plant.bulk_density(),
                circuit: CircuitType::Open,
            };

            Ok(StageResult {
                sequence,
                f80,
                f100,
                p80: Some(out.p80),
                p100: Some(out.p100),
                specific_energy: out.specific_energy,
                power: out.power,
                feed_rate,
                outlets: BTreeMap::from([(PortId::Outlet, out.product)]),
                duty: Duty::Crusher(duty),
            })
        }
        Unit::Screen(screen) => {
            let input = input()?;
            let feed_rate = input.rate;
            let (f80, f100) = (input.d80(), input.top_size());
            let Ok(out) = screen.call(&input);

            Ok(StageResult {
                sequence,
                f80,
                f100,
                p80: out.undersize.d80(),
                p100: out.undersize.top_size(),
                specific_energy: NonNegative::zero(),
                power: Power::zero(),
                feed_rate,
                duty: Duty::Screen(ScreenDuty {
                    aperture: *screen.aperture.as_ref(),
                    percent_passing: out.percent_passing,
                }),
                outlets: BTreeMap::from([
                    (PortId::Oversize, out.oversize),
                    (PortId::Undersize, out.undersize),
                ]),
            })
        }
    }
}
