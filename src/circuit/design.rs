//! Greedy auto-design of a crushing circuit.
//!
//! Given a feed curve and a target product top size, proposes a linear chain
//! `feed → jaw → cone → … → product`:
//!
//! 1. The target P80 is derived from the target P100 with the cone shape
//!    law, `P80 = P100 · 0.8^(1/0.87)`.
//! 2. The primary jaw reduces the feed F80 by 3.
//! 3. Each cone reduces by 4, unless a reduction by 6 would already reach the
//!    target, in which case it crushes straight to the target.
//!
//! Stages are added until the target is reached or five stages exist. The
//! heuristic only follows a size-reduction path. Whether the catalog holds a
//! machine for each stage is checked afterwards by the equipment matcher.

mod config;
mod error;

use tracing::debug;
use uom::si::{f64::Length, length::millimeter};

use crate::{
    circuit::flowsheet::{Flowsheet, NodeKind, PortId},
    models::comminution::crusher::CrusherFamily,
    support::{
        constraint::{Constrained, StrictlyPositive},
        psd::SizeDistribution,
    },
};

pub use config::DesignConfig;
pub use error::DesignError;

/// One proposed crushing stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedStage {
    pub family: CrusherFamily,

    /// Closed-side setting, equal to the stage's target P80.
    pub css: Constrained<Length, StrictlyPositive>,
}

impl PlannedStage {
    /// `Primary (jaw)` for the first stage, `Stage N (cone)` after it.
    #[must_use]
    pub fn name(&self, number: usize) -> String {
        if number == 1 {
            format!("Primary ({})", self.family.as_str())
        } else {
            format!("Stage {number} ({})", self.family.as_str())
        }
    }
}

/// A size-reduction path from the feed F80 to the target P80.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignPlan {
    pub f80: Length,
    pub target_p80: Length,
    pub stages: Vec<PlannedStage>,
}

impl DesignPlan {
    /// Builds the linear flowsheet for this plan.
    ///
    /// Node ids are `feed`, `stage-1` … `stage-N` and `product`.
    ///
    /// # Errors
    ///
    /// Returns [`DesignError::Flowsheet`] if the chain cannot be assembled.
    pub fn to_flowsheet(&self) -> Result<Flowsheet, DesignError> {
        let mut flowsheet = Flowsheet::new();
        let mut previous = flowsheet.add_node("feed", "Feed", NodeKind::Feed)?;

        for (index, stage) in self.stages.iter().enumerate() {
            let number = index + 1;
            let kind = match stage.family {
                CrusherFamily::Jaw => NodeKind::JawCrusher { css: stage.css },
                CrusherFamily::Cone => NodeKind::ConeCrusher { css: stage.css },
            };
            let id = flowsheet.add_node(format!("stage-{number}"), stage.name(number), kind)?;
            flowsheet.connect(previous, PortId::Outlet, id.clone(), PortId::Inlet)?;
            previous = id;
        }

        let product = flowsheet.add_node("product", "Product", NodeKind::Product)?;
        flowsheet.connect(previous, PortId::Outlet, product, PortId::Inlet)?;

        Ok(flowsheet)
    }
}

/// Designs a circuit with the default [`DesignConfig`].
///
/// # Errors
///
/// See [`auto_design_with`].
///
/// # Example
///
/// ```
/// use twine_comminution::circuit::auto_design;
/// use twine_comminution::support::psd::SizeDistribution;
/// use uom::si::{f64::Length, length::millimeter};
///
/// let feed = SizeDistribution::from_rows([
///     (50.0, 12.0), (75.0, 26.0), (100.0, 40.0), (150.0, 64.0),
///     (200.0, 82.0), (300.0, 94.0), (400.0, 100.0),
/// ]);
/// let flowsheet = auto_design(&feed, Length::new::<millimeter>(10.0)).unwrap();
///
/// // feed, a jaw, two cones and the product.
/// assert_eq!(flowsheet.len(), 5);
/// ```
pub fn auto_design(feed: &SizeDistribution, target_p100: Length) -> Result<Flowsheet, DesignError> {
    auto_design_with(feed, target_p100, &DesignConfig::default())
}

/// Designs a circuit with a custom [`DesignConfig`].
///
/// # Errors
///
/// Returns a [`DesignError`] if the feed has fewer than 2 points, the target
/// or the configuration is invalid, or the feed is already finer than the
/// target.
pub fn auto_design_with(
    feed: &SizeDistribution,
    target_p100: Length,
    config: &DesignConfig,
) -> Result<Flowsheet, DesignError> {
    plan(feed, target_p100, config)?.to_flowsheet()
}

/// Plans the stage sequence without building a flowsheet.
///
/// # Errors
///
/// As [`auto_design_with`].
pub fn plan(
    feed: &SizeDistribution,
    target_p100: Length,
    config: &DesignConfig,
) -> Result<DesignPlan, DesignError> {
    if feed.len() < 2 {
        return Err(DesignError::InsufficientFeedPoints { points: feed.len() });
    }
    let f80 = feed.d80().ok_or(DesignError::UndefinedFeedSize)?;

    let target_p100 = StrictlyPositive::new(target_p100)
        .map_err(DesignError::InvalidTarget)?
        .into_inner();
    let primary = positive("primary_reduction", config.primary_reduction)?;
    let secondary = positive("secondary_reduction", config.secondary_reduction)?;
    let reach = positive("final_stage_reach", config.final_stage_reach)?;
    let exponent = positive("target_shape_exponent", config.target_shape_exponent)?;

    let target_p80 = target_p100.get::<millimeter>() * 0.8_f64.powf(1.0 / exponent);
    if f80 <= target_p80 {
        return Err(DesignError::FeedFinerThanTarget {
            f80: Length::new::<millimeter>(f80),
            target_p80: Length::new::<millimeter>(target_p80),
        });
    }

    let mut stages = Vec::new();
    let mut current = f80;
    while current > target_p80 && stages.len() < config.max_stages {
        let number = stages.len() + 1;
        let (family, p80) = if number == 1 {
            (CrusherFamily::Jaw, current / primary)
        } else if current / reach <= target_p80 {
            (CrusherFamily::Cone, target_p80)
        } else {
            (CrusherFamily::Cone, current / secondary)
        };

        debug!(stage = number, family = family.as_str(), f80_mm = current, p80_mm = p80, "planned stage");

        let css = StrictlyPositive::new(Length::new::<millimeter>(p80))
            .map_err(|source| DesignError::InvalidStage { stage: number, source })?;
        stages.push(PlannedStage { family, css });
        current = p80;
    }

    Ok(DesignPlan {
        f80: Length::new::<millimeter>(f80),
        target_p80: Length::new::<millimeter>(target_p80),
        stages,
    })
}

fn positive(field: &'static str, value: f64) -> Result<f64, DesignError> {
    StrictlyPositive::new(value)
        .map(Constrained::into_inner)
        .map_err(|source| DesignError::InvalidConfig { field, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::{
        circuit::flowsheet::NodeId, support::constraint::ConstraintError,
    };

    fn feed() -> SizeDistribution {
        SizeDistribution::from_rows([
            (50.0, 12.0),
            (75.0, 26.0),
            (100.0, 40.0),
            (150.0, 64.0),
            (200.0, 82.0),
            (300.0, 94.0),
            (400.0, 100.0),
        ])
    }

    fn mm(value: f64) -> Length {
        Length::new::<millimeter>(value)
    }

    fn css_mm(stage: &PlannedStage) -> f64 {
        stage.css.into_inner().get::<millimeter>()
    }

    #[test]
    fn reference_feed_needs_three_stages() {
        let plan = plan(&feed(), mm(10.0), &DesignConfig::default()).expect("feed is coarse");

        let f80 = 150.0 + 50.0 * 16.0 / 18.0;
        let target = 10.0 * 0.8_f64.powf(1.0 / 0.87);
        assert_relative_eq!(plan.f80.get::<millimeter>(), f80, max_relative = 1e-9);
        assert_relative_eq!(plan.target_p80.get::<millimeter>(), target, max_relative = 1e-9);

        let families: Vec<_> = plan.stages.iter().map(|s| s.family).collect();
        assert_eq!(
            families,
            [CrusherFamily::Jaw, CrusherFamily::Cone, CrusherFamily::Cone]
        );

        // Jaw by 3, cone by 4 (a reduction by 6 would not reach the target),
        // then straight to the target.
        assert_relative_eq!(css_mm(&plan.stages[0]), f80 / 3.0, max_relative = 1e-9);
        assert_relative_eq!(css_mm(&plan.stages[1]), f80 / 12.0, max_relative = 1e-9);
        assert_relative_eq!(css_mm(&plan.stages[2]), target, max_relative = 1e-9);
    }

    #[test]
    fn flowsheet_is_a_named_chain() {
        let fs = auto_design(&feed(), mm(10.0)).expect("feed is coarse");

        let names: Vec<_> = fs.nodes().map(|n| n.name.as_str()).collect();
        assert_eq!(
            names,
            ["Feed", "Primary (jaw)", "Stage 2 (cone)", "Stage 3 (cone)", "Product"]
        );

        let ids: Vec<_> = fs.nodes().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["feed", "stage-1", "stage-2", "stage-3", "product"]);

        for pair in ids.windows(2) {
            let (source, target) = (NodeId::from(pair[0]), NodeId::from(pair[1]));
            assert_eq!(
                fs.inbound(&target).map(|e| &e.source).collect::<Vec<_>>(),
                [&source]
            );
        }
    }

    #[test]
    fn stage_count_is_capped() {
        // A tiny target needs many stages. Only five are allowed.
        let plan = plan(&feed(), mm(0.01), &DesignConfig::default()).unwrap();
        assert_eq!(plan.stages.len(), 5);
        assert!(css_mm(&plan.stages[4]) > plan.target_p80.get::<millimeter>());

        let config = DesignConfig {
            max_stages: 2,
            ..DesignConfig::default()
        };
        assert_eq!(super::plan(&feed(), mm(0.01), &config).unwrap().stages.len(), 2);
    }

    #[test]
    fn single_jaw_can_finish() {
        // F80/3 ≈ 64.8 mm is already below the target P80 ≈ 77.4 mm.
        let plan = plan(&feed(), mm(100.0), &DesignConfig::default()).unwrap();
        assert_eq!(plan.stages.len(), 1);
        assert_eq!(plan.stages[0].family, CrusherFamily::Jaw);
    }

    #[test]
    fn feed_finer_than_target() {
        let err = plan(&feed(), mm(400.0), &DesignConfig::default()).unwrap_err();
        assert!(matches!(err, DesignError::FeedFinerThanTarget { .. }));
    }

    #[test]
    fn invalid_inputs() {
        let sparse = SizeDistribution::from_rows([(100.0, 100.0)]);
        assert_eq!(
            auto_design(&sparse, mm(10.0)),
            Err(DesignError::InsufficientFeedPoints { points: 1 })
        );
        assert_eq!(
            auto_design(&feed(), mm(0.0)),
            Err(DesignError::InvalidTarget(ConstraintError::Zero))
        );

        let config = DesignConfig {
            secondary_reduction: -1.0,
            ..DesignConfig::default()
        };
        assert_eq!(
            auto_design_with(&feed(), mm(10.0), &config),
            Err(DesignError::InvalidConfig {
                field: "secondary_reduction",
                source: ConstraintError::Negative
            })
        );
    }

    #[test]
    fn config_parses_with_defaults() {
        let config: DesignConfig =
            serde_json::from_str(r#"{ "max_stages": 3 }"#).expect("partial config");
        assert_eq!(config.max_stages, 3);
        assert_eq!(config.primary_reduction, 3.0);
    }
}
