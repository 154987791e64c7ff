//! A flowsheet with its cached evaluation.
//!
//! Changing a crusher CSS or a screen aperture invalidates that node and
//! everything downstream of it. The next [`Circuit::evaluate`] re-runs only
//! those nodes, in topological order. Any other edit invalidates the whole
//! cache.

use std::collections::BTreeSet;

use thiserror::Error;
use tracing::debug;
use uom::si::f64::Length;

use crate::support::psd::SizeDistribution;

use super::{
    evaluate::{Evaluation, EvaluationError, Previous, run_pass},
    flowsheet::{Flowsheet, FlowsheetError, NodeId},
    plant::PlantParameters,
};

/// Errors raised by [`Circuit`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CircuitError {
    #[error(transparent)]
    Flowsheet(#[from] FlowsheetError),

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

/// A flowsheet, its feed and plant parameters, and the latest evaluation.
#[derive(Debug, Clone)]
pub struct Circuit {
    flowsheet: Flowsheet,
    feed: SizeDistribution,
    plant: PlantParameters,
    evaluation: Option<Evaluation>,

    /// Nodes whose cached result is out of date.
    stale: BTreeSet<NodeId>,
}

impl Circuit {
    #[must_use]
    pub fn new(flowsheet: Flowsheet, feed: SizeDistribution, plant: PlantParameters) -> Self {
        Self {
            flowsheet,
            feed,
            plant,
            evaluation: None,
            stale: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn flowsheet(&self) -> &Flowsheet {
        &self.flowsheet
    }

    #[must_use]
    pub fn feed(&self) -> &SizeDistribution {
        &self.feed
    }

    #[must_use]
    pub fn plant(&self) -> &PlantParameters {
        &self.plant
    }

    /// The latest evaluation, if one exists and nothing was edited since.
    #[must_use]
    pub fn evaluation(&self) -> Option<&Evaluation> {
        self.evaluation.as_ref().filter(|_| self.stale.is_empty())
    }

    /// Nodes that the next [`Circuit::evaluate`] will re-run.
    ///
    /// Empty before the first evaluation, when everything will run.
    #[must_use]
    pub fn stale(&self) -> &BTreeSet<NodeId> {
        &self.stale
    }

    /// Changes a crusher CSS or a screen aperture.
    ///
    /// Invalidates the node and its descendants.
    ///
    /// # Errors
    ///
    /// Returns a [`CircuitError::Flowsheet`] if the node is unknown, has no
    /// setting, or the value is not strictly positive. The cache is left
    /// untouched in that case.
    pub fn set_setting(&mut self, id: &NodeId, setting: Length) -> Result<(), CircuitError> {
        self.flowsheet.set_setting(id, setting)?;
        if self.evaluation.is_some() {
            let downstream = self.flowsheet.downstream(id);
            debug!(node = %id, invalidated = downstream.len(), "setting changed");
            self.stale.extend(downstream);
        }
        Ok(())
    }

    /// Edits the flowsheet graph and drops the cached evaluation.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `edit`. The cache is dropped either way.
    pub fn edit_flowsheet<T>(
        &mut self,
        edit: impl FnOnce(&mut Flowsheet) -> Result<T, FlowsheetError>,
    ) -> Result<T, CircuitError> {
        self.invalidate();
        Ok(edit(&mut self.flowsheet)?)
    }

    /// Replaces the initial feed and drops the cached evaluation.
    pub fn set_feed(&mut self, feed: SizeDistribution) {
        self.feed = feed;
        self.invalidate();
    }

    /// Replaces the plant parameters and drops the cached evaluation.
    pub fn set_plant(&mut self, plant: PlantParameters) {
        self.plant = plant;
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.evaluation = None;
        self.stale.clear();
    }

    /// Brings the cached evaluation up to date.
    ///
    /// Runs the whole flowsheet if there is no cache, otherwise only the
    /// stale nodes. Returns the ids that were run, in the order they ran.
    ///
    /// # Errors
    ///
    /// Returns [`CircuitError::Evaluation`] if the pass fails. The previous
    /// cache and stale set are kept.
    pub fn evaluate(&mut self) -> Result<Vec<NodeId>, CircuitError> {
        let evaluation = match &self.evaluation {
            Some(_) if self.stale.is_empty() => return Ok(Vec::new()),
            Some(previous) => run_pass(
                &self.flowsheet,
                &self.feed,
                &self.plant,
                Some(Previous {
                    evaluation: previous,
                    stale: &self.stale,
                }),
            )?,
            None => run_pass(&self.flowsheet, &self.feed, &self.plant, None)?,
        };

        let visited = evaluation.visited().to_vec();
        self.evaluation = Some(evaluation);
        self.stale.clear();
        Ok(visited)
    }
}
