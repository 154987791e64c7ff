//! Crushing circuits built from the comminution models.
//!
//! A [`Flowsheet`] is a directed graph of feed, crusher, screen and product
//! nodes joined port to port. [`evaluate`] propagates the plant feed through
//! it in topological order, producing one [`StageResult`] per node. A
//! [`Circuit`] keeps the latest evaluation and re-runs only what a setting
//! change affects.
//!
//! [`auto_design`] proposes a linear jaw and cone chain for a target product
//! size, and [`report`] turns an evaluation into fixed-precision tables.

mod design;
mod evaluate;
mod flowsheet;
mod plant;
pub mod report;
mod session;

pub use design::{
    DesignConfig, DesignError, DesignPlan, PlannedStage, auto_design, auto_design_with, plan,
};
pub use evaluate::{
    CircuitType, CrusherDuty, Duty, Evaluation, EvaluationError, ScreenDuty, SkipReason,
    StageResult, evaluate,
};
pub use flowsheet::{
    Edge, Flowsheet, FlowsheetError, Node, NodeId, NodeKind, PortDirection, PortId,
};
pub use plant::{PlantInputs, PlantParameters, PlantParametersError};
pub use session::{Circuit, CircuitError};
