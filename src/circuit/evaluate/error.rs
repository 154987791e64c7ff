use thiserror::Error;

use crate::{
    circuit::flowsheet::NodeId, models::comminution::crusher::CrusherError,
    support::constraint::ConstraintError,
};

/// Errors that stop an evaluation before any result is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum EvaluationError {
    #[error("feed distribution needs at least 2 valid points, got {points}")]
    InsufficientFeedPoints { points: usize },

    /// The walk could not reach every node.
    #[error("flowsheet has a cycle or an unreachable component: {unvisited:?}")]
    CycleOrUnreachable { unvisited: Vec<NodeId> },

    #[error("node `{node}` cannot be modelled: {source}")]
    InvalidUnit {
        node: NodeId,
        source: ConstraintError,
    },
}

/// Why a node produced no result.
///
/// Skipping is local: the node and everything fed only through it are left
/// without results, and the rest of the pass continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("no stream reaches the node")]
    NoInboundStream,

    #[error("upstream node `{0}` was skipped")]
    UpstreamSkipped(NodeId),

    #[error(transparent)]
    Crusher(#[from] CrusherError),
}
