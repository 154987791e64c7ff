use thiserror::Error;

use crate::support::constraint::ConstraintError;

use super::{NodeId, PortDirection, PortId};

/// Errors raised while building or editing a flowsheet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum FlowsheetError {
    #[error("node `{0}` already exists")]
    DuplicateNode(NodeId),

    #[error("no node with id `{0}`")]
    UnknownNode(NodeId),

    #[error("node `{node}` has no `{port}` port")]
    UnknownPort { node: NodeId, port: PortId },

    #[error("port `{port}` on node `{node}` does not face {expected:?}")]
    WrongDirection {
        node: NodeId,
        port: PortId,
        expected: PortDirection,
    },

    #[error("port `{port}` on node `{node}` already receives a stream")]
    InletOccupied { node: NodeId, port: PortId },

    #[error("nothing feeds port `{port}` on node `{node}`")]
    NotConnected { node: NodeId, port: PortId },

    #[error("node `{0}` has no adjustable setting")]
    NoSetting(NodeId),

    #[error("invalid setting for node `{node}`: {source}")]
    InvalidSetting {
        node: NodeId,
        source: ConstraintError,
    },
}
