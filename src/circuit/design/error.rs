use thiserror::Error;
use uom::si::{f64::Length, length::millimeter};

use crate::{circuit::flowsheet::FlowsheetError, support::constraint::ConstraintError};

/// Why no circuit could be designed.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum DesignError {
    #[error("feed distribution needs at least 2 valid points, got {points}")]
    InsufficientFeedPoints { points: usize },

    #[error("feed F80 cannot be interpolated")]
    UndefinedFeedSize,

    #[error("invalid target top size: {0}")]
    InvalidTarget(ConstraintError),

    #[error("invalid design setting `{field}`: {source}")]
    InvalidConfig {
        field: &'static str,
        source: ConstraintError,
    },

    /// The feed is already at or below the target P80.
    #[error(
        "feed F80 ({:.2} mm) is already at or below the target P80 ({:.2} mm)",
        .f80.get::<millimeter>(),
        .target_p80.get::<millimeter>()
    )]
    FeedFinerThanTarget { f80: Length, target_p80: Length },

    #[error("stage {stage} has an invalid setting: {source}")]
    InvalidStage {
        stage: usize,
        source: ConstraintError,
    },

    #[error(transparent)]
    Flowsheet(#[from] FlowsheetError),
}
