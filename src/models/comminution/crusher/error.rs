use thiserror::Error;

/// Errors that stop a crusher from producing a result.
///
/// These are branch-level failures: the circuit evaluator skips the crusher
/// and everything downstream of it, and carries on with the rest of the
/// flowsheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CrusherError {
    /// The feed F80 cannot be interpolated because the feed curve has too few points.
    #[error("feed F80 is undefined: feed curve has {points} point(s), at least 2 are required")]
    UndefinedFeedSize { points: usize },
}
