use serde::{Deserialize, Serialize};

/// Tuning of the auto-design heuristic.
///
/// The defaults are the usual rules of thumb for a jaw followed by cones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignConfig {
    /// Hard cap on the number of crushing stages.
    pub max_stages: usize,

    /// `F80 / P80` of the primary jaw.
    pub primary_reduction: f64,

    /// `F80 / P80` of an intermediate cone stage.
    pub secondary_reduction: f64,

    /// A cone stage finishes the circuit when `F80 / final_stage_reach`
    /// already reaches the target P80.
    pub final_stage_reach: f64,

    /// Shape exponent linking the target P100 to the target P80.
    pub target_shape_exponent: f64,
}

impl Default for DesignConfig {
    fn default() -> Self {
        Self {
            max_stages: 5,
            primary_reduction: 3.0,
            secondary_reduction: 4.0,
            final_stage_reach: 6.0,
            target_shape_exponent: 0.87,
        }
    }
}
