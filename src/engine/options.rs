use serde::{Deserialize, Serialize};

use super::scorer::ScoringMode;

/// Whether each appliance reports one start or a ranked list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    #[default]
    Single,
    Ranked,
}

/// How an already placed appliance constrains the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sequencing {
    /// The next appliance may only start once the previous cycle has ended.
    #[default]
    AfterPrevious,
    /// The next appliance is scored against production minus earlier draws.
    Residual,
}

/// What to do when a cycle cannot fit inside its preferred hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowFallback {
    /// Search the whole day instead.
    #[default]
    FullDay,
    /// Report no feasible window.
    NoResult,
}

/// Per-request scheduling policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineOptions {
    /// Alignment measure used to rank windows.
    pub mode: ScoringMode,
    /// Discard windows with no positive production at all.
    pub require_production: bool,
    /// Single best start or ranked list.
    pub output: OutputMode,
    /// Maximum ranked entries per appliance; unlimited when unset.
    pub top_n: Option<usize>,
    /// Multi-appliance sequencing strategy.
    pub sequencing: Sequencing,
    /// Behavior when the preferred hours cannot hold the cycle.
    pub fallback: WindowFallback,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            mode: ScoringMode::Closeness,
            require_production: true,
            output: OutputMode::Single,
            top_n: None,
            sequencing: Sequencing::AfterPrevious,
            fallback: WindowFallback::FullDay,
        }
    }
}
