//! Result of evaluating one trigger against one ability.
use ability_core::GateRejection;
use serde::{Deserialize, Serialize};

/// How a trigger ended.
///
/// Only `Denied` and `Activated` produce player-facing feedback; the other
/// two are silent no-ops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ActivationOutcome {
    /// Actor was already inside the reentrancy window.
    Suppressed,

    /// A structural gate failed.
    Rejected { reason: GateRejection },

    /// Ability is still cooling down.
    Denied { remaining_seconds: u32 },

    /// Effect ran and a new cooldown started.
    Activated {
        level: u32,
        cooldown_seconds: f64,
        ends_at_millis: i64,
    },
}

impl ActivationOutcome {
    pub fn is_activated(&self) -> bool {
        matches!(self, Self::Activated { .. })
    }

    /// Whether the trigger reached the cooldown check.
    pub fn reached_cooldown_gate(&self) -> bool {
        matches!(self, Self::Denied { .. } | Self::Activated { .. })
    }
}
