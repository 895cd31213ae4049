//! Event types for different topics.

use ability_core::{AbilityId, ActorId, SoundRequest};
use serde::{Deserialize, Serialize};

/// Gate-evaluation results that reached the cooldown check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActivationEvent {
    /// Ability fired and a new cooldown started.
    Activated {
        actor: ActorId,
        ability: AbilityId,
        level: u32,
        cooldown_seconds: f64,
        ends_at_millis: i64,
    },

    /// Ability is still cooling down.
    Denied {
        actor: ActorId,
        ability: AbilityId,
        remaining_seconds: u32,
    },
}

/// Player-facing output for the host to deliver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeedbackEvent {
    /// Formatted chat notice.
    Notice { actor: ActorId, text: String },

    /// Sound to play at the actor's location.
    Sound(SoundRequest),
}
