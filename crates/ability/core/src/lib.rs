//! Pure activation rules and data types for triggered abilities.
//!
//! `ability-core` defines what an ability is, what a trigger looks like, and
//! which structural gates a trigger must pass. It holds no timers and no
//! shared state; the stateful engine lives in `ability-runtime`, which
//! depends on the types re-exported here.
pub mod ability;
pub mod clock;
pub mod cooldown;
pub mod env;
pub mod error;
pub mod gate;
pub mod ids;
pub mod message;
pub mod sound;
pub mod trigger;

pub use ability::{Ability, AbilityEffect, AbilitySpec};
pub use clock::{Clock, ManualClock, SystemClock};
pub use cooldown::{
    CooldownTier, TierTable, cooldown_multiplier, duration_millis, remaining_seconds,
};
pub use env::{NoPermissions, PermissionOracle};
pub use error::ConfigError;
pub use gate::{GateRejection, GateRules};
pub use ids::{AbilityId, ActorId, ZoneId};
pub use message::MessageTemplates;
pub use sound::{SoundCategory, SoundId, SoundProfile, SoundRequest};
pub use trigger::{
    ActionKind, ElementKind, ItemFacts, TargetedElement, TriggerClass, TriggerEvent,
};
