//! Structural activation gates.
//!
//! These are the side-effect-free checks that sit between the reentrancy
//! gate and the cooldown gate. They run in a fixed order and stop at the
//! first failure:
//!
//! 1. motion matches the item's trigger class
//! 2. a world element is targeted when the ability needs one
//! 3. the active item carries the ability at a sufficient level
//! 4. the actor's zone is not disabled for the ability
//! 5. the targeted element is not reserved for another interaction
//!
//! A rejection here is a normal outcome, not an error: the controller drops
//! the trigger silently.

use std::collections::HashSet;

use crate::ability::Ability;
use crate::ids::ZoneId;
use crate::trigger::{ActionKind, ElementKind, TriggerClass, TriggerEvent};

/// Why a trigger failed a structural gate.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum GateRejection {
    #[error("expected {expected} motion, got {actual}")]
    WrongAction {
        expected: ActionKind,
        actual: ActionKind,
    },

    #[error("ability needs a targeted world element")]
    MissingTarget,

    #[error("active item does not carry the ability")]
    AbilityAbsent,

    #[error("ability level {actual} below required {required}")]
    InsufficientLevel { required: u32, actual: u32 },

    #[error("ability disabled in zone {0}")]
    DisabledZone(ZoneId),

    #[error("{0} is reserved for its own interaction")]
    ReservedTarget(ElementKind),
}

/// Host-tunable inputs to the structural gates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GateRules {
    secondary_items: HashSet<String>,
}

impl GateRules {
    /// Item types that fire abilities on strike rather than engage.
    pub const DEFAULT_SECONDARY_ITEMS: [&'static str; 2] = ["bow", "fishing_rod"];

    pub fn new<I, S>(secondary_items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            secondary_items: secondary_items
                .into_iter()
                .map(|item| item.as_ref().trim().to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn classify(&self, item_type: &str) -> TriggerClass {
        if self
            .secondary_items
            .contains(&item_type.trim().to_ascii_lowercase())
        {
            TriggerClass::Secondary
        } else {
            TriggerClass::Primary
        }
    }

    /// Runs the structural gates in order and returns the resolved ability
    /// level on success.
    pub fn evaluate(&self, ability: &Ability, event: &TriggerEvent) -> Result<u32, GateRejection> {
        let expected = self.classify(&event.item.item_type).required_action();
        if event.action != expected {
            return Err(GateRejection::WrongAction {
                expected,
                actual: event.action,
            });
        }

        if ability.requires_secondary_target() && event.target.is_none() {
            return Err(GateRejection::MissingTarget);
        }

        let level = event
            .item
            .level_of(ability.id())
            .ok_or(GateRejection::AbilityAbsent)?;
        if level < ability.min_level() {
            return Err(GateRejection::InsufficientLevel {
                required: ability.min_level(),
                actual: level,
            });
        }

        if ability.is_disabled_in(&event.zone) {
            return Err(GateRejection::DisabledZone(event.zone.clone()));
        }

        if let Some(target) = event.target
            && target.kind.is_reserved()
        {
            return Err(GateRejection::ReservedTarget(target.kind));
        }

        Ok(level)
    }
}

impl Default for GateRules {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SECONDARY_ITEMS)
    }
}
