//! Ability definitions and the effect seam.
//!
//! An [`Ability`] is immutable once validated and shared read-only by every
//! actor. Its behaviour lives behind [`AbilityEffect`], which the runtime
//! binds to a level and trigger when an activation passes every gate.

use std::collections::HashSet;

use crate::error::ConfigError;
use crate::ids::{AbilityId, ActorId, ZoneId};
use crate::sound::SoundId;
use crate::trigger::TriggerEvent;

/// Raw registration record, as written in a catalog file.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilitySpec {
    pub id: String,
    /// Name substituted for `%name%` in notices. Defaults to the id.
    #[cfg_attr(feature = "serde", serde(default))]
    pub display_name: Option<String>,
    pub cooldown_seconds: i64,
    pub activation_sound: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub requires_target: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub disabled_zones: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default = "AbilitySpec::default_min_level"))]
    pub min_level: u32,
}

impl AbilitySpec {
    pub const fn default_min_level() -> u32 {
        1
    }

    pub fn new(
        id: impl Into<String>,
        cooldown_seconds: i64,
        activation_sound: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: None,
            cooldown_seconds,
            activation_sound: activation_sound.into(),
            requires_target: false,
            disabled_zones: Vec::new(),
            min_level: Self::default_min_level(),
        }
    }
}

/// A validated, immutable ability definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ability {
    id: AbilityId,
    display_name: String,
    cooldown_base_seconds: u32,
    activation_sound: SoundId,
    requires_secondary_target: bool,
    disabled_zones: HashSet<ZoneId>,
    min_level: u32,
}

impl Ability {
    /// Validates a registration record.
    pub fn from_spec(spec: AbilitySpec) -> Result<Self, ConfigError> {
        let id = spec.id.trim();
        if id.is_empty() {
            return Err(ConfigError::EmptyAbilityId);
        }

        if spec.cooldown_seconds < 0 {
            return Err(ConfigError::NegativeCooldown {
                ability: id.to_string(),
                seconds: spec.cooldown_seconds,
            });
        }
        let cooldown_base_seconds =
            u32::try_from(spec.cooldown_seconds).map_err(|_| ConfigError::CooldownTooLong {
                ability: id.to_string(),
                seconds: spec.cooldown_seconds,
            })?;

        if spec.min_level == 0 {
            return Err(ConfigError::ZeroMinLevel {
                ability: id.to_string(),
            });
        }

        let activation_sound = SoundId::parse(&spec.activation_sound)?;

        Ok(Self {
            id: AbilityId::new(id),
            display_name: spec.display_name.unwrap_or_else(|| id.to_string()),
            cooldown_base_seconds,
            activation_sound,
            requires_secondary_target: spec.requires_target,
            disabled_zones: spec.disabled_zones.into_iter().map(ZoneId::new).collect(),
            min_level: spec.min_level,
        })
    }

    pub fn id(&self) -> &AbilityId {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn cooldown_base_seconds(&self) -> u32 {
        self.cooldown_base_seconds
    }

    pub fn activation_sound(&self) -> &SoundId {
        &self.activation_sound
    }

    pub fn requires_secondary_target(&self) -> bool {
        self.requires_secondary_target
    }

    pub fn min_level(&self) -> u32 {
        self.min_level
    }

    pub fn is_disabled_in(&self, zone: &ZoneId) -> bool {
        self.disabled_zones.contains(zone)
    }
}

/// Ability-specific behaviour run on a successful activation.
///
/// Implementations must not assume they run on any particular thread.
pub trait AbilityEffect: Send + Sync {
    fn on_activate(&self, actor: ActorId, level: u32, event: &TriggerEvent);
}

impl<F> AbilityEffect for F
where
    F: Fn(ActorId, u32, &TriggerEvent) + Send + Sync,
{
    fn on_activate(&self, actor: ActorId, level: u32, event: &TriggerEvent) {
        self(actor, level, event)
    }
}
