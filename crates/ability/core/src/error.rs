//! Registration-time configuration errors.
//!
//! These are the only hard failures in `ability-core`. They surface while an
//! ability catalog is validated at startup; nothing in the steady-state
//! trigger path produces them.

/// An ability, sound, or tier definition that cannot be accepted.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Ability key is empty or whitespace.
    #[error("ability id must not be empty")]
    EmptyAbilityId,

    /// Cooldown below zero.
    #[error("ability `{ability}` has negative cooldown {seconds}s")]
    NegativeCooldown { ability: String, seconds: i64 },

    /// Cooldown too long to store as whole seconds.
    #[error("ability `{ability}` cooldown {seconds}s exceeds 4294967295s")]
    CooldownTooLong { ability: String, seconds: i64 },

    /// Sound identifier is empty or contains unsupported characters.
    #[error("unparseable sound identifier `{raw}`")]
    InvalidSound { raw: String },

    /// Tier multiplier outside `(0, 1]`.
    #[error("permission tier `{permission}` has multiplier {multiplier} outside (0, 1]")]
    InvalidMultiplier { permission: String, multiplier: f64 },

    /// Minimum level of zero would let items without the ability qualify.
    #[error("ability `{ability}` must require at least level 1")]
    ZeroMinLevel { ability: String },
}
