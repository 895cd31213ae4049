//! Cooldown arithmetic and permission-derived multipliers.
//!
//! Time is epoch milliseconds throughout; whole seconds only appear at the
//! edges (configured base cooldowns and remaining-time reports).

use crate::env::PermissionOracle;
use crate::error::ConfigError;
use crate::ids::ActorId;

/// Whole seconds left until `end_millis`, rounded up and never negative.
pub fn remaining_seconds(end_millis: i64, now_millis: i64) -> u32 {
    let left = end_millis.saturating_sub(now_millis);
    if left <= 0 {
        return 0;
    }
    let seconds = left.div_euclid(1000) + i64::from(left.rem_euclid(1000) != 0);
    u32::try_from(seconds).unwrap_or(u32::MAX)
}

/// Converts a (possibly fractional) duration to milliseconds.
///
/// Negative and non-finite durations collapse to zero.
pub fn duration_millis(duration_seconds: f64) -> i64 {
    if !duration_seconds.is_finite() || duration_seconds <= 0.0 {
        return 0;
    }
    (duration_seconds * 1000.0).round() as i64
}

/// One permission-gated discount. The multiplier is always in `(0, 1]`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "TierRecord"))]
pub struct CooldownTier {
    permission: String,
    multiplier: f64,
}

impl CooldownTier {
    pub fn new(permission: impl Into<String>, multiplier: f64) -> Result<Self, ConfigError> {
        let permission = permission.into();
        if !(multiplier > 0.0 && multiplier <= 1.0) {
            return Err(ConfigError::InvalidMultiplier {
                permission,
                multiplier,
            });
        }
        Ok(Self {
            permission,
            multiplier,
        })
    }

    fn stock(permission: &str, multiplier: f64) -> Self {
        Self {
            permission: permission.to_string(),
            multiplier,
        }
    }

    pub fn permission(&self) -> &str {
        &self.permission
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }
}

/// Unvalidated tier as written in a catalog.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct TierRecord {
    permission: String,
    multiplier: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<TierRecord> for CooldownTier {
    type Error = ConfigError;

    fn try_from(record: TierRecord) -> Result<Self, Self::Error> {
        Self::new(record.permission, record.multiplier)
    }
}

/// Ordered discount tiers; the first tier an actor holds wins.
///
/// Order is precedence, not magnitude. The default table lists the most
/// generous discount first so an actor holding several tiers gets the
/// smallest multiplier.
#[derive(Clone, Debug, PartialEq)]
pub struct TierTable {
    tiers: Vec<CooldownTier>,
}

impl TierTable {
    pub const QUARTER: &'static str = "abilities.cooldowntime.quarter";
    pub const THIRD: &'static str = "abilities.cooldowntime.third";
    pub const HALF: &'static str = "abilities.cooldowntime.half";
    pub const THREE_QUARTERS: &'static str = "abilities.cooldowntime.75";

    /// Multiplier for actors that hold no tier.
    pub const BASE_MULTIPLIER: f64 = 1.0;

    pub fn new(tiers: Vec<CooldownTier>) -> Self {
        Self { tiers }
    }

    pub fn tiers(&self) -> &[CooldownTier] {
        &self.tiers
    }

    /// Resolves the multiplier for `actor`, short-circuiting on the first
    /// held tier.
    pub fn resolve(&self, permissions: &dyn PermissionOracle, actor: ActorId) -> f64 {
        self.tiers
            .iter()
            .find(|tier| permissions.has_permission(actor, &tier.permission))
            .map_or(Self::BASE_MULTIPLIER, |tier| tier.multiplier)
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self::new(vec![
            CooldownTier::stock(Self::QUARTER, 0.25),
            CooldownTier::stock(Self::THIRD, 0.33),
            CooldownTier::stock(Self::HALF, 0.5),
            CooldownTier::stock(Self::THREE_QUARTERS, 0.75),
        ])
    }
}

/// Standard cooldown policy: quarter, then third, then half, then 75%.
pub fn cooldown_multiplier(permissions: &dyn PermissionOracle, actor: ActorId) -> f64 {
    TierTable::default().resolve(permissions, actor)
}
