//! Per-actor, per-ability cooldown store.
use std::sync::Arc;

use ability_core::{
    AbilityId, ActorId, Clock, PermissionOracle, TierTable, duration_millis, remaining_seconds,
};

use crate::store::ShardedMap;

/// Snapshot of one stored cooldown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CooldownEntry {
    pub actor: ActorId,
    pub ability: AbilityId,
    pub end_time_millis: i64,
}

/// Tracks when each (actor, ability) pair may fire again.
///
/// Entries are created lazily on first reference with an end time of zero
/// and are never deleted by time passing; a stale entry just reports zero
/// seconds remaining.
pub struct CooldownTracker {
    entries: ShardedMap<(ActorId, AbilityId), i64>,
    tiers: TierTable,
    clock: Arc<dyn Clock>,
}

impl CooldownTracker {
    pub fn new(clock: Arc<dyn Clock>, tiers: TierTable, shards: usize) -> Self {
        Self {
            entries: ShardedMap::new(shards),
            tiers,
            clock,
        }
    }

    /// Whole seconds until `actor` may use `ability` again.
    pub fn remaining(&self, actor: ActorId, ability: &AbilityId) -> u32 {
        let end = self
            .entries
            .get_or_insert_with((actor, ability.clone()), || 0);
        remaining_seconds(end, self.clock.now_millis())
    }

    /// Starts a cooldown of `duration_seconds` from now and returns the
    /// resulting end time.
    ///
    /// An unexpired cooldown is never shortened; negative durations count
    /// as zero.
    pub fn start(&self, actor: ActorId, ability: &AbilityId, duration_seconds: f64) -> i64 {
        let candidate = self
            .clock
            .now_millis()
            .saturating_add(duration_millis(duration_seconds));

        self.entries.update(
            (actor, ability.clone()),
            || 0,
            |end| {
                *end = (*end).max(candidate);
                *end
            },
        )
    }

    /// Starts a cooldown only if none is running, as one step under the
    /// entry's lock.
    ///
    /// Returns the new end time, or the whole seconds still remaining when
    /// the pair is cooling down.
    pub fn try_start(
        &self,
        actor: ActorId,
        ability: &AbilityId,
        duration_seconds: f64,
    ) -> Result<i64, u32> {
        let now = self.clock.now_millis();
        let candidate = now.saturating_add(duration_millis(duration_seconds));

        self.entries.update(
            (actor, ability.clone()),
            || 0,
            |end| match remaining_seconds(*end, now) {
                0 => {
                    *end = (*end).max(candidate);
                    Ok(*end)
                }
                remaining => Err(remaining),
            },
        )
    }

    /// Best (smallest) multiplier `actor` qualifies for.
    pub fn multiplier(&self, permissions: &dyn PermissionOracle, actor: ActorId) -> f64 {
        self.tiers.resolve(permissions, actor)
    }

    pub fn entry(&self, actor: ActorId, ability: &AbilityId) -> Option<CooldownEntry> {
        self.entries
            .get(&(actor, ability.clone()))
            .map(|end_time_millis| CooldownEntry {
                actor,
                ability: ability.clone(),
                end_time_millis,
            })
    }

    pub fn has_entry(&self, actor: ActorId, ability: &AbilityId) -> bool {
        self.entries.contains_key(&(actor, ability.clone()))
    }

    /// Clears a cooldown early. The only way an end time moves backwards.
    pub fn reset(&self, actor: ActorId, ability: &AbilityId) {
        self.entries.remove(&(actor, ability.clone()));
    }

    pub fn forget_actor(&self, actor: ActorId) {
        self.entries.retain(|(owner, _), _| *owner != actor);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
