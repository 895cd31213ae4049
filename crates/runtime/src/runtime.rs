//! Shared per-actor state for every registered ability.
//!
//! [`AbilityRuntime`] owns the cooldown entries and the runnable slots. It
//! never references abilities themselves; effects are supplied by the
//! controller at activation time.
use std::sync::Arc;

use ability_core::{AbilityId, ActorId, Clock, TierTable};

use crate::cooldown::CooldownTracker;
use crate::runnable::ActivationRunnable;
use crate::store::ShardedMap;

pub struct AbilityRuntime {
    cooldowns: CooldownTracker,
    runnables: ShardedMap<(ActorId, AbilityId), Arc<ActivationRunnable>>,
}

impl AbilityRuntime {
    pub fn new(clock: Arc<dyn Clock>, tiers: TierTable, shards: usize) -> Self {
        Self {
            cooldowns: CooldownTracker::new(clock, tiers, shards),
            runnables: ShardedMap::new(shards),
        }
    }

    pub fn cooldowns(&self) -> &CooldownTracker {
        &self.cooldowns
    }

    /// Runnable slot for the pair, created on first use.
    pub fn runnable(&self, actor: ActorId, ability: &AbilityId) -> Arc<ActivationRunnable> {
        self.runnables
            .get_or_insert_with((actor, ability.clone()), || {
                Arc::new(ActivationRunnable::new(actor, ability.clone()))
            })
    }

    pub fn existing_runnable(
        &self,
        actor: ActorId,
        ability: &AbilityId,
    ) -> Option<Arc<ActivationRunnable>> {
        self.runnables.get(&(actor, ability.clone()))
    }

    /// Drops all cooldowns and runnables belonging to `actor`.
    pub fn forget_actor(&self, actor: ActorId) {
        self.cooldowns.forget_actor(actor);
        self.runnables.retain(|(owner, _), _| *owner != actor);
    }
}

#[cfg(test)]
mod tests {
    use ability_core::ManualClock;

    use super::*;

    #[test]
    fn runnable_is_reused() {
        let runtime = AbilityRuntime::new(Arc::new(ManualClock::new(0)), TierTable::default(), 2);
        let blink = AbilityId::from("blink");

        let first = runtime.runnable(ActorId(1), &blink);
        let second = runtime.runnable(ActorId(1), &blink);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(runtime.existing_runnable(ActorId(2), &blink).is_none());
    }

    #[test]
    fn forget_actor_clears_everything() {
        let runtime = AbilityRuntime::new(Arc::new(ManualClock::new(0)), TierTable::default(), 2);
        let blink = AbilityId::from("blink");

        runtime.runnable(ActorId(1), &blink);
        runtime.cooldowns().start(ActorId(1), &blink, 10.0);
        runtime.forget_actor(ActorId(1));

        assert!(runtime.existing_runnable(ActorId(1), &blink).is_none());
        assert!(!runtime.cooldowns().has_entry(ActorId(1), &blink));
    }
}
