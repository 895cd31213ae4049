//! Short-lived suppression window that collapses duplicate triggers.
//!
//! A single physical interaction may reach the host as several raw events.
//! The first one enters the actor into the guard; every other trigger for
//! that actor is dropped until a deferred removal clears the membership.
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use ability_core::ActorId;
use tracing::trace;

use crate::scheduler::Scheduler;
use crate::store::ShardedMap;

struct Members {
    // Value is the generation that admitted the actor; an expiry only
    // removes the membership it was scheduled for.
    actors: ShardedMap<ActorId, u64>,
    next_generation: AtomicU64,
}

/// Per-ability set of actors inside the debounce window.
pub struct ReentrancyGuard {
    members: Arc<Members>,
    window: Duration,
    scheduler: Arc<dyn Scheduler>,
}

impl ReentrancyGuard {
    pub fn new(window: Duration, scheduler: Arc<dyn Scheduler>, shards: usize) -> Self {
        Self {
            members: Arc::new(Members {
                actors: ShardedMap::new(shards),
                next_generation: AtomicU64::new(0),
            }),
            window,
            scheduler,
        }
    }

    /// Admits `actor` unless it is already inside the window.
    ///
    /// On admission an expiry is scheduled `window` from now.
    pub fn try_enter(&self, actor: ActorId) -> bool {
        let generation = self.members.next_generation.fetch_add(1, Ordering::Relaxed);
        if !self.members.actors.try_insert(actor, generation) {
            return false;
        }

        let members: Weak<Members> = Arc::downgrade(&self.members);
        self.scheduler.run_later(
            self.window,
            Box::new(move || {
                // Guard dropped or actor released early: nothing to do.
                let Some(members) = members.upgrade() else {
                    return;
                };
                if members.actors.remove_if(&actor, |admitted| *admitted == generation) {
                    trace!(%actor, "reentrancy window expired");
                }
            }),
        );

        true
    }

    pub fn contains(&self, actor: ActorId) -> bool {
        self.members.actors.contains_key(&actor)
    }

    /// Drops `actor` immediately. A pending expiry becomes a no-op.
    pub fn release(&self, actor: ActorId) {
        self.members.actors.remove(&actor);
    }

    pub fn len(&self) -> usize {
        self.members.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.actors.is_empty()
    }
}
