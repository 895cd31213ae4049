//! Single-shot execution slot for one (actor, ability) pair.
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use ability_core::{AbilityId, ActorId};
use parking_lot::Mutex;

type Task = Arc<dyn Fn() + Send + Sync>;

/// Holds the effect to run for one actor's ability session and the end time
/// of its most recent cooldown.
///
/// Created on first trigger or cooldown query and reused for the rest of the
/// process (or until the actor is forgotten).
pub struct ActivationRunnable {
    actor: ActorId,
    ability: AbilityId,
    task: Mutex<Option<Task>>,
    end_time_millis: AtomicI64,
    runs: AtomicU64,
}

impl ActivationRunnable {
    pub fn new(actor: ActorId, ability: AbilityId) -> Self {
        Self {
            actor,
            ability,
            task: Mutex::new(None),
            end_time_millis: AtomicI64::new(0),
            runs: AtomicU64::new(0),
        }
    }

    pub fn actor(&self) -> ActorId {
        self.actor
    }

    pub fn ability(&self) -> &AbilityId {
        &self.ability
    }

    /// Replaces the pending effect without running it.
    pub fn set_task(&self, effect: impl Fn() + Send + Sync + 'static) {
        *self.task.lock() = Some(Arc::new(effect));
    }

    /// Runs the current effect once. Returns `false` if none was set.
    ///
    /// The lock is released before the effect runs, so an effect may
    /// re-enter the controller.
    pub fn run(&self) -> bool {
        let Some(task) = self.task.lock().clone() else {
            return false;
        };
        task();
        self.runs.fetch_add(1, Ordering::Relaxed);
        true
    }

    /// End time of the cooldown started by the latest activation.
    pub fn end_time(&self) -> i64 {
        self.end_time_millis.load(Ordering::Acquire)
    }

    pub(crate) fn set_end_time(&self, end_time_millis: i64) {
        self.end_time_millis.store(end_time_millis, Ordering::Release);
    }

    /// Number of completed `run` calls.
    pub fn run_count(&self) -> u64 {
        self.runs.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for ActivationRunnable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivationRunnable")
            .field("actor", &self.actor)
            .field("ability", &self.ability)
            .field("end_time_millis", &self.end_time())
            .field("runs", &self.run_count())
            .finish_non_exhaustive()
    }
}
