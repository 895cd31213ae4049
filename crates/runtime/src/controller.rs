//! Activation gating state machine.
//!
//! Each trigger walks `Idle → Debounced → Evaluating → {Denied | Activated}`
//! in one synchronous pass. Gates run in a fixed order and the first
//! failure ends evaluation:
//!
//! 1. reentrancy (silent)
//! 2-6. structural gates from [`GateRules`] (silent)
//! 7. cooldown (notice + denial sound)
//! 8. activation (notice + activation sound, effect, new cooldown)
//!
//! The cooldown gate runs after every structural gate so an actor who could
//! never qualify is not told the ability is cooling down.

use std::sync::Arc;

use ability_core::{
    Ability, AbilityEffect, AbilityId, AbilitySpec, ActorId, Clock, GateRules, MessageTemplates,
    NoPermissions, PermissionOracle, SoundProfile, SystemClock, TierTable, TriggerEvent,
};
use tracing::{debug, debug_span, info, trace};

use crate::api::{AbilityRegistry, ActivationOutcome, RegisteredAbility, Result, RuntimeError};
use crate::config::RuntimeConfig;
use crate::events::{ActivationEvent, Event, EventBus, FeedbackEvent};
use crate::reentrancy::ReentrancyGuard;
use crate::runnable::ActivationRunnable;
use crate::runtime::AbilityRuntime;
use crate::scheduler::{Scheduler, TokioScheduler};

/// Evaluates triggers and runs ability effects.
///
/// All methods take `&self`; share the controller behind an `Arc` to feed it
/// from several connections at once.
pub struct ActivationController {
    registry: AbilityRegistry,
    runtime: AbilityRuntime,
    permissions: Arc<dyn PermissionOracle>,
    rules: GateRules,
    messages: MessageTemplates,
    config: RuntimeConfig,
    bus: EventBus,
}

impl ActivationController {
    /// Create a new controller builder
    pub fn builder() -> ActivationControllerBuilder {
        ActivationControllerBuilder::new()
    }

    /// Evaluates `event` against one ability.
    pub fn trigger(&self, ability: &AbilityId, event: &TriggerEvent) -> Result<ActivationOutcome> {
        let entry = self
            .registry
            .get(ability)
            .ok_or_else(|| RuntimeError::UnknownAbility(ability.clone()))?;
        Ok(self.evaluate(entry, event))
    }

    /// Evaluates `event` against every registered ability, in registration
    /// order. Each ability gates independently.
    pub fn dispatch(&self, event: &TriggerEvent) -> Vec<(AbilityId, ActivationOutcome)> {
        self.registry
            .iter()
            .map(|entry| (entry.ability().id().clone(), self.evaluate(entry, event)))
            .collect()
    }

    fn evaluate(&self, entry: &RegisteredAbility, event: &TriggerEvent) -> ActivationOutcome {
        let ability = entry.ability();
        let actor = event.actor;
        let span = debug_span!("trigger", %actor, ability = %ability.id());
        let _enter = span.enter();

        if !entry.guard().try_enter(actor) {
            trace!("suppressed inside reentrancy window");
            return ActivationOutcome::Suppressed;
        }

        let level = match self.rules.evaluate(ability, event) {
            Ok(level) => level,
            Err(reason) => {
                debug!(%reason, "gate rejected trigger");
                return ActivationOutcome::Rejected { reason };
            }
        };

        let multiplier = self
            .runtime
            .cooldowns()
            .multiplier(self.permissions.as_ref(), actor);
        let cooldown_seconds = f64::from(ability.cooldown_base_seconds()) * multiplier;

        // Commit the cooldown before the effect runs; effects have no timeout
        // and may outlive the reentrancy window.
        match self
            .runtime
            .cooldowns()
            .try_start(actor, ability.id(), cooldown_seconds)
        {
            Err(remaining) => {
                self.deny(ability, actor, remaining);
                ActivationOutcome::Denied {
                    remaining_seconds: remaining,
                }
            }
            Ok(ends_at) => self.activate(entry, event, level, cooldown_seconds, ends_at),
        }
    }

    fn deny(&self, ability: &Ability, actor: ActorId, remaining: u32) {
        debug!(remaining, "ability on cooldown");

        self.bus.publish(Event::Feedback(FeedbackEvent::Notice {
            actor,
            text: self.messages.on_cooldown(remaining, ability.display_name()),
        }));
        self.bus.publish(Event::Feedback(FeedbackEvent::Sound(
            self.config.denial_sound.for_actor(actor),
        )));
        self.bus.publish(Event::Activation(ActivationEvent::Denied {
            actor,
            ability: ability.id().clone(),
            remaining_seconds: remaining,
        }));
    }

    fn activate(
        &self,
        entry: &RegisteredAbility,
        event: &TriggerEvent,
        level: u32,
        cooldown_seconds: f64,
        ends_at_millis: i64,
    ) -> ActivationOutcome {
        let ability = entry.ability();
        let actor = event.actor;

        self.bus.publish(Event::Feedback(FeedbackEvent::Notice {
            actor,
            text: self.messages.used_ability(ability.display_name()),
        }));
        self.bus.publish(Event::Feedback(FeedbackEvent::Sound(
            self.activation_sound(ability).for_actor(actor),
        )));

        let runnable = self.runtime.runnable(actor, ability.id());
        runnable.set_end_time(ends_at_millis);

        let effect = Arc::clone(entry.effect());
        let bound = event.clone();
        runnable.set_task(move || effect.on_activate(actor, level, &bound));
        runnable.run();

        info!(level, cooldown_seconds, "ability activated");

        self.bus.publish(Event::Activation(ActivationEvent::Activated {
            actor,
            ability: ability.id().clone(),
            level,
            cooldown_seconds,
            ends_at_millis,
        }));

        ActivationOutcome::Activated {
            level,
            cooldown_seconds,
            ends_at_millis,
        }
    }

    fn activation_sound(&self, ability: &Ability) -> SoundProfile {
        SoundProfile::new(
            ability.activation_sound().clone(),
            self.config.activation_volume,
            self.config.activation_pitch,
            self.config.activation_category,
        )
    }

    /// Whole seconds until `actor` may use `ability` again.
    ///
    /// Materialises the pair's runnable and cooldown entry on first query.
    pub fn cooldown(&self, actor: ActorId, ability: &AbilityId) -> Result<u32> {
        if self.registry.get(ability).is_none() {
            return Err(RuntimeError::UnknownAbility(ability.clone()));
        }
        self.runtime.runnable(actor, ability);
        Ok(self.runtime.cooldowns().remaining(actor, ability))
    }

    /// Runnable slot for the pair, if one was ever created.
    pub fn runnable(&self, actor: ActorId, ability: &AbilityId) -> Option<Arc<ActivationRunnable>> {
        self.runtime.existing_runnable(actor, ability)
    }

    /// Drops all state held for `actor`, including open reentrancy windows.
    pub fn forget_actor(&self, actor: ActorId) {
        self.runtime.forget_actor(actor);
        for entry in self.registry.iter() {
            entry.guard().release(actor);
        }
        debug!(%actor, "forgot actor");
    }

    pub fn runtime(&self) -> &AbilityRuntime {
        &self.runtime
    }

    /// Bus carrying activation outcomes and player feedback.
    pub fn events(&self) -> &EventBus {
        &self.bus
    }
}

/// Builder for [`ActivationController`] with flexible configuration.
pub struct ActivationControllerBuilder {
    config: RuntimeConfig,
    clock: Option<Arc<dyn Clock>>,
    scheduler: Option<Arc<dyn Scheduler>>,
    permissions: Option<Arc<dyn PermissionOracle>>,
    tiers: TierTable,
    rules: GateRules,
    messages: MessageTemplates,
    bus: Option<EventBus>,
    abilities: Vec<(Ability, Arc<dyn AbilityEffect>)>,
}

impl ActivationControllerBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            clock: None,
            scheduler: None,
            permissions: None,
            tiers: TierTable::default(),
            rules: GateRules::default(),
            messages: MessageTemplates::default(),
            bus: None,
            abilities: Vec::new(),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Wall clock for cooldown end times (default: system clock)
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Timer backend for reentrancy expiry (default: current tokio runtime)
    pub fn scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Host permission lookup (default: nobody holds anything)
    pub fn permissions(mut self, permissions: Arc<dyn PermissionOracle>) -> Self {
        self.permissions = Some(permissions);
        self
    }

    /// Replace the cooldown discount tiers
    pub fn tiers(mut self, tiers: TierTable) -> Self {
        self.tiers = tiers;
        self
    }

    /// Replace the structural gate rules
    pub fn gate_rules(mut self, rules: GateRules) -> Self {
        self.rules = rules;
        self
    }

    /// Replace the notice templates
    pub fn messages(mut self, messages: MessageTemplates) -> Self {
        self.messages = messages;
        self
    }

    /// Publish on an existing bus instead of creating one
    pub fn event_bus(mut self, bus: EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Register a validated ability with its effect
    pub fn ability(self, ability: Ability, effect: impl AbilityEffect + 'static) -> Self {
        self.shared_ability(ability, Arc::new(effect))
    }

    /// Validate a registration record and register it with its effect
    pub fn ability_spec(
        self,
        spec: AbilitySpec,
        effect: impl AbilityEffect + 'static,
    ) -> Result<Self> {
        let ability = Ability::from_spec(spec)?;
        Ok(self.ability(ability, effect))
    }

    /// Register an ability whose effect is already shared
    pub fn shared_ability(mut self, ability: Ability, effect: Arc<dyn AbilityEffect>) -> Self {
        self.abilities.push((ability, effect));
        self
    }

    pub fn build(self) -> Result<ActivationController> {
        let scheduler: Arc<dyn Scheduler> = match self.scheduler {
            Some(scheduler) => scheduler,
            None => Arc::new(TokioScheduler::current()?),
        };
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let permissions = self
            .permissions
            .unwrap_or_else(|| Arc::new(NoPermissions));
        let bus = self
            .bus
            .unwrap_or_else(|| EventBus::with_capacity(self.config.event_buffer_size));

        let window = self.config.debounce_window();
        let shards = self.config.store_shards;

        let mut registry = AbilityRegistry::new();
        for (ability, effect) in self.abilities {
            let guard = ReentrancyGuard::new(window, Arc::clone(&scheduler), shards);
            registry.insert(RegisteredAbility::new(ability, effect, guard))?;
        }

        debug!(
            abilities = registry.len(),
            window_ms = window.as_millis() as u64,
            "activation controller built"
        );

        Ok(ActivationController {
            registry,
            runtime: AbilityRuntime::new(clock, self.tiers, shards),
            permissions,
            rules: self.rules,
            messages: self.messages,
            config: self.config,
            bus,
        })
    }
}
