//! Replays a [`Scenario`] against a freshly assembled controller.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use ability_content::AbilityCatalog;
use ability_core::{AbilityId, ActorId, Clock, SystemClock, TriggerEvent};
use ability_runtime::{
    ActivationController, ActivationOutcome, Event, FeedbackEvent, PermissionTable, RuntimeConfig,
    Topic,
};
use anyhow::{Context, Result};
use serde::Serialize;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::scenario::{Scenario, Step};

/// Wall clock that follows tokio's clock after construction.
///
/// Reads the system clock once, then advances with `tokio::time::Instant`,
/// so a paused test runtime drives cooldowns and reentrancy windows from
/// the same source.
#[derive(Debug)]
pub struct TokioClock {
    origin_millis: i64,
    origin: Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            origin_millis: SystemClock.now_millis(),
            origin: Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now_millis(&self) -> i64 {
        let elapsed = i64::try_from(self.origin.elapsed().as_millis()).unwrap_or(i64::MAX);
        self.origin_millis.saturating_add(elapsed)
    }
}

/// Outcome of one ability for one step.
#[derive(Debug, Clone, Serialize)]
pub struct AbilityResult {
    pub ability: AbilityId,
    pub result: ActivationOutcome,
}

/// Everything one scenario step produced.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub step: usize,
    pub actor: ActorId,
    pub results: Vec<AbilityResult>,
    pub feedback: Vec<FeedbackEvent>,
}

impl fmt::Display for StepReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "#{} {}", self.step, self.actor)?;
        for result in &self.results {
            write!(f, "  {}: ", result.ability)?;
            match &result.result {
                ActivationOutcome::Suppressed => writeln!(f, "suppressed")?,
                ActivationOutcome::Rejected { reason } => writeln!(f, "rejected ({reason})")?,
                ActivationOutcome::Denied { remaining_seconds } => {
                    writeln!(f, "denied, {remaining_seconds}s left")?
                }
                ActivationOutcome::Activated {
                    level,
                    cooldown_seconds,
                    ..
                } => writeln!(f, "activated at level {level}, cooldown {cooldown_seconds:.2}s")?,
            }
        }
        for event in &self.feedback {
            match event {
                FeedbackEvent::Notice { text, .. } => writeln!(f, "  > {text}")?,
                FeedbackEvent::Sound(sound) => writeln!(
                    f,
                    "  ~ {} (volume {}, pitch {})",
                    sound.sound, sound.volume, sound.pitch
                )?,
            }
        }
        Ok(())
    }
}

/// Controller plus the host-side state a scenario manipulates.
pub struct Replay {
    controller: ActivationController,
    permissions: Arc<PermissionTable>,
    feedback: broadcast::Receiver<Event>,
}

impl Replay {
    /// Assembles a controller from `catalog`. Must run inside a tokio runtime.
    pub fn new(catalog: AbilityCatalog, config: RuntimeConfig) -> Result<Self> {
        let permissions = Arc::new(PermissionTable::new());

        let mut builder = ActivationController::builder()
            .config(config)
            .clock(Arc::new(TokioClock::new()))
            .permissions(permissions.clone())
            .tiers(catalog.tiers)
            .gate_rules(catalog.rules)
            .messages(catalog.messages);

        for ability in catalog.abilities {
            let id = ability.id().clone();
            builder = builder.ability(ability, move |actor: ActorId, level: u32, _: &TriggerEvent| {
                info!(%actor, ability = %id, level, "effect fired");
            });
        }

        let controller = builder.build().context("Failed to build activation controller")?;
        let feedback = controller.events().subscribe(Topic::Feedback);

        Ok(Self {
            controller,
            permissions,
            feedback,
        })
    }

    /// Runs every step in order, honouring each step's delay.
    pub async fn run(&mut self, scenario: &Scenario) -> Result<Vec<StepReport>> {
        let mut reports = Vec::with_capacity(scenario.steps.len());
        for (index, step) in scenario.steps.iter().enumerate() {
            if step.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(step.delay_ms)).await;
            }
            reports.push(self.step(index + 1, step)?);
        }
        Ok(reports)
    }

    /// Applies one step immediately.
    pub fn step(&mut self, number: usize, step: &Step) -> Result<StepReport> {
        let actor = step.actor();
        for permission in &step.grant {
            self.permissions.grant(actor, permission.as_str());
        }
        for permission in &step.revoke {
            self.permissions.revoke(actor, permission);
        }
        if step.forget {
            self.controller.forget_actor(actor);
        }

        let event = step.event();
        let results = match &step.ability {
            Some(id) => {
                let id = AbilityId::new(id.as_str());
                let result = self
                    .controller
                    .trigger(&id, &event)
                    .with_context(|| format!("step {number}"))?;
                vec![AbilityResult {
                    ability: id,
                    result,
                }]
            }
            None => self
                .controller
                .dispatch(&event)
                .into_iter()
                .map(|(ability, result)| AbilityResult { ability, result })
                .collect(),
        };

        debug!(step = number, %actor, results = results.len(), "step replayed");

        Ok(StepReport {
            step: number,
            actor,
            results,
            feedback: self.drain_feedback(),
        })
    }

    fn drain_feedback(&mut self) -> Vec<FeedbackEvent> {
        let mut feedback = Vec::new();
        loop {
            match self.feedback.try_recv() {
                Ok(Event::Feedback(event)) => feedback.push(event),
                Ok(_) => {}
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "feedback receiver lagged");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        feedback
    }
}
