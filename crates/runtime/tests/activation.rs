use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, OnceLock, Weak};
use std::time::Duration;

use ability_core::{
    AbilityId, AbilitySpec, ActionKind, ActorId, ElementKind, GateRejection, ItemFacts,
    ManualClock, SoundCategory, SoundId, TierTable, TriggerEvent, ZoneId,
};
use ability_runtime::{
    ActivationController, ActivationEvent, ActivationOutcome, Event, FeedbackEvent,
    PermissionTable, RuntimeConfig, RuntimeError, Topic,
};
use tokio::sync::broadcast::Receiver;

const START: i64 = 1_700_000_000_000;

/// Counts effect invocations and remembers the last level it saw.
#[derive(Default)]
struct EffectLog {
    runs: AtomicU32,
    last_level: AtomicU32,
}

struct Harness {
    controller: ActivationController,
    clock: Arc<ManualClock>,
    permissions: Arc<PermissionTable>,
    log: Arc<EffectLog>,
}

impl Harness {
    fn new(specs: Vec<AbilitySpec>) -> Self {
        let clock = Arc::new(ManualClock::new(START));
        let permissions = Arc::new(PermissionTable::new());
        let log = Arc::new(EffectLog::default());

        let mut builder = ActivationController::builder()
            .config(RuntimeConfig::default())
            .clock(clock.clone())
            .permissions(permissions.clone());
        for spec in specs {
            let log = Arc::clone(&log);
            builder = builder
                .ability_spec(spec, move |_: ActorId, level: u32, _: &TriggerEvent| {
                    log.runs.fetch_add(1, Ordering::SeqCst);
                    log.last_level.store(level, Ordering::SeqCst);
                })
                .expect("valid spec");
        }

        Self {
            controller: builder.build().expect("controller builds"),
            clock,
            permissions,
            log,
        }
    }

    fn runs(&self) -> u32 {
        self.log.runs.load(Ordering::SeqCst)
    }

    /// Moves both the wall clock and tokio's paused clock.
    async fn advance(&self, by: Duration) {
        self.clock.advance(by);
        tokio::time::sleep(by).await;
    }

    fn trigger(&self, event: &TriggerEvent) -> ActivationOutcome {
        self.controller
            .trigger(&dragonfire(), event)
            .expect("registered ability")
    }
}

fn dragonfire() -> AbilityId {
    AbilityId::from("dragonfire")
}

fn dragonfire_spec(cooldown: i64) -> AbilitySpec {
    let mut spec = AbilitySpec::new("dragonfire", cooldown, "entity_ender_dragon_shoot");
    spec.display_name = Some("Dragonfire".into());
    spec.disabled_zones = vec!["the_end".into()];
    spec
}

fn engage(actor: u64) -> TriggerEvent {
    TriggerEvent::new(
        ActorId(actor),
        ActionKind::Engage,
        ItemFacts::new("blaze_rod").with_ability("dragonfire", 2),
        ZoneId::from("overworld"),
    )
}

fn drain(rx: &mut Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test(start_paused = true)]
async fn scenario_activate_suppress_then_deny() {
    let harness = Harness::new(vec![dragonfire_spec(10)]);
    let mut feedback = harness.controller.events().subscribe(Topic::Feedback);
    let actor = ActorId(1);

    // First trigger fires.
    let outcome = harness.trigger(&engage(1));
    assert!(outcome.is_activated());
    assert_eq!(harness.runs(), 1);
    assert_eq!(harness.controller.cooldown(actor, &dragonfire()).unwrap(), 10);
    assert_eq!(drain(&mut feedback).len(), 2);

    // Same tick: collapsed by the reentrancy window, no feedback.
    assert_eq!(harness.trigger(&engage(1)), ActivationOutcome::Suppressed);
    assert!(drain(&mut feedback).is_empty());

    // After the window but inside the cooldown.
    harness.advance(Duration::from_millis(300)).await;
    assert_eq!(
        harness.trigger(&engage(1)),
        ActivationOutcome::Denied {
            remaining_seconds: 10
        }
    );
    assert_eq!(harness.runs(), 1);

    let events = drain(&mut feedback);
    assert_eq!(
        events[0],
        Event::Feedback(FeedbackEvent::Notice {
            actor,
            text: "This ability is on cooldown! Wait 10 seconds to use Dragonfire".into(),
        })
    );
    match &events[1] {
        Event::Feedback(FeedbackEvent::Sound(sound)) => {
            assert_eq!(sound.sound.as_str(), SoundId::DENIED);
            assert_eq!(sound.pitch, 0.5);
            assert_eq!(sound.category, SoundCategory::Master);
        }
        other => panic!("expected denial sound, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn third_permission_shortens_cooldown() {
    let harness = Harness::new(vec![dragonfire_spec(10)]);
    harness.permissions.grant(ActorId(1), TierTable::THIRD);

    let outcome = harness.trigger(&engage(1));
    match outcome {
        ActivationOutcome::Activated {
            cooldown_seconds, ..
        } => assert!((cooldown_seconds - 3.3).abs() < 1e-9),
        other => panic!("expected activation, got {other:?}"),
    }
    assert_eq!(
        harness.controller.cooldown(ActorId(1), &dragonfire()).unwrap(),
        4
    );
}

#[tokio::test(start_paused = true)]
async fn quarter_wins_over_half() {
    let harness = Harness::new(vec![dragonfire_spec(10)]);
    harness.permissions.grant(ActorId(1), TierTable::HALF);
    harness.permissions.grant(ActorId(1), TierTable::QUARTER);

    harness.trigger(&engage(1));
    assert_eq!(
        harness.controller.cooldown(ActorId(1), &dragonfire()).unwrap(),
        3
    );
}

#[tokio::test(start_paused = true)]
async fn missing_target_is_silent() {
    let mut spec = dragonfire_spec(10);
    spec.requires_target = true;
    let harness = Harness::new(vec![spec]);
    let mut feedback = harness.controller.events().subscribe(Topic::Feedback);

    assert_eq!(
        harness.trigger(&engage(1)),
        ActivationOutcome::Rejected {
            reason: GateRejection::MissingTarget
        }
    );
    assert!(drain(&mut feedback).is_empty());
    assert!(!harness
        .controller
        .runtime()
        .cooldowns()
        .has_entry(ActorId(1), &dragonfire()));
    assert_eq!(harness.runs(), 0);
}

#[tokio::test(start_paused = true)]
async fn reserved_target_is_rejected_even_on_cooldown() {
    let harness = Harness::new(vec![dragonfire_spec(10)]);
    assert!(harness.trigger(&engage(1)).is_activated());

    harness.advance(Duration::from_millis(300)).await;
    let mut feedback = harness.controller.events().subscribe(Topic::Feedback);

    assert_eq!(
        harness.trigger(&engage(1).targeting(ElementKind::Storage)),
        ActivationOutcome::Rejected {
            reason: GateRejection::ReservedTarget(ElementKind::Storage)
        }
    );
    assert!(drain(&mut feedback).is_empty());
}

#[tokio::test(start_paused = true)]
async fn wrong_motion_never_touches_cooldowns() {
    let harness = Harness::new(vec![dragonfire_spec(10)]);
    let mut bow = engage(1);
    bow.item = ItemFacts::new("bow").with_ability("dragonfire", 2);

    let outcome = harness.trigger(&bow);
    assert!(matches!(
        outcome,
        ActivationOutcome::Rejected {
            reason: GateRejection::WrongAction { .. }
        }
    ));
    assert!(!outcome.reached_cooldown_gate());
    assert!(harness.controller.runtime().cooldowns().is_empty());
    assert!(harness.controller.runnable(ActorId(1), &dragonfire()).is_none());

    // Strike is the right motion for a bow.
    harness.advance(Duration::from_millis(300)).await;
    bow.action = ActionKind::Strike;
    assert!(harness.trigger(&bow).is_activated());
}

#[tokio::test(start_paused = true)]
async fn rejected_trigger_still_opens_window() {
    let harness = Harness::new(vec![dragonfire_spec(10)]);
    let mut wrong_zone = engage(1);
    wrong_zone.zone = ZoneId::from("the_end");

    assert!(matches!(
        harness.trigger(&wrong_zone),
        ActivationOutcome::Rejected {
            reason: GateRejection::DisabledZone(_)
        }
    ));
    assert_eq!(harness.trigger(&engage(1)), ActivationOutcome::Suppressed);

    harness.advance(Duration::from_millis(300)).await;
    assert!(harness.trigger(&engage(1)).is_activated());
}

#[tokio::test(start_paused = true)]
async fn reactivates_after_cooldown_expires() {
    let harness = Harness::new(vec![dragonfire_spec(10)]);
    assert!(harness.trigger(&engage(1)).is_activated());

    harness.advance(Duration::from_secs(10)).await;
    assert_eq!(
        harness.controller.cooldown(ActorId(1), &dragonfire()).unwrap(),
        0
    );
    assert!(harness.trigger(&engage(1)).is_activated());
    assert_eq!(harness.runs(), 2);
}

#[tokio::test(start_paused = true)]
async fn effect_receives_level_and_runnable_tracks_end_time() {
    let harness = Harness::new(vec![dragonfire_spec(10)]);

    harness.trigger(&engage(1));
    assert_eq!(harness.log.last_level.load(Ordering::SeqCst), 2);

    let runnable = harness
        .controller
        .runnable(ActorId(1), &dragonfire())
        .expect("created on activation");
    assert_eq!(runnable.end_time(), START + 10_000);
    assert_eq!(runnable.run_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn actors_are_independent() {
    let harness = Harness::new(vec![dragonfire_spec(10)]);

    assert!(harness.trigger(&engage(1)).is_activated());
    assert!(harness.trigger(&engage(2)).is_activated());
    assert_eq!(harness.runs(), 2);
    assert_eq!(
        harness.controller.cooldown(ActorId(3), &dragonfire()).unwrap(),
        0
    );
}

#[tokio::test(start_paused = true)]
async fn activation_topic_reports_outcomes() {
    let harness = Harness::new(vec![dragonfire_spec(10)]);
    let mut activation = harness.controller.events().subscribe(Topic::Activation);

    harness.trigger(&engage(1));
    harness.advance(Duration::from_millis(300)).await;
    harness.trigger(&engage(1));

    let events = drain(&mut activation);
    assert_eq!(events.len(), 2);
    assert!(matches!(
        events[0],
        Event::Activation(ActivationEvent::Activated { level: 2, .. })
    ));
    assert!(matches!(
        events[1],
        Event::Activation(ActivationEvent::Denied {
            remaining_seconds: 10,
            ..
        })
    ));
}

#[tokio::test(start_paused = true)]
async fn dispatch_gates_each_ability_separately() {
    let mut blink = AbilitySpec::new("blink", 5, "entity_enderman_teleport");
    blink.display_name = Some("Blink".into());
    let harness = Harness::new(vec![dragonfire_spec(10), blink]);

    let mut both = engage(1);
    both.item = both.item.with_ability("blink", 1);

    let outcomes = harness.controller.dispatch(&both);
    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].0, dragonfire());
    assert!(outcomes[0].1.is_activated());
    assert_eq!(outcomes[1].0, AbilityId::from("blink"));
    assert!(outcomes[1].1.is_activated());

    let again = harness.controller.dispatch(&both);
    assert!(again.iter().all(|(_, o)| *o == ActivationOutcome::Suppressed));
}

#[tokio::test(start_paused = true)]
async fn forget_actor_resets_everything() {
    let harness = Harness::new(vec![dragonfire_spec(10)]);
    assert!(harness.trigger(&engage(1)).is_activated());

    harness.controller.forget_actor(ActorId(1));
    assert!(harness.controller.runnable(ActorId(1), &dragonfire()).is_none());
    assert!(harness.trigger(&engage(1)).is_activated());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_triggers_activate_once_per_actor() {
    let harness = Arc::new(Harness::new(vec![dragonfire_spec(10)]));

    let handles: Vec<_> = (0..32u64)
        .map(|i| {
            let harness = Arc::clone(&harness);
            std::thread::spawn(move || harness.trigger(&engage(i % 4)))
        })
        .collect();
    let outcomes: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("trigger thread"))
        .collect();

    let activated = outcomes.iter().filter(|o| o.is_activated()).count();
    assert_eq!(activated, 4);
    assert_eq!(harness.runs(), 4);
    assert_eq!(harness.controller.runtime().cooldowns().len(), 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn slow_effect_keeps_later_triggers_on_cooldown() {
    let runs = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&runs);
    let controller = Arc::new(
        ActivationController::builder()
            .clock(Arc::new(ManualClock::new(START)))
            .ability_spec(
                dragonfire_spec(10),
                move |_: ActorId, _: u32, _: &TriggerEvent| {
                    std::thread::sleep(Duration::from_millis(600));
                    counter.fetch_add(1, Ordering::SeqCst);
                },
            )
            .expect("valid spec")
            .build()
            .expect("controller builds"),
    );

    let first = {
        let controller = Arc::clone(&controller);
        std::thread::spawn(move || controller.trigger(&dragonfire(), &engage(1)))
    };

    // Outlive the 250 ms window while the first effect is still running.
    tokio::time::sleep(Duration::from_millis(400)).await;
    let second = {
        let controller = Arc::clone(&controller);
        std::thread::spawn(move || controller.trigger(&dragonfire(), &engage(1)))
    };

    let second = second.join().expect("second trigger").expect("registered");
    let first = first.join().expect("first trigger").expect("registered");

    assert!(first.is_activated());
    assert_eq!(
        second,
        ActivationOutcome::Denied {
            remaining_seconds: 10
        }
    );
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn effect_can_call_back_into_controller() {
    let handle: Arc<OnceLock<Weak<ActivationController>>> = Arc::default();
    let seen: Arc<Mutex<Vec<(u32, ActivationOutcome)>>> = Arc::default();
    let blink = AbilityId::from("blink");

    let slot = Arc::clone(&handle);
    let record = Arc::clone(&seen);
    let chained = blink.clone();
    let controller = Arc::new(
        ActivationController::builder()
            .clock(Arc::new(ManualClock::new(START)))
            .ability_spec(
                dragonfire_spec(10),
                move |actor: ActorId, _: u32, event: &TriggerEvent| {
                    let Some(controller) = slot.get().and_then(Weak::upgrade) else {
                        return;
                    };
                    let cooldown = controller.cooldown(actor, &dragonfire()).unwrap();
                    let outcome = controller.trigger(&chained, event).unwrap();
                    record.lock().unwrap().push((cooldown, outcome));
                },
            )
            .and_then(|b| {
                b.ability_spec(
                    AbilitySpec::new("blink", 5, "entity_enderman_teleport"),
                    |_: ActorId, _: u32, _: &TriggerEvent| {},
                )
            })
            .expect("valid specs")
            .build()
            .expect("controller builds"),
    );
    handle.set(Arc::downgrade(&controller)).expect("handle set once");

    let mut event = engage(1);
    event.item = event.item.with_ability("blink", 1);
    assert!(controller.trigger(&dragonfire(), &event).unwrap().is_activated());

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, 10);
    assert!(seen[0].1.is_activated());
    assert_eq!(controller.cooldown(ActorId(1), &blink).unwrap(), 5);
}

#[tokio::test(start_paused = true)]
async fn unknown_ability_is_an_error() {
    let harness = Harness::new(vec![dragonfire_spec(10)]);
    let missing = AbilityId::from("missing");

    assert!(matches!(
        harness.controller.trigger(&missing, &engage(1)),
        Err(RuntimeError::UnknownAbility(id)) if id == missing
    ));
    assert!(harness.controller.cooldown(ActorId(1), &missing).is_err());
}

#[tokio::test(start_paused = true)]
async fn duplicate_registration_fails() {
    let result = ActivationController::builder()
        .ability_spec(dragonfire_spec(10), |_: ActorId, _: u32, _: &TriggerEvent| {})
        .and_then(|b| {
            b.ability_spec(dragonfire_spec(5), |_: ActorId, _: u32, _: &TriggerEvent| {})
        })
        .and_then(|b| b.build());

    assert!(matches!(result, Err(RuntimeError::DuplicateAbility(_))));
}

#[test]
fn negative_cooldown_fails_registration() {
    let result = ActivationController::builder()
        .ability_spec(dragonfire_spec(-3), |_: ActorId, _: u32, _: &TriggerEvent| {});

    assert!(matches!(result, Err(RuntimeError::Config(_))));
}

#[test]
fn build_outside_tokio_needs_a_scheduler() {
    let result = ActivationController::builder().build();
    assert!(matches!(result, Err(RuntimeError::MissingAsyncRuntime(_))));
}
