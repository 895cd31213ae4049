//! Stateful activation engine for triggered abilities.
//!
//! This crate wires the pure rules from `ability-core` to per-actor state,
//! deferred timers, and an outbound event bus. Consumers build an
//! [`ActivationController`], feed it [`ability_core::TriggerEvent`]s, and
//! subscribe to the [`EventBus`] for notices and sounds.
//!
//! Modules are organized by responsibility:
//! - [`controller`] hosts the gating state machine and its builder
//! - [`cooldown`], [`reentrancy`] and [`runnable`] hold per-actor state
//! - [`runtime`] bundles the shared maps the controller mutates
//! - [`api`] exposes outcomes, errors and the ability registry
//! - [`events`] provides the topic-based event bus
//! - [`scheduler`] and [`store`] provide timers and sharded locking
//! - [`oracle`] provides in-memory host fact implementations
pub mod api;
pub mod config;
pub mod controller;
pub mod cooldown;
pub mod events;
pub mod oracle;
pub mod reentrancy;
pub mod runnable;
pub mod runtime;
pub mod scheduler;
pub mod store;

pub use api::{AbilityRegistry, ActivationOutcome, RegisteredAbility, Result, RuntimeError};
pub use config::RuntimeConfig;
pub use controller::{ActivationController, ActivationControllerBuilder};
pub use cooldown::{CooldownEntry, CooldownTracker};
pub use events::{ActivationEvent, Event, EventBus, FeedbackEvent, Topic};
pub use oracle::PermissionTable;
pub use reentrancy::ReentrancyGuard;
pub use runnable::ActivationRunnable;
pub use runtime::AbilityRuntime;
pub use scheduler::{DeferredTask, Scheduler, TokioScheduler};
pub use store::ShardedMap;
