//! Scripted driver for the ability activation engine.
//!
//! The `spellcast` binary is the composition root: it loads a catalog with
//! `ability-content`, assembles an `ability-runtime` controller around it,
//! and replays a scenario of host triggers against the controller.

pub mod logging;
pub mod replay;
pub mod scenario;

pub use replay::{AbilityResult, Replay, StepReport, TokioClock};
pub use scenario::{Scenario, ScenarioLoader, Step};
