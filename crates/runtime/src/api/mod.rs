//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on timers, storage, or orchestration.

pub mod errors;
pub mod outcome;
pub mod registry;

pub use errors::{Result, RuntimeError};
pub use outcome::ActivationOutcome;
pub use registry::{AbilityRegistry, RegisteredAbility};
