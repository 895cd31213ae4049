//! Unified error types surfaced by the runtime API.
//!
//! Steady-state trigger processing never fails; these errors come from
//! building the controller or from addressing an ability that was never
//! registered.
use ability_core::{AbilityId, ConfigError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("ability `{0}` is not registered")]
    UnknownAbility(AbilityId),

    #[error("ability `{0}` registered twice")]
    DuplicateAbility(AbilityId),

    #[error("no tokio runtime available to host deferred timers")]
    MissingAsyncRuntime(#[source] tokio::runtime::TryCurrentError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
