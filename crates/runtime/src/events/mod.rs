//! Topic-based event bus for outbound activation feedback.
//!
//! Outcomes and player-facing feedback are published to separate topics so
//! a host can route notices and sounds without parsing activation results.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{ActivationEvent, FeedbackEvent};
