//! Typed outbound events from session workers to their collaborators.
//!
//! The broadcast-style emission the presentation layer consumes is an
//! explicit topic bus: subscribers pick a [`Topic`] and receive only that
//! topic's events, in per-session publish order.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{CombatEvent, PlayerEvent, TurnEvent};
