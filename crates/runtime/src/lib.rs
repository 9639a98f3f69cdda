//! Runtime orchestration for server-authoritative grid-game sessions.
//!
//! This crate wires the pure rules from `skirmish-core` into live sessions:
//! one worker task per session owns the authoritative state and every
//! countdown (turn clock, inter-turn transition, combat round), commands
//! arrive over channels and are handled to completion, and typed events flow
//! out through a topic bus. Consumers embed [`Runtime`] to create sessions
//! and interact with them through [`SessionHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the session registry and configuration
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - `timers` and `workers` keep countdown machinery and the per-session
//!   task internal to the crate
pub mod api;
pub mod events;
pub mod runtime;

mod timers;
mod workers;

pub use api::{
    Combatant, Engagement, GameOutcome, GameOverRule, LastPlayerStanding, PlayerSpec, Result,
    RuntimeError, SessionError, SessionHandle, SessionSpec, TileEffect,
};
pub use events::{CombatEvent, Event, EventBus, PlayerEvent, Topic, TurnEvent};
pub use runtime::{Runtime, RuntimeConfig};
