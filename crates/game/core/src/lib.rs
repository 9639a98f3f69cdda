//! Deterministic session rules and data types shared across the runtime.
//!
//! `skirmish-core` defines the canonical rules (movement, reachability, turn
//! order) and exposes pure APIs with no clocks or I/O: timers, channels, and
//! event delivery live in the runtime crate. All state mutation flows through
//! [`engine::SessionEngine`], and supporting crates depend on the types
//! re-exported here.
pub mod config;
pub mod engine;
pub mod env;
pub mod state;

pub use config::GameConfig;
pub use engine::{
    MoveError, MoveOutcome, PlayerRemoval, ReachableTile, SessionEngine, TurnError,
};
pub use env::{
    MapBuildError, MapDimensions, MapOracle, MapSnapshot, PlaceableKind, TerrainKind, TileCost,
    TileDescriptor,
};
pub use state::{
    Direction, InitializationError, LifecyclePhase, PlayerId, PlayerState, Position, RosterState,
    SessionId, SessionState, TeamId, TurnOrder, TurnState, WorldState,
};
