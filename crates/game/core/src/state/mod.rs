//! Authoritative session state representation.
//!
//! This module owns the data structures that describe the roster, turn
//! bookkeeping, and tile occupancy for one session. The runtime layer clones
//! or queries this state but mutates it exclusively through
//! [`crate::engine::SessionEngine`].
pub mod types;

use std::collections::BTreeSet;

use crate::env::MapOracle;

pub use types::{
    Direction, LifecyclePhase, PlayerId, PlayerState, Position, RosterState, SessionId, TeamId,
    TurnOrder, TurnState, WorldState,
};

/// Errors detected while assembling a session from its creation payload.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InitializationError {
    #[error("turn order is empty")]
    EmptyTurnOrder,

    #[error("turn order holds {count} players, limit is {max}")]
    TooManyPlayers { count: usize, max: usize },

    #[error("player {0} appears more than once")]
    DuplicatePlayer(PlayerId),

    #[error("turn order references unknown player {0}")]
    UnknownPlayerInOrder(PlayerId),

    #[error("start position {position} for player {player} is outside the map")]
    StartOutOfBounds { player: PlayerId, position: Position },

    #[error("players {first} and {second} share start position {position}")]
    StartPositionConflict {
        first: PlayerId,
        second: PlayerId,
        position: Position,
    },
}

/// Canonical snapshot of one session's mutable state.
///
/// The map itself is not part of this struct: tiles and placeables are
/// immutable for the session's lifetime and live in the
/// [`crate::env::MapSnapshot`] built at creation, while everything here
/// changes as turns play out.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionState {
    pub id: SessionId,
    /// Every player that joined, with position and points budget.
    pub players: RosterState,
    /// Turn order, active player, and lifecycle phase.
    pub turn: TurnState,
    /// Live tile occupancy, seeded from start positions.
    pub world: WorldState,
}

impl SessionState {
    /// Builds the state for a freshly created session, seeding occupancy from
    /// the players' start positions.
    ///
    /// The map is consulted only for bounds checks; callers are expected to
    /// have placed players on valid start tiles.
    pub fn new<M>(
        id: SessionId,
        map: &M,
        players: Vec<PlayerState>,
        order: &[PlayerId],
    ) -> Result<Self, InitializationError>
    where
        M: MapOracle + ?Sized,
    {
        if order.is_empty() {
            return Err(InitializationError::EmptyTurnOrder);
        }

        let mut turn_order = TurnOrder::new();
        let mut seen = BTreeSet::new();
        for &player in order {
            if !seen.insert(player) {
                return Err(InitializationError::DuplicatePlayer(player));
            }
            if !players.iter().any(|p| p.id == player) {
                return Err(InitializationError::UnknownPlayerInOrder(player));
            }
            turn_order
                .try_push(player)
                .map_err(|_| InitializationError::TooManyPlayers {
                    count: order.len(),
                    max: crate::config::GameConfig::MAX_PLAYERS,
                })?;
        }

        let mut world = WorldState::new();
        for player in players.iter().filter(|p| p.in_game) {
            if !map.contains(player.position) {
                return Err(InitializationError::StartOutOfBounds {
                    player: player.id,
                    position: player.position,
                });
            }
            if let Some(first) = world.occupant_at(player.position) {
                return Err(InitializationError::StartPositionConflict {
                    first,
                    second: player.id,
                    position: player.position,
                });
            }
            world.set_occupant(player.position, player.id);
        }

        Ok(Self {
            id,
            players: RosterState::new(players),
            turn: TurnState::new(turn_order),
            world,
        })
    }
}
