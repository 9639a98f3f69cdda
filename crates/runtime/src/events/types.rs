//! Event types for different topics.

use serde::{Deserialize, Serialize};

use skirmish_core::{PlayerId, Position, ReachableTile, SessionId};

/// Events about a single player's movement state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// A move committed: new position and what is left of the points budget.
    Moved {
        session: SessionId,
        player: PlayerId,
        position: Position,
        remaining_points: u32,
    },

    /// Full replacement of the player's published reachable set. Emitted
    /// after every successful move and at the start of their turn; empty
    /// once the budget is exhausted.
    ReachableTiles {
        session: SessionId,
        player: PlayerId,
        tiles: Vec<ReachableTile>,
    },
}

/// Events about turn progression and session termination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TurnEvent {
    /// A new turn began its transition: `active_player` acts next.
    Changed {
        session: SessionId,
        active_player: PlayerId,
        turn_number: u64,
    },

    /// Terminal event. `winner` is `None` for a draw or abandoned session.
    GameOver {
        session: SessionId,
        winner: Option<PlayerId>,
    },
}

/// Events about the combat sub-phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CombatEvent {
    /// The round countdown snapped back to its full duration, either
    /// naturally or because both combatants acted.
    RoundReset { session: SessionId },
}
