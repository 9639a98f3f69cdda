//! Payload types consumed from collaborators.

use serde::{Deserialize, Serialize};

use skirmish_core::{MapSnapshot, PlayerId, Position, SessionId, SessionState, TeamId};

/// Session creation payload: everything the lobby hands over when all
/// players are placed on their start points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSpec {
    pub id: SessionId,
    /// Immutable grid snapshot built by the game-definition collaborator.
    pub map: MapSnapshot,
    pub players: Vec<PlayerSpec>,
    /// Cyclic turn order over the player ids above.
    pub turn_order: Vec<PlayerId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSpec {
    pub id: PlayerId,
    pub start_position: Position,
    /// Movement points granted at the start of each of this player's turns.
    pub allowance: u32,
    pub team: Option<TeamId>,
}

/// One side of a combat engagement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    pub player: PlayerId,
    /// Debuff carried from the tile the combatant stands on, consumed by the
    /// external combat resolver. `None` for a neutral tile.
    pub tile_effect: Option<TileEffect>,
}

impl Combatant {
    pub fn new(player: PlayerId) -> Self {
        Self {
            player,
            tile_effect: None,
        }
    }

    pub fn with_tile_effect(player: PlayerId, effect: TileEffect) -> Self {
        Self {
            player,
            tile_effect: Some(effect),
        }
    }
}

/// Combat modifiers a tile can impose on whoever fights while standing on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileEffect {
    /// Slippery ground; the resolver applies its attack/defense penalty.
    Slippery,
}

/// The two engaged combatants, kept by the session worker while its combat
/// round timer runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engagement {
    pub attacker: Combatant,
    pub defender: Combatant,
}

impl Engagement {
    pub fn involves(&self, player: PlayerId) -> bool {
        self.attacker.player == player || self.defender.player == player
    }
}

/// Verdict of a [`GameOverRule`] check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Continue,
    Over { winner: Option<PlayerId> },
}

/// Session-defined game-over predicate, checked whenever a turn transition
/// elapses. Win conditions detected outside the core (objective captured)
/// go through the force-game-over command instead.
pub trait GameOverRule: Send + Sync {
    fn evaluate(&self, state: &SessionState) -> GameOutcome;
}

/// Default rule: the session ends when fewer than two players remain in
/// game; a sole survivor wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct LastPlayerStanding;

impl GameOverRule for LastPlayerStanding {
    fn evaluate(&self, state: &SessionState) -> GameOutcome {
        let mut in_game = state.players.in_game();
        match (in_game.next(), in_game.next()) {
            (Some(survivor), None) => GameOutcome::Over {
                winner: Some(survivor.id),
            },
            (None, _) => GameOutcome::Over { winner: None },
            _ => GameOutcome::Continue,
        }
    }
}
