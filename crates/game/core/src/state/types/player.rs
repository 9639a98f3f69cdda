use super::{PlayerId, Position, TeamId};

/// Per-player session state: where they stand, what they can still spend this
/// turn, and whether they are still part of the game.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerState {
    pub id: PlayerId,

    /// Current tile coordinate. Always within map bounds and never shared
    /// with another in-game player.
    pub position: Position,

    /// Movement points left for the current turn. Never goes negative; the
    /// movement engine rejects steps it cannot afford.
    pub movement_points: u32,

    /// Points granted at the start of each of this player's turns.
    pub allowance: u32,

    pub team: Option<TeamId>,

    /// Cleared when the player leaves or is eliminated. Out-of-game players
    /// keep their roster entry but no longer occupy a tile or take turns.
    pub in_game: bool,
}

impl PlayerState {
    pub fn new(id: PlayerId, position: Position, allowance: u32) -> Self {
        Self {
            id,
            position,
            movement_points: allowance,
            allowance,
            team: None,
            in_game: true,
        }
    }

    pub fn with_team(mut self, team: TeamId) -> Self {
        self.team = Some(team);
        self
    }

    /// Restores the per-turn movement budget.
    pub fn reset_points(&mut self) {
        self.movement_points = self.allowance;
    }
}

/// Roster of every player that ever joined the session, in join order.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RosterState {
    players: Vec<PlayerState>,
}

impl RosterState {
    pub fn new(players: Vec<PlayerState>) -> Self {
        Self { players }
    }

    pub fn player(&self, id: PlayerId) -> Option<&PlayerState> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut PlayerState> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerState> {
        self.players.iter()
    }

    pub fn in_game(&self) -> impl Iterator<Item = &PlayerState> {
        self.players.iter().filter(|p| p.in_game)
    }

    pub fn in_game_count(&self) -> usize {
        self.in_game().count()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
