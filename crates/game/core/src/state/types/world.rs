use std::collections::BTreeMap;

use super::{PlayerId, Position};

/// Live occupancy index layered on top of the immutable map snapshot.
///
/// At most one player stands on a coordinate at a time; only in-game players
/// appear here. The movement engine is the sole writer during a turn, the
/// lifecycle clears entries when a player leaves. Writes perform no rule
/// validation (that is the movement engine's job).
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldState {
    occupancy: BTreeMap<Position, PlayerId>,
}

impl WorldState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn occupant_at(&self, position: Position) -> Option<PlayerId> {
        self.occupancy.get(&position).copied()
    }

    pub fn set_occupant(&mut self, position: Position, player: PlayerId) {
        self.occupancy.insert(position, player);
    }

    /// Removes and returns the occupant of `position`, if any.
    pub fn clear_occupant(&mut self, position: Position) -> Option<PlayerId> {
        self.occupancy.remove(&position)
    }

    pub fn occupancy(&self) -> &BTreeMap<Position, PlayerId> {
        &self.occupancy
    }
}
