use crate::env::{MapOracle, TileCost};
use crate::state::{Direction, PlayerId, Position};

use super::reachable::ReachableTile;
use super::SessionEngine;

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),

    #[error("player {0} is no longer in the game")]
    PlayerOutOfGame(PlayerId),

    #[error("no tile at {destination}")]
    TileNotFound { destination: Position },

    #[error("tile at {destination} is impassable")]
    Impassable { destination: Position },

    #[error("door at {destination} is closed")]
    DoorClosed { destination: Position },

    #[error("step to {destination} costs {required}, {remaining} points remain")]
    InsufficientPoints {
        destination: Position,
        required: u32,
        remaining: u32,
    },

    #[error("tile at {destination} is occupied")]
    Occupied { destination: Position },
}

/// Committed result of a single-step move.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveOutcome {
    pub player: PlayerId,
    pub position: Position,
    pub remaining_points: u32,
    /// Tiles still reachable after the step. Empty once the budget hits zero.
    pub reachable: Vec<ReachableTile>,
}

impl SessionEngine<'_> {
    /// Moves `player` one tile in `direction`, debiting the tile cost from
    /// their movement budget and rewriting the occupancy index.
    ///
    /// The step cost is boat-aware: departing from a boat tile crosses water
    /// at the reduced cost, matching what the reachability search reports.
    pub fn move_one_step<M>(
        &mut self,
        map: &M,
        player: PlayerId,
        direction: Direction,
    ) -> Result<MoveOutcome, MoveError>
    where
        M: MapOracle + ?Sized,
    {
        let actor = self
            .state
            .players
            .player(player)
            .ok_or(MoveError::PlayerNotFound(player))?;
        if !actor.in_game {
            return Err(MoveError::PlayerOutOfGame(player));
        }

        let origin = actor.position;
        let remaining = actor.movement_points;
        let destination = direction.step(origin);

        let tile = map
            .tile(destination)
            .ok_or(MoveError::TileNotFound { destination })?;

        let on_boat = map.has_boat(origin);
        let required = match tile.cost(on_boat) {
            TileCost::Impassable if tile.is_closed_door() => {
                return Err(MoveError::DoorClosed { destination });
            }
            TileCost::Impassable => return Err(MoveError::Impassable { destination }),
            TileCost::Passable(cost) => cost,
        };

        if required > remaining {
            return Err(MoveError::InsufficientPoints {
                destination,
                required,
                remaining,
            });
        }

        if self.state.world.occupant_at(destination).is_some() {
            return Err(MoveError::Occupied { destination });
        }

        // Validation done; commit position, points, and occupancy together.
        let actor = self
            .state
            .players
            .player_mut(player)
            .ok_or(MoveError::PlayerNotFound(player))?;
        actor.position = destination;
        actor.movement_points = remaining - required;
        let remaining_points = actor.movement_points;

        self.state.world.clear_occupant(origin);
        self.state.world.set_occupant(destination, player);

        let reachable = if remaining_points == 0 {
            Vec::new()
        } else {
            self.reachable_tiles(map, player)?
        };

        Ok(MoveOutcome {
            player,
            position: destination,
            remaining_points,
            reachable,
        })
    }
}
