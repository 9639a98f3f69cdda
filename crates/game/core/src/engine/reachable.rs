use std::collections::{BTreeSet, VecDeque};

use strum::IntoEnumIterator;

use crate::env::{MapOracle, TileCost};
use crate::state::{Direction, PlayerId, Position};

use super::movement::MoveError;
use super::SessionEngine;

/// Ephemeral computed value: a tile the player can still reach this turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReachableTile {
    pub position: Position,
    /// Points spent along the path that first reached this tile.
    pub cost: u32,
    /// Budget left after arriving: `starting points - cost`, never negative.
    pub remaining_points: u32,
}

/// Pending frontier entry of the reachability search.
#[derive(Clone, Copy, Debug)]
struct Frontier {
    position: Position,
    cost: u32,
    remaining: u32,
}

impl SessionEngine<'_> {
    /// Computes every tile `player` can legally reach with their remaining
    /// movement points. Pure read; the result excludes the start coordinate.
    ///
    /// The frontier is finalized in FIFO order: a tile keeps the cost of the
    /// first path that dequeued it, even if a cheaper path through water
    /// exists. On-boat status is captured once from the start tile and not
    /// re-derived as the hypothetical path crosses further water or land.
    pub fn reachable_tiles<M>(
        &self,
        map: &M,
        player: PlayerId,
    ) -> Result<Vec<ReachableTile>, MoveError>
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

        let start = actor.position;
        let on_boat = map.has_boat(start);

        let mut finalized: BTreeSet<Position> = BTreeSet::new();
        let mut queue: VecDeque<Frontier> = VecDeque::new();
        let mut result = Vec::new();

        queue.push_back(Frontier {
            position: start,
            cost: 0,
            remaining: actor.movement_points,
        });

        while let Some(node) = queue.pop_front() {
            if !finalized.insert(node.position) {
                continue;
            }
            if node.position != start {
                result.push(ReachableTile {
                    position: node.position,
                    cost: node.cost,
                    remaining_points: node.remaining,
                });
            }

            for direction in Direction::iter() {
                let next = direction.step(node.position);
                if finalized.contains(&next) {
                    continue;
                }
                let Some(tile) = map.tile(next) else {
                    continue;
                };
                let step = match tile.cost(on_boat) {
                    TileCost::Impassable => continue,
                    TileCost::Passable(cost) => cost,
                };
                if step > node.remaining {
                    continue;
                }
                if self
                    .state
                    .world
                    .occupant_at(next)
                    .is_some_and(|occupant| occupant != player)
                {
                    continue;
                }
                queue.push_back(Frontier {
                    position: next,
                    cost: node.cost + step,
                    remaining: node.remaining - step,
                });
            }
        }

        Ok(result)
    }
}
