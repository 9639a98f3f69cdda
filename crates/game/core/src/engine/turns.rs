use crate::state::{LifecyclePhase, PlayerId};

use super::SessionEngine;

/// Errors that can occur during turn bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    #[error("turn order is empty")]
    EmptyTurnOrder,

    #[error("no active player")]
    NoActivePlayer,

    #[error("player {0} not found or out of game")]
    PlayerNotFound(PlayerId),
}

/// Result of removing a player from the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerRemoval {
    /// The removed player was the one whose turn it was (or was next).
    pub was_active: bool,
    /// In-game players left after the removal.
    pub remaining_in_game: usize,
}

/// Turn bookkeeping methods for [`SessionEngine`].
impl SessionEngine<'_> {
    /// Starts the session's first turn: first player in the order becomes
    /// active with a fresh points budget.
    pub fn start_first_turn(&mut self) -> Result<PlayerId, TurnError> {
        let turn = &mut self.state.turn;
        let &first = turn.order.first().ok_or(TurnError::EmptyTurnOrder)?;
        turn.current_index = 0;
        turn.active_player = Some(first);
        turn.turn_number = 1;
        turn.phase = LifecyclePhase::TurnActive;
        self.reset_active_points()
    }

    /// Advances the turn order cyclically and enters the inter-turn
    /// transition. The new active player's budget is reset by
    /// [`Self::begin_turn`] when the transition elapses.
    pub fn advance_turn(&mut self) -> Result<PlayerId, TurnError> {
        let turn = &mut self.state.turn;
        if turn.order.is_empty() {
            return Err(TurnError::EmptyTurnOrder);
        }
        turn.current_index = (turn.current_index + 1) % turn.order.len();
        let next = turn.order[turn.current_index];
        turn.active_player = Some(next);
        turn.turn_number += 1;
        turn.phase = LifecyclePhase::TurnTransition;
        Ok(next)
    }

    /// Enters the transition without advancing the index. Used when the
    /// active player left: removal already re-pointed the current slot at
    /// the next player in the shrunk order.
    pub fn enter_transition_in_place(&mut self) -> Result<PlayerId, TurnError> {
        let turn = &mut self.state.turn;
        if turn.order.is_empty() {
            return Err(TurnError::EmptyTurnOrder);
        }
        turn.current_index %= turn.order.len();
        let next = turn.order[turn.current_index];
        turn.active_player = Some(next);
        turn.turn_number += 1;
        turn.phase = LifecyclePhase::TurnTransition;
        Ok(next)
    }

    /// Leaves the transition: the pending active player starts their turn
    /// with a fresh points budget.
    pub fn begin_turn(&mut self) -> Result<PlayerId, TurnError> {
        self.state.turn.phase = LifecyclePhase::TurnActive;
        self.reset_active_points()
    }

    /// Marks `player` out of game, clears their tile, and shrinks the turn
    /// order so the cycle neither skips nor repeats anyone.
    pub fn remove_player(&mut self, player: PlayerId) -> Result<PlayerRemoval, TurnError> {
        let actor = self
            .state
            .players
            .player_mut(player)
            .filter(|p| p.in_game)
            .ok_or(TurnError::PlayerNotFound(player))?;
        actor.in_game = false;
        let vacated = actor.position;
        self.state.world.clear_occupant(vacated);

        let turn = &mut self.state.turn;
        let was_active = turn.active_player == Some(player);
        if let Some(index) = turn.order.iter().position(|&p| p == player) {
            turn.order.remove(index);
            if turn.order.is_empty() {
                turn.current_index = 0;
                turn.active_player = None;
            } else {
                if index < turn.current_index {
                    turn.current_index -= 1;
                }
                turn.current_index %= turn.order.len();
                if was_active {
                    turn.active_player = Some(turn.order[turn.current_index]);
                }
            }
        }

        Ok(PlayerRemoval {
            was_active,
            remaining_in_game: self.state.players.in_game_count(),
        })
    }

    /// Moves the session to its terminal phase.
    pub fn finish_session(&mut self) {
        self.state.turn.phase = LifecyclePhase::GameOver;
        self.state.turn.active_player = None;
    }

    /// The single surviving in-game player, if exactly one remains.
    pub fn last_player_standing(&self) -> Option<PlayerId> {
        let mut in_game = self.state.players.in_game();
        let first = in_game.next()?;
        in_game.next().is_none().then(|| first.id)
    }

    fn reset_active_points(&mut self) -> Result<PlayerId, TurnError> {
        let active = self
            .state
            .turn
            .active_player
            .ok_or(TurnError::NoActivePlayer)?;
        let actor = self
            .state
            .players
            .player_mut(active)
            .ok_or(TurnError::PlayerNotFound(active))?;
        actor.reset_points();
        Ok(active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{MapDimensions, MapSnapshot, TerrainKind};
    use crate::state::{PlayerState, Position, SessionId, SessionState};

    fn three_player_session() -> SessionState {
        let map = MapSnapshot::filled(MapDimensions::new(5, 5), TerrainKind::Floor);
        let players = vec![
            PlayerState::new(PlayerId(1), Position::new(0, 0), 4),
            PlayerState::new(PlayerId(2), Position::new(2, 0), 4),
            PlayerState::new(PlayerId(3), Position::new(4, 0), 4),
        ];
        SessionState::new(
            SessionId(1),
            &map,
            players,
            &[PlayerId(1), PlayerId(2), PlayerId(3)],
        )
        .unwrap()
    }

    #[test]
    fn advancement_is_cyclic_and_counts_turns() {
        let mut state = three_player_session();
        let mut engine = SessionEngine::new(&mut state);
        let first = engine.start_first_turn().unwrap();
        assert_eq!(first, PlayerId(1));

        // A full cycle of turn-ends returns to the original player with the
        // turn number advanced by the order length.
        for _ in 0..3 {
            engine.advance_turn().unwrap();
            engine.begin_turn().unwrap();
        }
        assert_eq!(state.turn.active_player, Some(PlayerId(1)));
        assert_eq!(state.turn.turn_number, 4);
        assert_eq!(state.turn.phase, LifecyclePhase::TurnActive);
    }

    #[test]
    fn begin_turn_resets_the_points_budget() {
        let mut state = three_player_session();
        let mut engine = SessionEngine::new(&mut state);
        engine.start_first_turn().unwrap();
        engine.advance_turn().unwrap();

        state.players.player_mut(PlayerId(2)).unwrap().movement_points = 0;
        let active = SessionEngine::new(&mut state).begin_turn().unwrap();

        assert_eq!(active, PlayerId(2));
        assert_eq!(
            state.players.player(PlayerId(2)).unwrap().movement_points,
            4
        );
    }

    #[test]
    fn removing_the_active_player_promotes_the_next_without_skipping() {
        let mut state = three_player_session();
        let mut engine = SessionEngine::new(&mut state);
        engine.start_first_turn().unwrap();

        let removal = engine.remove_player(PlayerId(1)).unwrap();
        assert!(removal.was_active);
        assert_eq!(removal.remaining_in_game, 2);
        assert_eq!(state.turn.active_player, Some(PlayerId(2)));
        assert_eq!(state.turn.order.as_slice(), &[PlayerId(2), PlayerId(3)]);
        assert_eq!(state.world.occupant_at(Position::new(0, 0)), None);
    }

    #[test]
    fn removing_before_the_current_index_keeps_the_active_player() {
        let mut state = three_player_session();
        let mut engine = SessionEngine::new(&mut state);
        engine.start_first_turn().unwrap();
        engine.advance_turn().unwrap();
        engine.begin_turn().unwrap();
        assert_eq!(state.turn.active_player, Some(PlayerId(2)));

        let removal = SessionEngine::new(&mut state)
            .remove_player(PlayerId(1))
            .unwrap();
        assert!(!removal.was_active);
        assert_eq!(state.turn.active_player, Some(PlayerId(2)));
        assert_eq!(
            state.turn.order[state.turn.current_index],
            PlayerId(2)
        );

        // The cycle continues 2 -> 3 -> 2.
        let mut engine = SessionEngine::new(&mut state);
        assert_eq!(engine.advance_turn().unwrap(), PlayerId(3));
        assert_eq!(engine.advance_turn().unwrap(), PlayerId(2));
    }

    #[test]
    fn removing_the_tail_player_wraps_the_index() {
        let mut state = three_player_session();
        let mut engine = SessionEngine::new(&mut state);
        engine.start_first_turn().unwrap();
        engine.advance_turn().unwrap();
        engine.begin_turn().unwrap();
        engine.advance_turn().unwrap();
        engine.begin_turn().unwrap();
        assert_eq!(state.turn.active_player, Some(PlayerId(3)));

        let removal = SessionEngine::new(&mut state)
            .remove_player(PlayerId(3))
            .unwrap();
        assert!(removal.was_active);
        assert_eq!(state.turn.active_player, Some(PlayerId(1)));
    }

    #[test]
    fn last_player_standing_needs_exactly_one_survivor() {
        let mut state = three_player_session();
        let mut engine = SessionEngine::new(&mut state);
        assert_eq!(engine.last_player_standing(), None);

        engine.remove_player(PlayerId(2)).unwrap();
        assert_eq!(engine.last_player_standing(), None);

        engine.remove_player(PlayerId(3)).unwrap();
        assert_eq!(engine.last_player_standing(), Some(PlayerId(1)));
    }
}
