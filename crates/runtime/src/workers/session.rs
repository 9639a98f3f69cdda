//! Session worker that owns one session's authoritative state and timers.
//!
//! Receives commands from [`crate::api::SessionHandle`], mutates state via
//! [`skirmish_core::SessionEngine`], observes its own timer deadlines, and
//! publishes typed events. Everything for one session happens on this task,
//! handled to completion in arrival order; there is no shared timer table
//! and no lock.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::time::Duration;
use tracing::{debug, error, info};

use skirmish_core::{
    Direction, LifecyclePhase, MapSnapshot, MoveOutcome, PlayerId, SessionEngine, SessionState,
};

use crate::api::{Combatant, Engagement, GameOutcome, GameOverRule, SessionError};
use crate::events::{CombatEvent, Event, EventBus, PlayerEvent, TurnEvent};
use crate::runtime::RuntimeConfig;
use crate::timers::{CombatTimer, Countdown, TurnTimer};

type SessionResult<T> = Result<T, SessionError>;
type Reply<T> = oneshot::Sender<SessionResult<T>>;

/// Commands that can be sent to a session worker.
pub(crate) enum Command {
    /// Start the session: first player in the turn order becomes active.
    Start { reply: Reply<()> },
    /// Move the active player one tile.
    Move {
        player: PlayerId,
        direction: Direction,
        reply: Reply<MoveOutcome>,
    },
    /// Active player ends their turn early.
    EndTurn { player: PlayerId, reply: Reply<()> },
    /// Open a combat engagement; freezes the turn clock.
    StartCombat {
        attacker: Combatant,
        defender: Combatant,
        reply: Reply<()>,
    },
    /// Resolve the engagement. `winner` is `None` when the fight ended by
    /// flight rather than victory.
    EndCombat {
        winner: Option<PlayerId>,
        reply: Reply<()>,
    },
    /// Both combatants acted: snap the round countdown back to full.
    ResetCombatRound { reply: Reply<()> },
    /// A player left the session.
    RemovePlayer { player: PlayerId, reply: Reply<()> },
    /// Externally detected win condition (e.g. objective captured).
    ForceGameOver {
        winner: Option<PlayerId>,
        reply: Reply<()>,
    },
    /// Seconds left on the live turn clock (zero while paused or stopped).
    RemainingTurnSeconds { reply: oneshot::Sender<u64> },
    /// Read-only snapshot of the session state.
    QueryState { reply: oneshot::Sender<SessionState> },
    /// The live engagement, if combat is running.
    QueryEngagement {
        reply: oneshot::Sender<Option<Engagement>>,
    },
    /// Tear the session down; pending timers die with the task.
    Shutdown,
}

/// Background task owning one session.
pub(crate) struct SessionWorker {
    state: SessionState,
    map: MapSnapshot,
    turn_duration: Duration,
    transition_duration: Duration,
    turn_timer: TurnTimer,
    transition_timer: Countdown,
    combat_timer: CombatTimer,
    engagement: Option<Engagement>,
    game_over_rule: Arc<dyn GameOverRule>,
    command_rx: mpsc::Receiver<Command>,
    bus: EventBus,
}

impl SessionWorker {
    pub(crate) fn new(
        state: SessionState,
        map: MapSnapshot,
        config: &RuntimeConfig,
        game_over_rule: Arc<dyn GameOverRule>,
        command_rx: mpsc::Receiver<Command>,
        bus: EventBus,
    ) -> Self {
        Self {
            state,
            map,
            turn_duration: Duration::from_secs(config.turn_seconds),
            transition_duration: Duration::from_secs(config.transition_seconds),
            turn_timer: TurnTimer::new(),
            transition_timer: Countdown::new(),
            combat_timer: CombatTimer::new(Duration::from_secs(config.combat_round_seconds)),
            engagement: None,
            game_over_rule,
            command_rx,
            bus,
        }
    }

    /// Main worker loop: commands and timer expiries, one at a time.
    pub(crate) async fn run(mut self) {
        loop {
            tokio::select! {
                command = self.command_rx.recv() => match command {
                    Some(Command::Shutdown) | None => break,
                    Some(command) => self.handle_command(command),
                },
                _ = self.turn_timer.expired(), if self.turn_timer.is_running() => {
                    self.on_turn_expired();
                }
                _ = self.transition_timer.expired(), if self.transition_timer.is_armed() => {
                    self.on_transition_expired();
                }
                _ = self.combat_timer.expired(), if self.combat_timer.is_running() => {
                    self.on_combat_round_expired();
                }
            }
        }
        debug!(target: "runtime::session", session = %self.state.id, "worker stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Start { reply } => {
                let result = self.handle_start();
                self.note_rejection("start", &result);
                let _ = reply.send(result);
            }
            Command::Move {
                player,
                direction,
                reply,
            } => {
                let result = self.handle_move(player, direction);
                self.note_rejection("move", &result);
                let _ = reply.send(result);
            }
            Command::EndTurn { player, reply } => {
                let result = self.handle_end_turn(player);
                self.note_rejection("end_turn", &result);
                let _ = reply.send(result);
            }
            Command::StartCombat {
                attacker,
                defender,
                reply,
            } => {
                let result = self.handle_start_combat(attacker, defender);
                self.note_rejection("start_combat", &result);
                let _ = reply.send(result);
            }
            Command::EndCombat { winner, reply } => {
                let result = self.handle_end_combat(winner);
                self.note_rejection("end_combat", &result);
                let _ = reply.send(result);
            }
            Command::ResetCombatRound { reply } => {
                let result = self.handle_reset_combat_round();
                self.note_rejection("reset_combat_round", &result);
                let _ = reply.send(result);
            }
            Command::RemovePlayer { player, reply } => {
                let result = self.handle_remove_player(player);
                self.note_rejection("remove_player", &result);
                let _ = reply.send(result);
            }
            Command::ForceGameOver { winner, reply } => {
                let result = self.handle_force_game_over(winner);
                self.note_rejection("force_game_over", &result);
                let _ = reply.send(result);
            }
            Command::RemainingTurnSeconds { reply } => {
                let _ = reply.send(self.turn_timer.remaining().as_secs());
            }
            Command::QueryState { reply } => {
                let _ = reply.send(self.state.clone());
            }
            Command::QueryEngagement { reply } => {
                let _ = reply.send(self.engagement);
            }
            // Intercepted by run() before dispatch.
            Command::Shutdown => {}
        }
    }

    // ===== lifecycle =====

    fn handle_start(&mut self) -> SessionResult<()> {
        match self.state.turn.phase {
            LifecyclePhase::WaitingForPlayers => {}
            LifecyclePhase::GameOver => return Err(SessionError::SessionOver),
            _ => return Err(SessionError::AlreadyStarted),
        }

        let active = SessionEngine::new(&mut self.state).start_first_turn()?;
        info!(
            target: "runtime::session",
            session = %self.state.id,
            %active,
            "session started"
        );
        self.emit_turn_changed(active);
        self.turn_timer.start(self.turn_duration);
        self.publish_reachable(active)
    }

    fn handle_move(
        &mut self,
        player: PlayerId,
        direction: Direction,
    ) -> SessionResult<MoveOutcome> {
        self.require_turn_active()?;
        if self.engagement.is_some() {
            return Err(SessionError::CombatInProgress);
        }
        if self.state.turn.active_player != Some(player) {
            return Err(SessionError::NotActivePlayer { player });
        }

        let outcome =
            SessionEngine::new(&mut self.state).move_one_step(&self.map, player, direction)?;

        self.emit(Event::Player(PlayerEvent::Moved {
            session: self.state.id,
            player,
            position: outcome.position,
            remaining_points: outcome.remaining_points,
        }));
        self.emit(Event::Player(PlayerEvent::ReachableTiles {
            session: self.state.id,
            player,
            tiles: outcome.reachable.clone(),
        }));
        Ok(outcome)
    }

    fn handle_end_turn(&mut self, player: PlayerId) -> SessionResult<()> {
        self.require_turn_active()?;
        if self.engagement.is_some() {
            return Err(SessionError::CombatInProgress);
        }
        if self.state.turn.active_player != Some(player) {
            return Err(SessionError::NotActivePlayer { player });
        }
        self.end_active_turn()
    }

    /// Stops the turn clock and enters the timed inter-turn transition.
    fn end_active_turn(&mut self) -> SessionResult<()> {
        self.turn_timer.stop();
        let next = SessionEngine::new(&mut self.state).advance_turn()?;
        self.emit_turn_changed(next);
        self.transition_timer.arm(self.transition_duration);
        Ok(())
    }

    fn on_turn_expired(&mut self) {
        // Disarm first: the deadline has elapsed and must not re-fire.
        self.turn_timer.stop();
        if self.state.turn.phase != LifecyclePhase::TurnActive {
            return;
        }
        debug!(
            target: "runtime::session",
            session = %self.state.id,
            "turn clock expired"
        );
        if let Err(error) = self.end_active_turn() {
            error!(
                target: "runtime::session",
                session = %self.state.id,
                %error,
                "failed to end expired turn"
            );
        }
    }

    fn on_transition_expired(&mut self) {
        self.transition_timer.clear();
        if self.state.turn.phase != LifecyclePhase::TurnTransition {
            return;
        }

        match self.game_over_rule.evaluate(&self.state) {
            GameOutcome::Over { winner } => self.finish(winner),
            GameOutcome::Continue => match SessionEngine::new(&mut self.state).begin_turn() {
                Ok(active) => {
                    self.turn_timer.start(self.turn_duration);
                    if let Err(error) = self.publish_reachable(active) {
                        error!(
                            target: "runtime::session",
                            session = %self.state.id,
                            %error,
                            "failed to publish reachable tiles at turn start"
                        );
                    }
                }
                Err(error) => error!(
                    target: "runtime::session",
                    session = %self.state.id,
                    %error,
                    "failed to begin turn after transition"
                ),
            },
        }
    }

    /// Terminal transition: clears every timer and announces the winner.
    fn finish(&mut self, winner: Option<PlayerId>) {
        SessionEngine::new(&mut self.state).finish_session();
        self.turn_timer.stop();
        self.transition_timer.clear();
        self.combat_timer.stop();
        self.engagement = None;
        info!(
            target: "runtime::session",
            session = %self.state.id,
            winner = ?winner,
            "session over"
        );
        self.emit(Event::Turn(TurnEvent::GameOver {
            session: self.state.id,
            winner,
        }));
    }

    // ===== combat =====

    fn handle_start_combat(
        &mut self,
        attacker: Combatant,
        defender: Combatant,
    ) -> SessionResult<()> {
        self.require_turn_active()?;
        if self.engagement.is_some() {
            return Err(SessionError::CombatAlreadyActive);
        }
        for combatant in [attacker.player, defender.player] {
            if !self
                .state
                .players
                .player(combatant)
                .is_some_and(|p| p.in_game)
            {
                return Err(SessionError::PlayerNotFound(combatant));
            }
        }

        // Freeze the turn clock before the round clock starts running.
        self.turn_timer.pause();
        self.engagement = Some(Engagement { attacker, defender });
        self.combat_timer.start();
        debug!(
            target: "runtime::session",
            session = %self.state.id,
            attacker = %attacker.player,
            defender = %defender.player,
            "combat started"
        );
        Ok(())
    }

    fn handle_end_combat(&mut self, winner: Option<PlayerId>) -> SessionResult<()> {
        let engagement = self.engagement.take().ok_or(SessionError::NoActiveCombat)?;
        self.combat_timer.stop();

        let active = self.state.turn.active_player;
        let active_engaged = active.is_some_and(|player| engagement.involves(player));
        if active_engaged && winner != active {
            // The active player lost or fled: their turn ends now and the
            // frozen remainder is discarded.
            self.end_active_turn()
        } else {
            self.turn_timer.resume();
            Ok(())
        }
    }

    fn handle_reset_combat_round(&mut self) -> SessionResult<()> {
        if self.engagement.is_none() {
            return Err(SessionError::NoActiveCombat);
        }
        self.combat_timer.restart_round();
        self.emit(Event::Combat(CombatEvent::RoundReset {
            session: self.state.id,
        }));
        Ok(())
    }

    fn on_combat_round_expired(&mut self) {
        self.combat_timer.restart_round();
        self.emit(Event::Combat(CombatEvent::RoundReset {
            session: self.state.id,
        }));
    }

    // ===== roster =====

    fn handle_remove_player(&mut self, player: PlayerId) -> SessionResult<()> {
        if self.state.turn.phase == LifecyclePhase::GameOver {
            return Err(SessionError::SessionOver);
        }
        if !self
            .state
            .players
            .player(player)
            .is_some_and(|p| p.in_game)
        {
            return Err(SessionError::PlayerNotFound(player));
        }

        // A combatant walking away dissolves the engagement. Resume the
        // frozen turn clock; if the leaver was the active player the
        // transition below stops it again.
        if self.engagement.is_some_and(|e| e.involves(player)) {
            self.engagement = None;
            self.combat_timer.stop();
            self.turn_timer.resume();
        }

        let removal = SessionEngine::new(&mut self.state).remove_player(player)?;
        info!(
            target: "runtime::session",
            session = %self.state.id,
            %player,
            remaining = removal.remaining_in_game,
            "player removed"
        );

        if removal.remaining_in_game <= 1 {
            let winner = SessionEngine::new(&mut self.state).last_player_standing();
            self.finish(winner);
        } else if removal.was_active {
            // Removal already re-pointed the current slot at the next player.
            self.turn_timer.stop();
            let next = SessionEngine::new(&mut self.state).enter_transition_in_place()?;
            self.emit_turn_changed(next);
            self.transition_timer.arm(self.transition_duration);
        }
        Ok(())
    }

    fn handle_force_game_over(&mut self, winner: Option<PlayerId>) -> SessionResult<()> {
        if self.state.turn.phase == LifecyclePhase::GameOver {
            return Err(SessionError::SessionOver);
        }
        self.finish(winner);
        Ok(())
    }

    // ===== helpers =====

    fn require_turn_active(&self) -> SessionResult<()> {
        match self.state.turn.phase {
            LifecyclePhase::TurnActive => Ok(()),
            LifecyclePhase::WaitingForPlayers => Err(SessionError::NotStarted),
            LifecyclePhase::TurnTransition => Err(SessionError::TurnNotActive),
            LifecyclePhase::GameOver => Err(SessionError::SessionOver),
        }
    }

    fn publish_reachable(&mut self, player: PlayerId) -> SessionResult<()> {
        let tiles = SessionEngine::new(&mut self.state).reachable_tiles(&self.map, player)?;
        self.emit(Event::Player(PlayerEvent::ReachableTiles {
            session: self.state.id,
            player,
            tiles,
        }));
        Ok(())
    }

    fn emit_turn_changed(&self, active_player: PlayerId) {
        self.emit(Event::Turn(TurnEvent::Changed {
            session: self.state.id,
            active_player,
            turn_number: self.state.turn.turn_number,
        }));
    }

    fn emit(&self, event: Event) {
        self.bus.publish(event);
    }

    fn note_rejection<T>(&self, command: &'static str, result: &SessionResult<T>) {
        match result {
            Ok(_) => {}
            Err(SessionError::Internal(error)) => error!(
                target: "runtime::session",
                session = %self.state.id,
                command,
                %error,
                "command failed an internal invariant"
            ),
            Err(error) => debug!(
                target: "runtime::session",
                session = %self.state.id,
                command,
                %error,
                "command rejected"
            ),
        }
    }
}
