//! Cloneable façade for issuing commands to one session.
//!
//! [`SessionHandle`] hides the channel plumbing and offers async helpers for
//! driving the session or streaming events from specific topics.

use tokio::sync::{broadcast, mpsc, oneshot};

use skirmish_core::{Direction, MoveOutcome, PlayerId, SessionId, SessionState};

use super::errors::{Result, RuntimeError};
use super::types::{Combatant, Engagement};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with one session worker.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    session: SessionId,
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl SessionHandle {
    pub(crate) fn new(
        session: SessionId,
        command_tx: mpsc::Sender<Command>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            session,
            command_tx,
            event_bus,
        }
    }

    pub fn id(&self) -> SessionId {
        self.session
    }

    /// Starts the session: the first player in the turn order becomes active
    /// and their turn clock begins.
    pub async fn start(&self) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::Start { reply: reply_tx }).await?;
        Ok(self.recv(reply_rx).await??)
    }

    /// Moves `player` one tile. Only the active player may move; failures
    /// leave the session unchanged.
    pub async fn move_player(&self, player: PlayerId, direction: Direction) -> Result<MoveOutcome> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::Move {
            player,
            direction,
            reply: reply_tx,
        })
        .await?;
        Ok(self.recv(reply_rx).await??)
    }

    /// Ends `player`'s turn early. Rejected for anyone but the active player.
    pub async fn end_turn(&self, player: PlayerId) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::EndTurn {
            player,
            reply: reply_tx,
        })
        .await?;
        Ok(self.recv(reply_rx).await??)
    }

    /// Opens a combat engagement between two in-game players, freezing the
    /// active player's turn clock.
    pub async fn start_combat(&self, attacker: Combatant, defender: Combatant) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::StartCombat {
            attacker,
            defender,
            reply: reply_tx,
        })
        .await?;
        Ok(self.recv(reply_rx).await??)
    }

    /// Resolves the engagement. If the active player was engaged and is not
    /// the winner, their turn ends immediately; otherwise the turn clock
    /// resumes from its frozen remainder.
    pub async fn end_combat(&self, winner: Option<PlayerId>) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::EndCombat {
            winner,
            reply: reply_tx,
        })
        .await?;
        Ok(self.recv(reply_rx).await??)
    }

    /// Snaps the combat round countdown back to its full duration, as when
    /// both combatants have acted.
    pub async fn reset_combat_round(&self) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::ResetCombatRound { reply: reply_tx })
            .await?;
        Ok(self.recv(reply_rx).await??)
    }

    /// Removes a player who left the session.
    pub async fn remove_player(&self, player: PlayerId) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::RemovePlayer {
            player,
            reply: reply_tx,
        })
        .await?;
        Ok(self.recv(reply_rx).await??)
    }

    /// Forces the session into game over with the given winner.
    pub async fn force_game_over(&self, winner: Option<PlayerId>) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::ForceGameOver {
            winner,
            reply: reply_tx,
        })
        .await?;
        Ok(self.recv(reply_rx).await??)
    }

    /// Seconds left on the live turn clock. Zero while the clock is paused
    /// by combat, stopped, or not yet started.
    pub async fn remaining_turn_seconds(&self) -> Result<u64> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::RemainingTurnSeconds { reply: reply_tx })
            .await?;
        self.recv(reply_rx).await
    }

    /// Query the current session state (read-only snapshot).
    pub async fn query_state(&self) -> Result<SessionState> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::QueryState { reply: reply_tx }).await?;
        self.recv(reply_rx).await
    }

    /// The live combat engagement, if any.
    pub async fn engagement(&self) -> Result<Option<Engagement>> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::QueryEngagement { reply: reply_tx })
            .await?;
        self.recv(reply_rx).await
    }

    /// Subscribe to events from a specific topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Get a reference to the event bus for advanced usage.
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }

    async fn recv<T>(&self, reply_rx: oneshot::Receiver<T>) -> Result<T> {
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }
}
