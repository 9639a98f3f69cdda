//! High-level runtime orchestrator.
//!
//! The runtime is the session registry: it builds each session's state from
//! the creation payload, spawns the worker task that owns it, and hands out
//! cloneable [`SessionHandle`]s. Sessions are independent tasks; nothing here
//! is shared between them except the event bus.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::info;

use skirmish_core::{PlayerState, SessionId, SessionState};

use crate::api::{
    GameOverRule, LastPlayerStanding, Result, RuntimeError, SessionHandle, SessionSpec,
};
use crate::events::{Event, EventBus, Topic};
use crate::workers::{Command, SessionWorker};

/// Runtime configuration shared across all sessions.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Length of one player turn.
    pub turn_seconds: u64,
    /// Length of the inter-turn transition.
    pub transition_seconds: u64,
    /// Length of one combat round.
    pub combat_round_seconds: u64,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            turn_seconds: 30,
            transition_seconds: 3,
            combat_round_seconds: 5,
            event_buffer_size: 100,
            command_buffer_size: 32,
        }
    }
}

/// Session registry and worker supervisor.
///
/// Each created session runs on its own task; the registry only keeps the
/// command channel and join handle needed to reach and tear it down.
pub struct Runtime {
    config: RuntimeConfig,
    game_over_rule: Arc<dyn GameOverRule>,
    bus: EventBus,
    sessions: HashMap<SessionId, SessionEntry>,
}

struct SessionEntry {
    command_tx: mpsc::Sender<Command>,
    worker: JoinHandle<()>,
}

impl Runtime {
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        let bus = EventBus::with_capacity(config.event_buffer_size);
        Self {
            config,
            game_over_rule: Arc::new(LastPlayerStanding),
            bus,
            sessions: HashMap::new(),
        }
    }

    /// Replaces the game-over predicate checked at every turn transition.
    pub fn with_game_over_rule(mut self, rule: impl GameOverRule + 'static) -> Self {
        self.game_over_rule = Arc::new(rule);
        self
    }

    /// Creates a session from its creation payload and spawns its worker.
    ///
    /// Must be called within a tokio runtime context.
    pub fn create_session(&mut self, spec: SessionSpec) -> Result<SessionHandle> {
        if self.sessions.contains_key(&spec.id) {
            return Err(RuntimeError::SessionAlreadyExists(spec.id));
        }

        let players: Vec<PlayerState> = spec
            .players
            .iter()
            .map(|p| {
                let mut player = PlayerState::new(p.id, p.start_position, p.allowance);
                player.team = p.team;
                player
            })
            .collect();
        let state = SessionState::new(spec.id, &spec.map, players, &spec.turn_order)
            .map_err(RuntimeError::InitialState)?;

        let (command_tx, command_rx) = mpsc::channel(self.config.command_buffer_size);
        let worker = SessionWorker::new(
            state,
            spec.map,
            &self.config,
            Arc::clone(&self.game_over_rule),
            command_rx,
            self.bus.clone(),
        );
        let join = tokio::spawn(worker.run());

        info!(target: "runtime", session = %spec.id, "session created");
        self.sessions.insert(
            spec.id,
            SessionEntry {
                command_tx: command_tx.clone(),
                worker: join,
            },
        );
        Ok(SessionHandle::new(spec.id, command_tx, self.bus.clone()))
    }

    /// Handle to an existing session.
    pub fn session(&self, id: SessionId) -> Result<SessionHandle> {
        let entry = self
            .sessions
            .get(&id)
            .ok_or(RuntimeError::SessionNotFound(id))?;
        Ok(SessionHandle::new(
            id,
            entry.command_tx.clone(),
            self.bus.clone(),
        ))
    }

    /// Subscribe to events from a specific topic, across all sessions.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.bus.subscribe(topic)
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.bus
    }

    /// Tears one session down: its worker cancels all pending timers by
    /// exiting; late commands from outstanding handles fail with a closed
    /// channel.
    pub async fn close_session(&mut self, id: SessionId) -> Result<()> {
        let entry = self
            .sessions
            .remove(&id)
            .ok_or(RuntimeError::SessionNotFound(id))?;
        // Ignore a send failure: the worker already stopped on its own.
        let _ = entry.command_tx.send(Command::Shutdown).await;
        entry.worker.await.map_err(RuntimeError::WorkerJoin)?;
        info!(target: "runtime", session = %id, "session closed");
        Ok(())
    }

    /// Shuts every session down gracefully.
    pub async fn shutdown(mut self) -> Result<()> {
        let ids: Vec<SessionId> = self.sessions.keys().copied().collect();
        for id in ids {
            self.close_session(id).await?;
        }
        Ok(())
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}
