//! Unified error types surfaced by the runtime API.
//!
//! Wraps per-request rejections from session workers and channel/join
//! failures so clients can bubble them up with consistent context.

use thiserror::Error;
use tokio::sync::oneshot;

use skirmish_core::{InitializationError, MoveError, PlayerId, SessionId, TurnError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("session {0} not found")]
    SessionNotFound(SessionId),

    #[error("session {0} already exists")]
    SessionAlreadyExists(SessionId),

    #[error("failed to initialize session state")]
    InitialState(#[source] InitializationError),

    #[error("session command channel closed")]
    CommandChannelClosed,

    #[error("session reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("session worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Per-request rejection from a session worker. The session's state is
/// unchanged whenever one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// NotFound class: the request names a player the session does not know
    /// (or one that already left).
    #[error("player {0} not found in session")]
    PlayerNotFound(PlayerId),

    /// NotFound / InvalidMove / Occupied classes, straight from the
    /// movement engine.
    #[error(transparent)]
    Move(#[from] MoveError),

    /// Forbidden class: only the active player may move or end the turn.
    #[error("player {player} is not the active player")]
    NotActivePlayer { player: PlayerId },

    /// IllegalState class: the session has not started yet.
    #[error("session has not started")]
    NotStarted,

    /// IllegalState class: the session already started.
    #[error("session already started")]
    AlreadyStarted,

    /// IllegalState class: the session reached its terminal phase.
    #[error("session is over")]
    SessionOver,

    /// IllegalState class: the request needs an active turn but the session
    /// is between turns.
    #[error("no turn is active")]
    TurnNotActive,

    /// IllegalState class: a second combat cannot start while one is live.
    #[error("a combat is already in progress")]
    CombatAlreadyActive,

    /// IllegalState class: combat resolution arrived with no live combat.
    #[error("no combat in progress")]
    NoActiveCombat,

    /// IllegalState class: movement and turn-end are blocked while the turn
    /// clock is frozen by combat.
    #[error("a combat is in progress")]
    CombatInProgress,

    /// Turn bookkeeping failed an internal invariant. Logged by the worker;
    /// indicates a protocol bug rather than a bad request.
    #[error("internal turn bookkeeping error")]
    Internal(#[from] TurnError),
}
