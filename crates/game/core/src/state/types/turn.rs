use arrayvec::ArrayVec;

use crate::config::GameConfig;

use super::PlayerId;

/// Fixed cyclic sequence of player ids determining whose turn follows whose.
/// Shrinks only when a player leaves the session.
pub type TurnOrder = ArrayVec<PlayerId, { GameConfig::MAX_PLAYERS }>;

/// Lifecycle phase of the session turn state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LifecyclePhase {
    /// Initial phase, before the first turn has started.
    WaitingForPlayers,
    /// A player's turn is running (their turn clock may be paused by combat).
    TurnActive,
    /// Brief timed interval between one turn ending and the next beginning.
    TurnTransition,
    /// Terminal phase. No further commands mutate the session.
    GameOver,
}

/// Turn bookkeeping for one session.
///
/// Invariant: `active_player == Some(order[current_index])` whenever `phase`
/// is neither [`LifecyclePhase::WaitingForPlayers`] nor
/// [`LifecyclePhase::GameOver`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    pub phase: LifecyclePhase,

    pub order: TurnOrder,

    /// Index into `order` of the player whose turn it is (or is next).
    pub current_index: usize,

    /// The player currently taking their turn. `None` until the session
    /// starts and after it ends.
    pub active_player: Option<PlayerId>,

    /// Monotonic turn counter, starting at 1 on the first turn.
    pub turn_number: u64,
}

impl TurnState {
    pub fn new(order: TurnOrder) -> Self {
        Self {
            phase: LifecyclePhase::WaitingForPlayers,
            order,
            current_index: 0,
            active_player: None,
            turn_number: 0,
        }
    }
}
