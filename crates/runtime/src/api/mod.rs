//! Types downstream clients interact with.

mod errors;
mod handle;
mod types;

pub use errors::{Result, RuntimeError, SessionError};
pub use handle::SessionHandle;
pub use types::{
    Combatant, Engagement, GameOutcome, GameOverRule, LastPlayerStanding, PlayerSpec, SessionSpec,
    TileEffect,
};
