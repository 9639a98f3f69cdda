mod common;
mod player;
mod turn;
mod world;

pub use common::{Direction, PlayerId, Position, SessionId, TeamId};
pub use player::{PlayerState, RosterState};
pub use turn::{LifecyclePhase, TurnOrder, TurnState};
pub use world::WorldState;
