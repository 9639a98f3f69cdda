/// Game configuration constants.
///
/// Session-tunable values (turn length, combat round length) live in the
/// runtime layer; everything here is fixed by the rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameConfig;

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of players in one session.
    pub const MAX_PLAYERS: usize = 6;
    /// Maximum number of placeables sharing one tile (e.g. boat + start point).
    pub const MAX_PLACEABLES_PER_TILE: usize = 2;

    // ===== traversal cost classes =====
    /// Cost of ordinary passable terrain and open doors.
    pub const BASE_COST: u32 = 1;
    /// Cost of water when crossed without a boat.
    pub const WATER_COST: u32 = 2;
    /// Cost of water while the mover started the search on a boat tile.
    pub const BOAT_WATER_COST: u32 = 1;

    /// Movement points granted per turn when the lobby does not configure a
    /// per-player allowance.
    pub const DEFAULT_ALLOWANCE: u32 = 6;
}
