use std::collections::BTreeMap;

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::state::Position;

type PlaceableSlots = ArrayVec<PlaceableKind, { GameConfig::MAX_PLACEABLES_PER_TILE }>;

/// Read-only view of a session's grid, built once from the immutable game
/// definition when the session starts.
///
/// Occupancy is deliberately not part of this trait: tiles and placeables
/// never change during a session, while occupancy lives in
/// [`crate::state::WorldState`] and is rewritten on every move.
pub trait MapOracle: Send + Sync {
    fn dimensions(&self) -> MapDimensions;

    /// Tile descriptor at `position`, or `None` outside the grid.
    fn tile(&self, position: Position) -> Option<TileDescriptor>;

    /// Placeables anchored on `position` (boat, start point, flag).
    fn placeables_at(&self, position: Position) -> &[PlaceableKind];

    fn contains(&self, position: Position) -> bool {
        self.dimensions().contains(position)
    }

    /// True when a boat placeable sits on `position`. Movers departing from a
    /// boat tile cross water at the reduced cost.
    fn has_boat(&self, position: Position) -> bool {
        self.placeables_at(position).contains(&PlaceableKind::Boat)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDimensions {
    pub width: u32,
    pub height: u32,
}

impl MapDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }
}

/// Traversal cost class of a tile for one step onto it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TileCost {
    Passable(u32),
    /// Sentinel for blocked terrain and closed doors.
    Impassable,
}

/// Canonical terrain classes for grid tiles. Door state is fixed for the
/// session's lifetime; toggling doors is a collaborator concern outside this
/// core.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerrainKind {
    Floor,
    Water,
    Wall,
    OpenDoor,
    ClosedDoor,
}

/// Immutable descriptor for one cell of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileDescriptor {
    terrain: TerrainKind,
}

impl TileDescriptor {
    pub const fn new(terrain: TerrainKind) -> Self {
        Self { terrain }
    }

    pub fn terrain(self) -> TerrainKind {
        self.terrain
    }

    pub fn is_closed_door(self) -> bool {
        self.terrain == TerrainKind::ClosedDoor
    }

    /// Cost of stepping onto this tile. `on_boat` is the mover's status at
    /// the start of the move or search, not re-derived per step.
    pub fn cost(self, on_boat: bool) -> TileCost {
        match self.terrain {
            TerrainKind::Floor | TerrainKind::OpenDoor => {
                TileCost::Passable(GameConfig::BASE_COST)
            }
            TerrainKind::Water if on_boat => TileCost::Passable(GameConfig::BOAT_WATER_COST),
            TerrainKind::Water => TileCost::Passable(GameConfig::WATER_COST),
            TerrainKind::Wall | TerrainKind::ClosedDoor => TileCost::Impassable,
        }
    }
}

/// Objects anchored on tiles by the game definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlaceableKind {
    /// Lets the mover cross water at the reduced cost while departing from it.
    Boat,
    /// Player spawn marker; informational for this core.
    StartPoint,
    /// Capture objective; win detection happens in the collaborator that
    /// forces game over.
    Flag,
}

/// Concrete per-session map cache: row-major tile storage plus a placeable
/// index, O(1) lookups all around.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapSnapshot {
    dimensions: MapDimensions,
    tiles: Vec<TileDescriptor>,
    placeables: BTreeMap<Position, PlaceableSlots>,
}

/// Errors detected while assembling a [`MapSnapshot`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MapBuildError {
    #[error("expected {expected} tiles for {width}x{height}, got {actual}")]
    TileCountMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("placeable position {0} is outside the map")]
    PlaceableOutOfBounds(Position),

    #[error("tile {0} already holds the maximum number of placeables")]
    PlaceableSlotsFull(Position),
}

impl MapSnapshot {
    /// Builds a snapshot from row-major tile data.
    pub fn new(
        dimensions: MapDimensions,
        tiles: Vec<TileDescriptor>,
    ) -> Result<Self, MapBuildError> {
        let expected = dimensions.width as usize * dimensions.height as usize;
        if tiles.len() != expected {
            return Err(MapBuildError::TileCountMismatch {
                width: dimensions.width,
                height: dimensions.height,
                expected,
                actual: tiles.len(),
            });
        }
        Ok(Self {
            dimensions,
            tiles,
            placeables: BTreeMap::new(),
        })
    }

    /// Uniform map of a single terrain kind.
    pub fn filled(dimensions: MapDimensions, terrain: TerrainKind) -> Self {
        let count = dimensions.width as usize * dimensions.height as usize;
        Self {
            dimensions,
            tiles: vec![TileDescriptor::new(terrain); count],
            placeables: BTreeMap::new(),
        }
    }

    /// Replaces one tile. Out-of-bounds positions are ignored.
    pub fn set_tile(&mut self, position: Position, terrain: TerrainKind) {
        if let Some(index) = self.index_of(position) {
            self.tiles[index] = TileDescriptor::new(terrain);
        }
    }

    pub fn add_placeable(
        &mut self,
        position: Position,
        kind: PlaceableKind,
    ) -> Result<(), MapBuildError> {
        if !self.dimensions.contains(position) {
            return Err(MapBuildError::PlaceableOutOfBounds(position));
        }
        self.placeables
            .entry(position)
            .or_default()
            .try_push(kind)
            .map_err(|_| MapBuildError::PlaceableSlotsFull(position))
    }

    fn index_of(&self, position: Position) -> Option<usize> {
        if !self.dimensions.contains(position) {
            return None;
        }
        Some(position.y as usize * self.dimensions.width as usize + position.x as usize)
    }
}

impl MapOracle for MapSnapshot {
    fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    fn tile(&self, position: Position) -> Option<TileDescriptor> {
        self.index_of(position).map(|i| self.tiles[i])
    }

    fn placeables_at(&self, position: Position) -> &[PlaceableKind] {
        self.placeables
            .get(&position)
            .map(|slots| slots.as_slice())
            .unwrap_or(&[])
    }
}
