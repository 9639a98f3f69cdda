//! Immutable per-session environment data.
//!
//! The map snapshot is built once from the game definition when a session is
//! created and never mutated afterwards; engine code reads it through the
//! [`MapOracle`] seam so tests can substitute purpose-built grids.
mod map;

pub use map::{
    MapBuildError, MapDimensions, MapOracle, MapSnapshot, PlaceableKind, TerrainKind, TileCost,
    TileDescriptor,
};
