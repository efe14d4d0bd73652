//! Building boards: defensive tiles placed on a build grid.

use serde::{Deserialize, Serialize};
use tessel::MaskError;

use crate::board::Board;
use crate::catalog::{standard_shapes, Catalog, PieceTemplate};

/// What a building tile does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TileKind {
    /// Blocks movement
    Wall,
    /// Shoots at range
    Turret,
    /// Damages whatever steps on it
    Trap,
    /// Buffs neighbours
    Booster,
}

/// Payload of a building tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileData {
    /// Tile behaviour
    pub kind: TileKind,
    /// Damage per activation
    pub damage: u32,
    /// Build cost
    pub cost: u32,
    /// Reach in cells
    pub range: u32,
}

impl TileData {
    /// Create tile data.
    #[must_use]
    pub const fn new(kind: TileKind, damage: u32, cost: u32, range: u32) -> Self {
        Self {
            kind,
            damage,
            cost,
            range,
        }
    }
}

/// A board of building tiles.
pub type BuildingBoard = Board<TileData>;

impl Board<TileData> {
    /// Total damage of the tiles on the grid.
    #[must_use]
    pub fn placed_damage(&self) -> u32 {
        self.placed()
            .fold(0u32, |total, p| total.saturating_add(p.attributes().damage))
    }

    /// Total cost of the tiles on the grid.
    #[must_use]
    pub fn placed_cost(&self) -> u32 {
        self.placed()
            .fold(0u32, |total, p| total.saturating_add(p.attributes().cost))
    }
}

/// The default building catalog, one template per standard shape.
///
/// # Errors
///
/// Returns a [`MaskError`] if a standard shape fails to parse.
pub fn building_catalog() -> Result<Catalog<TileData>, MaskError> {
    let mut catalog = Catalog::new();
    for (name, mask) in standard_shapes()? {
        let cells = u32::try_from(mask.solid_count()).unwrap_or(u32::MAX);
        let data = match name {
            "single" => TileData::new(TileKind::Turret, 4, 3, 3),
            "domino" | "line3" => TileData::new(TileKind::Wall, 0, cells, 0),
            "corner" | "tee" => TileData::new(TileKind::Trap, 2 * cells, 2 * cells, 1),
            "square" => TileData::new(TileKind::Booster, 0, 6, 1),
            _ => TileData::new(TileKind::Turret, 3 * cells, 3 * cells, 2),
        };
        catalog.add(PieceTemplate::new(name, mask, data));
    }
    Ok(catalog)
}
