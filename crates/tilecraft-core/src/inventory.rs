//! Inventory boards: items packed into a bag grid.

use std::fmt;

use serde::{Deserialize, Serialize};
use tessel::{MaskError, PieceId};
use tracing::debug;

use crate::board::Board;
use crate::catalog::{standard_shapes, Catalog, PieceTemplate};

/// Item rarity. Rarer items roll less often.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Rarity {
    /// Most items
    #[default]
    Common,
    /// Slightly better
    Uncommon,
    /// Hard to find
    Rare,
    /// One per run, if lucky
    Legendary,
}

impl Rarity {
    /// Roll weight used by [`shop_catalog`].
    #[must_use]
    pub const fn weight(self) -> u32 {
        match self {
            Rarity::Common => 60,
            Rarity::Uncommon => 25,
            Rarity::Rare => 12,
            Rarity::Legendary => 3,
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Legendary => "legendary",
        };
        f.write_str(name)
    }
}

/// Payload of an inventory item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemData {
    /// Display name
    pub name: String,
    /// Shop price; also the sell value
    pub price: u32,
    /// Rarity tier
    pub rarity: Rarity,
}

impl ItemData {
    /// Create item data.
    #[must_use]
    pub fn new(name: impl Into<String>, price: u32, rarity: Rarity) -> Self {
        Self {
            name: name.into(),
            price,
            rarity,
        }
    }
}

/// A bag of items.
pub type InventoryBoard = Board<ItemData>;

impl Board<ItemData> {
    /// Total price of the items in the bag.
    #[must_use]
    pub fn inventory_value(&self) -> u32 {
        self.placed()
            .fold(0u32, |total, p| total.saturating_add(p.attributes().price))
    }

    /// Remove an item from the board and return its price.
    pub fn sell(&mut self, id: PieceId) -> Option<u32> {
        let piece = self.despawn(id)?;
        let item = piece.attributes();
        debug!(piece = %id, name = %item.name, price = item.price, "item sold");
        Some(item.price)
    }
}

/// The default shop catalog, one item per standard shape.
///
/// Bigger shapes are rarer and pricier.
///
/// # Errors
///
/// Returns a [`MaskError`] if a standard shape fails to parse.
pub fn shop_catalog() -> Result<Catalog<ItemData>, MaskError> {
    let mut catalog = Catalog::new();
    for (name, mask) in standard_shapes()? {
        let rarity = match mask.solid_count() {
            0..=1 => Rarity::Common,
            2..=3 => Rarity::Uncommon,
            4 => Rarity::Rare,
            _ => Rarity::Legendary,
        };
        let cells = u32::try_from(mask.solid_count()).unwrap_or(u32::MAX);
        let price = cells * (rarity as u32 + 1) * 5;
        catalog.add(
            PieceTemplate::new(name, mask, ItemData::new(name, price, rarity))
                .with_weight(rarity.weight()),
        );
    }
    Ok(catalog)
}
