//! # Tilecraft Core
//!
//! Drag-and-drop placement for tile and inventory boards.
//!
//! This crate wires the [`tessel`] occupancy grid to an interactive
//! controller and to the two game boards built on it: a building grid of
//! defensive tiles and an inventory bag of items.
//!
//! ## Architecture
//!
//! - **Board**: owning context for one grid, its layout and its pieces
//! - **Controller**: one drag interaction at a time, event driven
//! - **View**: presentation seam the controller reports to
//! - **Catalogs**: spawnable templates and a seeded shop roller
//!
//! There are no global instances. The host builds a [`Board`] from a
//! [`BoardConfig`] and hands references to whoever needs them.
//!
//! ## Usage
//!
//! ```rust
//! use glam::{IVec2, Vec2};
//! use tessel::ShapeMask;
//! use tilecraft_core::{Board, BoardConfig, GridController, InteractionInput, RecordingView};
//!
//! let config = BoardConfig::with_size(4, 4);
//! let mut board: Board<()> = Board::new(&config).unwrap();
//! let mut controller = GridController::new(RecordingView::new());
//! let id = board.spawn(ShapeMask::parse("##").unwrap(), ());
//!
//! let cell = board.layout().cell_at(Vec2::new(150.0, 20.0));
//! board.interact(&mut controller, id, InteractionInput::Begin);
//! board.interact(&mut controller, id, InteractionInput::Move(cell));
//! board.interact(&mut controller, id, InteractionInput::End(cell));
//!
//! assert_eq!(board.get(id).unwrap().grid_position(), Some(IVec2::new(2, 0)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export tessel for grid types
pub use tessel;

pub mod board;
pub mod building;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod inventory;
pub mod view;

pub use board::Board;
pub use building::{building_catalog, BuildingBoard, TileData, TileKind};
pub use catalog::{standard_shapes, Catalog, PieceTemplate, ShopRoller};
pub use config::BoardConfig;
pub use controller::{GridController, InputResult, InteractionInput, InteractionOutcome};
pub use error::BoardError;
pub use inventory::{shop_catalog, InventoryBoard, ItemData, Rarity};
pub use view::{NullView, PlacementView, RecordingView, ViewCommand};

#[cfg(test)]
mod tests;
