//! Cross-module tests for boards and the grid controller.
//!
//! - `integration.rs`: end-to-end drag flows through [`Board`](crate::Board)
//! - `properties.rs`: randomized invariants of the occupancy grid
//! - `helpers.rs`: shared setup

mod helpers;
