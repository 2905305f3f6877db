//! Bingo caller core
//!
//! This module must stay pure and deterministic:
//! - Seeded or injected randomness only
//! - Inputs are snapshots; every change returns a new `GameState`
//! - No storage or platform dependencies

pub mod draw;
pub mod state;

pub use draw::{
    DrawDomain, DrawError, DrawOptions, FixedUniform, UniformSource, available_numbers, draw_next,
    draw_next_with,
};
pub use state::{DrawHistoryEntry, GameState};
