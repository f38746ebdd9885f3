//! Drop simulation module
//!
//! All outcome logic lives here. This module must stay deterministic:
//! - Seeded RNG only
//! - Paths committed at creation, never revealed progressively
//! - Stable iteration order (creation order)
//! - No rendering, audio or bookkeeping dependencies

pub mod geometry;
pub mod state;
pub mod tick;

pub use geometry::{BoardGeometry, SlotRect, column_offset, jitter_hash, render_position};
pub use state::{
    Direction, DropEvent, DropState, Settlement, Token, TokenId, TokenPhase, TokenSnapshot,
    count_right_moves,
};
pub use tick::{resolve, tick};
