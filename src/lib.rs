//! Plinko Drop - a peg-grid drop game engine
//!
//! Core modules:
//! - `multipliers`: Payout tables and slot colors per grid size and risk tier
//! - `sim`: Token simulation (pre-committed paths, per-frame advance, settlement)
//! - `audio`: Sound sink capability handed to the host
//! - `wallet`: Balance and payout history (consumes settlement events)
//! - `session`: Host wiring between the engine and its collaborators
//! - `tuning`: Data-driven engine constants

pub mod audio;
pub mod error;
pub mod multipliers;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod wallet;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::{ConfigError, WalletError};
pub use multipliers::{GridConfig, RiskTier, RowCount, Slot, SlotColor};
pub use session::Session;
pub use settings::Settings;
pub use tuning::Tuning;
pub use wallet::Wallet;

/// Board layout and timing constants
pub mod consts {
    /// Space above the first peg row (pixels)
    pub const PADDING_TOP: f32 = 50.0;
    /// Space below the last peg row, room for the payout boxes (pixels)
    pub const PADDING_BOTTOM: f32 = 90.0;
    /// Height of the spawner tokens drop from
    pub const SPAWN_Y: f32 = 20.0;

    /// Peg radius bounds (pixels)
    pub const PEG_RADIUS_MIN: f32 = 2.0;
    pub const PEG_RADIUS_MAX: f32 = 4.0;
    /// Token radius relative to peg radius
    pub const TOKEN_RADIUS_SCALE: f32 = 2.2;

    /// Slot box height bounds (pixels)
    pub const SLOT_BOX_MIN_HEIGHT: f32 = 24.0;
    pub const SLOT_BOX_MAX_HEIGHT: f32 = 40.0;

    /// Wallet defaults
    pub const STARTING_BALANCE: f64 = 1000.0;
    pub const DEFAULT_BET: f64 = 10.0;
    pub const MAX_HISTORY: usize = 12;

    /// Token colors (0xRRGGBB)
    pub const TOKEN_PALETTE: [u32; 7] = [
        0xef4444, 0xf97316, 0xeab308, 0x22c55e, 0x3b82f6, 0xa855f7, 0xec4899,
    ];
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Half-sine arc over `t` in [0, 1]: 0 at both ends, 1 at the midpoint
#[inline]
pub fn arc01(t: f32) -> f32 {
    (t * std::f32::consts::PI).sin()
}

/// Split a 0xRRGGBB color into its channels
#[inline]
pub fn hex_to_rgb(hex: u32) -> [u8; 3] {
    [(hex >> 16) as u8, (hex >> 8) as u8, hex as u8]
}
