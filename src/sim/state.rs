//! Drop state and core simulation types
//!
//! The engine owns every in-flight token. Tokens leave the active set on the
//! tick that settles them; the host only sees snapshots and drained events.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use glam::Vec2;

use super::geometry::{BoardGeometry, render_position};
use crate::consts::TOKEN_PALETTE;
use crate::error::ConfigError;
use crate::multipliers::{GridConfig, Slot};
use crate::tuning::Tuning;

pub type TokenId = u32;

/// One branching choice at a peg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Horizontal displacement in peg spacings
    #[inline]
    pub fn offset(self) -> f32 {
        match self {
            Direction::Left => -0.5,
            Direction::Right => 0.5,
        }
    }
}

/// Number of right moves in a path, which is also its slot index
pub fn count_right_moves(path: &[Direction]) -> usize {
    path.iter().filter(|&&d| d == Direction::Right).count()
}

/// Lifecycle of a token, derived from its row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenPhase {
    /// Dropping from the spawner to the first peg row
    Spawning,
    /// Between peg rows
    Falling,
    /// Landed in a slot (terminal)
    Settled,
}

/// One in-flight drop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    /// Amount wagered, echoed back on settlement
    pub bet: f64,
    /// Grid configuration frozen at creation
    pub config: GridConfig,
    /// Display color (0xRRGGBB)
    pub color: u32,
    /// Pre-committed branching choices, one per row
    pub(crate) path: Vec<Direction>,
    /// -1 while spawning, `rows` once settled
    pub(crate) row: i32,
    /// Fraction of the current row transition, in [0, 1)
    pub(crate) progress: f32,
}

impl Token {
    pub(crate) fn new(
        id: TokenId,
        bet: f64,
        config: GridConfig,
        color: u32,
        path: Vec<Direction>,
    ) -> Self {
        Self {
            id,
            bet,
            config,
            color,
            path,
            row: -1,
            progress: 0.0,
        }
    }

    pub fn path(&self) -> &[Direction] {
        &self.path
    }

    pub fn row(&self) -> i32 {
        self.row
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn phase(&self) -> TokenPhase {
        if self.row < 0 {
            TokenPhase::Spawning
        } else if self.row < self.config.rows.get() as i32 {
            TokenPhase::Falling
        } else {
            TokenPhase::Settled
        }
    }

    #[inline]
    pub fn is_settled(&self) -> bool {
        self.phase() == TokenPhase::Settled
    }

    pub fn right_moves(&self) -> usize {
        count_right_moves(&self.path)
    }
}

/// Final outcome of a token
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub id: TokenId,
    pub slot_index: usize,
    pub multiplier: f64,
    pub bet: f64,
}

impl Settlement {
    /// Amount returned to the player
    pub fn payout(&self) -> f64 {
        self.bet * self.multiplier
    }
}

/// Events emitted by a tick, drained by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DropEvent {
    /// Token reached peg row `row` (never the spawn entry or the slot row)
    RowCrossed { id: TokenId, row: u8, depth: f32 },
    /// Token landed; fires exactly once per token
    Settled(Settlement),
}

/// Read-only view of a token for drawing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TokenSnapshot {
    pub id: TokenId,
    pub phase: TokenPhase,
    pub row: i32,
    pub progress: f32,
    pub position: Vec2,
    pub color: u32,
}

/// Engine state: active tokens, RNG and pending events
#[derive(Debug, Clone)]
pub struct DropState {
    /// Seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    /// Simulation tick counter (ticks with at least one token)
    pub time_ticks: u64,
    /// Events produced since the last drain
    pub(crate) events: Vec<DropEvent>,
    /// Active tokens in creation order
    pub(crate) tokens: Vec<Token>,
    config: GridConfig,
    rng: Pcg32,
    next_id: TokenId,
}

impl DropState {
    /// Create an engine with the given configuration and seed
    pub fn new(config: GridConfig, seed: u64) -> Self {
        Self {
            seed,
            tuning: Tuning::default(),
            time_ticks: 0,
            events: Vec::new(),
            tokens: Vec::new(),
            config,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Create an engine with custom tuning, rejecting values that would stall a drop
    pub fn with_tuning(config: GridConfig, seed: u64, tuning: Tuning) -> Result<Self, ConfigError> {
        tuning.validate()?;
        Ok(Self {
            tuning,
            ..Self::new(config, seed)
        })
    }

    pub fn config(&self) -> GridConfig {
        self.config
    }

    /// Switch configuration for tokens created from now on.
    /// In-flight tokens keep resolving against the table they were created with.
    pub fn configure(&mut self, config: GridConfig) {
        if config != self.config {
            log::info!(
                "Grid reconfigured: {} rows / {} risk ({} tokens in flight keep their table)",
                config.rows,
                config.risk,
                self.tokens.len()
            );
        }
        self.config = config;
    }

    /// Slot table for the current configuration
    pub fn slots(&self) -> Vec<Slot> {
        self.config.slots()
    }

    /// Active tokens in creation order
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token(&self, id: TokenId) -> Option<&Token> {
        self.tokens.iter().find(|t| t.id == id)
    }

    pub fn active_count(&self) -> usize {
        self.tokens.len()
    }

    fn next_token_id(&mut self) -> TokenId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Create a token with a freshly flipped path.
    /// The bet must already be reserved by the caller.
    pub fn spawn(&mut self, bet: f64) -> TokenId {
        let rows = self.config.rows.get();
        let path = (0..rows)
            .map(|_| {
                if self.rng.random_bool(0.5) {
                    Direction::Right
                } else {
                    Direction::Left
                }
            })
            .collect();
        self.insert(bet, path)
    }

    /// Create a token with a caller-supplied path (replays, tests)
    pub fn spawn_with_path(
        &mut self,
        bet: f64,
        path: Vec<Direction>,
    ) -> Result<TokenId, ConfigError> {
        let expected = self.config.rows.get() as usize;
        if path.len() != expected {
            return Err(ConfigError::PathLength {
                expected,
                actual: path.len(),
            });
        }
        Ok(self.insert(bet, path))
    }

    fn insert(&mut self, bet: f64, path: Vec<Direction>) -> TokenId {
        let color = TOKEN_PALETTE[self.rng.random_range(0..TOKEN_PALETTE.len())];
        let id = self.next_token_id();
        self.tokens.push(Token::new(id, bet, self.config, color, path));
        id
    }

    /// Remove a token between ticks; no event fires for it
    pub fn cancel(&mut self, id: TokenId) -> Option<Token> {
        let idx = self.tokens.iter().position(|t| t.id == id)?;
        Some(self.tokens.remove(idx))
    }

    /// Drop every in-flight token and pending event
    pub fn reset(&mut self) {
        if !self.tokens.is_empty() {
            log::info!("Engine reset, discarding {} tokens", self.tokens.len());
        }
        self.tokens.clear();
        self.events.clear();
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<DropEvent> {
        std::mem::take(&mut self.events)
    }

    /// Positions of every active token for the current frame
    pub fn snapshots(&self, geometry: &BoardGeometry) -> Vec<TokenSnapshot> {
        self.tokens
            .iter()
            .map(|t| TokenSnapshot {
                id: t.id,
                phase: t.phase(),
                row: t.row,
                progress: t.progress,
                position: render_position(t, geometry, &self.tuning),
                color: t.color,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multipliers::{RiskTier, RowCount};

    fn config(rows: RowCount) -> GridConfig {
        GridConfig {
            rows,
            risk: RiskTier::Medium,
        }
    }

    #[test]
    fn test_spawn_initial_state() {
        let mut state = DropState::new(config(RowCount::Twelve), 7);
        let id = state.spawn(5.0);
        let token = state.token(id).unwrap();

        assert_eq!(token.path().len(), 12);
        assert_eq!(token.row(), -1);
        assert_eq!(token.progress(), 0.0);
        assert_eq!(token.phase(), TokenPhase::Spawning);
        assert_eq!(token.bet, 5.0);
        assert!(TOKEN_PALETTE.contains(&token.color));
    }

    #[test]
    fn test_ids_are_unique_and_ordered() {
        let mut state = DropState::new(config(RowCount::Eight), 1);
        let ids: Vec<_> = (0..5).map(|_| state.spawn(1.0)).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        let order: Vec<_> = state.tokens().iter().map(|t| t.id).collect();
        assert_eq!(order, ids);
    }

    #[test]
    fn test_same_seed_same_paths() {
        let mut a = DropState::new(config(RowCount::Sixteen), 42);
        let mut b = DropState::new(config(RowCount::Sixteen), 42);
        for _ in 0..10 {
            a.spawn(1.0);
            b.spawn(1.0);
        }
        for (ta, tb) in a.tokens().iter().zip(b.tokens()) {
            assert_eq!(ta.path(), tb.path());
            assert_eq!(ta.color, tb.color);
        }
    }

    #[test]
    fn test_spawn_with_path_checks_length() {
        let mut state = DropState::new(config(RowCount::Eight), 0);
        let err = state
            .spawn_with_path(1.0, vec![Direction::Left; 7])
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::PathLength {
                expected: 8,
                actual: 7
            }
        );
        assert_eq!(state.active_count(), 0);
    }

    #[test]
    fn test_configure_freezes_in_flight_config() {
        let mut state = DropState::new(config(RowCount::Eight), 3);
        let old = state.spawn(1.0);
        state.configure(GridConfig {
            rows: RowCount::Sixteen,
            risk: RiskTier::High,
        });
        let new = state.spawn(1.0);

        assert_eq!(state.token(old).unwrap().config.rows, RowCount::Eight);
        assert_eq!(state.token(old).unwrap().path().len(), 8);
        assert_eq!(state.token(new).unwrap().path().len(), 16);
        assert_eq!(state.slots().len(), 17);
    }

    #[test]
    fn test_cancel_and_reset() {
        let mut state = DropState::new(config(RowCount::Eight), 3);
        let a = state.spawn(1.0);
        let b = state.spawn(1.0);
        assert_eq!(state.cancel(a).map(|t| t.id), Some(a));
        assert!(state.cancel(a).is_none());
        assert_eq!(state.active_count(), 1);
        assert!(state.token(b).is_some());

        state.reset();
        assert_eq!(state.active_count(), 0);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_with_tuning_rejects_stalling_speed() {
        let tuning = Tuning {
            base_speed: -10.0,
            ..Default::default()
        };
        let cfg = config(RowCount::Eight);
        let err = DropState::with_tuning(cfg, 1, tuning).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidTuning {
                field: "base_speed",
                ..
            }
        ));

        let state = DropState::with_tuning(cfg, 1, Tuning::default()).unwrap();
        assert_eq!(state.tuning, Tuning::default());
    }

    #[test]
    fn test_count_right_moves() {
        use Direction::*;
        assert_eq!(count_right_moves(&[Left, Right, Right, Left]), 2);
        assert_eq!(count_right_moves(&[]), 0);
    }
}
