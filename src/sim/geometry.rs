//! Board geometry and token render interpolation
//!
//! Peg row `r` sits at `padding_top + r * spacing`; peg `c` of that row at
//! `width / 2 + (c - r / 2) * spacing`. Slot `i` lines up under the bottom row
//! at `width / 2 + (i - rows / 2) * spacing`.
//!
//! Nothing here feeds back into resolution: bounce and jitter are cosmetic.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Direction, Token, TokenId};
use crate::consts::*;
use crate::multipliers::RowCount;
use crate::tuning::Tuning;
use crate::{arc01, lerp};

/// Canvas-space layout of the peg grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoardGeometry {
    pub width: f32,
    pub height: f32,
    pub padding_top: f32,
    pub padding_bottom: f32,
    pub spawn_y: f32,
}

/// Axis-aligned box for a payout slot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlotRect {
    pub center: Vec2,
    pub size: Vec2,
}

impl BoardGeometry {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            padding_top: PADDING_TOP,
            padding_bottom: PADDING_BOTTOM,
            spawn_y: SPAWN_Y,
        }
    }

    /// Distance between adjacent pegs, both across and down
    pub fn spacing(&self, rows: RowCount) -> f32 {
        let usable = self.height - self.padding_top - self.padding_bottom;
        (usable / rows.get() as f32).max(0.0)
    }

    /// Horizontal center of the board
    #[inline]
    pub fn origin_x(&self) -> f32 {
        self.width / 2.0
    }

    pub fn row_y(&self, row: i32, rows: RowCount) -> f32 {
        self.padding_top + row as f32 * self.spacing(rows)
    }

    pub fn peg_radius(&self, rows: RowCount) -> f32 {
        (self.spacing(rows) * 0.15).clamp(PEG_RADIUS_MIN, PEG_RADIUS_MAX)
    }

    pub fn token_radius(&self, rows: RowCount) -> f32 {
        self.peg_radius(rows) * TOKEN_RADIUS_SCALE
    }

    /// Every peg center, top row first (rows 0..=rows, row r has r + 1 pegs)
    pub fn pegs(&self, rows: RowCount) -> Vec<Vec2> {
        let spacing = self.spacing(rows);
        let n = rows.get() as i32;
        (0..=n)
            .flat_map(|row| {
                (0..=row).map(move |col| {
                    Vec2::new(
                        self.origin_x() + (col as f32 - row as f32 / 2.0) * spacing,
                        self.row_y(row, rows),
                    )
                })
            })
            .collect()
    }

    /// Payout boxes under the bottom row, left to right
    pub fn slot_rects(&self, rows: RowCount) -> Vec<SlotRect> {
        let spacing = self.spacing(rows);
        let n = rows.get() as f32;
        let box_w = spacing * 0.95;
        let box_h = (spacing * 0.9).clamp(SLOT_BOX_MIN_HEIGHT, SLOT_BOX_MAX_HEIGHT);
        let y = self.row_y(rows.get() as i32, rows) + spacing * 0.6 + box_h * 0.2;

        (0..rows.slot_count())
            .map(|i| SlotRect {
                center: Vec2::new(self.origin_x() + (i as f32 - n / 2.0) * spacing, y),
                size: Vec2::new(box_w, box_h),
            })
            .collect()
    }

    /// Position of `token` as if it were at (`row`, `progress`)
    pub fn position_at(&self, token: &Token, row: i32, progress: f32, tuning: &Tuning) -> Vec2 {
        let t = progress.clamp(0.0, 1.0);

        if row < 0 {
            return Vec2::new(self.origin_x(), lerp(self.spawn_y, self.padding_top, t));
        }

        let rows = token.config.rows;
        let spacing = self.spacing(rows);
        let path = token.path();

        let offset = column_offset(path, row);
        let next = path.get(row as usize).map_or(0.0, |d| d.offset());

        let x1 = self.origin_x() + offset * spacing;
        let x2 = self.origin_x() + (offset + next) * spacing;
        let y1 = self.row_y(row, rows);
        let y2 = self.row_y(row + 1, rows);

        let jitter = (jitter_hash(token.id, row) - 0.5) * spacing * tuning.jitter_factor * arc01(t);
        let bounce = arc01(t) * spacing * tuning.bounce_factor;

        Vec2::new(lerp(x1, x2, t) + jitter, lerp(y1, y2, t) - bounce)
    }
}

/// Cumulative horizontal offset (in spacings) after the first `row` moves
pub fn column_offset(path: &[Direction], row: i32) -> f32 {
    let taken = row.clamp(0, path.len() as i32) as usize;
    path[..taken].iter().map(|d| d.offset()).sum()
}

/// Stable per-(token, row) value in [0, 1)
pub fn jitter_hash(id: TokenId, row: i32) -> f32 {
    (id as i64 + row as i64).rem_euclid(100) as f32 / 100.0
}

/// Current render position of a token
pub fn render_position(token: &Token, geometry: &BoardGeometry, tuning: &Tuning) -> Vec2 {
    geometry.position_at(token, token.row(), token.progress(), tuning)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::multipliers::{GridConfig, RiskTier};
    use proptest::prelude::*;

    fn token(rows: RowCount, path: Vec<Direction>) -> Token {
        let config = GridConfig {
            rows,
            risk: RiskTier::Low,
        };
        Token::new(17, 1.0, config, 0xffffff, path)
    }

    fn geometry() -> BoardGeometry {
        // usable height 800 - 50 - 90 = 660
        BoardGeometry::new(600.0, 800.0)
    }

    #[test]
    fn test_spacing_and_rows() {
        let g = geometry();
        assert!((g.spacing(RowCount::Twelve) - 55.0).abs() < 1e-4);
        assert_eq!(g.row_y(0, RowCount::Twelve), 50.0);
        assert!((g.row_y(12, RowCount::Twelve) - 710.0).abs() < 1e-3);
        assert_eq!(g.peg_radius(RowCount::Twelve), 4.0);
        assert!((g.token_radius(RowCount::Twelve) - 8.8).abs() < 1e-5);
    }

    #[test]
    fn test_peg_layout() {
        let g = geometry();
        let pegs = g.pegs(RowCount::Eight);
        // 1 + 2 + ... + 9
        assert_eq!(pegs.len(), 45);
        assert_eq!(pegs[0], Vec2::new(300.0, 50.0));
    }

    #[test]
    fn test_slot_rects_are_centered() {
        let g = geometry();
        let rects = g.slot_rects(RowCount::Eight);
        assert_eq!(rects.len(), 9);
        assert!((rects[4].center.x - 300.0).abs() < 1e-4);
        assert!((rects[0].center.x + rects[8].center.x - 600.0).abs() < 1e-3);
        assert_eq!(rects[0].size.y, 40.0);
    }

    #[test]
    fn test_spawn_phase_drops_straight_down() {
        let g = geometry();
        let tk = token(RowCount::Eight, vec![Direction::Right; 8]);
        let tuning = Tuning::default();
        assert_eq!(g.position_at(&tk, -1, 0.0, &tuning), Vec2::new(300.0, 20.0));
        assert_eq!(g.position_at(&tk, -1, 0.5, &tuning), Vec2::new(300.0, 35.0));
        assert_eq!(g.position_at(&tk, -1, 1.0, &tuning), Vec2::new(300.0, 50.0));
    }

    #[test]
    fn test_row_endpoints_have_no_bounce_or_jitter() {
        let g = geometry();
        let rows = RowCount::Eight;
        let spacing = g.spacing(rows);
        let tk = token(rows, vec![Direction::Right; 8]);
        let tuning = Tuning::default();

        let start = g.position_at(&tk, 2, 0.0, &tuning);
        assert!((start.x - (300.0 + 1.0 * spacing)).abs() < 1e-3);
        assert!((start.y - g.row_y(2, rows)).abs() < 1e-3);
    }

    #[test]
    fn test_bounce_peaks_mid_transition() {
        let g = geometry();
        let rows = RowCount::Eight;
        let spacing = g.spacing(rows);
        let tk = token(rows, vec![Direction::Left; 8]);
        let tuning = Tuning::default();

        let mid = g.position_at(&tk, 0, 0.5, &tuning);
        let straight_y = lerp(g.row_y(0, rows), g.row_y(1, rows), 0.5);
        assert!((straight_y - mid.y - spacing * 0.4).abs() < 1e-3);
    }

    #[test]
    fn test_final_row_lands_on_slot_center() {
        let g = geometry();
        let rows = RowCount::Eight;
        use Direction::*;
        let path = vec![Right, Right, Left, Right, Left, Right, Right, Left];
        let tk = token(rows, path);
        let tuning = Tuning::default();

        let landing = g.position_at(&tk, 7, 1.0, &tuning);
        let slot = g.slot_rects(rows)[tk.right_moves()];
        assert!((landing.x - slot.center.x).abs() < 1e-3);
    }

    #[test]
    fn test_jitter_hash_range() {
        assert_eq!(jitter_hash(0, 0), 0.0);
        assert_eq!(jitter_hash(99, 1), 0.0);
        assert!((jitter_hash(5, -1) - 0.04).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_render_is_pure(
            bits in prop::collection::vec(any::<bool>(), 16),
            row in -1i32..16,
            progress in 0.0f32..1.0,
        ) {
            let path = bits
                .into_iter()
                .map(|b| if b { Direction::Right } else { Direction::Left })
                .collect();
            let tk = token(RowCount::Sixteen, path);
            let g = geometry();
            let tuning = Tuning::default();
            let a = g.position_at(&tk, row, progress, &tuning);
            let b = g.position_at(&tk, row, progress, &tuning);
            prop_assert_eq!(a, b);
            prop_assert!(a.x.is_finite() && a.y.is_finite());
        }
    }
}
