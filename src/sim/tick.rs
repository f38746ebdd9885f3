//! Per-frame simulation tick
//!
//! Advances every active token, emits row and settlement events, and evicts
//! settled tokens before returning.

use super::state::{DropEvent, DropState, Settlement, Token};

/// Advance all tokens by one frame of `dt` seconds.
///
/// `dt` is clamped to `Tuning::max_frame_dt`. A step that crosses several
/// row boundaries emits one `RowCrossed` per boundary.
pub fn tick(state: &mut DropState, dt: f32) {
    if state.tokens.is_empty() {
        return;
    }

    let dt = state.tuning.clamp_dt(dt);
    let tuning = state.tuning;
    state.time_ticks += 1;

    for token in state.tokens.iter_mut() {
        let step = dt * tuning.speed(token.config.rows);
        debug_assert!(step >= 0.0, "negative step {step} for token {}", token.id);
        advance_token(token, step, &mut state.events);
    }

    state.tokens.retain(|t| !t.is_settled());
}

/// Move one token forward by `step` row transitions
fn advance_token(token: &mut Token, step: f32, events: &mut Vec<DropEvent>) {
    let rows = token.config.rows.get() as i32;
    if token.row >= rows {
        return;
    }

    token.progress += step;

    while token.progress >= 1.0 {
        token.progress -= 1.0;
        token.row += 1;

        if token.row > 0 && token.row < rows {
            events.push(DropEvent::RowCrossed {
                id: token.id,
                row: token.row as u8,
                depth: token.row as f32 / rows as f32,
            });
        }

        if token.row == rows {
            token.progress = 0.0;
            let settlement = resolve(token);
            log::debug!(
                "Token {} settled in slot {} at {}x (bet {})",
                settlement.id,
                settlement.slot_index,
                settlement.multiplier,
                settlement.bet
            );
            events.push(DropEvent::Settled(settlement));
            break;
        }
    }
}

/// Resolve the landing slot from a token's path and its frozen table
pub fn resolve(token: &Token) -> Settlement {
    let payouts = token.config.payouts();
    let right_moves = token.right_moves();
    let last = payouts.len() - 1;

    // Unreachable while path length == rows == slots - 1
    let slot_index = if right_moves > last {
        log::error!(
            "Token {} resolved to slot {} but table has {} slots; clamping",
            token.id,
            right_moves,
            payouts.len()
        );
        last
    } else {
        right_moves
    };

    Settlement {
        id: token.id,
        slot_index,
        multiplier: payouts[slot_index],
        bet: token.bet,
    }
}
