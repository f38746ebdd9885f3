//! Balance and payout history
//!
//! The bookkeeping side of the engine boundary: reserves a bet before a token
//! is created and credits the payout when its settlement arrives.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_BET, MAX_HISTORY, STARTING_BALANCE};
use crate::error::WalletError;
use crate::sim::{Settlement, TokenId};

/// A single settled drop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub token: TokenId,
    pub multiplier: f64,
    /// Amount credited (bet * multiplier)
    pub payout: f64,
    /// Payout minus the original bet
    pub net: f64,
}

impl HistoryEntry {
    pub fn is_win(&self) -> bool {
        self.net > 0.0
    }
}

/// Player funds and recent results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    balance: f64,
    bet: f64,
    /// Most recent first
    history: Vec<HistoryEntry>,
}

impl Default for Wallet {
    fn default() -> Self {
        Self::new(DEFAULT_BET)
    }
}

impl Wallet {
    pub fn new(bet: f64) -> Self {
        Self {
            balance: STARTING_BALANCE,
            bet: bet.max(0.0),
            history: Vec::new(),
        }
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn bet(&self) -> f64 {
        self.bet
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Set the stake for the next drop (negative values become 0)
    pub fn set_bet(&mut self, bet: f64) {
        self.bet = if bet.is_finite() { bet.max(0.0) } else { 0.0 };
    }

    /// Halve the stake, never below 1
    pub fn halve_bet(&mut self) {
        self.bet = (self.bet / 2.0).floor().max(1.0);
    }

    /// Double the stake, capped at the current balance
    pub fn double_bet(&mut self) {
        self.bet = (self.bet * 2.0).min(self.balance);
    }

    /// True when the current stake can't be covered
    pub fn needs_top_up(&self) -> bool {
        self.balance < self.bet
    }

    /// Restore the starting balance
    pub fn reset_funds(&mut self) {
        log::info!("Funds reset to {:.2}", STARTING_BALANCE);
        self.balance = STARTING_BALANCE;
    }

    /// Debit the current stake for a new drop
    pub fn reserve_bet(&mut self) -> Result<f64, WalletError> {
        if self.needs_top_up() {
            return Err(WalletError::InsufficientFunds {
                balance: self.balance,
                bet: self.bet,
            });
        }
        self.balance -= self.bet;
        Ok(self.bet)
    }

    /// Credit a settled drop and record it
    pub fn settle(&mut self, settlement: &Settlement) -> HistoryEntry {
        let payout = settlement.payout();
        self.balance += payout;

        let entry = HistoryEntry {
            token: settlement.id,
            multiplier: settlement.multiplier,
            payout,
            net: payout - settlement.bet,
        };
        self.history.insert(0, entry);
        self.history.truncate(MAX_HISTORY);
        entry
    }
}
