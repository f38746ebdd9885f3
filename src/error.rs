//! Error types
//!
//! Configuration errors are fatal to the request that raised them; the engine
//! keeps its previous configuration. Wallet errors stay on the bookkeeping side.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("unsupported row count {0} (supported: 8, 12, 16)")]
    UnsupportedRowCount(u32),

    #[error("unknown risk tier {0:?}")]
    UnknownRiskTier(String),

    #[error("path has {actual} directions, grid has {expected} rows")]
    PathLength { expected: usize, actual: usize },

    #[error("payout table for {rows} rows / {risk} risk is malformed: {reason}")]
    MalformedTable {
        rows: u8,
        risk: &'static str,
        reason: &'static str,
    },

    #[error("tuning value {field} = {value} is out of range (must be {bound})")]
    InvalidTuning {
        field: &'static str,
        value: f32,
        bound: &'static str,
    },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum WalletError {
    #[error("insufficient funds: balance {balance:.2}, bet {bet:.2}")]
    InsufficientFunds { balance: f64, bet: f64 },
}
