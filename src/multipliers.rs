//! Payout slot tables
//!
//! Each (row count, risk tier) pair maps to a fixed, house-designed payout curve.
//! Slot `i` pays out for a token that took exactly `i` right moves.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::hex_to_rgb;

/// Supported grid depths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum RowCount {
    Eight,
    Twelve,
    #[default]
    Sixteen,
}

impl RowCount {
    pub const ALL: [RowCount; 3] = [RowCount::Eight, RowCount::Twelve, RowCount::Sixteen];

    /// Number of peg rows
    #[inline]
    pub fn get(self) -> u8 {
        match self {
            RowCount::Eight => 8,
            RowCount::Twelve => 12,
            RowCount::Sixteen => 16,
        }
    }

    /// Number of payout slots (one more than rows)
    #[inline]
    pub fn slot_count(self) -> usize {
        self.get() as usize + 1
    }
}

impl TryFrom<u32> for RowCount {
    type Error = ConfigError;

    fn try_from(rows: u32) -> Result<Self, Self::Error> {
        match rows {
            8 => Ok(RowCount::Eight),
            12 => Ok(RowCount::Twelve),
            16 => Ok(RowCount::Sixteen),
            other => Err(ConfigError::UnsupportedRowCount(other)),
        }
    }
}

impl From<RowCount> for u32 {
    fn from(rows: RowCount) -> Self {
        rows.get() as u32
    }
}

impl fmt::Display for RowCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Payout curve profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    #[default]
    Medium,
    High,
}

impl RiskTier {
    pub const ALL: [RiskTier; 3] = [RiskTier::Low, RiskTier::Medium, RiskTier::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "Low",
            RiskTier::Medium => "Medium",
            RiskTier::High => "High",
        }
    }
}

impl FromStr for RiskTier {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(RiskTier::Low),
            "medium" | "med" => Ok(RiskTier::Medium),
            "high" => Ok(RiskTier::High),
            _ => Err(ConfigError::UnknownRiskTier(s.to_string())),
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grid size and risk tier for a simulation session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridConfig {
    pub rows: RowCount,
    pub risk: RiskTier,
}

impl GridConfig {
    /// Validate a raw row count; anything outside 8/12/16 is rejected
    pub fn new(rows: u32, risk: RiskTier) -> Result<Self, ConfigError> {
        Ok(Self {
            rows: RowCount::try_from(rows)?,
            risk,
        })
    }

    /// Payout multipliers for this configuration, left to right
    pub fn payouts(&self) -> &'static [f64] {
        payout_table(self.rows, self.risk)
    }

    /// Full slot table (multiplier + color) for this configuration
    pub fn slots(&self) -> Vec<Slot> {
        generate(self.rows, self.risk)
    }
}

// === Canonical payout curves ===

const ROWS_8_LOW: [f64; 9] = [5.6, 2.1, 1.1, 1.0, 0.5, 1.0, 1.1, 2.1, 5.6];
const ROWS_8_MEDIUM: [f64; 9] = [13.0, 3.0, 1.3, 0.7, 0.4, 0.7, 1.3, 3.0, 13.0];
const ROWS_8_HIGH: [f64; 9] = [29.0, 4.0, 1.5, 0.3, 0.2, 0.3, 1.5, 4.0, 29.0];

const ROWS_12_LOW: [f64; 13] = [
    10.0, 3.0, 1.6, 1.4, 1.1, 1.0, 0.5, 1.0, 1.1, 1.4, 1.6, 3.0, 10.0,
];
const ROWS_12_MEDIUM: [f64; 13] = [
    33.0, 11.0, 4.0, 2.0, 1.1, 0.6, 0.3, 0.6, 1.1, 2.0, 4.0, 11.0, 33.0,
];
const ROWS_12_HIGH: [f64; 13] = [
    170.0, 51.0, 14.0, 5.3, 2.1, 0.5, 0.2, 0.5, 2.1, 5.3, 14.0, 51.0, 170.0,
];

const ROWS_16_LOW: [f64; 17] = [
    16.0, 9.0, 2.0, 1.4, 1.4, 1.2, 1.1, 1.0, 0.5, 1.0, 1.1, 1.2, 1.4, 1.4, 2.0, 9.0, 16.0,
];
const ROWS_16_MEDIUM: [f64; 17] = [
    110.0, 41.0, 10.0, 5.0, 3.0, 1.5, 1.0, 0.5, 0.3, 0.5, 1.0, 1.5, 3.0, 5.0, 10.0, 41.0, 110.0,
];
const ROWS_16_HIGH: [f64; 17] = [
    1000.0, 130.0, 26.0, 9.0, 4.0, 2.0, 0.2, 0.2, 0.2, 0.2, 0.2, 2.0, 4.0, 9.0, 26.0, 130.0,
    1000.0,
];

/// Raw payout curve for a (rows, risk) pair
pub fn payout_table(rows: RowCount, risk: RiskTier) -> &'static [f64] {
    match (rows, risk) {
        (RowCount::Eight, RiskTier::Low) => &ROWS_8_LOW,
        (RowCount::Eight, RiskTier::Medium) => &ROWS_8_MEDIUM,
        (RowCount::Eight, RiskTier::High) => &ROWS_8_HIGH,
        (RowCount::Twelve, RiskTier::Low) => &ROWS_12_LOW,
        (RowCount::Twelve, RiskTier::Medium) => &ROWS_12_MEDIUM,
        (RowCount::Twelve, RiskTier::High) => &ROWS_12_HIGH,
        (RowCount::Sixteen, RiskTier::Low) => &ROWS_16_LOW,
        (RowCount::Sixteen, RiskTier::Medium) => &ROWS_16_MEDIUM,
        (RowCount::Sixteen, RiskTier::High) => &ROWS_16_HIGH,
    }
}

/// Check every supported pair once at startup
pub fn validate_tables() -> Result<(), ConfigError> {
    for rows in RowCount::ALL {
        for risk in RiskTier::ALL {
            let table = payout_table(rows, risk);
            let malformed = |reason| ConfigError::MalformedTable {
                rows: rows.get(),
                risk: risk.as_str(),
                reason,
            };

            if table.len() != rows.slot_count() {
                return Err(malformed("slot count must be rows + 1"));
            }
            if table.iter().any(|m| !m.is_finite() || *m < 0.0) {
                return Err(malformed("multipliers must be finite and non-negative"));
            }
            if table.iter().zip(table.iter().rev()).any(|(a, b)| a != b) {
                return Err(malformed("payouts must be symmetric around the center"));
            }
        }
    }
    Ok(())
}

/// Display color band for a payout slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotColor {
    /// Near the center
    Amber,
    /// Outer band
    Orange,
    /// Edge band
    Red,
    /// Center slot that loses money
    Yellow,
}

impl SlotColor {
    pub fn hex(&self) -> u32 {
        match self {
            SlotColor::Amber => 0xf59e0b,
            SlotColor::Orange => 0xf97316,
            SlotColor::Red => 0xef4444,
            SlotColor::Yellow => 0xeab308,
        }
    }

    pub fn rgb(&self) -> [u8; 3] {
        hex_to_rgb(self.hex())
    }

    /// "r, g, b" for canvas `rgba()` strings
    pub fn css_rgb(&self) -> String {
        let [r, g, b] = self.rgb();
        format!("{r}, {g}, {b}")
    }
}

/// Color for slot `index` on a `rows`-row grid paying `multiplier`
pub fn slot_color(index: usize, rows: RowCount, multiplier: f64) -> SlotColor {
    let center = rows.get() as usize / 2;
    let dist = index.abs_diff(center) as f32;
    let rows = rows.get() as f32;

    if dist == 0.0 && multiplier < 1.0 {
        SlotColor::Yellow
    } else if dist > rows * 0.45 {
        SlotColor::Red
    } else if dist > rows * 0.35 {
        SlotColor::Orange
    } else {
        SlotColor::Amber
    }
}

/// A payout bucket at the bottom of the grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    /// Left-to-right position, equal to the number of right moves
    pub index: usize,
    pub multiplier: f64,
    pub color: SlotColor,
}

impl Slot {
    /// Payout label, e.g. "13x" or "0.2x"
    pub fn label(&self) -> String {
        format!("{}x", self.multiplier)
    }

    /// Whether landing here returns less than the bet
    pub fn is_loss(&self) -> bool {
        self.multiplier < 1.0
    }
}

/// Build the ordered slot table for a grid configuration
pub fn generate(rows: RowCount, risk: RiskTier) -> Vec<Slot> {
    payout_table(rows, risk)
        .iter()
        .enumerate()
        .map(|(index, &multiplier)| Slot {
            index,
            multiplier,
            color: slot_color(index, rows, multiplier),
        })
        .collect()
}
