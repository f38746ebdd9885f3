//! Data-driven engine tuning
//!
//! Defaults reproduce the shipped feel; hosts may load overrides from JSON.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::multipliers::RowCount;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Longest frame delta honoured by one advance (seconds)
    pub max_frame_dt: f32,
    /// Rows per second before the row-count bonus
    pub base_speed: f32,
    /// Each this-many rows adds one row per second
    pub speed_rows_divisor: f32,
    /// Bounce arc height as a fraction of peg spacing
    pub bounce_factor: f32,
    /// Horizontal jitter amplitude as a fraction of peg spacing
    pub jitter_factor: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_frame_dt: 0.1,
            base_speed: 3.0,
            speed_rows_divisor: 12.0,
            bounce_factor: 0.4,
            jitter_factor: 0.1,
        }
    }
}

impl Tuning {
    /// Row transitions per second; taller grids fall a little faster
    pub fn speed(&self, rows: RowCount) -> f32 {
        self.base_speed + rows.get() as f32 / self.speed_rows_divisor
    }

    /// Clamp a raw frame delta (tab suspension, debugger stalls)
    pub fn clamp_dt(&self, dt: f32) -> f32 {
        if dt.is_finite() {
            dt.min(self.max_frame_dt).max(0.0)
        } else {
            0.0
        }
    }

    /// Reject values that would stall or reverse a drop
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("max_frame_dt", self.max_frame_dt),
            ("base_speed", self.base_speed),
            ("speed_rows_divisor", self.speed_rows_divisor),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidTuning {
                    field,
                    value,
                    bound: "finite and > 0",
                });
            }
        }

        let non_negative = [
            ("bounce_factor", self.bounce_factor),
            ("jitter_factor", self.jitter_factor),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidTuning {
                    field,
                    value,
                    bound: "finite and >= 0",
                });
            }
        }
        Ok(())
    }
}
