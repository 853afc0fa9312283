// Referral commission configuration and ledger records
//
// Key points:
// - Ordered level schedule, each level with a basis-point rate and an
//   active flag, mutated only by administration
// - One immutable ledger entry per level paid
// - The chain walk is bounded by MAX_COMMISSION_LEVELS regardless of the
//   configured schedule

mod error;
mod record;

pub use error::*;
pub use record::*;

use crate::config::{DEFAULT_COMMISSION_RATES_BPS, MAX_COMMISSION_LEVELS};
use serde::{Deserialize, Serialize};

/// A single referral level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommissionLevel {
    /// Ordinal position in the referral chain (1 = direct referrer)
    pub level: u8,

    /// Commission rate in basis points (100 = 1%, 10000 = 100%)
    pub rate_bps: u16,

    /// Inactive levels are skipped by the cascade
    pub active: bool,
}

/// Ordered list of commission levels read by the cascade engine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommissionSchedule {
    pub levels: Vec<CommissionLevel>,
}

impl Default for CommissionSchedule {
    fn default() -> Self {
        // Default: 10%, 5%, 3%, 2%, 1% over 5 levels
        Self::new(DEFAULT_COMMISSION_RATES_BPS.to_vec())
    }
}

impl CommissionSchedule {
    /// Build a schedule from rates, level numbers assigned in order
    pub fn new(rates_bps: Vec<u16>) -> Self {
        let levels = rates_bps
            .into_iter()
            .enumerate()
            .map(|(i, rate_bps)| CommissionLevel {
                level: (i + 1) as u8,
                rate_bps,
                active: true,
            })
            .collect();
        Self { levels }
    }

    /// Active levels in ascending level order, capped at the hard limit
    pub fn active_levels(&self) -> impl Iterator<Item = &CommissionLevel> + '_ {
        let mut levels: Vec<&CommissionLevel> = self
            .levels
            .iter()
            .filter(|l| l.active && l.level >= 1 && l.level <= MAX_COMMISSION_LEVELS)
            .collect();
        levels.sort_by_key(|l| l.level);
        levels.into_iter()
    }

    /// Number of configured levels
    pub fn depth(&self) -> u8 {
        self.levels.len() as u8
    }

    /// Total configured rate across active levels
    pub fn total_rate_bps(&self) -> u32 {
        self.levels
            .iter()
            .filter(|l| l.active)
            .map(|l| l.rate_bps as u32)
            .sum()
    }

    /// Validate the schedule: at most the hard level cap, unique level
    /// numbers, rates in (0, 10000], total not above 100%
    pub fn validate(&self) -> Result<(), CommissionError> {
        if self.levels.len() > MAX_COMMISSION_LEVELS as usize {
            return Err(CommissionError::TooManyLevels {
                max: MAX_COMMISSION_LEVELS,
                configured: self.levels.len(),
            });
        }

        let mut seen = std::collections::HashSet::new();
        for level in &self.levels {
            if level.level == 0 {
                return Err(CommissionError::InvalidLevelNumber { level: level.level });
            }
            if !seen.insert(level.level) {
                return Err(CommissionError::DuplicateLevel { level: level.level });
            }
            if level.rate_bps == 0 || level.rate_bps > 10_000 {
                return Err(CommissionError::InvalidRate {
                    level: level.level,
                    rate_bps: level.rate_bps,
                });
            }
        }

        let total = self.total_rate_bps();
        if total > 10_000 {
            return Err(CommissionError::TotalRateTooHigh { total });
        }

        Ok(())
    }
}

/// Compute the commission owed for one level
/// Two-decimal currency semantics: integer atomic units, truncating division
pub fn commission_amount(principal: u64, rate_bps: u16) -> u64 {
    ((principal as u128 * rate_bps as u128) / 10_000) as u64
}
