// Commission schedule and cascade error types

use thiserror::Error;

/// Errors that can occur in the commission system
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommissionError {
    /// Schedule configures more levels than the hard cap
    #[error("Configured {configured} levels exceeds maximum {max}")]
    TooManyLevels { max: u8, configured: usize },

    /// Level numbers start at 1
    #[error("Invalid level number {level}")]
    InvalidLevelNumber { level: u8 },

    /// The same level number appears twice in the schedule
    #[error("Duplicate level {level} in schedule")]
    DuplicateLevel { level: u8 },

    /// Rate must be in (0, 10000]
    #[error("Invalid rate {rate_bps} bps at level {level}")]
    InvalidRate { level: u8, rate_bps: u16 },

    /// Total rate across active levels exceeds 100%
    #[error("Total commission rate {total} exceeds 10000 (100%)")]
    TotalRateTooHigh { total: u32 },

    /// A ledger entry for this (investment, level) pair already exists
    #[error("Commission for level {level} of this investment was already recorded")]
    DuplicateEntry { level: u8 },
}

/// Result type for commission operations
pub type CommissionResult<T> = Result<T, CommissionError>;
