// Commission ledger data structures

use crate::{crypto::Id, time::TimestampSeconds};
use serde::{Deserialize, Serialize};

/// Immutable record of one commission payment
/// Never mutated or deleted after creation; the audit trail of record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommissionEntry {
    /// Account credited with the commission
    pub beneficiary: Id,

    /// Account whose investment originated the commission
    pub source: Id,

    /// The originating investment
    pub investment: Id,

    /// Level in the referral chain (1 = direct referrer)
    pub level: u8,

    /// Rate applied, in basis points
    pub rate_bps: u16,

    /// Amount credited in atomic units
    pub amount: u64,

    /// Unix timestamp when the commission was paid
    pub timestamp: TimestampSeconds,
}

/// Result of one cascade run over the referrer chain
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DistributionOutcome {
    /// Entries recorded, ordered from level 1 upwards
    pub entries: Vec<CommissionEntry>,

    /// Total amount distributed across all levels
    pub total_distributed: u64,

    /// Number of levels that received a commission
    pub levels_rewarded: u8,
}

impl DistributionOutcome {
    pub fn new(entries: Vec<CommissionEntry>) -> Self {
        let total_distributed = entries.iter().map(|e| e.amount).sum();
        let levels_rewarded = entries.len() as u8;
        Self {
            entries,
            total_distributed,
            levels_rewarded,
        }
    }

    /// Check if any level was paid
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(level: u8, amount: u64) -> CommissionEntry {
        CommissionEntry {
            beneficiary: Id::random(),
            source: Id::random(),
            investment: Id::random(),
            level,
            rate_bps: 1000,
            amount,
            timestamp: 0,
        }
    }

    #[test]
    fn test_outcome_totals() {
        let outcome = DistributionOutcome::new(vec![entry(1, 1_000), entry(2, 500)]);
        assert_eq!(outcome.total_distributed, 1_500);
        assert_eq!(outcome.levels_rewarded, 2);
        assert!(!outcome.is_empty());
    }

    #[test]
    fn test_empty_outcome() {
        let outcome = DistributionOutcome::default();
        assert!(outcome.is_empty());
        assert_eq!(outcome.total_distributed, 0);
        assert_eq!(outcome.levels_rewarded, 0);
    }
}
