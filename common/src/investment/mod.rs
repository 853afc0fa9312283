use serde::{Deserialize, Serialize};

use crate::{crypto::Id, time::TimestampSeconds};

/// Investment lifecycle state
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum InvestmentStatus {
    /// Accruing daily payouts
    Active,
    /// All configured days paid out
    Completed,
    /// Switched off by administration before completion
    Deactivated,
}

impl InvestmentStatus {
    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self, InvestmentStatus::Active)
    }
}

/// A fixed-terms investment template
/// Immutable once an investment is created from it: plan changes never
/// retroactively affect existing investments
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentPlan {
    /// Plan identifier
    pub id: Id,
    /// Display name
    pub name: String,
    /// Principal required to enter, atomic units
    pub principal: u64,
    /// Payout credited per day, atomic units
    pub daily_payout: u64,
    /// Number of payout days
    pub duration_days: u32,
    /// Inactive plans accept no new investments
    pub active: bool,
    /// Unix timestamp of creation
    pub created_at: TimestampSeconds,
}

/// A commitment created from a plan by an account
/// Plan terms are snapshotted at creation time
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    /// Investment identifier
    pub id: Id,
    /// Owning account
    pub account: Id,
    /// Plan this was created from
    pub plan: Id,
    /// Principal paid, snapshotted from the plan
    pub amount: u64,
    /// Daily payout, snapshotted from the plan
    pub daily_payout: u64,
    /// Total payout days, snapshotted from the plan
    pub total_days: u32,
    /// Payout days still owed
    pub remaining_days: u32,
    /// Total credited so far
    pub earned: u64,
    /// Current lifecycle state
    pub status: InvestmentStatus,
    /// Unix timestamp of creation
    pub created_at: TimestampSeconds,
}

impl Investment {
    /// Create a new active investment snapshotting the plan terms
    pub fn from_plan(id: Id, account: Id, plan: &InvestmentPlan, created_at: TimestampSeconds) -> Self {
        Self {
            id,
            account,
            plan: plan.id,
            amount: plan.principal,
            daily_payout: plan.daily_payout,
            total_days: plan.duration_days,
            remaining_days: plan.duration_days,
            earned: 0,
            status: InvestmentStatus::Active,
            created_at,
        }
    }

    /// Apply one daily payout
    /// Returns the amount owed for the day, or None once the investment is
    /// no longer active. Flips to Completed when the last day is paid.
    /// Crediting the owner's wallet is the caller's concern; the external
    /// scheduler drives this once per day.
    pub fn record_payout(&mut self) -> Option<u64> {
        if !self.status.is_active() || self.remaining_days == 0 {
            return None;
        }

        self.remaining_days -= 1;
        self.earned = self.earned.saturating_add(self.daily_payout);
        if self.remaining_days == 0 {
            self.status = InvestmentStatus::Completed;
        }

        Some(self.daily_payout)
    }
}
