// Account data structures
// The referral tree is encoded only through `referred_by` code lookups; a
// code is assigned once at creation and never reused, so the chain is
// acyclic by construction.

use crate::{
    crypto::Id,
    error::BalanceError,
    kyc::KycStatus,
    time::TimestampSeconds,
};
use serde::{Deserialize, Serialize};

/// Role attached to an account, checked at the admin-only operations
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    #[default]
    User,
    Admin,
}

impl AccountRole {
    #[inline]
    pub fn is_admin(&self) -> bool {
        matches!(self, AccountRole::Admin)
    }
}

/// A platform account with its wallet balance and referral linkage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    /// Account identifier
    pub id: Id,

    /// Unique referral code assigned at creation
    pub referral_code: String,

    /// Referral code of the account that referred this one
    /// None for accounts registered without a referrer
    pub referred_by: Option<String>,

    /// Role checked by admin-only operations
    pub role: AccountRole,

    /// Current identity verification status
    pub kyc_status: KycStatus,

    /// Spendable wallet balance in atomic units
    balance: u64,

    /// Cumulative lifetime earnings (commissions and payouts), never decremented
    total_earnings: u64,

    /// Unix timestamp of registration
    pub created_at: TimestampSeconds,
}

impl Account {
    pub fn new(
        id: Id,
        referral_code: String,
        referred_by: Option<String>,
        role: AccountRole,
        created_at: TimestampSeconds,
    ) -> Self {
        Self {
            id,
            referral_code,
            referred_by,
            role,
            kyc_status: KycStatus::default(),
            balance: 0,
            total_earnings: 0,
            created_at,
        }
    }

    /// Check if this account has an upward referral link
    pub fn has_referrer(&self) -> bool {
        self.referred_by.is_some()
    }

    /// Current spendable balance in atomic units
    #[inline]
    pub fn balance(&self) -> u64 {
        self.balance
    }

    /// Cumulative lifetime earnings in atomic units
    #[inline]
    pub fn total_earnings(&self) -> u64 {
        self.total_earnings
    }

    /// Credit the wallet balance, rejecting overflow
    pub fn credit(&mut self, amount: u64) -> Result<(), BalanceError> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(BalanceError::Overflow)?;
        Ok(())
    }

    /// Debit the wallet balance
    /// Rejected (not clamped) when the balance is insufficient
    pub fn debit(&mut self, amount: u64) -> Result<(), BalanceError> {
        if self.balance < amount {
            return Err(BalanceError::Insufficient {
                need: amount,
                have: self.balance,
            });
        }
        self.balance -= amount;
        Ok(())
    }

    /// Credit both the wallet balance and the lifetime earnings counter
    /// Used for commission and ROI payouts
    pub fn credit_earnings(&mut self, amount: u64) -> Result<(), BalanceError> {
        let earnings = self
            .total_earnings
            .checked_add(amount)
            .ok_or(BalanceError::EarningsOverflow)?;
        self.credit(amount)?;
        self.total_earnings = earnings;
        Ok(())
    }
}
