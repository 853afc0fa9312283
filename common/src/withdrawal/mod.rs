// Withdrawal request data structures and the eligibility gate result
//
// A request holds funds conceptually only: the wallet balance is untouched
// at submission and mutated solely by the admin approval step.

mod deposit;

pub use deposit::*;

use crate::{crypto::Id, time::TimestampSeconds, utils::format_coin};
use serde::{Deserialize, Serialize};

/// Admin review lifecycle shared by withdrawal and deposit requests
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ReviewStatus {
    /// Awaiting admin decision
    #[default]
    Pending,
    /// Approved and settled
    Approved,
    /// Rejected, no funds moved
    Rejected,
}

impl ReviewStatus {
    #[inline]
    pub fn is_pending(&self) -> bool {
        matches!(self, ReviewStatus::Pending)
    }

    /// Approved and rejected requests can never be re-processed
    #[inline]
    pub fn is_final(&self) -> bool {
        !self.is_pending()
    }
}

/// Where an approved withdrawal should be paid out
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PayoutDetails {
    /// Payout channel, e.g. "bank-transfer" or "usdt-trc20"
    pub method: String,
    /// Channel-specific destination (account number, wallet address, ...)
    pub destination: String,
}

/// A user request to withdraw funds from the wallet
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalRequest {
    /// Request identifier
    pub id: Id,
    /// Requesting account
    pub account: Id,
    /// Requested amount in atomic units
    pub amount: u64,
    /// Payout destination
    pub payout: PayoutDetails,
    /// Current review state
    pub status: ReviewStatus,
    /// Optional admin remark set at review time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    /// Unix timestamp of submission
    pub requested_at: TimestampSeconds,
    /// Unix timestamp of the admin decision
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<TimestampSeconds>,
}

/// Result of the withdrawal eligibility gate
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalEligibility {
    /// Whether the request may proceed
    pub can_withdraw: bool,
    /// Whether an approved KYC status would unblock the request
    pub requires_kyc: bool,
    /// Sum of previously approved withdrawals, atomic units
    pub current_total: u64,
    /// Configured KYC-free cumulative limit, atomic units
    pub limit: u64,
    /// Human readable explanation for client display
    pub message: String,
}

impl WithdrawalEligibility {
    /// Request stays under the KYC-free cumulative limit
    pub fn allowed(current_total: u64, amount: u64, limit: u64) -> Self {
        let headroom = limit.saturating_sub(current_total.saturating_add(amount));
        Self {
            can_withdraw: true,
            requires_kyc: false,
            current_total,
            limit,
            message: format!(
                "Withdrawal allowed. {} remaining before identity verification becomes mandatory",
                format_coin(headroom)
            ),
        }
    }

    /// Request would push the cumulative total over the limit
    pub fn kyc_required(current_total: u64, amount: u64, limit: u64) -> Self {
        Self {
            can_withdraw: false,
            requires_kyc: true,
            current_total,
            limit,
            message: format!(
                "Identity verification required: withdrawn {} of a {} limit, this request would total {}",
                format_coin(current_total),
                format_coin(limit),
                format_coin(current_total.saturating_add(amount))
            ),
        }
    }

    /// An approved identity bypasses the threshold entirely
    pub fn verified(current_total: u64, limit: u64) -> Self {
        Self {
            can_withdraw: true,
            requires_kyc: false,
            current_total,
            limit,
            message: "Withdrawal allowed: identity verified".to_string(),
        }
    }

    /// Conservative answer when the underlying lookup failed: never fail open
    pub fn fail_closed(limit: u64) -> Self {
        Self {
            can_withdraw: false,
            requires_kyc: false,
            current_total: 0,
            limit,
            message: "Eligibility could not be determined, please retry".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_status() {
        assert!(ReviewStatus::Pending.is_pending());
        assert!(!ReviewStatus::Pending.is_final());
        assert!(ReviewStatus::Approved.is_final());
        assert!(ReviewStatus::Rejected.is_final());
    }

    #[test]
    fn test_eligibility_messages_carry_amounts() {
        let denied = WithdrawalEligibility::kyc_required(45_000, 5_100, 50_000);
        assert!(!denied.can_withdraw);
        assert!(denied.requires_kyc);
        assert!(denied.message.contains("450.00"));
        assert!(denied.message.contains("500.00"));
        assert!(denied.message.contains("501.00"));

        let allowed = WithdrawalEligibility::allowed(45_000, 5_000, 50_000);
        assert!(allowed.can_withdraw);
        assert!(!allowed.requires_kyc);
        assert!(allowed.message.contains("0.00"));
    }

    #[test]
    fn test_fail_closed() {
        let result = WithdrawalEligibility::fail_closed(50_000);
        assert!(!result.can_withdraw);
        assert!(!result.requires_kyc);
    }

    #[test]
    fn test_request_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
        let request = WithdrawalRequest {
            id: Id::random(),
            account: Id::random(),
            amount: 2_500,
            payout: PayoutDetails {
                method: "bank-transfer".to_string(),
                destination: "0011223344".to_string(),
            },
            status: ReviewStatus::Pending,
            remark: None,
            requested_at: 10,
            processed_at: None,
        };
        let data = serde_json::to_vec(&request)?;
        let decoded: WithdrawalRequest = serde_json::from_slice(&data)?;
        assert_eq!(request, decoded);
        Ok(())
    }
}
