// Notification event types pushed to connected browser sessions
// Delivery is fire-and-forget through an external sink; a failed delivery
// never rolls back the state change that produced the event.

use crate::{crypto::Id, kyc::KycStatus, withdrawal::ReviewStatus};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyEvent {
    // When an investment has been created and settled
    // it contains InvestmentCreatedEvent as value
    InvestmentCreated,
    // When a referral commission has been credited to a wallet
    // it contains CommissionPaidEvent as value
    CommissionPaid,
    // When a withdrawal request has been submitted
    // it contains WithdrawalRequestedEvent as value
    WithdrawalRequested,
    // When an admin has approved or rejected a withdrawal request
    // it contains WithdrawalReviewedEvent as value
    WithdrawalReviewed,
    // When an admin has approved or rejected a deposit request
    // it contains DepositReviewedEvent as value
    DepositReviewed,
    // When an admin has reviewed a KYC submission
    // it contains KycReviewedEvent as value
    KycReviewed,
}

// Value of NotifyEvent::InvestmentCreated
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InvestmentCreatedEvent {
    pub account: Id,
    pub investment: Id,
    pub plan: Id,
    pub amount: u64,
}

// Value of NotifyEvent::CommissionPaid
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CommissionPaidEvent {
    pub beneficiary: Id,
    pub source: Id,
    pub investment: Id,
    pub level: u8,
    pub amount: u64,
}

// Value of NotifyEvent::WithdrawalRequested
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WithdrawalRequestedEvent {
    pub account: Id,
    pub withdrawal: Id,
    pub amount: u64,
}

// Value of NotifyEvent::WithdrawalReviewed
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WithdrawalReviewedEvent {
    pub account: Id,
    pub withdrawal: Id,
    pub amount: u64,
    pub status: ReviewStatus,
}

// Value of NotifyEvent::DepositReviewed
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DepositReviewedEvent {
    pub account: Id,
    pub deposit: Id,
    pub amount: u64,
    pub status: ReviewStatus,
}

// Value of NotifyEvent::KycReviewed
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KycReviewedEvent {
    pub account: Id,
    pub status: KycStatus,
}
