// Generic audit trail records
// One appended per state-changing operation; never mutated except for the
// status transition of a pending entry, never deleted.

use crate::{crypto::Id, time::TimestampSeconds};
use serde::{Deserialize, Serialize};

/// What kind of operation produced this record
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Investment,
    Withdrawal,
    Deposit,
    Referral,
    Kyc,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Investment => "investment",
            TransactionKind::Withdrawal => "withdrawal",
            TransactionKind::Deposit => "deposit",
            TransactionKind::Referral => "referral",
            TransactionKind::Kyc => "kyc",
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Settlement state of the recorded operation
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Awaiting an external decision (admin review)
    #[default]
    Pending,
    /// Settled successfully
    Completed,
    /// Rejected or failed, no funds moved
    Failed,
}

/// Append-only ledger entry describing one state-changing operation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// Record identifier
    pub id: Id,
    /// Account the operation applies to
    pub account: Id,
    /// Operation kind
    pub kind: TransactionKind,
    /// Amount involved, atomic units (zero for non-monetary operations)
    pub amount: u64,
    /// Settlement state
    pub status: TransactionStatus,
    /// Entity this record points at (investment, withdrawal, deposit id)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<Id>,
    /// Free-form context for the audit trail
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub metadata: serde_json::Value,
    /// Unix timestamp of creation
    pub timestamp: TimestampSeconds,
}

impl TransactionRecord {
    pub fn new(
        account: Id,
        kind: TransactionKind,
        amount: u64,
        status: TransactionStatus,
        reference: Option<Id>,
        timestamp: TimestampSeconds,
    ) -> Self {
        Self {
            id: Id::random(),
            account,
            kind,
            amount,
            status,
            reference,
            metadata: serde_json::Value::Null,
            timestamp,
        }
    }

    /// Attach free-form audit context
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}
