// Fund (deposit) request data structures
// The inverse of a withdrawal: admin approval credits the wallet

use super::ReviewStatus;
use crate::{crypto::Id, time::TimestampSeconds};
use serde::{Deserialize, Serialize};

/// A user request to have off-platform funds credited to the wallet
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DepositRequest {
    /// Request identifier
    pub id: Id,
    /// Requesting account
    pub account: Id,
    /// Amount claimed to have been paid, atomic units
    pub amount: u64,
    /// Off-platform payment reference supplied by the user
    pub reference: String,
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
