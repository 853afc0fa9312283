// KYC Status enumeration
// Represents the current state of a user's identity verification

use serde::{Deserialize, Serialize};

/// KYC status enumeration - distinguishes between different verification states
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum KycStatus {
    /// No documents were ever submitted
    #[default]
    NotSubmitted = 0,

    /// Documents submitted, awaiting admin review
    Pending = 1,

    /// Identity verified by an admin
    /// Lifts the cumulative withdrawal limit entirely
    Approved = 2,

    /// Review failed; the user may submit again
    Rejected = 3,
}

impl KycStatus {
    /// Check if this status lifts the cumulative withdrawal limit
    /// Only an approved identity bypasses the threshold
    #[inline]
    pub fn bypasses_withdrawal_limit(&self) -> bool {
        matches!(self, KycStatus::Approved)
    }

    /// Check if a new document submission is accepted in this state
    /// A pending or already approved verification cannot be resubmitted
    #[inline]
    pub fn can_submit(&self) -> bool {
        matches!(self, KycStatus::NotSubmitted | KycStatus::Rejected)
    }

    /// Check if this status is awaiting an admin decision
    #[inline]
    pub fn is_pending(&self) -> bool {
        matches!(self, KycStatus::Pending)
    }

    /// Get human-readable status name
    pub fn as_str(&self) -> &'static str {
        match self {
            KycStatus::NotSubmitted => "Not Submitted",
            KycStatus::Pending => "Pending",
            KycStatus::Approved => "Approved",
            KycStatus::Rejected => "Rejected",
        }
    }

    /// Convert from u8 for deserialization
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(KycStatus::NotSubmitted),
            1 => Some(KycStatus::Pending),
            2 => Some(KycStatus::Approved),
            3 => Some(KycStatus::Rejected),
            _ => None,
        }
    }

    /// Convert to u8 for serialization
    #[inline]
    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

impl std::fmt::Display for KycStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
