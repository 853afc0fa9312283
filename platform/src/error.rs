use poweroyo_common::{
    commission::CommissionError,
    crypto::Id,
    error::BalanceError,
    kyc::KycStatus,
    withdrawal::ReviewStatus,
};
use thiserror::Error;

/// Coarse error class consumed by the API boundary to pick a response shape
/// (field-level detail, structured denial payload, 404, 409 or generic 500)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    PolicyDenial,
    NotFound,
    Conflict,
    Internal,
}

#[derive(Debug, Error)]
pub enum PlatformError {
    // Validation
    #[error("Invalid amount: must be greater than zero")]
    InvalidAmount,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error(transparent)]
    InvalidSchedule(CommissionError),

    // Not found
    #[error("Account {0} not found")]
    AccountNotFound(Id),

    #[error("Referral code {0} does not resolve to an account")]
    ReferrerNotFound(String),

    #[error("Plan {0} not found")]
    PlanNotFound(Id),

    #[error("Withdrawal request {0} not found")]
    WithdrawalNotFound(Id),

    #[error("Deposit request {0} not found")]
    DepositNotFound(Id),

    // Policy denial
    #[error(transparent)]
    Balance(#[from] BalanceError),

    #[error("Identity verification required: withdrawn {current_total}, limit {limit}, requested {requested}")]
    KycRequired {
        current_total: u64,
        limit: u64,
        requested: u64,
    },

    #[error("A pending withdrawal request already exists for this account")]
    PendingWithdrawalExists,

    #[error("A pending deposit request already exists for this account")]
    PendingDepositExists,

    #[error("An active investment already exists for this plan")]
    DuplicateActiveInvestment,

    #[error("Plan {0} is not accepting new investments")]
    PlanInactive(Id),

    #[error("KYC submission not allowed while status is {0}")]
    KycSubmissionNotAllowed(KycStatus),

    #[error("Admin privileges required")]
    Unauthorized,

    // Conflict
    #[error("Request was already processed (status {status:?})")]
    AlreadyProcessed { status: ReviewStatus },

    #[error("KYC review requires a pending submission (status is {0})")]
    KycNotPending(KycStatus),

    #[error(transparent)]
    Commission(CommissionError),

    // Storage
    #[error("Storage error: {0}")]
    Storage(#[from] sled::Error),

    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PlatformError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PlatformError::InvalidAmount
            | PlatformError::MissingField(_)
            | PlatformError::InvalidSchedule(_) => ErrorKind::Validation,

            PlatformError::AccountNotFound(_)
            | PlatformError::ReferrerNotFound(_)
            | PlatformError::PlanNotFound(_)
            | PlatformError::WithdrawalNotFound(_)
            | PlatformError::DepositNotFound(_) => ErrorKind::NotFound,

            PlatformError::Balance(_)
            | PlatformError::KycRequired { .. }
            | PlatformError::PendingWithdrawalExists
            | PlatformError::PendingDepositExists
            | PlatformError::DuplicateActiveInvestment
            | PlatformError::PlanInactive(_)
            | PlatformError::KycSubmissionNotAllowed(_)
            | PlatformError::Unauthorized => ErrorKind::PolicyDenial,

            PlatformError::AlreadyProcessed { .. }
            | PlatformError::KycNotPending(_)
            | PlatformError::Commission(_) => ErrorKind::Conflict,

            PlatformError::Storage(_)
            | PlatformError::Encoding(_)
            | PlatformError::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<CommissionError> for PlatformError {
    fn from(err: CommissionError) -> Self {
        match err {
            // A duplicate ledger entry is a re-processing conflict; every
            // other variant is a misconfigured schedule
            CommissionError::DuplicateEntry { .. } => PlatformError::Commission(err),
            _ => PlatformError::InvalidSchedule(err),
        }
    }
}

/// Result type for platform operations
pub type PlatformResult<T> = Result<T, PlatformError>;
