use poweroyo_common::config::DEFAULT_KYC_FREE_WITHDRAWAL_LIMIT;
use serde::{Deserialize, Serialize};

/// Runtime configuration for the platform core
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct PlatformConfig {
    /// Cumulative approved-withdrawal total an account may reach without an
    /// approved KYC status, in atomic units
    pub kyc_free_limit: u64,

    /// Attempts made to generate an unused referral code before giving up
    pub referral_code_attempts: u8,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            kyc_free_limit: DEFAULT_KYC_FREE_WITHDRAWAL_LIMIT,
            referral_code_attempts: 8,
        }
    }
}
