// Withdrawal request storage provider trait

use crate::{error::PlatformResult, storage::SledStorage};
use async_trait::async_trait;
use log::trace;
use poweroyo_common::{
    crypto::Id,
    withdrawal::{ReviewStatus, WithdrawalRequest},
};

/// Storage provider for withdrawal requests
#[async_trait]
pub trait WithdrawalProvider {
    /// Get a request by id
    async fn get_withdrawal(&self, id: &Id) -> PlatformResult<Option<WithdrawalRequest>>;

    /// Persist a request
    async fn save_withdrawal(&mut self, request: &WithdrawalRequest) -> PlatformResult<()>;

    /// The account's outstanding PENDING request, if any
    /// At most one exists at any time
    async fn get_pending_withdrawal_for(
        &self,
        account: &Id,
    ) -> PlatformResult<Option<WithdrawalRequest>>;

    /// Sum of the account's APPROVED withdrawal amounts
    /// Pending and rejected requests never count toward the total
    async fn approved_withdrawal_total(&self, account: &Id) -> PlatformResult<u64>;

    /// All requests belonging to an account
    async fn list_withdrawals_for(&self, account: &Id)
        -> PlatformResult<Vec<WithdrawalRequest>>;

    /// All PENDING requests across accounts, for the admin review queue
    async fn list_pending_withdrawals(&self) -> PlatformResult<Vec<WithdrawalRequest>>;
}

#[async_trait]
impl WithdrawalProvider for SledStorage {
    async fn get_withdrawal(&self, id: &Id) -> PlatformResult<Option<WithdrawalRequest>> {
        trace!("get withdrawal {}", id);
        self.load_from_disk_optional(&self.withdrawals, id.as_bytes())
    }

    async fn save_withdrawal(&mut self, request: &WithdrawalRequest) -> PlatformResult<()> {
        trace!("save withdrawal {}", request.id);
        self.save_to_disk(&self.withdrawals, request.id.as_bytes(), request)
    }

    async fn get_pending_withdrawal_for(
        &self,
        account: &Id,
    ) -> PlatformResult<Option<WithdrawalRequest>> {
        let requests: Vec<WithdrawalRequest> = self.load_all(&self.withdrawals)?;
        Ok(requests
            .into_iter()
            .find(|r| r.account == *account && r.status.is_pending()))
    }

    async fn approved_withdrawal_total(&self, account: &Id) -> PlatformResult<u64> {
        trace!("approved withdrawal total for {}", account);
        let requests: Vec<WithdrawalRequest> = self.load_all(&self.withdrawals)?;
        Ok(requests
            .iter()
            .filter(|r| r.account == *account && r.status == ReviewStatus::Approved)
            .map(|r| r.amount)
            .sum())
    }

    async fn list_withdrawals_for(
        &self,
        account: &Id,
    ) -> PlatformResult<Vec<WithdrawalRequest>> {
        let requests: Vec<WithdrawalRequest> = self.load_all(&self.withdrawals)?;
        Ok(requests
            .into_iter()
            .filter(|r| r.account == *account)
            .collect())
    }

    async fn list_pending_withdrawals(&self) -> PlatformResult<Vec<WithdrawalRequest>> {
        let requests: Vec<WithdrawalRequest> = self.load_all(&self.withdrawals)?;
        Ok(requests
            .into_iter()
            .filter(|r| r.status.is_pending())
            .collect())
    }
}
