// Deposit (fund) request storage provider trait

use crate::{error::PlatformResult, storage::SledStorage};
use async_trait::async_trait;
use log::trace;
use poweroyo_common::{crypto::Id, withdrawal::DepositRequest};

/// Storage provider for deposit requests
#[async_trait]
pub trait DepositProvider {
    /// Get a request by id
    async fn get_deposit(&self, id: &Id) -> PlatformResult<Option<DepositRequest>>;

    /// Persist a request
    async fn save_deposit(&mut self, request: &DepositRequest) -> PlatformResult<()>;

    /// The account's outstanding PENDING request, if any
    async fn get_pending_deposit_for(
        &self,
        account: &Id,
    ) -> PlatformResult<Option<DepositRequest>>;

    /// All PENDING requests across accounts, for the admin review queue
    async fn list_pending_deposits(&self) -> PlatformResult<Vec<DepositRequest>>;
}

#[async_trait]
impl DepositProvider for SledStorage {
    async fn get_deposit(&self, id: &Id) -> PlatformResult<Option<DepositRequest>> {
        trace!("get deposit {}", id);
        self.load_from_disk_optional(&self.deposits, id.as_bytes())
    }

    async fn save_deposit(&mut self, request: &DepositRequest) -> PlatformResult<()> {
        trace!("save deposit {}", request.id);
        self.save_to_disk(&self.deposits, request.id.as_bytes(), request)
    }

    async fn get_pending_deposit_for(
        &self,
        account: &Id,
    ) -> PlatformResult<Option<DepositRequest>> {
        let requests: Vec<DepositRequest> = self.load_all(&self.deposits)?;
        Ok(requests
            .into_iter()
            .find(|r| r.account == *account && r.status.is_pending()))
    }

    async fn list_pending_deposits(&self) -> PlatformResult<Vec<DepositRequest>> {
        let requests: Vec<DepositRequest> = self.load_all(&self.deposits)?;
        Ok(requests
            .into_iter()
            .filter(|r| r.status.is_pending())
            .collect())
    }
}
