// KYC submission and review status transitions
// Document collection and storage happen outside the core; the platform
// tracks only the status value the withdrawal gate consumes.

use crate::{
    error::{PlatformError, PlatformResult},
    platform::{require_admin, Platform},
    storage::Storage,
};
use log::debug;
use poweroyo_common::{
    account::Account,
    api::{KycReviewedEvent, NotifyEvent},
    crypto::Id,
    kyc::KycStatus,
    time::get_current_time_in_seconds,
    transaction::{TransactionKind, TransactionRecord, TransactionStatus},
};
use serde_json::json;

impl<S: Storage> Platform<S> {
    /// Mark an account's KYC documents as submitted
    /// Allowed only from the NotSubmitted and Rejected states
    pub async fn submit_kyc(&self, account_id: &Id) -> PlatformResult<Account> {
        let mut storage = self.storage().write().await;

        let mut account = storage
            .get_account(account_id)
            .await?
            .ok_or(PlatformError::AccountNotFound(*account_id))?;

        if !account.kyc_status.can_submit() {
            return Err(PlatformError::KycSubmissionNotAllowed(account.kyc_status));
        }

        account.kyc_status = KycStatus::Pending;
        storage.save_account(&account).await?;

        debug!("account {} submitted KYC documents", account.id);
        Ok(account)
    }

    /// Approve or reject a pending KYC submission (admin only)
    pub async fn review_kyc(
        &self,
        admin: &Id,
        account_id: &Id,
        approve: bool,
        remark: Option<String>,
    ) -> PlatformResult<Account> {
        let mut storage = self.storage().write().await;
        require_admin(&*storage, admin).await?;

        let mut account = storage
            .get_account(account_id)
            .await?
            .ok_or(PlatformError::AccountNotFound(*account_id))?;

        if !account.kyc_status.is_pending() {
            return Err(PlatformError::KycNotPending(account.kyc_status));
        }

        account.kyc_status = if approve {
            KycStatus::Approved
        } else {
            KycStatus::Rejected
        };
        storage.save_account(&account).await?;

        let now = get_current_time_in_seconds();
        storage
            .append_transaction(
                &TransactionRecord::new(
                    account.id,
                    TransactionKind::Kyc,
                    0,
                    if approve {
                        TransactionStatus::Completed
                    } else {
                        TransactionStatus::Failed
                    },
                    None,
                    now,
                )
                .with_metadata(json!({
                    "status": account.kyc_status,
                    "remark": remark,
                })),
            )
            .await?;

        debug!(
            "KYC for account {} reviewed: {}",
            account.id, account.kyc_status
        );

        drop(storage);

        self.notify(
            &account.id,
            NotifyEvent::KycReviewed,
            &KycReviewedEvent {
                account: account.id,
                status: account.kyc_status,
            },
        )
        .await;

        Ok(account)
    }
}
