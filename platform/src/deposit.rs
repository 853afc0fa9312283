// Fund (deposit) request lifecycle
// The wallet is credited only by the admin approval step

use crate::{
    error::{PlatformError, PlatformResult},
    platform::{require_admin, Platform},
    storage::Storage,
};
use log::debug;
use poweroyo_common::{
    api::{DepositReviewedEvent, NotifyEvent},
    crypto::Id,
    time::get_current_time_in_seconds,
    transaction::{TransactionKind, TransactionRecord, TransactionStatus},
    utils::format_coin,
    withdrawal::{DepositRequest, ReviewStatus},
};
use serde_json::json;

impl<S: Storage> Platform<S> {
    /// Submit a deposit request carrying an off-platform payment reference
    pub async fn request_deposit(
        &self,
        account_id: &Id,
        amount: u64,
        reference: &str,
    ) -> PlatformResult<DepositRequest> {
        if amount == 0 {
            return Err(PlatformError::InvalidAmount);
        }
        if reference.trim().is_empty() {
            return Err(PlatformError::MissingField("reference"));
        }

        let mut storage = self.storage().write().await;

        let account = storage
            .get_account(account_id)
            .await?
            .ok_or(PlatformError::AccountNotFound(*account_id))?;

        if storage.get_pending_deposit_for(account_id).await?.is_some() {
            return Err(PlatformError::PendingDepositExists);
        }

        let now = get_current_time_in_seconds();
        let request = DepositRequest {
            id: Id::random(),
            account: account.id,
            amount,
            reference: reference.trim().to_string(),
            status: ReviewStatus::Pending,
            remark: None,
            requested_at: now,
            processed_at: None,
        };

        storage.save_deposit(&request).await?;
        storage
            .append_transaction(
                &TransactionRecord::new(
                    account.id,
                    TransactionKind::Deposit,
                    amount,
                    TransactionStatus::Pending,
                    Some(request.id),
                    now,
                )
                .with_metadata(json!({ "reference": request.reference })),
            )
            .await?;

        debug!(
            "account {} requested deposit of {}",
            account.id,
            format_coin(amount)
        );
        Ok(request)
    }

    /// Approve or reject a deposit request (admin only)
    /// Approval credits the wallet; re-processing a settled request is a
    /// conflict
    pub async fn review_deposit(
        &self,
        admin: &Id,
        deposit_id: &Id,
        approve: bool,
        remark: Option<String>,
    ) -> PlatformResult<DepositRequest> {
        let mut storage = self.storage().write().await;
        require_admin(&*storage, admin).await?;

        let mut request = storage
            .get_deposit(deposit_id)
            .await?
            .ok_or(PlatformError::DepositNotFound(*deposit_id))?;

        if request.status.is_final() {
            return Err(PlatformError::AlreadyProcessed {
                status: request.status,
            });
        }

        if approve {
            let mut account = storage
                .get_account(&request.account)
                .await?
                .ok_or(PlatformError::AccountNotFound(request.account))?;
            account.credit(request.amount)?;
            storage.save_account(&account).await?;
            request.status = ReviewStatus::Approved;
        } else {
            request.status = ReviewStatus::Rejected;
        }

        request.remark = remark;
        request.processed_at = Some(get_current_time_in_seconds());
        storage.save_deposit(&request).await?;
        storage
            .finalize_transaction_for(
                &request.id,
                if approve {
                    TransactionStatus::Completed
                } else {
                    TransactionStatus::Failed
                },
            )
            .await?;

        drop(storage);

        self.notify(
            &request.account,
            NotifyEvent::DepositReviewed,
            &DepositReviewedEvent {
                account: request.account,
                deposit: request.id,
                amount: request.amount,
                status: request.status,
            },
        )
        .await;

        Ok(request)
    }

    /// The admin review queue of PENDING deposit requests
    pub async fn pending_deposits(&self, admin: &Id) -> PlatformResult<Vec<DepositRequest>> {
        let storage = self.storage().read().await;
        require_admin(&*storage, admin).await?;
        storage.list_pending_deposits().await
    }
}
