// Withdrawal eligibility gate and request lifecycle
//
// The gate compares the account's cumulative APPROVED withdrawal total
// against the configured KYC-free limit; an approved identity bypasses it.
// Submission never touches the wallet balance: funds move only when an
// admin approves, and the approval re-validates the balance at that point.

use crate::{
    config::PlatformConfig,
    error::{PlatformError, PlatformResult},
    platform::{require_admin, Platform},
    storage::Storage,
};
use log::{debug, warn};
use poweroyo_common::{
    api::{NotifyEvent, WithdrawalRequestedEvent, WithdrawalReviewedEvent},
    crypto::Id,
    error::BalanceError,
    time::get_current_time_in_seconds,
    transaction::{TransactionKind, TransactionRecord, TransactionStatus},
    utils::format_coin,
    withdrawal::{PayoutDetails, ReviewStatus, WithdrawalEligibility, WithdrawalRequest},
};
use serde_json::json;

/// Evaluate the KYC gate for one prospective withdrawal
pub(crate) async fn evaluate_gate<S: Storage>(
    storage: &S,
    config: &PlatformConfig,
    account_id: &Id,
    amount: u64,
) -> PlatformResult<WithdrawalEligibility> {
    let account = storage
        .get_account(account_id)
        .await?
        .ok_or(PlatformError::AccountNotFound(*account_id))?;

    let limit = config.kyc_free_limit;
    let current_total = storage.approved_withdrawal_total(account_id).await?;

    if account.kyc_status.bypasses_withdrawal_limit() {
        return Ok(WithdrawalEligibility::verified(current_total, limit));
    }

    let new_total = current_total.saturating_add(amount);
    if new_total > limit {
        Ok(WithdrawalEligibility::kyc_required(
            current_total,
            amount,
            limit,
        ))
    } else {
        Ok(WithdrawalEligibility::allowed(current_total, amount, limit))
    }
}

impl<S: Storage> Platform<S> {
    /// Check whether a withdrawal of `amount` would be accepted by the gate
    ///
    /// Any lookup failure answers conservatively: the gate never fails open.
    pub async fn check_withdrawal_eligibility(
        &self,
        account: &Id,
        amount: u64,
    ) -> WithdrawalEligibility {
        let storage = self.storage().read().await;
        match evaluate_gate(&*storage, self.config(), account, amount).await {
            Ok(eligibility) => eligibility,
            Err(e) => {
                warn!("withdrawal eligibility lookup failed for {}: {}", account, e);
                WithdrawalEligibility::fail_closed(self.config().kyc_free_limit)
            }
        }
    }

    /// Submit a withdrawal request
    ///
    /// The wallet balance is checked but NOT decremented here; the amount
    /// stays conceptually reserved until an admin decision settles it.
    pub async fn request_withdrawal(
        &self,
        account_id: &Id,
        amount: u64,
        payout: PayoutDetails,
    ) -> PlatformResult<WithdrawalRequest> {
        if amount == 0 {
            return Err(PlatformError::InvalidAmount);
        }
        if payout.method.trim().is_empty() {
            return Err(PlatformError::MissingField("method"));
        }
        if payout.destination.trim().is_empty() {
            return Err(PlatformError::MissingField("destination"));
        }

        let mut storage = self.storage().write().await;

        let account = storage
            .get_account(account_id)
            .await?
            .ok_or(PlatformError::AccountNotFound(*account_id))?;

        // Insufficient funds rejects before the KYC gate is even consulted
        if amount > account.balance() {
            return Err(PlatformError::Balance(BalanceError::Insufficient {
                need: amount,
                have: account.balance(),
            }));
        }

        let eligibility = evaluate_gate(&*storage, self.config(), account_id, amount).await?;
        if !eligibility.can_withdraw {
            return Err(PlatformError::KycRequired {
                current_total: eligibility.current_total,
                limit: eligibility.limit,
                requested: amount,
            });
        }

        if storage
            .get_pending_withdrawal_for(account_id)
            .await?
            .is_some()
        {
            return Err(PlatformError::PendingWithdrawalExists);
        }

        let now = get_current_time_in_seconds();
        let request = WithdrawalRequest {
            id: Id::random(),
            account: account.id,
            amount,
            payout,
            status: ReviewStatus::Pending,
            remark: None,
            requested_at: now,
            processed_at: None,
        };

        storage.save_withdrawal(&request).await?;
        storage
            .append_transaction(
                &TransactionRecord::new(
                    account.id,
                    TransactionKind::Withdrawal,
                    amount,
                    TransactionStatus::Pending,
                    Some(request.id),
                    now,
                )
                .with_metadata(json!({ "method": request.payout.method })),
            )
            .await?;

        debug!(
            "account {} requested withdrawal of {}",
            account.id,
            format_coin(amount)
        );

        drop(storage);

        self.notify(
            &account.id,
            NotifyEvent::WithdrawalRequested,
            &WithdrawalRequestedEvent {
                account: account.id,
                withdrawal: request.id,
                amount,
            },
        )
        .await;

        Ok(request)
    }

    /// Approve or reject a withdrawal request (admin only)
    ///
    /// Approval is the only path that decrements the wallet; it re-validates
    /// the balance first and fails without mutating anything if it no longer
    /// covers the request. A request not in PENDING status is a conflict.
    pub async fn review_withdrawal(
        &self,
        admin: &Id,
        withdrawal_id: &Id,
        approve: bool,
        remark: Option<String>,
    ) -> PlatformResult<WithdrawalRequest> {
        let mut storage = self.storage().write().await;
        require_admin(&*storage, admin).await?;

        let mut request = storage
            .get_withdrawal(withdrawal_id)
            .await?
            .ok_or(PlatformError::WithdrawalNotFound(*withdrawal_id))?;

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
            // The balance may have shrunk since submission
            account.debit(request.amount)?;
            storage.save_account(&account).await?;
            request.status = ReviewStatus::Approved;
        } else {
            request.status = ReviewStatus::Rejected;
        }

        request.remark = remark;
        request.processed_at = Some(get_current_time_in_seconds());
        storage.save_withdrawal(&request).await?;
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

        debug!(
            "withdrawal {} of {} {}",
            request.id,
            format_coin(request.amount),
            if approve { "approved" } else { "rejected" }
        );

        drop(storage);

        self.notify(
            &request.account,
            NotifyEvent::WithdrawalReviewed,
            &WithdrawalReviewedEvent {
                account: request.account,
                withdrawal: request.id,
                amount: request.amount,
                status: request.status,
            },
        )
        .await;

        Ok(request)
    }

    /// Get a withdrawal request by id
    pub async fn withdrawal(&self, id: &Id) -> PlatformResult<WithdrawalRequest> {
        let storage = self.storage().read().await;
        storage
            .get_withdrawal(id)
            .await?
            .ok_or(PlatformError::WithdrawalNotFound(*id))
    }

    /// The admin review queue of PENDING withdrawal requests
    pub async fn pending_withdrawals(&self, admin: &Id) -> PlatformResult<Vec<WithdrawalRequest>> {
        let storage = self.storage().read().await;
        require_admin(&*storage, admin).await?;
        storage.list_pending_withdrawals().await
    }

    /// An account's withdrawal history
    pub async fn withdrawals_for(&self, account: &Id) -> PlatformResult<Vec<WithdrawalRequest>> {
        let storage = self.storage().read().await;
        storage.list_withdrawals_for(account).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        notifier::NullSink,
        storage::{AccountProvider, SledStorage},
    };
    use poweroyo_common::{account::AccountRole, kyc::KycStatus};
    use std::sync::Arc;

    fn payout() -> PayoutDetails {
        PayoutDetails {
            method: "bank-transfer".to_string(),
            destination: "0011223344".to_string(),
        }
    }

    async fn setup() -> (Platform<SledStorage>, Id, Id) {
        let platform = Platform::new(
            SledStorage::temporary().unwrap(),
            PlatformConfig::default(),
            Arc::new(NullSink),
        );
        let admin = platform
            .register_account(None, AccountRole::Admin)
            .await
            .unwrap();
        let user = platform
            .register_account(None, AccountRole::User)
            .await
            .unwrap();
        (platform, admin.id, user.id)
    }

    async fn fund(platform: &Platform<SledStorage>, account: &Id, amount: u64) {
        let mut storage = platform.storage().write().await;
        let mut account = storage.get_account(account).await.unwrap().unwrap();
        account.credit(amount).unwrap();
        storage.save_account(&account).await.unwrap();
    }

    async fn set_kyc(platform: &Platform<SledStorage>, account: &Id, status: KycStatus) {
        let mut storage = platform.storage().write().await;
        let mut account = storage.get_account(account).await.unwrap().unwrap();
        account.kyc_status = status;
        storage.save_account(&account).await.unwrap();
    }

    // Approve a full request cycle so the APPROVED total grows
    async fn approved_withdrawal(
        platform: &Platform<SledStorage>,
        admin: &Id,
        user: &Id,
        amount: u64,
    ) {
        let request = platform
            .request_withdrawal(user, amount, payout())
            .await
            .unwrap();
        platform
            .review_withdrawal(admin, &request.id, true, None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_gate_boundary_exactly_at_limit() {
        let (platform, admin, user) = setup().await;
        fund(&platform, &user, 1_000_000).await;
        approved_withdrawal(&platform, &admin, &user, 45_000).await;

        // 450.00 + 50.00 = exactly 500.00 -> eligible
        let eligibility = platform.check_withdrawal_eligibility(&user, 5_000).await;
        assert!(eligibility.can_withdraw);
        assert!(!eligibility.requires_kyc);
        assert_eq!(eligibility.current_total, 45_000);

        // 450.00 + 50.01 -> denied
        let eligibility = platform.check_withdrawal_eligibility(&user, 5_001).await;
        assert!(!eligibility.can_withdraw);
        assert!(eligibility.requires_kyc);
        assert_eq!(eligibility.limit, 50_000);
        assert!(eligibility.message.contains("450.00"));
        assert!(eligibility.message.contains("500.00"));
        assert!(eligibility.message.contains("500.01"));
    }

    #[tokio::test]
    async fn test_gate_kyc_approved_bypasses_limit() {
        let (platform, admin, user) = setup().await;
        fund(&platform, &user, 1_000_000).await;
        approved_withdrawal(&platform, &admin, &user, 45_000).await;
        set_kyc(&platform, &user, KycStatus::Approved).await;

        let eligibility = platform.check_withdrawal_eligibility(&user, 500_000).await;
        assert!(eligibility.can_withdraw);
        assert!(!eligibility.requires_kyc);
    }

    #[tokio::test]
    async fn test_gate_pending_and_rejected_do_not_count() {
        let (platform, admin, user) = setup().await;
        fund(&platform, &user, 1_000_000).await;

        // A rejected request
        let request = platform
            .request_withdrawal(&user, 45_000, payout())
            .await
            .unwrap();
        platform
            .review_withdrawal(&admin, &request.id, false, Some("details mismatch".to_string()))
            .await
            .unwrap();

        // A pending one
        platform
            .request_withdrawal(&user, 40_000, payout())
            .await
            .unwrap();

        let eligibility = platform.check_withdrawal_eligibility(&user, 50_000).await;
        assert!(eligibility.can_withdraw);
        assert_eq!(eligibility.current_total, 0);
    }

    #[tokio::test]
    async fn test_gate_fails_closed_on_unknown_account() {
        let (platform, _, _) = setup().await;
        let eligibility = platform
            .check_withdrawal_eligibility(&Id::random(), 1_000)
            .await;
        assert!(!eligibility.can_withdraw);
        assert!(!eligibility.requires_kyc);
    }

    #[tokio::test]
    async fn test_submission_does_not_touch_balance() {
        let (platform, _, user) = setup().await;
        fund(&platform, &user, 10_000).await;

        platform
            .request_withdrawal(&user, 4_000, payout())
            .await
            .unwrap();

        let account = platform.account(&user).await.unwrap();
        assert_eq!(account.balance(), 10_000);

        let trail = platform.transaction_history(&user).await.unwrap();
        let record = trail.values().next().unwrap();
        assert_eq!(record.status, TransactionStatus::Pending);
    }

    #[tokio::test]
    async fn test_submission_insufficient_funds() {
        let (platform, _, user) = setup().await;
        fund(&platform, &user, 1_000).await;

        let err = platform
            .request_withdrawal(&user, 1_001, payout())
            .await
            .unwrap_err();
        assert!(matches!(err, PlatformError::Balance(_)));
    }

    #[tokio::test]
    async fn test_submission_over_limit_rejected_with_payload() {
        let (platform, admin, user) = setup().await;
        fund(&platform, &user, 1_000_000).await;
        approved_withdrawal(&platform, &admin, &user, 45_000).await;

        let err = platform
            .request_withdrawal(&user, 5_001, payout())
            .await
            .unwrap_err();
        match err {
            PlatformError::KycRequired {
                current_total,
                limit,
                requested,
            } => {
                assert_eq!(current_total, 45_000);
                assert_eq!(limit, 50_000);
                assert_eq!(requested, 5_001);
            }
            other => panic!("expected KycRequired, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_single_pending_request_enforced() {
        let (platform, _, user) = setup().await;
        fund(&platform, &user, 10_000).await;

        platform
            .request_withdrawal(&user, 1_000, payout())
            .await
            .unwrap();
        let err = platform
            .request_withdrawal(&user, 1, payout())
            .await
            .unwrap_err();
        assert!(matches!(err, PlatformError::PendingWithdrawalExists));
    }

    #[tokio::test]
    async fn test_admin_queue_and_history() {
        let (platform, admin, user) = setup().await;
        fund(&platform, &user, 10_000).await;

        let request = platform
            .request_withdrawal(&user, 1_000, payout())
            .await
            .unwrap();

        let queue = platform.pending_withdrawals(&admin).await.unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].id, request.id);

        // The queue is admin only
        let err = platform.pending_withdrawals(&user).await.unwrap_err();
        assert!(matches!(err, PlatformError::Unauthorized));

        platform
            .review_withdrawal(&admin, &request.id, true, None)
            .await
            .unwrap();
        assert!(platform.pending_withdrawals(&admin).await.unwrap().is_empty());

        let history = platform.withdrawals_for(&user).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status, ReviewStatus::Approved);
    }

    #[tokio::test]
    async fn test_approval_debits_and_finalizes() {
        let (platform, admin, user) = setup().await;
        fund(&platform, &user, 10_000).await;

        let request = platform
            .request_withdrawal(&user, 4_000, payout())
            .await
            .unwrap();
        let reviewed = platform
            .review_withdrawal(&admin, &request.id, true, Some("ok".to_string()))
            .await
            .unwrap();

        assert_eq!(reviewed.status, ReviewStatus::Approved);
        assert_eq!(reviewed.remark.as_deref(), Some("ok"));
        assert!(reviewed.processed_at.is_some());

        let account = platform.account(&user).await.unwrap();
        assert_eq!(account.balance(), 6_000);

        let trail = platform.transaction_history(&user).await.unwrap();
        let record = trail.values().next().unwrap();
        assert_eq!(record.status, TransactionStatus::Completed);
    }

    #[tokio::test]
    async fn test_rejection_keeps_balance() {
        let (platform, admin, user) = setup().await;
        fund(&platform, &user, 10_000).await;

        let request = platform
            .request_withdrawal(&user, 4_000, payout())
            .await
            .unwrap();
        platform
            .review_withdrawal(&admin, &request.id, false, None)
            .await
            .unwrap();

        let account = platform.account(&user).await.unwrap();
        assert_eq!(account.balance(), 10_000);

        let trail = platform.transaction_history(&user).await.unwrap();
        let record = trail.values().next().unwrap();
        assert_eq!(record.status, TransactionStatus::Failed);
    }

    #[tokio::test]
    async fn test_approval_revalidates_balance() {
        let (platform, admin, user) = setup().await;
        fund(&platform, &user, 10_000).await;

        let request = platform
            .request_withdrawal(&user, 10_000, payout())
            .await
            .unwrap();

        // Balance shrinks between submission and approval
        {
            let mut storage = platform.storage().write().await;
            let mut account = storage.get_account(&user).await.unwrap().unwrap();
            account.debit(5_000).unwrap();
            storage.save_account(&account).await.unwrap();
        }

        let err = platform
            .review_withdrawal(&admin, &request.id, true, None)
            .await
            .unwrap_err();
        assert!(matches!(err, PlatformError::Balance(_)));

        // Nothing mutated: the request is still pending and re-processable
        let request = platform.withdrawal(&request.id).await.unwrap();
        assert_eq!(request.status, ReviewStatus::Pending);
        let account = platform.account(&user).await.unwrap();
        assert_eq!(account.balance(), 5_000);
    }

    #[tokio::test]
    async fn test_double_processing_rejected() {
        let (platform, admin, user) = setup().await;
        fund(&platform, &user, 10_000).await;

        let request = platform
            .request_withdrawal(&user, 1_000, payout())
            .await
            .unwrap();
        platform
            .review_withdrawal(&admin, &request.id, true, None)
            .await
            .unwrap();

        let err = platform
            .review_withdrawal(&admin, &request.id, false, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PlatformError::AlreadyProcessed {
                status: ReviewStatus::Approved
            }
        ));

        // No state change from the second attempt
        let account = platform.account(&user).await.unwrap();
        assert_eq!(account.balance(), 9_000);
    }

    #[tokio::test]
    async fn test_review_requires_admin() {
        let (platform, _, user) = setup().await;
        fund(&platform, &user, 10_000).await;

        let request = platform
            .request_withdrawal(&user, 1_000, payout())
            .await
            .unwrap();
        let err = platform
            .review_withdrawal(&user, &request.id, true, None)
            .await
            .unwrap_err();
        assert!(matches!(err, PlatformError::Unauthorized));
    }
}
