// End-to-end tests driving the platform through its public operations
// against an on-disk database.

use poweroyo_common::{
    account::AccountRole,
    api::NotifyEvent,
    commission::CommissionSchedule,
    config::COIN_VALUE,
    crypto::Id,
    kyc::KycStatus,
    transaction::{TransactionKind, TransactionStatus},
    withdrawal::{PayoutDetails, ReviewStatus},
};
use poweroyo_platform::{
    config::PlatformConfig,
    error::PlatformError,
    notifier::{ChannelSink, EventSink, Notification, NullSink},
    storage::{AccountProvider, SledStorage},
    Platform,
};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;

fn payout() -> PayoutDetails {
    PayoutDetails {
        method: "bank-transfer".to_string(),
        destination: "0011223344".to_string(),
    }
}

struct TestEnv {
    platform: Platform<SledStorage>,
    admin: Id,
    // Keeps the database directory alive for the test's duration
    _dir: TempDir,
}

async fn setup_with_sink(sink: Arc<dyn EventSink>) -> TestEnv {
    let dir = TempDir::new().unwrap();
    let storage = SledStorage::open(dir.path().join("platform-db")).unwrap();
    let platform = Platform::new(storage, PlatformConfig::default(), sink);
    let admin = platform
        .register_account(None, AccountRole::Admin)
        .await
        .unwrap();
    TestEnv {
        platform,
        admin: admin.id,
        _dir: dir,
    }
}

async fn setup() -> TestEnv {
    setup_with_sink(Arc::new(NullSink)).await
}

// Credit a wallet through the deposit request + admin approval flow
async fn fund(env: &TestEnv, account: &Id, amount: u64) {
    let request = env
        .platform
        .request_deposit(account, amount, "TEST-FUNDING")
        .await
        .unwrap();
    env.platform
        .review_deposit(&env.admin, &request.id, true, None)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_investment_without_referrer() {
    // Account X (wallet 1000.00, no referrer) invests 100.00
    let env = setup().await;
    let x = env
        .platform
        .register_account(None, AccountRole::User)
        .await
        .unwrap();
    fund(&env, &x.id, 1_000 * COIN_VALUE).await;

    let plan = env
        .platform
        .create_plan(&env.admin, "Starter", 100 * COIN_VALUE, 3 * COIN_VALUE, 40)
        .await
        .unwrap();
    let investment = env.platform.invest(&x.id, &plan.id).await.unwrap();

    let account = env.platform.account(&x.id).await.unwrap();
    assert_eq!(account.balance(), 900 * COIN_VALUE);

    let trail = env.platform.transaction_history(&x.id).await.unwrap();
    let investment_records: Vec<_> = trail
        .values()
        .filter(|r| r.kind == TransactionKind::Investment)
        .collect();
    assert_eq!(investment_records.len(), 1);
    assert_eq!(investment_records[0].amount, 100 * COIN_VALUE);
    assert_eq!(investment_records[0].status, TransactionStatus::Completed);
    assert_eq!(investment_records[0].reference, Some(investment.id));

    // No referral chain, no commission entries anywhere
    assert!(env.platform.commissions_for(&x.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_single_level_referral() {
    // Y referred by X, X referred by nobody; Y invests 100.00 at 10%
    let env = setup().await;
    let x = env
        .platform
        .register_account(None, AccountRole::User)
        .await
        .unwrap();
    let y = env
        .platform
        .register_account(Some(&x.referral_code), AccountRole::User)
        .await
        .unwrap();
    fund(&env, &y.id, 100 * COIN_VALUE).await;

    let plan = env
        .platform
        .create_plan(&env.admin, "Starter", 100 * COIN_VALUE, 3 * COIN_VALUE, 40)
        .await
        .unwrap();
    env.platform.invest(&y.id, &plan.id).await.unwrap();

    let x = env.platform.account(&x.id).await.unwrap();
    assert_eq!(x.balance(), 10 * COIN_VALUE);
    assert_eq!(x.total_earnings(), 10 * COIN_VALUE);

    let entries = env.platform.commissions_for(&x.id).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].level, 1);
    assert_eq!(entries[0].rate_bps, 1_000);
    assert_eq!(entries[0].amount, 10 * COIN_VALUE);

    // No level 2 entry exists for this investment
    let y_trail = env.platform.transaction_history(&y.id).await.unwrap();
    assert!(y_trail
        .values()
        .all(|r| r.kind != TransactionKind::Referral));
}

#[tokio::test]
async fn test_full_depth_cascade() {
    // Five ancestors, five configured levels: every level paid exactly once
    let env = setup().await;

    let mut ancestors = Vec::new();
    let mut referred_by: Option<String> = None;
    for _ in 0..5 {
        let account = env
            .platform
            .register_account(referred_by.as_deref(), AccountRole::User)
            .await
            .unwrap();
        referred_by = Some(account.referral_code.clone());
        ancestors.push(account);
    }
    // ancestors[4] is the closest; the investor is referred by it
    let investor = env
        .platform
        .register_account(referred_by.as_deref(), AccountRole::User)
        .await
        .unwrap();
    fund(&env, &investor.id, 100 * COIN_VALUE).await;

    let plan = env
        .platform
        .create_plan(&env.admin, "Starter", 100 * COIN_VALUE, 3 * COIN_VALUE, 40)
        .await
        .unwrap();
    env.platform.invest(&investor.id, &plan.id).await.unwrap();

    // Default schedule: 10%, 5%, 3%, 2%, 1% of 100.00
    let expected = [10_00u64, 5_00, 3_00, 2_00, 1_00];
    for (distance, expected_amount) in expected.iter().enumerate() {
        let ancestor = &ancestors[4 - distance];
        let account = env.platform.account(&ancestor.id).await.unwrap();
        assert_eq!(account.balance(), *expected_amount);
        assert_eq!(account.total_earnings(), *expected_amount);

        let entries = env.platform.commissions_for(&ancestor.id).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].level as usize, distance + 1);
    }
}

#[tokio::test]
async fn test_broken_referral_chain_is_silent() {
    // Historical data may carry a code that no longer resolves; the
    // investment must still settle with zero commission entries
    let env = setup().await;
    let user = env
        .platform
        .register_account(None, AccountRole::User)
        .await
        .unwrap();
    fund(&env, &user.id, 100 * COIN_VALUE).await;

    // Corrupt the upward link directly in storage
    {
        let mut storage = env.platform.storage().write().await;
        let mut account = storage.get_account(&user.id).await.unwrap().unwrap();
        account.referred_by = Some("GONE0000".to_string());
        storage.save_account(&account).await.unwrap();
    }

    let plan = env
        .platform
        .create_plan(&env.admin, "Starter", 100 * COIN_VALUE, 3 * COIN_VALUE, 40)
        .await
        .unwrap();
    let investment = env.platform.invest(&user.id, &plan.id).await.unwrap();

    let account = env.platform.account(&user.id).await.unwrap();
    assert_eq!(account.balance(), 0);
    assert_eq!(investment.amount, 100 * COIN_VALUE);
}

#[tokio::test]
async fn test_custom_schedule_truncated_by_chain_length() {
    // Two ancestors, three configured levels: exactly two entries
    let env = setup().await;
    env.platform
        .set_commission_schedule(&env.admin, CommissionSchedule::new(vec![1000, 500, 300]))
        .await
        .unwrap();

    let grandparent = env
        .platform
        .register_account(None, AccountRole::User)
        .await
        .unwrap();
    let parent = env
        .platform
        .register_account(Some(&grandparent.referral_code), AccountRole::User)
        .await
        .unwrap();
    let investor = env
        .platform
        .register_account(Some(&parent.referral_code), AccountRole::User)
        .await
        .unwrap();
    fund(&env, &investor.id, 100 * COIN_VALUE).await;

    let plan = env
        .platform
        .create_plan(&env.admin, "Starter", 100 * COIN_VALUE, 3 * COIN_VALUE, 40)
        .await
        .unwrap();
    env.platform.invest(&investor.id, &plan.id).await.unwrap();

    assert_eq!(
        env.platform
            .commissions_for(&parent.id)
            .await
            .unwrap()
            .len(),
        1
    );
    assert_eq!(
        env.platform
            .commissions_for(&grandparent.id)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn test_withdrawal_gate_end_to_end() {
    let env = setup().await;
    let user = env
        .platform
        .register_account(None, AccountRole::User)
        .await
        .unwrap();
    fund(&env, &user.id, 10_000 * COIN_VALUE).await;

    // Build 450.00 of approved history
    let request = env
        .platform
        .request_withdrawal(&user.id, 450 * COIN_VALUE, payout())
        .await
        .unwrap();
    env.platform
        .review_withdrawal(&env.admin, &request.id, true, None)
        .await
        .unwrap();

    // Exactly at the limit passes, one unit above requires KYC
    let at_limit = env
        .platform
        .check_withdrawal_eligibility(&user.id, 50 * COIN_VALUE)
        .await;
    assert!(at_limit.can_withdraw);

    let over_limit = env
        .platform
        .check_withdrawal_eligibility(&user.id, 50 * COIN_VALUE + 1)
        .await;
    assert!(!over_limit.can_withdraw);
    assert!(over_limit.requires_kyc);

    // An approved KYC unblocks any amount
    env.platform.submit_kyc(&user.id).await.unwrap();
    env.platform
        .review_kyc(&env.admin, &user.id, true, None)
        .await
        .unwrap();

    let unblocked = env
        .platform
        .check_withdrawal_eligibility(&user.id, 5_000 * COIN_VALUE)
        .await;
    assert!(unblocked.can_withdraw);
    assert!(!unblocked.requires_kyc);

    let request = env
        .platform
        .request_withdrawal(&user.id, 5_000 * COIN_VALUE, payout())
        .await
        .unwrap();
    let reviewed = env
        .platform
        .review_withdrawal(&env.admin, &request.id, true, None)
        .await
        .unwrap();
    assert_eq!(reviewed.status, ReviewStatus::Approved);

    let account = env.platform.account(&user.id).await.unwrap();
    assert_eq!(account.balance(), (10_000 - 450 - 5_000) * COIN_VALUE);
    assert_eq!(account.kyc_status, KycStatus::Approved);
}

#[tokio::test]
async fn test_withdrawal_protocol_invariants() {
    let env = setup().await;
    let user = env
        .platform
        .register_account(None, AccountRole::User)
        .await
        .unwrap();
    fund(&env, &user.id, 100 * COIN_VALUE).await;

    let request = env
        .platform
        .request_withdrawal(&user.id, 60 * COIN_VALUE, payout())
        .await
        .unwrap();

    // Submission holds, it does not deduct
    assert_eq!(
        env.platform.account(&user.id).await.unwrap().balance(),
        100 * COIN_VALUE
    );

    // One outstanding request per account
    let err = env
        .platform
        .request_withdrawal(&user.id, COIN_VALUE, payout())
        .await
        .unwrap_err();
    assert!(matches!(err, PlatformError::PendingWithdrawalExists));

    // Approval settles and finalizes
    env.platform
        .review_withdrawal(&env.admin, &request.id, true, None)
        .await
        .unwrap();
    assert_eq!(
        env.platform.account(&user.id).await.unwrap().balance(),
        40 * COIN_VALUE
    );

    // Re-processing the settled request changes nothing
    let err = env
        .platform
        .review_withdrawal(&env.admin, &request.id, false, None)
        .await
        .unwrap_err();
    assert!(matches!(err, PlatformError::AlreadyProcessed { .. }));
    assert_eq!(
        env.platform.account(&user.id).await.unwrap().balance(),
        40 * COIN_VALUE
    );
}

#[tokio::test]
async fn test_notifications_emitted() {
    let (sink, mut receiver) = ChannelSink::new();
    let env = setup_with_sink(Arc::new(sink)).await;

    let x = env
        .platform
        .register_account(None, AccountRole::User)
        .await
        .unwrap();
    let y = env
        .platform
        .register_account(Some(&x.referral_code), AccountRole::User)
        .await
        .unwrap();
    fund(&env, &y.id, 100 * COIN_VALUE).await;

    let plan = env
        .platform
        .create_plan(&env.admin, "Starter", 100 * COIN_VALUE, 3 * COIN_VALUE, 40)
        .await
        .unwrap();
    env.platform.invest(&y.id, &plan.id).await.unwrap();

    let events = drain(&mut receiver);
    // Funding produced a deposit review event
    assert!(events
        .iter()
        .any(|n| n.event == NotifyEvent::DepositReviewed && n.account == y.id));
    assert!(events
        .iter()
        .any(|n| n.event == NotifyEvent::InvestmentCreated && n.account == y.id));
    assert!(events
        .iter()
        .any(|n| n.event == NotifyEvent::CommissionPaid && n.account == x.id));
}

#[tokio::test]
async fn test_reopen_keeps_state() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("platform-db");

    let (admin_id, user_id, code) = {
        let storage = SledStorage::open(&path).unwrap();
        let platform = Platform::new(storage, PlatformConfig::default(), Arc::new(NullSink));
        let admin = platform
            .register_account(None, AccountRole::Admin)
            .await
            .unwrap();
        let user = platform
            .register_account(None, AccountRole::User)
            .await
            .unwrap();
        let request = platform
            .request_deposit(&user.id, 77 * COIN_VALUE, "TXN-77")
            .await
            .unwrap();
        platform
            .review_deposit(&admin.id, &request.id, true, None)
            .await
            .unwrap();
        platform.storage().read().await.flush().await.unwrap();
        (admin.id, user.id, user.referral_code.clone())
    };

    let storage = SledStorage::open(&path).unwrap();
    let platform = Platform::new(storage, PlatformConfig::default(), Arc::new(NullSink));

    let user = platform.account(&user_id).await.unwrap();
    assert_eq!(user.balance(), 77 * COIN_VALUE);
    assert_eq!(user.referral_code, code);

    let admin = platform.account(&admin_id).await.unwrap();
    assert!(admin.role.is_admin());
}

fn drain(receiver: &mut UnboundedReceiver<Notification>) -> Vec<Notification> {
    let mut events = Vec::new();
    while let Ok(notification) = receiver.try_recv() {
        events.push(notification);
    }
    events
}
