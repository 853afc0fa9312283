// Platform facade
// Owns the storage handle behind a write lock: every mutating operation
// takes the write guard for its whole check-then-write sequence, so two
// concurrent submissions against the same account cannot interleave.

use crate::{
    config::PlatformConfig,
    error::{PlatformError, PlatformResult},
    notifier::EventSink,
    storage::Storage,
};
use indexmap::IndexMap;
use log::{debug, warn};
use poweroyo_common::{
    account::{Account, AccountRole},
    api::NotifyEvent,
    commission::{CommissionEntry, CommissionSchedule},
    config::REFERRAL_CODE_LENGTH,
    crypto::Id,
    time::get_current_time_in_seconds,
    transaction::TransactionRecord,
};
use rand::{distributions::Alphanumeric, Rng};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct Platform<S: Storage> {
    storage: RwLock<S>,
    config: PlatformConfig,
    sink: Arc<dyn EventSink>,
}

impl<S: Storage> Platform<S> {
    pub fn new(storage: S, config: PlatformConfig, sink: Arc<dyn EventSink>) -> Self {
        Self {
            storage: RwLock::new(storage),
            config,
            sink,
        }
    }

    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    /// Direct access to the storage handle
    /// Mutating through it bypasses the operation protocols; intended for
    /// administration tooling and tests
    pub fn storage(&self) -> &RwLock<S> {
        &self.storage
    }

    // Serialize and hand an event to the sink; encoding failures are logged
    // and dropped, never surfaced to the operation that emitted the event
    pub(crate) async fn notify<T: Serialize>(&self, account: &Id, event: NotifyEvent, payload: &T) {
        match serde_json::to_value(payload) {
            Ok(value) => self.sink.notify(account, event, value).await,
            Err(e) => warn!("failed to encode {:?} event payload: {}", event, e),
        }
    }

    /// Register a new account
    /// An unresolvable referred-by code rejects the registration; the
    /// generated referral code is unique among all accounts
    pub async fn register_account(
        &self,
        referred_by: Option<&str>,
        role: AccountRole,
    ) -> PlatformResult<Account> {
        let mut storage = self.storage.write().await;

        if let Some(code) = referred_by {
            if storage.get_account_by_referral_code(code).await?.is_none() {
                return Err(PlatformError::ReferrerNotFound(code.to_string()));
            }
        }

        let mut referral_code = None;
        for _ in 0..self.config.referral_code_attempts {
            let candidate = generate_referral_code();
            if !storage.has_referral_code(&candidate).await? {
                referral_code = Some(candidate);
                break;
            }
        }
        let referral_code = referral_code.ok_or_else(|| {
            anyhow::anyhow!(
                "Failed to generate an unused referral code after {} attempts",
                self.config.referral_code_attempts
            )
        })?;

        let account = Account::new(
            Id::random(),
            referral_code,
            referred_by.map(str::to_string),
            role,
            get_current_time_in_seconds(),
        );
        storage.save_account(&account).await?;

        debug!(
            "registered account {} with referral code {}",
            account.id, account.referral_code
        );
        Ok(account)
    }

    /// Get an account by id
    pub async fn account(&self, id: &Id) -> PlatformResult<Account> {
        let storage = self.storage.read().await;
        storage
            .get_account(id)
            .await?
            .ok_or(PlatformError::AccountNotFound(*id))
    }

    /// An account's audit trail in append order
    pub async fn transaction_history(
        &self,
        account: &Id,
    ) -> PlatformResult<IndexMap<Id, TransactionRecord>> {
        let storage = self.storage.read().await;
        storage.list_transactions_for(account).await
    }

    /// All commission ledger entries credited to an account
    pub async fn commissions_for(&self, account: &Id) -> PlatformResult<Vec<CommissionEntry>> {
        let storage = self.storage.read().await;
        storage.list_commissions_for(account).await
    }

    /// Read the active commission schedule
    pub async fn commission_schedule(&self) -> PlatformResult<CommissionSchedule> {
        let storage = self.storage.read().await;
        storage.get_commission_schedule().await
    }

    /// Replace the commission schedule (admin only)
    pub async fn set_commission_schedule(
        &self,
        admin: &Id,
        schedule: CommissionSchedule,
    ) -> PlatformResult<()> {
        schedule.validate()?;

        let mut storage = self.storage.write().await;
        require_admin(&*storage, admin).await?;
        storage.set_commission_schedule(&schedule).await
    }
}

/// Resolve an account and check it carries the admin role
pub(crate) async fn require_admin<S: Storage>(storage: &S, admin: &Id) -> PlatformResult<Account> {
    let account = storage
        .get_account(admin)
        .await?
        .ok_or(PlatformError::AccountNotFound(*admin))?;
    if !account.role.is_admin() {
        return Err(PlatformError::Unauthorized);
    }
    Ok(account)
}

// Uppercase alphanumeric code shown to users and shared as a referral link
fn generate_referral_code() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(REFERRAL_CODE_LENGTH)
        .map(|c| (c as char).to_ascii_uppercase())
        .collect()
}
