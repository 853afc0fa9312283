// Investment plan administration and the invest operation

use crate::{
    commission,
    error::{PlatformError, PlatformResult},
    platform::{require_admin, Platform},
    storage::Storage,
};
use log::debug;
use poweroyo_common::{
    api::{CommissionPaidEvent, InvestmentCreatedEvent, NotifyEvent},
    crypto::Id,
    investment::{Investment, InvestmentPlan},
    time::get_current_time_in_seconds,
    transaction::{TransactionKind, TransactionRecord, TransactionStatus},
    utils::format_coin,
};

impl<S: Storage> Platform<S> {
    /// Create an investment plan (admin only)
    pub async fn create_plan(
        &self,
        admin: &Id,
        name: &str,
        principal: u64,
        daily_payout: u64,
        duration_days: u32,
    ) -> PlatformResult<InvestmentPlan> {
        if name.trim().is_empty() {
            return Err(PlatformError::MissingField("name"));
        }
        if principal == 0 || daily_payout == 0 || duration_days == 0 {
            return Err(PlatformError::InvalidAmount);
        }

        let mut storage = self.storage().write().await;
        require_admin(&*storage, admin).await?;

        let plan = InvestmentPlan {
            id: Id::random(),
            name: name.trim().to_string(),
            principal,
            daily_payout,
            duration_days,
            active: true,
            created_at: get_current_time_in_seconds(),
        };
        storage.save_plan(&plan).await?;

        debug!("created plan {} ({})", plan.id, plan.name);
        Ok(plan)
    }

    /// Switch a plan on or off for new investments (admin only)
    /// Existing investments keep their snapshotted terms either way
    pub async fn set_plan_active(
        &self,
        admin: &Id,
        plan_id: &Id,
        active: bool,
    ) -> PlatformResult<InvestmentPlan> {
        let mut storage = self.storage().write().await;
        require_admin(&*storage, admin).await?;

        let mut plan = storage
            .get_plan(plan_id)
            .await?
            .ok_or(PlatformError::PlanNotFound(*plan_id))?;
        plan.active = active;
        storage.save_plan(&plan).await?;
        Ok(plan)
    }

    /// Get a plan by id
    pub async fn plan(&self, id: &Id) -> PlatformResult<InvestmentPlan> {
        let storage = self.storage().read().await;
        storage
            .get_plan(id)
            .await?
            .ok_or(PlatformError::PlanNotFound(*id))
    }

    /// All plans
    pub async fn plans(&self) -> PlatformResult<Vec<InvestmentPlan>> {
        let storage = self.storage().read().await;
        storage.list_plans().await
    }

    /// All investments belonging to an account
    pub async fn investments_for(&self, account: &Id) -> PlatformResult<Vec<Investment>> {
        let storage = self.storage().read().await;
        storage.list_investments_for(account).await
    }

    /// Invest into a plan
    ///
    /// Debits the principal, snapshots the plan terms onto a new ACTIVE
    /// investment and appends the audit record, all under one storage lock.
    /// The commission cascade runs afterwards in the same atomic unit but
    /// best-effort: a cascade failure is logged and never unwinds the
    /// investment.
    pub async fn invest(&self, account_id: &Id, plan_id: &Id) -> PlatformResult<Investment> {
        let mut storage = self.storage().write().await;

        let mut account = storage
            .get_account(account_id)
            .await?
            .ok_or(PlatformError::AccountNotFound(*account_id))?;
        let plan = storage
            .get_plan(plan_id)
            .await?
            .ok_or(PlatformError::PlanNotFound(*plan_id))?;

        if !plan.active {
            return Err(PlatformError::PlanInactive(plan.id));
        }
        if storage.has_active_investment(account_id, plan_id).await? {
            return Err(PlatformError::DuplicateActiveInvestment);
        }

        account.debit(plan.principal)?;

        let now = get_current_time_in_seconds();
        let investment = Investment::from_plan(Id::random(), account.id, &plan, now);

        storage.save_account(&account).await?;
        storage.save_investment(&investment).await?;
        storage
            .append_transaction(&TransactionRecord::new(
                account.id,
                TransactionKind::Investment,
                investment.amount,
                TransactionStatus::Completed,
                Some(investment.id),
                now,
            ))
            .await?;

        debug!(
            "account {} invested {} into plan {}",
            account.id,
            format_coin(investment.amount),
            plan.id
        );

        // The investment is committed; walk the referrer chain best-effort
        let outcome = match &account.referred_by {
            Some(code) => {
                let schedule = storage.get_commission_schedule().await?;
                commission::distribute_best_effort(
                    &mut *storage,
                    &schedule,
                    &account.id,
                    code,
                    investment.amount,
                    &investment.id,
                )
                .await
            }
            None => Default::default(),
        };

        drop(storage);

        self.notify(
            &account.id,
            NotifyEvent::InvestmentCreated,
            &InvestmentCreatedEvent {
                account: account.id,
                investment: investment.id,
                plan: plan.id,
                amount: investment.amount,
            },
        )
        .await;

        for entry in &outcome.entries {
            self.notify(
                &entry.beneficiary,
                NotifyEvent::CommissionPaid,
                &CommissionPaidEvent {
                    beneficiary: entry.beneficiary,
                    source: entry.source,
                    investment: entry.investment,
                    level: entry.level,
                    amount: entry.amount,
                },
            )
            .await;
        }

        Ok(investment)
    }
}
