// Investment plan and investment storage provider trait

use crate::{error::PlatformResult, storage::SledStorage};
use async_trait::async_trait;
use log::trace;
use poweroyo_common::{
    crypto::Id,
    investment::{Investment, InvestmentPlan},
};

/// Storage provider for plans and the investments created from them
#[async_trait]
pub trait InvestmentProvider {
    /// Get a plan by id
    async fn get_plan(&self, id: &Id) -> PlatformResult<Option<InvestmentPlan>>;

    /// Persist a plan
    async fn save_plan(&mut self, plan: &InvestmentPlan) -> PlatformResult<()>;

    /// All plans, in key order
    async fn list_plans(&self) -> PlatformResult<Vec<InvestmentPlan>>;

    /// Get an investment by id
    async fn get_investment(&self, id: &Id) -> PlatformResult<Option<Investment>>;

    /// Persist an investment
    async fn save_investment(&mut self, investment: &Investment) -> PlatformResult<()>;

    /// Check if the account already holds an ACTIVE investment on this plan
    async fn has_active_investment(&self, account: &Id, plan: &Id) -> PlatformResult<bool>;

    /// All investments belonging to an account
    async fn list_investments_for(&self, account: &Id) -> PlatformResult<Vec<Investment>>;
}

#[async_trait]
impl InvestmentProvider for SledStorage {
    async fn get_plan(&self, id: &Id) -> PlatformResult<Option<InvestmentPlan>> {
        trace!("get plan {}", id);
        self.load_from_disk_optional(&self.plans, id.as_bytes())
    }

    async fn save_plan(&mut self, plan: &InvestmentPlan) -> PlatformResult<()> {
        trace!("save plan {}", plan.id);
        self.save_to_disk(&self.plans, plan.id.as_bytes(), plan)
    }

    async fn list_plans(&self) -> PlatformResult<Vec<InvestmentPlan>> {
        self.load_all(&self.plans)
    }

    async fn get_investment(&self, id: &Id) -> PlatformResult<Option<Investment>> {
        trace!("get investment {}", id);
        self.load_from_disk_optional(&self.investments, id.as_bytes())
    }

    async fn save_investment(&mut self, investment: &Investment) -> PlatformResult<()> {
        trace!("save investment {}", investment.id);
        self.save_to_disk(&self.investments, investment.id.as_bytes(), investment)
    }

    async fn has_active_investment(&self, account: &Id, plan: &Id) -> PlatformResult<bool> {
        let investments: Vec<Investment> = self.load_all(&self.investments)?;
        Ok(investments
            .iter()
            .any(|i| i.account == *account && i.plan == *plan && i.status.is_active()))
    }

    async fn list_investments_for(&self, account: &Id) -> PlatformResult<Vec<Investment>> {
        let investments: Vec<Investment> = self.load_all(&self.investments)?;
        Ok(investments
            .into_iter()
            .filter(|i| i.account == *account)
            .collect())
    }
}
