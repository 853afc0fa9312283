// Commission schedule and ledger storage provider trait

use crate::{
    error::PlatformResult,
    storage::{SledStorage, COMMISSION_SCHEDULE_KEY},
};
use async_trait::async_trait;
use log::trace;
use poweroyo_common::{
    commission::{CommissionEntry, CommissionError, CommissionSchedule},
    crypto::Id,
};

/// Storage provider for the commission level configuration and the
/// immutable commission ledger
#[async_trait]
pub trait CommissionProvider {
    /// Read the configured schedule, falling back to the default one
    async fn get_commission_schedule(&self) -> PlatformResult<CommissionSchedule>;

    /// Replace the configured schedule
    async fn set_commission_schedule(
        &mut self,
        schedule: &CommissionSchedule,
    ) -> PlatformResult<()>;

    /// Check if a ledger entry exists for this (investment, level) pair
    async fn has_commission_entry(&self, investment: &Id, level: u8) -> PlatformResult<bool>;

    /// Append a ledger entry
    /// Rejects a duplicate (investment, level) pair: entries are immutable
    /// and one level is paid at most once per investment
    async fn append_commission_entry(&mut self, entry: &CommissionEntry) -> PlatformResult<()>;

    /// All entries credited to a beneficiary
    async fn list_commissions_for(&self, beneficiary: &Id)
        -> PlatformResult<Vec<CommissionEntry>>;

    /// All entries produced by one investment, in level order
    async fn list_commissions_for_investment(
        &self,
        investment: &Id,
    ) -> PlatformResult<Vec<CommissionEntry>>;
}

#[async_trait]
impl CommissionProvider for SledStorage {
    async fn get_commission_schedule(&self) -> PlatformResult<CommissionSchedule> {
        trace!("get commission schedule");
        Ok(self
            .load_from_disk_optional(&self.settings, COMMISSION_SCHEDULE_KEY)?
            .unwrap_or_default())
    }

    async fn set_commission_schedule(
        &mut self,
        schedule: &CommissionSchedule,
    ) -> PlatformResult<()> {
        trace!("set commission schedule with {} levels", schedule.depth());
        self.save_to_disk(&self.settings, COMMISSION_SCHEDULE_KEY, schedule)
    }

    async fn has_commission_entry(&self, investment: &Id, level: u8) -> PlatformResult<bool> {
        self.contains_data(&self.commissions, &Self::commission_key(investment, level))
    }

    async fn append_commission_entry(&mut self, entry: &CommissionEntry) -> PlatformResult<()> {
        trace!(
            "append commission entry level {} for investment {}",
            entry.level,
            entry.investment
        );
        if self
            .has_commission_entry(&entry.investment, entry.level)
            .await?
        {
            return Err(CommissionError::DuplicateEntry { level: entry.level }.into());
        }
        let key = Self::commission_key(&entry.investment, entry.level);
        self.save_to_disk(&self.commissions, &key, entry)
    }

    async fn list_commissions_for(
        &self,
        beneficiary: &Id,
    ) -> PlatformResult<Vec<CommissionEntry>> {
        let entries: Vec<CommissionEntry> = self.load_all(&self.commissions)?;
        Ok(entries
            .into_iter()
            .filter(|e| e.beneficiary == *beneficiary)
            .collect())
    }

    async fn list_commissions_for_investment(
        &self,
        investment: &Id,
    ) -> PlatformResult<Vec<CommissionEntry>> {
        let mut entries = Vec::new();
        for res in self.commissions.scan_prefix(investment.as_bytes()) {
            let (_, bytes) = res?;
            entries.push(serde_json::from_slice(&bytes)?);
        }
        Ok(entries)
    }
}
