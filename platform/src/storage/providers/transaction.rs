// Audit trail storage provider trait
// Records are append-only; the only permitted mutation is finalizing the
// status of a record that was created PENDING.

use crate::{error::PlatformResult, storage::SledStorage};
use anyhow::anyhow;
use async_trait::async_trait;
use indexmap::IndexMap;
use log::trace;
use poweroyo_common::{
    crypto::Id,
    transaction::{TransactionRecord, TransactionStatus},
};

/// Storage provider for transaction records
#[async_trait]
pub trait TransactionProvider {
    /// Append a record to the trail
    async fn append_transaction(&mut self, record: &TransactionRecord) -> PlatformResult<()>;

    /// Finalize the PENDING record referencing the given entity
    async fn finalize_transaction_for(
        &mut self,
        reference: &Id,
        status: TransactionStatus,
    ) -> PlatformResult<()>;

    /// An account's records in append order, keyed by record id
    async fn list_transactions_for(
        &self,
        account: &Id,
    ) -> PlatformResult<IndexMap<Id, TransactionRecord>>;
}

#[async_trait]
impl TransactionProvider for SledStorage {
    async fn append_transaction(&mut self, record: &TransactionRecord) -> PlatformResult<()> {
        trace!("append {} transaction for {}", record.kind, record.account);
        let sequence = self.next_sequence()?;
        self.save_to_disk(&self.transactions, &sequence, record)?;

        // Only records awaiting finalization are indexed by their reference
        if record.status == TransactionStatus::Pending {
            if let Some(reference) = &record.reference {
                self.transaction_refs
                    .insert(reference.as_bytes(), &sequence[..])?;
            }
        }

        Ok(())
    }

    async fn finalize_transaction_for(
        &mut self,
        reference: &Id,
        status: TransactionStatus,
    ) -> PlatformResult<()> {
        trace!("finalize transaction for reference {}", reference);
        let sequence = self
            .transaction_refs
            .get(reference.as_bytes())?
            .ok_or_else(|| anyhow!("No pending transaction record references {}", reference))?;

        let mut record: TransactionRecord = self.load_from_disk(&self.transactions, &sequence)?;
        record.status = status;
        self.save_to_disk(&self.transactions, &sequence, &record)?;
        self.transaction_refs.remove(reference.as_bytes())?;
        Ok(())
    }

    async fn list_transactions_for(
        &self,
        account: &Id,
    ) -> PlatformResult<IndexMap<Id, TransactionRecord>> {
        let mut result = IndexMap::new();
        for res in self.transactions.iter() {
            let (_, bytes) = res?;
            let record: TransactionRecord = serde_json::from_slice(&bytes)?;
            if record.account == *account {
                result.insert(record.id, record);
            }
        }
        Ok(result)
    }
}
