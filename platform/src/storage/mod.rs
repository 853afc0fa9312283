mod backend;
pub mod providers;

pub use providers::*;

use crate::error::PlatformResult;
use anyhow::Context;
use backend::{Db, Tree};
use log::trace;
use poweroyo_common::crypto::{Id, ID_SIZE};
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;

// Keys used to retrieve from the settings tree
pub(crate) const COMMISSION_SCHEDULE_KEY: &[u8] = b"COMMISSION_SCHEDULE";

/// Sled-backed platform storage
/// One tree per entity, raw id bytes as keys, JSON-encoded values
pub struct SledStorage {
    db: Db,

    // Accounts by id, plus the referral code index (code -> account id)
    pub(crate) accounts: Tree,
    pub(crate) referral_codes: Tree,

    // Investment plans and the investments created from them
    pub(crate) plans: Tree,
    pub(crate) investments: Tree,

    // Commission ledger, keyed by investment id + level byte so one level
    // can never be recorded twice for the same investment
    pub(crate) commissions: Tree,

    // Withdrawal and deposit requests by id
    pub(crate) withdrawals: Tree,
    pub(crate) deposits: Tree,

    // Append-only audit trail keyed by a monotonic sequence, plus an index
    // from referenced entity id to the pending record awaiting finalization
    pub(crate) transactions: Tree,
    pub(crate) transaction_refs: Tree,

    // Commission schedule and other administrative settings
    pub(crate) settings: Tree,
}

impl SledStorage {
    pub fn open(path: impl AsRef<Path>) -> PlatformResult<Self> {
        Self::with_db(backend::open(path)?)
    }

    /// Open an in-memory database, useful for tests
    pub fn temporary() -> PlatformResult<Self> {
        Self::with_db(backend::temporary()?)
    }

    fn with_db(db: Db) -> PlatformResult<Self> {
        Ok(Self {
            accounts: db.open_tree("accounts")?,
            referral_codes: db.open_tree("referral_codes")?,
            plans: db.open_tree("plans")?,
            investments: db.open_tree("investments")?,
            commissions: db.open_tree("commissions")?,
            withdrawals: db.open_tree("withdrawals")?,
            deposits: db.open_tree("deposits")?,
            transactions: db.open_tree("transactions")?,
            transaction_refs: db.open_tree("transaction_refs")?,
            settings: db.open_tree("settings")?,
            db,
        })
    }

    // Flush on disk to make sure it is saved
    pub async fn flush(&self) -> PlatformResult<()> {
        self.db.flush_async().await?;
        Ok(())
    }

    // Monotonic key for the append-only transaction trail
    pub(crate) fn next_sequence(&self) -> PlatformResult<[u8; 8]> {
        Ok(self.db.generate_id()?.to_be_bytes())
    }

    // Ledger key for one (investment, level) pair
    pub(crate) fn commission_key(investment: &Id, level: u8) -> [u8; ID_SIZE + 1] {
        let mut key = [0u8; ID_SIZE + 1];
        key[..ID_SIZE].copy_from_slice(investment.as_bytes());
        key[ID_SIZE] = level;
        key
    }

    // Internal helper methods for encoding/decoding

    pub(crate) fn load_from_disk_optional<V: DeserializeOwned>(
        &self,
        tree: &Tree,
        key: &[u8],
    ) -> PlatformResult<Option<V>> {
        trace!("load from disk optional");
        match tree.get(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    pub(crate) fn load_from_disk<V: DeserializeOwned>(
        &self,
        tree: &Tree,
        key: &[u8],
    ) -> PlatformResult<V> {
        trace!("load from disk");
        let value = self
            .load_from_disk_optional(tree, key)?
            .with_context(|| {
                format!(
                    "Error while loading data with key {} from disk",
                    hex::encode(key)
                )
            })?;
        Ok(value)
    }

    pub(crate) fn save_to_disk<V: Serialize>(
        &self,
        tree: &Tree,
        key: &[u8],
        value: &V,
    ) -> PlatformResult<()> {
        trace!("save to disk");
        tree.insert(key, serde_json::to_vec(value)?)?;
        Ok(())
    }

    pub(crate) fn contains_data(&self, tree: &Tree, key: &[u8]) -> PlatformResult<bool> {
        trace!("contains data");
        Ok(tree.contains_key(key)?)
    }

    // Decode every value of a tree, in key order
    pub(crate) fn load_all<V: DeserializeOwned>(&self, tree: &Tree) -> PlatformResult<Vec<V>> {
        let mut values = Vec::new();
        for res in tree.iter() {
            let (_, bytes) = res?;
            values.push(serde_json::from_slice(&bytes)?);
        }
        Ok(values)
    }
}
