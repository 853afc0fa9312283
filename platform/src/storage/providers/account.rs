// Account storage provider trait

use crate::{error::PlatformResult, storage::SledStorage};
use async_trait::async_trait;
use log::trace;
use poweroyo_common::{
    account::Account,
    crypto::{Id, ID_SIZE},
};

/// Storage provider for accounts and the referral code index
#[async_trait]
pub trait AccountProvider {
    /// Get an account by id
    async fn get_account(&self, id: &Id) -> PlatformResult<Option<Account>>;

    /// Resolve a referral code to the account owning it
    /// Returns None when the code does not resolve
    async fn get_account_by_referral_code(&self, code: &str)
        -> PlatformResult<Option<Account>>;

    /// Check if a referral code is already taken
    async fn has_referral_code(&self, code: &str) -> PlatformResult<bool>;

    /// Persist an account and index its referral code
    async fn save_account(&mut self, account: &Account) -> PlatformResult<()>;
}

#[async_trait]
impl AccountProvider for SledStorage {
    async fn get_account(&self, id: &Id) -> PlatformResult<Option<Account>> {
        trace!("get account {}", id);
        self.load_from_disk_optional(&self.accounts, id.as_bytes())
    }

    async fn get_account_by_referral_code(
        &self,
        code: &str,
    ) -> PlatformResult<Option<Account>> {
        trace!("get account by referral code {}", code);
        let Some(bytes) = self.referral_codes.get(code.as_bytes())? else {
            return Ok(None);
        };

        if bytes.len() != ID_SIZE {
            return Err(anyhow::anyhow!(
                "Invalid account id size in referral code index: expected {}, got {}",
                ID_SIZE,
                bytes.len()
            )
            .into());
        }

        let mut id = [0u8; ID_SIZE];
        id.copy_from_slice(&bytes);
        self.get_account(&Id::new(id)).await
    }

    async fn has_referral_code(&self, code: &str) -> PlatformResult<bool> {
        self.contains_data(&self.referral_codes, code.as_bytes())
    }

    async fn save_account(&mut self, account: &Account) -> PlatformResult<()> {
        trace!("save account {}", account.id);
        self.save_to_disk(&self.accounts, account.id.as_bytes(), account)?;
        self.referral_codes
            .insert(account.referral_code.as_bytes(), &account.id.as_bytes()[..])?;
        Ok(())
    }
}
