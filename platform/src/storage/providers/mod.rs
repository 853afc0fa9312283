mod account;
mod commission;
mod deposit;
mod investment;
mod transaction;
mod withdrawal;

pub use self::{
    account::*, commission::*, deposit::*, investment::*, transaction::*, withdrawal::*,
};

use super::SledStorage;

/// Composite storage contract consumed by the platform operations
pub trait Storage:
    AccountProvider
    + InvestmentProvider
    + CommissionProvider
    + WithdrawalProvider
    + DepositProvider
    + TransactionProvider
    + Send
    + Sync
    + 'static
{
}

impl Storage for SledStorage {}
