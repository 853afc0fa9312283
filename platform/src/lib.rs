pub mod commission;
pub mod config;
pub mod deposit;
pub mod error;
pub mod investment;
pub mod kyc;
pub mod notifier;
pub mod platform;
pub mod storage;
pub mod withdrawal;

pub use platform::Platform;
