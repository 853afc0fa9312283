// KYC status tracking
// The document collection and review workflow lives outside the platform
// core; only the resulting status value is stored per account and consumed
// by the withdrawal gate.

mod status;

pub use status::*;
