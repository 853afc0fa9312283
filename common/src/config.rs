pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 2 decimals numbers
pub const COIN_DECIMALS: u8 = 2;
// 100 to represent 1.00 currency unit
pub const COIN_VALUE: u64 = 10u64.pow(COIN_DECIMALS as u32);

// Cumulative approved withdrawals an account may reach without a verified
// identity. Once `current + requested` would cross it, the withdrawal gate
// requires an approved KYC status.
pub const DEFAULT_KYC_FREE_WITHDRAWAL_LIMIT: u64 = 500 * COIN_VALUE;

// Hard cap on the referrer-chain walk, applied even if the configured
// schedule claims more levels or a malformed back-reference forms a cycle
pub const MAX_COMMISSION_LEVELS: u8 = 10;

// Default commission rates per level, in basis points (100 = 1%)
// Level 1 = direct referrer
pub const DEFAULT_COMMISSION_RATES_BPS: [u16; 5] = [1000, 500, 300, 200, 100];

// Length of the generated account referral code
pub const REFERRAL_CODE_LENGTH: usize = 8;
