//! Protocol-wide constants.

/// Smallest token units per whole token (tokens carry 18 decimals)
pub const UNIT_SCALE: u128 = 1_000_000_000_000_000_000;

/// Token ledger decimals, matching `UNIT_SCALE`
pub const TOKEN_DECIMALS: u8 = 18;

/// Fee rate denominator (10000 = 100%)
pub const FEE_SCALE: u64 = 10_000;

/// Fixed-point scale of strategy exchange rates (underlying per share)
pub const RATE_SCALE: u128 = 1_000_000_000_000_000_000;

/// Maximum length of a market or token name, in bytes
pub const MAX_NAME_LEN: usize = 64;

/// Maximum encoded size of a scheduled administrative action
pub const MAX_SPELL_DATA_LEN: usize = 128;

/// Storage layout version written by this build
pub const CURRENT_VERSION: u8 = 2;

pub const CONFIG_SEED: &[u8] = b"config";
pub const MARKET_SEED: &[u8] = b"market";
pub const MARKET_NAME_SEED: &[u8] = b"market_name";
pub const TOKEN_SEED: &[u8] = b"token";
pub const TOKEN_NAME_SEED: &[u8] = b"token_name";
pub const BALANCE_SEED: &[u8] = b"balance";
pub const ALLOWANCE_SEED: &[u8] = b"allowance";
pub const RESERVE_SEED: &[u8] = b"reserve";
pub const RESERVE_AUTHORITY_SEED: &[u8] = b"reserve_authority";
pub const EXCHANGE_AUTHORITY_SEED: &[u8] = b"exchange_authority";
pub const TIMELOCK_SEED: &[u8] = b"timelock";
pub const SPELL_SEED: &[u8] = b"spell";
