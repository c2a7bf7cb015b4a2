//! Name Token State
//!
//! A token is one verified name listed in a market. Its account doubles as
//! the token's supply account: the curve position (`supply`,
//! `dai_invested`) and the ledger's total supply are the same number.

use anchor_lang::prelude::*;

use crate::consts::{TOKEN_NAME_SEED, TOKEN_SEED};
use crate::error::ErrorCode;
use crate::state::LedgerAccount;

/// Token account
///
/// Seeds: ["token", market_id.to_le_bytes(), token_id.to_le_bytes()]
#[account]
#[derive(InitSpace)]
pub struct TokenInfo {
    /// Storage layout version
    pub version: u8,

    /// Dense, 1-based id within the market
    pub id: u64,

    pub market_id: u64,

    /// The verified name, e.g. "example.com"
    #[max_len(64)]
    pub name: String,

    /// Only key allowed to mint or burn ledger balances
    pub controller: Pubkey,

    /// Receives interest accrued on this token's collateral
    pub owner: Pubkey,

    /// Total minted units
    pub supply: u128,

    /// Collateral attributed to the curve position, excluding fees
    pub dai_invested: u64,

    /// Strategy shares backing `dai_invested` plus accrued interest
    pub invested_shares: u128,

    /// Unix timestamp when the token was listed
    pub created_at: i64,

    /// PDA bump seed
    pub bump: u8,
}

impl TokenInfo {
    pub const SEED: &'static [u8] = TOKEN_SEED;

    /// Credits `amount` new units to `to`
    pub fn mint(&mut self, controller: &Pubkey, to: &mut LedgerAccount, amount: u128) -> Result<()> {
        require_keys_eq!(*controller, self.controller, ErrorCode::Unauthorized);
        self.supply = self.supply.checked_add(amount).ok_or(ErrorCode::MathOverflow)?;
        to.amount = to.amount.checked_add(amount).ok_or(ErrorCode::MathOverflow)?;
        Ok(())
    }

    /// Destroys `amount` units held by `from`
    pub fn burn(&mut self, controller: &Pubkey, from: &mut LedgerAccount, amount: u128) -> Result<()> {
        require_keys_eq!(*controller, self.controller, ErrorCode::Unauthorized);
        require!(from.amount >= amount, ErrorCode::InsufficientBalance);
        require!(self.supply >= amount, ErrorCode::InsufficientBalance);
        from.amount -= amount;
        self.supply -= amount;
        Ok(())
    }
}

/// Secondary token lookup by name within a market
///
/// Seeds: ["token_name", market_id.to_le_bytes(), sha256(name)]
#[account]
#[derive(InitSpace)]
pub struct TokenName {
    pub market_id: u64,
    pub token_id: u64,
    pub bump: u8,
}

impl TokenName {
    pub const SEED: &'static [u8] = TOKEN_NAME_SEED;
}
