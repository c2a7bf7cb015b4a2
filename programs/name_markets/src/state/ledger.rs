//! Token Ledger
//!
//! Balances and allowances of name tokens. Amounts are `u128` token units
//! (18 decimals), so the ledger lives in this program instead of an SPL
//! mint. Minting and burning go through
//! [`TokenInfo`](crate::state::TokenInfo) and require its
//! controller; everything else is plain transfer/approve semantics.

use anchor_lang::prelude::*;

use crate::consts::{ALLOWANCE_SEED, BALANCE_SEED};
use crate::error::ErrorCode;

/// Holder balance of one token
///
/// Seeds: ["balance", token_info, holder]
#[account]
#[derive(InitSpace)]
pub struct LedgerAccount {
    pub token: Pubkey,
    pub holder: Pubkey,
    pub amount: u128,
    pub bump: u8,
}

impl LedgerAccount {
    pub const SEED: &'static [u8] = BALANCE_SEED;

    pub fn transfer(&mut self, to: &mut LedgerAccount, amount: u128) -> Result<()> {
        require_keys_eq!(self.token, to.token, ErrorCode::InvalidAmount);
        require!(self.amount >= amount, ErrorCode::InsufficientBalance);
        let credited = to.amount.checked_add(amount).ok_or(ErrorCode::MathOverflow)?;
        self.amount -= amount;
        to.amount = credited;
        Ok(())
    }
}

/// Amount `spender` may move out of `holder`'s balance
///
/// Seeds: ["allowance", token_info, holder, spender]
#[account]
#[derive(InitSpace)]
pub struct Allowance {
    pub token: Pubkey,
    pub holder: Pubkey,
    pub spender: Pubkey,
    pub amount: u128,
    pub bump: u8,
}

impl Allowance {
    pub const SEED: &'static [u8] = ALLOWANCE_SEED;

    /// `u128::MAX` is an unlimited approval and is never decremented.
    pub fn spend(&mut self, amount: u128) -> Result<()> {
        if self.amount == u128::MAX {
            return Ok(());
        }
        require!(self.amount >= amount, ErrorCode::InsufficientBalance);
        self.amount -= amount;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::TokenInfo;

    fn balance(token: Pubkey, amount: u128) -> LedgerAccount {
        LedgerAccount {
            token,
            holder: Pubkey::new_unique(),
            amount,
            bump: 255,
        }
    }

    fn token(controller: Pubkey) -> TokenInfo {
        TokenInfo {
            version: crate::consts::CURRENT_VERSION,
            id: 1,
            market_id: 1,
            name: "example.com".to_string(),
            controller,
            owner: Pubkey::default(),
            supply: 0,
            dai_invested: 0,
            invested_shares: 0,
            created_at: 0,
            bump: 255,
        }
    }

    #[test]
    fn test_transfer_moves_balance() {
        let mint = Pubkey::new_unique();
        let mut from = balance(mint, 100);
        let mut to = balance(mint, 5);

        from.transfer(&mut to, 40).unwrap();
        assert_eq!(from.amount, 60);
        assert_eq!(to.amount, 45);

        assert!(from.transfer(&mut to, 61).is_err());
        assert_eq!(from.amount, 60);
    }

    #[test]
    fn test_transfer_rejects_other_token() {
        let mut from = balance(Pubkey::new_unique(), 10);
        let mut to = balance(Pubkey::new_unique(), 0);
        assert!(from.transfer(&mut to, 1).is_err());
    }

    #[test]
    fn test_allowance_spend() {
        let mut allowance = Allowance {
            token: Pubkey::new_unique(),
            holder: Pubkey::new_unique(),
            spender: Pubkey::new_unique(),
            amount: 10,
            bump: 255,
        };
        allowance.spend(4).unwrap();
        assert_eq!(allowance.amount, 6);
        assert!(allowance.spend(7).is_err());

        allowance.amount = u128::MAX;
        allowance.spend(1_000).unwrap();
        assert_eq!(allowance.amount, u128::MAX);
    }

    #[test]
    fn test_mint_and_burn_require_controller() {
        let controller = Pubkey::new_unique();
        let mut info = token(controller);
        let mut holder = balance(Pubkey::new_unique(), 0);

        assert!(info.mint(&Pubkey::new_unique(), &mut holder, 10).is_err());
        assert_eq!(info.supply, 0);

        info.mint(&controller, &mut holder, 10).unwrap();
        assert_eq!(info.supply, 10);
        assert_eq!(holder.amount, 10);

        assert!(info.burn(&Pubkey::new_unique(), &mut holder, 5).is_err());
        assert!(info.burn(&controller, &mut holder, 11).is_err());
        info.burn(&controller, &mut holder, 4).unwrap();
        assert_eq!(info.supply, 6);
        assert_eq!(holder.amount, 6);
    }
}
