//! Token Interest
//!
//! The collateral backing a token earns yield while it sits in the
//! strategy. Whatever the token's shares are worth beyond its principal
//! belongs to the token owner.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::TokenAccount;

use super::reserve::*;
use crate::error::ErrorCode;
use crate::exchange::take_token_interest;
use crate::state::{Config, TokenInfo};

#[event]
pub struct TokenInterestWithdrawn {
    pub market_id: u64,
    pub token_id: u64,
    pub owner: Pubkey,
    pub shares: u128,
    pub amount: u64,
}

#[derive(Accounts)]
#[instruction(market_id: u64, token_id: u64)]
pub struct WithdrawTokenInterest<'info> {
    pub owner: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Box<Account<'info, Config>>,

    #[account(
        mut,
        seeds = [TokenInfo::SEED, &market_id.to_le_bytes(), &token_id.to_le_bytes()],
        bump = token.bump,
        has_one = owner @ ErrorCode::Unauthorized,
    )]
    pub token: Box<Account<'info, TokenInfo>>,

    #[account(
        mut,
        constraint = owner_collateral.mint == config.collateral_mint @ ErrorCode::InvalidConfiguration,
    )]
    pub owner_collateral: Box<InterfaceAccount<'info, TokenAccount>>,

    pub reserve: ReserveAccounts<'info>,
}

impl<'info> WithdrawTokenInterest<'info> {
    pub fn withdraw_token_interest(&mut self) -> Result<u64> {
        self.config.check_version()?;
        let exchange = self.config.exchange_authority;

        let rate = self.reserve.observe_rate()?;
        let shares = take_token_interest(&mut self.token, rate)?;
        let amount = self
            .reserve
            .redeem_shares_to(&exchange, &self.owner_collateral, shares)?;

        emit!(TokenInterestWithdrawn {
            market_id: self.token.market_id,
            token_id: self.token.id,
            owner: self.owner.key(),
            shares,
            amount,
        });
        Ok(amount)
    }
}
