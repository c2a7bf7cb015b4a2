//! Fee Withdrawal
//!
//! Fees accrue per market as collateral balances backed by the reserve.
//! The trading fee recipient is protocol-wide; the platform fee recipient
//! is set per market.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::TokenAccount;

use super::reserve::*;
use crate::error::ErrorCode;
use crate::state::{Config, Market};

#[event]
pub struct FeesWithdrawn {
    pub market_id: u64,
    pub recipient: Pubkey,
    pub amount: u64,
    pub platform: bool,
}

#[derive(Accounts)]
#[instruction(market_id: u64)]
pub struct WithdrawFees<'info> {
    pub recipient: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Box<Account<'info, Config>>,

    #[account(
        mut,
        seeds = [Market::SEED, &market_id.to_le_bytes()],
        bump = market.bump,
    )]
    pub market: Box<Account<'info, Market>>,

    #[account(
        mut,
        constraint = recipient_collateral.mint == config.collateral_mint @ ErrorCode::InvalidConfiguration,
    )]
    pub recipient_collateral: Box<InterfaceAccount<'info, TokenAccount>>,

    pub reserve: ReserveAccounts<'info>,
}

impl<'info> WithdrawFees<'info> {
    pub fn withdraw_trading_fees(&mut self) -> Result<u64> {
        self.config.check_version()?;
        require_keys_eq!(
            self.recipient.key(),
            self.config.trading_fee_recipient,
            ErrorCode::Unauthorized
        );
        let amount = self.market.take_trading_fees();
        self.pay(amount, false)
    }

    pub fn withdraw_platform_fees(&mut self) -> Result<u64> {
        self.config.check_version()?;
        require_keys_eq!(
            self.recipient.key(),
            self.market.platform_fee_recipient,
            ErrorCode::Unauthorized
        );
        let amount = self.market.take_platform_fees();
        self.pay(amount, true)
    }

    fn pay(&mut self, amount: u64, platform: bool) -> Result<u64> {
        require!(amount > 0, ErrorCode::InvalidAmount);
        let exchange = self.config.exchange_authority;
        let paid = self
            .reserve
            .redeem_to(&exchange, &self.recipient_collateral, amount)?;

        emit!(FeesWithdrawn {
            market_id: self.market.id,
            recipient: self.recipient.key(),
            amount: paid,
            platform,
        });
        Ok(paid)
    }
}
