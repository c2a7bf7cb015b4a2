//! Reserve Donations
//!
//! Anyone may donate collateral to the reserve; donations are invested and
//! tracked separately so the admin can redeem them later. Reward tokens the
//! strategy drops into reserve-owned accounts can be swept to the
//! configured recipient.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
};

use super::reserve::*;
use crate::consts::RESERVE_AUTHORITY_SEED;
use crate::error::ErrorCode;
use crate::state::{Config, YieldReserve};

#[event]
pub struct InterestDonated {
    pub donor: Pubkey,
    pub amount: u64,
    pub donated: u64,
}

#[event]
pub struct DonatedRedeemed {
    pub recipient: Pubkey,
    pub amount: u64,
    pub remaining: u64,
}

#[derive(Accounts)]
pub struct DonateInterest<'info> {
    pub donor: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Box<Account<'info, Config>>,

    #[account(
        mut,
        constraint = donor_collateral.mint == config.collateral_mint @ ErrorCode::InvalidConfiguration,
    )]
    pub donor_collateral: Box<InterfaceAccount<'info, TokenAccount>>,

    pub reserve: ReserveAccounts<'info>,
}

impl<'info> DonateInterest<'info> {
    pub fn donate_interest(&mut self, amount: u64) -> Result<()> {
        self.config.check_version()?;
        let exchange = self.config.exchange_authority;

        self.reserve.state.record_donation(amount)?;
        self.reserve.collect(&self.donor_collateral, &self.donor, amount)?;
        let surcharge = self.reserve.invest(&exchange, amount)?;
        if surcharge > 0 {
            self.reserve.collect(&self.donor_collateral, &self.donor, surcharge)?;
        }

        emit!(InterestDonated {
            donor: self.donor.key(),
            amount,
            donated: self.reserve.state.donated,
        });
        Ok(())
    }
}

#[derive(Accounts)]
pub struct RedeemDonated<'info> {
    pub admin: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
        constraint = config.is_admin(&admin.key()) @ ErrorCode::Unauthorized,
    )]
    pub config: Box<Account<'info, Config>>,

    #[account(
        mut,
        constraint = recipient_collateral.mint == config.collateral_mint @ ErrorCode::InvalidConfiguration,
    )]
    pub recipient_collateral: Box<InterfaceAccount<'info, TokenAccount>>,

    pub reserve: ReserveAccounts<'info>,
}

impl<'info> RedeemDonated<'info> {
    pub fn redeem_donated(&mut self, amount: u64) -> Result<()> {
        self.config.check_version()?;
        let exchange = self.config.exchange_authority;

        self.reserve.state.record_donated_redemption(amount)?;
        let paid = self
            .reserve
            .redeem_to(&exchange, &self.recipient_collateral, amount)?;

        emit!(DonatedRedeemed {
            recipient: self.recipient_collateral.owner,
            amount: paid,
            remaining: self.reserve.state.donated_remaining(),
        });
        Ok(())
    }
}

#[derive(Accounts)]
pub struct WithdrawYieldToken<'info> {
    pub admin: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
        constraint = config.is_admin(&admin.key()) @ ErrorCode::Unauthorized,
    )]
    pub config: Box<Account<'info, Config>>,

    #[account(
        seeds = [YieldReserve::SEED],
        bump = reserve.bump,
    )]
    pub reserve: Box<Account<'info, YieldReserve>>,

    /// CHECK: PDA owning the reward token account
    #[account(
        seeds = [RESERVE_AUTHORITY_SEED],
        bump = reserve.authority_bump,
    )]
    pub reserve_authority: UncheckedAccount<'info>,

    /// Reward token; never the collateral
    #[account(
        constraint = reward_mint.key() != config.collateral_mint @ ErrorCode::InvalidConfiguration,
    )]
    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        token::mint = reward_mint,
        token::authority = reserve_authority,
    )]
    pub source: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        token::mint = reward_mint,
        constraint = destination.owner == config.yield_token_recipient @ ErrorCode::Unauthorized,
    )]
    pub destination: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Token program
    pub token_program: Interface<'info, TokenInterface>,
}

impl<'info> WithdrawYieldToken<'info> {
    pub fn withdraw_yield_token(&mut self, amount: u64) -> Result<()> {
        require!(amount > 0, ErrorCode::InvalidAmount);
        require!(self.source.amount >= amount, ErrorCode::InsufficientBalance);

        let bump = [self.reserve.authority_bump];
        let seeds: &[&[u8]] = &[RESERVE_AUTHORITY_SEED, &bump];
        let signer = [seeds];

        let accounts = TransferChecked {
            from: self.source.to_account_info(),
            mint: self.reward_mint.to_account_info(),
            to: self.destination.to_account_info(),
            authority: self.reserve_authority.to_account_info(),
        };
        let ctx = CpiContext::new_with_signer(self.token_program.to_account_info(), accounts, &signer);
        transfer_checked(ctx, amount, self.reward_mint.decimals)?;

        msg!("Swept {} of {} to {}", amount, self.reward_mint.key(), self.destination.key());
        Ok(())
    }
}
