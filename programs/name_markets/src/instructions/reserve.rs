//! Reserve Accounts
//!
//! Account group shared by every instruction that moves collateral in or
//! out of the reserve. It wires the reserve bookkeeping to the on-chain
//! strategy and performs the SPL transfers around it.
//!
//! ```text
//!   user ──collect──▶ custody ──invest──▶ strategy
//!   user ◀─pay_out── custody ◀─redeem─── strategy
//! ```

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{
    transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked,
};

use crate::consts::RESERVE_AUTHORITY_SEED;
use crate::error::ErrorCode;
use crate::state::YieldReserve;
use crate::strategy::CpiStrategy;

#[derive(Accounts)]
pub struct ReserveAccounts<'info> {
    /// Reserve bookkeeping
    #[account(
        mut,
        seeds = [YieldReserve::SEED],
        bump = state.bump,
    )]
    pub state: Box<Account<'info, YieldReserve>>,

    /// CHECK: PDA owning the custody account and signing strategy calls
    #[account(
        seeds = [RESERVE_AUTHORITY_SEED],
        bump = state.authority_bump,
    )]
    pub authority: UncheckedAccount<'info>,

    /// Collateral held by the reserve and not placed in the strategy
    #[account(
        mut,
        address = state.custody,
    )]
    pub custody: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Collateral mint
    #[account(address = custody.mint)]
    pub collateral_mint: Box<InterfaceAccount<'info, Mint>>,

    /// CHECK: must be the configured strategy program
    #[account(
        executable,
        address = state.strategy,
    )]
    pub strategy_program: UncheckedAccount<'info>,

    /// CHECK: owned and validated by the strategy program
    #[account(
        mut,
        owner = state.strategy,
    )]
    pub strategy_state: UncheckedAccount<'info>,

    /// CHECK: validated by the strategy program
    #[account(mut)]
    pub strategy_vault: UncheckedAccount<'info>,

    /// Token program
    pub token_program: Interface<'info, TokenInterface>,
}

impl<'info> ReserveAccounts<'info> {
    fn strategy<'a>(&self, signer_seeds: &'a [&'a [&'a [u8]]]) -> CpiStrategy<'a, 'info> {
        CpiStrategy {
            program: self.strategy_program.to_account_info(),
            state: self.strategy_state.to_account_info(),
            vault: self.strategy_vault.to_account_info(),
            custody: self.custody.to_account_info(),
            authority: self.authority.to_account_info(),
            token_program: self.token_program.to_account_info(),
            signer_seeds,
        }
    }

    /// Current strategy exchange rate
    pub fn observe_rate(&mut self) -> Result<u128> {
        let bump = [self.state.authority_bump];
        let seeds: &[&[u8]] = &[RESERVE_AUTHORITY_SEED, &bump];
        let signer = [seeds];
        let mut strategy = self.strategy(&signer);
        self.state.observe_rate(&mut strategy)
    }

    /// Moves `amount` from a user's collateral account into custody
    pub fn collect(
        &self,
        from: &InterfaceAccount<'info, TokenAccount>,
        owner: &Signer<'info>,
        amount: u64,
    ) -> Result<()> {
        let accounts = TransferChecked {
            from: from.to_account_info(),
            mint: self.collateral_mint.to_account_info(),
            to: self.custody.to_account_info(),
            authority: owner.to_account_info(),
        };
        let ctx = CpiContext::new(self.token_program.to_account_info(), accounts);
        transfer_checked(ctx, amount, self.collateral_mint.decimals)
    }

    /// Places `amount` of custody in the strategy; returns the rounding
    /// surcharge the depositor still owes
    pub fn invest(&mut self, exchange: &Pubkey, amount: u64) -> Result<u64> {
        self.custody.reload()?;
        let idle = self.custody.amount;

        let bump = [self.state.authority_bump];
        let seeds: &[&[u8]] = &[RESERVE_AUTHORITY_SEED, &bump];
        let signer = [seeds];
        let mut strategy = self.strategy(&signer);
        self.state.invest(exchange, &mut strategy, idle, amount)
    }

    /// Retires `amount` of principal and pays it to `to`, less any rounding
    /// withheld; returns what was paid
    pub fn redeem_to(
        &mut self,
        exchange: &Pubkey,
        to: &InterfaceAccount<'info, TokenAccount>,
        amount: u64,
    ) -> Result<u64> {
        self.custody.reload()?;
        let idle = self.custody.amount;

        let payout = {
            let bump = [self.state.authority_bump];
            let seeds: &[&[u8]] = &[RESERVE_AUTHORITY_SEED, &bump];
            let signer = [seeds];
            let mut strategy = self.strategy(&signer);
            self.state.redeem(exchange, &mut strategy, idle, amount)?
        };
        self.pay_out(to, payout)?;
        Ok(payout)
    }

    /// Redeems exactly `shares` and pays the proceeds to `to`
    pub fn redeem_shares_to(
        &mut self,
        exchange: &Pubkey,
        to: &InterfaceAccount<'info, TokenAccount>,
        shares: u128,
    ) -> Result<u64> {
        self.custody.reload()?;
        let idle = self.custody.amount;

        let paid = {
            let bump = [self.state.authority_bump];
            let seeds: &[&[u8]] = &[RESERVE_AUTHORITY_SEED, &bump];
            let signer = [seeds];
            let mut strategy = self.strategy(&signer);
            self.state.redeem_shares(exchange, &mut strategy, idle, shares)?
        };
        self.pay_out(to, paid)?;
        Ok(paid)
    }

    fn pay_out(&mut self, to: &InterfaceAccount<'info, TokenAccount>, amount: u64) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        self.custody.reload()?;
        require!(self.custody.amount >= amount, ErrorCode::ExternalStrategyFailure);

        let bump = [self.state.authority_bump];
        let seeds: &[&[u8]] = &[RESERVE_AUTHORITY_SEED, &bump];
        let signer = [seeds];

        let accounts = TransferChecked {
            from: self.custody.to_account_info(),
            mint: self.collateral_mint.to_account_info(),
            to: to.to_account_info(),
            authority: self.authority.to_account_info(),
        };
        let ctx = CpiContext::new_with_signer(self.token_program.to_account_info(), accounts, &signer);
        transfer_checked(ctx, amount, self.collateral_mint.decimals)
    }
}
