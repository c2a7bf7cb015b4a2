//! Token Ledger
//!
//! Holder-facing operations on the internal token ledger: opening a
//! balance, transfers, and allowances for third-party spending. Minting and
//! burning only happen inside trades.

use anchor_lang::prelude::*;

use crate::error::ErrorCode;
use crate::state::{Allowance, LedgerAccount, TokenInfo};

#[event]
pub struct LedgerTransfer {
    pub token: Pubkey,
    pub from: Pubkey,
    pub to: Pubkey,
    pub amount: u128,
}

#[event]
pub struct LedgerApproval {
    pub token: Pubkey,
    pub holder: Pubkey,
    pub spender: Pubkey,
    pub amount: u128,
}

#[derive(Accounts)]
pub struct OpenLedgerAccount<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    /// CHECK: any key may hold tokens
    pub holder: UncheckedAccount<'info>,

    pub token: Box<Account<'info, TokenInfo>>,

    #[account(
        init_if_needed,
        payer = payer,
        space = 8 + LedgerAccount::INIT_SPACE,
        seeds = [LedgerAccount::SEED, token.key().as_ref(), holder.key().as_ref()],
        bump,
    )]
    pub balance: Box<Account<'info, LedgerAccount>>,

    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> OpenLedgerAccount<'info> {
    pub fn open_ledger_account(&mut self, bumps: &OpenLedgerAccountBumps) -> Result<()> {
        if self.balance.token == Pubkey::default() {
            self.balance.set_inner(LedgerAccount {
                token: self.token.key(),
                holder: self.holder.key(),
                amount: 0,
                bump: bumps.balance,
            });
        }
        Ok(())
    }
}

#[derive(Accounts)]
pub struct TransferBalance<'info> {
    pub holder: Signer<'info>,

    pub token: Box<Account<'info, TokenInfo>>,

    #[account(
        mut,
        seeds = [LedgerAccount::SEED, token.key().as_ref(), holder.key().as_ref()],
        bump = from.bump,
    )]
    pub from: Box<Account<'info, LedgerAccount>>,

    #[account(
        mut,
        has_one = token,
        constraint = to.key() != from.key() @ ErrorCode::InvalidAmount,
    )]
    pub to: Box<Account<'info, LedgerAccount>>,
}

impl<'info> TransferBalance<'info> {
    pub fn transfer(&mut self, amount: u128) -> Result<()> {
        self.from.transfer(&mut self.to, amount)?;

        emit!(LedgerTransfer {
            token: self.token.key(),
            from: self.from.holder,
            to: self.to.holder,
            amount,
        });
        Ok(())
    }
}

#[derive(Accounts)]
pub struct Approve<'info> {
    #[account(mut)]
    pub holder: Signer<'info>,

    /// CHECK: any key may be approved
    pub spender: UncheckedAccount<'info>,

    pub token: Box<Account<'info, TokenInfo>>,

    #[account(
        init_if_needed,
        payer = holder,
        space = 8 + Allowance::INIT_SPACE,
        seeds = [
            Allowance::SEED,
            token.key().as_ref(),
            holder.key().as_ref(),
            spender.key().as_ref(),
        ],
        bump,
    )]
    pub allowance: Box<Account<'info, Allowance>>,

    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> Approve<'info> {
    pub fn approve(&mut self, amount: u128, bumps: &ApproveBumps) -> Result<()> {
        self.allowance.set_inner(Allowance {
            token: self.token.key(),
            holder: self.holder.key(),
            spender: self.spender.key(),
            amount,
            bump: bumps.allowance,
        });

        emit!(LedgerApproval {
            token: self.token.key(),
            holder: self.holder.key(),
            spender: self.spender.key(),
            amount,
        });
        Ok(())
    }
}

#[derive(Accounts)]
pub struct TransferBalanceFrom<'info> {
    pub spender: Signer<'info>,

    /// CHECK: identifies the balance and allowance below
    pub holder: UncheckedAccount<'info>,

    pub token: Box<Account<'info, TokenInfo>>,

    #[account(
        mut,
        seeds = [
            Allowance::SEED,
            token.key().as_ref(),
            holder.key().as_ref(),
            spender.key().as_ref(),
        ],
        bump = allowance.bump,
    )]
    pub allowance: Box<Account<'info, Allowance>>,

    #[account(
        mut,
        seeds = [LedgerAccount::SEED, token.key().as_ref(), holder.key().as_ref()],
        bump = from.bump,
    )]
    pub from: Box<Account<'info, LedgerAccount>>,

    #[account(
        mut,
        has_one = token,
        constraint = to.key() != from.key() @ ErrorCode::InvalidAmount,
    )]
    pub to: Box<Account<'info, LedgerAccount>>,
}

impl<'info> TransferBalanceFrom<'info> {
    pub fn transfer_from(&mut self, amount: u128) -> Result<()> {
        self.allowance.spend(amount)?;
        self.from.transfer(&mut self.to, amount)?;

        emit!(LedgerTransfer {
            token: self.token.key(),
            from: self.from.holder,
            to: self.to.holder,
            amount,
        });
        Ok(())
    }
}
