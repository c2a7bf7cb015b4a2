//! Timelock
//!
//! Delayed execution of administrative actions.
//!
//! ```text
//! schedule(target, tag, data, eta) ──▶ Spell { executed: false }
//!                                         │  now >= eta
//!                                         ▼
//! execute(target, tag, data, eta)  ──▶ Spell { executed: true } + action applied
//!
//! cancel(target, tag, data, eta)   ──▶ Spell account closed
//! ```
//!
//! `tag = sha256(target || data)`; `data` is the Borsh encoding of an
//! [`AdminAction`] and `target` the key of the account it mutates.

use anchor_lang::prelude::*;

use super::admin::dispatch;
use crate::consts::{CURRENT_VERSION, MAX_SPELL_DATA_LEN};
use crate::error::ErrorCode;
use crate::governance::AdminAction;
use crate::state::{spell_tag, Config, Market, Spell, Timelock, TokenInfo, YieldReserve};

#[event]
pub struct SpellScheduled {
    pub target: Pubkey,
    pub tag: [u8; 32],
    pub eta: i64,
}

#[event]
pub struct SpellExecuted {
    pub target: Pubkey,
    pub tag: [u8; 32],
    pub eta: i64,
}

#[event]
pub struct SpellCancelled {
    pub target: Pubkey,
    pub tag: [u8; 32],
    pub eta: i64,
}

#[derive(Accounts)]
pub struct InitTimelock<'info> {
    #[account(mut)]
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [Config::SEED],
        bump = config.bump,
        constraint = config.is_admin(&admin.key()) @ ErrorCode::Unauthorized,
    )]
    pub config: Box<Account<'info, Config>>,

    #[account(
        init,
        payer = admin,
        space = 8 + Timelock::INIT_SPACE,
        seeds = [Timelock::SEED],
        bump,
    )]
    pub timelock: Box<Account<'info, Timelock>>,

    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> InitTimelock<'info> {
    pub fn init_timelock(&mut self, min_delay: i64, bumps: &InitTimelockBumps) -> Result<()> {
        self.config.check_version()?;
        require!(min_delay >= 0, ErrorCode::InvalidConfiguration);

        self.timelock.set_inner(Timelock {
            version: CURRENT_VERSION,
            admin: self.admin.key(),
            min_delay,
            bump: bumps.timelock,
        });
        self.config.timelock = self.timelock.key();

        msg!("Timelock initialized with delay {}s", min_delay);
        Ok(())
    }
}

#[derive(Accounts)]
#[instruction(target: Pubkey, tag: [u8; 32], data: Vec<u8>, eta: i64)]
pub struct ScheduleSpell<'info> {
    #[account(mut)]
    pub admin: Signer<'info>,

    #[account(
        seeds = [Timelock::SEED],
        bump = timelock.bump,
        has_one = admin @ ErrorCode::Unauthorized,
    )]
    pub timelock: Box<Account<'info, Timelock>>,

    #[account(
        init,
        payer = admin,
        space = 8 + Spell::INIT_SPACE,
        seeds = [Spell::SEED, tag.as_ref(), &eta.to_le_bytes()],
        bump,
    )]
    pub spell: Box<Account<'info, Spell>>,

    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> ScheduleSpell<'info> {
    pub fn schedule_spell(
        &mut self,
        target: Pubkey,
        tag: [u8; 32],
        data: Vec<u8>,
        eta: i64,
        bumps: &ScheduleSpellBumps,
    ) -> Result<()> {
        require!(data.len() <= MAX_SPELL_DATA_LEN, ErrorCode::InvalidAmount);
        require!(spell_tag(&target, &data) == tag, ErrorCode::SpellNotScheduled);
        AdminAction::try_from_slice(&data).map_err(|_| error!(ErrorCode::InvalidAmount))?;
        self.timelock.check_eta(Clock::get()?.unix_timestamp, eta)?;

        self.spell.set_inner(Spell {
            target,
            tag,
            data,
            eta,
            executed: false,
            bump: bumps.spell,
        });

        emit!(SpellScheduled { target, tag, eta });
        Ok(())
    }
}

#[derive(Accounts)]
#[instruction(target: Pubkey, tag: [u8; 32], data: Vec<u8>, eta: i64)]
pub struct ExecuteSpell<'info> {
    pub executor: Signer<'info>,

    #[account(
        seeds = [Timelock::SEED],
        bump = timelock.bump,
    )]
    pub timelock: Box<Account<'info, Timelock>>,

    #[account(
        mut,
        seeds = [Spell::SEED, tag.as_ref(), &eta.to_le_bytes()],
        bump = spell.bump,
    )]
    pub spell: Box<Account<'info, Spell>>,

    #[account(
        mut,
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Box<Account<'info, Config>>,

    #[account(mut)]
    pub market: Option<Box<Account<'info, Market>>>,

    #[account(mut)]
    pub token: Option<Box<Account<'info, TokenInfo>>>,

    #[account(
        mut,
        seeds = [YieldReserve::SEED],
        bump = reserve.bump,
    )]
    pub reserve: Option<Box<Account<'info, YieldReserve>>>,
}

impl<'info> ExecuteSpell<'info> {
    pub fn execute_spell(
        &mut self,
        target: Pubkey,
        tag: [u8; 32],
        data: Vec<u8>,
        eta: i64,
    ) -> Result<()> {
        self.config.check_version()?;
        require!(
            self.config.is_timelock(&self.timelock.key()),
            ErrorCode::Unauthorized
        );

        self.spell.matches(&target, &tag, &data, eta)?;
        self.spell.mark_executed(Clock::get()?.unix_timestamp)?;

        let action = AdminAction::try_from_slice(&data)
            .map_err(|_| error!(ErrorCode::SpellNotScheduled))?;
        let applied_to = dispatch(
            &action,
            &mut self.config,
            self.market.as_deref_mut(),
            self.token.as_deref_mut(),
            self.reserve.as_deref_mut(),
        )?;
        require_keys_eq!(applied_to, target, ErrorCode::SpellNotScheduled);

        msg!("Spell executed: {:?}", action);
        emit!(SpellExecuted { target, tag, eta });
        Ok(())
    }
}

#[derive(Accounts)]
#[instruction(target: Pubkey, tag: [u8; 32], data: Vec<u8>, eta: i64)]
pub struct CancelSpell<'info> {
    #[account(mut)]
    pub admin: Signer<'info>,

    #[account(
        seeds = [Timelock::SEED],
        bump = timelock.bump,
        has_one = admin @ ErrorCode::Unauthorized,
    )]
    pub timelock: Box<Account<'info, Timelock>>,

    #[account(
        mut,
        close = admin,
        seeds = [Spell::SEED, tag.as_ref(), &eta.to_le_bytes()],
        bump = spell.bump,
    )]
    pub spell: Box<Account<'info, Spell>>,
}

impl<'info> CancelSpell<'info> {
    pub fn cancel_spell(
        &mut self,
        target: Pubkey,
        tag: [u8; 32],
        data: Vec<u8>,
        eta: i64,
    ) -> Result<()> {
        self.spell.matches(&target, &tag, &data, eta)?;
        require!(!self.spell.executed, ErrorCode::SpellAlreadyExecuted);

        emit!(SpellCancelled { target, tag, eta });
        Ok(())
    }
}
