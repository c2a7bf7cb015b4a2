//! Administrative Updates
//!
//! Applies an [`AdminAction`] immediately. Only the admin may call this, and
//! only until a timelock is configured; from then on actions are scheduled
//! and executed as spells. The account an action mutates is passed as the
//! matching optional account.

use anchor_lang::prelude::*;

use crate::error::ErrorCode;
use crate::governance::{ActionAccounts, ActionTarget, AdminAction};
use crate::state::{Config, Market, TokenInfo, YieldReserve};

#[event]
pub struct AdminActionApplied {
    pub authority: Pubkey,
    pub target: Pubkey,
    pub action: AdminAction,
}

#[derive(Accounts)]
pub struct AdminUpdate<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [Config::SEED],
        bump = config.bump,
        constraint = config.can_apply_directly(&authority.key()) @ ErrorCode::Unauthorized,
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

impl<'info> AdminUpdate<'info> {
    pub fn admin_update(&mut self, action: AdminAction) -> Result<()> {
        self.config.check_version()?;
        let target = dispatch(
            &action,
            &mut self.config,
            self.market.as_deref_mut(),
            self.token.as_deref_mut(),
            self.reserve.as_deref_mut(),
        )?;

        msg!("Admin action applied: {:?}", action);
        emit!(AdminActionApplied {
            authority: self.authority.key(),
            target,
            action,
        });
        Ok(())
    }
}

/// Applies `action` to the account it targets, returning that account's key
pub(crate) fn dispatch<'info>(
    action: &AdminAction,
    config: &mut Account<'info, Config>,
    market: Option<&mut Account<'info, Market>>,
    token: Option<&mut Account<'info, TokenInfo>>,
    reserve: Option<&mut Account<'info, YieldReserve>>,
) -> Result<Pubkey> {
    let target = match action.target() {
        ActionTarget::Config => config.key(),
        ActionTarget::Market => market.as_ref().ok_or(ErrorCode::InvalidAmount)?.key(),
        ActionTarget::Token => token.as_ref().ok_or(ErrorCode::InvalidAmount)?.key(),
        ActionTarget::Reserve => reserve.as_ref().ok_or(ErrorCode::InvalidAmount)?.key(),
    };

    action.apply(ActionAccounts {
        config,
        market: market.map(|m| &mut **m),
        token: token.map(|t| &mut **t),
        reserve: reserve.map(|r| &mut **r),
    })?;
    Ok(target)
}
