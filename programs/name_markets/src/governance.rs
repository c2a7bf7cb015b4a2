//! # Administrative Actions
//!
//! Every privileged mutation is an [`AdminAction`]. The same action can be
//! applied immediately by the protocol admin or queued as a timelock spell,
//! in which case its Borsh encoding is the spell data and the account it
//! mutates is the spell target.

use anchor_lang::prelude::*;

use crate::curve::FeeRates;
use crate::error::ErrorCode;
use crate::state::{Config, Market, TokenInfo, YieldReserve};
use crate::verifier::NameVerifier;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, PartialEq, Eq, Debug)]
pub enum AdminAction {
    SetTradingFeeRate { rate: u64 },
    SetPlatformFeeRate { rate: u64 },
    SetNameVerifier { verifier: NameVerifier },
    SetPlatformFeeRecipient { recipient: Pubkey },
    SetMarketActive { active: bool },
    SetTokenOwner { owner: Pubkey },
    SetTradingFeeRecipient { recipient: Pubkey },
    SetYieldTokenRecipient { recipient: Pubkey },
    SetPaused { paused: bool },
    SetAdmin { admin: Pubkey },
    SetStrategy { strategy: Pubkey },
}

/// Kind of account an action mutates
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ActionTarget {
    Config,
    Market,
    Token,
    Reserve,
}

/// Accounts an action may touch
pub struct ActionAccounts<'a> {
    pub config: &'a mut Config,
    pub market: Option<&'a mut Market>,
    pub token: Option<&'a mut TokenInfo>,
    pub reserve: Option<&'a mut YieldReserve>,
}

impl AdminAction {
    pub fn target(&self) -> ActionTarget {
        match self {
            AdminAction::SetTradingFeeRate { .. }
            | AdminAction::SetPlatformFeeRate { .. }
            | AdminAction::SetNameVerifier { .. }
            | AdminAction::SetPlatformFeeRecipient { .. }
            | AdminAction::SetMarketActive { .. } => ActionTarget::Market,
            AdminAction::SetTokenOwner { .. } => ActionTarget::Token,
            AdminAction::SetTradingFeeRecipient { .. }
            | AdminAction::SetYieldTokenRecipient { .. }
            | AdminAction::SetPaused { .. }
            | AdminAction::SetAdmin { .. } => ActionTarget::Config,
            AdminAction::SetStrategy { .. } => ActionTarget::Reserve,
        }
    }

    pub fn apply(&self, accounts: ActionAccounts) -> Result<()> {
        let ActionAccounts {
            config,
            market,
            token,
            reserve,
        } = accounts;

        match self {
            AdminAction::SetTradingFeeRate { rate } => {
                let market = market.ok_or(ErrorCode::InvalidAmount)?;
                let rates = FeeRates {
                    trading: *rate,
                    ..market.fee_rates
                };
                rates.validate()?;
                market.fee_rates = rates;
            }
            AdminAction::SetPlatformFeeRate { rate } => {
                let market = market.ok_or(ErrorCode::InvalidAmount)?;
                let rates = FeeRates {
                    platform: *rate,
                    ..market.fee_rates
                };
                rates.validate()?;
                market.fee_rates = rates;
            }
            AdminAction::SetNameVerifier { verifier } => {
                market.ok_or(ErrorCode::InvalidAmount)?.verifier = *verifier;
            }
            AdminAction::SetPlatformFeeRecipient { recipient } => {
                market.ok_or(ErrorCode::InvalidAmount)?.platform_fee_recipient = *recipient;
            }
            AdminAction::SetMarketActive { active } => {
                market.ok_or(ErrorCode::InvalidAmount)?.active = *active;
            }
            AdminAction::SetTokenOwner { owner } => {
                token.ok_or(ErrorCode::InvalidAmount)?.owner = *owner;
            }
            AdminAction::SetTradingFeeRecipient { recipient } => {
                config.trading_fee_recipient = *recipient;
            }
            AdminAction::SetYieldTokenRecipient { recipient } => {
                config.yield_token_recipient = *recipient;
            }
            AdminAction::SetPaused { paused } => {
                config.paused = *paused;
            }
            AdminAction::SetAdmin { admin } => {
                require!(*admin != Pubkey::default(), ErrorCode::InvalidConfiguration);
                // the timelock is a PDA and could never sign as admin
                require!(!config.is_timelock(admin), ErrorCode::InvalidConfiguration);
                config.admin = *admin;
            }
            AdminAction::SetStrategy { strategy } => {
                reserve.ok_or(ErrorCode::InvalidAmount)?.set_strategy(*strategy)?;
            }
        }
        Ok(())
    }
}
