//! Protocol Initialization
//!
//! Creates the global configuration, the yield reserve and its custody
//! account. Called once during deployment.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

use crate::consts::{CURRENT_VERSION, EXCHANGE_AUTHORITY_SEED, RESERVE_AUTHORITY_SEED};
use crate::state::{Config, YieldReserve};

/// Accounts required for protocol initialization
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Protocol administrator (becomes the admin)
    #[account(mut)]
    pub admin: Signer<'info>,

    /// Global configuration account (created)
    #[account(
        init,
        payer = admin,
        space = 8 + Config::INIT_SPACE,
        seeds = [Config::SEED],
        bump,
    )]
    pub config: Box<Account<'info, Config>>,

    /// Yield reserve bookkeeping (created)
    #[account(
        init,
        payer = admin,
        space = 8 + YieldReserve::INIT_SPACE,
        seeds = [YieldReserve::SEED],
        bump,
    )]
    pub reserve: Box<Account<'info, YieldReserve>>,

    /// CHECK: PDA that owns reserve custody
    #[account(
        seeds = [RESERVE_AUTHORITY_SEED],
        bump,
    )]
    pub reserve_authority: UncheckedAccount<'info>,

    /// CHECK: PDA identifying the exchange
    #[account(
        seeds = [EXCHANGE_AUTHORITY_SEED],
        bump,
    )]
    pub exchange_authority: UncheckedAccount<'info>,

    /// Collateral token mint (e.g., a dollar stablecoin)
    pub collateral_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Reserve custody (created)
    #[account(
        init,
        payer = admin,
        associated_token::mint = collateral_mint,
        associated_token::authority = reserve_authority,
        associated_token::token_program = token_program,
    )]
    pub custody: Box<InterfaceAccount<'info, TokenAccount>>,

    /// CHECK: yield strategy program; only its executability is checked here
    #[account(executable)]
    pub strategy_program: UncheckedAccount<'info>,

    /// Token program
    pub token_program: Interface<'info, TokenInterface>,
    /// Associated token program
    pub associated_token_program: Program<'info, AssociatedToken>,
    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> Initialize<'info> {
    /// Initialize the protocol configuration and reserve
    pub fn initialize(
        &mut self,
        trading_fee_recipient: Pubkey,
        yield_token_recipient: Pubkey,
        bumps: &InitializeBumps,
    ) -> Result<()> {
        let exchange = self.exchange_authority.key();

        self.config.set_inner(Config {
            version: CURRENT_VERSION,
            admin: self.admin.key(),
            exchange_authority: exchange,
            exchange_authority_bump: bumps.exchange_authority,
            collateral_mint: self.collateral_mint.key(),
            trading_fee_recipient,
            market_count: 0,
            paused: false,
            bump: bumps.config,
            timelock: Pubkey::default(),
            yield_token_recipient,
        });

        self.reserve.set_inner(YieldReserve {
            version: CURRENT_VERSION,
            exchange,
            strategy: self.strategy_program.key(),
            custody: self.custody.key(),
            total_shares: 0,
            invested_underlying: 0,
            donated: 0,
            redeemed_donated: 0,
            last_rate: 0,
            authority_bump: bumps.reserve_authority,
            bump: bumps.reserve,
        });

        msg!("Protocol initialized!");
        msg!("Admin: {}", self.admin.key());
        msg!("Collateral: {}", self.collateral_mint.key());
        msg!("Strategy: {}", self.strategy_program.key());

        Ok(())
    }
}
