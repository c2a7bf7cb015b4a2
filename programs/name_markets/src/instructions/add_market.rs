//! Market Creation
//!
//! Registers a new market: a curve, a fee schedule and the name verifier
//! its tokens must satisfy. Markets are numbered from 1 and can also be
//! looked up by name through a `MarketName` account.

use anchor_lang::prelude::*;

use crate::consts::CURRENT_VERSION;
use crate::curve::{CurveParams, FeeRates};
use crate::error::ErrorCode;
use crate::state::{name_seed, validate_market_name, Config, Market, MarketName};
use crate::verifier::NameVerifier;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct AddMarketArgs {
    pub name: String,
    pub verifier: NameVerifier,
    pub base_cost: u64,
    pub price_rise: u64,
    pub hatch_tokens: u128,
    pub trading_fee_rate: u64,
    pub platform_fee_rate: u64,
    pub platform_fee_recipient: Pubkey,
}

#[event]
pub struct MarketAdded {
    pub market_id: u64,
    pub name: String,
    pub base_cost: u64,
    pub price_rise: u64,
    pub hatch_tokens: u128,
    pub trading_fee_rate: u64,
    pub platform_fee_rate: u64,
}

#[derive(Accounts)]
#[instruction(args: AddMarketArgs)]
pub struct AddMarket<'info> {
    /// Protocol administrator
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
        space = 8 + Market::INIT_SPACE,
        seeds = [Market::SEED, &(config.market_count + 1).to_le_bytes()],
        bump,
    )]
    pub market: Box<Account<'info, Market>>,

    /// Name lookup; a non-zero id means the name is taken
    #[account(
        init_if_needed,
        payer = admin,
        space = 8 + MarketName::INIT_SPACE,
        seeds = [MarketName::SEED, &name_seed(&args.name)],
        bump,
    )]
    pub market_name: Box<Account<'info, MarketName>>,

    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> AddMarket<'info> {
    pub fn add_market(&mut self, args: AddMarketArgs, bumps: &AddMarketBumps) -> Result<()> {
        self.config.check_version()?;
        validate_market_name(&args.name)?;
        require!(self.market_name.market_id == 0, ErrorCode::DuplicateName);

        let curve = CurveParams {
            base_cost: args.base_cost,
            price_rise: args.price_rise,
            hatch_tokens: args.hatch_tokens,
        };
        curve.validate()?;
        let fee_rates = FeeRates {
            trading: args.trading_fee_rate,
            platform: args.platform_fee_rate,
        };
        fee_rates.validate()?;

        let id = self.config.next_market_id()?;
        self.config.market_count = id;

        self.market.set_inner(Market {
            version: CURRENT_VERSION,
            id,
            name: args.name.clone(),
            curve,
            fee_rates,
            verifier: args.verifier,
            platform_fee_recipient: args.platform_fee_recipient,
            trading_fee_balance: 0,
            platform_fee_balance: 0,
            token_count: 0,
            active: true,
            created_at: Clock::get()?.unix_timestamp,
            bump: bumps.market,
        });
        self.market_name.set_inner(MarketName {
            market_id: id,
            bump: bumps.market_name,
        });

        msg!("Market {} created: {}", id, args.name);
        emit!(MarketAdded {
            market_id: id,
            name: args.name,
            base_cost: curve.base_cost,
            price_rise: curve.price_rise,
            hatch_tokens: curve.hatch_tokens,
            trading_fee_rate: fee_rates.trading,
            platform_fee_rate: fee_rates.platform,
        });

        Ok(())
    }
}
