//! # Name Markets
//!
//! Token markets for names (domains, handles, content ids) on Solana.
//!
//! ## Overview
//!
//! Every listed name gets its own token, priced by a bonding curve: flat up
//! to a hatch supply, then rising by a fixed step per whole token. Buyers pay
//! collateral into a shared reserve, sellers are paid out of it, and the
//! collateral earns yield in an external strategy while it waits.
//!
//! ## How it works
//! - A market fixes the curve, the fee schedule and which names are allowed.
//! - Anyone lists a name; trades mint and burn on an internal token ledger.
//! - Fees and each token's interest can be withdrawn by their recipients.
//! - Administrative changes are applied by the admin until a timelock is
//!   set up, and only through the timelock after that.
//!

#![allow(unexpected_cfgs)]

use anchor_lang::prelude::*;

pub mod consts;
pub mod curve;
pub mod error;
pub mod exchange;
pub mod governance;
pub mod instructions;
pub mod state;
pub mod strategy;
pub mod verifier;

pub use curve::{CostBreakdown, CurveParams, FeeRates};
pub use governance::AdminAction;
pub use instructions::*;
pub use verifier::NameVerifier;

// Replace with your deployed program ID
declare_id!("8NeEkxgPMV5AnZ8o5ksjPhqsHwkWXdvGCGyHmEt6tJTn");

/// Main Name Markets program
#[program]
pub mod name_markets {
    use super::*;

    /// Initialize the protocol with global configuration and the reserve
    pub fn initialize(
        ctx: Context<Initialize>,
        trading_fee_recipient: Pubkey,
        yield_token_recipient: Pubkey,
    ) -> Result<()> {
        ctx.accounts
            .initialize(trading_fee_recipient, yield_token_recipient, &ctx.bumps)
    }

    /// Upgrade a configuration stored with an older layout
    pub fn migrate_config(ctx: Context<MigrateConfig>) -> Result<()> {
        ctx.accounts.migrate_config()
    }

    /// Register a new market (admin only)
    pub fn add_market(ctx: Context<AddMarket>, args: AddMarketArgs) -> Result<()> {
        ctx.accounts.add_market(args, &ctx.bumps)
    }

    /// List a name in a market
    pub fn add_token(ctx: Context<AddToken>, _market_id: u64, name: String) -> Result<()> {
        ctx.accounts.add_token(name, &ctx.bumps)
    }

    /// Quote the cost of buying `amount` token units
    pub fn get_cost_for_buying_tokens(
        ctx: Context<Quote>,
        _market_id: u64,
        _token_id: u64,
        amount: u128,
    ) -> Result<CostBreakdown> {
        ctx.accounts.get_cost_for_buying_tokens(amount)
    }

    /// Quote the proceeds of selling `amount` token units
    pub fn get_price_for_selling_tokens(
        ctx: Context<Quote>,
        _market_id: u64,
        _token_id: u64,
        amount: u128,
    ) -> Result<CostBreakdown> {
        ctx.accounts.get_price_for_selling_tokens(amount)
    }

    /// Buy name tokens along the curve
    pub fn buy_tokens(
        ctx: Context<BuyTokens>,
        _market_id: u64,
        _token_id: u64,
        amount: u128,
        max_cost: u64,
    ) -> Result<CostBreakdown> {
        ctx.accounts.buy_tokens(amount, max_cost)
    }

    /// Sell name tokens back to the curve
    pub fn sell_tokens(
        ctx: Context<SellTokens>,
        _market_id: u64,
        _token_id: u64,
        amount: u128,
        min_price: u64,
    ) -> Result<CostBreakdown> {
        ctx.accounts.sell_tokens(amount, min_price)
    }

    /// Open a ledger balance for a holder
    pub fn open_ledger_account(ctx: Context<OpenLedgerAccount>) -> Result<()> {
        ctx.accounts.open_ledger_account(&ctx.bumps)
    }

    /// Move tokens between ledger balances
    pub fn transfer(ctx: Context<TransferBalance>, amount: u128) -> Result<()> {
        ctx.accounts.transfer(amount)
    }

    /// Allow a spender to move tokens on the holder's behalf
    pub fn approve(ctx: Context<Approve>, amount: u128) -> Result<()> {
        ctx.accounts.approve(amount, &ctx.bumps)
    }

    /// Move tokens using an allowance
    pub fn transfer_from(ctx: Context<TransferBalanceFrom>, amount: u128) -> Result<()> {
        ctx.accounts.transfer_from(amount)
    }

    /// Pay out a market's trading fees
    pub fn withdraw_trading_fees(ctx: Context<WithdrawFees>, _market_id: u64) -> Result<u64> {
        ctx.accounts.withdraw_trading_fees()
    }

    /// Pay out a market's platform fees
    pub fn withdraw_platform_fees(ctx: Context<WithdrawFees>, _market_id: u64) -> Result<u64> {
        ctx.accounts.withdraw_platform_fees()
    }

    /// Pay out the interest earned by a token's collateral to its owner
    pub fn withdraw_token_interest(
        ctx: Context<WithdrawTokenInterest>,
        _market_id: u64,
        _token_id: u64,
    ) -> Result<u64> {
        ctx.accounts.withdraw_token_interest()
    }

    /// Donate collateral to the reserve
    pub fn donate_interest(ctx: Context<DonateInterest>, amount: u64) -> Result<()> {
        ctx.accounts.donate_interest(amount)
    }

    /// Redeem donated collateral (admin only)
    pub fn redeem_donated(ctx: Context<RedeemDonated>, amount: u64) -> Result<()> {
        ctx.accounts.redeem_donated(amount)
    }

    /// Sweep reward tokens held by the reserve (admin only)
    pub fn withdraw_yield_token(ctx: Context<WithdrawYieldToken>, amount: u64) -> Result<()> {
        ctx.accounts.withdraw_yield_token(amount)
    }

    /// Apply an administrative action immediately (admin only, before a timelock exists)
    pub fn admin_update(ctx: Context<AdminUpdate>, action: AdminAction) -> Result<()> {
        ctx.accounts.admin_update(action)
    }

    /// Create the timelock; administrative actions must be scheduled through it from then on
    pub fn init_timelock(ctx: Context<InitTimelock>, min_delay: i64) -> Result<()> {
        ctx.accounts.init_timelock(min_delay, &ctx.bumps)
    }

    /// Queue an administrative action
    pub fn schedule_spell(
        ctx: Context<ScheduleSpell>,
        target: Pubkey,
        tag: [u8; 32],
        data: Vec<u8>,
        eta: i64,
    ) -> Result<()> {
        ctx.accounts.schedule_spell(target, tag, data, eta, &ctx.bumps)
    }

    /// Run a queued action once its eta has passed
    pub fn execute_spell(
        ctx: Context<ExecuteSpell>,
        target: Pubkey,
        tag: [u8; 32],
        data: Vec<u8>,
        eta: i64,
    ) -> Result<()> {
        ctx.accounts.execute_spell(target, tag, data, eta)
    }

    /// Drop a queued action
    pub fn cancel_spell(
        ctx: Context<CancelSpell>,
        target: Pubkey,
        tag: [u8; 32],
        data: Vec<u8>,
        eta: i64,
    ) -> Result<()> {
        ctx.accounts.cancel_spell(target, tag, data, eta)
    }
}
