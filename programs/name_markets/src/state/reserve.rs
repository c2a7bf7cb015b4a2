//! Yield Reserve
//!
//! Custody of the collateral asset. Principal is placed in the configured
//! [`YieldStrategy`]; this account tracks the shares held and a side ledger
//! of donated interest. Principal moves only when the exchange authority
//! asks for it.

use anchor_lang::prelude::*;

use crate::consts::RESERVE_SEED;
use crate::error::ErrorCode;
use crate::strategy::{shares_to_underlying, underlying_to_shares_ceil, YieldStrategy};

/// Reserve account (singleton PDA)
///
/// Seeds: ["reserve"]
#[account]
#[derive(InitSpace)]
pub struct YieldReserve {
    /// Storage layout version
    pub version: u8,

    /// Exchange authority, the only caller allowed to move principal
    pub exchange: Pubkey,

    /// Program implementing the yield strategy
    pub strategy: Pubkey,

    /// Collateral token account owned by the reserve authority PDA
    pub custody: Pubkey,

    /// Strategy shares held by the reserve
    pub total_shares: u128,

    /// Collateral owed to token principal, fee balances and donations
    pub invested_underlying: u64,

    /// Cumulative donated interest
    pub donated: u64,

    /// Cumulative donated interest already redeemed
    pub redeemed_donated: u64,

    /// Highest exchange rate observed so far
    pub last_rate: u128,

    /// Bump of the reserve authority PDA
    pub authority_bump: u8,

    /// PDA bump seed
    pub bump: u8,
}

impl YieldReserve {
    pub const SEED: &'static [u8] = RESERVE_SEED;

    /// On-chain every handler passes `config.exchange_authority`, so this
    /// never trips there; the account constraints of each instruction gate
    /// access. It keeps the accounting API closed to any other caller.
    fn require_exchange(&self, caller: &Pubkey) -> Result<()> {
        require_keys_eq!(*caller, self.exchange, ErrorCode::Unauthorized);
        Ok(())
    }

    /// Reads the strategy rate, rejecting one that went backwards
    pub fn observe_rate<S: YieldStrategy>(&mut self, strategy: &mut S) -> Result<u128> {
        let rate = strategy.exchange_rate()?;
        require!(rate > 0, ErrorCode::ExternalStrategyFailure);
        require!(rate >= self.last_rate, ErrorCode::ExternalStrategyFailure);
        self.last_rate = rate;
        Ok(rate)
    }

    /// Collateral still missing after `assets`, counting `pending` payouts
    fn shortfall(&self, assets: u128, pending: u64) -> u128 {
        (self.invested_underlying as u128 + pending as u128).saturating_sub(assets)
    }

    /// Places `amount` of idle custody in the strategy and books it as
    /// principal.
    ///
    /// Shares are minted rounded down, so they can be worth less than
    /// `amount`. Returns the collateral the depositor must add to custody
    /// to keep the reserve covering its principal; zero whenever accrued
    /// interest already covers the rounding.
    pub fn invest<S: YieldStrategy>(
        &mut self,
        caller: &Pubkey,
        strategy: &mut S,
        idle_balance: u64,
        amount: u64,
    ) -> Result<u64> {
        self.require_exchange(caller)?;
        require!(amount > 0, ErrorCode::InvalidAmount);
        require!(idle_balance >= amount, ErrorCode::InsufficientBalance);

        let rate = self.observe_rate(strategy)?;
        let before = self.share_value(rate)?;

        let shares = strategy.deposit(amount)?;
        require!(shares > 0, ErrorCode::InvalidAmount);
        self.total_shares = self
            .total_shares
            .checked_add(shares)
            .ok_or(ErrorCode::MathOverflow)?;
        self.invested_underlying = self
            .invested_underlying
            .checked_add(amount)
            .ok_or(ErrorCode::MathOverflow)?;

        let after = self.share_value(rate)?;
        let rounding = amount.saturating_sub(after - before);
        let assets = after as u128 + (idle_balance - amount) as u128;
        Ok(self.shortfall(assets, 0).min(rounding as u128) as u64)
    }

    /// Retires `amount` of principal and makes it available in custody.
    ///
    /// Idle custody is spent first; the rest comes from burning whole
    /// shares, rounded up. Returns what may be paid out: `amount`, or one
    /// unit less when burning shares lost a fraction the reserve cannot
    /// absorb.
    pub fn redeem<S: YieldStrategy>(
        &mut self,
        caller: &Pubkey,
        strategy: &mut S,
        idle_balance: u64,
        amount: u64,
    ) -> Result<u64> {
        self.require_exchange(caller)?;
        require!(amount > 0, ErrorCode::InvalidAmount);
        let owed = self
            .invested_underlying
            .checked_sub(amount)
            .ok_or(ErrorCode::InsufficientBalance)?;

        let needed = amount.saturating_sub(idle_balance);
        if needed == 0 {
            self.invested_underlying = owed;
            return Ok(amount);
        }

        let rate = self.observe_rate(strategy)?;
        let shares = underlying_to_shares_ceil(needed, rate)?;
        require!(shares <= self.total_shares, ErrorCode::InsufficientBalance);

        let before = self.share_value(rate)?;
        let remaining = shares_to_underlying(self.total_shares - shares, rate)?;
        let expected = shares_to_underlying(shares, rate)?;
        self.total_shares -= shares;
        self.invested_underlying = owed;

        let paid = strategy.withdraw_shares(shares)?;
        require!(paid >= expected, ErrorCode::ExternalStrategyFailure);

        let lost = (before - remaining).saturating_sub(paid);
        let assets = remaining as u128 + idle_balance as u128 + paid as u128;
        let withheld = self.shortfall(assets, amount).min(lost as u128);
        Ok(amount.saturating_sub(withheld as u64))
    }

    /// Burns exactly `shares` of accrued interest, returning what the
    /// strategy paid into custody. Principal must stay covered afterwards.
    pub fn redeem_shares<S: YieldStrategy>(
        &mut self,
        caller: &Pubkey,
        strategy: &mut S,
        idle_balance: u64,
        shares: u128,
    ) -> Result<u64> {
        self.require_exchange(caller)?;
        require!(shares > 0, ErrorCode::InvalidAmount);
        require!(shares <= self.total_shares, ErrorCode::InsufficientBalance);

        let rate = self.observe_rate(strategy)?;
        let expected = shares_to_underlying(shares, rate)?;

        let remaining = shares_to_underlying(self.total_shares - shares, rate)?;
        require!(
            self.shortfall(remaining as u128 + idle_balance as u128, 0) == 0,
            ErrorCode::InsufficientBalance
        );
        self.total_shares -= shares;

        let paid = strategy.withdraw_shares(shares)?;
        require!(paid >= expected, ErrorCode::ExternalStrategyFailure);
        Ok(paid)
    }

    /// Records a voluntary interest donation already invested as principal
    pub fn record_donation(&mut self, amount: u64) -> Result<()> {
        require!(amount > 0, ErrorCode::InvalidAmount);
        self.donated = self
            .donated
            .checked_add(amount)
            .ok_or(ErrorCode::MathOverflow)?;
        Ok(())
    }

    /// Donated interest not yet redeemed
    pub fn donated_remaining(&self) -> u64 {
        self.donated.saturating_sub(self.redeemed_donated)
    }

    /// Books a redemption against the donated ledger
    pub fn record_donated_redemption(&mut self, amount: u64) -> Result<()> {
        require!(amount > 0, ErrorCode::InvalidAmount);
        require!(amount <= self.donated_remaining(), ErrorCode::InsufficientDonated);
        self.redeemed_donated += amount;
        Ok(())
    }

    /// Underlying value of all shares at `rate`
    pub fn share_value(&self, rate: u128) -> Result<u64> {
        shares_to_underlying(self.total_shares, rate)
    }

    /// Swaps the strategy program; only possible while nothing is invested
    pub fn set_strategy(&mut self, strategy: Pubkey) -> Result<()> {
        require!(self.total_shares == 0, ErrorCode::InvalidConfiguration);
        self.strategy = strategy;
        self.last_rate = 0;
        Ok(())
    }
}
