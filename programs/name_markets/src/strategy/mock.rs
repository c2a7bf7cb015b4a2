//! In-memory strategy for off-chain tests.

use anchor_lang::prelude::*;

use super::{shares_to_underlying, underlying_to_shares, YieldStrategy};
use crate::consts::RATE_SCALE;
use crate::error::ErrorCode;

#[derive(Clone, Debug)]
pub struct MockStrategy {
    pub rate: u128,
    /// Shares held on behalf of the reserve
    pub shares: u128,
    /// Reserve custody balance not placed in the strategy
    pub custody: u64,
    /// Makes every call fail
    pub fail: bool,
}

impl MockStrategy {
    pub fn new(custody: u64) -> Self {
        Self {
            rate: RATE_SCALE,
            shares: 0,
            custody,
            fail: false,
        }
    }

    /// Applies `bps` of interest to the exchange rate
    pub fn accrue(&mut self, bps: u128) {
        self.rate += self.rate * bps / 10_000;
    }

    fn check(&self) -> Result<()> {
        require!(!self.fail, ErrorCode::ExternalStrategyFailure);
        Ok(())
    }
}

impl YieldStrategy for MockStrategy {
    fn exchange_rate(&mut self) -> Result<u128> {
        self.check()?;
        Ok(self.rate)
    }

    fn deposit(&mut self, amount: u64) -> Result<u128> {
        self.check()?;
        require!(self.custody >= amount, ErrorCode::InsufficientBalance);
        let minted = underlying_to_shares(amount, self.rate)?;
        self.custody -= amount;
        self.shares += minted;
        Ok(minted)
    }

    fn withdraw_shares(&mut self, shares: u128) -> Result<u64> {
        self.check()?;
        require!(shares <= self.shares, ErrorCode::ExternalStrategyFailure);
        let paid = shares_to_underlying(shares, self.rate)?;
        self.shares -= shares;
        self.custody += paid;
        Ok(paid)
    }
}
