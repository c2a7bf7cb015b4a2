//! # Yield Strategy Capability
//!
//! Idle collateral is placed in an external interest-bearing position. The
//! reserve only needs three things from it, captured by [`YieldStrategy`].
//! Which program backs the strategy is part of the reserve's configuration
//! and can be swapped by an administrative action.
//!
//! Exchange rates are underlying units per share scaled by `RATE_SCALE`.

use anchor_lang::prelude::*;

use crate::consts::RATE_SCALE;
use crate::curve::{narrow_u64, U256};
use crate::error::ErrorCode;

pub mod cpi;

#[cfg(test)]
pub mod mock;

pub use cpi::*;

pub trait YieldStrategy {
    /// Current underlying value of one share, scaled by `RATE_SCALE`
    fn exchange_rate(&mut self) -> Result<u128>;

    /// Moves `amount` from reserve custody into the strategy; returns shares minted
    fn deposit(&mut self, amount: u64) -> Result<u128>;

    /// Burns `shares`; returns the underlying paid to reserve custody
    fn withdraw_shares(&mut self, shares: u128) -> Result<u64>;
}

pub fn shares_to_underlying(shares: u128, rate: u128) -> Result<u64> {
    require!(rate > 0, ErrorCode::ExternalStrategyFailure);
    let value = U256::from(shares)
        .checked_mul(U256::from(rate))
        .ok_or(ErrorCode::MathOverflow)?
        / U256::from(RATE_SCALE);
    narrow_u64(value)
}

pub fn underlying_to_shares(amount: u64, rate: u128) -> Result<u128> {
    require!(rate > 0, ErrorCode::ExternalStrategyFailure);
    Ok((amount as u128) * RATE_SCALE / rate)
}

/// Shares needed to withdraw `amount`, rounded up
pub fn underlying_to_shares_ceil(amount: u64, rate: u128) -> Result<u128> {
    require!(rate > 0, ErrorCode::ExternalStrategyFailure);
    let scaled = (amount as u128) * RATE_SCALE;
    let rounded = scaled
        .checked_add(rate - 1)
        .ok_or(ErrorCode::MathOverflow)?;
    Ok(rounded / rate)
}
