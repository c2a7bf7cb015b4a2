//! # Hatch + Linear Bonding Curve
//!
//! ## Price
//!
//! ```text
//! price(s) = base_cost                                        s <  hatch
//! price(s) = base_cost + price_rise * ((s - hatch) / UNIT)    s >= hatch
//! ```
//!
//! Prices are collateral units per whole token; supplies are token units
//! (`UNIT = 10^18` per whole token). The division above is integer division,
//! so the linear segment steps once per whole token past the hatch.
//!
//! ## Cumulative value
//!
//! With `x = max(s - hatch, 0)`, `n = x / UNIT` and `r = x % UNIT`:
//!
//! ```text
//! F(s) = floor( (base_cost * s + price_rise * (UNIT * n(n-1)/2 + n * r)) / UNIT )
//! ```
//!
//! Only `x` enters the linear term, so the linear formula is never applied
//! across the hatch boundary. Intermediate products use 256-bit integers.

use anchor_lang::prelude::*;

use crate::consts::{FEE_SCALE, UNIT_SCALE};
use crate::error::ErrorCode;

pub use self::wide::U256;

// Expanded apart from the anchor prelude, whose `Result` alias the macro
// output cannot use.
mod wide {
    uint::construct_uint! {
        /// 256-bit integer for intermediate curve products.
        pub struct U256(4);
    }
}

pub(crate) fn narrow_u64(value: U256) -> Result<u64> {
    require!(value <= U256::from(u64::MAX), ErrorCode::MathOverflow);
    Ok(value.low_u64())
}

/// Shape of a market's curve
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, InitSpace, Debug, Default)]
pub struct CurveParams {
    /// Price of one whole token in the hatch segment
    pub base_cost: u64,
    /// Price increase per whole token past the hatch
    pub price_rise: u64,
    /// Supply (token units) sold at `base_cost`
    pub hatch_tokens: u128,
}

impl CurveParams {
    pub fn validate(&self) -> Result<()> {
        require!(self.base_cost > 0, ErrorCode::InvalidConfiguration);
        Ok(())
    }
}

/// Trading and platform fee rates, both over `FEE_SCALE`
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, InitSpace, Debug, Default)]
pub struct FeeRates {
    pub trading: u64,
    pub platform: u64,
}

impl FeeRates {
    /// Combined rate; fails unless `0 <= trading + platform <= FEE_SCALE`.
    pub fn total(&self) -> Result<u64> {
        let total = self
            .trading
            .checked_add(self.platform)
            .ok_or(ErrorCode::InvalidConfiguration)?;
        require!(total <= FEE_SCALE, ErrorCode::InvalidConfiguration);
        Ok(total)
    }

    pub fn validate(&self) -> Result<()> {
        self.total().map(|_| ())
    }

    /// Splits the fee on `raw` into `(trading, platform)`.
    ///
    /// The combined fee is `floor(raw * total / FEE_SCALE)`; the platform
    /// share absorbs the rounding remainder so the parts always add up.
    pub fn split(&self, raw: u64) -> Result<(u64, u64)> {
        let fee = fee_of(raw, self.total()?)?;
        let trading = fee_of(raw, self.trading)?;
        let platform = fee.checked_sub(trading).ok_or(ErrorCode::MathOverflow)?;
        Ok((trading, platform))
    }
}

fn fee_of(raw: u64, rate: u64) -> Result<u64> {
    let fee = (raw as u128)
        .checked_mul(rate as u128)
        .ok_or(ErrorCode::MathOverflow)?
        / FEE_SCALE as u128;
    u64::try_from(fee).map_err(|_| error!(ErrorCode::MathOverflow))
}

/// Price and fee breakdown of a trade
///
/// `total` is `raw + fee` for buys (what the buyer pays) and `raw - fee`
/// for sells (what the seller receives).
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct CostBreakdown {
    pub raw: u64,
    pub trading_fee: u64,
    pub platform_fee: u64,
    pub fee: u64,
    pub total: u64,
}

pub struct BondingCurve;

impl BondingCurve {
    /// Marginal price of the next token unit at `supply`
    pub fn price_at(params: &CurveParams, supply: u128) -> Result<u64> {
        if supply < params.hatch_tokens {
            return Ok(params.base_cost);
        }
        let steps = (supply - params.hatch_tokens) / UNIT_SCALE;
        let rise = (params.price_rise as u128)
            .checked_mul(steps)
            .ok_or(ErrorCode::MathOverflow)?;
        let price = (params.base_cost as u128)
            .checked_add(rise)
            .ok_or(ErrorCode::MathOverflow)?;
        u64::try_from(price).map_err(|_| error!(ErrorCode::MathOverflow))
    }

    /// Cumulative collateral backing `supply` tokens, `F(supply)`
    pub fn value_at(params: &CurveParams, supply: u128) -> Result<u64> {
        let unit = U256::from(UNIT_SCALE);
        let mut numerator = U256::from(params.base_cost)
            .checked_mul(U256::from(supply))
            .ok_or(ErrorCode::MathOverflow)?;

        if supply > params.hatch_tokens {
            let past = supply - params.hatch_tokens;
            let whole = U256::from(past / UNIT_SCALE);
            let rem = U256::from(past % UNIT_SCALE);

            // n(n-1) is always even
            let steps = if whole.is_zero() {
                U256::zero()
            } else {
                whole
                    .checked_mul(whole - U256::one())
                    .ok_or(ErrorCode::MathOverflow)?
                    / U256::from(2u64)
            };
            let area = steps
                .checked_mul(unit)
                .and_then(|full| whole.checked_mul(rem).and_then(|part| full.checked_add(part)))
                .ok_or(ErrorCode::MathOverflow)?;
            let linear = U256::from(params.price_rise)
                .checked_mul(area)
                .ok_or(ErrorCode::MathOverflow)?;
            numerator = numerator
                .checked_add(linear)
                .ok_or(ErrorCode::MathOverflow)?;
        }

        narrow_u64(numerator / unit)
    }

    /// Collateral needed to grow supply by `amount`, before fees
    pub fn buy_cost(params: &CurveParams, supply: u128, amount: u128) -> Result<u64> {
        require!(amount > 0, ErrorCode::InvalidAmount);
        let new_supply = supply.checked_add(amount).ok_or(ErrorCode::MathOverflow)?;
        let after = Self::value_at(params, new_supply)?;
        let before = Self::value_at(params, supply)?;
        after.checked_sub(before).ok_or_else(|| error!(ErrorCode::MathOverflow))
    }

    /// Collateral released by shrinking supply by `amount`, before fees
    pub fn sell_value(params: &CurveParams, supply: u128, amount: u128) -> Result<u64> {
        require!(amount > 0, ErrorCode::InvalidAmount);
        require!(amount <= supply, ErrorCode::InsufficientBalance);
        let before = Self::value_at(params, supply)?;
        let after = Self::value_at(params, supply - amount)?;
        before.checked_sub(after).ok_or_else(|| error!(ErrorCode::MathOverflow))
    }

    pub fn quote_buy(
        params: &CurveParams,
        rates: &FeeRates,
        supply: u128,
        amount: u128,
    ) -> Result<CostBreakdown> {
        let raw = Self::buy_cost(params, supply, amount)?;
        let (trading_fee, platform_fee) = rates.split(raw)?;
        let fee = trading_fee + platform_fee;
        let total = raw.checked_add(fee).ok_or(ErrorCode::MathOverflow)?;
        Ok(CostBreakdown {
            raw,
            trading_fee,
            platform_fee,
            fee,
            total,
        })
    }

    pub fn quote_sell(
        params: &CurveParams,
        rates: &FeeRates,
        supply: u128,
        amount: u128,
    ) -> Result<CostBreakdown> {
        let raw = Self::sell_value(params, supply, amount)?;
        let (trading_fee, platform_fee) = rates.split(raw)?;
        let fee = trading_fee + platform_fee;
        // fee <= raw because the combined rate is capped at FEE_SCALE
        let total = raw - fee;
        Ok(CostBreakdown {
            raw,
            trading_fee,
            platform_fee,
            fee,
            total,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
