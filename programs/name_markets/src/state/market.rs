//! Name Market State
//!
//! A market groups tokens of one kind of name (domains, handles, content
//! ids) under a shared curve, fee schedule and name verifier.

use anchor_lang::prelude::*;

use crate::consts::{CURRENT_VERSION, MARKET_NAME_SEED, MARKET_SEED, MAX_NAME_LEN};
use crate::curve::{CurveParams, FeeRates};
use crate::error::ErrorCode;
use crate::verifier::NameVerifier;

/// Individual market account
///
/// Seeds: ["market", market_id.to_le_bytes()]
#[account]
#[derive(InitSpace)]
pub struct Market {
    /// Storage layout version
    pub version: u8,

    /// Dense, 1-based market identifier
    pub id: u64,

    /// Unique market name, e.g. "Domains"
    #[max_len(64)]
    pub name: String,

    /// Curve shared by every token in the market
    pub curve: CurveParams,

    /// Trading and platform fee rates
    pub fee_rates: FeeRates,

    /// Predicate token names must satisfy
    pub verifier: NameVerifier,

    /// Receives this market's platform fees
    pub platform_fee_recipient: Pubkey,

    /// Trading fees owed to the protocol's trading fee recipient
    pub trading_fee_balance: u64,

    /// Platform fees owed to `platform_fee_recipient`
    pub platform_fee_balance: u64,

    /// Tokens listed so far (used as incrementing ID)
    pub token_count: u64,

    /// Whether tokens can be listed and traded
    pub active: bool,

    /// Unix timestamp when the market was created
    pub created_at: i64,

    /// PDA bump seed
    pub bump: u8,
}

impl Market {
    pub const SEED: &'static [u8] = MARKET_SEED;

    /// Fails unless the market accepts trades under valid fee rates
    pub fn ensure_tradable(&self) -> Result<()> {
        require!(self.version == CURRENT_VERSION, ErrorCode::InvalidConfiguration);
        require!(self.active, ErrorCode::MarketInactive);
        self.fee_rates.validate()
    }

    pub fn next_token_id(&self) -> Result<u64> {
        self.token_count
            .checked_add(1)
            .ok_or_else(|| error!(ErrorCode::MathOverflow))
    }

    pub fn credit_fees(&mut self, trading: u64, platform: u64) -> Result<()> {
        self.trading_fee_balance = self
            .trading_fee_balance
            .checked_add(trading)
            .ok_or(ErrorCode::MathOverflow)?;
        self.platform_fee_balance = self
            .platform_fee_balance
            .checked_add(platform)
            .ok_or(ErrorCode::MathOverflow)?;
        Ok(())
    }

    /// Zeroes and returns the trading fee balance
    pub fn take_trading_fees(&mut self) -> u64 {
        std::mem::take(&mut self.trading_fee_balance)
    }

    /// Zeroes and returns the platform fee balance
    pub fn take_platform_fees(&mut self) -> u64 {
        std::mem::take(&mut self.platform_fee_balance)
    }
}

/// Secondary market lookup by name
///
/// Seeds: ["market_name", sha256(name)]
#[account]
#[derive(InitSpace)]
pub struct MarketName {
    pub market_id: u64,
    pub bump: u8,
}

impl MarketName {
    pub const SEED: &'static [u8] = MARKET_NAME_SEED;
}

pub fn validate_market_name(name: &str) -> Result<()> {
    require!(
        !name.is_empty() && name.len() <= MAX_NAME_LEN,
        ErrorCode::InvalidName
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn market() -> Market {
        Market {
            version: CURRENT_VERSION,
            id: 1,
            name: "Domains".to_string(),
            curve: CurveParams {
                base_cost: 100,
                price_rise: 1,
                hatch_tokens: 0,
            },
            fee_rates: FeeRates {
                trading: 50,
                platform: 50,
            },
            verifier: NameVerifier::Domain,
            platform_fee_recipient: Pubkey::new_unique(),
            trading_fee_balance: 0,
            platform_fee_balance: 0,
            token_count: 0,
            active: true,
            created_at: 0,
            bump: 255,
        }
    }

    #[test]
    fn test_fee_balances_accumulate_and_drain() {
        let mut market = market();
        market.credit_fees(10, 3).unwrap();
        market.credit_fees(5, 2).unwrap();

        assert_eq!(market.take_trading_fees(), 15);
        assert_eq!(market.trading_fee_balance, 0);
        assert_eq!(market.platform_fee_balance, 5);
        assert_eq!(market.take_platform_fees(), 5);
        assert_eq!(market.take_platform_fees(), 0);
    }

    #[test]
    fn test_inactive_or_misconfigured_market_is_not_tradable() {
        let mut market = market();
        assert!(market.ensure_tradable().is_ok());

        market.fee_rates.trading = 20_000;
        assert!(market.ensure_tradable().is_err());

        market.fee_rates.trading = 0;
        market.active = false;
        assert!(market.ensure_tradable().is_err());
    }

    #[test]
    fn test_market_names() {
        assert!(validate_market_name("Domains").is_ok());
        assert!(validate_market_name("").is_err());
        assert!(validate_market_name(&"x".repeat(MAX_NAME_LEN + 1)).is_err());
    }
}
