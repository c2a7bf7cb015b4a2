//! Global Protocol Configuration
//!
//! This account stores protocol-wide settings that apply to all markets.
//! New fields are only ever appended; `version` records which layout an
//! account was written with and `migrate_config` upgrades older layouts.

use anchor_lang::prelude::*;

use crate::consts::{CONFIG_SEED, CURRENT_VERSION};
use crate::error::ErrorCode;

/// Global configuration account (singleton PDA)
///
/// Seeds: ["config"]
#[account]
#[derive(InitSpace)]
pub struct Config {
    /// Storage layout version
    pub version: u8,

    /// Protocol administrator; schedules spells once a timelock exists
    pub admin: Pubkey,

    /// PDA acting as the exchange: sole controller of token ledgers and
    /// sole caller allowed to move reserve principal
    pub exchange_authority: Pubkey,

    pub exchange_authority_bump: u8,

    /// Collateral token mint (e.g. a dollar stablecoin)
    pub collateral_mint: Pubkey,

    /// Receives trading fees of every market
    pub trading_fee_recipient: Pubkey,

    /// Total markets created (used as incrementing ID)
    pub market_count: u64,

    /// Whether trading and token creation are paused
    pub paused: bool,

    /// PDA bump seed
    pub bump: u8,

    // ---- version 2 ----
    /// Timelock PDA allowed to execute administrative spells
    pub timelock: Pubkey,

    /// Receives incidental reward tokens swept from the reserve
    pub yield_token_recipient: Pubkey,
}

impl Config {
    pub const SEED: &'static [u8] = CONFIG_SEED;

    pub fn check_version(&self) -> Result<()> {
        require!(self.version == CURRENT_VERSION, ErrorCode::InvalidConfiguration);
        Ok(())
    }

    pub fn next_market_id(&self) -> Result<u64> {
        self.market_count
            .checked_add(1)
            .ok_or_else(|| error!(ErrorCode::MathOverflow))
    }

    pub fn is_admin(&self, key: &Pubkey) -> bool {
        self.admin == *key
    }

    pub fn has_timelock(&self) -> bool {
        self.timelock != Pubkey::default()
    }

    /// True if `key` is the configured timelock
    pub fn is_timelock(&self, key: &Pubkey) -> bool {
        self.has_timelock() && self.timelock == *key
    }

    /// True if `key` may apply an [`AdminAction`](crate::governance::AdminAction)
    /// without delay. Once a timelock exists every action goes through it.
    pub fn can_apply_directly(&self, key: &Pubkey) -> bool {
        !self.has_timelock() && self.is_admin(key)
    }

    /// Upgrades a version 1 layout
    pub fn from_v1(legacy: ConfigV1) -> Self {
        Self {
            version: CURRENT_VERSION,
            admin: legacy.admin,
            exchange_authority: legacy.exchange_authority,
            exchange_authority_bump: legacy.exchange_authority_bump,
            collateral_mint: legacy.collateral_mint,
            trading_fee_recipient: legacy.trading_fee_recipient,
            market_count: legacy.market_count,
            paused: legacy.paused,
            bump: legacy.bump,
            timelock: Pubkey::default(),
            yield_token_recipient: legacy.admin,
        }
    }
}

/// Version 1 layout of [`Config`], before the timelock and reward sweep existed
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct ConfigV1 {
    pub version: u8,
    pub admin: Pubkey,
    pub exchange_authority: Pubkey,
    pub exchange_authority_bump: u8,
    pub collateral_mint: Pubkey,
    pub trading_fee_recipient: Pubkey,
    pub market_count: u64,
    pub paused: bool,
    pub bump: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy() -> ConfigV1 {
        ConfigV1 {
            version: 1,
            admin: Pubkey::new_unique(),
            exchange_authority: Pubkey::new_unique(),
            exchange_authority_bump: 254,
            collateral_mint: Pubkey::new_unique(),
            trading_fee_recipient: Pubkey::new_unique(),
            market_count: 7,
            paused: false,
            bump: 255,
        }
    }

    #[test]
    fn test_v1_migration_preserves_fields() {
        let old = legacy();
        let config = Config::from_v1(old.clone());

        assert_eq!(config.version, CURRENT_VERSION);
        assert_eq!(config.admin, old.admin);
        assert_eq!(config.market_count, 7);
        assert_eq!(config.timelock, Pubkey::default());
        assert_eq!(config.yield_token_recipient, old.admin);
        assert!(config.check_version().is_ok());
    }

    #[test]
    fn test_v1_layout_is_prefix_of_current() {
        let old = legacy();
        let upgraded = Config::from_v1(old.clone());

        let old_bytes = old.try_to_vec().unwrap();
        let new_bytes = upgraded.try_to_vec().unwrap();
        // only the version byte differs in the shared prefix
        assert_eq!(old_bytes[1..], new_bytes[1..old_bytes.len()]);
    }

    #[test]
    fn test_default_timelock_grants_nothing() {
        let config = Config::from_v1(legacy());
        assert!(!config.has_timelock());
        assert!(!config.is_timelock(&Pubkey::default()));
        assert!(!config.can_apply_directly(&Pubkey::default()));
        assert!(config.can_apply_directly(&config.admin));
    }

    #[test]
    fn test_timelock_ends_direct_administration() {
        let mut config = Config::from_v1(legacy());
        let timelock = Pubkey::new_unique();
        config.timelock = timelock;

        assert!(!config.can_apply_directly(&config.admin));
        assert!(!config.can_apply_directly(&timelock));
        assert!(config.is_timelock(&timelock));
        assert!(!config.is_timelock(&config.admin));
        // market creation and donated redemption stay with the admin
        assert!(config.is_admin(&config.admin));
    }
}
