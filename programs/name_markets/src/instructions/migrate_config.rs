//! Configuration Migration
//!
//! Rewrites a configuration account stored with an older layout into the
//! current one, growing the account and topping up rent as needed.

use anchor_lang::prelude::*;
use anchor_lang::system_program::{transfer, Transfer};
use anchor_lang::Discriminator;

use crate::consts::CURRENT_VERSION;
use crate::error::ErrorCode;
use crate::state::{Config, ConfigV1};

#[derive(Accounts)]
pub struct MigrateConfig<'info> {
    /// Protocol administrator recorded in the old layout
    #[account(mut)]
    pub admin: Signer<'info>,

    /// CHECK: deserialized by hand since its layout predates `Config`
    #[account(
        mut,
        seeds = [Config::SEED],
        bump,
        owner = crate::ID,
    )]
    pub config: UncheckedAccount<'info>,

    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> MigrateConfig<'info> {
    pub fn migrate_config(&mut self) -> Result<()> {
        let info = self.config.to_account_info();

        let upgraded = {
            let data = info.try_borrow_data()?;
            require!(data.len() > 8, ErrorCode::InvalidConfiguration);
            require!(
                data[..8] == Config::DISCRIMINATOR,
                ErrorCode::InvalidConfiguration
            );
            match data[8] {
                1 => {
                    let legacy = ConfigV1::deserialize(&mut &data[8..])?;
                    require_keys_eq!(legacy.admin, self.admin.key(), ErrorCode::Unauthorized);
                    Config::from_v1(legacy)
                }
                _ => return err!(ErrorCode::InvalidConfiguration),
            }
        };

        let space = 8 + Config::INIT_SPACE;
        let required = Rent::get()?.minimum_balance(space);
        let shortfall = required.saturating_sub(info.lamports());
        if shortfall > 0 {
            let accounts = Transfer {
                from: self.admin.to_account_info(),
                to: info.clone(),
            };
            transfer(
                CpiContext::new(self.system_program.to_account_info(), accounts),
                shortfall,
            )?;
        }
        if info.data_len() < space {
            info.realloc(space, true)?;
        }

        let mut data = info.try_borrow_mut_data()?;
        upgraded.try_serialize(&mut &mut data[..])?;

        msg!("Config migrated to version {}", CURRENT_VERSION);
        Ok(())
    }
}
