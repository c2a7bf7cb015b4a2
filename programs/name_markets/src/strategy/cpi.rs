//! On-chain strategy backed by another program.
//!
//! The strategy program exposes three instructions, addressed with Anchor
//! sighash discriminators (`sha256("global:<name>")[..8]`):
//!
//! | instruction      | args            | return data          |
//! |------------------|-----------------|----------------------|
//! | `exchange_rate`  | -               | `u128` rate          |
//! | `deposit`        | `amount: u64`   | `u128` shares minted |
//! | `withdraw_shares`| `shares: u128`  | `u64` underlying     |
//!
//! Every instruction receives the same accounts: strategy state, strategy
//! vault, reserve custody, reserve authority (signer) and token program.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::{
    hash::hash,
    instruction::{AccountMeta, Instruction},
    program::{get_return_data, invoke_signed},
};

use super::YieldStrategy;
use crate::error::ErrorCode;

pub struct CpiStrategy<'a, 'info> {
    pub program: AccountInfo<'info>,
    pub state: AccountInfo<'info>,
    pub vault: AccountInfo<'info>,
    pub custody: AccountInfo<'info>,
    pub authority: AccountInfo<'info>,
    pub token_program: AccountInfo<'info>,
    pub signer_seeds: &'a [&'a [&'a [u8]]],
}

fn sighash(name: &str) -> [u8; 8] {
    let preimage = format!("global:{}", name);
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&hash(preimage.as_bytes()).to_bytes()[..8]);
    discriminator
}

/// Decodes a little-endian integer from return data. The runtime drops
/// trailing zero bytes, so shorter payloads are zero-extended.
fn read_le<const N: usize>(returned: &[u8]) -> Result<[u8; N]> {
    require!(returned.len() <= N, ErrorCode::ExternalStrategyFailure);
    let mut buf = [0u8; N];
    buf[..returned.len()].copy_from_slice(returned);
    Ok(buf)
}

impl<'a, 'info> CpiStrategy<'a, 'info> {
    fn call(&self, name: &str, args: &[u8]) -> Result<Vec<u8>> {
        let mut data = sighash(name).to_vec();
        data.extend_from_slice(args);

        let ix = Instruction {
            program_id: *self.program.key,
            accounts: vec![
                AccountMeta::new(*self.state.key, false),
                AccountMeta::new(*self.vault.key, false),
                AccountMeta::new(*self.custody.key, false),
                AccountMeta::new_readonly(*self.authority.key, true),
                AccountMeta::new_readonly(*self.token_program.key, false),
            ],
            data,
        };

        invoke_signed(
            &ix,
            &[
                self.state.clone(),
                self.vault.clone(),
                self.custody.clone(),
                self.authority.clone(),
                self.token_program.clone(),
                self.program.clone(),
            ],
            self.signer_seeds,
        )
        .map_err(|err| {
            msg!("Strategy {} failed: {:?}", name, err);
            error!(ErrorCode::ExternalStrategyFailure)
        })?;

        let (program_id, returned) =
            get_return_data().ok_or(ErrorCode::ExternalStrategyFailure)?;
        require_keys_eq!(program_id, *self.program.key, ErrorCode::ExternalStrategyFailure);
        Ok(returned)
    }

    fn call_u128(&self, name: &str, args: &[u8]) -> Result<u128> {
        let returned = self.call(name, args)?;
        Ok(u128::from_le_bytes(read_le(&returned)?))
    }
}

impl<'a, 'info> YieldStrategy for CpiStrategy<'a, 'info> {
    fn exchange_rate(&mut self) -> Result<u128> {
        self.call_u128("exchange_rate", &[])
    }

    fn deposit(&mut self, amount: u64) -> Result<u128> {
        self.call_u128("deposit", &amount.to_le_bytes())
    }

    fn withdraw_shares(&mut self, shares: u128) -> Result<u64> {
        let returned = self.call("withdraw_shares", &shares.to_le_bytes())?;
        Ok(u64::from_le_bytes(read_le(&returned)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sighash_matches_anchor_convention() {
        let expected = hash(b"global:deposit").to_bytes();
        assert_eq!(sighash("deposit"), expected[..8]);
        assert_ne!(sighash("deposit"), sighash("withdraw_shares"));
    }

    #[test]
    fn test_return_data_zero_extension() {
        let full = 0x0102_0000u128.to_le_bytes();
        assert_eq!(u128::from_le_bytes(read_le(&full).unwrap()), 0x0102_0000);
        // trailing zeros trimmed by the runtime
        assert_eq!(u128::from_le_bytes(read_le(&[0, 0, 2, 1]).unwrap()), 0x0102_0000);
        assert_eq!(u64::from_le_bytes(read_le(&[]).unwrap()), 0);
        assert!(read_le::<8>(&[1u8; 9]).is_err());
    }
}
