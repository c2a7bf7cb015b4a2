//! Timelock State
//!
//! Administrative actions can be queued as spells that become executable
//! after a minimum delay. A spell is identified by the tag of its
//! `(target, data)` pair together with its eta.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::hash::hashv;

use crate::consts::{SPELL_SEED, TIMELOCK_SEED};
use crate::error::ErrorCode;

/// Timelock account (singleton PDA)
///
/// Seeds: ["timelock"]
#[account]
#[derive(InitSpace)]
pub struct Timelock {
    pub version: u8,

    /// Key allowed to schedule and cancel spells
    pub admin: Pubkey,

    /// Minimum seconds between scheduling and execution
    pub min_delay: i64,

    pub bump: u8,
}

impl Timelock {
    pub const SEED: &'static [u8] = TIMELOCK_SEED;

    pub fn check_eta(&self, now: i64, eta: i64) -> Result<()> {
        let earliest = now
            .checked_add(self.min_delay)
            .ok_or(ErrorCode::MathOverflow)?;
        require!(eta >= earliest, ErrorCode::EtaTooEarly);
        Ok(())
    }
}

/// A scheduled administrative action
///
/// Seeds: ["spell", tag, eta.to_le_bytes()]
#[account]
#[derive(InitSpace)]
pub struct Spell {
    pub target: Pubkey,
    pub tag: [u8; 32],
    #[max_len(128)]
    pub data: Vec<u8>,
    pub eta: i64,
    pub executed: bool,
    pub bump: u8,
}

impl Spell {
    pub const SEED: &'static [u8] = SPELL_SEED;

    /// Fails unless this spell was scheduled with exactly these parameters
    pub fn matches(&self, target: &Pubkey, tag: &[u8; 32], data: &[u8], eta: i64) -> Result<()> {
        require!(
            self.target == *target
                && self.tag == *tag
                && self.data.as_slice() == data
                && self.eta == eta
                && spell_tag(target, data) == *tag,
            ErrorCode::SpellNotScheduled
        );
        Ok(())
    }

    /// Consumes the spell; it can run once, and not before its eta
    pub fn mark_executed(&mut self, now: i64) -> Result<()> {
        require!(!self.executed, ErrorCode::SpellAlreadyExecuted);
        require!(now >= self.eta, ErrorCode::SpellNotReady);
        self.executed = true;
        Ok(())
    }
}

/// Deterministic fingerprint of a `(target, data)` pair
pub fn spell_tag(target: &Pubkey, data: &[u8]) -> [u8; 32] {
    hashv(&[target.as_ref(), data]).to_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::error::Error;

    fn spell(target: Pubkey, data: Vec<u8>, eta: i64) -> Spell {
        Spell {
            target,
            tag: spell_tag(&target, &data),
            data,
            eta,
            executed: false,
            bump: 255,
        }
    }

    #[test]
    fn test_tag_is_deterministic() {
        let target = Pubkey::new_unique();
        assert_eq!(spell_tag(&target, b"abc"), spell_tag(&target, b"abc"));
        assert_ne!(spell_tag(&target, b"abc"), spell_tag(&target, b"abd"));
        assert_ne!(spell_tag(&target, b"abc"), spell_tag(&Pubkey::new_unique(), b"abc"));
    }

    #[test]
    fn test_eta_respects_min_delay() {
        let timelock = Timelock {
            version: 2,
            admin: Pubkey::new_unique(),
            min_delay: 86_400,
            bump: 255,
        };
        assert!(timelock.check_eta(1_000, 87_400).is_ok());
        assert_eq!(
            timelock.check_eta(1_000, 87_399).unwrap_err(),
            Error::from(ErrorCode::EtaTooEarly)
        );
    }

    #[test]
    fn test_spell_runs_once_after_eta() {
        let target = Pubkey::new_unique();
        let mut spell = spell(target, vec![1, 2, 3], 500);

        assert_eq!(
            spell.mark_executed(499).unwrap_err(),
            Error::from(ErrorCode::SpellNotReady)
        );
        spell.mark_executed(500).unwrap();
        assert_eq!(
            spell.mark_executed(10_000).unwrap_err(),
            Error::from(ErrorCode::SpellAlreadyExecuted)
        );
    }

    #[test]
    fn test_spell_requires_exact_tuple() {
        let target = Pubkey::new_unique();
        let data = vec![9, 9];
        let spell = spell(target, data.clone(), 500);
        let tag = spell.tag;

        assert!(spell.matches(&target, &tag, &data, 500).is_ok());
        assert!(spell.matches(&target, &tag, &data, 501).is_err());
        assert!(spell.matches(&target, &tag, &[9], 500).is_err());
        assert!(spell.matches(&Pubkey::new_unique(), &tag, &data, 500).is_err());
        assert!(spell.matches(&target, &[0u8; 32], &data, 500).is_err());
    }
}
