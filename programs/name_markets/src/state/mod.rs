//! Account layouts for the name market protocol

pub mod config;
pub mod ledger;
pub mod market;
pub mod reserve;
pub mod timelock;
pub mod token;

pub use config::*;
pub use ledger::*;
pub use market::*;
pub use reserve::*;
pub use timelock::*;
pub use token::*;

use anchor_lang::solana_program::hash::hash;

/// Fixed-width PDA seed for a variable-length name
pub fn name_seed(name: &str) -> [u8; 32] {
    hash(name.as_bytes()).to_bytes()
}
