//! Instruction handlers for the name market protocol
//!
//! - `initialize` / `migrate_config` - Set up or upgrade the protocol (admin)
//! - `add_market` - Register a market with its curve and fees (admin)
//! - `add_token` - List a name in a market (permissionless)
//! - `trade` - Quote, buy and sell name tokens
//! - `ledger` - Transfers and allowances on the token ledger
//! - `fees` / `interest` / `donations` - Move collateral out of the reserve
//! - `admin` / `timelock` - Administrative actions, immediate or delayed

pub mod add_market;
pub mod add_token;
pub mod admin;
pub mod donations;
pub mod fees;
pub mod initialize;
pub mod interest;
pub mod ledger;
pub mod migrate_config;
pub mod reserve;
pub mod timelock;
pub mod trade;

pub use add_market::*;
pub use add_token::*;
pub use admin::*;
pub use donations::*;
pub use fees::*;
pub use initialize::*;
pub use interest::*;
pub use ledger::*;
pub use migrate_config::*;
pub use reserve::*;
pub use timelock::*;
pub use trade::*;
