//! # Bonding Curve Pricing
//!
//! Every name token is priced by a two-segment curve over its supply:
//!
//! ```text
//!   price
//!     ▲
//!     │                          ╱
//!     │                      ╱
//!     │                  ╱       price_rise per whole token
//!     │              ╱
//!     │ ────────────┘            base_cost (hatch segment)
//!     │
//!     └─────────────┬──────────────────▶ supply
//!                 hatch
//! ```
//!
//! The cost of moving supply from `s0` to `s1` is the difference of the
//! cumulative curve value `F(s1) - F(s0)`. Because both buys and sells are
//! priced off the same `F`, a token's invested collateral always equals
//! `F(supply)` exactly.

pub mod bonding_curve;

pub use bonding_curve::*;
