//! # Exchange
//!
//! Buy and sell accounting for name tokens. The functions here apply every
//! ledger, supply and fee effect of a trade; instruction handlers call them
//! first and only then move collateral and talk to the yield strategy.
//!
//! ## Buy
//!
//! ```text
//! quote = F(supply + amount) - F(supply)      (+ fees)
//! require total <= max_cost
//! mint amount to recipient, supply += amount
//! dai_invested += raw, fee balances += fees
//! ── handler: collect total into custody, invest total,
//!    collect the reserve's rounding surcharge (total + surcharge <= max_cost)
//! ```
//!
//! ## Sell
//!
//! ```text
//! quote = F(supply) - F(supply - amount)      (- fees)
//! require raw - fee >= min_price
//! burn amount from seller, supply -= amount
//! dai_invested -= raw, fee balances += fees
//! ── handler: redeem raw - fee, pay it to the recipient (payout >= min_price)
//! ```
//!
//! The fee on a sell is computed from the raw return before anything is
//! redeemed; it never leaves the reserve. Share rounding is always borne by
//! the trader: a buy may cost a surcharge and a sell may pay one unit less,
//! but only when the reserve would otherwise not cover what it owes.

use anchor_lang::prelude::*;

use crate::curve::{BondingCurve, CostBreakdown};
use crate::error::ErrorCode;
use crate::state::{LedgerAccount, Market, TokenInfo};
use crate::strategy::{underlying_to_shares, underlying_to_shares_ceil};

fn check_listing(market: &Market, token: &TokenInfo) -> Result<()> {
    require!(token.market_id == market.id, ErrorCode::InvalidAmount);
    market.ensure_tradable()
}

pub fn quote_buy(market: &Market, token: &TokenInfo, amount: u128) -> Result<CostBreakdown> {
    check_listing(market, token)?;
    BondingCurve::quote_buy(&market.curve, &market.fee_rates, token.supply, amount)
}

pub fn quote_sell(market: &Market, token: &TokenInfo, amount: u128) -> Result<CostBreakdown> {
    check_listing(market, token)?;
    BondingCurve::quote_sell(&market.curve, &market.fee_rates, token.supply, amount)
}

/// Price of the next whole token at the token's current supply
pub fn spot_price(market: &Market, token: &TokenInfo) -> Result<u64> {
    BondingCurve::price_at(&market.curve, token.supply)
}

/// Adds the reserve's rounding `surcharge` to a buy; returns the amount
/// charged, which must stay within `max_cost`
pub fn charge_rounding(quote: &CostBreakdown, surcharge: u64, max_cost: u64) -> Result<u64> {
    let charged = quote
        .total
        .checked_add(surcharge)
        .ok_or(ErrorCode::MathOverflow)?;
    require!(charged <= max_cost, ErrorCode::SlippageExceeded);
    Ok(charged)
}

/// Checks what a sell actually paid against the seller's bound
pub fn check_payout(paid: u64, min_price: u64) -> Result<()> {
    require!(paid >= min_price, ErrorCode::SlippageExceeded);
    Ok(())
}

/// Applies the effects of buying `amount` tokens at strategy rate `rate`
pub fn apply_buy(
    market: &mut Market,
    token: &mut TokenInfo,
    recipient: &mut LedgerAccount,
    controller: &Pubkey,
    rate: u128,
    amount: u128,
    max_cost: u64,
) -> Result<CostBreakdown> {
    let quote = quote_buy(market, token, amount)?;
    require!(quote.total <= max_cost, ErrorCode::SlippageExceeded);

    let shares = underlying_to_shares(quote.raw, rate)?;
    token.mint(controller, recipient, amount)?;
    token.dai_invested = token
        .dai_invested
        .checked_add(quote.raw)
        .ok_or(ErrorCode::MathOverflow)?;
    token.invested_shares = token
        .invested_shares
        .checked_add(shares)
        .ok_or(ErrorCode::MathOverflow)?;
    market.credit_fees(quote.trading_fee, quote.platform_fee)?;

    Ok(quote)
}

/// Applies the effects of selling `amount` tokens at strategy rate `rate`
pub fn apply_sell(
    market: &mut Market,
    token: &mut TokenInfo,
    seller: &mut LedgerAccount,
    controller: &Pubkey,
    rate: u128,
    amount: u128,
    min_price: u64,
) -> Result<CostBreakdown> {
    require!(seller.amount >= amount, ErrorCode::InsufficientBalance);
    let quote = quote_sell(market, token, amount)?;
    require!(quote.total >= min_price, ErrorCode::SlippageExceeded);

    let shares = underlying_to_shares_ceil(quote.raw, rate)?;
    token.burn(controller, seller, amount)?;
    token.dai_invested = token
        .dai_invested
        .checked_sub(quote.raw)
        .ok_or(ErrorCode::MathOverflow)?;
    token.invested_shares = token.invested_shares.saturating_sub(shares);
    market.credit_fees(quote.trading_fee, quote.platform_fee)?;

    Ok(quote)
}

/// Detaches the shares a token holds beyond its principal
pub fn take_token_interest(token: &mut TokenInfo, rate: u128) -> Result<u128> {
    let principal = underlying_to_shares_ceil(token.dai_invested, rate)?;
    let interest = token.invested_shares.saturating_sub(principal);
    require!(interest > 0, ErrorCode::InvalidAmount);
    token.invested_shares -= interest;
    Ok(interest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::error::Error;

    use crate::consts::{CURRENT_VERSION, RATE_SCALE, UNIT_SCALE};
    use crate::curve::{CurveParams, FeeRates};
    use crate::state::YieldReserve;
    use crate::strategy::mock::MockStrategy;
    use crate::verifier::NameVerifier;

    const TOKEN: u128 = UNIT_SCALE;

    /// One market, one token and the reserve, operated the way the
    /// instruction handlers do. A failed operation restores the prior
    /// state, as the runtime does for a failed transaction.
    #[derive(Clone)]
    struct Protocol {
        exchange: Pubkey,
        market: Market,
        token: TokenInfo,
        reserve: YieldReserve,
        strategy: MockStrategy,
        /// Collateral paid out to users
        paid_out: u64,
        /// Rounding surcharges charged to buyers
        surcharges: u64,
    }

    impl Protocol {
        fn new(curve: CurveParams, fee_rates: FeeRates) -> Self {
            let exchange = Pubkey::new_unique();
            Self {
                exchange,
                market: Market {
                    version: CURRENT_VERSION,
                    id: 1,
                    name: "Domains".to_string(),
                    curve,
                    fee_rates,
                    verifier: NameVerifier::Domain,
                    platform_fee_recipient: Pubkey::new_unique(),
                    trading_fee_balance: 0,
                    platform_fee_balance: 0,
                    token_count: 1,
                    active: true,
                    created_at: 0,
                    bump: 255,
                },
                token: TokenInfo {
                    version: CURRENT_VERSION,
                    id: 1,
                    market_id: 1,
                    name: "example.com".to_string(),
                    controller: exchange,
                    owner: Pubkey::new_unique(),
                    supply: 0,
                    dai_invested: 0,
                    invested_shares: 0,
                    created_at: 0,
                    bump: 255,
                },
                reserve: YieldReserve {
                    version: CURRENT_VERSION,
                    exchange,
                    strategy: Pubkey::new_unique(),
                    custody: Pubkey::new_unique(),
                    total_shares: 0,
                    invested_underlying: 0,
                    donated: 0,
                    redeemed_donated: 0,
                    last_rate: 0,
                    authority_bump: 254,
                    bump: 255,
                },
                strategy: MockStrategy::new(0),
                paid_out: 0,
                surcharges: 0,
            }
        }

        fn holder(&self) -> LedgerAccount {
            LedgerAccount {
                token: Pubkey::new_unique(),
                holder: Pubkey::new_unique(),
                amount: 0,
                bump: 255,
            }
        }

        fn atomically<T>(
            &mut self,
            holder: &mut LedgerAccount,
            op: impl FnOnce(&mut Self, &mut LedgerAccount) -> Result<T>,
        ) -> Result<T> {
            let saved = (self.clone(), holder.clone());
            let result = op(self, holder);
            if result.is_err() {
                *self = saved.0;
                *holder = saved.1;
            }
            result
        }

        fn buy(&mut self, to: &mut LedgerAccount, amount: u128, max_cost: u64) -> Result<CostBreakdown> {
            self.atomically(to, |p, to| {
                let rate = p.reserve.observe_rate(&mut p.strategy)?;
                let quote = apply_buy(&mut p.market, &mut p.token, to, &p.exchange, rate, amount, max_cost)?;
                p.strategy.custody += quote.total;
                let idle = p.strategy.custody;
                let surcharge = p.reserve.invest(&p.exchange, &mut p.strategy, idle, quote.total)?;
                charge_rounding(&quote, surcharge, max_cost)?;
                p.strategy.custody += surcharge;
                p.surcharges += surcharge;
                Ok(quote)
            })
        }

        fn sell(&mut self, from: &mut LedgerAccount, amount: u128, min_price: u64) -> Result<CostBreakdown> {
            self.atomically(from, |p, from| {
                let rate = p.reserve.observe_rate(&mut p.strategy)?;
                let quote = apply_sell(&mut p.market, &mut p.token, from, &p.exchange, rate, amount, min_price)?;
                if quote.total > 0 {
                    let idle = p.strategy.custody;
                    let paid = p.reserve.redeem(&p.exchange, &mut p.strategy, idle, quote.total)?;
                    check_payout(paid, min_price)?;
                    p.pay_out(paid);
                }
                Ok(quote)
            })
        }

        fn withdraw_trading_fees(&mut self) -> Result<u64> {
            let amount = self.market.take_trading_fees();
            require!(amount > 0, ErrorCode::InvalidAmount);
            let idle = self.strategy.custody;
            let paid = self.reserve.redeem(&self.exchange, &mut self.strategy, idle, amount)?;
            self.pay_out(paid);
            Ok(paid)
        }

        fn withdraw_interest(&mut self) -> Result<u64> {
            let rate = self.reserve.observe_rate(&mut self.strategy)?;
            let shares = take_token_interest(&mut self.token, rate)?;
            let idle = self.strategy.custody;
            let paid = self.reserve.redeem_shares(&self.exchange, &mut self.strategy, idle, shares)?;
            self.pay_out(paid);
            Ok(paid)
        }

        fn pay_out(&mut self, amount: u64) {
            self.strategy.custody -= amount;
            self.paid_out += amount;
        }

        fn assert_solvent(&self) {
            let liabilities = self.token.dai_invested as u128
                + self.market.trading_fee_balance as u128
                + self.market.platform_fee_balance as u128
                + self.reserve.donated_remaining() as u128;
            let assets = self.reserve.share_value(self.strategy.rate).unwrap() as u128
                + self.strategy.custody as u128;
            assert_eq!(liabilities, self.reserve.invested_underlying as u128);
            assert!(liabilities <= assets, "liabilities {} > assets {}", liabilities, assets);
        }

        fn assert_curve_backed(&self) {
            let expected = BondingCurve::value_at(&self.market.curve, self.token.supply).unwrap();
            assert_eq!(self.token.dai_invested, expected);
        }
    }

    fn reference() -> Protocol {
        Protocol::new(
            CurveParams {
                base_cost: 1_000_000_000_000_000_000,
                price_rise: 100_000_000_000_000_000,
                hatch_tokens: 0,
            },
            FeeRates {
                trading: 100,
                platform: 0,
            },
        )
    }

    fn small() -> Protocol {
        Protocol::new(
            CurveParams {
                base_cost: 1_000_000,
                price_rise: 10_000,
                hatch_tokens: 5 * TOKEN,
            },
            FeeRates {
                trading: 150,
                platform: 50,
            },
        )
    }

    #[test]
    fn test_reference_buy() {
        let mut p = reference();
        let mut alice = p.holder();

        let quote = p.buy(&mut alice, 10 * TOKEN, u64::MAX).unwrap();

        assert_eq!(quote.raw, 14_500_000_000_000_000_000);
        assert_eq!(quote.fee, 145_000_000_000_000_000);
        assert_eq!(quote.total, 14_645_000_000_000_000_000);
        assert_eq!(alice.amount, 10 * TOKEN);
        assert_eq!(p.token.supply, 10 * TOKEN);
        assert_eq!(p.token.dai_invested, quote.raw);
        assert_eq!(p.market.trading_fee_balance, quote.fee);
        assert_eq!(p.reserve.total_shares, quote.total as u128);
        p.assert_solvent();
    }

    #[test]
    fn test_buy_slippage_leaves_no_trace() {
        let mut p = reference();
        let mut alice = p.holder();
        let before = p.clone();

        let err = p.buy(&mut alice, 10 * TOKEN, 14_645_000_000_000_000_000 - 1).unwrap_err();

        assert_eq!(err, Error::from(ErrorCode::SlippageExceeded));
        assert_eq!(alice.amount, 0);
        assert_eq!(p.token.supply, before.token.supply);
        assert_eq!(p.market.trading_fee_balance, 0);
        assert_eq!(p.reserve.total_shares, 0);
    }

    #[test]
    fn test_strategy_failure_aborts_trade() {
        let mut p = small();
        let mut alice = p.holder();
        p.buy(&mut alice, 8 * TOKEN, u64::MAX).unwrap();

        let snapshot = p.clone();
        p.strategy.fail = true;

        let mut bob = p.holder();
        assert_eq!(
            p.buy(&mut bob, TOKEN, u64::MAX).unwrap_err(),
            Error::from(ErrorCode::ExternalStrategyFailure)
        );
        assert_eq!(
            p.sell(&mut alice, TOKEN, 0).unwrap_err(),
            Error::from(ErrorCode::ExternalStrategyFailure)
        );

        assert_eq!(bob.amount, 0);
        assert_eq!(alice.amount, 8 * TOKEN);
        assert_eq!(p.token.supply, snapshot.token.supply);
        assert_eq!(p.token.dai_invested, snapshot.token.dai_invested);
        assert_eq!(p.market.trading_fee_balance, snapshot.market.trading_fee_balance);
        assert_eq!(p.reserve.total_shares, snapshot.reserve.total_shares);
    }

    #[test]
    fn test_round_trip_within_one_unit() {
        for amount in [TOKEN / 3, 2 * TOKEN, 7 * TOKEN + 11] {
            let mut p = small();
            let mut whale = p.holder();
            p.buy(&mut whale, 3 * TOKEN, u64::MAX).unwrap();

            let mut alice = p.holder();
            let bought = p.buy(&mut alice, amount, u64::MAX).unwrap();
            let sold = p.sell(&mut alice, amount, 0).unwrap();

            assert!(bought.raw - sold.raw <= 1);
            assert_eq!(alice.amount, 0);
            p.assert_curve_backed();
            p.assert_solvent();
        }
    }

    #[test]
    fn test_sell_slippage_and_balance_checks() {
        let mut p = small();
        let mut alice = p.holder();
        p.buy(&mut alice, 4 * TOKEN, u64::MAX).unwrap();

        let quote = quote_sell(&p.market, &p.token, TOKEN).unwrap();
        assert_eq!(
            p.sell(&mut alice, TOKEN, quote.total + 1).unwrap_err(),
            Error::from(ErrorCode::SlippageExceeded)
        );
        assert_eq!(
            p.sell(&mut alice, 5 * TOKEN, 0).unwrap_err(),
            Error::from(ErrorCode::InsufficientBalance)
        );

        let sold = p.sell(&mut alice, TOKEN, quote.total).unwrap();
        assert_eq!(sold, quote);
        assert_eq!(p.paid_out, quote.total);
        assert_eq!(alice.amount, 3 * TOKEN);
    }

    #[test]
    fn test_sell_fee_stays_in_reserve() {
        let mut p = small();
        let mut alice = p.holder();
        let bought = p.buy(&mut alice, 6 * TOKEN, u64::MAX).unwrap();
        let sold = p.sell(&mut alice, 6 * TOKEN, 0).unwrap();

        assert_eq!(p.token.supply, 0);
        assert_eq!(p.token.dai_invested, 0);
        assert_eq!(
            p.market.trading_fee_balance + p.market.platform_fee_balance,
            bought.fee + sold.fee
        );
        p.assert_solvent();

        p.withdraw_trading_fees().unwrap();
        assert_eq!(p.market.trading_fee_balance, 0);
        assert_eq!(
            p.withdraw_trading_fees().unwrap_err(),
            Error::from(ErrorCode::InvalidAmount)
        );
        p.assert_solvent();
    }

    #[test]
    fn test_inactive_market_rejects_trades() {
        let mut p = small();
        let mut alice = p.holder();
        p.market.active = false;
        assert_eq!(
            p.buy(&mut alice, TOKEN, u64::MAX).unwrap_err(),
            Error::from(ErrorCode::MarketInactive)
        );
    }

    #[test]
    fn test_token_from_other_market_is_unknown() {
        let mut p = small();
        p.token.market_id = 2;
        assert_eq!(
            quote_buy(&p.market, &p.token, TOKEN).unwrap_err(),
            Error::from(ErrorCode::InvalidAmount)
        );
    }

    #[test]
    fn test_zero_amount_is_invalid() {
        let mut p = small();
        let mut alice = p.holder();
        assert_eq!(
            p.buy(&mut alice, 0, u64::MAX).unwrap_err(),
            Error::from(ErrorCode::InvalidAmount)
        );
        assert_eq!(
            p.sell(&mut alice, 0, 0).unwrap_err(),
            Error::from(ErrorCode::InvalidAmount)
        );
    }

    #[test]
    fn test_solvency_through_interest_and_trading() {
        let mut p = small();
        let mut alice = p.holder();
        let mut bob = p.holder();

        p.buy(&mut alice, 12 * TOKEN, u64::MAX).unwrap();
        p.strategy.accrue(250);
        p.buy(&mut bob, 3 * TOKEN + 17, u64::MAX).unwrap();
        p.assert_solvent();

        p.sell(&mut alice, 5 * TOKEN, 0).unwrap();
        p.strategy.accrue(100);
        let held = bob.amount;
        p.sell(&mut bob, held, 0).unwrap();
        p.assert_solvent();
        p.assert_curve_backed();

        p.withdraw_interest().unwrap();
        p.assert_solvent();

        let held = alice.amount;
        p.sell(&mut alice, held, 0).unwrap();
        p.withdraw_trading_fees().unwrap();
        p.assert_solvent();
        assert_eq!(p.token.supply, 0);
    }

    #[test]
    fn test_token_interest() {
        let mut p = small();
        let mut alice = p.holder();
        p.buy(&mut alice, 10 * TOKEN, u64::MAX).unwrap();

        assert_eq!(
            p.withdraw_interest().unwrap_err(),
            Error::from(ErrorCode::InvalidAmount)
        );

        // 10% interest on the principal
        p.strategy.rate = RATE_SCALE * 11 / 10;
        let principal = p.token.dai_invested;
        let paid = p.withdraw_interest().unwrap();

        assert!(paid + 1 >= principal / 10);
        assert!(paid <= principal / 10);
        assert_eq!(p.token.dai_invested, principal);
        p.assert_solvent();
    }

    #[test]
    fn test_solvency_at_flat_non_par_rate() {
        let mut p = small();
        // one share worth 1.5 collateral units, never accruing
        p.strategy.rate = RATE_SCALE * 3 / 2;
        let mut alice = p.holder();
        let mut bob = p.holder();

        // costs a single unit, less than one share
        assert_eq!(
            p.buy(&mut alice, TOKEN / 1_000_000 + 1, u64::MAX).unwrap_err(),
            Error::from(ErrorCode::InvalidAmount)
        );
        assert_eq!(alice.amount, 0);
        assert_eq!(p.reserve.total_shares, 0);
        p.assert_solvent();

        p.buy(&mut alice, 3 * TOKEN + 7, u64::MAX).unwrap();
        p.assert_solvent();
        p.buy(&mut bob, TOKEN / 3, u64::MAX).unwrap();
        p.assert_solvent();
        p.buy(&mut bob, 2 * TOKEN + 1, u64::MAX).unwrap();
        p.assert_solvent();

        for _ in 0..5 {
            p.sell(&mut alice, TOKEN / 7, 0).unwrap();
            p.assert_solvent();
        }
        p.withdraw_trading_fees().unwrap();
        p.assert_solvent();

        let held = bob.amount;
        p.sell(&mut bob, held, 0).unwrap();
        p.assert_solvent();
        let held = alice.amount;
        p.sell(&mut alice, held, 0).unwrap();
        p.assert_solvent();

        assert_eq!(p.token.supply, 0);
        assert_eq!(p.token.dai_invested, 0);
        p.withdraw_trading_fees().unwrap();
        p.assert_solvent();
        assert_eq!(p.reserve.invested_underlying, p.market.platform_fee_balance);
    }

    #[test]
    fn test_buy_surcharge_counts_against_max_cost() {
        let mut p = small();
        p.strategy.rate = RATE_SCALE * 3 / 2;
        let mut alice = p.holder();

        // 3 units buy 2 shares worth exactly 3; 4 units buy 2 shares worth 3
        let exact = p.buy(&mut alice, 3 * TOKEN / 1_000_000, u64::MAX).unwrap();
        assert_eq!(exact.total, 3);
        assert_eq!(p.surcharges, 0);

        let quote = quote_buy(&p.market, &p.token, 4 * TOKEN / 1_000_000).unwrap();
        assert_eq!(quote.total, 4);
        assert_eq!(
            p.buy(&mut alice, 4 * TOKEN / 1_000_000, quote.total).unwrap_err(),
            Error::from(ErrorCode::SlippageExceeded)
        );
        assert_eq!(alice.amount, 3 * TOKEN / 1_000_000);

        p.buy(&mut alice, 4 * TOKEN / 1_000_000, quote.total + 1).unwrap();
        assert_eq!(p.surcharges, 1);
        p.assert_solvent();
    }

    #[test]
    fn test_spot_price_follows_supply() {
        let mut p = small();
        let mut alice = p.holder();
        assert_eq!(spot_price(&p.market, &p.token).unwrap(), 1_000_000);

        p.buy(&mut alice, 6 * TOKEN, u64::MAX).unwrap();
        assert_eq!(spot_price(&p.market, &p.token).unwrap(), 1_010_000);
    }
}
