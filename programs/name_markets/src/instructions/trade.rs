//! Token Trading
//!
//! Handles quoting, buying and selling of name tokens along the market's
//! bonding curve. Buy payments are invested in full; sell proceeds are
//! redeemed from the strategy and paid to the recipient. Share rounding the
//! reserve cannot absorb is borne by the trader, within the trade's bound.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::TokenAccount;

use super::reserve::*;
use crate::curve::CostBreakdown;
use crate::error::ErrorCode;
use crate::exchange::{
    apply_buy, apply_sell, charge_rounding, check_payout, quote_buy, quote_sell, spot_price,
};
use crate::state::{Config, LedgerAccount, Market, TokenInfo};

/// Event emitted when tokens are bought
#[event]
pub struct TokensBought {
    pub market_id: u64,
    pub token_id: u64,
    pub buyer: Pubkey,
    pub recipient: Pubkey,
    pub amount: u128,
    pub raw_cost: u64,
    pub fee: u64,
    pub total_cost: u64,
    /// Total cost plus the reserve's rounding surcharge
    pub charged: u64,
    pub supply: u128,
    pub price: u64,
}

/// Event emitted when tokens are sold
#[event]
pub struct TokensSold {
    pub market_id: u64,
    pub token_id: u64,
    pub seller: Pubkey,
    pub amount: u128,
    pub raw_return: u64,
    pub fee: u64,
    pub proceeds: u64,
    /// Proceeds actually paid out
    pub paid: u64,
    pub supply: u128,
    pub price: u64,
}

/// Read-only accounts for price quotes
#[derive(Accounts)]
#[instruction(market_id: u64, token_id: u64)]
pub struct Quote<'info> {
    #[account(
        seeds = [Market::SEED, &market_id.to_le_bytes()],
        bump = market.bump,
    )]
    pub market: Box<Account<'info, Market>>,

    #[account(
        seeds = [TokenInfo::SEED, &market_id.to_le_bytes(), &token_id.to_le_bytes()],
        bump = token.bump,
    )]
    pub token: Box<Account<'info, TokenInfo>>,
}

impl<'info> Quote<'info> {
    pub fn get_cost_for_buying_tokens(&self, amount: u128) -> Result<CostBreakdown> {
        quote_buy(&self.market, &self.token, amount)
    }

    pub fn get_price_for_selling_tokens(&self, amount: u128) -> Result<CostBreakdown> {
        quote_sell(&self.market, &self.token, amount)
    }
}

#[derive(Accounts)]
#[instruction(market_id: u64, token_id: u64)]
pub struct BuyTokens<'info> {
    /// Pays the total cost
    pub buyer: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Box<Account<'info, Config>>,

    #[account(
        mut,
        seeds = [Market::SEED, &market_id.to_le_bytes()],
        bump = market.bump,
    )]
    pub market: Box<Account<'info, Market>>,

    #[account(
        mut,
        seeds = [TokenInfo::SEED, &market_id.to_le_bytes(), &token_id.to_le_bytes()],
        bump = token.bump,
    )]
    pub token: Box<Account<'info, TokenInfo>>,

    /// Ledger balance credited with the bought tokens
    #[account(
        mut,
        has_one = token,
    )]
    pub recipient_balance: Box<Account<'info, LedgerAccount>>,

    /// Buyer's collateral account
    #[account(
        mut,
        constraint = buyer_collateral.mint == config.collateral_mint @ ErrorCode::InvalidConfiguration,
    )]
    pub buyer_collateral: Box<InterfaceAccount<'info, TokenAccount>>,

    pub reserve: ReserveAccounts<'info>,
}

impl<'info> BuyTokens<'info> {
    /// Buy `amount` token units for at most `max_cost` collateral
    pub fn buy_tokens(&mut self, amount: u128, max_cost: u64) -> Result<CostBreakdown> {
        self.config.check_version()?;
        require!(!self.config.paused, ErrorCode::ProtocolPaused);
        let exchange = self.config.exchange_authority;

        let rate = self.reserve.observe_rate()?;
        let quote = apply_buy(
            &mut self.market,
            &mut self.token,
            &mut self.recipient_balance,
            &exchange,
            rate,
            amount,
            max_cost,
        )?;

        self.reserve.collect(&self.buyer_collateral, &self.buyer, quote.total)?;
        let surcharge = self.reserve.invest(&exchange, quote.total)?;
        let charged = charge_rounding(&quote, surcharge, max_cost)?;
        if surcharge > 0 {
            self.reserve.collect(&self.buyer_collateral, &self.buyer, surcharge)?;
        }

        emit!(TokensBought {
            market_id: self.market.id,
            token_id: self.token.id,
            buyer: self.buyer.key(),
            recipient: self.recipient_balance.holder,
            amount,
            raw_cost: quote.raw,
            fee: quote.fee,
            total_cost: quote.total,
            charged,
            supply: self.token.supply,
            price: spot_price(&self.market, &self.token)?,
        });

        Ok(quote)
    }
}

#[derive(Accounts)]
#[instruction(market_id: u64, token_id: u64)]
pub struct SellTokens<'info> {
    pub seller: Signer<'info>,

    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Box<Account<'info, Config>>,

    #[account(
        mut,
        seeds = [Market::SEED, &market_id.to_le_bytes()],
        bump = market.bump,
    )]
    pub market: Box<Account<'info, Market>>,

    #[account(
        mut,
        seeds = [TokenInfo::SEED, &market_id.to_le_bytes(), &token_id.to_le_bytes()],
        bump = token.bump,
    )]
    pub token: Box<Account<'info, TokenInfo>>,

    /// Seller's ledger balance
    #[account(
        mut,
        seeds = [LedgerAccount::SEED, token.key().as_ref(), seller.key().as_ref()],
        bump = seller_balance.bump,
    )]
    pub seller_balance: Box<Account<'info, LedgerAccount>>,

    /// Receives the proceeds
    #[account(
        mut,
        constraint = recipient_collateral.mint == config.collateral_mint @ ErrorCode::InvalidConfiguration,
    )]
    pub recipient_collateral: Box<InterfaceAccount<'info, TokenAccount>>,

    pub reserve: ReserveAccounts<'info>,
}

impl<'info> SellTokens<'info> {
    /// Sell `amount` token units for at least `min_price` collateral
    pub fn sell_tokens(&mut self, amount: u128, min_price: u64) -> Result<CostBreakdown> {
        self.config.check_version()?;
        require!(!self.config.paused, ErrorCode::ProtocolPaused);
        let exchange = self.config.exchange_authority;

        let rate = self.reserve.observe_rate()?;
        let quote = apply_sell(
            &mut self.market,
            &mut self.token,
            &mut self.seller_balance,
            &exchange,
            rate,
            amount,
            min_price,
        )?;

        let paid = if quote.total > 0 {
            self.reserve
                .redeem_to(&exchange, &self.recipient_collateral, quote.total)?
        } else {
            0
        };
        check_payout(paid, min_price)?;

        emit!(TokensSold {
            market_id: self.market.id,
            token_id: self.token.id,
            seller: self.seller.key(),
            amount,
            raw_return: quote.raw,
            fee: quote.fee,
            proceeds: quote.total,
            paid,
            supply: self.token.supply,
            price: spot_price(&self.market, &self.token)?,
        });

        Ok(quote)
    }
}
