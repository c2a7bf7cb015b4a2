//! Token Creation
//!
//! Anyone may list a name in an active market once the market's verifier
//! accepts it. Each name can be listed once per market.

use anchor_lang::prelude::*;

use crate::consts::{CURRENT_VERSION, TOKEN_DECIMALS};
use crate::error::ErrorCode;
use crate::state::{name_seed, Config, Market, TokenInfo, TokenName};
use crate::verifier::VerifyName;

#[event]
pub struct TokenAdded {
    pub market_id: u64,
    pub token_id: u64,
    pub name: String,
    pub owner: Pubkey,
    pub decimals: u8,
}

#[derive(Accounts)]
#[instruction(market_id: u64, name: String)]
pub struct AddToken<'info> {
    /// Lister; becomes the token owner
    #[account(mut)]
    pub creator: Signer<'info>,

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
        init,
        payer = creator,
        space = 8 + TokenInfo::INIT_SPACE,
        seeds = [
            TokenInfo::SEED,
            &market_id.to_le_bytes(),
            &(market.token_count + 1).to_le_bytes(),
        ],
        bump,
    )]
    pub token: Box<Account<'info, TokenInfo>>,

    /// Name lookup; a non-zero id means the name is taken
    #[account(
        init_if_needed,
        payer = creator,
        space = 8 + TokenName::INIT_SPACE,
        seeds = [TokenName::SEED, &market_id.to_le_bytes(), &name_seed(&name)],
        bump,
    )]
    pub token_name: Box<Account<'info, TokenName>>,

    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> AddToken<'info> {
    pub fn add_token(&mut self, name: String, bumps: &AddTokenBumps) -> Result<()> {
        self.config.check_version()?;
        require!(!self.config.paused, ErrorCode::ProtocolPaused);
        self.market.ensure_tradable()?;
        require!(self.market.verifier.verify(&name), ErrorCode::InvalidName);
        require!(self.token_name.token_id == 0, ErrorCode::DuplicateName);

        let id = self.market.next_token_id()?;
        self.market.token_count = id;
        let market_id = self.market.id;

        self.token.set_inner(TokenInfo {
            version: CURRENT_VERSION,
            id,
            market_id,
            name: name.clone(),
            controller: self.config.exchange_authority,
            owner: self.creator.key(),
            supply: 0,
            dai_invested: 0,
            invested_shares: 0,
            created_at: Clock::get()?.unix_timestamp,
            bump: bumps.token,
        });
        self.token_name.set_inner(TokenName {
            market_id,
            token_id: id,
            bump: bumps.token_name,
        });

        emit!(TokenAdded {
            market_id,
            token_id: id,
            name,
            owner: self.creator.key(),
            decimals: TOKEN_DECIMALS,
        });

        Ok(())
    }
}
