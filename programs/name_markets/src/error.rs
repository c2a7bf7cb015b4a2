use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    #[msg("Amount must be non-zero and refer to a known market or token")]
    InvalidAmount,
    #[msg("Caller lacks the required role")]
    Unauthorized,
    #[msg("Execution price is outside the caller's bound")]
    SlippageExceeded,
    #[msg("Balance cannot cover the requested movement")]
    InsufficientBalance,
    #[msg("Requested amount exceeds the unredeemed donated interest")]
    InsufficientDonated,
    #[msg("Fee rate or configuration value out of bounds")]
    InvalidConfiguration,
    #[msg("Yield strategy call failed")]
    ExternalStrategyFailure,
    #[msg("Arithmetic overflow")]
    MathOverflow,
    #[msg("Name rejected by the market's verifier")]
    InvalidName,
    #[msg("Name is already registered")]
    DuplicateName,
    #[msg("Market is not active")]
    MarketInactive,
    #[msg("Protocol is paused")]
    ProtocolPaused,
    #[msg("Spell eta is earlier than the minimum delay allows")]
    EtaTooEarly,
    #[msg("Spell was not scheduled with these parameters")]
    SpellNotScheduled,
    #[msg("Spell eta has not been reached")]
    SpellNotReady,
    #[msg("Spell has already been executed")]
    SpellAlreadyExecuted,
}
