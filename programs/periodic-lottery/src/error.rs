use anchor_lang::prelude::*;

#[error_code]
pub enum LotteryError {
    #[msg("Lottery has not been initialized")]
    NotInitialized,
    #[msg("Lottery has already been initialized")]
    AlreadyInitialized,
    #[msg("Token symbol must be between 1 and 16 bytes")]
    InvalidSymbol,
    #[msg("Amount is out of the allowed range")]
    InvalidAmount,
    #[msg("Caller is not allowed to perform this action")]
    Unauthorized,
    #[msg("Operation called out of period order")]
    SequenceError,
    #[msg("No tickets were sold in the current period")]
    EmptyPeriod,
    #[msg("Draw must request at least one reward")]
    EmptyReward,
    #[msg("More rewards requested than untouched tickets in the pool")]
    PoolExhausted,
    #[msg("Ticket not found")]
    TicketNotFound,
    #[msg("Period not found")]
    PeriodNotFound,
    #[msg("Ticket did not win a reward")]
    NotAWinner,
    #[msg("Reward has already been claimed")]
    AlreadyClaimed,
    #[msg("Registration must be between 1 and 256 bytes")]
    InvalidRegistration,
    #[msg("Period is not ready to draw")]
    NotReady,
    #[msg("Winner selection exceeded the rehash limit")]
    DrawIntegrity,
    #[msg("Arithmetic overflow")]
    ArithmeticOverflow,
    #[msg("Randomness not yet resolved")]
    RandomnessNotResolved,
    #[msg("Randomness already revealed")]
    RandomnessAlreadyRevealed,
    #[msg("Incorrect randomness account")]
    IncorrectRandomnessAccount,
    #[msg("Randomness already committed for the pending period")]
    RandomnessAlreadyCommitted,
    #[msg("Account growth exceeds the per-instruction realloc limit")]
    AccountGrowthTooLarge,
    #[msg("Store write out of sequence")]
    StoreOutOfSequence,
}
