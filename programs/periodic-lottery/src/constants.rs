use anchor_lang::prelude::*;

/// PDA seed of the lottery state account.
#[constant]
pub const LEDGER_SEED: &[u8] = b"lottery";

/// PDA seed of the token vault that receives ticket payments.
#[constant]
pub const VAULT_SEED: &[u8] = b"vault";

/// PDA seed of a period record, followed by the period number.
#[constant]
pub const PERIOD_SEED: &[u8] = b"period";

/// PDA seed of a ticket batch, followed by its first ticket id.
#[constant]
pub const TICKETS_SEED: &[u8] = b"tickets";

/// PDA seed of an owner index, followed by owner and period number.
#[constant]
pub const OWNER_SEED: &[u8] = b"owner";

/// PDA seed of a reward claim, followed by the ticket id.
#[constant]
pub const CLAIM_SEED: &[u8] = b"claim";

/// Ticket price used when initialization leaves it unset, in the
/// smallest unit of the payment token.
pub const DEFAULT_PRICE: u64 = 1_000_000_000;

/// Slots between closing a period and the height its draw may use.
pub const DEFAULT_DRAWING_LAG: u64 = 64;

/// Exclusive upper bound on tickets per purchase.
pub const DEFAULT_MAXIMUM_BUY_AMOUNT: u64 = 100;

/// Largest maximum buy amount the program accepts. One purchase becomes
/// one batch account, which must fit a single account creation.
pub const MAX_TICKETS_PER_PURCHASE: u64 = 2_000;

pub const MAX_SYMBOL_LEN: usize = 16;

pub const MAX_REGISTRATION_LEN: usize = 256;

/// Floor of the per-winner rehash budget.
pub const MAX_REHASH_ATTEMPTS: u64 = 10_000;

/// Per-winner rehash budget per ticket in the pool. Finding the last
/// untouched ticket of a pool of `n` takes about `n` rehashes.
pub const REHASH_ATTEMPTS_PER_TICKET: u64 = 64;
