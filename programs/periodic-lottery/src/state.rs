use anchor_lang::prelude::*;

use crate::constants::{
    CLAIM_SEED, LEDGER_SEED, MAX_REGISTRATION_LEN, MAX_SYMBOL_LEN, OWNER_SEED, PERIOD_SEED,
    TICKETS_SEED,
};
use crate::error::LotteryError;

/// Lottery parameters fixed at initialization and adjustable by the admin.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq, InitSpace)]
pub struct LotteryConfig {
    /// Symbol of the token tickets are paid in.
    #[max_len(MAX_SYMBOL_LEN)]
    pub token_symbol: String,

    /// The only identity allowed to prepare, draw and reset parameters.
    pub admin: Pubkey,

    /// Price of one ticket in the smallest token unit.
    pub price: u64,

    /// Height offset between closing a period and the height its draw seed
    /// is taken from.
    pub drawing_lag: u64,

    /// Exclusive upper bound on the ticket count of a single purchase.
    pub maximum_buy_amount: u64,
}

#[derive(
    AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace,
)]
pub struct Counters {
    /// Id the next minted ticket receives. Starts at 1.
    pub next_ticket_id: u64,

    /// Number of the period currently accepting purchases. Starts at 1.
    pub current_period: u64,

    /// Rewards assigned across every draw so far. Never decreases.
    pub reward_count: u64,
}

impl Counters {
    pub fn tickets_issued(&self) -> u64 {
        self.next_ticket_id.saturating_sub(1)
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Ticket {
    pub id: u64,
    pub owner: Pubkey,

    /// Prize tier. `0` until a draw picks this ticket, then fixed.
    pub level: u32,

    /// Ledger height at which the ticket was bought.
    pub purchase_height: u64,

    /// Registration information left by the owner when claiming.
    pub registration: Option<String>,
}

impl Ticket {
    pub fn new(id: u64, owner: Pubkey, purchase_height: u64) -> Self {
        Self {
            id,
            owner,
            level: 0,
            purchase_height,
            registration: None,
        }
    }

    pub fn is_winner(&self) -> bool {
        self.level > 0
    }

    pub fn is_claimed(&self) -> bool {
        self.registration.is_some()
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Period {
    pub number: u64,

    /// First ticket sold in this period. Everything below belongs to
    /// earlier periods.
    pub start_ticket_id: u64,

    /// Height recorded when the period opened. The draw of the period
    /// before it may run once this height is reached, and takes its seed
    /// from it.
    pub target_height: u64,

    /// Seed committed by the draw. `None` until the period is drawn.
    pub random_seed: Option<[u8; 32]>,

    /// Winning tickets in draw order.
    pub winning_ticket_ids: Vec<u64>,
}

impl Period {
    pub fn open(number: u64, start_ticket_id: u64, target_height: u64) -> Self {
        Self {
            number,
            start_ticket_id,
            target_height,
            random_seed: None,
            winning_ticket_ids: Vec::new(),
        }
    }

    pub fn is_drawn(&self) -> bool {
        self.random_seed.is_some()
    }

    /// Serialized size with room for `winners` winning ids.
    pub fn space(winners: usize) -> usize {
        8 + 8 + 8 + (1 + 32) + 4 + 8 * winners
    }
}

/// A contiguous run of ticket ids minted by one purchase.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TicketRange {
    pub first_id: u64,
    pub count: u64,
}

impl TicketRange {
    pub fn end(&self) -> u64 {
        self.first_id + self.count
    }
}

/// Configuration and counters. Every other record lives in its own PDA,
/// so this account never grows.
#[account]
#[derive(Debug, Default, InitSpace)]
pub struct LotteryState {
    /// The bump seed used for deriving the PDA address of this account.
    pub bump: u8,

    /// Mint tickets are paid in.
    pub payment_mint: Pubkey,

    /// Switchboard randomness account committed for the pending draw.
    pub randomness_account: Pubkey,

    /// Period the committed randomness account is bound to. `0` if none.
    pub randomness_period: u64,

    /// `None` until the lottery is initialized.
    pub config: Option<LotteryConfig>,

    pub counters: Counters,
}

impl LotteryState {
    pub const SEED_PREFIX: &'static [u8] = LEDGER_SEED;
}

/// One period, at `[PERIOD_SEED, number]`.
#[account]
#[derive(Debug, Default)]
pub struct PeriodAccount {
    pub bump: u8,
    pub period: Period,
}

impl PeriodAccount {
    pub const SEED_PREFIX: &'static [u8] = PERIOD_SEED;

    /// Account size, discriminator included.
    pub fn space(winners: usize) -> usize {
        8 + 1 + Period::space(winners)
    }
}

/// The tickets minted by one purchase, at `[TICKETS_SEED, first_id]`.
/// Ticket `first_id + i` has level `levels[i]`.
#[account]
#[derive(Debug, Default)]
pub struct TicketBatch {
    pub bump: u8,
    pub owner: Pubkey,
    pub period: u64,
    pub first_id: u64,
    pub purchase_height: u64,
    pub levels: Vec<u32>,
}

impl TicketBatch {
    pub const SEED_PREFIX: &'static [u8] = TICKETS_SEED;

    pub fn space(count: usize) -> usize {
        8 + 1 + 32 + 8 + 8 + 8 + 4 + 4 * count
    }

    pub fn range(&self) -> TicketRange {
        TicketRange {
            first_id: self.first_id,
            count: self.levels.len() as u64,
        }
    }

    pub fn contains(&self, id: u64) -> bool {
        self.offset(id).is_some()
    }

    pub fn level(&self, id: u64) -> Option<u32> {
        self.offset(id).map(|offset| self.levels[offset])
    }

    pub fn set_level(&mut self, id: u64, level: u32) -> Result<()> {
        let offset = self.offset(id).ok_or(LotteryError::TicketNotFound)?;
        self.levels[offset] = level;
        Ok(())
    }

    pub fn ticket(&self, id: u64, registration: Option<String>) -> Option<Ticket> {
        let level = self.level(id)?;
        Some(Ticket {
            id,
            owner: self.owner,
            level,
            purchase_height: self.purchase_height,
            registration,
        })
    }

    fn offset(&self, id: u64) -> Option<usize> {
        let offset = usize::try_from(id.checked_sub(self.first_id)?).ok()?;
        (offset < self.levels.len()).then_some(offset)
    }
}

/// Advisory index of the tickets an owner bought in one period, at
/// `[OWNER_SEED, owner, period]`.
#[account]
#[derive(Debug, Default)]
pub struct OwnerTickets {
    pub bump: u8,
    pub owner: Pubkey,
    pub period: u64,
    pub ranges: Vec<TicketRange>,
}

impl OwnerTickets {
    pub const SEED_PREFIX: &'static [u8] = OWNER_SEED;

    pub fn space(ranges: usize) -> usize {
        8 + 1 + 32 + 8 + 4 + 16 * ranges
    }

    /// An index created by `init_if_needed` that holds nothing yet.
    pub fn is_fresh(&self) -> bool {
        self.period == 0
    }

    pub fn append(&mut self, first_id: u64, count: u64) {
        match self.ranges.last_mut() {
            // Back-to-back purchases by the same owner merge into one run.
            Some(last) if last.end() == first_id => last.count += count,
            _ => self.ranges.push(TicketRange { first_id, count }),
        }
    }

    pub fn ids(&self) -> Vec<u64> {
        self.ranges
            .iter()
            .flat_map(|range| range.first_id..range.end())
            .collect()
    }
}

/// Registration information of a claimed ticket, at `[CLAIM_SEED, id]`.
#[account]
#[derive(Debug, Default, InitSpace)]
pub struct RewardClaim {
    pub bump: u8,
    pub ticket_id: u64,
    pub owner: Pubkey,
    #[max_len(MAX_REGISTRATION_LEN)]
    pub registration: String,
}

impl RewardClaim {
    pub const SEED_PREFIX: &'static [u8] = CLAIM_SEED;

    /// A claim account created by `init_if_needed` that holds nothing yet.
    pub fn is_fresh(&self) -> bool {
        self.ticket_id == 0
    }
}
