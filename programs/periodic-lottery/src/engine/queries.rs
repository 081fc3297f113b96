//! Read-only views over a store.

use anchor_lang::prelude::*;

use super::LotteryStore;
use crate::error::LotteryError;
use crate::state::{LotteryConfig, Period, Ticket};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct RewardTicket {
    pub id: u64,
    pub level: u32,
    pub registration: Option<String>,
}

/// An owner's winnings in one drawn period.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct RewardResult {
    pub period: u64,
    pub random_seed: [u8; 32],
    /// The owner's winning tickets, in draw order.
    pub reward_tickets: Vec<RewardTicket>,
}

pub fn config<S: LotteryStore>(store: &S) -> Result<LotteryConfig> {
    store
        .config()
        .ok_or_else(|| error!(LotteryError::NotInitialized))
}

pub fn current_period_number<S: LotteryStore>(store: &S) -> Result<u64> {
    config(store)?;
    Ok(store.counters().current_period)
}

pub fn period<S: LotteryStore>(store: &S, number: u64) -> Result<Period> {
    config(store)?;
    store
        .period(number)
        .ok_or_else(|| error!(LotteryError::PeriodNotFound))
}

pub fn ticket<S: LotteryStore>(store: &S, id: u64) -> Result<Ticket> {
    config(store)?;
    store
        .ticket(id)
        .ok_or_else(|| error!(LotteryError::TicketNotFound))
}

/// Tickets sold during `number`. The open period counts up to the next
/// ticket id; a closed one up to its successor's first ticket.
pub fn sales<S: LotteryStore>(store: &S, number: u64) -> Result<u64> {
    let start = period(store, number)?.start_ticket_id;
    let counters = store.counters();
    let end = if number == counters.current_period {
        counters.next_ticket_id
    } else {
        period(store, number + 1)?.start_ticket_id
    };
    Ok(end - start)
}

pub fn bought_tickets<S: LotteryStore>(store: &S, owner: &Pubkey, number: u64) -> Result<Vec<u64>> {
    period(store, number)?;
    Ok(store.owner_tickets(owner, number))
}

pub fn reward_result<S: LotteryStore>(store: &S, number: u64, owner: &Pubkey) -> Result<RewardResult> {
    let drawn = period(store, number)?;
    let random_seed = drawn.random_seed.ok_or(LotteryError::NotReady)?;

    let mut reward_tickets = Vec::new();
    for id in drawn.winning_ticket_ids {
        let winner = ticket(store, id)?;
        if winner.owner == *owner {
            reward_tickets.push(RewardTicket {
                id,
                level: winner.level,
                registration: winner.registration,
            });
        }
    }

    Ok(RewardResult {
        period: number,
        random_seed,
        reward_tickets,
    })
}
