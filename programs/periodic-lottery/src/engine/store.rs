use std::collections::BTreeMap;

use anchor_lang::prelude::*;

use crate::state::{Counters, LotteryConfig, Period, Ticket, TicketRange};

/// Keyed storage behind the engine. Reads hand back owned copies and
/// writes replace whole records; the engine never needs a range scan
/// because ticket ids are dense.
pub trait LotteryStore {
    fn config(&self) -> Option<LotteryConfig>;

    fn set_config(&mut self, config: LotteryConfig);

    fn counters(&self) -> Counters;

    fn set_counters(&mut self, counters: Counters);

    fn ticket(&self, id: u64) -> Option<Ticket>;

    /// Level of a ticket without copying the rest of it. Called once per
    /// candidate in the draw loop.
    fn ticket_level(&self, id: u64) -> Option<u32> {
        self.ticket(id).map(|ticket| ticket.level)
    }

    /// Replaces an issued ticket.
    fn put_ticket(&mut self, ticket: Ticket) -> Result<()>;

    /// Issues the unassigned tickets `range` to `owner`.
    fn mint_tickets(
        &mut self,
        owner: &Pubkey,
        period: u64,
        range: TicketRange,
        purchase_height: u64,
    ) -> Result<()>;

    fn period(&self, number: u64) -> Option<Period>;

    fn put_period(&mut self, period: Period) -> Result<()>;

    /// Tickets `owner` bought in `period`, in purchase order.
    fn owner_tickets(&self, owner: &Pubkey, period: u64) -> Vec<u64>;

    fn append_owner_tickets(
        &mut self,
        owner: &Pubkey,
        period: u64,
        first_id: u64,
        count: u64,
    ) -> Result<()>;
}

/// Map-backed store for off-chain hosts and tests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    config: Option<LotteryConfig>,
    counters: Counters,
    tickets: BTreeMap<u64, Ticket>,
    periods: BTreeMap<u64, Period>,
    owners: BTreeMap<(Pubkey, u64), Vec<u64>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ticket_count(&self) -> usize {
        self.tickets.len()
    }

    pub fn tickets(&self) -> impl Iterator<Item = &Ticket> {
        self.tickets.values()
    }
}

impl LotteryStore for MemoryStore {
    fn config(&self) -> Option<LotteryConfig> {
        self.config.clone()
    }

    fn set_config(&mut self, config: LotteryConfig) {
        self.config = Some(config);
    }

    fn counters(&self) -> Counters {
        self.counters
    }

    fn set_counters(&mut self, counters: Counters) {
        self.counters = counters;
    }

    fn ticket(&self, id: u64) -> Option<Ticket> {
        self.tickets.get(&id).cloned()
    }

    fn ticket_level(&self, id: u64) -> Option<u32> {
        self.tickets.get(&id).map(|ticket| ticket.level)
    }

    fn put_ticket(&mut self, ticket: Ticket) -> Result<()> {
        self.tickets.insert(ticket.id, ticket);
        Ok(())
    }

    fn mint_tickets(
        &mut self,
        owner: &Pubkey,
        _period: u64,
        range: TicketRange,
        purchase_height: u64,
    ) -> Result<()> {
        for id in range.first_id..range.end() {
            self.tickets.insert(id, Ticket::new(id, *owner, purchase_height));
        }
        Ok(())
    }

    fn period(&self, number: u64) -> Option<Period> {
        self.periods.get(&number).cloned()
    }

    fn put_period(&mut self, period: Period) -> Result<()> {
        self.periods.insert(period.number, period);
        Ok(())
    }

    fn owner_tickets(&self, owner: &Pubkey, period: u64) -> Vec<u64> {
        self.owners
            .get(&(*owner, period))
            .cloned()
            .unwrap_or_default()
    }

    fn append_owner_tickets(
        &mut self,
        owner: &Pubkey,
        period: u64,
        first_id: u64,
        count: u64,
    ) -> Result<()> {
        self.owners
            .entry((*owner, period))
            .or_default()
            .extend(first_id..first_id + count);
        Ok(())
    }
}
