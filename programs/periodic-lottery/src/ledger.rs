//! Store over the records one instruction loads.
//!
//! Tickets, periods, owner indexes and claims each live in their own PDA.
//! A handler copies the records it was given into a [`LedgerView`], runs
//! the engine against it, and writes the touched records back. A lookup
//! of a record that was not supplied behaves like a missing record.

use anchor_lang::prelude::*;
use anchor_lang::Discriminator;

use crate::engine::LotteryStore;
use crate::error::LotteryError;
use crate::state::{
    Counters, LotteryConfig, LotteryState, OwnerTickets, Period, PeriodAccount, RewardClaim,
    Ticket, TicketBatch, TicketRange,
};

#[derive(Clone, Debug, Default)]
pub struct LedgerView {
    pub state: LotteryState,
    periods: Vec<Period>,
    batches: Vec<TicketBatch>,
    owner_index: Vec<OwnerTickets>,
    claims: Vec<RewardClaim>,
}

impl LedgerView {
    pub fn new(state: LotteryState) -> Self {
        Self {
            state,
            ..Default::default()
        }
    }

    /// A view over a copy of the state account and nothing else.
    pub fn load(state: &LotteryState) -> Self {
        Self::new(state.clone())
    }

    pub fn with_period(mut self, period: Period) -> Self {
        self.upsert_period(period);
        self
    }

    pub fn with_batch(mut self, batch: TicketBatch) -> Self {
        self.batches.push(batch);
        self
    }

    /// Adds an owner index unless it is still blank.
    pub fn with_owner_tickets(mut self, index: OwnerTickets) -> Self {
        if !index.is_fresh() {
            self.owner_index.push(index);
        }
        self
    }

    /// Adds a claim unless it is still blank.
    pub fn with_claim(mut self, claim: RewardClaim) -> Self {
        if !claim.is_fresh() {
            self.claims.push(claim);
        }
        self
    }

    /// Adds every lottery record among `accounts`, recognized by owner and
    /// discriminator. Other accounts are skipped.
    pub fn with_records(mut self, accounts: &[AccountInfo]) -> Result<Self> {
        for info in accounts {
            if info.owner != &crate::ID {
                continue;
            }
            let data = info.try_borrow_data()?;
            if data.len() < 8 {
                continue;
            }
            let mut bytes: &[u8] = &data;
            let discriminator = &data[..8];
            if discriminator == PeriodAccount::DISCRIMINATOR {
                let record = PeriodAccount::try_deserialize(&mut bytes)?;
                self = self.with_period(record.period);
            } else if discriminator == TicketBatch::DISCRIMINATOR {
                self = self.with_batch(TicketBatch::try_deserialize(&mut bytes)?);
            } else if discriminator == OwnerTickets::DISCRIMINATOR {
                self = self.with_owner_tickets(OwnerTickets::try_deserialize(&mut bytes)?);
            } else if discriminator == RewardClaim::DISCRIMINATOR {
                self = self.with_claim(RewardClaim::try_deserialize(&mut bytes)?);
            }
        }
        Ok(self)
    }

    /// Writes changed ticket levels back into the batch accounts among
    /// `accounts`.
    pub fn store_batches(&self, accounts: &[AccountInfo]) -> Result<()> {
        for info in accounts {
            if info.owner != &crate::ID {
                continue;
            }
            let stored = {
                let data = info.try_borrow_data()?;
                if data.len() < 8 || data[..8] != TicketBatch::DISCRIMINATOR {
                    continue;
                }
                TicketBatch::try_deserialize(&mut &data[..])?
            };
            let Some(updated) = self.batch(stored.first_id) else {
                continue;
            };
            if updated.levels == stored.levels {
                continue;
            }

            require!(info.is_writable, LotteryError::StoreOutOfSequence);
            let mut data = info.try_borrow_mut_data()?;
            let mut writer: &mut [u8] = &mut data[..];
            updated.try_serialize(&mut writer)?;
        }
        Ok(())
    }

    pub fn batch(&self, first_id: u64) -> Option<&TicketBatch> {
        self.batches
            .iter()
            .find(|batch| batch.first_id == first_id)
    }

    pub fn batches(&self) -> &[TicketBatch] {
        &self.batches
    }

    pub fn owner_index(&self, owner: &Pubkey, period: u64) -> Option<&OwnerTickets> {
        self.owner_index
            .iter()
            .find(|index| index.owner == *owner && index.period == period)
    }

    pub fn claim(&self, ticket_id: u64) -> Option<&RewardClaim> {
        self.claims
            .iter()
            .find(|claim| claim.ticket_id == ticket_id)
    }

    fn batch_of(&self, id: u64) -> Option<&TicketBatch> {
        self.batches.iter().find(|batch| batch.contains(id))
    }

    fn upsert_period(&mut self, period: Period) {
        match self
            .periods
            .iter_mut()
            .find(|stored| stored.number == period.number)
        {
            Some(stored) => *stored = period,
            None => self.periods.push(period),
        }
    }
}

impl LotteryStore for LedgerView {
    fn config(&self) -> Option<LotteryConfig> {
        self.state.config.clone()
    }

    fn set_config(&mut self, config: LotteryConfig) {
        self.state.config = Some(config);
    }

    fn counters(&self) -> Counters {
        self.state.counters
    }

    fn set_counters(&mut self, counters: Counters) {
        self.state.counters = counters;
    }

    fn ticket(&self, id: u64) -> Option<Ticket> {
        let registration = self.claim(id).map(|claim| claim.registration.clone());
        self.batch_of(id)?.ticket(id, registration)
    }

    fn ticket_level(&self, id: u64) -> Option<u32> {
        let level = self.batch_of(id).and_then(|batch| batch.level(id));
        if level.is_none() {
            msg!("Ticket {} is not among the supplied batches", id);
        }
        level
    }

    fn put_ticket(&mut self, ticket: Ticket) -> Result<()> {
        let batch = self
            .batches
            .iter_mut()
            .find(|batch| batch.contains(ticket.id))
            .ok_or(LotteryError::StoreOutOfSequence)?;
        require_keys_eq!(batch.owner, ticket.owner, LotteryError::StoreOutOfSequence);
        batch.set_level(ticket.id, ticket.level)?;

        if let Some(registration) = ticket.registration {
            match self
                .claims
                .iter_mut()
                .find(|claim| claim.ticket_id == ticket.id)
            {
                Some(claim) => claim.registration = registration,
                None => self.claims.push(RewardClaim {
                    bump: 0,
                    ticket_id: ticket.id,
                    owner: ticket.owner,
                    registration,
                }),
            }
        }
        Ok(())
    }

    fn mint_tickets(
        &mut self,
        owner: &Pubkey,
        period: u64,
        range: TicketRange,
        purchase_height: u64,
    ) -> Result<()> {
        let overlaps = self.batches.iter().any(|batch| {
            batch.first_id < range.end() && range.first_id < batch.range().end()
        });
        require!(!overlaps, LotteryError::StoreOutOfSequence);

        let count = usize::try_from(range.count).map_err(|_| LotteryError::ArithmeticOverflow)?;
        self.batches.push(TicketBatch {
            bump: 0,
            owner: *owner,
            period,
            first_id: range.first_id,
            purchase_height,
            levels: vec![0; count],
        });
        Ok(())
    }

    fn period(&self, number: u64) -> Option<Period> {
        self.periods
            .iter()
            .find(|period| period.number == number)
            .cloned()
    }

    fn put_period(&mut self, period: Period) -> Result<()> {
        require!(period.number > 0, LotteryError::StoreOutOfSequence);
        self.upsert_period(period);
        Ok(())
    }

    fn owner_tickets(&self, owner: &Pubkey, period: u64) -> Vec<u64> {
        self.owner_index(owner, period)
            .map(OwnerTickets::ids)
            .unwrap_or_default()
    }

    fn append_owner_tickets(
        &mut self,
        owner: &Pubkey,
        period: u64,
        first_id: u64,
        count: u64,
    ) -> Result<()> {
        match self
            .owner_index
            .iter_mut()
            .find(|index| index.owner == *owner && index.period == period)
        {
            Some(index) => index.append(first_id, count),
            None => self.owner_index.push(OwnerTickets {
                bump: 0,
                owner: *owner,
                period,
                ranges: vec![TicketRange { first_id, count }],
            }),
        }
        Ok(())
    }
}
