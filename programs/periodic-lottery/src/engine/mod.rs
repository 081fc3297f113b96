//! Period and draw state engine.
//!
//! Everything here runs against a [`LotteryStore`] and a handful of
//! collaborator traits, so the same rules drive the on-chain records
//! (through [`crate::ledger::LedgerView`]) and the in-memory store used
//! off-chain and in tests. Every
//! operation checks all of its preconditions before the first write: a
//! rejected call leaves the store exactly as it found it.

use anchor_lang::prelude::*;

use crate::error::LotteryError;
use crate::state::{LotteryConfig, Period};

mod admin;
mod claim;
mod draw;
mod guard;
mod periods;
pub mod queries;
mod store;
mod tickets;

#[cfg(test)]
pub(crate) mod testing;

pub use admin::InitializeArgs;
pub use draw::{
    candidate_id, rehash_limit, tier_sequence, DrawOutcome, SeedHasher, Sha256Rehash,
};
pub use guard::{authorize, Authorized, Capability};
pub use periods::{
    can_draw, ensure_commit_window, ensure_drawable, period_status, PeriodStatus,
};
pub use store::{LotteryStore, MemoryStore};
pub use tickets::BoughtTickets;

/// Who is calling and at which ledger height, as vouched for by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExecutionContext {
    pub caller: Pubkey,
    pub height: u64,
}

impl ExecutionContext {
    pub fn new(caller: Pubkey, height: u64) -> Self {
        Self { caller, height }
    }
}

/// Moves ticket payments from a buyer into the lottery.
pub trait ValueTransfer {
    fn transfer_to_lottery(&mut self, from: &Pubkey, symbol: &str, amount: u64) -> Result<()>;
}

/// Source of unpredictable seeds. A seed for `height` must not be
/// obtainable before that height is final.
pub trait RandomnessOracle {
    fn random_seed(&self, height: u64) -> Result<[u8; 32]>;
}

/// Mutating entry point over a store. Queries that only read live in
/// [`queries`] and take the store by shared reference.
pub struct Lottery<'a, S: LotteryStore> {
    store: &'a mut S,
}

impl<'a, S: LotteryStore> Lottery<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    fn loaded_config(&self) -> Result<LotteryConfig> {
        self.store
            .config()
            .ok_or_else(|| error!(LotteryError::NotInitialized))
    }

    fn period_record(&self, number: u64) -> Result<Period> {
        self.store
            .period(number)
            .ok_or_else(|| error!(LotteryError::PeriodNotFound))
    }
}
