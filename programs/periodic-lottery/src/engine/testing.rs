//! Fixtures shared by the engine unit tests.

use std::collections::HashMap;
use std::fmt::Debug;

use anchor_lang::prelude::*;

use super::{
    ExecutionContext, InitializeArgs, Lottery, MemoryStore, RandomnessOracle, SeedHasher,
    ValueTransfer,
};
use crate::error::LotteryError;

pub const PRICE: u64 = 10;
pub const MAXIMUM_BUY_AMOUNT: u64 = 100;
pub const DRAWING_LAG: u64 = 1;

/// Compares by error code; origins and compared values are ignored.
pub fn assert_lottery_error<T: Debug>(result: Result<T>, expected: LotteryError) {
    match result {
        Err(anchor_lang::error::Error::AnchorError(error)) => {
            assert_eq!(
                error.error_code_number,
                u32::from(expected),
                "expected {}, got {}",
                expected.name(),
                error.error_name
            );
        }
        other => panic!("expected {}, got {:?}", expected.name(), other),
    }
}

/// Token balances keyed by owner. Refuses transfers it cannot cover.
#[derive(Default)]
pub struct MockBank {
    pub balances: HashMap<Pubkey, u64>,
    pub received: u64,
}

impl MockBank {
    pub fn funded(owner: Pubkey, amount: u64) -> Self {
        let mut bank = Self::default();
        bank.balances.insert(owner, amount);
        bank
    }
}

impl ValueTransfer for MockBank {
    fn transfer_to_lottery(&mut self, from: &Pubkey, _symbol: &str, amount: u64) -> Result<()> {
        let balance = self.balances.entry(*from).or_default();
        if *balance < amount {
            return err!(LotteryError::InvalidAmount);
        }
        *balance -= amount;
        self.received += amount;
        Ok(())
    }
}

/// Returns the same seed for every height at or after `ready_at`.
pub struct FixedOracle {
    pub seed: [u8; 32],
    pub ready_at: u64,
}

impl FixedOracle {
    pub fn new(seed: [u8; 32]) -> Self {
        Self { seed, ready_at: 0 }
    }
}

impl RandomnessOracle for FixedOracle {
    fn random_seed(&self, height: u64) -> Result<[u8; 32]> {
        require!(height >= self.ready_at, LotteryError::RandomnessNotResolved);
        Ok(self.seed)
    }
}

/// Treats the first eight seed bytes as a counter and bumps it, so the
/// candidate sequence is `n + 1, n + 2, ...` for small pools.
pub struct StepHasher;

impl SeedHasher for StepHasher {
    fn rehash(&self, seed: &[u8; 32]) -> [u8; 32] {
        let next = seed_value(seed).wrapping_add(1);
        let mut out = *seed;
        out[..8].copy_from_slice(&next.to_le_bytes());
        out
    }
}

/// Never moves, so any collision is permanent.
pub struct StuckHasher;

impl SeedHasher for StuckHasher {
    fn rehash(&self, seed: &[u8; 32]) -> [u8; 32] {
        *seed
    }
}

pub fn seed_from(value: u64) -> [u8; 32] {
    let mut seed = [0u8; 32];
    seed[..8].copy_from_slice(&value.to_le_bytes());
    seed
}

fn seed_value(seed: &[u8; 32]) -> u64 {
    let mut head = [0u8; 8];
    head.copy_from_slice(&seed[..8]);
    u64::from_le_bytes(head)
}

pub struct Harness {
    pub store: MemoryStore,
    pub admin: Pubkey,
    pub height: u64,
}

impl Harness {
    /// Initialized at height 100 with price 10, maximum 100 and lag 1.
    pub fn new() -> Self {
        Self::with_maximum_buy_amount(MAXIMUM_BUY_AMOUNT)
    }

    pub fn with_maximum_buy_amount(maximum_buy_amount: u64) -> Self {
        let admin = Pubkey::new_unique();
        let mut store = MemoryStore::new();
        Lottery::new(&mut store)
            .initialize(
                &ExecutionContext::new(admin, 100),
                InitializeArgs {
                    token_symbol: "ELF".to_string(),
                    price: Some(PRICE),
                    drawing_lag: Some(DRAWING_LAG),
                    maximum_buy_amount: Some(maximum_buy_amount),
                },
            )
            .unwrap();
        Self {
            store,
            admin,
            height: 100,
        }
    }

    pub fn lottery(&mut self) -> Lottery<'_, MemoryStore> {
        Lottery::new(&mut self.store)
    }

    pub fn as_admin(&self) -> ExecutionContext {
        ExecutionContext::new(self.admin, self.height)
    }

    pub fn as_caller(&self, caller: Pubkey) -> ExecutionContext {
        ExecutionContext::new(caller, self.height)
    }

    pub fn advance(&mut self, blocks: u64) {
        self.height += blocks;
    }

    pub fn buy(&mut self, buyer: Pubkey, count: u64) -> super::BoughtTickets {
        let ctx = self.as_caller(buyer);
        let mut bank = MockBank::funded(buyer, PRICE * count);
        self.lottery().buy(&ctx, count, &mut bank).unwrap()
    }

    pub fn prepare(&mut self) {
        let ctx = self.as_admin();
        self.lottery().prepare_draw(&ctx).unwrap();
    }

    pub fn draw(&mut self, level_counts: &[u32], seed: u64) -> super::DrawOutcome {
        self.advance(DRAWING_LAG);
        let ctx = self.as_admin();
        self.lottery()
            .draw(
                &ctx,
                level_counts,
                &FixedOracle::new(seed_from(seed)),
                &StepHasher,
            )
            .unwrap()
    }
}
