use std::collections::HashMap;
use std::fmt::Debug;

use anchor_lang::prelude::*;
use periodic_lottery::engine::{
    queries, ExecutionContext, InitializeArgs, Lottery, LotteryStore, MemoryStore,
    RandomnessOracle, Sha256Rehash, ValueTransfer,
};
use periodic_lottery::error::LotteryError;
use periodic_lottery::ledger::LedgerView;
use periodic_lottery::state::LotteryState;

const PRICE: u64 = 10;

#[derive(Default)]
struct Bank {
    balances: HashMap<Pubkey, u64>,
}

impl ValueTransfer for Bank {
    fn transfer_to_lottery(&mut self, from: &Pubkey, symbol: &str, amount: u64) -> Result<()> {
        assert_eq!(symbol, "ELF");
        let balance = self.balances.entry(*from).or_default();
        require!(*balance >= amount, LotteryError::InvalidAmount);
        *balance -= amount;
        Ok(())
    }
}

/// Seed derived from the height, available once that height is reached.
struct HeightOracle {
    finalized: u64,
}

impl RandomnessOracle for HeightOracle {
    fn random_seed(&self, height: u64) -> Result<[u8; 32]> {
        require!(height <= self.finalized, LotteryError::RandomnessNotResolved);
        Ok(solana_program::hash::hash(&height.to_le_bytes()).to_bytes())
    }
}

fn expect_error<T: Debug>(result: Result<T>, expected: LotteryError) {
    match result {
        Err(anchor_lang::error::Error::AnchorError(error)) => {
            assert_eq!(error.error_code_number, u32::from(expected))
        }
        other => panic!("expected {:?}, got {:?}", expected, other),
    }
}

fn initialize<S: LotteryStore>(store: &mut S, admin: Pubkey, height: u64) {
    Lottery::new(store)
        .initialize(
            &ExecutionContext::new(admin, height),
            InitializeArgs {
                token_symbol: "ELF".to_string(),
                price: Some(PRICE),
                drawing_lag: Some(1),
                maximum_buy_amount: Some(100),
            },
        )
        .unwrap();
}

fn single_period_scenario<S: LotteryStore>(store: &mut S) {
    let admin = Pubkey::new_unique();
    let alice = Pubkey::new_unique();
    let mut bank = Bank::default();
    bank.balances.insert(alice, PRICE * 10);

    initialize(store, admin, 1);

    let bought = Lottery::new(store)
        .buy(&ExecutionContext::new(alice, 2), 10, &mut bank)
        .unwrap();
    assert_eq!(bought.ids(), 1..11);
    assert_eq!(bank.balances[&alice], 0);

    let opened = Lottery::new(store)
        .prepare_draw(&ExecutionContext::new(admin, 3))
        .unwrap();
    assert_eq!(opened.number, 2);
    assert_eq!(opened.start_ticket_id, 11);
    assert_eq!(opened.target_height, 4);

    let oracle = HeightOracle { finalized: 4 };
    expect_error(
        Lottery::new(store).draw(
            &ExecutionContext::new(admin, 3),
            &[1, 1, 1],
            &oracle,
            &Sha256Rehash,
        ),
        LotteryError::NotReady,
    );

    let outcome = Lottery::new(store)
        .draw(
            &ExecutionContext::new(admin, 4),
            &[1, 1, 1],
            &oracle,
            &Sha256Rehash,
        )
        .unwrap();
    assert_eq!(outcome.period, 1);
    assert_eq!(outcome.winning_ticket_ids.len(), 3);
    for (index, id) in outcome.winning_ticket_ids.iter().enumerate() {
        assert!((1..=10).contains(id));
        assert_eq!(store.ticket(*id).unwrap().level, index as u32 + 1);
    }
    let winners = (1..=10)
        .filter(|id| store.ticket(*id).unwrap().is_winner())
        .count();
    assert_eq!(winners, 3);
    assert_eq!(store.counters().reward_count, 3);

    let result = queries::reward_result(&*store, 1, &alice).unwrap();
    assert_eq!(result.reward_tickets.len(), 3);
    assert_eq!(result.random_seed, oracle.random_seed(4).unwrap());
    let claimed = result.reward_tickets[0].id;

    let ctx = ExecutionContext::new(alice, 5);
    Lottery::new(store)
        .take_reward(&ctx, claimed, "hiahiahia".to_string())
        .unwrap();
    expect_error(
        Lottery::new(store).take_reward(&ctx, claimed, "again".to_string()),
        LotteryError::AlreadyClaimed,
    );
    assert_eq!(
        store.ticket(claimed).unwrap().registration.as_deref(),
        Some("hiahiahia")
    );
}

#[test]
fn test_single_period_in_memory() {
    let mut store = MemoryStore::new();
    single_period_scenario(&mut store);
}

#[test]
fn test_single_period_on_account_records() {
    let mut view = LedgerView::new(LotteryState::default());
    single_period_scenario(&mut view);
    assert_eq!(view.batches().len(), 1);
    assert_eq!(view.batch(1).unwrap().levels.len(), 10);
    assert!(view.period(1).unwrap().is_drawn());
    assert!(view.period(2).is_some());
    let claims = (1..=10).filter_map(|id| view.claim(id)).count();
    assert_eq!(claims, 1);
}

#[test]
fn test_pool_spans_periods_and_can_be_exhausted() {
    let mut ledger = LedgerView::new(LotteryState::default());
    let admin = Pubkey::new_unique();
    let alice = Pubkey::new_unique();
    let bob = Pubkey::new_unique();
    let mut bank = Bank::default();
    bank.balances.insert(alice, 1_000);
    bank.balances.insert(bob, 1_000);
    let oracle = HeightOracle { finalized: u64::MAX };

    initialize(&mut ledger, admin, 10);
    Lottery::new(&mut ledger)
        .buy(&ExecutionContext::new(alice, 10), 6, &mut bank)
        .unwrap();
    Lottery::new(&mut ledger)
        .prepare_draw(&ExecutionContext::new(admin, 10))
        .unwrap();
    let first = Lottery::new(&mut ledger)
        .draw(&ExecutionContext::new(admin, 11), &[2, 2], &oracle, &Sha256Rehash)
        .unwrap();
    let first_levels: Vec<_> = first
        .winning_ticket_ids
        .iter()
        .map(|id| (*id, ledger.ticket(*id).unwrap().level))
        .collect();

    Lottery::new(&mut ledger)
        .buy(&ExecutionContext::new(bob, 11), 4, &mut bank)
        .unwrap();
    Lottery::new(&mut ledger)
        .prepare_draw(&ExecutionContext::new(admin, 11))
        .unwrap();
    assert_eq!(queries::sales(&ledger, 1).unwrap(), 6);
    assert_eq!(queries::sales(&ledger, 2).unwrap(), 4);

    // Pool of 10 with 4 already won: 6 untouched tickets remain.
    expect_error(
        Lottery::new(&mut ledger).draw(
            &ExecutionContext::new(admin, 12),
            &[3, 4],
            &oracle,
            &Sha256Rehash,
        ),
        LotteryError::PoolExhausted,
    );
    let second = Lottery::new(&mut ledger)
        .draw(&ExecutionContext::new(admin, 12), &[3, 3], &oracle, &Sha256Rehash)
        .unwrap();

    for (id, level) in &first_levels {
        assert!(!second.winning_ticket_ids.contains(id));
        assert_eq!(ledger.ticket(*id).unwrap().level, *level);
    }
    assert!((1..=10).all(|id| ledger.ticket(id).unwrap().is_winner()));
    let counters = ledger.counters();
    assert_eq!(counters.reward_count, 10);
    assert_eq!(counters.reward_count, counters.tickets_issued());

    // Only the newly sold ticket is still untouched.
    Lottery::new(&mut ledger)
        .buy(&ExecutionContext::new(bob, 12), 1, &mut bank)
        .unwrap();
    Lottery::new(&mut ledger)
        .prepare_draw(&ExecutionContext::new(admin, 12))
        .unwrap();
    let third = Lottery::new(&mut ledger)
        .draw(&ExecutionContext::new(admin, 13), &[1], &oracle, &Sha256Rehash)
        .unwrap();
    assert_eq!(third.winning_ticket_ids, vec![11]);
}
