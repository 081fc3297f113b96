use std::collections::BTreeSet;

use anchor_lang::prelude::*;
use solana_program::hash::hash;

use super::guard::{authorize, Capability};
use super::periods::ensure_drawable;
use super::{ExecutionContext, Lottery, LotteryStore, RandomnessOracle};
use crate::constants::{MAX_REHASH_ATTEMPTS, REHASH_ATTEMPTS_PER_TICKET};
use crate::error::LotteryError;
use crate::events::PeriodDrawn;
use crate::state::Counters;

/// Derives the next seed when a candidate collides with a ticket that has
/// already won.
pub trait SeedHasher {
    fn rehash(&self, seed: &[u8; 32]) -> [u8; 32];
}

/// SHA-256 of the previous seed.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha256Rehash;

impl SeedHasher for Sha256Rehash {
    fn rehash(&self, seed: &[u8; 32]) -> [u8; 32] {
        hash(seed).to_bytes()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawOutcome {
    pub period: u64,
    pub random_seed: [u8; 32],
    /// Winning tickets in draw order. The i-th id received the i-th entry
    /// of [`tier_sequence`].
    pub winning_ticket_ids: Vec<u64>,
}

/// Maps a seed onto a ticket id in `1..=pool_size`.
///
/// The first eight bytes are read as a little-endian `i64`; its absolute
/// value is reduced modulo the pool.
pub fn candidate_id(seed: &[u8; 32], pool_size: u64) -> u64 {
    let mut head = [0u8; 8];
    head.copy_from_slice(&seed[..8]);
    i64::from_le_bytes(head).unsigned_abs() % pool_size + 1
}

/// Flattens per-level counts into one level per winner: `[2, 0, 1]`
/// becomes `[1, 1, 3]`.
pub fn tier_sequence(level_counts: &[u32]) -> Vec<u32> {
    level_counts
        .iter()
        .zip(1u32..)
        .flat_map(|(&count, level)| std::iter::repeat(level).take(count as usize))
        .collect()
}

/// Rehashes allowed per winner. Grows with the pool so that drawing every
/// remaining ticket stays feasible.
pub fn rehash_limit(pool_size: u64) -> u64 {
    MAX_REHASH_ATTEMPTS.max(pool_size.saturating_mul(REHASH_ATTEMPTS_PER_TICKET))
}

/// Picks one untouched ticket per entry of `tiers` without writing
/// anything. A candidate is untouched if it has level 0 in the store and
/// was not picked earlier in this draw.
fn select_winners<S: LotteryStore, H: SeedHasher>(
    store: &S,
    seed: &[u8; 32],
    pool_size: u64,
    tiers: &[u32],
    hasher: &H,
) -> Result<Vec<(u64, u32)>> {
    let limit = rehash_limit(pool_size);
    let mut picked = BTreeSet::new();
    let mut winners = Vec::with_capacity(tiers.len());
    let mut cursor = *seed;

    for &level in tiers {
        let mut candidate = candidate_id(&cursor, pool_size);
        let mut attempts = 0u64;
        loop {
            let current = store
                .ticket_level(candidate)
                .ok_or(LotteryError::TicketNotFound)?;
            if current == 0 && !picked.contains(&candidate) {
                break;
            }
            attempts += 1;
            if attempts > limit {
                msg!(
                    "No untouched ticket after {} rehashes for winner {}",
                    limit,
                    winners.len() + 1
                );
                return err!(LotteryError::DrawIntegrity);
            }
            cursor = hasher.rehash(&cursor);
            candidate = candidate_id(&cursor, pool_size);
        }

        picked.insert(candidate);
        winners.push((candidate, level));
        cursor = hasher.rehash(&cursor);
    }

    Ok(winners)
}

impl<'a, S: LotteryStore> Lottery<'a, S> {
    /// Draws the most recently closed period.
    ///
    /// `level_counts[i]` winners receive level `i + 1`, assigned in draw
    /// order. Candidates range over every ticket sold before the open
    /// period; tickets that won in any earlier draw are skipped by
    /// rehashing the seed.
    pub fn draw<O: RandomnessOracle, H: SeedHasher>(
        &mut self,
        ctx: &ExecutionContext,
        level_counts: &[u32],
        oracle: &O,
        hasher: &H,
    ) -> Result<DrawOutcome> {
        let config = self.loaded_config()?;
        authorize(&ctx.caller, &config.admin, Capability::Draw)?;

        let counters = self.store.counters();
        let number = counters
            .current_period
            .checked_sub(1)
            .filter(|n| *n > 0)
            .ok_or(LotteryError::NotReady)?;
        ensure_drawable(&*self.store, number, ctx.height)?;

        let reward_total = level_counts
            .iter()
            .try_fold(0u64, |total, &count| total.checked_add(u64::from(count)))
            .ok_or(LotteryError::ArithmeticOverflow)?;
        require!(reward_total > 0, LotteryError::EmptyReward);

        let open = self.period_record(counters.current_period)?;
        let pool_size = open.start_ticket_id.saturating_sub(1);
        let untouched = pool_size.saturating_sub(counters.reward_count);
        if untouched < reward_total {
            msg!(
                "Too many rewards, lottery pool size: {}, requested: {}",
                untouched,
                reward_total
            );
            return err!(LotteryError::PoolExhausted);
        }

        let seed = oracle.random_seed(open.target_height)?;
        let tiers = tier_sequence(level_counts);
        let winners = select_winners(&*self.store, &seed, pool_size, &tiers, hasher)?;

        let mut period = self.period_record(number)?;
        let mut tickets = Vec::with_capacity(winners.len());
        for &(id, level) in &winners {
            let mut ticket = self
                .store
                .ticket(id)
                .ok_or(LotteryError::TicketNotFound)?;
            ticket.level = level;
            tickets.push(ticket);
        }
        let reward_count = counters
            .reward_count
            .checked_add(reward_total)
            .ok_or(LotteryError::ArithmeticOverflow)?;

        for ticket in tickets {
            self.store.put_ticket(ticket)?;
        }
        period.random_seed = Some(seed);
        period.winning_ticket_ids = winners.iter().map(|&(id, _)| id).collect();
        self.store.put_period(period.clone())?;
        self.store.set_counters(Counters {
            reward_count,
            ..counters
        });

        msg!(
            "Period {} drawn: {} winners out of a pool of {}",
            number,
            reward_total,
            pool_size
        );
        emit!(PeriodDrawn {
            period: number,
            random_seed: seed,
            winning_ticket_ids: period.winning_ticket_ids.clone(),
            reward_count,
        });

        Ok(DrawOutcome {
            period: number,
            random_seed: seed,
            winning_ticket_ids: period.winning_ticket_ids,
        })
    }
}
