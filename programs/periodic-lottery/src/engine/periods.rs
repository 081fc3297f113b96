use anchor_lang::prelude::*;

use super::guard::{authorize, Capability};
use super::{ExecutionContext, Lottery, LotteryStore};
use crate::error::LotteryError;
use crate::events::PeriodPrepared;
use crate::state::{Counters, Period};

/// Where a period stands in its lifecycle.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeriodStatus {
    /// Accepting purchases; cannot be closed yet.
    Open,
    /// Accepting purchases and the admin may close it.
    ReadyToClose,
    /// Pool closed, waiting for its draw.
    ClosedPendingDraw,
    Drawn,
}

pub fn period_status<S: LotteryStore>(store: &S, number: u64) -> Result<PeriodStatus> {
    let counters = store.counters();
    let period = store
        .period(number)
        .ok_or(LotteryError::PeriodNotFound)?;

    if period.is_drawn() {
        return Ok(PeriodStatus::Drawn);
    }
    if number < counters.current_period {
        return Ok(PeriodStatus::ClosedPendingDraw);
    }
    let previous_drawn = match number.checked_sub(1).filter(|n| *n > 0) {
        Some(previous) => store.period(previous).map_or(false, |p| p.is_drawn()),
        None => true,
    };
    if previous_drawn && counters.next_ticket_id > period.start_ticket_id {
        Ok(PeriodStatus::ReadyToClose)
    } else {
        Ok(PeriodStatus::Open)
    }
}

/// Checks that `number` is the most recently closed period, is not drawn
/// yet, and that `height` has reached the height recorded when it closed.
pub fn ensure_drawable<S: LotteryStore>(store: &S, number: u64, height: u64) -> Result<()> {
    let Counters { current_period, .. } = store.counters();
    require!(current_period > 1, LotteryError::NotReady);
    require!(number == current_period - 1, LotteryError::SequenceError);

    let period = store
        .period(number)
        .ok_or(LotteryError::PeriodNotFound)?;
    if period.is_drawn() {
        msg!("Period {} already drawn", number);
        return err!(LotteryError::NotReady);
    }

    let successor = store
        .period(current_period)
        .ok_or(LotteryError::PeriodNotFound)?;
    if height < successor.target_height {
        msg!(
            "Current height {} below draw height {}",
            height,
            successor.target_height
        );
        return err!(LotteryError::NotReady);
    }
    Ok(())
}

/// Period a randomness commitment seeded at `seed_slot` would serve. The
/// period must be closed and waiting for its draw, and the seed must not
/// predate its draw height.
pub fn ensure_commit_window<S: LotteryStore>(store: &S, seed_slot: u64) -> Result<u64> {
    let current = store.counters().current_period;
    require!(current > 1, LotteryError::NotReady);
    let pending = current - 1;
    if period_status(store, pending)? != PeriodStatus::ClosedPendingDraw {
        msg!("Period {} is not waiting for a draw", pending);
        return err!(LotteryError::NotReady);
    }

    let open = store
        .period(current)
        .ok_or(LotteryError::PeriodNotFound)?;
    if seed_slot < open.target_height {
        msg!(
            "Seed slot {} below draw height {}",
            seed_slot,
            open.target_height
        );
        return err!(LotteryError::NotReady);
    }
    Ok(pending)
}

pub fn can_draw<S: LotteryStore>(store: &S, number: u64, height: u64) -> bool {
    ensure_drawable(store, number, height).is_ok()
}

impl<'a, S: LotteryStore> Lottery<'a, S> {
    /// Closes the open period's ticket pool and opens the next period.
    /// The closed period is drawn separately once the new period's target
    /// height is reached.
    pub fn prepare_draw(&mut self, ctx: &ExecutionContext) -> Result<Period> {
        let config = self.loaded_config()?;
        authorize(&ctx.caller, &config.admin, Capability::PrepareDraw)?;

        let counters = self.store.counters();
        let current = counters.current_period;
        if current > 1 && !self.period_record(current - 1)?.is_drawn() {
            msg!("Period {} hasn't been drawn", current - 1);
            return err!(LotteryError::SequenceError);
        }

        let open = self.period_record(current)?;
        require!(
            counters.next_ticket_id > open.start_ticket_id,
            LotteryError::EmptyPeriod
        );

        let number = current
            .checked_add(1)
            .ok_or(LotteryError::ArithmeticOverflow)?;
        let target_height = ctx
            .height
            .checked_add(config.drawing_lag)
            .ok_or(LotteryError::ArithmeticOverflow)?;
        let next = Period::open(number, counters.next_ticket_id, target_height);

        self.store.put_period(next.clone())?;
        self.store.set_counters(Counters {
            current_period: number,
            ..counters
        });

        msg!(
            "Period {} closed with tickets {}..{}, period {} open until draw height {}",
            current,
            open.start_ticket_id,
            next.start_ticket_id,
            number,
            target_height
        );
        emit!(PeriodPrepared {
            closed_period: current,
            opened_period: number,
            start_ticket_id: next.start_ticket_id,
            target_height,
        });
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::*;

    #[test]
    fn test_prepare_opens_next_period() {
        let mut harness = Harness::new();
        harness.buy(Pubkey::new_unique(), 10);
        let ctx = harness.as_admin();

        let next = harness.lottery().prepare_draw(&ctx).unwrap();

        assert_eq!(next.number, 2);
        assert_eq!(next.start_ticket_id, 11);
        assert_eq!(next.target_height, harness.height + DRAWING_LAG);
        assert!(!next.is_drawn());
        assert_eq!(harness.store.counters().current_period, 2);
        assert_eq!(harness.store.period(2), Some(next));
        assert_eq!(
            period_status(&harness.store, 1).unwrap(),
            PeriodStatus::ClosedPendingDraw
        );
        assert_eq!(
            period_status(&harness.store, 2).unwrap(),
            PeriodStatus::Open
        );
    }

    #[test]
    fn test_prepare_requires_admin() {
        let mut harness = Harness::new();
        let buyer = Pubkey::new_unique();
        harness.buy(buyer, 2);
        let ctx = harness.as_caller(buyer);

        assert_lottery_error(
            harness.lottery().prepare_draw(&ctx),
            LotteryError::Unauthorized,
        );
        assert_eq!(harness.store.counters().current_period, 1);
    }

    #[test]
    fn test_prepare_rejects_empty_period() {
        let mut harness = Harness::new();
        let ctx = harness.as_admin();
        let snapshot = harness.store.clone();

        assert_lottery_error(
            harness.lottery().prepare_draw(&ctx),
            LotteryError::EmptyPeriod,
        );
        assert_eq!(harness.store, snapshot);
    }

    #[test]
    fn test_prepare_twice_without_draw_is_out_of_sequence() {
        let mut harness = Harness::new();
        harness.buy(Pubkey::new_unique(), 4);
        harness.prepare();
        harness.buy(Pubkey::new_unique(), 4);
        let ctx = harness.as_admin();
        let snapshot = harness.store.clone();

        assert_lottery_error(
            harness.lottery().prepare_draw(&ctx),
            LotteryError::SequenceError,
        );
        assert_eq!(harness.store, snapshot);

        harness.draw(&[1], 0);
        harness.prepare();
        assert_eq!(harness.store.counters().current_period, 3);
    }

    #[test]
    fn test_status_follows_lifecycle() {
        let mut harness = Harness::new();
        assert_eq!(
            period_status(&harness.store, 1).unwrap(),
            PeriodStatus::Open
        );

        harness.buy(Pubkey::new_unique(), 3);
        assert_eq!(
            period_status(&harness.store, 1).unwrap(),
            PeriodStatus::ReadyToClose
        );

        harness.prepare();
        harness.buy(Pubkey::new_unique(), 3);
        // Period 2 has sales but cannot close before period 1 is drawn.
        assert_eq!(
            period_status(&harness.store, 2).unwrap(),
            PeriodStatus::Open
        );

        harness.draw(&[2], 0);
        assert_eq!(
            period_status(&harness.store, 1).unwrap(),
            PeriodStatus::Drawn
        );
        assert_eq!(
            period_status(&harness.store, 2).unwrap(),
            PeriodStatus::ReadyToClose
        );
        assert_lottery_error(
            period_status(&harness.store, 3),
            LotteryError::PeriodNotFound,
        );
    }

    #[test]
    fn test_can_draw_waits_for_target_height() {
        let mut harness = Harness::new();
        harness.buy(Pubkey::new_unique(), 3);
        assert!(!can_draw(&harness.store, 1, harness.height + 10));

        harness.prepare();
        let target = harness.store.period(2).unwrap().target_height;

        assert!(!can_draw(&harness.store, 1, target - 1));
        assert!(can_draw(&harness.store, 1, target));
        assert!(!can_draw(&harness.store, 2, target));
        assert_lottery_error(
            ensure_drawable(&harness.store, 1, target - 1),
            LotteryError::NotReady,
        );
        assert_lottery_error(
            ensure_drawable(&harness.store, 2, target),
            LotteryError::SequenceError,
        );

        harness.draw(&[1], 0);
        assert!(!can_draw(&harness.store, 1, target + 100));
    }

    #[test]
    fn test_commit_window_follows_the_pending_draw() {
        let mut harness = Harness::new();
        harness.buy(Pubkey::new_unique(), 3);
        assert_lottery_error(
            ensure_commit_window(&harness.store, harness.height),
            LotteryError::NotReady,
        );

        harness.prepare();
        let draw_height = harness.height + DRAWING_LAG;
        assert_lottery_error(
            ensure_commit_window(&harness.store, draw_height - 1),
            LotteryError::NotReady,
        );
        assert_eq!(ensure_commit_window(&harness.store, draw_height).unwrap(), 1);
        assert_eq!(
            ensure_commit_window(&harness.store, draw_height + 50).unwrap(),
            1
        );

        harness.draw(&[1], 0);
        assert_lottery_error(
            ensure_commit_window(&harness.store, harness.height),
            LotteryError::NotReady,
        );
    }
}
