use anchor_lang::prelude::*;

use crate::constants::{LEDGER_SEED, PERIOD_SEED};
use crate::engine::{ExecutionContext, Lottery, LotteryStore, Sha256Rehash};
use crate::error::LotteryError;
use crate::ledger::LedgerView;
use crate::state::{LotteryState, PeriodAccount};
use crate::utils::SwitchboardOracle;

/// Accounts required to draw the most recently closed period.
///
/// Every ticket batch the draw visits is passed writable in the remaining
/// accounts. The draw is deterministic once the seed is revealed, so a
/// client finds them by replaying it.
#[derive(Accounts)]
#[instruction(level_counts: Vec<u32>)]
pub struct DrawPeriod<'info> {
    /// The lottery admin; pays for the winner list.
    #[account(mut)]
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [LEDGER_SEED],
        bump = lottery.bump
    )]
    pub lottery: Box<Account<'info, LotteryState>>,

    #[account(
        mut,
        seeds = [
            PERIOD_SEED,
            lottery.counters.current_period.saturating_sub(1).to_le_bytes().as_ref()
        ],
        bump = closed_period.bump,
        realloc = PeriodAccount::space(winner_total(&level_counts)),
        realloc::payer = admin,
        realloc::zero = false,
    )]
    pub closed_period: Box<Account<'info, PeriodAccount>>,

    #[account(
        seeds = [PERIOD_SEED, lottery.counters.current_period.to_le_bytes().as_ref()],
        bump = open_period.bump
    )]
    pub open_period: Box<Account<'info, PeriodAccount>>,

    /// The randomness account committed with `commit_randomness`.
    /// CHECK: Matched against the state and parsed by the oracle adapter.
    pub randomness_account_data: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

/// Draws the closed period with `level_counts[i]` winners of level `i + 1`.
pub fn process_draw(ctx: Context<DrawPeriod>, level_counts: Vec<u32>) -> Result<()> {
    let number = ctx.accounts.closed_period.period.number;
    require!(
        ctx.accounts.lottery.randomness_period == number,
        LotteryError::IncorrectRandomnessAccount
    );

    let clock = Clock::get()?;
    let exec = ExecutionContext::new(ctx.accounts.admin.key(), clock.slot);
    let randomness_account = ctx.accounts.randomness_account_data.to_account_info();
    let oracle = SwitchboardOracle {
        randomness_account: &randomness_account,
        committed: ctx.accounts.lottery.randomness_account,
        clock: &clock,
    };

    let mut view = LedgerView::load(&ctx.accounts.lottery)
        .with_period(ctx.accounts.closed_period.period.clone())
        .with_period(ctx.accounts.open_period.period.clone())
        .with_records(ctx.remaining_accounts)?;
    let outcome = Lottery::new(&mut view).draw(&exec, &level_counts, &oracle, &Sha256Rehash)?;
    view.store_batches(ctx.remaining_accounts)?;

    ctx.accounts.closed_period.period = view
        .period(number)
        .ok_or(LotteryError::PeriodNotFound)?;
    ctx.accounts.lottery.set_inner(view.state);
    msg!(
        "Period {} winners: {:?}",
        outcome.period,
        outcome.winning_ticket_ids
    );
    Ok(())
}

fn winner_total(level_counts: &[u32]) -> usize {
    level_counts
        .iter()
        .fold(0usize, |total, &count| total.saturating_add(count as usize))
}
