use anchor_lang::prelude::*;
use switchboard_on_demand::accounts::RandomnessAccountData;

use crate::constants::{LEDGER_SEED, PERIOD_SEED};
use crate::engine::{authorize, ensure_commit_window, queries, Capability};
use crate::error::LotteryError;
use crate::ledger::LedgerView;
use crate::state::{LotteryState, PeriodAccount};
use crate::utils::{check_fresh_seed, check_rebind};

/// Accounts required to commit a randomness account for the pending draw.
///
/// Ensures:
/// 1. Only the lottery admin can commit the randomness.
/// 2. A period is closed and waiting for its draw.
/// 3. The randomness account was seeded in the previous slot, no earlier
///    than the draw height, and has not been revealed yet.
/// 4. Randomness already bound to the pending period is replaced only
///    while it is still unrevealed.
#[derive(Accounts)]
pub struct CommitRandomness<'info> {
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [LEDGER_SEED],
        bump = lottery.bump
    )]
    pub lottery: Box<Account<'info, LotteryState>>,

    #[account(
        seeds = [
            PERIOD_SEED,
            lottery.counters.current_period.saturating_sub(1).to_le_bytes().as_ref()
        ],
        bump = pending_period.bump
    )]
    pub pending_period: Box<Account<'info, PeriodAccount>>,

    #[account(
        seeds = [PERIOD_SEED, lottery.counters.current_period.to_le_bytes().as_ref()],
        bump = open_period.bump
    )]
    pub open_period: Box<Account<'info, PeriodAccount>>,

    /// Randomness account from Switchboard.
    /// CHECK: The account's data is validated manually within the handler.
    pub randomness_account_data: UncheckedAccount<'info>,

    /// The randomness account currently bound to the lottery. Required to
    /// replace a commitment for the same period.
    /// CHECK: Matched against the state; only its reveal slot is read.
    #[account(address = lottery.randomness_account @ LotteryError::IncorrectRandomnessAccount)]
    pub bound_randomness: Option<UncheckedAccount<'info>>,
}

pub fn process_commit_randomness(ctx: Context<CommitRandomness>) -> Result<()> {
    let clock = Clock::get()?;
    let view = LedgerView::load(&ctx.accounts.lottery)
        .with_period(ctx.accounts.pending_period.period.clone())
        .with_period(ctx.accounts.open_period.period.clone());
    let config = queries::config(&view)?;
    authorize(
        &ctx.accounts.admin.key(),
        &config.admin,
        Capability::CommitRandomness,
    )?;

    let seed_slot = {
        let randomness_data =
            RandomnessAccountData::parse(ctx.accounts.randomness_account_data.data.borrow())
                .map_err(|_| LotteryError::RandomnessNotResolved)?;
        randomness_data.seed_slot
    };
    check_fresh_seed(seed_slot, clock.slot)?;
    let pending = ensure_commit_window(&view, seed_slot)?;

    let bound_reveal_slot = match &ctx.accounts.bound_randomness {
        Some(bound) => {
            let bound_data = RandomnessAccountData::parse(bound.data.borrow())
                .map_err(|_| LotteryError::IncorrectRandomnessAccount)?;
            Some(bound_data.reveal_slot)
        }
        None => None,
    };
    check_rebind(ctx.accounts.lottery.randomness_period, pending, bound_reveal_slot)?;

    let lottery = &mut ctx.accounts.lottery;
    lottery.randomness_account = ctx.accounts.randomness_account_data.key();
    lottery.randomness_period = pending;
    msg!(
        "Committed randomness account {} for period {}",
        lottery.randomness_account,
        pending
    );
    Ok(())
}
