use anchor_lang::prelude::*;

use crate::constants::{LEDGER_SEED, PERIOD_SEED};
use crate::engine::{ExecutionContext, Lottery};
use crate::ledger::LedgerView;
use crate::state::{LotteryState, PeriodAccount};

/// Accounts required to close the open period and open the next one.
#[derive(Accounts)]
pub struct PrepareDraw<'info> {
    /// The lottery admin; pays for the new period record.
    #[account(mut)]
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [LEDGER_SEED],
        bump = lottery.bump
    )]
    pub lottery: Box<Account<'info, LotteryState>>,

    /// The period before the open one. Omitted while period 1 is open.
    #[account(
        seeds = [
            PERIOD_SEED,
            lottery.counters.current_period.saturating_sub(1).to_le_bytes().as_ref()
        ],
        bump
    )]
    pub previous_period: Option<Box<Account<'info, PeriodAccount>>>,

    #[account(
        seeds = [PERIOD_SEED, lottery.counters.current_period.to_le_bytes().as_ref()],
        bump = open_period.bump
    )]
    pub open_period: Box<Account<'info, PeriodAccount>>,

    #[account(
        init,
        payer = admin,
        space = PeriodAccount::space(0),
        seeds = [
            PERIOD_SEED,
            (lottery.counters.current_period + 1).to_le_bytes().as_ref()
        ],
        bump
    )]
    pub next_period: Box<Account<'info, PeriodAccount>>,

    pub system_program: Program<'info, System>,
}

pub fn process_prepare_draw(ctx: Context<PrepareDraw>) -> Result<()> {
    let clock = Clock::get()?;
    let exec = ExecutionContext::new(ctx.accounts.admin.key(), clock.slot);

    let mut view = LedgerView::load(&ctx.accounts.lottery)
        .with_period(ctx.accounts.open_period.period.clone());
    if let Some(previous) = &ctx.accounts.previous_period {
        view = view.with_period(previous.period.clone());
    }
    let opened = Lottery::new(&mut view).prepare_draw(&exec)?;
    msg!("Draw height: {}", opened.target_height);

    ctx.accounts.next_period.set_inner(PeriodAccount {
        bump: ctx.bumps.next_period,
        period: opened,
    });
    ctx.accounts.lottery.set_inner(view.state);
    Ok(())
}
