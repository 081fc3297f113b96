use anchor_lang::prelude::*;

use crate::constants::LEDGER_SEED;
use crate::engine::queries::{self, RewardResult};
use crate::engine::{period_status, PeriodStatus};
use crate::ledger::LedgerView;
use crate::state::{LotteryConfig, LotteryState, Period, Ticket};

/// Read-only access for the view instructions. The period, batch, owner
/// index and claim records a query needs are passed as remaining accounts.
#[derive(Accounts)]
pub struct ReadLedger<'info> {
    #[account(
        seeds = [LEDGER_SEED],
        bump = lottery.bump
    )]
    pub lottery: Box<Account<'info, LotteryState>>,
}

pub fn process_get_reward_result(
    ctx: Context<ReadLedger>,
    period: u64,
    owner: Pubkey,
) -> Result<RewardResult> {
    queries::reward_result(&view(&ctx)?, period, &owner)
}

pub fn process_get_bought_tickets(
    ctx: Context<ReadLedger>,
    owner: Pubkey,
    period: u64,
) -> Result<Vec<u64>> {
    queries::bought_tickets(&view(&ctx)?, &owner, period)
}

pub fn process_get_period(ctx: Context<ReadLedger>, period: u64) -> Result<Period> {
    queries::period(&view(&ctx)?, period)
}

pub fn process_get_period_status(ctx: Context<ReadLedger>, period: u64) -> Result<PeriodStatus> {
    let view = view(&ctx)?;
    queries::config(&view)?;
    period_status(&view, period)
}

pub fn process_get_current_period_number(ctx: Context<ReadLedger>) -> Result<u64> {
    queries::current_period_number(&view(&ctx)?)
}

pub fn process_get_sales(ctx: Context<ReadLedger>, period: u64) -> Result<u64> {
    queries::sales(&view(&ctx)?, period)
}

pub fn process_get_ticket(ctx: Context<ReadLedger>, ticket_id: u64) -> Result<Ticket> {
    queries::ticket(&view(&ctx)?, ticket_id)
}

pub fn process_get_config(ctx: Context<ReadLedger>) -> Result<LotteryConfig> {
    queries::config(&view(&ctx)?)
}

fn view(ctx: &Context<ReadLedger>) -> Result<LedgerView> {
    LedgerView::load(&ctx.accounts.lottery).with_records(ctx.remaining_accounts)
}
