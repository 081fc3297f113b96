use anchor_lang::prelude::*;
use instructions::*;

pub mod constants;
pub mod engine;
pub mod error;
pub mod events;
pub mod instructions;
pub mod ledger;
pub mod state;
pub mod utils;

use engine::queries::RewardResult;
use engine::{BoughtTickets, InitializeArgs, PeriodStatus};
use state::{LotteryConfig, Period, Ticket};

declare_id!("CF7oPY54CZQ6VqLa1H4YhCgKmK7HuoMtLKEy4CES3GFj");

#[program]
pub mod periodic_lottery {
    use super::*;

    pub fn initialize_lottery(ctx: Context<InitializeLottery>, args: InitializeArgs) -> Result<()> {
        process_initialize_lottery(ctx, args)
    }

    pub fn buy_tickets(ctx: Context<BuyTickets>, count: u64) -> Result<BoughtTickets> {
        process_buy_tickets(ctx, count)
    }

    pub fn prepare_draw(ctx: Context<PrepareDraw>) -> Result<()> {
        process_prepare_draw(ctx)
    }

    pub fn commit_randomness(ctx: Context<CommitRandomness>) -> Result<()> {
        process_commit_randomness(ctx)
    }

    pub fn draw(ctx: Context<DrawPeriod>, level_counts: Vec<u32>) -> Result<()> {
        process_draw(ctx, level_counts)
    }

    pub fn take_reward(
        ctx: Context<TakeReward>,
        ticket_id: u64,
        registration: String,
    ) -> Result<()> {
        process_take_reward(ctx, ticket_id, registration)
    }

    pub fn reset_price(ctx: Context<UpdateConfig>, price: u64) -> Result<()> {
        process_reset_price(ctx, price)
    }

    pub fn reset_drawing_lag(ctx: Context<UpdateConfig>, drawing_lag: u64) -> Result<()> {
        process_reset_drawing_lag(ctx, drawing_lag)
    }

    pub fn reset_maximum_buy_amount(
        ctx: Context<UpdateConfig>,
        maximum_buy_amount: u64,
    ) -> Result<()> {
        process_reset_maximum_buy_amount(ctx, maximum_buy_amount)
    }

    pub fn get_reward_result(
        ctx: Context<ReadLedger>,
        period: u64,
        owner: Pubkey,
    ) -> Result<RewardResult> {
        process_get_reward_result(ctx, period, owner)
    }

    pub fn get_bought_tickets(
        ctx: Context<ReadLedger>,
        owner: Pubkey,
        period: u64,
    ) -> Result<Vec<u64>> {
        process_get_bought_tickets(ctx, owner, period)
    }

    pub fn get_period(ctx: Context<ReadLedger>, period: u64) -> Result<Period> {
        process_get_period(ctx, period)
    }

    pub fn get_period_status(ctx: Context<ReadLedger>, period: u64) -> Result<PeriodStatus> {
        process_get_period_status(ctx, period)
    }

    pub fn get_current_period_number(ctx: Context<ReadLedger>) -> Result<u64> {
        process_get_current_period_number(ctx)
    }

    pub fn get_sales(ctx: Context<ReadLedger>, period: u64) -> Result<u64> {
        process_get_sales(ctx, period)
    }

    pub fn get_ticket(ctx: Context<ReadLedger>, ticket_id: u64) -> Result<Ticket> {
        process_get_ticket(ctx, ticket_id)
    }

    pub fn get_config(ctx: Context<ReadLedger>) -> Result<LotteryConfig> {
        process_get_config(ctx)
    }
}
