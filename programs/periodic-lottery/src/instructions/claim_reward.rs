use anchor_lang::prelude::*;

use crate::constants::{CLAIM_SEED, LEDGER_SEED, TICKETS_SEED};
use crate::engine::{ExecutionContext, Lottery};
use crate::error::LotteryError;
use crate::ledger::LedgerView;
use crate::state::{LotteryState, RewardClaim, TicketBatch};

/// Accounts required to claim a winning ticket.
#[derive(Accounts)]
#[instruction(ticket_id: u64)]
pub struct TakeReward<'info> {
    /// Owner of the winning ticket; pays for the claim record.
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        seeds = [LEDGER_SEED],
        bump = lottery.bump
    )]
    pub lottery: Box<Account<'info, LotteryState>>,

    /// The batch the ticket was bought in.
    #[account(
        seeds = [TICKETS_SEED, ticket_batch.first_id.to_le_bytes().as_ref()],
        bump = ticket_batch.bump,
        constraint = ticket_batch.contains(ticket_id) @ LotteryError::TicketNotFound
    )]
    pub ticket_batch: Box<Account<'info, TicketBatch>>,

    #[account(
        init_if_needed,
        payer = owner,
        space = 8 + RewardClaim::INIT_SPACE,
        seeds = [CLAIM_SEED, ticket_id.to_le_bytes().as_ref()],
        bump
    )]
    pub claim: Box<Account<'info, RewardClaim>>,

    pub system_program: Program<'info, System>,
}

/// Stores the owner's registration information on a winning ticket.
///
/// # Arguments
/// * `ctx` - Context containing `TakeReward` accounts
/// * `ticket_id` - The winning ticket
/// * `registration` - Information the prize is delivered against
pub fn process_take_reward(
    ctx: Context<TakeReward>,
    ticket_id: u64,
    registration: String,
) -> Result<()> {
    let clock = Clock::get()?;
    let exec = ExecutionContext::new(ctx.accounts.owner.key(), clock.slot);

    let mut view = LedgerView::load(&ctx.accounts.lottery)
        .with_batch(TicketBatch::clone(&ctx.accounts.ticket_batch))
        .with_claim(RewardClaim::clone(&ctx.accounts.claim));
    let ticket = Lottery::new(&mut view).take_reward(&exec, ticket_id, registration)?;
    msg!("Ticket {} claimed level {} reward", ticket.id, ticket.level);

    let claim = view
        .claim(ticket_id)
        .cloned()
        .ok_or(LotteryError::StoreOutOfSequence)?;
    ctx.accounts.claim.set_inner(RewardClaim {
        bump: ctx.bumps.claim,
        ..claim
    });
    Ok(())
}
