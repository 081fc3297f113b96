use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::constants::{LEDGER_SEED, MAX_TICKETS_PER_PURCHASE, OWNER_SEED, TICKETS_SEED, VAULT_SEED};
use crate::engine::{BoughtTickets, ExecutionContext, Lottery, LotteryStore};
use crate::error::LotteryError;
use crate::ledger::LedgerView;
use crate::state::{LotteryState, OwnerTickets, TicketBatch};
use crate::utils::{grow_account, SplTransfer};

/// Accounts required to buy tickets in the open period.
#[derive(Accounts)]
#[instruction(count: u64)]
pub struct BuyTickets<'info> {
    /// The buyer; pays for the tickets and for the new records.
    #[account(mut)]
    pub buyer: Signer<'info>,

    #[account(
        mut,
        seeds = [LEDGER_SEED],
        bump = lottery.bump
    )]
    pub lottery: Box<Account<'info, LotteryState>>,

    /// The tickets of this purchase, keyed by the first id they receive.
    #[account(
        init,
        payer = buyer,
        space = TicketBatch::space(count.min(MAX_TICKETS_PER_PURCHASE) as usize),
        seeds = [TICKETS_SEED, lottery.counters.next_ticket_id.to_le_bytes().as_ref()],
        bump
    )]
    pub ticket_batch: Box<Account<'info, TicketBatch>>,

    /// The buyer's tickets in the open period.
    #[account(
        init_if_needed,
        payer = buyer,
        space = OwnerTickets::space(1),
        seeds = [
            OWNER_SEED,
            buyer.key().as_ref(),
            lottery.counters.current_period.to_le_bytes().as_ref()
        ],
        bump
    )]
    pub owner_tickets: Box<Account<'info, OwnerTickets>>,

    #[account(address = lottery.payment_mint)]
    pub payment_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Token account the ticket cost is taken from.
    #[account(
        mut,
        token::mint = payment_mint,
        token::authority = buyer,
        token::token_program = token_program,
    )]
    pub buyer_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        seeds = [VAULT_SEED, lottery.key().as_ref()],
        bump,
    )]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,

    pub system_program: Program<'info, System>,
}

/// Buys `count` tickets for the signer.
///
/// Steps performed:
/// 1. Check the count against the configured maximum.
/// 2. Transfer `count * price` tokens from the buyer to the vault.
/// 3. Record the tickets in a new batch account.
/// 4. Append them to the buyer's index for the open period.
///
/// Returns the first ticket id and the count.
pub fn process_buy_tickets(ctx: Context<BuyTickets>, count: u64) -> Result<BoughtTickets> {
    let clock = Clock::get()?;
    let exec = ExecutionContext::new(ctx.accounts.buyer.key(), clock.slot);
    let mut bank = SplTransfer {
        from: ctx.accounts.buyer_token_account.to_account_info(),
        mint: ctx.accounts.payment_mint.to_account_info(),
        to: ctx.accounts.vault.to_account_info(),
        authority: ctx.accounts.buyer.to_account_info(),
        token_program: ctx.accounts.token_program.to_account_info(),
        decimals: ctx.accounts.payment_mint.decimals,
    };

    let mut view = LedgerView::load(&ctx.accounts.lottery)
        .with_owner_tickets(OwnerTickets::clone(&ctx.accounts.owner_tickets));
    let bought = Lottery::new(&mut view).buy(&exec, count, &mut bank)?;
    let period = view.counters().current_period;

    let batch = view
        .batch(bought.first_id)
        .cloned()
        .ok_or(LotteryError::StoreOutOfSequence)?;
    ctx.accounts.ticket_batch.set_inner(TicketBatch {
        bump: ctx.bumps.ticket_batch,
        ..batch
    });

    let index = view
        .owner_index(&exec.caller, period)
        .cloned()
        .ok_or(LotteryError::StoreOutOfSequence)?;
    let required_len = OwnerTickets::space(index.ranges.len());
    ctx.accounts.owner_tickets.set_inner(OwnerTickets {
        bump: ctx.bumps.owner_tickets,
        ..index
    });
    ctx.accounts.lottery.set_inner(view.state);

    grow_account(
        &ctx.accounts.owner_tickets.to_account_info(),
        &ctx.accounts.buyer.to_account_info(),
        &ctx.accounts.system_program.to_account_info(),
        required_len,
    )?;

    msg!(
        "Bought tickets {}..{}",
        bought.first_id,
        bought.first_id + bought.count
    );
    Ok(bought)
}
