use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::constants::{LEDGER_SEED, MAX_TICKETS_PER_PURCHASE, PERIOD_SEED, VAULT_SEED};
use crate::engine::{ExecutionContext, InitializeArgs, Lottery, LotteryStore};
use crate::error::LotteryError;
use crate::ledger::LedgerView;
use crate::state::{LotteryState, PeriodAccount};

/// Accounts required to initialize the lottery.
/// Creates the state account, the record of period 1 and the vault that
/// collects ticket payments.
#[derive(Accounts)]
pub struct InitializeLottery<'info> {
    /// The account paying for account creation; becomes the admin.
    #[account(mut)]
    pub payer: Signer<'info>,

    /// Configuration and counters.
    #[account(
        init,
        payer = payer,
        space = 8 + LotteryState::INIT_SPACE,
        seeds = [LEDGER_SEED],
        bump
    )]
    pub lottery: Box<Account<'info, LotteryState>>,

    /// Period 1, open from initialization.
    #[account(
        init,
        payer = payer,
        space = PeriodAccount::space(0),
        seeds = [PERIOD_SEED, 1u64.to_le_bytes().as_ref()],
        bump
    )]
    pub first_period: Box<Account<'info, PeriodAccount>>,

    /// Mint tickets are paid in.
    pub payment_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Token account owned by the lottery that receives ticket payments.
    #[account(
        init,
        payer = payer,
        seeds = [VAULT_SEED, lottery.key().as_ref()],
        bump,
        token::mint = payment_mint,
        token::authority = lottery,
        token::token_program = token_program,
    )]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Token program interface.
    pub token_program: Interface<'info, TokenInterface>,

    /// System program to create accounts.
    pub system_program: Program<'info, System>,
}

/// Accounts required for the admin parameter resets.
#[derive(Accounts)]
pub struct UpdateConfig<'info> {
    pub admin: Signer<'info>,

    #[account(
        mut,
        seeds = [LEDGER_SEED],
        bump = lottery.bump
    )]
    pub lottery: Account<'info, LotteryState>,
}

/// Initializes the lottery, records the payer as admin and opens period 1.
///
/// # Arguments
/// * `ctx` - Context holding the InitializeLottery accounts
/// * `args` - Token symbol plus optional price, drawing lag and maximum buy amount
pub fn process_initialize_lottery(
    ctx: Context<InitializeLottery>,
    args: InitializeArgs,
) -> Result<()> {
    if let Some(maximum_buy_amount) = args.maximum_buy_amount {
        check_purchase_cap(maximum_buy_amount)?;
    }
    let clock = Clock::get()?;
    let exec = ExecutionContext::new(ctx.accounts.payer.key(), clock.slot);

    let mut view = LedgerView::new(LotteryState {
        bump: ctx.bumps.lottery,
        payment_mint: ctx.accounts.payment_mint.key(),
        ..Default::default()
    });
    Lottery::new(&mut view).initialize(&exec, args)?;

    let first = view.period(1).ok_or(LotteryError::PeriodNotFound)?;
    ctx.accounts.first_period.set_inner(PeriodAccount {
        bump: ctx.bumps.first_period,
        period: first,
    });
    ctx.accounts.lottery.set_inner(view.state);
    Ok(())
}

pub fn process_reset_price(ctx: Context<UpdateConfig>, price: u64) -> Result<()> {
    let exec = admin_context(&ctx)?;
    let mut view = LedgerView::load(&ctx.accounts.lottery);
    Lottery::new(&mut view).reset_price(&exec, price)?;
    ctx.accounts.lottery.set_inner(view.state);
    Ok(())
}

pub fn process_reset_drawing_lag(ctx: Context<UpdateConfig>, drawing_lag: u64) -> Result<()> {
    let exec = admin_context(&ctx)?;
    let mut view = LedgerView::load(&ctx.accounts.lottery);
    Lottery::new(&mut view).reset_drawing_lag(&exec, drawing_lag)?;
    ctx.accounts.lottery.set_inner(view.state);
    Ok(())
}

pub fn process_reset_maximum_buy_amount(
    ctx: Context<UpdateConfig>,
    maximum_buy_amount: u64,
) -> Result<()> {
    check_purchase_cap(maximum_buy_amount)?;
    let exec = admin_context(&ctx)?;
    let mut view = LedgerView::load(&ctx.accounts.lottery);
    Lottery::new(&mut view).reset_maximum_buy_amount(&exec, maximum_buy_amount)?;
    ctx.accounts.lottery.set_inner(view.state);
    Ok(())
}

fn admin_context(ctx: &Context<UpdateConfig>) -> Result<ExecutionContext> {
    let clock = Clock::get()?;
    Ok(ExecutionContext::new(ctx.accounts.admin.key(), clock.slot))
}

/// Every purchase below the maximum must fit one batch account.
fn check_purchase_cap(maximum_buy_amount: u64) -> Result<()> {
    if maximum_buy_amount > MAX_TICKETS_PER_PURCHASE {
        msg!(
            "Maximum buy amount {} above {}",
            maximum_buy_amount,
            MAX_TICKETS_PER_PURCHASE
        );
        return err!(LotteryError::InvalidAmount);
    }
    Ok(())
}
