use anchor_lang::prelude::*;

use super::guard::{authorize, Capability};
use super::{ExecutionContext, Lottery, LotteryStore};
use crate::constants::{
    DEFAULT_DRAWING_LAG, DEFAULT_MAXIMUM_BUY_AMOUNT, DEFAULT_PRICE, MAX_SYMBOL_LEN,
};
use crate::error::LotteryError;
use crate::state::{Counters, LotteryConfig, Period};

/// Parameters for initializing the lottery. Unset values fall back to the
/// defaults in [`crate::constants`].
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct InitializeArgs {
    pub token_symbol: String,
    pub price: Option<u64>,
    pub drawing_lag: Option<u64>,
    pub maximum_buy_amount: Option<u64>,
}

fn positive_or_default(value: Option<u64>, default: u64) -> Result<u64> {
    match value {
        Some(0) => err!(LotteryError::InvalidAmount),
        Some(value) => Ok(value),
        None => Ok(default),
    }
}

impl<'a, S: LotteryStore> Lottery<'a, S> {
    /// Makes the caller admin and opens period 1.
    pub fn initialize(&mut self, ctx: &ExecutionContext, args: InitializeArgs) -> Result<()> {
        require!(
            self.store.config().is_none(),
            LotteryError::AlreadyInitialized
        );
        let symbol_len = args.token_symbol.len();
        require!(
            symbol_len > 0 && symbol_len <= MAX_SYMBOL_LEN,
            LotteryError::InvalidSymbol
        );

        let price = positive_or_default(args.price, DEFAULT_PRICE)?;
        let maximum_buy_amount =
            positive_or_default(args.maximum_buy_amount, DEFAULT_MAXIMUM_BUY_AMOUNT)?;
        let drawing_lag = args.drawing_lag.unwrap_or(DEFAULT_DRAWING_LAG);
        let target_height = ctx
            .height
            .checked_add(drawing_lag)
            .ok_or(LotteryError::ArithmeticOverflow)?;

        self.store.put_period(Period::open(1, 1, target_height))?;
        self.store.set_counters(Counters {
            next_ticket_id: 1,
            current_period: 1,
            reward_count: 0,
        });
        self.store.set_config(LotteryConfig {
            token_symbol: args.token_symbol,
            admin: ctx.caller,
            price,
            drawing_lag,
            maximum_buy_amount,
        });

        msg!(
            "Lottery initialized by {}: price {}, drawing lag {}, maximum buy amount {}",
            ctx.caller,
            price,
            drawing_lag,
            maximum_buy_amount
        );
        Ok(())
    }

    pub fn reset_price(&mut self, ctx: &ExecutionContext, price: u64) -> Result<()> {
        let mut config = self.loaded_config()?;
        authorize(&ctx.caller, &config.admin, Capability::ResetPrice)?;
        require!(price > 0, LotteryError::InvalidAmount);

        msg!("Price reset from {} to {}", config.price, price);
        config.price = price;
        self.store.set_config(config);
        Ok(())
    }

    pub fn reset_drawing_lag(&mut self, ctx: &ExecutionContext, drawing_lag: u64) -> Result<()> {
        let mut config = self.loaded_config()?;
        authorize(&ctx.caller, &config.admin, Capability::ResetDrawingLag)?;

        msg!(
            "Drawing lag reset from {} to {}",
            config.drawing_lag,
            drawing_lag
        );
        config.drawing_lag = drawing_lag;
        self.store.set_config(config);
        Ok(())
    }

    pub fn reset_maximum_buy_amount(
        &mut self,
        ctx: &ExecutionContext,
        maximum_buy_amount: u64,
    ) -> Result<()> {
        let mut config = self.loaded_config()?;
        authorize(&ctx.caller, &config.admin, Capability::ResetMaximumBuyAmount)?;
        require!(maximum_buy_amount > 0, LotteryError::InvalidAmount);

        msg!(
            "Maximum buy amount reset from {} to {}",
            config.maximum_buy_amount,
            maximum_buy_amount
        );
        config.maximum_buy_amount = maximum_buy_amount;
        self.store.set_config(config);
        Ok(())
    }
}
