use std::ops::Range;

use anchor_lang::prelude::*;

use super::{ExecutionContext, Lottery, LotteryStore, ValueTransfer};
use crate::error::LotteryError;
use crate::events::TicketsBought;
use crate::state::{Counters, TicketRange};

/// Result of a purchase: the tickets `first_id..first_id + count`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoughtTickets {
    pub first_id: u64,
    pub count: u64,
}

impl BoughtTickets {
    pub fn ids(&self) -> Range<u64> {
        self.first_id..self.first_id + self.count
    }
}

impl<'a, S: LotteryStore> Lottery<'a, S> {
    /// Charges the caller `count * price` and mints `count` tickets into the
    /// open period. Nothing is minted if the payment fails.
    pub fn buy<T: ValueTransfer>(
        &mut self,
        ctx: &ExecutionContext,
        count: u64,
        bank: &mut T,
    ) -> Result<BoughtTickets> {
        let config = self.loaded_config()?;
        if count == 0 || count >= config.maximum_buy_amount {
            msg!(
                "Ticket count {} outside 1..{}",
                count,
                config.maximum_buy_amount
            );
            return err!(LotteryError::InvalidAmount);
        }
        let cost = config
            .price
            .checked_mul(count)
            .ok_or(LotteryError::ArithmeticOverflow)?;

        bank.transfer_to_lottery(&ctx.caller, &config.token_symbol, cost)?;
        msg!("Ticket cost {} {}", cost, config.token_symbol);

        let bought = self.issue(&ctx.caller, ctx.height, count)?;
        emit!(TicketsBought {
            buyer: ctx.caller,
            period: self.store.counters().current_period,
            first_id: bought.first_id,
            count: bought.count,
            cost,
        });
        Ok(bought)
    }

    /// Mints `count` consecutive tickets for `buyer` and records them in the
    /// owner index of the open period.
    fn issue(&mut self, buyer: &Pubkey, height: u64, count: u64) -> Result<BoughtTickets> {
        let counters = self.store.counters();
        let first_id = counters.next_ticket_id;
        let next_ticket_id = first_id
            .checked_add(count)
            .ok_or(LotteryError::ArithmeticOverflow)?;

        self.store.mint_tickets(
            buyer,
            counters.current_period,
            TicketRange { first_id, count },
            height,
        )?;
        self.store
            .append_owner_tickets(buyer, counters.current_period, first_id, count)?;
        self.store.set_counters(Counters {
            next_ticket_id,
            ..counters
        });

        Ok(BoughtTickets { first_id, count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::*;

    #[test]
    fn test_buy_mints_sequential_tickets() {
        let mut harness = Harness::new();
        let alice = Pubkey::new_unique();
        let ctx = harness.as_caller(alice);
        let mut bank = MockBank::funded(alice, 1_000);

        let bought = harness.lottery().buy(&ctx, 10, &mut bank).unwrap();

        assert_eq!(bought, BoughtTickets { first_id: 1, count: 10 });
        assert_eq!(harness.store.counters().next_ticket_id, 11);
        assert_eq!(bank.received, 10 * PRICE);
        assert_eq!(bank.balances[&alice], 1_000 - 10 * PRICE);
        for id in bought.ids() {
            let ticket = harness.store.ticket(id).unwrap();
            assert_eq!(ticket.owner, alice);
            assert_eq!(ticket.level, 0);
            assert_eq!(ticket.purchase_height, harness.height);
            assert!(ticket.registration.is_none());
        }
        assert_eq!(
            harness.store.owner_tickets(&alice, 1),
            bought.ids().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_ids_continue_across_buyers() {
        let mut harness = Harness::new();
        let alice = Pubkey::new_unique();
        let bob = Pubkey::new_unique();

        let first = harness.buy(alice, 3);
        let second = harness.buy(bob, 2);
        let third = harness.buy(alice, 1);

        assert_eq!(first.ids(), 1..4);
        assert_eq!(second.ids(), 4..6);
        assert_eq!(third.ids(), 6..7);
        assert_eq!(harness.store.owner_tickets(&alice, 1), vec![1, 2, 3, 6]);
        assert_eq!(harness.store.owner_tickets(&bob, 1), vec![4, 5]);
        assert_eq!(harness.store.counters().tickets_issued(), 6);
    }

    #[test]
    fn test_count_bounds_are_exclusive_of_maximum() {
        let mut harness = Harness::new();
        let alice = Pubkey::new_unique();
        let ctx = harness.as_caller(alice);
        let mut bank = MockBank::funded(alice, u64::MAX);
        let snapshot = harness.store.clone();

        for count in [0, MAXIMUM_BUY_AMOUNT, MAXIMUM_BUY_AMOUNT + 1] {
            assert_lottery_error(
                harness.lottery().buy(&ctx, count, &mut bank),
                LotteryError::InvalidAmount,
            );
        }
        assert_eq!(harness.store, snapshot);
        assert_eq!(bank.received, 0);

        let bought = harness
            .lottery()
            .buy(&ctx, MAXIMUM_BUY_AMOUNT - 1, &mut bank)
            .unwrap();
        assert_eq!(bought.count, MAXIMUM_BUY_AMOUNT - 1);
    }

    #[test]
    fn test_failed_payment_mints_nothing() {
        let mut harness = Harness::new();
        let alice = Pubkey::new_unique();
        let ctx = harness.as_caller(alice);
        let mut bank = MockBank::funded(alice, 5 * PRICE - 1);
        let snapshot = harness.store.clone();

        assert!(harness.lottery().buy(&ctx, 5, &mut bank).is_err());
        assert_eq!(harness.store, snapshot);
        assert_eq!(harness.store.ticket_count(), 0);
    }

    #[test]
    fn test_cost_overflow_is_rejected_before_payment() {
        let mut harness = Harness::new();
        let admin = harness.as_admin();
        harness.lottery().reset_price(&admin, u64::MAX).unwrap();

        let alice = Pubkey::new_unique();
        let ctx = harness.as_caller(alice);
        let mut bank = MockBank::funded(alice, u64::MAX);

        assert_lottery_error(
            harness.lottery().buy(&ctx, 2, &mut bank),
            LotteryError::ArithmeticOverflow,
        );
        assert_eq!(bank.received, 0);
    }
}
