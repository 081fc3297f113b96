use anchor_lang::prelude::*;

use super::{ExecutionContext, Lottery, LotteryStore};
use crate::constants::MAX_REGISTRATION_LEN;
use crate::error::LotteryError;
use crate::events::RewardTaken;
use crate::state::Ticket;

impl<'a, S: LotteryStore> Lottery<'a, S> {
    /// Records the owner's registration information on a winning ticket.
    /// A ticket can be claimed once; paying out the prize happens outside
    /// the lottery.
    pub fn take_reward(
        &mut self,
        ctx: &ExecutionContext,
        ticket_id: u64,
        registration: String,
    ) -> Result<Ticket> {
        self.loaded_config()?;
        let mut ticket = self
            .store
            .ticket(ticket_id)
            .ok_or(LotteryError::TicketNotFound)?;

        require_keys_eq!(ticket.owner, ctx.caller, LotteryError::Unauthorized);
        require!(ticket.is_winner(), LotteryError::NotAWinner);
        if ticket.is_claimed() {
            msg!(
                "Ticket {} already claimed: {:?}",
                ticket_id,
                ticket.registration
            );
            return err!(LotteryError::AlreadyClaimed);
        }
        require!(
            !registration.is_empty() && registration.len() <= MAX_REGISTRATION_LEN,
            LotteryError::InvalidRegistration
        );

        ticket.registration = Some(registration);
        self.store.put_ticket(ticket.clone())?;

        emit!(RewardTaken {
            ticket_id,
            owner: ticket.owner,
            level: ticket.level,
        });
        Ok(ticket)
    }
}
