use anchor_lang::prelude::*;

#[event]
pub struct TicketsBought {
    pub buyer: Pubkey,
    pub period: u64,
    pub first_id: u64,
    pub count: u64,
    pub cost: u64,
}

#[event]
pub struct PeriodPrepared {
    /// Period whose ticket pool was just closed.
    pub closed_period: u64,
    pub opened_period: u64,
    pub start_ticket_id: u64,
    pub target_height: u64,
}

#[event]
pub struct PeriodDrawn {
    pub period: u64,
    pub random_seed: [u8; 32],
    pub winning_ticket_ids: Vec<u64>,
    /// Rewards assigned across all periods after this draw.
    pub reward_count: u64,
}

#[event]
pub struct RewardTaken {
    pub ticket_id: u64,
    pub owner: Pubkey,
    pub level: u32,
}
