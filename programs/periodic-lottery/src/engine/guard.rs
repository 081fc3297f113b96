use anchor_lang::prelude::*;

use crate::error::LotteryError;

/// Admin-only actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    PrepareDraw,
    Draw,
    CommitRandomness,
    ResetPrice,
    ResetDrawingLag,
    ResetMaximumBuyAmount,
}

impl Capability {
    pub fn name(&self) -> &'static str {
        match self {
            Capability::PrepareDraw => "prepare draw",
            Capability::Draw => "draw",
            Capability::CommitRandomness => "commit randomness",
            Capability::ResetPrice => "reset price",
            Capability::ResetDrawingLag => "reset drawing lag",
            Capability::ResetMaximumBuyAmount => "reset maximum buy amount",
        }
    }
}

/// Grant returned once the caller has been checked against the admin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Authorized {
    pub capability: Capability,
    pub admin: Pubkey,
}

/// Single gate for every admin-only operation.
pub fn authorize(caller: &Pubkey, admin: &Pubkey, capability: Capability) -> Result<Authorized> {
    if caller != admin {
        msg!("{} rejected for {}", capability.name(), caller);
        return err!(LotteryError::Unauthorized);
    }
    Ok(Authorized {
        capability,
        admin: *admin,
    })
}
