use anchor_lang::prelude::*;
use anchor_lang::system_program;
use anchor_spl::token_interface::{transfer_checked, TransferChecked};
use solana_program::entrypoint::MAX_PERMITTED_DATA_INCREASE;
use switchboard_on_demand::accounts::RandomnessAccountData;

use crate::engine::{RandomnessOracle, ValueTransfer};
use crate::error::LotteryError;

/// Pays for tickets with an SPL `transfer_checked` from the buyer's token
/// account into the lottery vault.
pub struct SplTransfer<'info> {
    pub from: AccountInfo<'info>,
    pub mint: AccountInfo<'info>,
    pub to: AccountInfo<'info>,
    pub authority: AccountInfo<'info>,
    pub token_program: AccountInfo<'info>,
    pub decimals: u8,
}

impl<'info> ValueTransfer for SplTransfer<'info> {
    fn transfer_to_lottery(&mut self, from: &Pubkey, symbol: &str, amount: u64) -> Result<()> {
        require_keys_eq!(*from, self.authority.key(), LotteryError::Unauthorized);
        msg!("Transferring {} {} from {}", amount, symbol, from);

        transfer_checked(
            CpiContext::new(
                self.token_program.clone(),
                TransferChecked {
                    from: self.from.clone(),
                    mint: self.mint.clone(),
                    to: self.to.clone(),
                    authority: self.authority.clone(),
                },
            ),
            amount,
            self.decimals,
        )
    }
}

/// Reads the seed from the Switchboard randomness account committed to the
/// ledger.
pub struct SwitchboardOracle<'a, 'info> {
    pub randomness_account: &'a AccountInfo<'info>,
    pub committed: Pubkey,
    pub clock: &'a Clock,
}

impl<'a, 'info> RandomnessOracle for SwitchboardOracle<'a, 'info> {
    fn random_seed(&self, height: u64) -> Result<[u8; 32]> {
        require_keys_eq!(
            self.randomness_account.key(),
            self.committed,
            LotteryError::IncorrectRandomnessAccount
        );
        let randomness_data = RandomnessAccountData::parse(self.randomness_account.data.borrow())
            .map_err(|_| LotteryError::RandomnessNotResolved)?;
        check_seed_account(
            &self.randomness_account.key(),
            &self.committed,
            randomness_data.seed_slot,
            height,
        )?;

        let revealed_random_value = randomness_data
            .get_value(self.clock)
            .map_err(|_| LotteryError::RandomnessNotResolved)?;
        Ok(revealed_random_value)
    }
}

/// A randomness account may serve a draw at `height` only if it is the
/// committed one and was seeded no earlier than `height`.
pub fn check_seed_account(
    account: &Pubkey,
    committed: &Pubkey,
    seed_slot: u64,
    height: u64,
) -> Result<()> {
    require_keys_eq!(*account, *committed, LotteryError::IncorrectRandomnessAccount);
    if seed_slot < height {
        msg!("Seed slot: {}", seed_slot);
        msg!("Draw height: {}", height);
        return err!(LotteryError::RandomnessNotResolved);
    }
    Ok(())
}

/// A commitment must use randomness seeded in the previous slot.
pub fn check_fresh_seed(seed_slot: u64, slot: u64) -> Result<()> {
    if seed_slot != slot.saturating_sub(1) {
        msg!("Seed slot: {}", seed_slot);
        msg!("Current slot: {}", slot);
        return err!(LotteryError::RandomnessAlreadyRevealed);
    }
    Ok(())
}

/// Replacing the randomness bound to `pending` is allowed only while the
/// bound account is unrevealed. `bound_reveal_slot` is `None` when the
/// bound account was not supplied.
pub fn check_rebind(bound_period: u64, pending: u64, bound_reveal_slot: Option<u64>) -> Result<()> {
    if bound_period != pending {
        return Ok(());
    }
    match bound_reveal_slot {
        Some(0) => Ok(()),
        Some(reveal_slot) => {
            msg!("Period {} randomness revealed at {}", pending, reveal_slot);
            err!(LotteryError::RandomnessAlreadyCommitted)
        }
        None => err!(LotteryError::RandomnessAlreadyCommitted),
    }
}

/// Growth from `current_len` to `required_len` must fit one realloc.
pub fn check_growth(current_len: usize, required_len: usize) -> Result<()> {
    require!(
        required_len.saturating_sub(current_len) <= MAX_PERMITTED_DATA_INCREASE,
        LotteryError::AccountGrowthTooLarge
    );
    Ok(())
}

/// Grows a program account to `required_len`, topping up rent from
/// `payer`. Never shrinks.
pub fn grow_account<'info>(
    account: &AccountInfo<'info>,
    payer: &AccountInfo<'info>,
    system_program_info: &AccountInfo<'info>,
    required_len: usize,
) -> Result<()> {
    let current_len = account.data_len();
    if required_len <= current_len {
        return Ok(());
    }
    check_growth(current_len, required_len)?;

    let shortfall = Rent::get()?
        .minimum_balance(required_len)
        .saturating_sub(account.lamports());
    if shortfall > 0 {
        system_program::transfer(
            CpiContext::new(
                system_program_info.clone(),
                system_program::Transfer {
                    from: payer.clone(),
                    to: account.clone(),
                },
            ),
            shortfall,
        )?;
    }

    msg!("Account grows from {} to {} bytes", current_len, required_len);
    account.realloc(required_len, false)?;
    Ok(())
}
