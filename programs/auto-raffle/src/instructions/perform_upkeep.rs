use anchor_lang::prelude::*;
use switchboard_on_demand::accounts::RandomnessAccountData;

use crate::{
    error::RaffleError,
    state::{Entrants, Raffle, Vault, VAULT_ACCOUNT_SIZE},
};

/// Event emitted when a randomness request is recorded
///
/// The `request` key is the correlation anchor: the later settlement must
/// present the same randomness account, and observers waiting on this round
/// watch for a `WinnerPicked` carrying it.
#[event]
pub struct RandomnessRequested {
    /// The pubkey of the raffle
    pub raffle: Pubkey,
    /// The randomness account the round now waits on
    pub request: Pubkey,
    /// Slot at which the request was recorded
    pub slot: u64,
}

/// Instruction to start the asynchronous randomness protocol
///
/// # Security Considerations
/// The instruction performs several critical checks:
/// 1. Re-evaluates the full upkeep predicate instead of trusting a prior
///    `check_upkeep` result, and fails with `UpkeepNotNeeded` otherwise
/// 2. Validates the randomness account parses as switchboard randomness data
/// 3. Requires the randomness commitment to be from the previous slot, so a
///    request whose value is already revealed (or predictable) is rejected
///
/// # Implementation Notes
/// - Permissionless: any caller may trigger it once the predicate holds
/// - Transitions Open -> Calculating; the state flag then blocks entries,
///   further upkeeps, and re-entrant execution until settlement
/// - Selects no winner and moves no funds; `last_timestamp` is only
///   advanced when the round settles
pub fn perform_upkeep(ctx: Context<PerformUpkeep>) -> Result<()> {
    let clock = Clock::get()?;
    let rent_floor = Rent::get()?.minimum_balance(VAULT_ACCOUNT_SIZE);
    let pool_balance = Vault::pool_balance(ctx.accounts.vault.to_account_info().lamports(), rent_floor);

    let eval = ctx.accounts.raffle.evaluate_upkeep(
        clock.unix_timestamp,
        pool_balance,
        ctx.accounts.entrants.total,
    );
    if !eval.needed {
        msg!(
            "upkeep not needed (open: {}, interval: {}, balance: {}, entrants: {})",
            eval.is_open,
            eval.interval_elapsed,
            eval.has_balance,
            eval.has_entrants
        );
        return err!(RaffleError::UpkeepNotNeeded);
    }

    let randomness_data =
        RandomnessAccountData::parse(ctx.accounts.randomness_account_data.data.borrow())
            .map_err(|_| RaffleError::InvalidRandomnessAccount)?;
    require!(
        randomness_data.seed_slot == clock.slot - 1,
        RaffleError::RandomnessAlreadyRevealed
    );

    let request = ctx.accounts.randomness_account_data.key();
    ctx.accounts.raffle.begin_calculating(request)?;

    emit!(RandomnessRequested {
        raffle: ctx.accounts.raffle.key(),
        request,
        slot: clock.slot,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct PerformUpkeep<'info> {
    #[account(
        mut,
        seeds = [b"raffle"],
        bump = raffle.bump,
    )]
    pub raffle: Account<'info, Raffle>,

    #[account(
        seeds = [b"entrants"],
        bump,
    )]
    pub entrants: Account<'info, Entrants>,

    #[account(
        seeds = [b"vault"],
        bump = vault.bump,
    )]
    pub vault: Account<'info, Vault>,

    /// Freshly committed switchboard randomness account for this round.
    /// CHECK: The account's data is parsed and freshness-checked in the
    /// handler.
    pub randomness_account_data: UncheckedAccount<'info>,
}
