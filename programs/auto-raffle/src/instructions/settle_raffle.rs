use anchor_lang::prelude::*;
use arrayref::array_ref;
use switchboard_on_demand::accounts::RandomnessAccountData;

use crate::{
    error::RaffleError,
    state::{winner_index, Entrants, Raffle, Vault, VAULT_ACCOUNT_SIZE},
};

/// Event emitted when a round settles and the pool is paid out
#[event]
pub struct WinnerPicked {
    /// The pubkey of the raffle
    pub raffle: Pubkey,
    /// The winner's address
    pub winner: Pubkey,
    /// The list slot the winner occupied
    pub winner_index: u32,
    /// Amount paid out in lamports
    pub prize: u64,
}

/// Instruction to settle the round once the randomness is revealed
///
/// # Security Considerations
/// The instruction performs several critical checks:
/// 1. The presented randomness account must be the round's outstanding
///    request; never-issued keys and keys from settled rounds fail with
///    `UnknownRequest`
/// 2. The oracle must have revealed a value; an unrevealed account fails
///    with `RandomnessNotResolved` and leaves the round waiting
/// 3. The winner account passed by the caller must be the entrant at the
///    selected index
///
/// # Implementation Notes
/// - Winner index is the revealed word modulo the entrant count; the modulo
///   bias is an accepted, documented limitation
/// - Reset happens before the payout, and the Solana runtime rolls the
///   whole instruction back if the payout fails, so either the round fully
///   settles or nothing is observable
/// - The entire pool above the vault's rent floor goes to the winner
pub fn settle_raffle(ctx: Context<SettleRaffle>) -> Result<()> {
    let clock = Clock::get()?;
    let raffle = &mut ctx.accounts.raffle;

    raffle.verify_request(&ctx.accounts.randomness_account_data.key())?;

    let randomness_data =
        RandomnessAccountData::parse(ctx.accounts.randomness_account_data.data.borrow())
            .map_err(|_| RaffleError::InvalidRandomnessAccount)?;
    let revealed = randomness_data
        .get_value(&clock)
        .map_err(|_| RaffleError::RandomnessNotResolved)?;
    let random_word = u64::from_le_bytes(*array_ref![revealed, 0, 8]);

    let entrants = &mut ctx.accounts.entrants;
    let index = winner_index(random_word, entrants.total)?;
    let winner = Entrants::get_entrant(entrants.to_account_info().data.borrow(), index)?;
    require!(
        ctx.accounts.winner.key() == winner,
        RaffleError::WinnerMismatch
    );

    let vault_info = ctx.accounts.vault.to_account_info();
    let rent_floor = Rent::get()?.minimum_balance(VAULT_ACCOUNT_SIZE);
    let prize = Vault::pool_balance(vault_info.lamports(), rent_floor);

    // Reset the round, then pay; atomicity comes from the transaction
    // itself.
    entrants.clear();
    raffle.settle(winner, clock.unix_timestamp);

    vault_info
        .sub_lamports(prize)
        .map_err(|_| RaffleError::PayoutFailed)?;
    ctx.accounts
        .winner
        .add_lamports(prize)
        .map_err(|_| RaffleError::PayoutFailed)?;

    emit!(WinnerPicked {
        raffle: raffle.key(),
        winner,
        winner_index: index,
        prize,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct SettleRaffle<'info> {
    #[account(
        mut,
        seeds = [b"raffle"],
        bump = raffle.bump,
    )]
    pub raffle: Account<'info, Raffle>,

    #[account(
        mut,
        seeds = [b"entrants"],
        bump,
    )]
    pub entrants: Account<'info, Entrants>,

    #[account(
        mut,
        seeds = [b"vault"],
        bump = vault.bump,
    )]
    pub vault: Account<'info, Vault>,

    /// The randomness account recorded by `perform_upkeep`.
    /// CHECK: Correlated against the raffle's pending request and parsed
    /// in the handler.
    pub randomness_account_data: UncheckedAccount<'info>,

    /// The entrant selected by the revealed randomness.
    /// CHECK: Verified in the handler against the entrant list at the
    /// selected index; only receives lamports.
    #[account(mut)]
    pub winner: UncheckedAccount<'info>,
}
