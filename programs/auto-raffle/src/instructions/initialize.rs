use anchor_lang::prelude::*;

use crate::{
    error::RaffleError,
    state::{
        Entrants, Raffle, RaffleState, Vault, ENTRANTS_BASE_SIZE, RAFFLE_ACCOUNT_SIZE,
        VAULT_ACCOUNT_SIZE,
    },
};

/// Event emitted when the raffle is created
#[event]
pub struct RaffleInitialized {
    /// The pubkey of the raffle
    pub raffle: Pubkey,
    /// Minimum payment per entry in lamports
    pub entrance_fee: u64,
    /// Minimum seconds between upkeep executions
    pub interval: i64,
}

/// Instruction to create the raffle and its companion accounts
/// This is called once; the round parameters are immutable afterwards
///
/// # Arguments
/// * `ctx` - The context object containing all required accounts
/// * `entrance_fee` - Minimum payment per entry in lamports (must be > 0)
/// * `interval` - Minimum seconds between upkeeps (must be > 0)
///
/// # Account Validations
/// * Raffle - New PDA with seed "raffle", holds the state machine
/// * Entrants - New PDA with seed "entrants", grown per entry later
/// * Vault - New PDA with seed "vault", holds the prize pool
///
/// # Implementation Notes
/// - The raffle starts Open with an empty list and an empty pool
/// - `last_timestamp` starts at the initialization time, so the first
///   upkeep cannot fire before one full interval has elapsed
pub fn initialize(ctx: Context<Initialize>, entrance_fee: u64, interval: i64) -> Result<()> {
    require!(entrance_fee > 0, RaffleError::InvalidEntranceFee);
    require!(interval > 0, RaffleError::InvalidInterval);

    let raffle = &mut ctx.accounts.raffle;
    raffle.bump = ctx.bumps.raffle;
    raffle.authority = ctx.accounts.authority.key();
    raffle.entrance_fee = entrance_fee;
    raffle.interval = interval;
    raffle.last_timestamp = Clock::get()?.unix_timestamp;
    raffle.raffle_state = RaffleState::Open;
    raffle.pending_request = None;
    raffle.recent_winner = None;

    ctx.accounts.entrants.total = 0;
    ctx.accounts.vault.bump = ctx.bumps.vault;

    emit!(RaffleInitialized {
        raffle: raffle.key(),
        entrance_fee,
        interval,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(
        init,
        payer = authority,
        space = RAFFLE_ACCOUNT_SIZE,
        seeds = [b"raffle"],
        bump
    )]
    pub raffle: Account<'info, Raffle>,

    #[account(
        init,
        payer = authority,
        space = ENTRANTS_BASE_SIZE,
        seeds = [b"entrants"],
        bump
    )]
    pub entrants: Account<'info, Entrants>,

    #[account(
        init,
        payer = authority,
        space = VAULT_ACCOUNT_SIZE,
        seeds = [b"vault"],
        bump
    )]
    pub vault: Account<'info, Vault>,

    #[account(mut)]
    pub authority: Signer<'info>,

    pub system_program: Program<'info, System>,
}
