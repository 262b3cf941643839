use anchor_lang::prelude::*;

use crate::{
    error::RaffleError,
    state::{
        raffle::{Raffle, RaffleState},
        Entrants, Vault,
    },
};

/// Event emitted when an entrant joins the current round
#[event]
pub struct RaffleEntered {
    /// The pubkey of the raffle
    pub raffle: Pubkey,
    /// The entrant's address
    pub entrant: Pubkey,
    /// Amount paid in lamports
    pub payment: u64,
    /// The list slot this entry occupies
    pub entrant_index: u32,
}

/// Instruction to enter the current round
///
/// # Arguments
/// * `ctx` - The context object containing all required accounts
/// * `payment` - Lamports the entrant pays into the pool
///
/// # Security Considerations
/// The instruction performs several critical checks:
/// 1. Validates the raffle is Open through an account constraint
/// 2. Validates payment covers the entrance fee
/// 3. Grows the entrants account before appending, rent paid by the entrant
/// 4. Verifies the vault balance delta after the payment transfer
///
/// # Implementation Notes
/// - Each entry takes one list slot, so paying in twice doubles the odds;
///   there is no per-address deduplication
/// - The full payment goes into the pool, even when above the fee
/// - There is no entrant cap beyond the account growth limits
pub fn enter_raffle(ctx: Context<EnterRaffle>, payment: u64) -> Result<()> {
    let raffle = &ctx.accounts.raffle;
    raffle.check_entry(payment)?;

    let entrants = &mut ctx.accounts.entrants;
    let entrant_index = entrants.total;

    // Grow the entrants account by one slot, topping up rent from the
    // entrant so the account stays rent-exempt.
    let entrants_info = entrants.to_account_info();
    let required_size = Entrants::size_for(
        entrant_index.checked_add(1).ok_or(RaffleError::Overflow)?,
    );
    let required_lamports = Rent::get()?.minimum_balance(required_size);
    let current_lamports = entrants_info.lamports();
    if required_lamports > current_lamports {
        let rent_top_up = required_lamports
            .checked_sub(current_lamports)
            .ok_or(RaffleError::Overflow)?;
        anchor_lang::solana_program::program::invoke(
            &anchor_lang::solana_program::system_instruction::transfer(
                &ctx.accounts.entrant.key(),
                &entrants_info.key(),
                rent_top_up,
            ),
            &[
                ctx.accounts.entrant.to_account_info(),
                entrants_info.clone(),
                ctx.accounts.system_program.to_account_info(),
            ],
        )?;
        entrants_info.realloc(required_size, false)?;
    }

    entrants.append_entrant(entrants_info.data.borrow_mut(), ctx.accounts.entrant.key())?;

    // Store pre-transfer balance for verification
    let pre_transfer_balance = ctx.accounts.vault.to_account_info().lamports();

    // Transfer the payment from the entrant into the pool
    anchor_lang::solana_program::program::invoke(
        &anchor_lang::solana_program::system_instruction::transfer(
            &ctx.accounts.entrant.key(),
            &ctx.accounts.vault.key(),
            payment,
        ),
        &[
            ctx.accounts.entrant.to_account_info(),
            ctx.accounts.system_program.to_account_info(),
            ctx.accounts.vault.to_account_info(),
        ],
    )?;

    // Verify the transfer was successful by checking the vault balance
    let post_transfer_balance = ctx.accounts.vault.to_account_info().lamports();
    require!(
        post_transfer_balance
            == pre_transfer_balance
                .checked_add(payment)
                .ok_or(RaffleError::Overflow)?,
        RaffleError::TransferFailed
    );

    emit!(RaffleEntered {
        raffle: ctx.accounts.raffle.key(),
        entrant: ctx.accounts.entrant.key(),
        payment,
        entrant_index,
    });

    Ok(())
}

#[derive(Accounts)]
pub struct EnterRaffle<'info> {
    /// The raffle being entered
    /// Must be in Open state; entries during Calculating are rejected
    #[account(
        seeds = [b"raffle"],
        bump = raffle.bump,
        constraint = raffle.raffle_state == RaffleState::Open @ RaffleError::RaffleNotOpen,
    )]
    pub raffle: Account<'info, Raffle>,

    /// The entrant list for the current round, grown by one slot
    #[account(
        mut,
        seeds = [b"entrants"],
        bump,
    )]
    pub entrants: Account<'info, Entrants>,

    /// The pool vault receiving the payment
    #[account(
        mut,
        seeds = [b"vault"],
        bump = vault.bump,
    )]
    pub vault: Account<'info, Vault>,

    /// The account entering the raffle and paying the fee
    #[account(mut)]
    pub entrant: Signer<'info>,

    /// Required for the rent top-up and payment transfers
    pub system_program: Program<'info, System>,
}
