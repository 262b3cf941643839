use anchor_lang::prelude::*;

use crate::state::{Entrants, Raffle, UpkeepEval, Vault, VAULT_ACCOUNT_SIZE};

/// Instruction to evaluate the upkeep predicate without mutating anything
///
/// Returns the evaluation as instruction return data so off-chain triggers
/// can simulate this instruction and decide whether to call `perform_upkeep`.
/// Upkeep is needed iff all four sub-conditions hold:
/// 1. The raffle is Open
/// 2. At least `interval` seconds have passed since the last settlement
/// 3. The pool holds a non-zero balance
/// 4. The entrant list is non-empty
///
/// The result is advisory: `perform_upkeep` re-runs the same evaluation and
/// fails on its own if the conditions no longer hold.
pub fn check_upkeep(ctx: Context<CheckUpkeep>) -> Result<UpkeepEval> {
    let now = Clock::get()?.unix_timestamp;
    let rent_floor = Rent::get()?.minimum_balance(VAULT_ACCOUNT_SIZE);
    let pool_balance = Vault::pool_balance(ctx.accounts.vault.to_account_info().lamports(), rent_floor);

    let eval = ctx
        .accounts
        .raffle
        .evaluate_upkeep(now, pool_balance, ctx.accounts.entrants.total);

    msg!(
        "upkeep needed: {} (open: {}, interval: {}, balance: {}, entrants: {})",
        eval.needed,
        eval.is_open,
        eval.interval_elapsed,
        eval.has_balance,
        eval.has_entrants
    );

    Ok(eval)
}

#[derive(Accounts)]
pub struct CheckUpkeep<'info> {
    #[account(
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
}
