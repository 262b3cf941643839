use anchor_lang::prelude::*;
use instructions::*;
use state::UpkeepEval;

pub mod error;
pub mod instructions;
pub mod state;

declare_id!("FuPLcGPbbPtLpyNd2HQt32P9NcbidyTyVdB5yLdHpJLF");

#[program]
pub mod auto_raffle {
    use super::*;

    pub fn initialize(ctx: Context<Initialize>, entrance_fee: u64, interval: i64) -> Result<()> {
        instructions::initialize::initialize(ctx, entrance_fee, interval)
    }

    pub fn enter_raffle(ctx: Context<EnterRaffle>, payment: u64) -> Result<()> {
        instructions::enter_raffle::enter_raffle(ctx, payment)
    }

    pub fn check_upkeep(ctx: Context<CheckUpkeep>) -> Result<UpkeepEval> {
        instructions::check_upkeep::check_upkeep(ctx)
    }

    pub fn perform_upkeep(ctx: Context<PerformUpkeep>) -> Result<()> {
        instructions::perform_upkeep::perform_upkeep(ctx)
    }

    pub fn settle_raffle(ctx: Context<SettleRaffle>) -> Result<()> {
        instructions::settle_raffle::settle_raffle(ctx)
    }
}
