use anchor_lang::prelude::*;

// 8 discriminator + 1 bump
pub const VAULT_ACCOUNT_SIZE: usize = 8 + 1;

/// Holds the prize pool. A PDA owned by the program, so lamports can be
/// moved out by direct balance adjustment at settlement.
#[account]
pub struct Vault {
    pub bump: u8,
}

impl Vault {
    /// The prize pool: everything above the vault's own rent-exempt floor.
    /// The floor stays behind so the account survives across rounds.
    pub fn pool_balance(vault_lamports: u64, rent_floor: u64) -> u64 {
        vault_lamports.saturating_sub(rent_floor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_is_balance_above_rent_floor() {
        assert_eq!(Vault::pool_balance(1_000, 400), 600);
        assert_eq!(Vault::pool_balance(400, 400), 0);
        // A vault somehow below its floor exposes no pool.
        assert_eq!(Vault::pool_balance(100, 400), 0);
    }
}
