use anchor_lang::error_code;

#[error_code]
pub enum RaffleError {
    Overflow,
    #[msg("Entrance fee must be greater than zero")]
    InvalidEntranceFee,
    #[msg("Upkeep interval must be greater than zero")]
    InvalidInterval,
    #[msg("Payment does not meet the entrance fee")]
    EntranceFeeNotMet,
    #[msg("Raffle is not open for entries")]
    RaffleNotOpen,
    #[msg("Upkeep conditions are not met")]
    UpkeepNotNeeded,
    #[msg("Randomness account data could not be parsed")]
    InvalidRandomnessAccount,
    #[msg("Randomness account was not committed at the previous slot")]
    RandomnessAlreadyRevealed,
    #[msg("Request does not match the outstanding randomness request")]
    UnknownRequest,
    #[msg("Randomness has not been revealed yet")]
    RandomnessNotResolved,
    #[msg("Winner account does not match the selected entrant")]
    WinnerMismatch,
    #[msg("Prize transfer to the winner failed")]
    PayoutFailed,
    #[msg("Entry payment transfer failed")]
    TransferFailed,
    #[msg("Entrant index is out of bounds")]
    EntrantIndexOutOfBounds,
}
