use anchor_lang::prelude::*;

use crate::error::RaffleError;

// Space calculation:
// 8 (discriminator) +
// 1 (bump) +
// 32 (authority) +
// 8 (entrance_fee) +
// 8 (interval) +
// 8 (last_timestamp) +
// 1 (raffle_state) +
// 33 (pending_request: Option<Pubkey>) +
// 33 (recent_winner: Option<Pubkey>) =
// 132 total bytes
pub const RAFFLE_ACCOUNT_SIZE: usize = 8 + 1 + 32 + 8 + 8 + 8 + 1 + 33 + 33;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum RaffleState {
    /// Accepting entries.
    Open = 0,
    /// A randomness request is outstanding; entries are rejected until it
    /// is settled.
    Calculating = 1,
}

/// The raffle state machine. One round cycles Open -> Calculating -> Open;
/// the state flag doubles as the lock against interleaved round mutations.
#[account]
pub struct Raffle {
    pub bump: u8,
    /// The account that initialized the raffle. Recorded for reference only;
    /// no operation is gated on it.
    pub authority: Pubkey,
    /// Minimum payment per entry, in lamports. Immutable after init.
    pub entrance_fee: u64,
    /// Minimum seconds between upkeep executions. Immutable after init.
    pub interval: i64,
    /// Set at init, then updated only when a round settles.
    pub last_timestamp: i64,
    pub raffle_state: RaffleState,
    /// The randomness account of the outstanding request, if any. This is
    /// the correlation token a settlement must present.
    pub pending_request: Option<Pubkey>,
    /// Last round's winner. Query surface only; never read by the machine.
    pub recent_winner: Option<Pubkey>,
}

/// Result of evaluating the upkeep predicate: the four sub-conditions and
/// their conjunction. Returned from `check_upkeep` so off-chain triggers can
/// see exactly which gate is closed.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub struct UpkeepEval {
    pub needed: bool,
    pub is_open: bool,
    pub interval_elapsed: bool,
    pub has_balance: bool,
    pub has_entrants: bool,
}

impl Raffle {
    /// Validates an entry attempt without mutating anything.
    pub fn check_entry(&self, payment: u64) -> Result<()> {
        require!(
            self.raffle_state == RaffleState::Open,
            RaffleError::RaffleNotOpen
        );
        require!(payment >= self.entrance_fee, RaffleError::EntranceFeeNotMet);
        Ok(())
    }

    /// Evaluates the upkeep predicate. Pure; the same evaluation gates
    /// `perform_upkeep`, so a caller may never rely on a stale result.
    pub fn evaluate_upkeep(&self, now: i64, pool_balance: u64, entrant_count: u32) -> UpkeepEval {
        let is_open = self.raffle_state == RaffleState::Open;
        let interval_elapsed = now
            .checked_sub(self.last_timestamp)
            .map(|elapsed| elapsed >= self.interval)
            .unwrap_or(false);
        let has_balance = pool_balance > 0;
        let has_entrants = entrant_count > 0;

        UpkeepEval {
            needed: is_open && interval_elapsed && has_balance && has_entrants,
            is_open,
            interval_elapsed,
            has_balance,
            has_entrants,
        }
    }

    /// Transitions Open -> Calculating, recording the randomness request the
    /// round is now waiting on. The caller must have validated the upkeep
    /// predicate first; the state check here is the re-entrancy guard.
    pub fn begin_calculating(&mut self, request: Pubkey) -> Result<()> {
        require!(
            self.raffle_state == RaffleState::Open,
            RaffleError::UpkeepNotNeeded
        );
        self.raffle_state = RaffleState::Calculating;
        self.pending_request = Some(request);
        Ok(())
    }

    /// Rejects any settlement that does not present the outstanding request:
    /// never-issued ids, ids from already-settled rounds, and settlement
    /// attempts while no request is pending all fail identically.
    pub fn verify_request(&self, request: &Pubkey) -> Result<()> {
        require!(
            self.raffle_state == RaffleState::Calculating
                && self.pending_request == Some(*request),
            RaffleError::UnknownRequest
        );
        Ok(())
    }

    /// Transitions Calculating -> Open and records the round result. The
    /// entrant list and pool are reset by the caller in the same instruction.
    pub fn settle(&mut self, winner: Pubkey, now: i64) {
        self.raffle_state = RaffleState::Open;
        self.pending_request = None;
        self.recent_winner = Some(winner);
        self.last_timestamp = now;
    }
}

/// Maps a random word onto the entrant list. Plain modulo; the bias for
/// entrant counts far below 2^64 is negligible and is an accepted,
/// documented limitation of the selection rule.
pub fn winner_index(random_word: u64, entrant_count: u32) -> Result<u32> {
    require!(entrant_count > 0, RaffleError::EntrantIndexOutOfBounds);
    Ok((random_word % entrant_count as u64) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEE: u64 = 100_000_000; // 0.1 SOL
    const INTERVAL: i64 = 30;

    fn open_raffle() -> Raffle {
        Raffle {
            bump: 255,
            authority: Pubkey::new_unique(),
            entrance_fee: FEE,
            interval: INTERVAL,
            last_timestamp: 1_000,
            raffle_state: RaffleState::Open,
            pending_request: None,
            recent_winner: None,
        }
    }

    #[test]
    fn entry_rejected_below_fee() {
        let raffle = open_raffle();
        assert_eq!(
            raffle.check_entry(FEE - 1),
            Err(RaffleError::EntranceFeeNotMet.into())
        );
        assert_eq!(
            raffle.check_entry(0),
            Err(RaffleError::EntranceFeeNotMet.into())
        );
    }

    #[test]
    fn entry_accepted_at_or_above_fee() {
        let raffle = open_raffle();
        assert!(raffle.check_entry(FEE).is_ok());
        assert!(raffle.check_entry(FEE * 2).is_ok());
    }

    #[test]
    fn entry_rejected_while_calculating() {
        let mut raffle = open_raffle();
        raffle.begin_calculating(Pubkey::new_unique()).unwrap();
        assert_eq!(
            raffle.check_entry(FEE),
            Err(RaffleError::RaffleNotOpen.into())
        );
    }

    #[test]
    fn upkeep_needs_all_four_conditions() {
        let raffle = open_raffle();
        let after = raffle.last_timestamp + INTERVAL + 1;

        let eval = raffle.evaluate_upkeep(after, FEE, 1);
        assert!(eval.needed);
        assert!(eval.is_open && eval.interval_elapsed && eval.has_balance && eval.has_entrants);

        // No entrants: false regardless of elapsed time.
        let eval = raffle.evaluate_upkeep(after + 1_000_000, FEE, 0);
        assert!(!eval.needed);
        assert!(!eval.has_entrants);

        // No balance.
        let eval = raffle.evaluate_upkeep(after, 0, 1);
        assert!(!eval.needed);
        assert!(!eval.has_balance);

        // Interval not elapsed.
        let eval = raffle.evaluate_upkeep(raffle.last_timestamp + INTERVAL - 5, FEE, 1);
        assert!(!eval.needed);
        assert!(!eval.interval_elapsed);
    }

    #[test]
    fn upkeep_false_while_calculating() {
        let mut raffle = open_raffle();
        raffle.begin_calculating(Pubkey::new_unique()).unwrap();

        // Time, balance and entrants all hold; state alone closes the gate.
        let eval = raffle.evaluate_upkeep(raffle.last_timestamp + INTERVAL + 1, FEE, 3);
        assert!(!eval.needed);
        assert!(!eval.is_open);
        assert!(eval.interval_elapsed && eval.has_balance && eval.has_entrants);
    }

    #[test]
    fn upkeep_exactly_at_interval_boundary() {
        let raffle = open_raffle();
        let eval = raffle.evaluate_upkeep(raffle.last_timestamp + INTERVAL, FEE, 1);
        assert!(eval.needed);
    }

    #[test]
    fn begin_calculating_records_request() {
        let mut raffle = open_raffle();
        let request = Pubkey::new_unique();
        raffle.begin_calculating(request).unwrap();
        assert_eq!(raffle.raffle_state, RaffleState::Calculating);
        assert_eq!(raffle.pending_request, Some(request));
    }

    #[test]
    fn begin_calculating_rejected_while_calculating() {
        let mut raffle = open_raffle();
        raffle.begin_calculating(Pubkey::new_unique()).unwrap();
        assert_eq!(
            raffle.begin_calculating(Pubkey::new_unique()),
            Err(RaffleError::UpkeepNotNeeded.into())
        );
    }

    #[test]
    fn unknown_request_rejected() {
        let mut raffle = open_raffle();

        // Nothing requested yet.
        assert_eq!(
            raffle.verify_request(&Pubkey::new_unique()),
            Err(RaffleError::UnknownRequest.into())
        );

        let request = Pubkey::new_unique();
        raffle.begin_calculating(request).unwrap();

        // Wrong id while a different request is outstanding.
        assert_eq!(
            raffle.verify_request(&Pubkey::new_unique()),
            Err(RaffleError::UnknownRequest.into())
        );
        assert!(raffle.verify_request(&request).is_ok());

        // Same id again after the round settled.
        raffle.settle(Pubkey::new_unique(), 2_000);
        assert_eq!(
            raffle.verify_request(&request),
            Err(RaffleError::UnknownRequest.into())
        );
    }

    #[test]
    fn settle_resets_round() {
        let mut raffle = open_raffle();
        let request = Pubkey::new_unique();
        let winner = Pubkey::new_unique();
        raffle.begin_calculating(request).unwrap();

        raffle.settle(winner, 5_000);

        assert_eq!(raffle.raffle_state, RaffleState::Open);
        assert_eq!(raffle.pending_request, None);
        assert_eq!(raffle.recent_winner, Some(winner));
        assert_eq!(raffle.last_timestamp, 5_000);
    }

    #[test]
    fn winner_index_is_modulo() {
        assert_eq!(winner_index(0, 3).unwrap(), 0);
        assert_eq!(winner_index(7, 3).unwrap(), 1);
        assert_eq!(winner_index(u64::MAX, 1).unwrap(), 0);
        // Deterministic: same inputs always give the same index.
        assert_eq!(
            winner_index(12_345, 7).unwrap(),
            winner_index(12_345, 7).unwrap()
        );
    }

    #[test]
    fn winner_index_rejects_empty_list() {
        assert_eq!(
            winner_index(42, 0),
            Err(RaffleError::EntrantIndexOutOfBounds.into())
        );
    }

    // End-to-end round at the state-machine level: fee 0.1 SOL, interval
    // 30 s, three entrants, 31 s elapse, random word = 3k + 1.
    #[test]
    fn full_round_pays_second_entrant() {
        let mut raffle = open_raffle();
        let entrants: Vec<Pubkey> = (0..3).map(|_| Pubkey::new_unique()).collect();
        let mut pool: u64 = 0;

        for _ in &entrants {
            raffle.check_entry(FEE).unwrap();
            pool += FEE;
        }
        assert_eq!(pool, 300_000_000);

        let now = raffle.last_timestamp + 31;
        assert!(raffle.evaluate_upkeep(now, pool, entrants.len() as u32).needed);

        let request = Pubkey::new_unique();
        raffle.begin_calculating(request).unwrap();
        assert!(!raffle.evaluate_upkeep(now, pool, entrants.len() as u32).needed);

        raffle.verify_request(&request).unwrap();
        let index = winner_index(1_000_003, 3).unwrap(); // 1_000_003 % 3 == 1
        assert_eq!(index, 1);
        let winner = entrants[index as usize];

        raffle.settle(winner, now);
        let prize = pool;
        pool = 0;

        assert_eq!(prize, 300_000_000);
        assert_eq!(pool, 0);
        assert_eq!(raffle.recent_winner, Some(entrants[1]));
        assert_eq!(raffle.raffle_state, RaffleState::Open);
        assert!(raffle.last_timestamp >= now);
    }
}
