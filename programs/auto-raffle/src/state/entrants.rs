use std::cell::{Ref, RefMut};

use anchor_lang::prelude::*;
use arrayref::array_ref;

use crate::error::RaffleError;

// 8 discriminator + 4 total; entrant keys are written raw after the header
pub const ENTRANTS_BASE_SIZE: usize = 8 + 4;

/// Ordered, append-only entrant list for the current round. Insertion order
/// is the domain the winner index is taken over, so index positions are
/// stable until the round settles. The keys live as packed 32-byte slots in
/// the raw account data past the Anchor header; the account is grown by
/// realloc as entries arrive.
#[account]
pub struct Entrants {
    /// Number of entries in the current round.
    pub total: u32,
}

impl Entrants {
    /// Account size needed to hold `total` entries.
    pub fn size_for(total: u32) -> usize {
        ENTRANTS_BASE_SIZE + 32 * total as usize
    }

    /// The entrant occupying list slot `index`.
    pub fn get_entrant(entrants_data: Ref<&mut [u8]>, index: u32) -> Result<Pubkey> {
        let start = Entrants::size_for(index);
        require!(
            entrants_data.len() >= start + 32,
            RaffleError::EntrantIndexOutOfBounds
        );
        Ok(Pubkey::new_from_array(*array_ref![entrants_data, start, 32]))
    }

    /// Appends an entrant into the next slot. The caller is responsible for
    /// having grown the account first. Duplicate keys are fine; each entry
    /// is its own slot.
    pub fn append_entrant(
        &mut self,
        mut entrants_data: RefMut<&mut [u8]>,
        entrant: Pubkey,
    ) -> Result<()> {
        let start = Entrants::size_for(self.total);
        require!(
            entrants_data.len() >= start + 32,
            RaffleError::EntrantIndexOutOfBounds
        );
        entrants_data[start..start + 32].copy_from_slice(&entrant.to_bytes());
        self.total = self.total.checked_add(1).ok_or(RaffleError::Overflow)?;
        Ok(())
    }

    /// Resets the list for the next round. Stale key bytes past the header
    /// are dead data; slots are overwritten as the next round fills.
    pub fn clear(&mut self) {
        self.total = 0;
    }
}
