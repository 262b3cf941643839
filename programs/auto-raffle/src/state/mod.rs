pub use entrants::*;
pub use raffle::*;
pub use vault::*;

pub mod entrants;
pub mod raffle;
pub mod vault;
