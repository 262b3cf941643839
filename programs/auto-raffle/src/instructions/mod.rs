pub use check_upkeep::*;
pub use enter_raffle::*;
pub use initialize::*;
pub use perform_upkeep::*;
pub use settle_raffle::*;

pub mod check_upkeep;
pub mod enter_raffle;
pub mod initialize;
pub mod perform_upkeep;
pub mod settle_raffle;
