mod account;
mod rule;
mod epoch;
mod market;
mod error;

pub use account::{Account, AccountId, HASH_SIZE};
pub use rule::{Rule, MAX_RULE};
pub use epoch::{unix_millis, EpochIndex, SuspendEpoch, SuspendTime};
pub use market::MarketSnapshot;
pub use error::{TypesError, Result};
