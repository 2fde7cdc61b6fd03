use serde::{Deserialize, Serialize};

use crate::epoch::EpochIndex;

/// Market state as reported by the exchange core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub running: bool,
    pub epoch_duration_ms: u64,
    pub active_epoch: EpochIndex,
    pub start_epoch: EpochIndex,
    /// Final epoch of a scheduled suspension, if any.
    pub suspend_epoch: Option<EpochIndex>,
    /// Whether the book survives the scheduled suspension. Only meaningful
    /// when `suspend_epoch` is set.
    pub persist_book: bool,
}

impl MarketSnapshot {
    pub fn is_suspend_scheduled(&self) -> bool {
        self.suspend_epoch.is_some()
    }
}
