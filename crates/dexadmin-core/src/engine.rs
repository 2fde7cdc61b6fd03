use dexadmin_types::{Account, AccountId, MarketSnapshot, Rule, SuspendEpoch, SuspendTime};
use std::collections::BTreeMap;

use crate::error::Result;

/// The exchange capabilities the admin surface drives.
///
/// Implementations own all market, epoch and account state and are expected
/// to be safe to call from any number of concurrent requests. Calls may
/// block on the core's own locks; the admin server makes them from the
/// blocking thread pool. A suspension
/// request is a single call so that no intermediate state is observable
/// through the admin API.
pub trait ExchangeCore: Send + Sync {
    /// The exchange configuration as served to clients.
    fn config_msg(&self) -> serde_json::Value;

    /// Status of every market, keyed by market name.
    fn market_statuses(&self) -> BTreeMap<String, MarketSnapshot>;

    /// Status of one market, `None` if the market is unknown.
    fn market_status(&self, name: &str) -> Option<MarketSnapshot>;

    /// `None` if the market is unknown, otherwise whether it is running.
    fn market_running(&self, name: &str) -> Option<bool>;

    /// Schedule a suspension. The core decides which epoch is the last one
    /// to run. `None` means the request could not be honored.
    fn suspend_market(
        &self,
        name: &str,
        time: SuspendTime,
        persist_book: bool,
    ) -> Option<SuspendEpoch>;

    /// All known accounts
    fn accounts(&self) -> Result<Vec<Account>>;

    fn account_info(&self, id: &AccountId) -> Result<Account>;

    /// Mark an account as having broken a rule.
    fn penalize(&self, id: &AccountId, rule: Rule) -> Result<()>;

    /// Clear any penalty on an account.
    fn unban(&self, id: &AccountId) -> Result<()>;
}
