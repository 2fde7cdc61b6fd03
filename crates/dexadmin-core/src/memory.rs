use chrono::{DateTime, Utc};
use dexadmin_types::{
    unix_millis, Account, AccountId, EpochIndex, MarketSnapshot, Rule, SuspendEpoch, SuspendTime,
};
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::engine::ExchangeCore;
use crate::error::{CoreError, Result};

/// Source of the current time
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Debug, Clone)]
struct MemoryMarket {
    epoch_duration_ms: i64,
    start_epoch: EpochIndex,
    stopped: bool,
    suspend_epoch: Option<EpochIndex>,
    persist_book: bool,
}

impl MemoryMarket {
    fn active_epoch(&self, now: DateTime<Utc>) -> EpochIndex {
        now.timestamp_millis().div_euclid(self.epoch_duration_ms)
    }

    fn is_running(&self, active: EpochIndex) -> bool {
        if self.stopped {
            return false;
        }
        match self.suspend_epoch {
            Some(last) => active <= last,
            None => true,
        }
    }

    /// A schedule whose final epoch has closed has taken effect. Fold it into
    /// the stopped state.
    fn settle(&mut self, active: EpochIndex) {
        if self.suspend_epoch.is_some_and(|last| active > last) {
            self.stopped = true;
            self.suspend_epoch = None;
        }
    }

    fn snapshot(&self, now: DateTime<Utc>) -> MarketSnapshot {
        let active = self.active_epoch(now);
        MarketSnapshot {
            running: self.is_running(active),
            epoch_duration_ms: self.epoch_duration_ms as u64,
            active_epoch: active,
            start_epoch: self.start_epoch,
            // Only a pending suspension is reported.
            suspend_epoch: self.suspend_epoch.filter(|last| active <= *last),
            persist_book: self.persist_book,
        }
    }
}

/// In-memory exchange core
/// Suitable for testing and demo purposes. Epochs follow the wall clock: the
/// active epoch of a market is `now_ms / epoch_duration_ms`.
pub struct MemoryCore {
    config: serde_json::Value,
    markets: RwLock<BTreeMap<String, MemoryMarket>>,
    accounts: RwLock<BTreeMap<AccountId, Account>>,
    clock: Clock,
}

impl MemoryCore {
    /// Create an empty core driven by the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(Utc::now))
    }

    pub fn with_clock(clock: Clock) -> Self {
        MemoryCore {
            config: serde_json::Value::Null,
            markets: RwLock::new(BTreeMap::new()),
            accounts: RwLock::new(BTreeMap::new()),
            clock,
        }
    }

    /// Set the payload returned by [`ExchangeCore::config_msg`].
    pub fn set_config(&mut self, config: serde_json::Value) {
        self.config = config;
    }

    /// Register a running market. Its start epoch is the current epoch.
    pub fn add_market(&self, name: &str, epoch_duration_ms: u64) -> Result<()> {
        let duration = i64::try_from(epoch_duration_ms)
            .ok()
            .filter(|d| *d > 0)
            .ok_or_else(|| {
                CoreError::InvalidArgument(format!(
                    "epoch duration for market {} must be positive, got {}",
                    name, epoch_duration_ms
                ))
            })?;

        let mut market = MemoryMarket {
            epoch_duration_ms: duration,
            start_epoch: 0,
            stopped: false,
            suspend_epoch: None,
            persist_book: true,
        };
        market.start_epoch = market.active_epoch(self.now());

        let mut markets = self.markets.write().unwrap_or_else(PoisonError::into_inner);
        markets.insert(name.to_lowercase(), market);
        tracing::debug!(market = %name, epoch_duration_ms, "registered market");
        Ok(())
    }

    /// Halt a market outright, without a scheduled epoch.
    pub fn stop_market(&self, name: &str) -> Result<()> {
        let mut markets = self.markets.write().unwrap_or_else(PoisonError::into_inner);
        let market = markets
            .get_mut(&name.to_lowercase())
            .ok_or_else(|| CoreError::MarketNotFound(name.to_string()))?;
        market.stopped = true;
        Ok(())
    }

    pub fn add_account(&self, account: Account) {
        let mut accounts = self.accounts.write().unwrap_or_else(PoisonError::into_inner);
        accounts.insert(account.account_id, account);
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }
}

impl Default for MemoryCore {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick the last epoch to run for a suspension requested at `time`.
///
/// `Immediate` ends trading with the active epoch. `At(t)` ends it with the
/// epoch whose closing boundary is the first one at or after `t`, but never
/// before the active epoch.
fn final_epoch(time: SuspendTime, active: EpochIndex, duration_ms: i64) -> EpochIndex {
    match time {
        SuspendTime::Immediate => active,
        SuspendTime::At(t) => {
            let ms = t.timestamp_millis();
            let boundary = ms.div_euclid(duration_ms) + i64::from(ms.rem_euclid(duration_ms) != 0);
            (boundary - 1).max(active)
        }
    }
}

impl ExchangeCore for MemoryCore {
    fn config_msg(&self) -> serde_json::Value {
        self.config.clone()
    }

    fn market_statuses(&self) -> BTreeMap<String, MarketSnapshot> {
        let now = self.now();
        let markets = self.markets.read().unwrap_or_else(PoisonError::into_inner);
        markets
            .iter()
            .map(|(name, market)| (name.clone(), market.snapshot(now)))
            .collect()
    }

    fn market_status(&self, name: &str) -> Option<MarketSnapshot> {
        let now = self.now();
        let markets = self.markets.read().unwrap_or_else(PoisonError::into_inner);
        markets.get(name).map(|market| market.snapshot(now))
    }

    fn market_running(&self, name: &str) -> Option<bool> {
        self.market_status(name).map(|status| status.running)
    }

    fn suspend_market(
        &self,
        name: &str,
        time: SuspendTime,
        persist_book: bool,
    ) -> Option<SuspendEpoch> {
        let now = self.now();
        // Decide and record under one write lock so a concurrent running
        // check sees either the old or the new schedule.
        let mut markets = self.markets.write().unwrap_or_else(PoisonError::into_inner);
        let market = markets.get_mut(name)?;
        let active = market.active_epoch(now);
        market.settle(active);
        if !market.is_running(active) {
            return None;
        }

        let idx = final_epoch(time, active, market.epoch_duration_ms);
        let end_ms = idx.checked_add(1)?.checked_mul(market.epoch_duration_ms)?;
        let end = unix_millis(end_ms)?;

        market.suspend_epoch = Some(idx);
        market.persist_book = persist_book;
        tracing::info!(market = %name, final_epoch = idx, persist_book, "scheduled market suspension");

        Some(SuspendEpoch { idx, end })
    }

    fn accounts(&self) -> Result<Vec<Account>> {
        let accounts = self.accounts.read().unwrap_or_else(PoisonError::into_inner);
        Ok(accounts.values().cloned().collect())
    }

    fn account_info(&self, id: &AccountId) -> Result<Account> {
        let accounts = self.accounts.read().unwrap_or_else(PoisonError::into_inner);
        accounts
            .get(id)
            .cloned()
            .ok_or(CoreError::AccountNotFound(*id))
    }

    fn penalize(&self, id: &AccountId, rule: Rule) -> Result<()> {
        if !rule.is_punishable() {
            return Err(CoreError::InvalidArgument(format!(
                "rule {} is not punishable",
                rule.code()
            )));
        }
        let mut accounts = self.accounts.write().unwrap_or_else(PoisonError::into_inner);
        let account = accounts
            .get_mut(id)
            .ok_or(CoreError::AccountNotFound(*id))?;
        account.broken_rule = rule;
        tracing::info!(account = %id, rule = rule.code(), "account penalized");
        Ok(())
    }

    fn unban(&self, id: &AccountId) -> Result<()> {
        let mut accounts = self.accounts.write().unwrap_or_else(PoisonError::into_inner);
        let account = accounts
            .get_mut(id)
            .ok_or(CoreError::AccountNotFound(*id))?;
        account.broken_rule = Rule::NoRule;
        tracing::info!(account = %id, "account unbanned");
        Ok(())
    }
}
