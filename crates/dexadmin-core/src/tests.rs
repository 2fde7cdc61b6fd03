// Behavioral tests for the in-memory exchange core

#[cfg(test)]
mod tests {
    use crate::*;
    use chrono::{DateTime, Utc};
    use dexadmin_types::*;
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Arc;

    const EPOCH_MS: u64 = 6_000;

    fn fixed_clock(ms: i64) -> Clock {
        let t: DateTime<Utc> = unix_millis(ms).unwrap();
        Arc::new(move || t)
    }

    fn core_at(ms: i64) -> MemoryCore {
        let core = MemoryCore::with_clock(fixed_clock(ms));
        core.add_market("BTC_LTC", EPOCH_MS).unwrap();
        core
    }

    #[test]
    fn test_market_registration_and_status() {
        let core = core_at(60_000);

        let status = core.market_status("btc_ltc").unwrap();
        assert!(status.running);
        assert_eq!(status.epoch_duration_ms, EPOCH_MS);
        assert_eq!(status.active_epoch, 10);
        assert_eq!(status.start_epoch, 10);
        assert_eq!(status.suspend_epoch, None);

        assert_eq!(core.market_running("btc_ltc"), Some(true));
        assert_eq!(core.market_running("dcr_btc"), None);
        assert_eq!(core.market_statuses().len(), 1);
    }

    #[test]
    fn test_suspend_immediate_ends_active_epoch() {
        let core = core_at(61_000);

        let epoch = core
            .suspend_market("btc_ltc", SuspendTime::Immediate, false)
            .unwrap();
        assert_eq!(epoch.idx, 10);
        assert_eq!(epoch.end.timestamp_millis(), 66_000);

        let status = core.market_status("btc_ltc").unwrap();
        assert_eq!(status.suspend_epoch, Some(10));
        assert!(!status.persist_book);
        // Still trading until the final epoch closes.
        assert!(status.running);
    }

    #[test]
    fn test_suspend_at_future_time_rounds_up_to_boundary() {
        let core = core_at(60_000);
        let at = unix_millis(100_000).unwrap();

        let epoch = core
            .suspend_market("btc_ltc", SuspendTime::At(at), true)
            .unwrap();
        // 100_000 lies in epoch 16 ([96_000, 102_000)).
        assert_eq!(epoch.idx, 16);
        assert_eq!(epoch.end.timestamp_millis(), 102_000);
        assert!(epoch.end >= at);
    }

    #[test]
    fn test_market_stops_after_final_epoch() {
        let now = Arc::new(AtomicI64::new(60_000));
        let ticker = now.clone();
        let core = MemoryCore::with_clock(Arc::new(move || {
            unix_millis(ticker.load(Ordering::SeqCst)).unwrap()
        }));
        core.add_market("btc_ltc", EPOCH_MS).unwrap();

        let epoch = core
            .suspend_market("btc_ltc", SuspendTime::Immediate, true)
            .unwrap();
        assert_eq!(epoch.idx, 10);

        now.store(65_999, Ordering::SeqCst);
        assert_eq!(core.market_running("btc_ltc"), Some(true));

        now.store(66_000, Ordering::SeqCst);
        assert_eq!(core.market_running("btc_ltc"), Some(false));
        // Suspended markets cannot be suspended again.
        assert!(core
            .suspend_market("btc_ltc", SuspendTime::Immediate, true)
            .is_none());
    }

    #[test]
    fn test_lapsed_suspension_is_not_reported() {
        let now = Arc::new(AtomicI64::new(60_000));
        let ticker = now.clone();
        let core = MemoryCore::with_clock(Arc::new(move || {
            unix_millis(ticker.load(Ordering::SeqCst)).unwrap()
        }));
        core.add_market("btc_ltc", EPOCH_MS).unwrap();
        core.suspend_market("btc_ltc", SuspendTime::Immediate, false)
            .unwrap();

        now.store(120_000, Ordering::SeqCst);
        let status = core.market_status("btc_ltc").unwrap();
        assert!(!status.running);
        assert_eq!(status.active_epoch, 20);
        assert_eq!(status.suspend_epoch, None);
        assert_eq!(core.market_statuses()["btc_ltc"], status);

        // Still halted after the schedule is folded into the stopped state.
        assert!(core
            .suspend_market("btc_ltc", SuspendTime::Immediate, true)
            .is_none());
        let status = core.market_status("btc_ltc").unwrap();
        assert!(!status.running);
        assert_eq!(status.suspend_epoch, None);
    }

    #[test]
    fn test_suspend_unknown_or_stopped_market() {
        let core = core_at(60_000);
        assert!(core
            .suspend_market("dcr_btc", SuspendTime::Immediate, true)
            .is_none());

        core.stop_market("btc_ltc").unwrap();
        assert_eq!(core.market_running("btc_ltc"), Some(false));
        assert!(core
            .suspend_market("btc_ltc", SuspendTime::Immediate, true)
            .is_none());
    }

    #[test]
    fn test_penalize_and_unban() {
        let core = MemoryCore::new();
        let id = AccountId::new([9u8; HASH_SIZE]);
        core.add_account(Account::new(id));

        core.penalize(&id, Rule::PreimageReveal).unwrap();
        assert_eq!(core.account_info(&id).unwrap().broken_rule, Rule::PreimageReveal);

        core.unban(&id).unwrap();
        assert!(!core.account_info(&id).unwrap().is_banned());
    }

    #[test]
    fn test_penalize_unknown_account() {
        let core = MemoryCore::new();
        let id = AccountId::new([1u8; HASH_SIZE]);
        assert!(matches!(
            core.penalize(&id, Rule::LowFees),
            Err(CoreError::AccountNotFound(_))
        ));
        assert!(matches!(
            core.account_info(&id),
            Err(CoreError::AccountNotFound(_))
        ));
    }

    #[test]
    fn test_penalize_rejects_no_rule() {
        let core = MemoryCore::new();
        let id = AccountId::new([2u8; HASH_SIZE]);
        core.add_account(Account::new(id));
        assert!(matches!(
            core.penalize(&id, Rule::NoRule),
            Err(CoreError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_config_passthrough() {
        let mut core = MemoryCore::new();
        assert_eq!(core.config_msg(), serde_json::Value::Null);
        core.set_config(serde_json::json!({"epochlen": EPOCH_MS}));
        assert_eq!(core.config_msg()["epochlen"], EPOCH_MS);
    }
}
