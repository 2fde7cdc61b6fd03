use chrono::{DateTime, SecondsFormat, Utc};
use dexadmin_core::ExchangeCore;
use dexadmin_types::{unix_millis, AccountId, Rule, SuspendTime, TypesError, MAX_RULE};
use serde::Deserialize;

use crate::error::ApiError;

/// Query parameters of `/market/:marketid/suspend`
#[derive(Debug, Default, Deserialize)]
pub struct SuspendQuery {
    /// Suspend time in milliseconds since the Unix epoch
    pub t: Option<String>,
    pub persist: Option<String>,
}

/// Query parameters of `/account/:accountid/ban`
#[derive(Debug, Default, Deserialize)]
pub struct BanQuery {
    pub rule: Option<String>,
}

/// Latest suspend time accepted, 9999-12-31T23:59:59.999Z. Later instants
/// have no RFC 3339 rendering and leave no room for the closing epoch.
pub const MAX_SUSPEND_MILLIS: i64 = 253_402_300_799_999;

// An empty query value is the same as an absent one.
fn present(raw: Option<&str>) -> Option<&str> {
    raw.filter(|s| !s.is_empty())
}

pub fn market_name(raw: &str) -> String {
    raw.to_lowercase()
}

/// Reject unknown markets and markets that are not currently running.
pub fn require_running_market(core: &dyn ExchangeCore, market: &str) -> Result<(), ApiError> {
    match core.market_running(market) {
        None => Err(ApiError::BadRequest(format!("unknown market {:?}", market))),
        Some(false) => Err(ApiError::BadRequest(format!("market {:?} not running", market))),
        Some(true) => Ok(()),
    }
}

/// Parse the `t` parameter. Absent means as soon as possible.
pub fn suspend_time(raw: Option<&str>, now: DateTime<Utc>) -> Result<SuspendTime, ApiError> {
    let Some(raw) = present(raw) else {
        return Ok(SuspendTime::Immediate);
    };

    let ms: i64 = raw
        .parse()
        .map_err(|e| ApiError::BadRequest(format!("invalid suspend time {:?}: {}", raw, e)))?;
    let time = unix_millis(ms).filter(|_| ms <= MAX_SUSPEND_MILLIS).ok_or_else(|| {
        ApiError::BadRequest(format!("invalid suspend time {:?}: value out of range", raw))
    })?;

    if time < now {
        return Err(ApiError::BadRequest(format!(
            "specified market suspend time is in the past: {}",
            time.to_rfc3339_opts(SecondsFormat::Millis, true)
        )));
    }
    Ok(SuspendTime::At(time))
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Parse the `persist` parameter. Books are kept unless told otherwise.
pub fn persist_book(raw: Option<&str>) -> Result<bool, ApiError> {
    match present(raw) {
        None => Ok(true),
        Some(s) => parse_bool(s).ok_or_else(|| {
            ApiError::BadRequest(format!("invalid persist book boolean {:?}: invalid syntax", s))
        }),
    }
}

pub fn account_id(raw: &str) -> Result<AccountId, ApiError> {
    AccountId::from_hex(raw).map_err(|e| match e {
        TypesError::AccountIdLength { .. } => ApiError::bad_request("account id has incorrect length"),
        other => ApiError::BadRequest(format!("could not decode account id: {}", other)),
    })
}

/// Parse the `rule` parameter. Only rules in `1..MAX_RULE` can be enforced.
pub fn rule(raw: Option<&str>) -> Result<Rule, ApiError> {
    let raw = present(raw).ok_or_else(|| ApiError::bad_request("rule not specified"))?;
    let code: i64 = raw
        .parse()
        .map_err(|e| ApiError::BadRequest(format!("bad rule: {}", e)))?;

    if code < 1 || code >= i64::from(MAX_RULE) {
        return Err(ApiError::bad_request("bad rule: not known or not punishable"));
    }
    u8::try_from(code)
        .ok()
        .and_then(|c| Rule::try_from(c).ok())
        .ok_or_else(|| ApiError::bad_request("bad rule: not known or not punishable"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn message(err: ApiError) -> String {
        match err {
            ApiError::BadRequest(msg) => msg,
            other => panic!("expected a bad request, got {:?}", other),
        }
    }

    #[test]
    fn test_market_name_lowercased() {
        assert_eq!(market_name("BTC_LTC"), "btc_ltc");
    }

    #[test]
    fn test_suspend_time_absent_is_immediate() {
        let now = Utc::now();
        assert_eq!(suspend_time(None, now).unwrap(), SuspendTime::Immediate);
        assert_eq!(suspend_time(Some(""), now).unwrap(), SuspendTime::Immediate);
    }

    #[test]
    fn test_suspend_time_zero_is_not_immediate() {
        // A parsed zero is the Unix epoch, which is in the past.
        let err = suspend_time(Some("0"), Utc::now()).unwrap_err();
        assert!(message(err).contains("in the past"));
    }

    #[test]
    fn test_suspend_time_future_and_past() {
        let now = unix_millis(1_000_000).unwrap();
        assert_eq!(
            suspend_time(Some("1000000"), now).unwrap(),
            SuspendTime::At(now)
        );
        let past = (now - Duration::seconds(1)).timestamp_millis().to_string();
        assert!(message(suspend_time(Some(&past), now).unwrap_err()).contains("in the past"));
    }

    #[test]
    fn test_suspend_time_malformed() {
        let msg = message(suspend_time(Some("soon"), Utc::now()).unwrap_err());
        assert!(msg.starts_with("invalid suspend time \"soon\""));
        let msg = message(suspend_time(Some(&i64::MAX.to_string()), Utc::now()).unwrap_err());
        assert!(msg.contains("out of range"));
    }

    #[test]
    fn test_suspend_time_far_future_out_of_range() {
        let now = Utc::now();
        let latest = DateTime::<Utc>::MAX_UTC.timestamp_millis().to_string();
        let msg = message(suspend_time(Some(&latest), now).unwrap_err());
        assert!(msg.starts_with("invalid suspend time"), "{}", msg);
        assert!(msg.contains("value out of range"));

        let beyond = (MAX_SUSPEND_MILLIS + 1).to_string();
        assert!(message(suspend_time(Some(&beyond), now).unwrap_err()).contains("out of range"));
        assert_eq!(
            suspend_time(Some(&MAX_SUSPEND_MILLIS.to_string()), now).unwrap(),
            SuspendTime::At(unix_millis(MAX_SUSPEND_MILLIS).unwrap())
        );
    }

    #[test]
    fn test_persist_book() {
        assert!(persist_book(None).unwrap());
        assert!(persist_book(Some("")).unwrap());
        assert!(!persist_book(Some("false")).unwrap());
        assert!(!persist_book(Some("0")).unwrap());
        assert!(persist_book(Some("T")).unwrap());
        assert!(message(persist_book(Some("yes")).unwrap_err()).contains("invalid persist book boolean"));
    }

    #[test]
    fn test_account_id_errors() {
        assert_eq!(
            message(account_id("abcd").unwrap_err()),
            "account id has incorrect length"
        );
        assert!(message(account_id("xyz").unwrap_err()).starts_with("could not decode account id"));
        assert!(account_id(&"0f".repeat(32)).is_ok());
    }

    #[test]
    fn test_rule_bounds() {
        assert_eq!(message(rule(None).unwrap_err()), "rule not specified");
        assert!(message(rule(Some("one")).unwrap_err()).starts_with("bad rule: "));
        assert_eq!(
            message(rule(Some("0")).unwrap_err()),
            "bad rule: not known or not punishable"
        );
        assert_eq!(
            message(rule(Some(&MAX_RULE.to_string())).unwrap_err()),
            "bad rule: not known or not punishable"
        );
        assert!(rule(Some("-3")).is_err());
        assert_eq!(rule(Some("1")).unwrap(), Rule::PreimageReveal);
        assert_eq!(rule(Some("4")).unwrap(), Rule::LowFees);
    }
}
