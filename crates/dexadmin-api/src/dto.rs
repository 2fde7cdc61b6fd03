use chrono::{DateTime, Utc};
use dexadmin_types::{AccountId, EpochIndex, MarketSnapshot};
use serde::{Deserialize, Serialize};

/// Timestamps on the admin API are RFC 3339 in UTC with millisecond precision.
mod api_time {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(t: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&t.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|t| t.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketStatus {
    /// Omitted when the status is keyed by market name.
    #[serde(rename = "market", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub running: bool,
    #[serde(rename = "epochlen")]
    pub epoch_duration: u64,
    #[serde(rename = "activeepoch")]
    pub active_epoch: EpochIndex,
    #[serde(rename = "startepoch")]
    pub start_epoch: EpochIndex,
    #[serde(rename = "finalepoch", default, skip_serializing_if = "Option::is_none")]
    pub suspend_epoch: Option<EpochIndex>,
    #[serde(rename = "persistbook", default, skip_serializing_if = "Option::is_none")]
    pub persist_book: Option<bool>,
}

impl MarketStatus {
    pub fn from_snapshot(name: Option<String>, snapshot: &MarketSnapshot) -> Self {
        MarketStatus {
            name,
            running: snapshot.running,
            epoch_duration: snapshot.epoch_duration_ms,
            active_epoch: snapshot.active_epoch,
            start_epoch: snapshot.start_epoch,
            suspend_epoch: snapshot.suspend_epoch,
            // The persist flag only means something for a scheduled suspension.
            persist_book: snapshot.is_suspend_scheduled().then_some(snapshot.persist_book),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuspendResult {
    pub market: String,
    #[serde(rename = "finalepoch")]
    pub final_epoch: EpochIndex,
    #[serde(rename = "suspendtime", with = "api_time")]
    pub suspend_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BanResult {
    #[serde(rename = "accountid")]
    pub account_id: AccountId,
    #[serde(rename = "brokenrule")]
    pub broken_rule: u8,
    #[serde(rename = "bantime", with = "api_time")]
    pub ban_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnbanResult {
    #[serde(rename = "accountid")]
    pub account_id: AccountId,
    #[serde(rename = "unbantime", with = "api_time")]
    pub unban_time: DateTime<Utc>,
}
