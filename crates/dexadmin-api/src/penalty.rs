use chrono::{DateTime, Utc};
use dexadmin_core::ExchangeCore;
use dexadmin_types::{AccountId, Rule};

use crate::dto::{BanResult, UnbanResult};
use crate::error::ApiError;

/// Penalize an account for breaking `rule`.
pub fn apply_penalty(
    core: &dyn ExchangeCore,
    account_id: AccountId,
    rule: Rule,
    now: DateTime<Utc>,
) -> Result<BanResult, ApiError> {
    core.penalize(&account_id, rule)
        .map_err(|e| ApiError::Internal(format!("failed to ban account: {}", e)))?;

    tracing::info!(account = %account_id, rule = rule.code(), "account banned");
    Ok(BanResult {
        account_id,
        broken_rule: rule.code(),
        ban_time: now,
    })
}

/// Clear the penalties on an account.
pub fn lift_penalty(
    core: &dyn ExchangeCore,
    account_id: AccountId,
    now: DateTime<Utc>,
) -> Result<UnbanResult, ApiError> {
    core.unban(&account_id)
        .map_err(|e| ApiError::Internal(format!("failed to unban account: {}", e)))?;

    tracing::info!(account = %account_id, "account unbanned");
    Ok(UnbanResult {
        account_id,
        unban_time: now,
    })
}
