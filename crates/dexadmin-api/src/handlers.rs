use axum::extract::{Path, Query, State};
use chrono::Utc;
use dexadmin_core::ExchangeCore;
use dexadmin_types::Account;
use std::collections::BTreeMap;

use crate::codec::PrettyJson;
use crate::dto::{BanResult, MarketStatus, SuspendResult, UnbanResult};
use crate::error::ApiError;
use crate::penalty;
use crate::scheduler::{self, SuspendRequest};
use crate::state::AppState;
use crate::validate::{self, BanQuery, SuspendQuery};

const PONG: &str = "pong";

/// Run exchange core calls on the blocking pool. The core may wait on its
/// own locks and must not stall the async workers.
async fn with_core<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&dyn ExchangeCore) -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    let core = state.core.clone();
    tokio::task::spawn_blocking(move || f(core.as_ref()))
        .await
        .map_err(|e| ApiError::Internal(format!("exchange core task failed: {}", e)))?
}

/// Liveness check
pub async fn ping() -> PrettyJson<&'static str> {
    PrettyJson(PONG)
}

/// Exchange configuration, passed through as-is
pub async fn config(State(state): State<AppState>) -> Result<PrettyJson<serde_json::Value>, ApiError> {
    with_core(&state, |core| Ok(PrettyJson(core.config_msg()))).await
}

/// Status of every market, keyed by name
pub async fn markets(
    State(state): State<AppState>,
) -> Result<PrettyJson<BTreeMap<String, MarketStatus>>, ApiError> {
    with_core(&state, |core| {
        let statuses = core
            .market_statuses()
            .into_iter()
            .map(|(name, snapshot)| (name, MarketStatus::from_snapshot(None, &snapshot)))
            .collect();
        Ok(PrettyJson(statuses))
    })
    .await
}

pub async fn market_info(
    State(state): State<AppState>,
    Path(market): Path<String>,
) -> Result<PrettyJson<MarketStatus>, ApiError> {
    let market = validate::market_name(&market);
    with_core(&state, move |core| {
        let snapshot = core
            .market_status(&market)
            .ok_or_else(|| ApiError::BadRequest(format!("unknown market {:?}", market)))?;
        Ok(PrettyJson(MarketStatus::from_snapshot(Some(market), &snapshot)))
    })
    .await
}

/// `/market/:marketid/suspend?t=EPOCH-MS&persist=BOOL`
pub async fn suspend(
    State(state): State<AppState>,
    Path(market): Path<String>,
    Query(query): Query<SuspendQuery>,
) -> Result<PrettyJson<SuspendResult>, ApiError> {
    let market = validate::market_name(&market);
    with_core(&state, move |core| {
        validate::require_running_market(core, &market)?;
        let time = validate::suspend_time(query.t.as_deref(), Utc::now())?;
        let persist_book = validate::persist_book(query.persist.as_deref())?;

        let req = SuspendRequest {
            market,
            time,
            persist_book,
        };
        scheduler::schedule_suspension(core, &req).map(PrettyJson)
    })
    .await
}

pub async fn accounts(State(state): State<AppState>) -> Result<PrettyJson<Vec<Account>>, ApiError> {
    with_core(&state, |core| {
        core.accounts()
            .map(PrettyJson)
            .map_err(|e| ApiError::Internal(format!("failed to retrieve accounts: {}", e)))
    })
    .await
}

pub async fn account_info(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Result<PrettyJson<Account>, ApiError> {
    let account_id = validate::account_id(&account_id)?;
    with_core(&state, move |core| {
        core.account_info(&account_id)
            .map(PrettyJson)
            .map_err(|e| ApiError::Internal(format!("failed to retrieve account: {}", e)))
    })
    .await
}

/// `/account/:accountid/ban?rule=RULE`
pub async fn ban(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    Query(query): Query<BanQuery>,
) -> Result<PrettyJson<BanResult>, ApiError> {
    let account_id = validate::account_id(&account_id)?;
    let rule = validate::rule(query.rule.as_deref())?;
    with_core(&state, move |core| {
        penalty::apply_penalty(core, account_id, rule, Utc::now()).map(PrettyJson)
    })
    .await
}

pub async fn unban(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Result<PrettyJson<UnbanResult>, ApiError> {
    let account_id = validate::account_id(&account_id)?;
    with_core(&state, move |core| {
        penalty::lift_penalty(core, account_id, Utc::now()).map(PrettyJson)
    })
    .await
}
