use dexadmin_core::ExchangeCore;
use dexadmin_types::SuspendTime;

use crate::dto::SuspendResult;
use crate::error::ApiError;

/// A validated suspension request for a running market.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuspendRequest {
    pub market: String,
    pub time: SuspendTime,
    pub persist_book: bool,
}

/// Ask the core to schedule the suspension and report the epoch it chose.
///
/// The final epoch and its end time come straight from the core. A refusal
/// here means the core disagrees with a request that already passed
/// validation, so it is a server fault.
pub fn schedule_suspension(
    core: &dyn ExchangeCore,
    req: &SuspendRequest,
) -> Result<SuspendResult, ApiError> {
    let epoch = core
        .suspend_market(&req.market, req.time, req.persist_book)
        .ok_or_else(|| ApiError::Internal(format!("failed to suspend market {}", req.market)))?;

    tracing::info!(
        market = %req.market,
        final_epoch = epoch.idx,
        persist_book = req.persist_book,
        "market suspension scheduled"
    );

    Ok(SuspendResult {
        market: req.market.clone(),
        final_epoch: epoch.idx,
        suspend_time: epoch.end,
    })
}
