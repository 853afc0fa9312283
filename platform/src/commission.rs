// Commission cascade engine
//
// On a qualifying investment the referrer chain is walked upwards, one
// configured level at a time, crediting each ancestor a percentage of the
// principal and appending an immutable ledger entry per level. The walk is
// iterative and bounded by the configured levels, so a malformed
// back-reference can never loop it. A chain shorter than the configured
// depth is a normal terminal condition.

use crate::{error::PlatformResult, storage::Storage};
use log::{debug, error};
use poweroyo_common::{
    commission::{commission_amount, CommissionEntry, CommissionSchedule, DistributionOutcome},
    crypto::Id,
    time::get_current_time_in_seconds,
    transaction::{TransactionKind, TransactionRecord, TransactionStatus},
    utils::format_coin,
};
use serde_json::json;

/// Walk the referrer chain and pay every active configured level
///
/// The immediate referral code not resolving is a silent no-op: historical
/// data may hold broken chains and they must never block the triggering
/// investment.
pub(crate) async fn distribute<S: Storage>(
    storage: &mut S,
    schedule: &CommissionSchedule,
    source: &Id,
    immediate_code: &str,
    principal: u64,
    investment: &Id,
) -> PlatformResult<DistributionOutcome> {
    let Some(mut current) = storage.get_account_by_referral_code(immediate_code).await? else {
        debug!(
            "referral code {} does not resolve, skipping commission cascade",
            immediate_code
        );
        return Ok(DistributionOutcome::default());
    };

    let now = get_current_time_in_seconds();
    let mut entries = Vec::new();
    let mut depth: u8 = 1;

    'levels: for config in schedule.active_levels() {
        // Advance the chain to this level's depth; a missing ancestor ends
        // the walk
        while depth < config.level {
            let Some(code) = current.referred_by.clone() else {
                break 'levels;
            };
            let Some(next) = storage.get_account_by_referral_code(&code).await? else {
                break 'levels;
            };
            current = next;
            depth += 1;
        }

        let amount = commission_amount(principal, config.rate_bps);
        let entry = CommissionEntry {
            beneficiary: current.id,
            source: *source,
            investment: *investment,
            level: config.level,
            rate_bps: config.rate_bps,
            amount,
            timestamp: now,
        };

        // The ledger entry comes first: its (investment, level) uniqueness
        // guard is what makes a duplicate invocation fail before any credit
        storage.append_commission_entry(&entry).await?;
        current.credit_earnings(amount)?;
        storage.save_account(&current).await?;
        storage
            .append_transaction(
                &TransactionRecord::new(
                    current.id,
                    TransactionKind::Referral,
                    amount,
                    TransactionStatus::Completed,
                    Some(*investment),
                    now,
                )
                .with_metadata(json!({
                    "level": config.level,
                    "source": source.to_string(),
                })),
            )
            .await?;

        debug!(
            "credited level {} commission of {} to {}",
            config.level,
            format_coin(amount),
            current.id
        );
        entries.push(entry);
    }

    Ok(DistributionOutcome::new(entries))
}

/// Best-effort entry point used by the investment flow
///
/// Any cascade failure is logged and swallowed so the already committed
/// investment is never rolled back; the levels applied before the failure
/// remain in the ledger for reconciliation.
pub(crate) async fn distribute_best_effort<S: Storage>(
    storage: &mut S,
    schedule: &CommissionSchedule,
    source: &Id,
    immediate_code: &str,
    principal: u64,
    investment: &Id,
) -> DistributionOutcome {
    match distribute(
        storage,
        schedule,
        source,
        immediate_code,
        principal,
        investment,
    )
    .await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(
                "commission cascade failed for investment {} of {}: {}",
                investment, source, e
            );
            DistributionOutcome::default()
        }
    }
}
