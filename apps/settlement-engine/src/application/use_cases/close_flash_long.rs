//! Close Flash Long Settlement
//!
//! Runs inside the pool callback after `quantity` short units have been
//! released to the engine:
//!
//! 1. Price the close against the pre-borrow reserves and check `min_payout`
//! 2. Pull the proportional long units from the caller into the option,
//!    forward the borrowed shorts, and close to the engine
//! 3. Repay the pool in underlying and pay out the surplus, or pull the
//!    shortfall from the caller when they accepted a zero payout

use crate::application::ports::{OptionServicePort, PoolServicePort, TokenLedgerPort};
use crate::application::use_cases::SettlementContext;
use crate::domain::option_series::OptionSeries;
use crate::domain::settlement::{CloseSettlement, FlashOperation, PremiumCalculator};
use crate::error::SettlementError;

/// Settle a close whose short-unit loan is held by the engine.
pub fn settle_close<L, O, P>(
    ctx: &SettlementContext<'_, L, O, P>,
    operation: &FlashOperation,
    series: &OptionSeries,
) -> Result<CloseSettlement, SettlementError>
where
    L: TokenLedgerPort,
    O: OptionServicePort,
    P: PoolServicePort,
{
    let quantity = operation.quantity;
    let min_payout = operation.bound;

    let reserves = ctx.pools.reserves(operation.pair)?;
    let premium =
        PremiumCalculator::new(ctx.pools.fee()).close_premium(&reserves, series, quantity)?;
    if premium.loan_remainder > 0 {
        if min_payout > 0 {
            return Err(SettlementError::RemainderNotAccepted {
                remainder: premium.loan_remainder,
                min_payout,
            });
        }
    } else if premium.payout < min_payout {
        return Err(SettlementError::PayoutBelowMin {
            payout: premium.payout,
            min_payout,
        });
    }

    // One long unit per underlying unit released.
    let long_required = premium.underlying_from_close;
    ctx.ledger.transfer_from(
        series.address(),
        operation.caller,
        ctx.engine,
        series.address(),
        long_required,
    )?;
    ctx.ledger
        .transfer(series.redeem(), ctx.engine, series.address(), quantity)?;
    let receipt = ctx.options.close(series.address(), ctx.engine)?;
    if receipt.underlying_released != premium.underlying_from_close {
        return Err(SettlementError::InconsistentClose {
            expected: premium.underlying_from_close,
            released: receipt.underlying_released,
        });
    }

    if premium.loan_remainder > 0 {
        ctx.ledger.transfer(
            series.underlying(),
            ctx.engine,
            operation.pair,
            receipt.underlying_released,
        )?;
        ctx.ledger.transfer_from(
            series.underlying(),
            operation.caller,
            ctx.engine,
            operation.pair,
            premium.loan_remainder,
        )?;
    } else {
        ctx.ledger.transfer(
            series.underlying(),
            ctx.engine,
            operation.pair,
            premium.underlying_required,
        )?;
        if premium.payout > 0 {
            ctx.ledger.transfer(
                series.underlying(),
                ctx.engine,
                operation.beneficiary,
                premium.payout,
            )?;
        }
    }

    tracing::debug!(
        operation_id = %operation.id,
        output_underlying = %receipt.underlying_released,
        underlying_required = %premium.underlying_required,
        payout = %premium.payout,
        loan_remainder = %premium.loan_remainder,
        "Close settled in callback"
    );

    Ok(CloseSettlement {
        operation_id: operation.id.clone(),
        quantity,
        output_underlying: receipt.underlying_released,
        underlying_required: premium.underlying_required,
        payout: premium.payout,
        loan_remainder: premium.loan_remainder,
    })
}
