//! Open Flash Long Settlement
//!
//! Runs inside the pool callback after `quantity` underlying has been
//! released to the engine:
//!
//! 1. Price the open against the pre-borrow reserves and check `max_premium`
//! 2. Deposit the underlying into the option and mint long + short units
//! 3. Deliver the long units to the beneficiary
//! 4. Repay the pool in short units, topping up any deficit with underlying
//!    pulled from the caller, or rebate surplus shorts to the beneficiary

use crate::application::ports::{OptionServicePort, PoolServicePort, TokenLedgerPort};
use crate::application::use_cases::SettlementContext;
use crate::domain::option_series::OptionSeries;
use crate::domain::settlement::{FlashOperation, OpenSettlement, PremiumCalculator};
use crate::error::SettlementError;

/// Settle an open whose underlying loan is held by the engine.
pub fn settle_open<L, O, P>(
    ctx: &SettlementContext<'_, L, O, P>,
    operation: &FlashOperation,
    series: &OptionSeries,
) -> Result<OpenSettlement, SettlementError>
where
    L: TokenLedgerPort,
    O: OptionServicePort,
    P: PoolServicePort,
{
    let quantity = operation.quantity;

    let reserves = ctx.pools.reserves(operation.pair)?;
    let premium = PremiumCalculator::new(ctx.pools.fee()).open_premium(&reserves, series, quantity)?;
    if premium.loan_remainder > operation.bound {
        return Err(SettlementError::PremiumExceedsMax {
            premium: premium.loan_remainder,
            max_premium: operation.bound,
        });
    }

    ctx.ledger
        .transfer(series.underlying(), ctx.engine, series.address(), quantity)?;
    let receipt = ctx.options.mint(series.address(), ctx.engine)?;
    if receipt.long != quantity || receipt.short != premium.short_minted {
        return Err(SettlementError::InconsistentMint {
            expected_long: quantity,
            expected_short: premium.short_minted,
            long: receipt.long,
            short: receipt.short,
        });
    }

    ctx.ledger
        .transfer(series.address(), ctx.engine, operation.beneficiary, quantity)?;

    if premium.has_deficit() {
        ctx.ledger
            .transfer(series.redeem(), ctx.engine, operation.pair, premium.short_minted)?;
        if premium.loan_remainder > 0 {
            ctx.ledger.transfer_from(
                series.underlying(),
                operation.caller,
                ctx.engine,
                operation.pair,
                premium.loan_remainder,
            )?;
        }
    } else {
        ctx.ledger
            .transfer(series.redeem(), ctx.engine, operation.pair, premium.short_required)?;
        if premium.rebate > 0 {
            ctx.ledger
                .transfer(series.redeem(), ctx.engine, operation.beneficiary, premium.rebate)?;
        }
    }

    tracing::debug!(
        operation_id = %operation.id,
        short_minted = %premium.short_minted,
        short_required = %premium.short_required,
        loan_remainder = %premium.loan_remainder,
        rebate = %premium.rebate,
        "Open settled in callback"
    );

    Ok(OpenSettlement {
        operation_id: operation.id.clone(),
        quantity,
        short_minted: premium.short_minted,
        short_required: premium.short_required,
        loan_remainder: premium.loan_remainder,
        rebate: premium.rebate,
    })
}
