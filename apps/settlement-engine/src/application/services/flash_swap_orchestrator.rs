//! Flash-Swap Orchestrator
//!
//! Drives one flash operation through `Idle -> LoanRequested -> InCallback
//! -> Settled -> Idle` inside a single atomic unit:
//!
//! 1. Validate the request and resolve the option series
//! 2. Derive the canonical pool for `(redeem, underlying)`
//! 3. Arm the callback gate and borrow from the pool with the operation as
//!    payload
//! 4. In the pool's callback, authenticate through the gate and run the
//!    open or close settlement step
//! 5. Redeem the pending token for the outcome, commit, publish the event
//!
//! Any error reverts the atomic unit and resets the gate.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;

use crate::application::dto::{CloseFlashLongCommand, OpenFlashLongCommand};
use crate::application::ports::{
    AtomicUnitPort, EventPublisherPort, FlashSwapCallback, FlashSwapCallee, FlashSwapRequest,
    OptionServicePort, PoolServicePort, TokenLedgerPort,
};
use crate::application::use_cases::{SettlementContext, settle_close, settle_open};
use crate::config::SettlementConfig;
use crate::domain::amm::{PairFactory, sort_tokens};
use crate::domain::option_series::OptionSeries;
use crate::domain::settlement::{
    CloseSettlement, EngineState, FlashClosed, FlashKind, FlashOpened, FlashOperation,
    OpenSettlement, SettlementEvent, SettlementOutcome,
};
use crate::domain::shared::{Address, OperationId};
use crate::error::SettlementError;
use crate::observability::{record_rejection, record_settlement};

use super::callback_gate::CallbackGate;

/// Static parameters of one engine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// The engine's own settlement address.
    pub engine_address: Address,
    /// Canonical pool derivation parameters.
    pub pairs: PairFactory,
}

impl From<&SettlementConfig> for EngineSettings {
    fn from(config: &SettlementConfig) -> Self {
        Self {
            engine_address: config.engine_address,
            pairs: config.pair_factory(),
        }
    }
}

/// Caller-facing request common to both directions.
struct FlashRequest {
    kind: FlashKind,
    caller: Address,
    option: Address,
    quantity: u128,
    bound: u128,
    beneficiary: Address,
}

/// Flash-swap settlement engine.
pub struct FlashSettlementEngine<L, O, P, A, E>
where
    L: TokenLedgerPort,
    O: OptionServicePort,
    P: PoolServicePort,
    A: AtomicUnitPort,
    E: EventPublisherPort,
{
    ledger: Arc<L>,
    options: Arc<O>,
    pools: Arc<P>,
    atomic: Arc<A>,
    events: Arc<E>,
    settings: EngineSettings,
    gate: CallbackGate,
}

impl<L, O, P, A, E> FlashSettlementEngine<L, O, P, A, E>
where
    L: TokenLedgerPort,
    O: OptionServicePort,
    P: PoolServicePort,
    A: AtomicUnitPort,
    E: EventPublisherPort,
{
    /// Create a new engine.
    pub fn new(
        settings: EngineSettings,
        ledger: Arc<L>,
        options: Arc<O>,
        pools: Arc<P>,
        atomic: Arc<A>,
        events: Arc<E>,
    ) -> Self {
        Self {
            ledger,
            options,
            pools,
            atomic,
            events,
            settings,
            gate: CallbackGate::new(settings.engine_address),
        }
    }

    /// The engine's own settlement address.
    pub const fn address(&self) -> Address {
        self.settings.engine_address
    }

    /// Current lifecycle state.
    pub fn state(&self) -> EngineState {
        self.gate.state()
    }

    /// Open a leveraged long: borrow `quantity` underlying, mint, repay in
    /// short units.
    pub fn open_flash_long(
        &self,
        command: OpenFlashLongCommand,
    ) -> Result<OpenSettlement, SettlementError> {
        let request = FlashRequest {
            kind: FlashKind::Open,
            caller: command.caller,
            option: command.option,
            quantity: command.quantity,
            bound: command.max_premium,
            beneficiary: command.beneficiary,
        };
        match self.execute(&request)? {
            SettlementOutcome::Open(settlement) => Ok(settlement),
            other => Err(SettlementError::unexpected_outcome(FlashKind::Open, other)),
        }
    }

    /// Close a leveraged long: borrow `quantity` short units, close, repay in
    /// underlying.
    pub fn close_flash_long(
        &self,
        command: CloseFlashLongCommand,
    ) -> Result<CloseSettlement, SettlementError> {
        let request = FlashRequest {
            kind: FlashKind::Close,
            caller: command.caller,
            option: command.option,
            quantity: command.quantity,
            bound: command.min_payout,
            beneficiary: command.beneficiary,
        };
        match self.execute(&request)? {
            SettlementOutcome::Close(settlement) => Ok(settlement),
            other => Err(SettlementError::unexpected_outcome(FlashKind::Close, other)),
        }
    }

    fn execute(&self, request: &FlashRequest) -> Result<SettlementOutcome, SettlementError> {
        let started = Instant::now();
        let kind = request.kind;

        let result = self.validate(request).and_then(|()| {
            self.atomic.run(|| {
                let series = self.options.series(request.option)?;
                let operation = self.prepare(request, &series)?;
                self.borrow(&operation, &series)
            })
        });

        match result {
            Ok(outcome) => {
                self.after_commit(request, &outcome, started);
                Ok(outcome)
            }
            Err(err) => {
                record_rejection(kind.as_str(), err.category().as_str(), err.code().reason());
                tracing::warn!(
                    kind = %kind,
                    caller = %request.caller,
                    option = %request.option,
                    quantity = %request.quantity,
                    code = %err.code(),
                    category = %err.category(),
                    error = %err,
                    "Flash operation rejected"
                );
                Err(err)
            }
        }
    }

    fn validate(&self, request: &FlashRequest) -> Result<(), SettlementError> {
        if request.quantity == 0 {
            return Err(SettlementError::ZeroQuantity);
        }
        if request.beneficiary.is_zero() {
            return Err(SettlementError::ZeroBeneficiary);
        }
        if request.beneficiary == self.settings.engine_address {
            return Err(SettlementError::ReservedBeneficiary {
                beneficiary: request.beneficiary,
            });
        }
        Ok(())
    }

    fn prepare(
        &self,
        request: &FlashRequest,
        series: &OptionSeries,
    ) -> Result<FlashOperation, SettlementError> {
        let pair = self
            .settings
            .pairs
            .pair_for(series.redeem(), series.underlying())?;
        Ok(FlashOperation {
            id: OperationId::generate(),
            kind: request.kind,
            option: series.address(),
            pair,
            quantity: request.quantity,
            bound: request.bound,
            caller: request.caller,
            beneficiary: request.beneficiary,
        })
    }

    fn borrow(
        &self,
        operation: &FlashOperation,
        series: &OptionSeries,
    ) -> Result<SettlementOutcome, SettlementError> {
        let pending = self.gate.arm(operation)?;

        match self.request_loan(operation, series) {
            Ok(()) => self.gate.finish(pending).inspect_err(|_| self.gate.abort()),
            Err(err) => {
                self.gate.abort();
                Err(err)
            }
        }
    }

    fn request_loan(
        &self,
        operation: &FlashOperation,
        series: &OptionSeries,
    ) -> Result<(), SettlementError> {
        let reserves = self.pools.reserves(operation.pair)?;
        let borrowed = operation.kind.borrowed_token(series);
        let (amount0_out, amount1_out) = reserves.amounts_out(borrowed, operation.quantity)?;
        let request = FlashSwapRequest {
            pair: operation.pair,
            amount0_out,
            amount1_out,
            sender: self.settings.engine_address,
            to: self.settings.engine_address,
            payload: operation.encode()?,
        };
        tracing::debug!(
            operation_id = %operation.id,
            kind = %operation.kind,
            pair = %operation.pair,
            amount0_out = %amount0_out,
            amount1_out = %amount1_out,
            "Loan requested"
        );
        self.pools.flash_swap(request, self)?;
        Ok(())
    }

    fn after_commit(&self, request: &FlashRequest, outcome: &SettlementOutcome, started: Instant) {
        let occurred_at = Utc::now();
        let elapsed = started.elapsed().as_secs_f64();

        let event = match outcome {
            SettlementOutcome::Open(s) => {
                let (label, units) = if s.loan_remainder > 0 {
                    ("remainder", s.loan_remainder)
                } else if s.rebate > 0 {
                    ("rebate", s.rebate)
                } else {
                    ("even", 0)
                };
                record_settlement(FlashKind::Open.as_str(), label, units, elapsed);
                tracing::info!(
                    operation_id = %s.operation_id,
                    caller = %request.caller,
                    option = %request.option,
                    quantity = %s.quantity,
                    loan_remainder = %s.loan_remainder,
                    rebate = %s.rebate,
                    "Flash long opened"
                );
                SettlementEvent::Opened(FlashOpened {
                    operation_id: s.operation_id.clone(),
                    caller: request.caller,
                    beneficiary: request.beneficiary,
                    option: request.option,
                    quantity: s.quantity,
                    loan_remainder: s.loan_remainder,
                    rebate: s.rebate,
                    occurred_at,
                })
            }
            SettlementOutcome::Close(s) => {
                let (label, units) = if s.loan_remainder > 0 {
                    ("remainder", s.loan_remainder)
                } else if s.payout > 0 {
                    ("payout", s.payout)
                } else {
                    ("even", 0)
                };
                record_settlement(FlashKind::Close.as_str(), label, units, elapsed);
                tracing::info!(
                    operation_id = %s.operation_id,
                    caller = %request.caller,
                    option = %request.option,
                    quantity = %s.quantity,
                    output_underlying = %s.output_underlying,
                    payout = %s.payout,
                    "Flash long closed"
                );
                SettlementEvent::Closed(FlashClosed {
                    operation_id: s.operation_id.clone(),
                    caller: request.caller,
                    beneficiary: request.beneficiary,
                    option: request.option,
                    quantity: s.quantity,
                    output_underlying: s.output_underlying,
                    payout: s.payout,
                    occurred_at,
                })
            }
        };

        if let Err(e) = self.events.publish_event(event) {
            tracing::error!(error = %e, "Failed to publish settlement event");
        }
    }

    fn check_loan(
        &self,
        operation: &FlashOperation,
        series: &OptionSeries,
        callback: &FlashSwapCallback,
    ) -> Result<(), SettlementError> {
        let borrowed = operation.kind.borrowed_token(series);
        let (token0, _) = sort_tokens(series.redeem(), series.underlying())?;
        let (expected0, expected1) = if borrowed == token0 {
            (operation.quantity, 0)
        } else {
            (0, operation.quantity)
        };
        if (callback.amount0, callback.amount1) != (expected0, expected1) {
            return Err(SettlementError::UnexpectedLoanAmount {
                expected0,
                expected1,
                amount0: callback.amount0,
                amount1: callback.amount1,
            });
        }
        Ok(())
    }
}

impl<L, O, P, A, E> FlashSwapCallee for FlashSettlementEngine<L, O, P, A, E>
where
    L: TokenLedgerPort,
    O: OptionServicePort,
    P: PoolServicePort,
    A: AtomicUnitPort,
    E: EventPublisherPort,
{
    fn on_flash_swap(&self, callback: FlashSwapCallback) -> Result<(), SettlementError> {
        let operation = self.gate.authorize(&callback)?;
        tracing::debug!(
            operation_id = %operation.id,
            kind = %operation.kind,
            pair = %callback.caller,
            "Flash swap callback authorized"
        );

        let series = self.options.series(operation.option)?;
        self.check_loan(&operation, &series, &callback)?;

        let ctx = SettlementContext {
            ledger: self.ledger.as_ref(),
            options: self.options.as_ref(),
            pools: self.pools.as_ref(),
            engine: self.settings.engine_address,
        };
        let outcome = match operation.kind {
            FlashKind::Open => SettlementOutcome::Open(settle_open(&ctx, &operation, &series)?),
            FlashKind::Close => SettlementOutcome::Close(settle_close(&ctx, &operation, &series)?),
        };
        self.gate.settle(outcome)
    }
}
