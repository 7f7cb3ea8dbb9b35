//! Callback Gate
//!
//! Two-phase continuation for the pool callback. [`CallbackGate::arm`]
//! records the single in-flight operation and hands back a
//! [`PendingOperation`] token; the pool's callback consumes the armed slot
//! through [`CallbackGate::authorize`] exactly once; the settlement records
//! its outcome with [`CallbackGate::settle`]; [`CallbackGate::finish`]
//! redeems the token for that outcome and returns the gate to `Idle`.

use parking_lot::Mutex;

use crate::application::ports::FlashSwapCallback;
use crate::domain::settlement::{
    EngineState, EngineStateMachine, FlashOperation, SettlementOutcome,
};
use crate::domain::shared::{Address, OperationId};
use crate::error::SettlementError;

/// Token returned by [`CallbackGate::arm`], redeemed by [`CallbackGate::finish`].
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a pending operation must be finished or aborted"]
pub struct PendingOperation {
    id: OperationId,
}

impl PendingOperation {
    /// ID of the armed operation.
    pub const fn id(&self) -> &OperationId {
        &self.id
    }
}

#[derive(Debug, Clone)]
struct ArmedOperation {
    id: OperationId,
    pair: Address,
}

#[derive(Debug, Default)]
struct GateSlot {
    state: EngineState,
    armed: Option<ArmedOperation>,
    outcome: Option<SettlementOutcome>,
}

impl GateSlot {
    fn transition(&mut self, to: EngineState) -> Result<(), SettlementError> {
        EngineStateMachine::validate_transition(self.state, to)
            .map_err(|_| SettlementError::NotAwaitingCallback { state: self.state })?;
        self.state = to;
        Ok(())
    }
}

/// Single-slot gate guarding the engine's callback entry point.
#[derive(Debug)]
pub struct CallbackGate {
    engine: Address,
    slot: Mutex<GateSlot>,
}

impl CallbackGate {
    /// Create an idle gate for the engine at `engine`.
    #[must_use]
    pub fn new(engine: Address) -> Self {
        Self {
            engine,
            slot: Mutex::new(GateSlot::default()),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> EngineState {
        self.slot.lock().state
    }

    /// Arm the gate for `operation`. Fails while another operation is in flight.
    pub fn arm(&self, operation: &FlashOperation) -> Result<PendingOperation, SettlementError> {
        let mut slot = self.slot.lock();
        if slot.state.is_busy() {
            return Err(SettlementError::OperationInFlight { state: slot.state });
        }
        slot.transition(EngineState::LoanRequested)?;
        slot.armed = Some(ArmedOperation {
            id: operation.id.clone(),
            pair: operation.pair,
        });
        tracing::debug!(operation_id = %operation.id, pair = %operation.pair, "Callback gate armed");
        Ok(PendingOperation {
            id: operation.id.clone(),
        })
    }

    /// Authenticate a pool callback and consume the armed slot.
    ///
    /// The caller is checked against the armed canonical pool before the
    /// payload is decoded.
    pub fn authorize(
        &self,
        callback: &FlashSwapCallback,
    ) -> Result<FlashOperation, SettlementError> {
        let mut slot = self.slot.lock();
        if slot.state != EngineState::LoanRequested {
            return Err(SettlementError::NotAwaitingCallback { state: slot.state });
        }
        let Some(armed) = slot.armed.clone() else {
            return Err(SettlementError::NotAwaitingCallback { state: slot.state });
        };

        if callback.caller != armed.pair {
            return Err(SettlementError::UntrustedCaller {
                caller: callback.caller,
                expected: armed.pair,
            });
        }
        if callback.sender != self.engine {
            return Err(SettlementError::UnexpectedInitiator {
                sender: callback.sender,
            });
        }

        let operation = FlashOperation::decode(&callback.payload).map_err(|e| {
            SettlementError::MalformedPayload {
                message: e.to_string(),
            }
        })?;
        if operation.id != armed.id || operation.pair != armed.pair {
            return Err(SettlementError::OperationMismatch {
                expected: armed.id,
                actual: operation.id,
            });
        }

        slot.transition(EngineState::InCallback)?;
        slot.armed = None;
        Ok(operation)
    }

    /// Record the settlement outcome of the operation being settled.
    pub fn settle(&self, outcome: SettlementOutcome) -> Result<(), SettlementError> {
        let mut slot = self.slot.lock();
        slot.transition(EngineState::Settled)?;
        slot.outcome = Some(outcome);
        Ok(())
    }

    /// Redeem `pending` for its outcome and return to `Idle`.
    pub fn finish(&self, pending: PendingOperation) -> Result<SettlementOutcome, SettlementError> {
        let mut slot = self.slot.lock();
        if slot.state != EngineState::Settled {
            return Err(SettlementError::CallbackMissing {
                operation_id: pending.id,
            });
        }
        let Some(outcome) = slot.outcome.take() else {
            return Err(SettlementError::CallbackMissing {
                operation_id: pending.id,
            });
        };
        if outcome.operation_id() != &pending.id {
            return Err(SettlementError::OperationMismatch {
                expected: pending.id,
                actual: outcome.operation_id().clone(),
            });
        }
        slot.transition(EngineState::Idle)?;
        Ok(outcome)
    }

    /// Drop whatever is armed or recorded and return to `Idle`.
    pub fn abort(&self) {
        let mut slot = self.slot.lock();
        if slot.state.is_busy() {
            tracing::debug!(state = %slot.state, "Callback gate aborted");
        }
        *slot = GateSlot::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::settlement::{FlashKind, OpenSettlement};

    fn engine() -> Address {
        Address::from_label("engine")
    }

    fn pair() -> Address {
        Address::from_label("pair")
    }

    fn operation() -> FlashOperation {
        FlashOperation {
            id: OperationId::new("op-1"),
            kind: FlashKind::Open,
            option: Address::from_label("option"),
            pair: pair(),
            quantity: 10,
            bound: 5,
            caller: Address::from_label("alice"),
            beneficiary: Address::from_label("alice"),
        }
    }

    fn callback(caller: Address, op: &FlashOperation) -> FlashSwapCallback {
        FlashSwapCallback {
            caller,
            sender: engine(),
            amount0: 10,
            amount1: 0,
            payload: op.encode().unwrap(),
        }
    }

    fn outcome(id: &str) -> SettlementOutcome {
        SettlementOutcome::Open(OpenSettlement {
            operation_id: OperationId::new(id),
            quantity: 10,
            short_minted: 10,
            short_required: 6,
            loan_remainder: 0,
            rebate: 4,
        })
    }

    #[test]
    fn full_cycle_returns_to_idle() {
        let gate = CallbackGate::new(engine());
        let op = operation();

        let pending = gate.arm(&op).unwrap();
        assert_eq!(gate.state(), EngineState::LoanRequested);

        let decoded = gate.authorize(&callback(pair(), &op)).unwrap();
        assert_eq!(decoded, op);
        assert_eq!(gate.state(), EngineState::InCallback);

        gate.settle(outcome("op-1")).unwrap();
        assert_eq!(gate.state(), EngineState::Settled);

        let result = gate.finish(pending).unwrap();
        assert_eq!(result, outcome("op-1"));
        assert_eq!(gate.state(), EngineState::Idle);
    }

    #[test]
    fn callback_while_idle_is_rejected() {
        let gate = CallbackGate::new(engine());
        let err = gate.authorize(&callback(pair(), &operation())).unwrap_err();
        assert!(matches!(
            err,
            SettlementError::NotAwaitingCallback {
                state: EngineState::Idle
            }
        ));
    }

    #[test]
    fn second_callback_is_rejected() {
        let gate = CallbackGate::new(engine());
        let op = operation();
        let _pending = gate.arm(&op).unwrap();
        gate.authorize(&callback(pair(), &op)).unwrap();

        let err = gate.authorize(&callback(pair(), &op)).unwrap_err();
        assert!(matches!(
            err,
            SettlementError::NotAwaitingCallback {
                state: EngineState::InCallback
            }
        ));
    }

    #[test]
    fn non_canonical_caller_is_rejected_before_decoding() {
        let gate = CallbackGate::new(engine());
        let _pending = gate.arm(&operation()).unwrap();

        let mut spoofed = callback(Address::from_label("spoof"), &operation());
        spoofed.payload = b"garbage".to_vec();
        let err = gate.authorize(&spoofed).unwrap_err();
        assert!(matches!(err, SettlementError::UntrustedCaller { .. }));
        // A rejected callback leaves the slot armed for the genuine pool.
        assert_eq!(gate.state(), EngineState::LoanRequested);
    }

    #[test]
    fn foreign_initiator_is_rejected() {
        let gate = CallbackGate::new(engine());
        let op = operation();
        let _pending = gate.arm(&op).unwrap();

        let mut cb = callback(pair(), &op);
        cb.sender = Address::from_label("mallory");
        assert!(matches!(
            gate.authorize(&cb).unwrap_err(),
            SettlementError::UnexpectedInitiator { .. }
        ));
    }

    #[test]
    fn payload_for_another_operation_is_rejected() {
        let gate = CallbackGate::new(engine());
        let _pending = gate.arm(&operation()).unwrap();

        let mut other = operation();
        other.id = OperationId::new("op-2");
        assert!(matches!(
            gate.authorize(&callback(pair(), &other)).unwrap_err(),
            SettlementError::OperationMismatch { .. }
        ));
    }

    #[test]
    fn malformed_payload_is_rejected() {
        let gate = CallbackGate::new(engine());
        let _pending = gate.arm(&operation()).unwrap();

        let mut cb = callback(pair(), &operation());
        cb.payload = b"{".to_vec();
        assert!(matches!(
            gate.authorize(&cb).unwrap_err(),
            SettlementError::MalformedPayload { .. }
        ));
    }

    #[test]
    fn arming_twice_is_rejected() {
        let gate = CallbackGate::new(engine());
        let _pending = gate.arm(&operation()).unwrap();
        assert!(matches!(
            gate.arm(&operation()).unwrap_err(),
            SettlementError::OperationInFlight {
                state: EngineState::LoanRequested
            }
        ));
    }

    #[test]
    fn finish_without_callback_reports_missing_callback() {
        let gate = CallbackGate::new(engine());
        let pending = gate.arm(&operation()).unwrap();
        assert!(matches!(
            gate.finish(pending).unwrap_err(),
            SettlementError::CallbackMissing { .. }
        ));
    }

    #[test]
    fn settle_outside_callback_is_rejected() {
        let gate = CallbackGate::new(engine());
        assert!(matches!(
            gate.settle(outcome("op-1")).unwrap_err(),
            SettlementError::NotAwaitingCallback {
                state: EngineState::Idle
            }
        ));
    }

    #[test]
    fn abort_resets_to_idle() {
        let gate = CallbackGate::new(engine());
        let _pending = gate.arm(&operation()).unwrap();
        gate.abort();
        assert_eq!(gate.state(), EngineState::Idle);
        assert!(gate.arm(&operation()).is_ok());
    }
}
