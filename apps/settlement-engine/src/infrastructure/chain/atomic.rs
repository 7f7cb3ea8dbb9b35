//! Atomic unit adapter: nested snapshots of the whole chain state.

use crate::application::ports::{AtomicUnitError, AtomicUnitPort, Checkpoint};

use super::InMemoryChain;

impl AtomicUnitPort for InMemoryChain {
    fn begin(&self) -> Result<Checkpoint, AtomicUnitError> {
        let snapshot = self.state.read().clone();
        let mut checkpoints = self.checkpoints.lock();
        checkpoints.next_id += 1;
        let id = checkpoints.next_id;
        checkpoints.stack.push((id, snapshot));
        Ok(Checkpoint(id))
    }

    fn commit(&self, checkpoint: Checkpoint) -> Result<(), AtomicUnitError> {
        let mut checkpoints = self.checkpoints.lock();
        checkpoints.pop_innermost(checkpoint)?;
        Ok(())
    }

    fn revert(&self, checkpoint: Checkpoint) -> Result<(), AtomicUnitError> {
        let snapshot = self.checkpoints.lock().pop_innermost(checkpoint)?;
        *self.state.write() = snapshot;
        tracing::debug!(checkpoint = checkpoint.0, "Chain state reverted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::TokenLedgerPort;
    use crate::domain::shared::Address;
    use crate::infrastructure::chain::tests::chain;

    #[test]
    fn revert_restores_balances() {
        let chain = chain();
        let token = Address::from_label("token");
        let alice = Address::from_label("alice");
        chain.credit(token, alice, 10).unwrap();

        let checkpoint = chain.begin().unwrap();
        chain.credit(token, alice, 5).unwrap();
        chain.revert(checkpoint).unwrap();

        assert_eq!(chain.balance_of(token, alice).unwrap(), 10);
    }

    #[test]
    fn nested_checkpoints_unwind_innermost_first() {
        let chain = chain();
        let token = Address::from_label("token");
        let alice = Address::from_label("alice");

        let outer = chain.begin().unwrap();
        chain.credit(token, alice, 1).unwrap();
        let inner = chain.begin().unwrap();
        chain.credit(token, alice, 2).unwrap();

        assert_eq!(chain.commit(outer), Err(AtomicUnitError::OutOfOrder(outer.0)));
        chain.revert(inner).unwrap();
        assert_eq!(chain.balance_of(token, alice).unwrap(), 1);
        chain.commit(outer).unwrap();
        assert_eq!(chain.balance_of(token, alice).unwrap(), 1);
        assert_eq!(
            chain.commit(outer),
            Err(AtomicUnitError::UnknownCheckpoint(outer.0))
        );
    }

    #[test]
    fn interleaved_units_wipe_each_other() {
        let chain = chain();
        let token = Address::from_label("token");
        let alice = Address::from_label("alice");
        let bob = Address::from_label("bob");

        let first = chain.begin().unwrap();
        let second = chain.begin().unwrap();
        chain.credit(token, alice, 5).unwrap();
        chain.credit(token, bob, 7).unwrap();

        // The first unit cannot settle while the second is open.
        assert_eq!(chain.commit(first), Err(AtomicUnitError::OutOfOrder(first.0)));
        chain.commit(second).unwrap();
        // Reverting the first unit also drops the second unit's committed write.
        chain.revert(first).unwrap();
        assert_eq!(chain.balance_of(token, alice).unwrap(), 0);
        assert_eq!(chain.balance_of(token, bob).unwrap(), 0);
    }

    #[test]
    fn run_commits_ok_and_reverts_err() {
        let chain = chain();
        let token = Address::from_label("token");
        let alice = Address::from_label("alice");

        let ok: Result<(), AtomicUnitError> = chain.run(|| {
            chain.credit(token, alice, 3).ok();
            Ok(())
        });
        assert!(ok.is_ok());

        let err: Result<(), AtomicUnitError> = chain.run(|| {
            chain.credit(token, alice, 4).ok();
            Err(AtomicUnitError::Unavailable {
                message: "boom".to_string(),
            })
        });
        assert!(err.is_err());
        assert_eq!(chain.balance_of(token, alice).unwrap(), 3);
    }
}
