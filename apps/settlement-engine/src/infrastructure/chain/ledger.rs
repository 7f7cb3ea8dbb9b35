//! Token ledger adapter.

use crate::application::ports::{LedgerError, TokenLedgerPort};
use crate::domain::shared::Address;

use super::InMemoryChain;

impl TokenLedgerPort for InMemoryChain {
    fn balance_of(&self, token: Address, account: Address) -> Result<u128, LedgerError> {
        Ok(self.state.read().balance(token, account))
    }

    fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<u128, LedgerError> {
        Ok(self
            .state
            .read()
            .allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or(0))
    }

    fn transfer(
        &self,
        token: Address,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), LedgerError> {
        self.state.write().move_balance(token, from, to, amount)
    }

    fn transfer_from(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), LedgerError> {
        let mut state = self.state.write();
        let available = state.balance(token, owner);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                token,
                account: owner,
                requested: amount,
                available,
            });
        }
        state.spend_allowance(token, owner, spender, amount)?;
        state.move_balance(token, owner, to, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::chain::tests::chain;

    #[test]
    fn transfer_moves_balance() {
        let chain = chain();
        let token = Address::from_label("token");
        let alice = Address::from_label("alice");
        let bob = Address::from_label("bob");
        chain.credit(token, alice, 100).unwrap();

        chain.transfer(token, alice, bob, 40).unwrap();
        assert_eq!(chain.balance_of(token, alice).unwrap(), 60);
        assert_eq!(chain.balance_of(token, bob).unwrap(), 40);
    }

    #[test]
    fn transfer_rejects_overdraft() {
        let chain = chain();
        let token = Address::from_label("token");
        let alice = Address::from_label("alice");
        let err = chain
            .transfer(token, alice, Address::from_label("bob"), 1)
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientBalance { available: 0, .. }));
    }

    #[test]
    fn transfer_from_consumes_allowance() {
        let chain = chain();
        let token = Address::from_label("token");
        let owner = Address::from_label("owner");
        let spender = Address::from_label("spender");
        let to = Address::from_label("to");
        chain.credit(token, owner, 100).unwrap();
        chain.approve(token, owner, spender, 30);

        chain.transfer_from(token, owner, spender, to, 20).unwrap();
        assert_eq!(chain.allowance(token, owner, spender).unwrap(), 10);
        assert_eq!(chain.balance_of(token, to).unwrap(), 20);

        let err = chain.transfer_from(token, owner, spender, to, 11).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientAllowance { allowed: 10, .. }));
    }

    #[test]
    fn unlimited_allowance_is_not_decremented() {
        let chain = chain();
        let token = Address::from_label("token");
        let owner = Address::from_label("owner");
        let spender = Address::from_label("spender");
        chain.credit(token, owner, 100).unwrap();
        chain.approve(token, owner, spender, u128::MAX);

        chain.transfer_from(token, owner, spender, spender, 50).unwrap();
        assert_eq!(chain.allowance(token, owner, spender).unwrap(), u128::MAX);
    }
}
