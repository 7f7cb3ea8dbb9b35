//! Token Ledger Port (Driven Port)
//!
//! Fungible token balances and allowances.

use crate::domain::shared::Address;

/// Token ledger error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// Sender balance too low.
    #[error("insufficient {token} balance for {account}: requested {requested}, available {available}")]
    InsufficientBalance {
        token: Address,
        account: Address,
        requested: u128,
        available: u128,
    },

    /// Spender allowance too low.
    #[error("insufficient {token} allowance from {owner} to {spender}: requested {requested}, allowed {allowed}")]
    InsufficientAllowance {
        token: Address,
        owner: Address,
        spender: Address,
        requested: u128,
        allowed: u128,
    },

    /// Balance would overflow.
    #[error("{token} balance overflow for {account}")]
    Overflow { token: Address, account: Address },

    /// Ledger state unavailable.
    #[error("ledger unavailable: {message}")]
    Unavailable { message: String },
}

/// Port for moving tokens.
pub trait TokenLedgerPort: Send + Sync {
    /// Balance of `account` in `token`.
    fn balance_of(&self, token: Address, account: Address) -> Result<u128, LedgerError>;

    /// Amount `spender` may pull from `owner`.
    fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<u128, LedgerError>;

    /// Move `amount` of `token` from `from` to `to`.
    fn transfer(
        &self,
        token: Address,
        from: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), LedgerError>;

    /// Move `amount` of `token` from `owner` to `to` on behalf of `spender`,
    /// consuming allowance.
    fn transfer_from(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
        to: Address,
        amount: u128,
    ) -> Result<(), LedgerError>;
}
