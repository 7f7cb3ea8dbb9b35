//! Token pairs: canonical ordering, canonical pool address and reserve views.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::amm::swap_math::{SwapFee, get_amount_in, get_amount_out, get_amount_out_ceil};
use crate::domain::shared::{Address, CodeHash, DomainError};

/// Order two tokens ascending. Pools store reserves in this order.
pub fn sort_tokens(a: Address, b: Address) -> Result<(Address, Address), DomainError> {
    if a == b {
        return Err(DomainError::IdenticalTokens {
            token: a.to_string(),
        });
    }
    let (token0, token1) = if a < b { (a, b) } else { (b, a) };
    if token0.is_zero() {
        return Err(DomainError::invalid("token", "zero address"));
    }
    Ok((token0, token1))
}

/// Canonical pool address for a token pair.
///
/// Last 20 bytes of `SHA-256(0xff ‖ factory ‖ SHA-256(token0 ‖ token1) ‖ init_code_hash)`.
/// Independent of argument order.
pub fn pair_address(
    factory: Address,
    init_code_hash: CodeHash,
    a: Address,
    b: Address,
) -> Result<Address, DomainError> {
    let (token0, token1) = sort_tokens(a, b)?;

    let salt = Sha256::new()
        .chain_update(token0.as_bytes())
        .chain_update(token1.as_bytes())
        .finalize();

    let digest = Sha256::new()
        .chain_update([0xffu8])
        .chain_update(factory.as_bytes())
        .chain_update(salt)
        .chain_update(init_code_hash.as_bytes())
        .finalize();

    let mut bytes = [0u8; Address::LEN];
    bytes.copy_from_slice(&digest[32 - Address::LEN..]);
    Ok(Address::new(bytes))
}

/// Factory parameters that determine canonical pool addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairFactory {
    /// Factory address.
    pub factory: Address,
    /// Pool init code hash.
    pub init_code_hash: CodeHash,
}

impl PairFactory {
    /// Create factory parameters.
    #[must_use]
    pub const fn new(factory: Address, init_code_hash: CodeHash) -> Self {
        Self {
            factory,
            init_code_hash,
        }
    }

    /// Canonical pool for a token pair.
    pub fn pair_for(&self, a: Address, b: Address) -> Result<Address, DomainError> {
        pair_address(self.factory, self.init_code_hash, a, b)
    }
}

/// One hop of a swap path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStep {
    /// Token paid into the pool.
    pub token_in: Address,
    /// Token taken out of the pool.
    pub token_out: Address,
}

impl PathStep {
    /// Create a path step.
    #[must_use]
    pub const fn new(token_in: Address, token_out: Address) -> Self {
        Self {
            token_in,
            token_out,
        }
    }
}

/// Snapshot of a pool's reserves, keyed by canonical token order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairReserves {
    /// Pool address.
    pub pair: Address,
    /// Lower-sorted token.
    pub token0: Address,
    /// Higher-sorted token.
    pub token1: Address,
    /// Reserve of `token0`.
    pub reserve0: u128,
    /// Reserve of `token1`.
    pub reserve1: u128,
}

impl PairReserves {
    /// Reserve held for `token`.
    pub fn reserve_of(&self, token: Address) -> Result<u128, DomainError> {
        if token == self.token0 {
            Ok(self.reserve0)
        } else if token == self.token1 {
            Ok(self.reserve1)
        } else {
            Err(self.not_in_pair(token))
        }
    }

    /// `(reserve_in, reserve_out)` for a swap step, routed by token identity.
    pub fn oriented(&self, step: PathStep) -> Result<(u128, u128), DomainError> {
        if step.token_in == step.token_out {
            return Err(DomainError::IdenticalTokens {
                token: step.token_in.to_string(),
            });
        }
        Ok((self.reserve_of(step.token_in)?, self.reserve_of(step.token_out)?))
    }

    /// `(amount0_out, amount1_out)` that borrows `amount` of `token`.
    pub fn amounts_out(&self, token: Address, amount: u128) -> Result<(u128, u128), DomainError> {
        if token == self.token0 {
            Ok((amount, 0))
        } else if token == self.token1 {
            Ok((0, amount))
        } else {
            Err(self.not_in_pair(token))
        }
    }

    /// Exact input of `step.token_in` needed to receive `amount_out` of `step.token_out`.
    pub fn amount_in(
        &self,
        amount_out: u128,
        step: PathStep,
        fee: SwapFee,
    ) -> Result<u128, DomainError> {
        let (reserve_in, reserve_out) = self.oriented(step)?;
        get_amount_in(amount_out, reserve_in, reserve_out, fee)
    }

    /// Output of `step.token_out` received for `amount_in` of `step.token_in`.
    pub fn amount_out(
        &self,
        amount_in: u128,
        step: PathStep,
        fee: SwapFee,
    ) -> Result<u128, DomainError> {
        let (reserve_in, reserve_out) = self.oriented(step)?;
        get_amount_out(amount_in, reserve_in, reserve_out, fee)
    }

    /// [`Self::amount_out`] rounded up.
    pub fn amount_out_ceil(
        &self,
        amount_in: u128,
        step: PathStep,
        fee: SwapFee,
    ) -> Result<u128, DomainError> {
        let (reserve_in, reserve_out) = self.oriented(step)?;
        get_amount_out_ceil(amount_in, reserve_in, reserve_out, fee)
    }

    fn not_in_pair(&self, token: Address) -> DomainError {
        DomainError::TokenNotInPair {
            token: token.to_string(),
            pair: self.pair.to_string(),
        }
    }
}
