//! Fixed-width byte identifiers: account/token/pool addresses and code hashes.
//!
//! Both render as `0x`-prefixed lowercase hex and serialize as hex strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::domain::shared::DomainError;

macro_rules! define_bytes {
    ($name:ident, $len:expr, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name([u8; $len]);

        impl $name {
            /// Width in bytes.
            pub const LEN: usize = $len;

            /// All-zero value.
            pub const ZERO: Self = Self([0u8; $len]);

            /// Wrap raw bytes.
            #[must_use]
            pub const fn new(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            /// Value with every byte set to `byte`.
            #[must_use]
            pub const fn repeat_byte(byte: u8) -> Self {
                Self([byte; $len])
            }

            /// Borrow the raw bytes.
            #[must_use]
            pub const fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            /// Whether every byte is zero.
            #[must_use]
            pub fn is_zero(&self) -> bool {
                self.0.iter().all(|b| *b == 0)
            }

            /// Parse from `0x`-prefixed (or bare) hex.
            pub fn from_hex(input: &str) -> Result<Self, DomainError> {
                let digits = input.strip_prefix("0x").unwrap_or(input);
                if !digits.is_ascii() || digits.len() != $len * 2 {
                    return Err(DomainError::invalid(
                        stringify!($name),
                        format!("expected {} hex digits, got {}", $len * 2, digits.len()),
                    ));
                }
                let mut bytes = [0u8; $len];
                for (i, byte) in bytes.iter_mut().enumerate() {
                    let pair = &digits[i * 2..i * 2 + 2];
                    *byte = u8::from_str_radix(pair, 16).map_err(|_| {
                        DomainError::invalid(stringify!($name), format!("invalid hex '{pair}'"))
                    })?;
                }
                Ok(Self(bytes))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("0x")?;
                for byte in &self.0 {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({self})", stringify!($name))
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_hex(s)
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Self::from_hex(&raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

define_bytes!(
    Address,
    20,
    "20-byte identifier for an account, token, pool or option contract."
);
define_bytes!(CodeHash, 32, "32-byte hash of a pool's init code.");

impl Address {
    /// Deterministic address for a human-readable label (last 20 bytes of SHA-256).
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let digest = Sha256::digest(label.as_bytes());
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest[12..]);
        Self(bytes)
    }
}

impl CodeHash {
    /// SHA-256 of the given bytes.
    #[must_use]
    pub fn digest(data: &[u8]) -> Self {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&Sha256::digest(data));
        Self(bytes)
    }
}
