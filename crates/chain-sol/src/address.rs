//! Base58 public keys and blockhashes.
//!
//! A Solana address is the Base58 encoding of a raw 32-byte Ed25519 public
//! key; blockhashes use the same encoding.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SolError;

fn decode_32(value: &str) -> Result<[u8; 32], SolError> {
    let bytes = bs58::decode(value)
        .into_vec()
        .map_err(|e| SolError::InvalidAddress(format!("base58 decode failed: {e}")))?;

    bytes.try_into().map_err(|v: Vec<u8>| {
        SolError::InvalidAddress(format!("expected 32 bytes, got {}", v.len()))
    })
}

macro_rules! base58_key {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name([u8; 32]);

        impl $name {
            pub const fn new_from_array(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            pub fn to_bytes(&self) -> [u8; 32] {
                self.0
            }

            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = SolError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                decode_32(s).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&bs58::encode(self.0).into_string())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
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
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

base58_key!(
    /// An Ed25519 public key / account address.
    Pubkey
);

base58_key!(
    /// A recent blockhash referenced by a transaction message.
    Blockhash
);

impl Pubkey {
    /// Base58 form, as wallets and explorers display it.
    pub fn to_base58(&self) -> String {
        self.to_string()
    }
}

/// Returns whether `address` decodes to a 32-byte key.
pub fn is_valid_address(address: &str) -> bool {
    decode_32(address).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_program_is_all_ones() {
        assert_eq!(Pubkey::default().to_string(), "11111111111111111111111111111111");
    }

    #[test]
    fn parse_and_display_token_program() {
        let key: Pubkey = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA".parse().unwrap();
        assert_eq!(key.to_base58(), "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");
    }

    #[test]
    fn rejects_garbage() {
        assert!("not-a-valid-address!!!".parse::<Pubkey>().is_err());
        assert!(!is_valid_address("###"));
    }

    #[test]
    fn rejects_short_keys() {
        // "1" decodes to a single zero byte.
        assert!("1".parse::<Pubkey>().is_err());
    }

    #[test]
    fn debug_names_the_type() {
        let hash = Blockhash::new_from_array([0u8; 32]);
        assert!(format!("{hash:?}").starts_with("Blockhash("));
    }

    #[test]
    fn serde_uses_base58_strings() {
        let key = Pubkey::new_from_array([7u8; 32]);
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, format!("\"{key}\""));
        let back: Pubkey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
