use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TypesError};
use crate::rule::Rule;

/// Width of an account identifier in bytes.
pub const HASH_SIZE: usize = 32;

/// Account identifier: a 32-byte hash, carried on the wire as lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId([u8; HASH_SIZE]);

impl AccountId {
    pub const fn new(bytes: [u8; HASH_SIZE]) -> Self {
        AccountId(bytes)
    }

    /// Decode a hex string. Anything that does not decode to exactly
    /// [`HASH_SIZE`] bytes is rejected.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s)?;
        Self::from_slice(&bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; HASH_SIZE] = bytes.try_into().map_err(|_| TypesError::AccountIdLength {
            expected: HASH_SIZE,
            got: bytes.len(),
        })?;
        Ok(AccountId(arr))
    }

    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.to_hex())
    }
}

impl FromStr for AccountId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self> {
        AccountId::from_hex(s)
    }
}

impl From<[u8; HASH_SIZE]> for AccountId {
    fn from(bytes: [u8; HASH_SIZE]) -> Self {
        AccountId(bytes)
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        AccountId::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Account record as reported by the exchange core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "accountid")]
    pub account_id: AccountId,
    /// Hex-encoded client public key.
    pub pubkey: String,
    #[serde(rename = "feeaddress")]
    pub fee_address: String,
    /// Hex-encoded registration fee coin ID, empty until the fee is paid.
    #[serde(rename = "feecoin")]
    pub fee_coin: String,
    #[serde(rename = "brokenrule")]
    pub broken_rule: Rule,
}

impl Account {
    pub fn new(account_id: AccountId) -> Self {
        Account {
            account_id,
            pubkey: String::new(),
            fee_address: String::new(),
            fee_coin: String::new(),
            broken_rule: Rule::NoRule,
        }
    }

    pub fn is_banned(&self) -> bool {
        self.broken_rule != Rule::NoRule
    }
}
