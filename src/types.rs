//! Core Sui value types
//!
//! Address and object id are 32 bytes displayed as `0x`-prefixed lowercase
//! hex; digests are 32 bytes displayed as Base58. In binary (BCS) form an
//! address is a fixed 32-byte array while a digest is length-prefixed.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest as BlakeDigest};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{SuiError, SuiResult};

pub(crate) type Blake2b256 = Blake2b<U32>;

pub const SUI_ADDRESS_LENGTH: usize = 32;

/// BLAKE2b-256 over the concatenation of `parts`
pub fn blake2b256(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Sui address is 32 bytes, displayed as 0x-prefixed hex
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SuiAddress([u8; SUI_ADDRESS_LENGTH]);

/// Sui Object ID (same format as address)
pub type ObjectId = SuiAddress;

impl SuiAddress {
    pub const ZERO: SuiAddress = SuiAddress([0u8; SUI_ADDRESS_LENGTH]);

    pub const fn new(bytes: [u8; SUI_ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Address with only the last byte set, e.g. `0x2`
    pub const fn from_u8(value: u8) -> Self {
        let mut bytes = [0u8; SUI_ADDRESS_LENGTH];
        bytes[SUI_ADDRESS_LENGTH - 1] = value;
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SUI_ADDRESS_LENGTH] {
        &self.0
    }

    /// Parse from hex string (with or without 0x prefix, short forms padded)
    pub fn from_hex(s: &str) -> SuiResult<Self> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.is_empty() || digits.len() > SUI_ADDRESS_LENGTH * 2 {
            return Err(SuiError::InvalidAddress(s.to_string()));
        }

        let padded = format!("{:0>64}", digits);
        let bytes = hex::decode(&padded).map_err(|_| SuiError::InvalidAddress(s.to_string()))?;

        let mut arr = [0u8; SUI_ADDRESS_LENGTH];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// Full 64-digit lowercase hex with 0x prefix
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }
}

impl fmt::Display for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for SuiAddress {
    type Err = SuiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for SuiAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_hex())
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for SuiAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            SuiAddress::from_hex(&s).map_err(D::Error::custom)
        } else {
            <[u8; SUI_ADDRESS_LENGTH]>::deserialize(deserializer).map(SuiAddress)
        }
    }
}

/// Known special addresses on Sui
pub mod special_addresses {
    use super::SuiAddress;

    /// Move standard library
    pub const MOVE_STDLIB: SuiAddress = SuiAddress::from_u8(0x01);

    /// Sui framework address
    pub const SUI_FRAMEWORK: SuiAddress = SuiAddress::from_u8(0x02);

    /// Sui system address
    pub const SUI_SYSTEM: SuiAddress = SuiAddress::from_u8(0x03);

    /// Clock object
    pub const CLOCK: SuiAddress = SuiAddress::from_u8(0x06);
}

/// 32-byte digest (object, transaction), Base58 in text form
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Digest([u8; 32]);

pub type ObjectDigest = Digest;
pub type TransactionDigest = Digest;

impl Digest {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn from_base58(s: &str) -> SuiResult<Self> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| SuiError::invalid_field("digest", format!("{}: {}", s, e)))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| SuiError::invalid_field("digest", format!("{}: expected 32 bytes", s)))?;
        Ok(Self(arr))
    }

    pub fn to_base58(&self) -> String {
        bs58::encode(self.0).into_string()
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_base58())
        } else {
            // BCS: ULEB128 length (always 32) followed by the bytes
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            Digest::from_base58(&s).map_err(D::Error::custom)
        } else {
            let bytes = Vec::<u8>::deserialize(deserializer)?;
            let arr: [u8; 32] = bytes
                .try_into()
                .map_err(|_| D::Error::custom("digest must be 32 bytes"))?;
            Ok(Digest(arr))
        }
    }
}

/// Sui Object Reference (ID, version, digest)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRef {
    pub object_id: ObjectId,
    pub version: u64,
    pub digest: ObjectDigest,
}

impl ObjectRef {
    pub fn new(object_id: ObjectId, version: u64, digest: ObjectDigest) -> Self {
        Self {
            object_id,
            version,
            digest,
        }
    }
}

/// Validate a Sui address (full or short hex form)
pub fn is_valid_sui_address(address: &str) -> bool {
    SuiAddress::from_hex(address).is_ok()
}

/// Object ids share the address format
pub fn is_valid_object_id(object_id: &str) -> bool {
    is_valid_sui_address(object_id)
}

/// A transaction digest is Base58 of exactly 32 bytes
pub fn is_valid_transaction_digest(digest: &str) -> bool {
    Digest::from_base58(digest).is_ok()
}

/// Normalize any accepted address form to `0x` + 64 lowercase hex digits
pub fn normalize_sui_address(address: &str) -> SuiResult<String> {
    SuiAddress::from_hex(address).map(|a| a.to_hex())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_parsing() {
        let addr = SuiAddress::from_hex("0x2").unwrap();
        assert_eq!(addr, special_addresses::SUI_FRAMEWORK);
        assert_eq!(
            addr.to_hex(),
            "0x0000000000000000000000000000000000000000000000000000000000000002"
        );
        assert_eq!(SuiAddress::from_hex("2").unwrap(), addr);
    }

    #[test]
    fn test_address_rejects_garbage() {
        assert!(!is_valid_sui_address(""));
        assert!(!is_valid_sui_address("0x"));
        assert!(!is_valid_sui_address("0xzz"));
        assert!(!is_valid_sui_address(&format!("0x{}", "1".repeat(65))));
    }

    #[test]
    fn test_address_bcs_is_fixed_width() {
        let bytes = bcs::to_bytes(&SuiAddress::from_u8(7)).unwrap();
        assert_eq!(bytes.len(), 32);
        assert_eq!(bytes[31], 7);
    }

    #[test]
    fn test_digest_bcs_is_length_prefixed() {
        let digest = Digest::new([9u8; 32]);
        let bytes = bcs::to_bytes(&digest).unwrap();
        assert_eq!(bytes.len(), 33);
        assert_eq!(bytes[0], 32);
        assert_eq!(bcs::from_bytes::<Digest>(&bytes).unwrap(), digest);
    }

    #[test]
    fn test_address_json_is_hex() {
        let json = serde_json::to_string(&special_addresses::CLOCK).unwrap();
        assert!(json.contains("0x0000"));
        let back: SuiAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, special_addresses::CLOCK);
    }

    #[test]
    fn test_transaction_digest_validation() {
        let digest = Digest::new([1u8; 32]).to_base58();
        assert!(is_valid_transaction_digest(&digest));
        assert!(!is_valid_transaction_digest("not-base58-0OIl"));
        assert!(!is_valid_transaction_digest(&bs58::encode([1u8; 31]).into_string()));
    }
}
