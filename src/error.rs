//! Unified error types for the Sui core
//!
//! All errors flow through this module. Every variant names the offending
//! argument index or field so callers can surface it directly.

use serde::{Deserialize, Serialize};

use crate::crypto::curves::CurveError;

/// Main error type for all crate operations
#[derive(Debug, thiserror::Error)]
pub enum SuiError {
    // Validation errors
    #[error("Invalid derivation path `{path}`: {reason}")]
    InvalidDerivationPath { path: String, reason: String },

    #[error("Invalid address `{0}`")]
    InvalidAddress(String),

    #[error("Invalid object id `{value}` at argument {index}")]
    InvalidObjectId { index: usize, value: String },

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Invalid key length for {scheme}: expected {expected} bytes, got {actual}")]
    InvalidKeyLength {
        scheme: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Unsupported signature scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Invalid Move call target `{0}`, expected `package::module::function`")]
    InvalidTarget(String),

    #[error("Invalid type argument {index} `{value}`: {reason}")]
    InvalidTypeArgument {
        index: usize,
        value: String,
        reason: String,
    },

    #[error("Incorrect number of {what}: expected {expected}, got {actual}")]
    ArityMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Argument {index}: expected {expected}, got {actual}")]
    ArgumentTypeMismatch {
        index: usize,
        expected: String,
        actual: String,
    },

    #[error("Argument {index}: {reason}")]
    InvalidPureValue { index: usize, reason: String },

    #[error("Transaction sender is not set")]
    MissingSender,

    // State errors
    #[error("Invalid multisig threshold: {0}")]
    InvalidThreshold(String),

    #[error("Unreachable threshold: threshold {threshold} exceeds total weight {total_weight}")]
    UnreachableThreshold { threshold: u16, total_weight: u32 },

    #[error("Duplicate public key at multisig member {0}")]
    DuplicatePublicKey(usize),

    #[error("Invalid multisig: {0}")]
    InvalidMultiSig(String),

    #[error("Signature {index} was produced by a key that is not a multisig member")]
    UnknownSigner { index: usize },

    #[error("Signature {index} reuses multisig member {member}")]
    DuplicateSigner { index: usize, member: usize },

    // Resolution errors
    #[error("Object {0} not found")]
    ObjectNotFound(String),

    // Gas errors
    #[error("Dry run failed: {0}")]
    DryRunFailed(String),

    #[error("Invalid numeric field `{field}`: `{value}`")]
    InvalidField { field: String, value: String },

    #[error("No gas coins owned by {0}")]
    NoGasCoins(String),

    // Collaborator errors
    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // Encoding errors
    #[error("BCS error: {0}")]
    Bcs(#[from] bcs::Error),

    #[error("Base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Hex error: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("Bech32 error: {0}")]
    Bech32(#[from] bech32::Error),

    #[error("BIP39 error: {0}")]
    Mnemonic(#[from] bip39::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Curve(#[from] CurveError),
}

impl SuiError {
    pub fn rpc(msg: impl Into<String>) -> Self {
        SuiError::Rpc(msg.into())
    }

    pub fn invalid_field(field: impl Into<String>, value: impl Into<String>) -> Self {
        SuiError::InvalidField {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn type_mismatch(index: usize, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        SuiError::ArgumentTypeMismatch {
            index,
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Coarse classification used by callers that only branch on category
    pub fn code(&self) -> ErrorCode {
        match self {
            SuiError::InvalidDerivationPath { .. }
            | SuiError::InvalidAddress(_)
            | SuiError::InvalidObjectId { .. }
            | SuiError::InvalidTarget(_)
            | SuiError::InvalidTypeArgument { .. }
            | SuiError::ArityMismatch { .. }
            | SuiError::ArgumentTypeMismatch { .. }
            | SuiError::InvalidPureValue { .. }
            | SuiError::MissingSender => ErrorCode::InvalidInput,
            SuiError::InvalidPrivateKey(_) | SuiError::InvalidKeyLength { .. } => {
                ErrorCode::InvalidPrivateKey
            }
            SuiError::InvalidPublicKey(_) => ErrorCode::InvalidPublicKey,
            SuiError::InvalidSignature(_) => ErrorCode::InvalidSignature,
            SuiError::UnsupportedScheme(_) => ErrorCode::UnsupportedScheme,
            SuiError::InvalidThreshold(_)
            | SuiError::UnreachableThreshold { .. }
            | SuiError::DuplicatePublicKey(_)
            | SuiError::InvalidMultiSig(_)
            | SuiError::UnknownSigner { .. }
            | SuiError::DuplicateSigner { .. } => ErrorCode::InvalidMultiSig,
            SuiError::ObjectNotFound(_) => ErrorCode::ObjectNotFound,
            SuiError::DryRunFailed(_) => ErrorCode::DryRunFailed,
            SuiError::InvalidField { .. } => ErrorCode::ParseError,
            SuiError::NoGasCoins(_) => ErrorCode::InsufficientGas,
            SuiError::Rpc(_) => ErrorCode::NetworkError,
            SuiError::Config(_) => ErrorCode::ConfigError,
            SuiError::Bcs(_) | SuiError::Base64(_) | SuiError::Hex(_) | SuiError::Bech32(_) => {
                ErrorCode::EncodingError
            }
            SuiError::Mnemonic(_) => ErrorCode::InvalidMnemonic,
            SuiError::Json(_) => ErrorCode::JsonError,
            SuiError::Curve(_) => ErrorCode::CryptoError,
        }
    }
}

/// Error codes for categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Input errors
    InvalidInput,
    InvalidMnemonic,
    InvalidPrivateKey,
    InvalidPublicKey,
    InvalidSignature,
    UnsupportedScheme,

    // Multisig state errors
    InvalidMultiSig,

    // Resolution errors
    ObjectNotFound,
    NetworkError,

    // Gas errors
    DryRunFailed,
    InsufficientGas,

    // Parse errors
    ParseError,
    EncodingError,
    JsonError,

    // Crypto / internal
    CryptoError,
    ConfigError,
}

/// Result type alias for crate operations
pub type SuiResult<T> = Result<T, SuiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_serialization() {
        let err = SuiError::UnreachableThreshold {
            threshold: 5,
            total_weight: 3,
        };
        assert_eq!(err.code(), ErrorCode::InvalidMultiSig);

        let json = serde_json::to_string(&err.code()).unwrap();
        assert_eq!(json, "\"invalid_multi_sig\"");
    }

    #[test]
    fn test_messages_name_the_offender() {
        let err = SuiError::type_mismatch(2, "object id", "pure value");
        assert_eq!(err.to_string(), "Argument 2: expected object id, got pure value");

        let err = SuiError::invalid_field("computationCost", "abc");
        assert!(err.to_string().contains("computationCost"));
    }
}
