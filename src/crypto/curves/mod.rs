//! Multi-Curve Cryptography Support
//!
//! Raw signing primitives for the three curves Sui accepts for
//! single-signer accounts:
//!
//! - `ed25519`: EdDSA (RFC 8032), SLIP-0010 derivation
//! - `secp256k1`: ECDSA over SHA-256, RFC 6979 nonces, BIP-32 derivation
//! - `secp256r1` (P-256/NIST): ECDSA over SHA-256, RFC 6979 nonces, keys from the secp256k1 chain
//!
//! Every curve signs the 32-byte intent digest and emits a fixed 64-byte
//! signature. ECDSA signatures are always low-S and encoded as `r || s`.

pub mod ed25519;
pub mod secp256k1;
pub mod secp256r1;
pub mod traits;

pub use ed25519::Ed25519Curve;
pub use secp256k1::Secp256k1Curve;
pub use secp256r1::Secp256r1Curve;
pub use traits::*;

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};

pub(crate) type HmacSha512 = Hmac<sha2::Sha512>;

// MARK: - Curve Errors

/// Errors that can occur during curve operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurveError {
    InvalidPrivateKey(String),
    InvalidPublicKey(String),
    InvalidSignature(String),
    SigningFailed(String),
    DerivationFailed(String),
}

impl std::fmt::Display for CurveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPrivateKey(s) => write!(f, "Invalid private key: {}", s),
            Self::InvalidPublicKey(s) => write!(f, "Invalid public key: {}", s),
            Self::InvalidSignature(s) => write!(f, "Invalid signature: {}", s),
            Self::SigningFailed(s) => write!(f, "Signing failed: {}", s),
            Self::DerivationFailed(s) => write!(f, "Key derivation failed: {}", s),
        }
    }
}

impl std::error::Error for CurveError {}

/// One HMAC-SHA512 step, split into (IL, IR)
pub(crate) fn hmac_sha512_split(key: &[u8], parts: &[&[u8]]) -> Result<([u8; 32], [u8; 32]), CurveError> {
    let mut mac = HmacSha512::new_from_slice(key)
        .map_err(|e| CurveError::DerivationFailed(e.to_string()))?;
    for part in parts {
        mac.update(part);
    }
    let result = mac.finalize().into_bytes();

    let mut left = [0u8; 32];
    let mut right = [0u8; 32];
    left.copy_from_slice(&result[..32]);
    right.copy_from_slice(&result[32..]);
    Ok((left, right))
}

/// Length check shared by the curve verifiers
pub(crate) fn expect_signature_len(signature: &[u8]) -> Result<(), CurveError> {
    if signature.len() != 64 {
        return Err(CurveError::InvalidSignature(format!(
            "Signature must be 64 bytes, got {}",
            signature.len()
        )));
    }
    Ok(())
}

// MARK: - Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hmac_split_is_deterministic() {
        let a = hmac_sha512_split(b"ed25519 seed", &[b"seed"]).unwrap();
        let b = hmac_sha512_split(b"ed25519 seed", &[b"se", b"ed"]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a.0, a.1);
    }

    #[test]
    fn test_signature_length_check() {
        assert!(expect_signature_len(&[0u8; 64]).is_ok());
        assert!(matches!(
            expect_signature_len(&[0u8; 63]),
            Err(CurveError::InvalidSignature(_))
        ));
    }
}
