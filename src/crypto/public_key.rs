//! Scheme-tagged public keys
//!
//! A public key is the raw curve encoding (32 bytes for Ed25519, 33-byte
//! compressed SEC1 for the ECDSA curves) tagged with its scheme. The
//! "Sui bytes" form prefixes the scheme flag and is what addresses,
//! signatures and multisig keys are built from.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fmt;

use super::curves::{CurveError, Ed25519Curve, EllipticCurve, Secp256k1Curve, Secp256r1Curve};
use super::intent::{personal_message_bytes, Intent};
use super::scheme::SignatureScheme;
use super::signature::SerializedSignature;
use crate::error::{SuiError, SuiResult};
use crate::types::{blake2b256, SuiAddress};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PublicKey {
    Ed25519([u8; 32]),
    Secp256k1([u8; 33]),
    Secp256r1([u8; 33]),
}

impl PublicKey {
    /// Parse raw key bytes for `scheme`, checking the point is on the curve
    pub fn from_bytes(scheme: SignatureScheme, bytes: &[u8]) -> SuiResult<Self> {
        let expected = scheme
            .public_key_size()
            .filter(|_| scheme.is_single_signer())
            .ok_or_else(|| SuiError::UnsupportedScheme(scheme.to_string()))?;
        if bytes.len() != expected {
            return Err(SuiError::InvalidPublicKey(format!(
                "{} public key must be {} bytes, got {}",
                scheme,
                expected,
                bytes.len()
            )));
        }

        match scheme {
            SignatureScheme::Ed25519 => {
                let mut arr = [0u8; 32];
                arr.copy_from_slice(bytes);
                ed25519_dalek::VerifyingKey::from_bytes(&arr)
                    .map_err(|e| SuiError::InvalidPublicKey(e.to_string()))?;
                Ok(PublicKey::Ed25519(arr))
            }
            SignatureScheme::Secp256k1 => {
                secp256k1::PublicKey::from_slice(bytes)
                    .map_err(|e| SuiError::InvalidPublicKey(e.to_string()))?;
                let mut arr = [0u8; 33];
                arr.copy_from_slice(bytes);
                Ok(PublicKey::Secp256k1(arr))
            }
            SignatureScheme::Secp256r1 => {
                p256::PublicKey::from_sec1_bytes(bytes)
                    .map_err(|_| SuiError::InvalidPublicKey("not a P-256 point".into()))?;
                let mut arr = [0u8; 33];
                arr.copy_from_slice(bytes);
                Ok(PublicKey::Secp256r1(arr))
            }
            SignatureScheme::MultiSig | SignatureScheme::ZkLogin => {
                Err(SuiError::UnsupportedScheme(scheme.to_string()))
            }
        }
    }

    /// Wrap raw key bytes after a length check only.
    ///
    /// Used for keys carried inside signatures, where a key that is not a
    /// curve point simply fails verification.
    pub(crate) fn from_raw_unchecked(scheme: SignatureScheme, bytes: &[u8]) -> SuiResult<Self> {
        let invalid = || {
            SuiError::InvalidPublicKey(format!("{} public key has the wrong length {}", scheme, bytes.len()))
        };
        match scheme {
            SignatureScheme::Ed25519 => Ok(PublicKey::Ed25519(bytes.try_into().map_err(|_| invalid())?)),
            SignatureScheme::Secp256k1 => Ok(PublicKey::Secp256k1(bytes.try_into().map_err(|_| invalid())?)),
            SignatureScheme::Secp256r1 => Ok(PublicKey::Secp256r1(bytes.try_into().map_err(|_| invalid())?)),
            SignatureScheme::MultiSig | SignatureScheme::ZkLogin => {
                Err(SuiError::UnsupportedScheme(scheme.to_string()))
            }
        }
    }

    /// Raw key bytes in base64, scheme given out of band
    pub fn from_base64(scheme: SignatureScheme, encoded: &str) -> SuiResult<Self> {
        let bytes = STANDARD.decode(encoded.trim())?;
        Self::from_bytes(scheme, &bytes)
    }

    /// `flag || raw key`
    pub fn from_sui_bytes(bytes: &[u8]) -> SuiResult<Self> {
        let (&flag, raw) = bytes
            .split_first()
            .ok_or_else(|| SuiError::InvalidPublicKey("empty input".into()))?;
        let scheme = SignatureScheme::from_flag(flag)
            .ok_or_else(|| SuiError::UnsupportedScheme(format!("flag 0x{:02x}", flag)))?;
        Self::from_bytes(scheme, raw)
    }

    pub fn from_sui_base64(encoded: &str) -> SuiResult<Self> {
        let bytes = STANDARD.decode(encoded.trim())?;
        Self::from_sui_bytes(&bytes)
    }

    pub fn scheme(&self) -> SignatureScheme {
        match self {
            PublicKey::Ed25519(_) => SignatureScheme::Ed25519,
            PublicKey::Secp256k1(_) => SignatureScheme::Secp256k1,
            PublicKey::Secp256r1(_) => SignatureScheme::Secp256r1,
        }
    }

    pub fn flag(&self) -> u8 {
        self.scheme().flag()
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            PublicKey::Ed25519(bytes) => bytes.as_slice(),
            PublicKey::Secp256k1(bytes) | PublicKey::Secp256r1(bytes) => bytes.as_slice(),
        }
    }

    pub fn to_sui_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.as_bytes().len());
        out.push(self.flag());
        out.extend_from_slice(self.as_bytes());
        out
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.as_bytes())
    }

    pub fn to_sui_base64(&self) -> String {
        STANDARD.encode(self.to_sui_bytes())
    }

    /// BLAKE2b-256(flag || raw key)
    pub fn to_sui_address(&self) -> SuiAddress {
        SuiAddress::new(blake2b256(&[&[self.flag()], self.as_bytes()]))
    }

    /// Verify a raw 64-byte signature over `message`.
    ///
    /// Key bytes that do not decode to a curve point never verify.
    pub fn verify_raw(&self, message: &[u8], signature: &[u8]) -> SuiResult<bool> {
        let result = match self {
            PublicKey::Ed25519(pk) => Ed25519Curve::verify(pk, message, signature),
            PublicKey::Secp256k1(pk) => Secp256k1Curve::verify(pk, message, signature),
            PublicKey::Secp256r1(pk) => Secp256r1Curve::verify(pk, message, signature),
        };
        match result {
            Ok(valid) => Ok(valid),
            Err(CurveError::InvalidPublicKey(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Verify a serialized signature over `intent || payload`.
    ///
    /// A signature by another scheme or another key is `Ok(false)`; only
    /// structurally malformed input is an error.
    pub fn verify_with_intent(
        &self,
        intent: Intent,
        payload: &[u8],
        serialized: &str,
    ) -> SuiResult<bool> {
        let single = match SerializedSignature::parse(serialized)? {
            SerializedSignature::Single(single) => single,
            SerializedSignature::MultiSig(_) => return Ok(false),
        };
        if single.public_key != *self {
            return Ok(false);
        }
        single.verify(intent, payload)
    }

    pub fn verify_personal_message(&self, message: &[u8], serialized: &str) -> SuiResult<bool> {
        self.verify_with_intent(
            Intent::personal_message(),
            &personal_message_bytes(message),
            serialized,
        )
    }

    pub fn verify_transaction(&self, tx_bytes: &[u8], serialized: &str) -> SuiResult<bool> {
        self.verify_with_intent(Intent::transaction_data(), tx_bytes, serialized)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_sui_base64())
    }
}
