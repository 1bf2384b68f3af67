//! Serialized signatures
//!
//! Wire form (base64):
//! - single signer: `flag || signature(64) || raw public key`
//! - multisig: `0x03 || BCS(MultiSig)`

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fmt;
use std::str::FromStr;

use super::intent::{intent_digest, personal_message_bytes, Intent};
use super::multisig::MultiSig;
use super::public_key::PublicKey;
use super::scheme::SignatureScheme;
use crate::error::{SuiError, SuiResult};
use crate::types::SuiAddress;

/// Signature from one keypair together with the key that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleSignature {
    pub signature: [u8; 64],
    pub public_key: PublicKey,
}

impl SingleSignature {
    pub fn scheme(&self) -> SignatureScheme {
        self.public_key.scheme()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + 64 + self.public_key.as_bytes().len());
        out.push(self.public_key.flag());
        out.extend_from_slice(&self.signature);
        out.extend_from_slice(self.public_key.as_bytes());
        out
    }

    /// Recompute the intent digest and check the embedded key signed it
    pub fn verify(&self, intent: Intent, payload: &[u8]) -> SuiResult<bool> {
        let digest = intent_digest(intent, payload);
        self.public_key.verify_raw(&digest, &self.signature)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerializedSignature {
    Single(SingleSignature),
    MultiSig(MultiSig),
}

impl SerializedSignature {
    pub fn from_bytes(bytes: &[u8]) -> SuiResult<Self> {
        let (&flag, rest) = bytes
            .split_first()
            .ok_or_else(|| SuiError::InvalidSignature("empty signature".into()))?;
        let scheme = SignatureScheme::from_flag(flag)
            .ok_or_else(|| SuiError::InvalidSignature(format!("unknown scheme flag 0x{:02x}", flag)))?;

        match scheme {
            SignatureScheme::MultiSig => Ok(SerializedSignature::MultiSig(MultiSig::from_bcs_bytes(rest)?)),
            SignatureScheme::ZkLogin => Err(SuiError::UnsupportedScheme(scheme.to_string())),
            _ => {
                let pk_len = scheme.public_key_size().unwrap_or_default();
                if rest.len() != 64 + pk_len {
                    return Err(SuiError::InvalidSignature(format!(
                        "{} signature must be {} bytes, got {}",
                        scheme,
                        1 + 64 + pk_len,
                        bytes.len()
                    )));
                }
                let mut signature = [0u8; 64];
                signature.copy_from_slice(&rest[..64]);
                // Point validity is left to verification
                let public_key = PublicKey::from_raw_unchecked(scheme, &rest[64..])?;
                Ok(SerializedSignature::Single(SingleSignature {
                    signature,
                    public_key,
                }))
            }
        }
    }

    pub fn parse(encoded: &str) -> SuiResult<Self> {
        let bytes = STANDARD.decode(encoded.trim())?;
        Self::from_bytes(&bytes)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            SerializedSignature::Single(single) => single.to_bytes(),
            SerializedSignature::MultiSig(multisig) => {
                let mut out = vec![SignatureScheme::MultiSig.flag()];
                out.extend_from_slice(&multisig.to_bcs_bytes());
                out
            }
        }
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }

    pub fn scheme(&self) -> SignatureScheme {
        match self {
            SerializedSignature::Single(single) => single.scheme(),
            SerializedSignature::MultiSig(_) => SignatureScheme::MultiSig,
        }
    }

    /// Address of whoever this signature claims to come from
    pub fn signer_address(&self) -> SuiAddress {
        match self {
            SerializedSignature::Single(single) => single.public_key.to_sui_address(),
            SerializedSignature::MultiSig(multisig) => multisig.multisig_pk().address(),
        }
    }

    fn verify(&self, intent: Intent, payload: &[u8]) -> SuiResult<bool> {
        match self {
            SerializedSignature::Single(single) => single.verify(intent, payload),
            SerializedSignature::MultiSig(multisig) => multisig.verify(intent, payload),
        }
    }
}

impl fmt::Display for SerializedSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base64())
    }
}

impl FromStr for SerializedSignature {
    type Err = SuiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn recover_signer(intent: Intent, payload: &[u8], serialized: &str) -> SuiResult<SuiAddress> {
    let signature = SerializedSignature::parse(serialized)?;
    if !signature.verify(intent, payload)? {
        return Err(SuiError::InvalidSignature(format!(
            "{} signature does not match the signed bytes",
            signature.scheme()
        )));
    }
    Ok(signature.signer_address())
}

/// Verify a personal-message signature and return the signer's address
pub fn verify_personal_message_signature(message: &[u8], serialized: &str) -> SuiResult<SuiAddress> {
    recover_signer(
        Intent::personal_message(),
        &personal_message_bytes(message),
        serialized,
    )
}

/// Verify a transaction signature and return the signer's address
pub fn verify_transaction_signature(tx_bytes: &[u8], serialized: &str) -> SuiResult<SuiAddress> {
    recover_signer(Intent::transaction_data(), tx_bytes, serialized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keypair::SuiKeyPair;

    #[test]
    fn test_single_signature_layout() {
        let kp = SuiKeyPair::derive_from_seed(
            SignatureScheme::Secp256k1,
            &[3u8; 64],
            crate::crypto::derivation::DEFAULT_SECP256K1_PATH,
        )
        .unwrap();
        let sig = kp.sign_personal_message(b"layout").unwrap();
        let bytes = sig.to_bytes();
        assert_eq!(bytes.len(), 1 + 64 + 33);
        assert_eq!(bytes[0], 0x01);
        assert_eq!(&bytes[65..], kp.public_key().as_bytes());
        assert_eq!(SerializedSignature::parse(&sig.to_base64()).unwrap(), sig);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(
            SerializedSignature::from_bytes(&[]),
            Err(SuiError::InvalidSignature(_))
        ));
        assert!(matches!(
            SerializedSignature::from_bytes(&[0x00; 10]),
            Err(SuiError::InvalidSignature(_))
        ));
        assert!(matches!(
            SerializedSignature::from_bytes(&[0x04; 98]),
            Err(SuiError::InvalidSignature(_))
        ));
        assert!(matches!(
            SerializedSignature::from_bytes(&[0x05; 98]),
            Err(SuiError::UnsupportedScheme(_))
        ));
        assert!(SerializedSignature::parse("not base64!").is_err());
    }

    #[test]
    fn test_recovers_signer_address() {
        let kp = SuiKeyPair::generate(SignatureScheme::Ed25519).unwrap();
        let sig = kp.sign_personal_message(b"who signed").unwrap().to_base64();
        assert_eq!(
            verify_personal_message_signature(b"who signed", &sig).unwrap(),
            kp.address()
        );
        assert!(matches!(
            verify_personal_message_signature(b"someone else", &sig),
            Err(SuiError::InvalidSignature(_))
        ));
        // Same bytes under the transaction intent must not verify
        assert!(verify_transaction_signature(b"who signed", &sig).is_err());
    }

    #[test]
    fn test_off_curve_embedded_key_parses_but_fails() {
        let kp = SuiKeyPair::derive_from_seed(
            SignatureScheme::Secp256r1,
            &[5u8; 64],
            crate::crypto::derivation::DEFAULT_SECP256R1_PATH,
        )
        .unwrap();
        let mut bytes = kp.sign_personal_message(b"tamper").unwrap().to_bytes();
        bytes[66..].fill(0xff);

        let parsed = SerializedSignature::from_bytes(&bytes).unwrap();
        assert!(!parsed
            .verify(Intent::personal_message(), &personal_message_bytes(b"tamper"))
            .unwrap());
        assert!(matches!(
            verify_personal_message_signature(b"tamper", &parsed.to_base64()),
            Err(SuiError::InvalidSignature(_))
        ));
    }
}
