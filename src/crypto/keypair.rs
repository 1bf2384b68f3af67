//! Sui keypairs
//!
//! SECURITY: the secret key lives in a `Zeroizing` buffer and is wiped
//! when the keypair is dropped. `Debug` never prints it.

use bech32::{FromBase32, ToBase32, Variant};
use bip39::Mnemonic;
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;
use zeroize::Zeroizing;

use super::curves::{Ed25519Curve, EllipticCurve, Secp256k1Curve, Secp256r1Curve};
use super::derivation::{derive_secret_key, DerivationPath};
use super::intent::{intent_digest, personal_message_bytes, Intent};
use super::public_key::PublicKey;
use super::scheme::SignatureScheme;
use super::signature::{SerializedSignature, SingleSignature};
use crate::error::{SuiError, SuiResult};
use crate::types::SuiAddress;
use crate::log_debug;

/// Human-readable part of Bech32-encoded private keys
pub const SUI_PRIVATE_KEY_PREFIX: &str = "suiprivkey";

/// Signed and verified when a secret key is imported with validation
const VALIDATION_MESSAGE: &[u8] = b"sui keypair validation";

/// Sign raw bytes with the curve matching `scheme`
fn raw_sign(scheme: SignatureScheme, secret: &[u8; 32], message: &[u8]) -> SuiResult<[u8; 64]> {
    let signature = match scheme {
        SignatureScheme::Ed25519 => Ed25519Curve::sign(secret, message)?,
        SignatureScheme::Secp256k1 => Secp256k1Curve::sign(secret, message)?,
        SignatureScheme::Secp256r1 => Secp256r1Curve::sign(secret, message)?,
        _ => return Err(SuiError::UnsupportedScheme(scheme.to_string())),
    };
    Ok(signature)
}

fn raw_public_key(scheme: SignatureScheme, secret: &[u8; 32]) -> SuiResult<PublicKey> {
    let invalid = |e: super::curves::CurveError| SuiError::InvalidPrivateKey(e.to_string());
    let public_key = match scheme {
        SignatureScheme::Ed25519 => {
            PublicKey::Ed25519(Ed25519Curve::public_key_from_private(secret).map_err(invalid)?)
        }
        SignatureScheme::Secp256k1 => {
            PublicKey::Secp256k1(Secp256k1Curve::public_key_from_private(secret).map_err(invalid)?)
        }
        SignatureScheme::Secp256r1 => {
            PublicKey::Secp256r1(Secp256r1Curve::public_key_from_private(secret).map_err(invalid)?)
        }
        _ => return Err(SuiError::UnsupportedScheme(scheme.to_string())),
    };
    Ok(public_key)
}

/// Generate a fresh 12-word BIP-39 mnemonic
pub fn generate_mnemonic() -> SuiResult<Zeroizing<String>> {
    let mut entropy = Zeroizing::new([0u8; 16]);
    OsRng.fill_bytes(entropy.as_mut());
    let mnemonic = Mnemonic::from_entropy(entropy.as_ref())?;
    Ok(Zeroizing::new(mnemonic.to_string()))
}

pub struct SuiKeyPair {
    scheme: SignatureScheme,
    secret: Zeroizing<[u8; 32]>,
    public_key: PublicKey,
}

impl SuiKeyPair {
    /// Fresh random keypair
    pub fn generate(scheme: SignatureScheme) -> SuiResult<Self> {
        if !scheme.is_single_signer() {
            return Err(SuiError::UnsupportedScheme(scheme.to_string()));
        }
        loop {
            let mut secret = Zeroizing::new([0u8; 32]);
            OsRng.fill_bytes(secret.as_mut());
            // ECDSA secrets must be below the group order
            match Self::from_secret_key(scheme, secret.as_ref(), false) {
                Ok(keypair) => return Ok(keypair),
                Err(SuiError::InvalidPrivateKey(_)) => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Import a raw 32-byte secret. With `validate`, a test message is
    /// signed and verified before the keypair is returned.
    pub fn from_secret_key(scheme: SignatureScheme, secret: &[u8], validate: bool) -> SuiResult<Self> {
        if !scheme.is_single_signer() {
            return Err(SuiError::UnsupportedScheme(scheme.to_string()));
        }
        let secret: Zeroizing<[u8; 32]> = Zeroizing::new(secret.try_into().map_err(|_| {
            SuiError::InvalidKeyLength {
                scheme: scheme.name(),
                expected: 32,
                actual: secret.len(),
            }
        })?);

        let public_key = raw_public_key(scheme, &secret)?;
        let keypair = Self {
            scheme,
            secret,
            public_key,
        };

        if validate {
            let signature = keypair.sign_raw(VALIDATION_MESSAGE)?;
            let verified = keypair
                .public_key
                .verify_raw(VALIDATION_MESSAGE, &signature)
                .unwrap_or(false);
            if !verified {
                return Err(SuiError::InvalidPrivateKey(
                    "validation signature did not verify".into(),
                ));
            }
        }
        Ok(keypair)
    }

    /// Derive from a BIP-39 phrase (empty passphrase). `None` uses the
    /// scheme's default path.
    pub fn from_mnemonic(scheme: SignatureScheme, phrase: &str, path: Option<&str>) -> SuiResult<Self> {
        let mnemonic = Mnemonic::parse(phrase)?;
        let seed = Zeroizing::new(mnemonic.to_seed(""));
        let path = match path {
            Some(path) => path,
            None => DerivationPath::default_for(scheme)
                .ok_or_else(|| SuiError::UnsupportedScheme(scheme.to_string()))?,
        };
        Self::derive_from_seed(scheme, seed.as_ref(), path)
    }

    pub fn derive_from_seed(scheme: SignatureScheme, seed: &[u8], path: &str) -> SuiResult<Self> {
        let secret = derive_secret_key(scheme, seed, path)?;
        log_debug!("keypair", "Derived keypair", scheme = scheme, path = path);
        Self::from_secret_key(scheme, secret.as_ref(), false)
    }

    /// Bech32 `suiprivkey1...` encoding of `flag || secret`
    pub fn to_bech32(&self) -> SuiResult<Zeroizing<String>> {
        let mut payload = Zeroizing::new(Vec::with_capacity(33));
        payload.push(self.scheme.flag());
        payload.extend_from_slice(self.secret.as_ref());
        let encoded = bech32::encode(SUI_PRIVATE_KEY_PREFIX, payload.to_base32(), Variant::Bech32)?;
        Ok(Zeroizing::new(encoded))
    }

    pub fn from_bech32(encoded: &str) -> SuiResult<Self> {
        let (hrp, data, variant) = bech32::decode(encoded.trim())?;
        if hrp != SUI_PRIVATE_KEY_PREFIX || variant != Variant::Bech32 {
            return Err(SuiError::InvalidPrivateKey(format!(
                "expected a `{}` bech32 key",
                SUI_PRIVATE_KEY_PREFIX
            )));
        }
        let payload = Zeroizing::new(Vec::<u8>::from_base32(&data)?);
        if payload.len() != 33 {
            return Err(SuiError::InvalidPrivateKey(format!(
                "payload must be 33 bytes, got {}",
                payload.len()
            )));
        }
        let scheme = SignatureScheme::from_flag(payload[0])
            .filter(SignatureScheme::is_single_signer)
            .ok_or_else(|| SuiError::UnsupportedScheme(format!("flag 0x{:02x}", payload[0])))?;
        Self::from_secret_key(scheme, &payload[1..], true)
    }

    pub fn scheme(&self) -> SignatureScheme {
        self.scheme
    }

    pub fn public_key(&self) -> PublicKey {
        self.public_key
    }

    pub fn address(&self) -> SuiAddress {
        self.public_key.to_sui_address()
    }

    /// Raw 64-byte signature over `message`, no intent
    pub fn sign_raw(&self, message: &[u8]) -> SuiResult<[u8; 64]> {
        raw_sign(self.scheme, &self.secret, message)
    }

    pub fn sign_with_intent(&self, intent: Intent, payload: &[u8]) -> SuiResult<SerializedSignature> {
        let digest = intent_digest(intent, payload);
        let signature = self.sign_raw(&digest)?;
        Ok(SerializedSignature::Single(SingleSignature {
            signature,
            public_key: self.public_key,
        }))
    }

    pub fn sign_personal_message(&self, message: &[u8]) -> SuiResult<SerializedSignature> {
        self.sign_with_intent(Intent::personal_message(), &personal_message_bytes(message))
    }

    pub fn sign_transaction(&self, tx_bytes: &[u8]) -> SuiResult<SerializedSignature> {
        self.sign_with_intent(Intent::transaction_data(), tx_bytes)
    }
}

impl fmt::Debug for SuiKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuiKeyPair")
            .field("scheme", &self.scheme)
            .field("public_key", &self.public_key)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::derivation::DEFAULT_ED25519_PATH;

    const TEST_MNEMONIC: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_generate_all_schemes() {
        for scheme in [SignatureScheme::Ed25519, SignatureScheme::Secp256k1, SignatureScheme::Secp256r1] {
            let kp = SuiKeyPair::generate(scheme).unwrap();
            assert_eq!(kp.scheme(), scheme);
            assert_eq!(kp.public_key().scheme(), scheme);
        }
        assert!(SuiKeyPair::generate(SignatureScheme::MultiSig).is_err());
    }

    #[test]
    fn test_bech32_roundtrip() {
        for scheme in [SignatureScheme::Ed25519, SignatureScheme::Secp256k1, SignatureScheme::Secp256r1] {
            let kp = SuiKeyPair::generate(scheme).unwrap();
            let encoded = kp.to_bech32().unwrap();
            assert!(encoded.starts_with("suiprivkey1"));
            let back = SuiKeyPair::from_bech32(&encoded).unwrap();
            assert_eq!(back.public_key(), kp.public_key());
        }
    }

    #[test]
    fn test_bech32_rejects_wrong_hrp() {
        let data = [0u8; 33].to_base32();
        let other = bech32::encode("notsui", data, Variant::Bech32).unwrap();
        assert!(matches!(
            SuiKeyPair::from_bech32(&other),
            Err(SuiError::InvalidPrivateKey(_))
        ));

        let mut payload = vec![0x03u8];
        payload.extend_from_slice(&[1u8; 32]);
        let multisig = bech32::encode(SUI_PRIVATE_KEY_PREFIX, payload.to_base32(), Variant::Bech32).unwrap();
        assert!(matches!(
            SuiKeyPair::from_bech32(&multisig),
            Err(SuiError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_import_checks_length_and_range() {
        let err = SuiKeyPair::from_secret_key(SignatureScheme::Ed25519, &[1u8; 31], true).unwrap_err();
        assert!(matches!(err, SuiError::InvalidKeyLength { expected: 32, actual: 31, .. }));

        // Zero is not a valid ECDSA secret
        let err = SuiKeyPair::from_secret_key(SignatureScheme::Secp256k1, &[0u8; 32], true).unwrap_err();
        assert!(matches!(err, SuiError::InvalidPrivateKey(_)));
        let err = SuiKeyPair::from_secret_key(SignatureScheme::Secp256r1, &[0xffu8; 32], true).unwrap_err();
        assert!(matches!(err, SuiError::InvalidPrivateKey(_)));
    }

    #[test]
    fn test_mnemonic_derivation_is_stable() {
        let a = SuiKeyPair::from_mnemonic(SignatureScheme::Ed25519, TEST_MNEMONIC, None).unwrap();
        let b = SuiKeyPair::from_mnemonic(SignatureScheme::Ed25519, TEST_MNEMONIC, Some(DEFAULT_ED25519_PATH)).unwrap();
        assert_eq!(a.address(), b.address());

        let k1 = SuiKeyPair::from_mnemonic(SignatureScheme::Secp256k1, TEST_MNEMONIC, None).unwrap();
        assert_ne!(a.address(), k1.address());

        assert!(SuiKeyPair::from_mnemonic(SignatureScheme::Ed25519, "not a mnemonic", None).is_err());
    }

    #[test]
    fn test_sign_verify_with_intent() {
        for scheme in [SignatureScheme::Ed25519, SignatureScheme::Secp256k1, SignatureScheme::Secp256r1] {
            let kp = SuiKeyPair::generate(scheme).unwrap();
            let sig = kp.sign_personal_message(b"hello").unwrap().to_base64();
            assert!(kp.public_key().verify_personal_message(b"hello", &sig).unwrap());
            assert!(!kp.public_key().verify_personal_message(b"hellp", &sig).unwrap());
            // Different intent scope
            assert!(!kp.public_key().verify_transaction(b"hello", &sig).unwrap());

            let other = SuiKeyPair::generate(scheme).unwrap();
            assert!(!other.public_key().verify_personal_message(b"hello", &sig).unwrap());
        }
    }

    #[test]
    fn test_ecdsa_signatures_are_deterministic() {
        let kp = SuiKeyPair::from_secret_key(SignatureScheme::Secp256r1, &[5u8; 32], true).unwrap();
        let a = kp.sign_transaction(b"tx").unwrap();
        let b = kp.sign_transaction(b"tx").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_generate_mnemonic() {
        let phrase = generate_mnemonic().unwrap();
        assert_eq!(phrase.split_whitespace().count(), 12);
        assert!(SuiKeyPair::from_mnemonic(SignatureScheme::Secp256r1, &phrase, None).is_ok());
    }

    #[test]
    fn test_debug_hides_secret() {
        let kp = SuiKeyPair::from_secret_key(SignatureScheme::Ed25519, &[0xabu8; 32], false).unwrap();
        let debug = format!("{:?}", kp);
        assert!(debug.contains("[REDACTED]"));
        assert!(debug.contains("Ed25519"));
    }
}
