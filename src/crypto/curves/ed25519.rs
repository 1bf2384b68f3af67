//! Ed25519 Curve Implementation
//!
//! Features:
//! - EdDSA signing and verification (RFC 8032)
//! - SLIP-0010 key derivation (hardened only)

use super::{expect_signature_len, hmac_sha512_split, CurveError, EllipticCurve, KeyDerivation};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};

/// Ed25519 curve implementation
pub struct Ed25519Curve;

impl EllipticCurve for Ed25519Curve {
    type PublicKey = [u8; 32];

    fn public_key_from_private(private_key: &[u8; 32]) -> Result<Self::PublicKey, CurveError> {
        let signing_key = SigningKey::from_bytes(private_key);
        Ok(signing_key.verifying_key().to_bytes())
    }

    fn sign(private_key: &[u8; 32], message: &[u8]) -> Result<[u8; 64], CurveError> {
        let signing_key = SigningKey::from_bytes(private_key);
        Ok(signing_key.sign(message).to_bytes())
    }

    fn verify(public_key: &[u8], message: &[u8], signature: &[u8]) -> Result<bool, CurveError> {
        let pk_bytes: [u8; 32] = public_key.try_into().map_err(|_| {
            CurveError::InvalidPublicKey(format!(
                "Public key must be 32 bytes, got {}",
                public_key.len()
            ))
        })?;
        expect_signature_len(signature)?;

        let verifying_key = VerifyingKey::from_bytes(&pk_bytes)
            .map_err(|e| CurveError::InvalidPublicKey(e.to_string()))?;

        let mut sig_bytes = [0u8; 64];
        sig_bytes.copy_from_slice(signature);
        let sig = Signature::from_bytes(&sig_bytes);

        Ok(verifying_key.verify(message, &sig).is_ok())
    }
}

impl KeyDerivation for Ed25519Curve {
    const MASTER_SECRET: &'static [u8] = b"ed25519 seed";
    const SUPPORTS_NON_HARDENED: bool = false;

    fn derive_child(
        parent_private: &[u8; 32],
        parent_chain_code: &[u8; 32],
        index: u32,
        hardened: bool,
    ) -> Result<([u8; 32], [u8; 32]), CurveError> {
        // SLIP-0010 defines only hardened children for ed25519
        if !hardened {
            return Err(CurveError::DerivationFailed(
                "Ed25519 only supports hardened derivation".into(),
            ));
        }

        let actual_index = index | 0x8000_0000;

        // 0x00 || private_key || index
        hmac_sha512_split(
            parent_chain_code,
            &[&[0x00], parent_private, &actual_index.to_be_bytes()],
        )
    }
}

// MARK: - Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ed25519_sign_verify() {
        let sk = [7u8; 32];
        let pk = Ed25519Curve::public_key_from_private(&sk).unwrap();

        let message = [0xabu8; 32];
        let signature = Ed25519Curve::sign(&sk, &message).unwrap();
        assert!(Ed25519Curve::verify(&pk, &message, &signature).unwrap());

        let wrong = [0xacu8; 32];
        assert!(!Ed25519Curve::verify(&pk, &wrong, &signature).unwrap());
    }

    #[test]
    fn test_ed25519_rejects_bad_lengths() {
        let sk = [7u8; 32];
        let pk = Ed25519Curve::public_key_from_private(&sk).unwrap();
        assert!(Ed25519Curve::verify(&pk[..31], b"m", &[0u8; 64]).is_err());
        assert!(Ed25519Curve::verify(&pk, b"m", &[0u8; 10]).is_err());
    }

    #[test]
    fn test_ed25519_non_hardened_rejected() {
        let result = Ed25519Curve::derive_child(&[1u8; 32], &[2u8; 32], 0, false);
        assert!(matches!(result, Err(CurveError::DerivationFailed(_))));
    }

    #[test]
    fn test_slip10_vector_1() {
        // SLIP-0010 test vector 1 for ed25519, chain m/0'
        let seed = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let (master, chain) = hmac_sha512_split(Ed25519Curve::MASTER_SECRET, &[&seed]).unwrap();
        assert_eq!(
            hex::encode(master),
            "2b4be7f19ee27bbf30c667b642d5f4aa69fd169872f8fc3059c08ebae2eb19e7"
        );

        let (child, _) = Ed25519Curve::derive_child(&master, &chain, 0, true).unwrap();
        assert_eq!(
            hex::encode(child),
            "68e0fe46dfb67e368c75379acec591dad19df3cde26e63b93a8e704f1dade7a3"
        );
    }
}
