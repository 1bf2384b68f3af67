//! Secp256r1 (P-256/NIST) Curve Implementation
//!
//! Features:
//! - ECDSA over SHA-256(message) with RFC 6979 deterministic nonces
//! - Low-S normalized 64-byte `r || s` signatures
//!
//! There is no P-256 derivation chain: HD keys for this curve come from the
//! secp256k1 BIP-32 chain (see `derivation`).

use super::{expect_signature_len, CurveError, EllipticCurve};
use p256::{
    ecdsa::{
        signature::{DigestSigner, DigestVerifier},
        Signature, SigningKey, VerifyingKey,
    },
    elliptic_curve::sec1::ToEncodedPoint,
    FieldBytes, SecretKey,
};
use sha2::{Digest, Sha256};

/// Secp256r1 (P-256) curve implementation
pub struct Secp256r1Curve;

impl Secp256r1Curve {
    fn secret_key(private_key: &[u8; 32]) -> Result<SecretKey, CurveError> {
        SecretKey::from_bytes(&FieldBytes::clone_from_slice(private_key))
            .map_err(|e| CurveError::InvalidPrivateKey(format!("Invalid private key: {:?}", e)))
    }

    fn compressed(secret_key: &SecretKey) -> [u8; 33] {
        let pk_compressed = secret_key.public_key().to_encoded_point(true);
        let mut pk_bytes = [0u8; 33];
        pk_bytes.copy_from_slice(pk_compressed.as_bytes());
        pk_bytes
    }
}

impl EllipticCurve for Secp256r1Curve {
    type PublicKey = [u8; 33]; // Compressed public key

    fn public_key_from_private(private_key: &[u8; 32]) -> Result<Self::PublicKey, CurveError> {
        let secret_key = Self::secret_key(private_key)?;
        Ok(Self::compressed(&secret_key))
    }

    fn sign(private_key: &[u8; 32], message: &[u8]) -> Result<[u8; 64], CurveError> {
        let signing_key = SigningKey::from(Self::secret_key(private_key)?);

        // DigestSigner derives k from the key and SHA-256(message) per RFC 6979
        let signature: Signature = signing_key
            .try_sign_digest(Sha256::new_with_prefix(message))
            .map_err(|e| CurveError::SigningFailed(e.to_string()))?;
        let signature = signature.normalize_s().unwrap_or(signature);

        let mut out = [0u8; 64];
        out.copy_from_slice(&signature.to_bytes());
        Ok(out)
    }

    fn verify(public_key: &[u8], message: &[u8], signature: &[u8]) -> Result<bool, CurveError> {
        expect_signature_len(signature)?;

        let verifying_key = VerifyingKey::from_sec1_bytes(public_key)
            .map_err(|e| CurveError::InvalidPublicKey(format!("Invalid key: {:?}", e)))?;

        let sig = match Signature::from_slice(signature) {
            Ok(sig) => sig,
            Err(_) => return Ok(false),
        };

        // Malleated (high-S) signatures are not accepted
        if sig.normalize_s().is_some() {
            return Ok(false);
        }

        Ok(verifying_key
            .verify_digest(Sha256::new_with_prefix(message), &sig)
            .is_ok())
    }
}

// MARK: - Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secp256r1_sign_verify() {
        let sk = [42u8; 32];
        let pk = Secp256r1Curve::public_key_from_private(&sk).unwrap();
        assert!(pk[0] == 0x02 || pk[0] == 0x03);

        let message = b"Hello, P-256!";
        let signature = Secp256r1Curve::sign(&sk, message).unwrap();
        assert!(Secp256r1Curve::verify(&pk, message, &signature).unwrap());
        assert!(!Secp256r1Curve::verify(&pk, b"Wrong message", &signature).unwrap());
    }

    #[test]
    fn test_secp256r1_deterministic() {
        let sk = [9u8; 32];
        let a = Secp256r1Curve::sign(&sk, b"same").unwrap();
        let b = Secp256r1Curve::sign(&sk, b"same").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_secp256r1_rejects_high_s() {
        let sk = [5u8; 32];
        let pk = Secp256r1Curve::public_key_from_private(&sk).unwrap();
        let signature = Secp256r1Curve::sign(&sk, b"msg").unwrap();

        // s' = n - s is the malleated twin of a low-S signature
        let sig = Signature::from_slice(&signature).unwrap();
        let (r, s) = sig.split_scalars();
        let high = Signature::from_scalars(r, -*s).unwrap();
        assert!(!Secp256r1Curve::verify(&pk, b"msg", &high.to_bytes()).unwrap());
    }
}
