//! secp256k1 Curve Implementation
//!
//! Features:
//! - ECDSA over SHA-256(message) with RFC 6979 deterministic nonces
//! - Low-S normalized 64-byte `r || s` signatures (no DER)
//! - Compressed 33-byte public keys
//! - BIP-32 key derivation

use super::{expect_signature_len, hmac_sha512_split, CurveError, EllipticCurve, KeyDerivation};
use secp256k1::ecdsa::Signature;
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use sha2::{Digest, Sha256};

/// secp256k1 curve implementation
pub struct Secp256k1Curve;

fn message_digest(message: &[u8]) -> Message {
    let hash: [u8; 32] = Sha256::digest(message).into();
    Message::from_digest(hash)
}

impl EllipticCurve for Secp256k1Curve {
    type PublicKey = [u8; 33]; // Compressed

    fn public_key_from_private(private_key: &[u8; 32]) -> Result<Self::PublicKey, CurveError> {
        let secp = Secp256k1::signing_only();
        let sk = SecretKey::from_slice(private_key)
            .map_err(|e| CurveError::InvalidPrivateKey(e.to_string()))?;

        Ok(PublicKey::from_secret_key(&secp, &sk).serialize())
    }

    fn sign(private_key: &[u8; 32], message: &[u8]) -> Result<[u8; 64], CurveError> {
        let secp = Secp256k1::signing_only();
        let sk = SecretKey::from_slice(private_key)
            .map_err(|e| CurveError::InvalidPrivateKey(e.to_string()))?;

        // libsecp256k1 derives the nonce with RFC 6979
        let mut sig = secp.sign_ecdsa(&message_digest(message), &sk);
        sig.normalize_s();

        Ok(sig.serialize_compact())
    }

    fn verify(public_key: &[u8], message: &[u8], signature: &[u8]) -> Result<bool, CurveError> {
        expect_signature_len(signature)?;

        let secp = Secp256k1::verification_only();
        let pk = PublicKey::from_slice(public_key)
            .map_err(|e| CurveError::InvalidPublicKey(e.to_string()))?;

        let sig = match Signature::from_compact(signature) {
            Ok(sig) => sig,
            // r or s out of range: structurally sized but not a valid signature
            Err(_) => return Ok(false),
        };

        // libsecp256k1 rejects high-S signatures here
        Ok(secp.verify_ecdsa(&message_digest(message), &sig, &pk).is_ok())
    }
}

impl KeyDerivation for Secp256k1Curve {
    const MASTER_SECRET: &'static [u8] = b"Bitcoin seed";
    const SUPPORTS_NON_HARDENED: bool = true;

    fn derive_child(
        parent_private: &[u8; 32],
        parent_chain_code: &[u8; 32],
        index: u32,
        hardened: bool,
    ) -> Result<([u8; 32], [u8; 32]), CurveError> {
        let secp = Secp256k1::signing_only();
        let parent_sk = SecretKey::from_slice(parent_private)
            .map_err(|e| CurveError::InvalidPrivateKey(e.to_string()))?;

        let actual_index = if hardened { index | 0x8000_0000 } else { index };

        let (il, ir) = if hardened {
            // Hardened: 0x00 || private_key || index
            hmac_sha512_split(
                parent_chain_code,
                &[&[0x00], parent_private, &actual_index.to_be_bytes()],
            )?
        } else {
            // Normal: public_key || index
            let parent_pk = PublicKey::from_secret_key(&secp, &parent_sk);
            hmac_sha512_split(
                parent_chain_code,
                &[&parent_pk.serialize(), &actual_index.to_be_bytes()],
            )?
        };

        // child_key = parse256(IL) + parent_key (mod n)
        let tweak = SecretKey::from_slice(&il)
            .map_err(|e| CurveError::DerivationFailed(format!("Invalid tweak: {}", e)))?;

        let child_sk = parent_sk
            .add_tweak(&tweak.into())
            .map_err(|e| CurveError::DerivationFailed(format!("Tweak failed: {}", e)))?;

        Ok((child_sk.secret_bytes(), ir))
    }
}

// MARK: - Tests
