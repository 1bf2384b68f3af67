//! Elliptic Curve Traits
//!
//! Defines the common interface for the three signing curves.

use super::CurveError;

/// Core trait for elliptic curve operations
pub trait EllipticCurve {
    /// Raw public key as it appears on the wire
    type PublicKey: AsRef<[u8]> + Copy;

    /// Derive the public key from a 32-byte secret
    fn public_key_from_private(private_key: &[u8; 32]) -> Result<Self::PublicKey, CurveError>;

    /// Check that 32 bytes form a usable secret for this curve
    fn validate_private_key(private_key: &[u8; 32]) -> Result<(), CurveError> {
        Self::public_key_from_private(private_key).map(|_| ())
    }

    /// Sign a message, producing a fixed 64-byte signature
    fn sign(private_key: &[u8; 32], message: &[u8]) -> Result<[u8; 64], CurveError>;

    /// Verify a 64-byte signature. Malformed keys are errors, bad signatures are `Ok(false)`.
    fn verify(public_key: &[u8], message: &[u8], signature: &[u8]) -> Result<bool, CurveError>;
}

/// Hierarchical derivation from a seed (SLIP-0010 / BIP-32)
pub trait KeyDerivation: EllipticCurve {
    /// HMAC key for the master node
    const MASTER_SECRET: &'static [u8];

    /// Whether non-hardened children can be derived
    const SUPPORTS_NON_HARDENED: bool;

    /// Derive a child key from its parent.
    /// `index` excludes the hardened bit; `hardened` selects it.
    fn derive_child(
        parent_private: &[u8; 32],
        parent_chain_code: &[u8; 32],
        index: u32,
        hardened: bool,
    ) -> Result<([u8; 32], [u8; 32]), CurveError>;
}
