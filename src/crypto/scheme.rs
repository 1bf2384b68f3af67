//! Signature scheme registry
//!
//! Static bidirectional maps between scheme identifiers, one-byte wire
//! flags and raw public key sizes.

use serde::{Deserialize, Serialize};

/// Signature schemes known to the Sui wire format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureScheme {
    Ed25519,
    Secp256k1,
    Secp256r1,
    MultiSig,
    /// Recognized on the wire only; signing and verification are rejected
    ZkLogin,
}

impl SignatureScheme {
    pub const ALL: [SignatureScheme; 5] = [
        SignatureScheme::Ed25519,
        SignatureScheme::Secp256k1,
        SignatureScheme::Secp256r1,
        SignatureScheme::MultiSig,
        SignatureScheme::ZkLogin,
    ];

    pub fn flag(&self) -> u8 {
        match self {
            Self::Ed25519 => 0x00,
            Self::Secp256k1 => 0x01,
            Self::Secp256r1 => 0x02,
            Self::MultiSig => 0x03,
            Self::ZkLogin => 0x05,
        }
    }

    pub fn from_flag(flag: u8) -> Option<Self> {
        match flag {
            0x00 => Some(Self::Ed25519),
            0x01 => Some(Self::Secp256k1),
            0x02 => Some(Self::Secp256r1),
            0x03 => Some(Self::MultiSig),
            0x05 => Some(Self::ZkLogin),
            _ => None,
        }
    }

    /// Raw public key length; `None` for schemes without a fixed size
    pub fn public_key_size(&self) -> Option<usize> {
        match self {
            Self::Ed25519 => Some(32),
            Self::Secp256k1 | Self::Secp256r1 => Some(33),
            Self::MultiSig | Self::ZkLogin => None,
        }
    }

    /// Secret key length for schemes that can sign locally
    pub fn private_key_size(&self) -> Option<usize> {
        match self {
            Self::Ed25519 | Self::Secp256k1 | Self::Secp256r1 => Some(32),
            Self::MultiSig | Self::ZkLogin => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Ed25519 => "ed25519",
            Self::Secp256k1 => "secp256k1",
            Self::Secp256r1 => "secp256r1",
            Self::MultiSig => "multisig",
            Self::ZkLogin => "zklogin",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ed25519" => Some(Self::Ed25519),
            "secp256k1" | "k1" => Some(Self::Secp256k1),
            "secp256r1" | "r1" | "p256" => Some(Self::Secp256r1),
            "multisig" => Some(Self::MultiSig),
            "zklogin" => Some(Self::ZkLogin),
            _ => None,
        }
    }

    /// True for the three schemes a local keypair can sign with
    pub fn is_single_signer(&self) -> bool {
        matches!(self, Self::Ed25519 | Self::Secp256k1 | Self::Secp256r1)
    }
}

impl std::fmt::Display for SignatureScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_roundtrip() {
        for scheme in SignatureScheme::ALL {
            assert_eq!(SignatureScheme::from_flag(scheme.flag()), Some(scheme));
        }
        assert_eq!(SignatureScheme::from_flag(0x04), None);
        assert_eq!(SignatureScheme::from_flag(0xff), None);
    }

    #[test]
    fn test_key_sizes() {
        assert_eq!(SignatureScheme::Ed25519.public_key_size(), Some(32));
        assert_eq!(SignatureScheme::Secp256k1.public_key_size(), Some(33));
        assert_eq!(SignatureScheme::Secp256r1.public_key_size(), Some(33));
        assert_eq!(SignatureScheme::ZkLogin.public_key_size(), None);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(SignatureScheme::from_name("ED25519"), Some(SignatureScheme::Ed25519));
        assert_eq!(SignatureScheme::from_name("p256"), Some(SignatureScheme::Secp256r1));
        assert_eq!(SignatureScheme::from_name("bls12381"), None);
    }
}
