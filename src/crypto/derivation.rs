//! Hierarchical key derivation
//!
//! Two standards are supported:
//! - SLIP-0010 for Ed25519: every level hardened, `m(/N')+`
//!   (Sui default `m/44'/784'/0'/0'/0'`)
//! - BIP-32 for Secp256k1 / Secp256r1: `m/54'/784'/a'/c/i` and
//!   `m/74'/784'/a'/c/i` respectively
//!
//! Secp256r1 keys are walked on the secp256k1 chain ("Bitcoin seed", k1
//! group order) and the resulting 32 bytes are then taken as a P-256
//! scalar.
//!
//! The whole path is validated before the first HMAC runs.

use zeroize::{Zeroize, Zeroizing};

use super::curves::{
    hmac_sha512_split, CurveError, Ed25519Curve, EllipticCurve, KeyDerivation, Secp256k1Curve,
    Secp256r1Curve,
};
use super::scheme::SignatureScheme;
use crate::error::{SuiError, SuiResult};

/// Hardened offset for BIP-32 derivation
pub const HARDENED: u32 = 0x8000_0000;

/// SLIP-0044 coin type registered for Sui
pub const SUI_COIN_TYPE: u32 = 784;

/// Purpose numbers Sui assigns per scheme
pub mod purposes {
    pub const ED25519: u32 = 44;
    pub const SECP256K1: u32 = 54;
    pub const SECP256R1: u32 = 74;
}

pub const DEFAULT_ED25519_PATH: &str = "m/44'/784'/0'/0'/0'";
pub const DEFAULT_SECP256K1_PATH: &str = "m/54'/784'/0'/0/0";
pub const DEFAULT_SECP256R1_PATH: &str = "m/74'/784'/0'/0/0";

/// Single component of a derivation path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivationComponent {
    pub index: u32,
    pub hardened: bool,
}

impl std::fmt::Display for DerivationComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.hardened {
            write!(f, "{}'", self.index)
        } else {
            write!(f, "{}", self.index)
        }
    }
}

/// Parsed derivation path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationPath {
    pub components: Vec<DerivationComponent>,
}

impl std::fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "m")?;
        for component in &self.components {
            write!(f, "/{}", component)?;
        }
        Ok(())
    }
}

fn path_error(path: &str, reason: impl Into<String>) -> SuiError {
    SuiError::InvalidDerivationPath {
        path: path.to_string(),
        reason: reason.into(),
    }
}

impl DerivationPath {
    /// Parse `m/N'/N/...` without any scheme rules
    pub fn parse(path: &str) -> SuiResult<Self> {
        let mut parts = path.split('/');
        if parts.next() != Some("m") {
            return Err(path_error(path, "path must start with `m`"));
        }

        let mut components = Vec::new();
        for part in parts {
            let (digits, hardened) = match part.strip_suffix('\'') {
                Some(digits) => (digits, true),
                None => (part, false),
            };
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(path_error(path, format!("invalid segment `{}`", part)));
            }
            let index: u32 = digits
                .parse()
                .map_err(|_| path_error(path, format!("index out of range in `{}`", part)))?;
            if index >= HARDENED {
                return Err(path_error(path, format!("index out of range in `{}`", part)));
            }
            components.push(DerivationComponent { index, hardened });
        }

        if components.is_empty() {
            return Err(path_error(path, "path has no components"));
        }
        Ok(Self { components })
    }

    /// Parse and enforce the rules of `scheme`
    pub fn parse_for(scheme: SignatureScheme, path: &str) -> SuiResult<Self> {
        let parsed = Self::parse(path)?;
        match scheme {
            SignatureScheme::Ed25519 => {
                if let Some(soft) = parsed.components.iter().find(|c| !c.hardened) {
                    return Err(path_error(
                        path,
                        format!("ed25519 requires hardened segments, `{}` is not", soft),
                    ));
                }
            }
            SignatureScheme::Secp256k1 | SignatureScheme::Secp256r1 => {
                let purpose = if scheme == SignatureScheme::Secp256k1 {
                    purposes::SECP256K1
                } else {
                    purposes::SECP256R1
                };
                let shape = [true, true, true, false, false];
                let c = &parsed.components;
                let shape_ok = c.len() == shape.len()
                    && c.iter().zip(shape).all(|(comp, hardened)| comp.hardened == hardened);
                if !shape_ok {
                    return Err(path_error(
                        path,
                        format!("expected m/{}'/{}'/{{account}}'/{{change}}/{{index}}", purpose, SUI_COIN_TYPE),
                    ));
                }
                if c[0].index != purpose {
                    return Err(path_error(
                        path,
                        format!("purpose {} does not match {}", c[0].index, scheme),
                    ));
                }
                if c[1].index != SUI_COIN_TYPE {
                    return Err(path_error(path, format!("coin type must be {}", SUI_COIN_TYPE)));
                }
            }
            SignatureScheme::MultiSig | SignatureScheme::ZkLogin => {
                return Err(SuiError::UnsupportedScheme(scheme.to_string()));
            }
        }
        Ok(parsed)
    }

    pub fn default_for(scheme: SignatureScheme) -> Option<&'static str> {
        match scheme {
            SignatureScheme::Ed25519 => Some(DEFAULT_ED25519_PATH),
            SignatureScheme::Secp256k1 => Some(DEFAULT_SECP256K1_PATH),
            SignatureScheme::Secp256r1 => Some(DEFAULT_SECP256R1_PATH),
            _ => None,
        }
    }
}

/// Derive the secret key for `scheme` at `path` from a BIP-39 seed
pub fn derive_secret_key(
    scheme: SignatureScheme,
    seed: &[u8],
    path: &str,
) -> SuiResult<Zeroizing<[u8; 32]>> {
    let parsed = DerivationPath::parse_for(scheme, path)?;
    let key = match scheme {
        SignatureScheme::Ed25519 => derive_path::<Ed25519Curve>(seed, &parsed)?,
        SignatureScheme::Secp256k1 => derive_path::<Secp256k1Curve>(seed, &parsed)?,
        SignatureScheme::Secp256r1 => {
            let key = derive_path::<Secp256k1Curve>(seed, &parsed)?;
            Secp256r1Curve::validate_private_key(&key)?;
            key
        }
        _ => return Err(SuiError::UnsupportedScheme(scheme.to_string())),
    };
    Ok(key)
}

/// Walk `path` from the master node of curve `C`
pub fn derive_path<C: KeyDerivation>(
    seed: &[u8],
    path: &DerivationPath,
) -> Result<Zeroizing<[u8; 32]>, CurveError> {
    if !C::SUPPORTS_NON_HARDENED && path.components.iter().any(|c| !c.hardened) {
        return Err(CurveError::DerivationFailed(
            "curve only supports hardened derivation".into(),
        ));
    }

    // I = HMAC-SHA512(Key = master secret, Data = seed)
    let (mut key, mut chain_code) = hmac_sha512_split(C::MASTER_SECRET, &[seed])?;

    for component in &path.components {
        let derived = C::derive_child(&key, &chain_code, component.index, component.hardened);
        key.zeroize();
        chain_code.zeroize();
        (key, chain_code) = derived?;
    }

    chain_code.zeroize();
    Ok(Zeroizing::new(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        let path = DerivationPath::parse("m/54'/784'/0'/0/1").unwrap();
        assert_eq!(path.components.len(), 5);
        assert!(!path.components[4].hardened);
        assert_eq!(path.to_string(), "m/54'/784'/0'/0/1");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "m", "m/", "n/44'", "m/44'/x'", "m/44''", "m/-1'", "m/2147483648'", "m/44'/ 0'"] {
            assert!(DerivationPath::parse(bad).is_err(), "{bad} should fail");
        }
    }

    #[test]
    fn test_ed25519_requires_hardened() {
        assert!(DerivationPath::parse_for(SignatureScheme::Ed25519, DEFAULT_ED25519_PATH).is_ok());
        assert!(DerivationPath::parse_for(SignatureScheme::Ed25519, "m/0'").is_ok());
        let err = DerivationPath::parse_for(SignatureScheme::Ed25519, "m/44'/784'/0'/0/0").unwrap_err();
        assert!(matches!(err, SuiError::InvalidDerivationPath { .. }));
    }

    #[test]
    fn test_bip32_purpose_must_match_scheme() {
        assert!(DerivationPath::parse_for(SignatureScheme::Secp256k1, DEFAULT_SECP256K1_PATH).is_ok());
        assert!(DerivationPath::parse_for(SignatureScheme::Secp256r1, DEFAULT_SECP256R1_PATH).is_ok());
        assert!(DerivationPath::parse_for(SignatureScheme::Secp256k1, DEFAULT_SECP256R1_PATH).is_err());
        assert!(DerivationPath::parse_for(SignatureScheme::Secp256k1, "m/54'/784'/0'/0'/0'").is_err());
        assert!(DerivationPath::parse_for(SignatureScheme::Secp256k1, "m/54'/60'/0'/0/0").is_err());
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let seed = [0x5au8; 64];
        for scheme in [SignatureScheme::Ed25519, SignatureScheme::Secp256k1, SignatureScheme::Secp256r1] {
            let path = DerivationPath::default_for(scheme).unwrap();
            let a = derive_secret_key(scheme, &seed, path).unwrap();
            let b = derive_secret_key(scheme, &seed, path).unwrap();
            assert_eq!(*a, *b);
        }
    }

    #[test]
    fn test_secp256r1_walks_secp256k1_chain() {
        let seed = [0x3cu8; 64];
        let path = DerivationPath::parse(DEFAULT_SECP256R1_PATH).unwrap();
        let via_k1 = derive_path::<Secp256k1Curve>(&seed, &path).unwrap();
        let r1 = derive_secret_key(SignatureScheme::Secp256r1, &seed, DEFAULT_SECP256R1_PATH).unwrap();
        assert_eq!(*r1, *via_k1);
        assert!(Secp256r1Curve::public_key_from_private(&r1).is_ok());

        // Same chain, different purpose level, different key
        let k1 = derive_secret_key(SignatureScheme::Secp256k1, &seed, DEFAULT_SECP256K1_PATH).unwrap();
        assert_ne!(*r1, *k1);
    }

    #[test]
    fn test_different_accounts_differ() {
        let seed = [1u8; 64];
        let a = derive_secret_key(SignatureScheme::Ed25519, &seed, "m/44'/784'/0'/0'/0'").unwrap();
        let b = derive_secret_key(SignatureScheme::Ed25519, &seed, "m/44'/784'/1'/0'/0'").unwrap();
        assert_ne!(*a, *b);
    }

    #[test]
    fn test_multisig_has_no_derivation() {
        let err = derive_secret_key(SignatureScheme::MultiSig, &[0u8; 64], "m/44'").unwrap_err();
        assert!(matches!(err, SuiError::UnsupportedScheme(_)));
    }
}
