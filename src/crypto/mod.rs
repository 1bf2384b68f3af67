//! Cryptographic authorization for Sui
//!
//! This module provides:
//! - Raw curve primitives (ed25519, secp256k1, secp256r1)
//! - Scheme flags and hierarchical key derivation
//! - Keypairs, public keys and intent-separated signing
//! - Serialized signatures and weighted threshold multisig

pub mod curves;
pub mod derivation;
pub mod intent;
pub mod keypair;
pub mod multisig;
pub mod public_key;
pub mod scheme;
pub mod signature;

pub use curves::{CurveError, Ed25519Curve, EllipticCurve, KeyDerivation, Secp256k1Curve, Secp256r1Curve};
pub use derivation::{
    derive_secret_key, DerivationPath, DEFAULT_ED25519_PATH, DEFAULT_SECP256K1_PATH,
    DEFAULT_SECP256R1_PATH,
};
pub use intent::{intent_digest, intent_message, Intent, IntentScope};
pub use keypair::{generate_mnemonic, SuiKeyPair, SUI_PRIVATE_KEY_PREFIX};
pub use multisig::{CompressedSignature, MultiSig, MultiSigMember, MultiSigPublicKey};
pub use public_key::PublicKey;
pub use scheme::SignatureScheme;
pub use signature::{
    verify_personal_message_signature, verify_transaction_signature, SerializedSignature,
    SingleSignature,
};
